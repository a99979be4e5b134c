pub mod instrument;
pub mod no_order_reason;
pub mod order;
pub mod position;
pub mod price;
pub mod trading_rules;
