pub mod market_snapshot;
pub mod market_source;
pub mod order_book;
pub mod synthetic;
