pub mod dispatch;
pub mod market;
pub mod risk;
pub mod scenario;
pub mod signals;
pub mod strategy;
pub mod types;
