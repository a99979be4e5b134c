pub mod scenario;
pub mod strategies;
