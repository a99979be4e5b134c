pub mod dispatcher;
pub mod types;
