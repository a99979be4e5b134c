pub mod position_audit;
