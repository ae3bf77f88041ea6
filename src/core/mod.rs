pub mod business_day;
pub mod classifier;
pub mod gate_pass;
pub mod session_builder;
pub mod timestamp;
pub mod toggle;
