pub mod account_type;
pub mod money;
pub mod side;
pub mod timestamp;
