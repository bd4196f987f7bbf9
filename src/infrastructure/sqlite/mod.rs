pub mod account_repo;
pub mod migrations;
pub mod trade_repo;
