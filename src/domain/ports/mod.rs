pub mod account_repository;
pub mod trade_repository;
