pub mod accounts;
pub mod analytics;
pub mod import;
pub mod portfolio;
pub mod report;
