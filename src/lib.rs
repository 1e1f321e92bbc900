pub mod config;
pub mod dispatch;
pub mod driver;
pub mod error;
pub mod payload;
pub mod report;
