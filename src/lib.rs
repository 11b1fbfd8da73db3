pub mod app;
pub mod categorize;
pub mod clock;
pub mod config;
pub mod ingest;
pub mod ledger;
pub mod models;
pub mod storage;
pub mod vendors;
