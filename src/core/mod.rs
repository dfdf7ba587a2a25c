pub mod types;
pub mod keys;
pub mod database;
pub mod config;
pub mod error;
pub mod stats;
