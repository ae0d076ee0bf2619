// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod client;
pub mod config;
pub mod encoding;
pub mod history;
pub mod predictions;
pub mod source;
pub mod stats;
pub mod table;

pub use client::ArbDataClient;
pub use config::Config;
