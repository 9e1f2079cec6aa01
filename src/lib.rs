pub mod cli;
pub mod client;
pub mod compare;
pub mod config;
pub mod error;
pub mod report;
pub mod server;
