pub mod adapters;
pub mod commands;
pub mod config;
pub mod domain;
pub mod logger;
pub mod ports;

pub use commands::{Error, SkierService};
pub use config::Config;
