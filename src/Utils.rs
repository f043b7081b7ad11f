//! different utility modules used throughout the project
/// numeric configuration read from TOML
pub mod config;
/// terminal and file logging
pub mod logger;
