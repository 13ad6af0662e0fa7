pub mod cli;
pub mod config;
pub mod error;
pub mod interactive;
pub mod loader;
pub mod logging;
pub mod report;
pub mod scanner;
