// Library surface shared by the binary and the integration tests.
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod logging;
