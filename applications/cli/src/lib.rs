//! Cadence CLI
//!
//! Command-line front end over the Cadence catalog: playlists, songs and
//! on-demand stream URL resolution.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command};
pub use commands::App;
pub use config::CadenceConfig;
pub use error::CliError;
