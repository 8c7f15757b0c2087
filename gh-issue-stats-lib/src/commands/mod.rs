//! Command-line interface and orchestration for gh-issue-stats
//!
//! This module implements the CLI commands and wires the calendar, the series builder,
//! the GitHub search client, and the report generators together.
//!
//! ## Commands
//!
//! - **collect**: Build a series for the configured scopes and labels, then print it
//!   and/or write it to report files
//! - **init**: Generate a default configuration file
//! - **validate**: Check a configuration file
//!
//! ## Execution Flow
//!
//! The `run` function parses command-line arguments using clap and routes to the
//! appropriate command handler. `collect` then:
//!
//! 1. Loads the configuration and merges the command-line values into a series request
//! 2. Verifies the GitHub token
//! 3. Builds the series through the GitHub search client
//! 4. Generates the requested reports
//!
//! All output goes through the [`Host`] trait so the commands can be exercised with
//! in-memory buffers.

mod collect;
mod common;
mod config;
mod host;
mod init;
mod progress_reporter;
mod run;
mod validate;

#[cfg(debug_assertions)]
pub use config::Config;

pub use collect::{CollectArgs, collect};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use progress_reporter::ProgressReporter;
pub use run::run;
pub use validate::{ValidateArgs, validate_config};
