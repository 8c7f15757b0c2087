#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for gh-issue-stats
//!
//! This library consolidates all functionality for the gh-issue-stats tool, which reconstructs
//! a backward-looking time series of open, new, and closed issue/PR counts from point-in-time
//! search totals.
//!
//! # Module Organization
//!
//! - [`calendar`]: Period arithmetic (current period start, stepping back by N periods)
//! - [`series`]: The interval chain builder and the strongly-typed series it produces
//! - [`github`]: GitHub search client, query-string builder, and rate-limit handling
//! - [`reports`]: Report generation in multiple formats
//! - [`commands`]: Command-line interface and orchestration

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod calendar;
pub mod series;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod github;
#[cfg(not(any(debug_assertions, test)))]
mod github;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

pub use crate::commands::{Host, run};
