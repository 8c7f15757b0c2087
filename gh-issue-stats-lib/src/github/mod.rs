//! GitHub search backend
//!
//! Implements [`crate::series::IssueSearch`] on top of the GitHub search API.
//!
//! # Implementation Model
//!
//! [`GitHubSearch`] turns each (scope, label, query spec) triple into a search-syntax query
//! string, asks the API for the number of matching items, and pairs the total with the
//! web URL a person can open to browse the same results.
//!
//! Requests go through a shared throttler that caps concurrency and spaces dispatches out.
//! When the API reports an exhausted rate limit, the throttler holds back every request until
//! the reset. Transient HTTP failures
//! are retried with exponential backoff before they surface as errors.

mod client;
mod query;
mod resilient_http;
mod searcher;
mod throttler;

pub use searcher::{GitHubSearch, SearchSettings};
