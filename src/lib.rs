//! Summary statistics for GitHub repositories.
//!
//! The library fetches a repository resource and its latest release from the
//! GitHub REST API, maps them into a flat [`RepositoryStatistics`] record and
//! renders batches of records as text, JSON or YAML. Per-repository failures
//! are collected as [`FetchOutcome`] values so a batch never stops at the
//! first error.

mod client;
mod config;
mod dashboard;
mod error;
mod identifier;
mod output;
mod render;
mod report;
mod stats;

pub use client::{GITHUB_MEDIA_TYPE, ReleaseLookup, StatsClient, StatsSource, user_agent};
pub use config::{
    ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, RepositoryEntry, RepositoryList,
    load_repository_list,
};
pub use dashboard::{DashboardCommand, error_panel, run_dashboard, stats_panel};
pub use error::{Error, config_error, output_error};
pub use identifier::RepositoryIdentifier;
pub use output::{Destination, write_errors, write_output};
pub use render::{OutputFormat, format_size, group_thousands, render};
pub use report::{BatchReport, FetchOutcome, collect_outcomes};
pub use stats::{RepositoryStatistics, UNKNOWN, is_unknown};
