//! Core library for the `loglens` CLI.
//!
//! This crate turns comma-separated load-test sample logs into a compact
//! dictionary-encoded binary form and back, and derives latency statistics
//! from them: aggregates, time series, histograms, percentiles and
//! response-code counts. Computed results can be persisted in a SQLite stats
//! cache. The primary user-facing interface is the `loglens` command-line
//! application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod codec;
pub mod config;
pub mod convert;
pub mod entry;
pub mod error;
pub mod logger;
pub mod output;
pub mod pipeline;
pub mod stats;
pub mod store;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
