//! CLI argument types and parsing helpers.
mod cli;
mod types;

#[cfg(test)]
mod tests;

pub use cli::{CachedArgs, Command, ExportArgs, ImportArgs, LoglensArgs, StatsArgs};
pub use types::StatsKind;
