use std::path::PathBuf;

use crate::args::StatsKind;
use crate::pipeline::ImportSettings;
use crate::store::StatsKey;

pub(in crate::entry) struct ImportPlan {
    /// `(source, dest)` pairs in command-line order.
    pub(super) jobs: Vec<(PathBuf, PathBuf)>,
    pub(super) db: Option<PathBuf>,
    pub(super) first_log_id: i64,
    pub(super) settings: ImportSettings,
}

pub(in crate::entry) struct ExportPlan {
    pub(super) source: PathBuf,
    pub(super) out: Option<PathBuf>,
}

pub(in crate::entry) struct StatsPlan {
    pub(super) source: PathBuf,
    pub(super) label: Option<String>,
    pub(super) kind: StatsKind,
    pub(super) settings: ImportSettings,
    pub(super) csv: Option<PathBuf>,
}

pub(in crate::entry) struct CachedPlan {
    pub(super) db: PathBuf,
    pub(super) key: StatsKey,
    pub(super) kind: StatsKind,
    pub(super) code_counts_span_millis: i64,
}

pub(in crate::entry) enum RunPlan {
    Import(ImportPlan),
    Export(ExportPlan),
    Stats(StatsPlan),
    Cached(CachedPlan),
}
