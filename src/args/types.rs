use clap::ValueEnum;

/// Which result a `stats` or `cached` command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsKind {
    Aggregate,
    Timeseries,
    Histogram,
    Percentiles,
    Codes,
}

impl StatsKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aggregate => "aggregate",
            Self::Timeseries => "timeseries",
            Self::Histogram => "histogram",
            Self::Percentiles => "percentiles",
            Self::Codes => "codes",
        }
    }
}
