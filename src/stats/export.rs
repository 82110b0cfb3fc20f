use std::path::Path;

use tracing::debug;

use super::{Stats, Timeseries};
use crate::convert::text_writer;
use crate::error::{StatsError, StatsResult};
use crate::output::{AtomicOutput, CommitError};

/// Write `series` to `path` as CSV, one row per bucket under
/// [`Stats::CSV_HEADERS`].
///
/// Returns the lowercase hex SHA-256 of the file.
///
/// # Errors
///
/// Returns an error if the file cannot be written; `path` keeps its previous
/// content in that case.
pub fn write_stats_csv(series: &Timeseries, path: &Path) -> StatsResult<String> {
    let io_err = |context: &'static str| {
        move |source: std::io::Error| StatsError::Io {
            context,
            path: path.to_path_buf(),
            source,
        }
    };

    let mut output = AtomicOutput::create(path).map_err(io_err("creating stats csv"))?;
    {
        let csv_err = |source: csv::Error| StatsError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = text_writer(&mut output);
        writer.write_record(Stats::CSV_HEADERS).map_err(csv_err)?;
        for stats in &series.stats_list {
            writer.write_record(stats.csv_cells()).map_err(csv_err)?;
        }
        writer.flush().map_err(io_err("flushing stats csv"))?;
    }

    let digest = output.commit().map_err(|err| match err {
        CommitError::Flush(source) => StatsError::Io {
            context: "flushing stats csv",
            path: path.to_path_buf(),
            source,
        },
        CommitError::Persist(source) => StatsError::Persist {
            path: path.to_path_buf(),
            source,
        },
    })?;
    debug!(
        "Wrote {} stats rows to {}",
        series.stats_list.len(),
        path.display()
    );
    Ok(digest)
}
