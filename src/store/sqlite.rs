use std::path::Path;

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_rusqlite::Connection;
use tracing::debug;

use super::{StatsKey, StatsStore, check_log_id};
use crate::error::{StoreError, StoreResult};
use crate::stats::{CodeCounts, Histogram, Percentiles, Stats, Timeseries};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS sample_labels (
        log_id INTEGER NOT NULL,
        label_id INTEGER NOT NULL,
        label TEXT NOT NULL,
        PRIMARY KEY (log_id, label_id)
    );
    CREATE TABLE IF NOT EXISTS aggregates (
        log_id INTEGER NOT NULL,
        label_id INTEGER NOT NULL,
        span_millis INTEGER NOT NULL,
        payload TEXT NOT NULL,
        PRIMARY KEY (log_id, label_id, span_millis)
    );
    CREATE TABLE IF NOT EXISTS timeseries (
        log_id INTEGER NOT NULL,
        label_id INTEGER NOT NULL,
        span_millis INTEGER NOT NULL,
        payload TEXT NOT NULL,
        PRIMARY KEY (log_id, label_id, span_millis)
    );
    CREATE TABLE IF NOT EXISTS histograms (
        log_id INTEGER NOT NULL,
        label_id INTEGER NOT NULL,
        span_millis INTEGER NOT NULL,
        payload TEXT NOT NULL,
        PRIMARY KEY (log_id, label_id, span_millis)
    );
    CREATE TABLE IF NOT EXISTS percentiles (
        log_id INTEGER NOT NULL,
        label_id INTEGER NOT NULL,
        span_millis INTEGER NOT NULL,
        payload TEXT NOT NULL,
        PRIMARY KEY (log_id, label_id, span_millis)
    );
    CREATE TABLE IF NOT EXISTS code_counts (
        log_id INTEGER NOT NULL,
        label_id INTEGER NOT NULL,
        span_millis INTEGER NOT NULL,
        payload TEXT NOT NULL,
        PRIMARY KEY (log_id, label_id, span_millis)
    );";

/// One table per result kind, all sharing the payload layout.
#[derive(Debug, Clone, Copy)]
enum Table {
    Aggregates,
    Timeseries,
    Histograms,
    Percentiles,
    CodeCounts,
}

impl Table {
    const fn name(self) -> &'static str {
        match self {
            Self::Aggregates => "aggregates",
            Self::Timeseries => "timeseries",
            Self::Histograms => "histograms",
            Self::Percentiles => "percentiles",
            Self::CodeCounts => "code_counts",
        }
    }
}

/// SQLite-backed store with JSON payloads. Writes replace earlier results for
/// the same key.
#[derive(Clone)]
pub struct SqliteStatsStore {
    conn: Connection,
}

impl SqliteStatsStore {
    /// Open (or create) the database at `path` and make sure the tables exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|err| StoreError::Sqlite {
                context: "open sqlite db",
                source: err,
            })?;
        debug!("Opened stats db {}", path.display());
        Self::with_connection(conn).await
    }

    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|err| StoreError::Sqlite {
                context: "open in-memory sqlite db",
                source: err,
            })?;
        Self::with_connection(conn).await
    }

    async fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(|err| StoreError::Sqlite {
            context: "create stats tables",
            source: err,
        })?;
        Ok(Self { conn })
    }

    async fn put_json<T: Serialize + Sync>(
        &self,
        table: Table,
        key: StatsKey,
        span_millis: i64,
        value: &T,
    ) -> StoreResult<()> {
        let payload = serde_json::to_string(value).map_err(|err| StoreError::Serialize {
            context: table.name(),
            source: err,
        })?;
        let sql = format!(
            "INSERT INTO {} (log_id, label_id, span_millis, payload) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (log_id, label_id, span_millis) DO UPDATE SET payload = excluded.payload",
            table.name()
        );
        self.conn
            .call(move |conn| {
                conn.execute(
                    &sql,
                    rusqlite::params![key.log_id, key.label_id, span_millis, payload],
                )?;
                Ok(())
            })
            .await
            .map_err(|err| StoreError::Sqlite {
                context: "write stats payload",
                source: err,
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        table: Table,
        key: StatsKey,
        span_millis: i64,
    ) -> StoreResult<Option<T>> {
        let sql = format!(
            "SELECT payload FROM {} WHERE log_id = ?1 AND label_id = ?2 AND span_millis = ?3",
            table.name()
        );
        let payload = self
            .conn
            .call(move |conn| {
                let found = conn
                    .query_row(
                        &sql,
                        rusqlite::params![key.log_id, key.label_id, span_millis],
                        |row| row.get::<_, String>(0),
                    )
                    .optional()?;
                Ok(found)
            })
            .await
            .map_err(|err| StoreError::Sqlite {
                context: "read stats payload",
                source: err,
            })?;
        payload
            .map(|text| {
                serde_json::from_str(&text).map_err(|err| StoreError::Deserialize {
                    context: table.name(),
                    source: err,
                })
            })
            .transpose()
    }
}

#[async_trait]
impl StatsStore for SqliteStatsStore {
    async fn create_sample_labels(&self, log_id: i64, labels: &[String]) -> StoreResult<()> {
        check_log_id(log_id)?;
        let labels = labels.to_vec();
        self.conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(
                        "INSERT INTO sample_labels (log_id, label_id, label) VALUES (?1, ?2, ?3)
                         ON CONFLICT (log_id, label_id) DO UPDATE SET label = excluded.label",
                    )?;
                    for (label_id, label) in (0i64..).zip(labels) {
                        stmt.execute(rusqlite::params![log_id, label_id, label])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|err| StoreError::Sqlite {
                context: "write sample labels",
                source: err,
            })
    }

    async fn sample_labels(&self, log_id: i64) -> StoreResult<Vec<String>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT label FROM sample_labels WHERE log_id = ?1 ORDER BY label_id",
                )?;
                let rows = stmt.query_map([log_id], |row| row.get::<_, String>(0))?;
                let mut labels = Vec::new();
                for label in rows {
                    labels.push(label?);
                }
                Ok(labels)
            })
            .await
            .map_err(|err| StoreError::Sqlite {
                context: "read sample labels",
                source: err,
            })
    }

    async fn aggregate(&self, key: StatsKey) -> StoreResult<Option<Stats>> {
        self.get_json(Table::Aggregates, key, 0).await
    }

    async fn put_aggregate(&self, key: StatsKey, stats: &Stats) -> StoreResult<()> {
        self.put_json(Table::Aggregates, key, 0, stats).await
    }

    async fn timeseries(&self, key: StatsKey) -> StoreResult<Option<Timeseries>> {
        self.get_json(Table::Timeseries, key, 0).await
    }

    async fn put_timeseries(&self, key: StatsKey, series: &Timeseries) -> StoreResult<()> {
        self.put_json(Table::Timeseries, key, 0, series).await
    }

    async fn histogram(&self, key: StatsKey) -> StoreResult<Option<Histogram>> {
        self.get_json(Table::Histograms, key, 0).await
    }

    async fn put_histogram(&self, key: StatsKey, histogram: &Histogram) -> StoreResult<()> {
        self.put_json(Table::Histograms, key, 0, histogram).await
    }

    async fn percentiles(&self, key: StatsKey) -> StoreResult<Option<Percentiles>> {
        self.get_json(Table::Percentiles, key, 0).await
    }

    async fn put_percentiles(
        &self,
        key: StatsKey,
        percentiles: &Percentiles,
    ) -> StoreResult<()> {
        self.put_json(Table::Percentiles, key, 0, percentiles).await
    }

    async fn code_counts(
        &self,
        key: StatsKey,
        span_millis: i64,
    ) -> StoreResult<Option<CodeCounts>> {
        self.get_json(Table::CodeCounts, key, span_millis).await
    }

    async fn put_code_counts(&self, key: StatsKey, counts: &CodeCounts) -> StoreResult<()> {
        self.put_json(Table::CodeCounts, key, counts.span_millis(), counts)
            .await
    }
}
