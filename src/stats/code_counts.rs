use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{StatsError, StatsResult};

/// Response code counts per time bin.
///
/// `codes` is sorted; every bin in `counts` has one entry per code, in the
/// same order. A span of 0 means a single bin covering the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CodeCountsParts")]
pub struct CodeCounts {
    span_millis: i64,
    codes: Vec<String>,
    counts: Vec<Vec<u64>>,
}

#[derive(Deserialize)]
struct CodeCountsParts {
    span_millis: i64,
    codes: Vec<String>,
    counts: Vec<Vec<u64>>,
}

impl TryFrom<CodeCountsParts> for CodeCounts {
    type Error = StatsError;

    fn try_from(parts: CodeCountsParts) -> StatsResult<Self> {
        Self::new(parts.span_millis, parts.codes, parts.counts)
    }
}

impl CodeCounts {
    /// # Errors
    ///
    /// Returns an error when a bin does not have one count per code.
    pub fn new(span_millis: i64, codes: Vec<String>, counts: Vec<Vec<u64>>) -> StatsResult<Self> {
        if let Some((bin, found)) = counts
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != codes.len())
        {
            return Err(StatsError::BinWidth {
                bin,
                expected: codes.len(),
                found,
            });
        }
        Ok(Self {
            span_millis,
            codes,
            counts,
        })
    }

    /// No codes and no bins.
    #[must_use]
    pub const fn empty(span_millis: i64) -> Self {
        Self {
            span_millis,
            codes: Vec::new(),
            counts: Vec::new(),
        }
    }

    #[must_use]
    pub const fn span_millis(&self) -> i64 {
        self.span_millis
    }

    #[must_use]
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    #[must_use]
    pub fn counts(&self) -> &[Vec<u64>] {
        &self.counts
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.counts.is_empty()
    }

    /// Re-lay the counts against `codes`: missing codes count zero, codes not
    /// in the list are dropped.
    ///
    /// An identical list borrows `self` unchanged. An empty list, or an empty
    /// `self`, yields an empty result.
    #[must_use]
    pub fn normalize_using(&self, codes: &[String]) -> Cow<'_, Self> {
        if codes == self.codes.as_slice() {
            return Cow::Borrowed(self);
        }
        if codes.is_empty() || self.is_empty() {
            return Cow::Owned(Self::empty(self.span_millis));
        }

        let positions: Vec<Option<usize>> = self
            .codes
            .iter()
            .map(|code| codes.iter().position(|target| target == code))
            .collect();
        let counts = self
            .counts
            .iter()
            .map(|bin| {
                let mut normalized = vec![0; codes.len()];
                for (count, position) in bin.iter().zip(&positions) {
                    if let Some(slot) = position.and_then(|pos| normalized.get_mut(pos)) {
                        *slot = *count;
                    }
                }
                normalized
            })
            .collect();
        Cow::Owned(Self {
            span_millis: self.span_millis,
            codes: codes.to_vec(),
            counts,
        })
    }
}

/// Accumulates code counts one bin at a time.
///
/// Counts go into the open bin until [`CodeCountsBuilder::commit_bin`]; a
/// bin that is never committed is discarded by [`CodeCountsBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct CodeCountsBuilder {
    span_millis: i64,
    codes: BTreeSet<String>,
    current: HashMap<String, u64>,
    bins: Vec<HashMap<String, u64>>,
}

impl CodeCountsBuilder {
    #[must_use]
    pub fn new(span_millis: i64) -> Self {
        Self {
            span_millis,
            ..Self::default()
        }
    }

    /// Count one occurrence of `code` in the open bin.
    ///
    /// # Errors
    ///
    /// Returns an error when `code` is empty.
    pub fn increment(&mut self, code: &str) -> StatsResult<&mut Self> {
        if code.is_empty() {
            return Err(StatsError::EmptyCode);
        }
        let count = self.current.entry(code.to_owned()).or_default();
        *count = count.saturating_add(1);
        Ok(self)
    }

    /// Close the open bin, even when it is empty, and start a new one.
    pub fn commit_bin(&mut self) -> &mut Self {
        let bin = std::mem::take(&mut self.current);
        self.codes.extend(bin.keys().cloned());
        self.bins.push(bin);
        self
    }

    #[must_use]
    pub fn build(self) -> CodeCounts {
        let codes: Vec<String> = self.codes.into_iter().collect();
        let counts = self
            .bins
            .iter()
            .map(|bin| {
                codes
                    .iter()
                    .map(|code| bin.get(code).copied().unwrap_or(0))
                    .collect()
            })
            .collect();
        CodeCounts {
            span_millis: self.span_millis,
            codes,
            counts,
        }
    }
}
