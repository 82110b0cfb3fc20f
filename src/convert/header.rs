use super::JtlField;

/// Minimum number of recognised names for a row with unknown names to
/// still count as a header.
const MIN_RECOGNISED: usize = 3;

/// How the first record of a text log should be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderLayout {
    /// The first record names the columns; unknown names map to `None`.
    Named(Vec<Option<JtlField>>),
    /// No header row; the first record is data in JMeter's default layout.
    Headerless(Vec<Option<JtlField>>),
    Unrecognized,
}

impl HeaderLayout {
    /// Classify the first record of a log.
    #[must_use]
    pub fn detect(first: &[String]) -> Self {
        let columns: Vec<Option<JtlField>> = first
            .iter()
            .map(|name| JtlField::from_header(name))
            .collect();
        let recognised = columns.iter().filter(|column| column.is_some()).count();
        if recognised == columns.len() || recognised >= MIN_RECOGNISED {
            return Self::Named(columns);
        }
        if matches_headerless_layout(first) {
            return Self::Headerless(JtlField::HEADERLESS_LAYOUT.into_iter().map(Some).collect());
        }
        Self::Unrecognized
    }
}

fn matches_headerless_layout(row: &[String]) -> bool {
    if row.len() != JtlField::HEADERLESS_LAYOUT.len() {
        return false;
    }
    let numeric = |idx: usize| {
        row.get(idx)
            .is_some_and(|value| value.trim().parse::<i64>().is_ok())
    };
    let boolean = row.get(7).is_some_and(|value| {
        let value = value.trim();
        value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
    });
    numeric(0) && numeric(1) && boolean && (8..12).all(numeric)
}
