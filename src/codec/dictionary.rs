use std::collections::HashMap;

/// Append-only string table addressed by 1-based position; 0 means absent.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    entries: Vec<String>,
    positions: HashMap<String, u32>,
}

impl Dictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference for `value`, adding it on first sight. `None` and empty
    /// strings map to 0.
    pub fn intern(&mut self, value: Option<&str>) -> u32 {
        let Some(text) = value.filter(|text| !text.is_empty()) else {
            return 0;
        };
        if let Some(position) = self.positions.get(text) {
            return *position;
        }
        let Some(position) = u32::try_from(self.entries.len())
            .ok()
            .and_then(|len| len.checked_add(1))
        else {
            return 0;
        };
        self.entries.push(text.to_owned());
        self.positions.insert(text.to_owned(), position);
        position
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in file form: `None` when nothing was interned.
    #[must_use]
    pub fn into_entries(self) -> Option<Vec<String>> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.entries)
        }
    }
}

/// Resolve a 1-based reference against a decoded dictionary.
///
/// Reference 0 and a missing dictionary both yield `None`.
#[must_use]
pub fn resolve(entries: Option<&[String]>, reference: u32) -> Option<&str> {
    let position = usize::try_from(reference).ok()?.checked_sub(1)?;
    entries?.get(position).map(String::as_str)
}
