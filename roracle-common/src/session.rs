//! Session context carried from the home view to the results view

use std::collections::HashSet;

/// Pasted affiliation text, passed explicitly to the results view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    affiliation_text: String,
}

impl SessionContext {
    pub fn new(affiliation_text: impl Into<String>) -> Self {
        Self {
            affiliation_text: affiliation_text.into(),
        }
    }

    pub fn affiliation_text(&self) -> &str {
        &self.affiliation_text
    }

    /// Non-blank lines, verbatim and in input order.
    ///
    /// Both `\n` and `\r\n` end a line.
    pub fn affiliations(&self) -> Vec<&str> {
        self.affiliation_text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect()
    }

    /// `affiliations()` with repeats removed, first occurrence kept
    pub fn distinct_affiliations(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.affiliations()
            .into_iter()
            .filter(|line| seen.insert(*line))
            .collect()
    }

    /// True when there is nothing to look up
    pub fn is_empty(&self) -> bool {
        self.affiliations().is_empty()
    }
}
