//! Match classification for rendering test records
//!
//! The partition into matches, under-matches and over-matches is done by the
//! RORacle API against its gold labels. This module only labels and checks
//! the sets it receives.

use serde::Serialize;
use std::collections::HashSet;

use crate::model::{Organization, TestRecord};

/// Role of an organization within one test record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Found and expected (true positive)
    Match,
    /// Expected but not found (false negative)
    UnderMatch,
    /// Found but not expected (false positive)
    OverMatch,
}

impl TestRecord {
    /// Organizations in card order: matches, under-matches, over-matches
    pub fn pills(&self) -> impl Iterator<Item = (MatchKind, &Organization)> + '_ {
        let matches = self.matches.iter().map(|o| (MatchKind::Match, o));
        let under = self.under_matches.iter().map(|o| (MatchKind::UnderMatch, o));
        let over = self.over_matches.iter().map(|o| (MatchKind::OverMatch, o));
        matches.chain(under).chain(over)
    }

    /// Identifiers that appear in more than one of the three sets, sorted
    pub fn overlapping_ids(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut overlapping: HashSet<&str> = HashSet::new();

        for set in [&self.matches, &self.under_matches, &self.over_matches] {
            let ids: HashSet<&str> = set.iter().map(|o| o.id.as_str()).collect();
            for id in ids {
                if !seen.insert(id) {
                    overlapping.insert(id);
                }
            }
        }

        let mut ids: Vec<String> = overlapping.into_iter().map(str::to_string).collect();
        ids.sort();
        ids
    }

    /// Placeholder text for a record with no organizations on either side
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.matches.is_empty() || !self.under_matches.is_empty() || !self.over_matches.is_empty()
        {
            return None;
        }
        if self.no_matches_expected {
            Some("No matches expected")
        } else {
            Some("No organizations found")
        }
    }
}
