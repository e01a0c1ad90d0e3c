//! Test outcome aggregation
//!
//! Precision and recall are micro-averaged: organization counts are summed
//! over the whole record set before dividing. A zero denominator yields 0.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::TestRecord;

/// Summary metrics over a record collection
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregateMetrics {
    pub total: usize,
    pub passing: usize,
    pub failing: usize,
    pub precision: f64,
    pub recall: f64,
}

impl AggregateMetrics {
    /// Harmonic mean of precision and recall (0 when both are 0)
    pub fn f_score(&self) -> f64 {
        let sum = self.precision + self.recall;
        if sum > 0.0 {
            2.0 * self.precision * self.recall / sum
        } else {
            0.0
        }
    }
}

/// Compute metrics for `records`. Never fails; empty input yields all zeros.
pub fn aggregate(records: &[TestRecord]) -> AggregateMetrics {
    let total = records.len();
    let passing = records.iter().filter(|r| r.is_passing()).count();

    let mut total_expected = 0usize;
    let mut total_found = 0usize;
    let mut true_positives = 0usize;

    for record in records {
        total_expected += record.matches.len() + record.under_matches.len();
        total_found += record.matches.len() + record.over_matches.len();
        true_positives += record.matches.len();
    }

    let precision = if total_found > 0 {
        true_positives as f64 / total_found as f64
    } else {
        0.0
    };
    let recall = if total_expected > 0 {
        true_positives as f64 / total_expected as f64
    } else {
        0.0
    };

    AggregateMetrics {
        total,
        passing,
        failing: total - passing,
        precision,
        recall,
    }
}

/// Record filter for the tests view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    Passing,
    Failing,
}

impl FilterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterMode::All => "all",
            FilterMode::Passing => "passing",
            FilterMode::Failing => "failing",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "passing" => Ok(FilterMode::Passing),
            "failing" => Ok(FilterMode::Failing),
            other => Err(Error::InvalidInput(format!(
                "unknown filter '{}' (expected all, passing or failing)",
                other
            ))),
        }
    }
}

/// Order-preserving subsequence of `records` selected by `mode`
pub fn filter_by(records: &[TestRecord], mode: FilterMode) -> Vec<&TestRecord> {
    records
        .iter()
        .filter(|r| match mode {
            FilterMode::All => true,
            FilterMode::Passing => r.is_passing(),
            FilterMode::Failing => !r.is_passing(),
        })
        .collect()
}
