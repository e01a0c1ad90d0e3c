//! Affiliation lookup results and their summary counts

use serde::Serialize;

use crate::model::Organization;

/// Organizations found for one distinct affiliation string
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AffiliationResult {
    pub affiliation: String,
    pub organizations: Vec<Organization>,
    /// Lookup failed and `organizations` is empty by substitution
    pub failed: bool,
}

impl AffiliationResult {
    pub fn found(affiliation: impl Into<String>, organizations: Vec<Organization>) -> Self {
        Self {
            affiliation: affiliation.into(),
            organizations,
            failed: false,
        }
    }

    pub fn failed(affiliation: impl Into<String>) -> Self {
        Self {
            affiliation: affiliation.into(),
            organizations: Vec::new(),
            failed: true,
        }
    }

    /// ROR identifiers in result order
    pub fn ror_ids(&self) -> impl Iterator<Item = &str> {
        self.organizations.iter().map(|o| o.id.as_str())
    }
}

/// Header counts for the results view
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ResultsSummary {
    /// Non-blank input lines, duplicates included
    pub affiliation_count: usize,
    /// Organizations summed over distinct affiliations
    pub organization_count: usize,
    /// `organization_count` per distinct affiliation
    pub average_per_affiliation: f64,
}

impl ResultsSummary {
    pub fn compute(affiliation_count: usize, results: &[AffiliationResult]) -> Self {
        let organization_count: usize = results.iter().map(|r| r.organizations.len()).sum();
        let average_per_affiliation = if results.is_empty() {
            0.0
        } else {
            organization_count as f64 / results.len() as f64
        };

        Self {
            affiliation_count,
            organization_count,
            average_per_affiliation,
        }
    }
}
