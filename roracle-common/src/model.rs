//! Data model for RORacle API payloads
//!
//! Two layers live here:
//! - **Wire types** (`Raw*`, `*Response`) mirror the JSON returned by the
//!   RORacle API and are only ever deserialized.
//! - **Domain types** (`Organization`, `TestRecord`, `DatasetInfo`) are what the
//!   aggregator and the views consume.
//!
//! `TestRecord::is_passing()` is never taken from the wire. See
//! [`RecordSource`] for how it is derived.

use serde::{Deserialize, Serialize};

/// A scholarly organization as identified by the Research Organization Registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Canonical ROR identifier (a `https://ror.org/...` URL)
    pub id: String,
    /// Names, primary first, alternates after
    #[serde(default)]
    pub names: Vec<String>,
    /// Human-readable location
    #[serde(default)]
    pub location: String,
}

impl Organization {
    pub fn new(id: impl Into<String>, names: Vec<String>, location: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            names,
            location: location.into(),
        }
    }

    /// Primary (canonical) name, or an empty string when the registry sent none
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    /// Alternate names in registry order
    pub fn alternate_names(&self) -> &[String] {
        self.names.get(1..).unwrap_or(&[])
    }
}

/// Dataset entry from the test catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub name: String,
    #[serde(default)]
    pub count: usize,
}

/// Where a test record came from
///
/// Drives `TestRecord::is_passing()`:
/// - `Single`: bare `/tests/{id}` response, passing iff no under- or over-matches
/// - `Passing` / `Failing` / `Error`: dataset bucket the API placed it in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    Single,
    Passing,
    Failing,
    Error,
}

/// One evaluated affiliation-string test case
#[derive(Debug, Clone, PartialEq)]
pub struct TestRecord {
    pub test_id: i64,
    pub dataset_name: String,
    /// Raw affiliation text under test
    pub affiliation: String,
    /// True positives
    pub matches: Vec<Organization>,
    /// Expected but not found (false negatives)
    pub under_matches: Vec<Organization>,
    /// Found but not expected (false positives)
    pub over_matches: Vec<Organization>,
    /// Gold label is "zero organizations"
    pub no_matches_expected: bool,
    /// Elapsed seconds reported by the API for this test
    pub elapsed: Option<f64>,
    pub source: RecordSource,
}

impl TestRecord {
    /// Build a standalone record whose outcome follows its match sets
    pub fn new(
        test_id: i64,
        affiliation: impl Into<String>,
        matches: Vec<Organization>,
        under_matches: Vec<Organization>,
        over_matches: Vec<Organization>,
    ) -> Self {
        Self {
            test_id,
            dataset_name: String::new(),
            affiliation: affiliation.into(),
            matches,
            under_matches,
            over_matches,
            no_matches_expected: false,
            elapsed: None,
            source: RecordSource::Single,
        }
    }

    /// Convert a wire record, tagging it with its source.
    ///
    /// The wire `is_passing` field is dropped here.
    pub fn from_raw(raw: RawTestRecord, source: RecordSource) -> Self {
        Self {
            test_id: raw.test_id,
            dataset_name: raw.dataset_name,
            affiliation: raw.affiliation,
            matches: raw.matches,
            under_matches: raw.under_matches,
            over_matches: raw.over_matches,
            no_matches_expected: raw.no_matches_expected,
            elapsed: raw.meta.and_then(|m| m.elapsed),
            source,
        }
    }

    /// Exact set match against the gold labels
    pub fn matches_predicate(&self) -> bool {
        self.under_matches.is_empty() && self.over_matches.is_empty()
    }

    pub fn is_passing(&self) -> bool {
        match self.source {
            RecordSource::Single => self.matches_predicate(),
            RecordSource::Passing => true,
            RecordSource::Failing | RecordSource::Error => false,
        }
    }

    /// True when the API's bucket placement contradicts the match sets
    pub fn bucket_disagrees(&self) -> bool {
        self.source != RecordSource::Single && self.is_passing() != self.matches_predicate()
    }
}

// ============================================================================
// Wire types
// ============================================================================

/// Test record as returned by `/tests/{id}` and inside dataset buckets
#[derive(Debug, Clone, Deserialize)]
pub struct RawTestRecord {
    pub test_id: i64,
    #[serde(default)]
    pub dataset_name: String,
    #[serde(default)]
    pub affiliation: String,
    #[serde(default)]
    pub matches: Vec<Organization>,
    #[serde(default)]
    pub under_matches: Vec<Organization>,
    #[serde(default)]
    pub over_matches: Vec<Organization>,
    #[serde(default)]
    pub no_matches_expected: bool,
    /// API-side outcome hint, only compared against, never trusted
    #[serde(default)]
    pub is_passing: Option<bool>,
    #[serde(default)]
    pub meta: Option<RawTestMeta>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTestMeta {
    #[serde(default)]
    pub elapsed: Option<f64>,
}

/// `/ror-records` response
#[derive(Debug, Clone, Deserialize)]
pub struct RorResponse {
    #[serde(default)]
    pub meta: RorMeta,
    #[serde(default)]
    pub results: Vec<Organization>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RorMeta {
    #[serde(default)]
    pub total_results: usize,
}

/// `/tests/datasets` response
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetCatalogResponse {
    #[serde(default)]
    pub meta: DatasetCatalogMeta,
    #[serde(default)]
    pub results: Vec<DatasetInfo>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatasetCatalogMeta {
    #[serde(default)]
    pub total_datasets: usize,
    #[serde(default)]
    pub total_tests: usize,
}

/// `/tests/datasets/{name}` response: three outcome buckets plus run metadata
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetTestsResponse {
    #[serde(default)]
    pub meta: Option<DatasetMeta>,
    #[serde(default)]
    pub passing_tests: Vec<RawTestRecord>,
    #[serde(default)]
    pub failing_tests: Vec<RawTestRecord>,
    #[serde(default)]
    pub error_tests: Vec<RawTestRecord>,
}

/// Run metadata the API reports for a dataset.
///
/// Display only. Client metrics are always recomputed from the records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    #[serde(default)]
    pub total_tests: usize,
    #[serde(default)]
    pub passing: usize,
    #[serde(default)]
    pub failing: usize,
    #[serde(default)]
    pub errors: usize,
    #[serde(default)]
    pub pass_rate_percent: f64,
    #[serde(default)]
    pub total_elapsed: f64,
    #[serde(default)]
    pub performance: Performance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    #[serde(default)]
    pub precision: f64,
    #[serde(default)]
    pub recall: f64,
    #[serde(default)]
    pub f_score: f64,
}
