//! Dataset bucket reconciliation
//!
//! `/tests/datasets/{name}` returns three buckets (passing, failing, error).
//! Each record is tagged with its bucket before the buckets are flattened, so
//! `is_passing()` comes from the tag. When a tag contradicts the record's
//! match sets the disagreement is logged and counted, not corrected.

use tracing::warn;

use crate::model::{DatasetMeta, DatasetTestsResponse, RawTestRecord, RecordSource, TestRecord};

/// Flattened dataset run
#[derive(Debug, Clone, Default)]
pub struct ReconciledDataset {
    /// Passing bucket first, then failing, then error; bucket order kept
    pub records: Vec<TestRecord>,
    /// Run metadata as reported by the API
    pub meta: Option<DatasetMeta>,
    /// Records whose bucket contradicts their match sets
    pub bucket_disagreements: usize,
}

/// Merge the three outcome buckets into one tagged list
pub fn reconcile(response: DatasetTestsResponse) -> ReconciledDataset {
    let DatasetTestsResponse {
        meta,
        passing_tests,
        failing_tests,
        error_tests,
    } = response;

    let tagged = tag(passing_tests, RecordSource::Passing)
        .chain(tag(failing_tests, RecordSource::Failing))
        .chain(tag(error_tests, RecordSource::Error));

    let mut records = Vec::new();
    let mut bucket_disagreements = 0;

    for record in tagged {
        if record.bucket_disagrees() {
            bucket_disagreements += 1;
            warn!(
                test_id = record.test_id,
                bucket = ?record.source,
                under_matches = record.under_matches.len(),
                over_matches = record.over_matches.len(),
                "Bucket placement disagrees with match sets"
            );
        }

        check_disjoint(&record);
        records.push(record);
    }

    ReconciledDataset {
        records,
        meta,
        bucket_disagreements,
    }
}

/// Warn when an organization sits in more than one match set.
///
/// Returns false for a record that breaks disjointness.
pub fn check_disjoint(record: &TestRecord) -> bool {
    let overlapping = record.overlapping_ids();
    if overlapping.is_empty() {
        return true;
    }
    warn!(
        test_id = record.test_id,
        ids = ?overlapping,
        "Organization appears in more than one match set"
    );
    false
}

fn tag(bucket: Vec<RawTestRecord>, source: RecordSource) -> impl Iterator<Item = TestRecord> {
    bucket
        .into_iter()
        .map(move |raw| TestRecord::from_raw(raw, source))
}
