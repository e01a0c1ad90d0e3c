//! Tests view: dataset runs and single tests with their metrics
//!
//! Metrics always cover the full loaded record set. The filter only narrows
//! what is displayed.

use roracle_common::{
    aggregate, filter_by, AggregateMetrics, DatasetInfo, DatasetMeta, FilterMode, Result,
    TestRecord,
};
use tracing::info;

use crate::client::RorApi;

/// What the tests page should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestsSelection {
    /// First dataset of the catalog
    DefaultDataset,
    Dataset(String),
    Single(i64),
}

/// State of the tests page
#[derive(Debug, Clone, Default)]
pub struct TestsView {
    /// Dataset shown, if any
    pub dataset: Option<String>,
    /// Test shown, when a single test was requested
    pub test_id: Option<i64>,
    pub records: Vec<TestRecord>,
    pub metrics: AggregateMetrics,
    /// Run metadata reported by the API for a dataset
    pub meta: Option<DatasetMeta>,
    pub bucket_disagreements: usize,
}

impl TestsView {
    fn from_records(records: Vec<TestRecord>) -> Self {
        let metrics = aggregate(&records);
        Self {
            records,
            metrics,
            ..Self::default()
        }
    }

    /// Records to display under `mode`
    pub fn filtered(&self, mode: FilterMode) -> Vec<&TestRecord> {
        filter_by(&self.records, mode)
    }
}

/// Datasets available for selection
pub async fn load_catalog(api: &dyn RorApi) -> Result<Vec<DatasetInfo>> {
    api.fetch_dataset_catalog().await
}

/// Dataset selected when none was chosen explicitly
pub fn default_dataset(catalog: &[DatasetInfo]) -> Option<&str> {
    catalog.first().map(|d| d.name.as_str())
}

/// Load the records for `selection` and compute their metrics.
///
/// `DefaultDataset` with an empty catalog yields an empty view.
pub async fn load_tests(api: &dyn RorApi, selection: &TestsSelection) -> Result<TestsView> {
    match selection {
        TestsSelection::Single(test_id) => {
            let record = api.fetch_single_test(*test_id).await?;
            let mut view = TestsView::from_records(vec![record]);
            view.test_id = Some(*test_id);
            info!(test_id = *test_id, passing = view.metrics.passing, "Single test loaded");
            Ok(view)
        }
        TestsSelection::Dataset(name) => load_dataset(api, name).await,
        TestsSelection::DefaultDataset => {
            let catalog = load_catalog(api).await?;
            match default_dataset(&catalog) {
                Some(name) => load_dataset(api, name).await,
                None => {
                    info!("Dataset catalog is empty");
                    Ok(TestsView::default())
                }
            }
        }
    }
}

async fn load_dataset(api: &dyn RorApi, name: &str) -> Result<TestsView> {
    let reconciled = api.fetch_dataset_tests(name).await?;

    let mut view = TestsView::from_records(reconciled.records);
    view.dataset = Some(name.to_string());
    view.meta = reconciled.meta;
    view.bucket_disagreements = reconciled.bucket_disagreements;

    info!(
        dataset = %name,
        total = view.metrics.total,
        passing = view.metrics.passing,
        failing = view.metrics.failing,
        precision = view.metrics.precision,
        recall = view.metrics.recall,
        "Dataset tests loaded"
    );

    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;
    use roracle_common::model::DatasetTestsResponse;
    use roracle_common::{reconcile, Error, Organization};

    fn org(id: &str) -> Organization {
        Organization::new(id, vec![id.to_string()], "")
    }

    fn mock() -> MockApi {
        let mut api = MockApi::default();
        api.catalog = vec![
            DatasetInfo { name: "crossref".to_string(), count: 3 },
            DatasetInfo { name: "pubmed".to_string(), count: 0 },
        ];

        let response: DatasetTestsResponse = serde_json::from_str(
            r#"{
                "meta": {"total_tests": 3, "passing": 1, "failing": 1, "errors": 1,
                         "performance": {"precision": 0.9, "recall": 0.8, "f_score": 0.85}},
                "passing_tests": [{"test_id": 1, "matches": [{"id": "a", "names": ["A"]}, {"id": "b", "names": ["B"]}]}],
                "failing_tests": [{"test_id": 2, "under_matches": [{"id": "c", "names": ["C"]}]}],
                "error_tests": [{"test_id": 3, "over_matches": [{"id": "d", "names": ["D"]}]}]
            }"#,
        )
        .unwrap();
        api.datasets.insert("crossref".to_string(), reconcile(response));
        api.tests.insert(
            42,
            TestRecord::new(42, "Dept. of Physics, MIT", vec![org("x")], vec![], vec![]),
        );
        api
    }

    #[tokio::test]
    async fn test_default_dataset_is_first_in_catalog() {
        let api = mock();
        let view = load_tests(&api, &TestsSelection::DefaultDataset).await.unwrap();

        assert_eq!(view.dataset.as_deref(), Some("crossref"));
        assert_eq!(view.metrics.total, 3);
        assert_eq!(view.metrics.passing, 1);
        assert_eq!(view.metrics.failing, 2);
        assert!((view.metrics.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((view.metrics.recall - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(view.meta.as_ref().unwrap().performance.f_score, 0.85);
    }

    #[tokio::test]
    async fn test_filter_does_not_change_metrics() {
        let api = mock();
        let view = load_tests(&api, &TestsSelection::Dataset("crossref".to_string()))
            .await
            .unwrap();

        let failing: Vec<i64> = view
            .filtered(FilterMode::Failing)
            .iter()
            .map(|r| r.test_id)
            .collect();
        assert_eq!(failing, vec![2, 3]);
        assert_eq!(view.filtered(FilterMode::Passing).len(), 1);
        assert_eq!(view.metrics.total, 3);
    }

    #[tokio::test]
    async fn test_single_test() {
        let api = mock();
        let view = load_tests(&api, &TestsSelection::Single(42)).await.unwrap();

        assert_eq!(view.test_id, Some(42));
        assert!(view.dataset.is_none());
        assert_eq!(view.metrics.total, 1);
        assert_eq!(view.metrics.passing, 1);
        assert_eq!(view.metrics.precision, 1.0);
        assert_eq!(view.metrics.recall, 1.0);
    }

    #[tokio::test]
    async fn test_view_level_failure_propagates() {
        let api = mock();
        let err = load_tests(&api, &TestsSelection::Dataset("missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(_)));

        let err = load_tests(&api, &TestsSelection::Single(7)).await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_empty_catalog_yields_empty_view() {
        let api = MockApi::default();
        let view = load_tests(&api, &TestsSelection::DefaultDataset).await.unwrap();
        assert!(view.records.is_empty());
        assert!(view.dataset.is_none());
        assert_eq!(view.metrics, AggregateMetrics::default());
    }
}
