//! RORacle API client
//!
//! Thin async wrappers over the four GET endpoints the views consume. Every
//! failure (transport, non-2xx status, undecodable body) is reported as
//! `Error::Network`. There is no retry; callers decide whether a failure is
//! per-item or view-level.

use async_trait::async_trait;
use reqwest::Url;
use roracle_common::model::{
    DatasetCatalogResponse, DatasetInfo, Organization, RawTestRecord, RecordSource, RorResponse,
    TestRecord,
};
use roracle_common::reconcile::check_disjoint;
use roracle_common::{reconcile, Error, ReconciledDataset, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("roracle-ui/", env!("CARGO_PKG_VERSION"));

/// Operations the views need from the RORacle API
#[async_trait]
pub trait RorApi: Send + Sync {
    /// Organizations named in one affiliation string
    async fn fetch_organizations(&self, affiliation: &str) -> Result<Vec<Organization>>;

    /// Available test datasets
    async fn fetch_dataset_catalog(&self) -> Result<Vec<DatasetInfo>>;

    /// All tests of one dataset, buckets flattened
    async fn fetch_dataset_tests(&self, dataset_name: &str) -> Result<ReconciledDataset>;

    /// One test by id
    async fn fetch_single_test(&self, test_id: i64) -> Result<TestRecord>;
}

/// HTTP implementation of [`RorApi`]
#[derive(Debug, Clone)]
pub struct RoracleClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl RoracleClient {
    /// Create a client for `base_url` (e.g. `https://api.roracle.org`)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| Error::Config(format!("invalid API base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "API base URL '{}' cannot carry a path",
                base_url
            )));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append percent-encoded path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was rejected in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!(url = %url, "Querying RORacle API");

        let response = self
            .http_client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::Network(format!("GET {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Network(format!(
                "GET {}: API error: {}",
                url,
                status.as_u16()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Network(format!("GET {}: undecodable response: {}", url, e)))
    }
}

#[async_trait]
impl RorApi for RoracleClient {
    async fn fetch_organizations(&self, affiliation: &str) -> Result<Vec<Organization>> {
        let mut url = self.endpoint(&["ror-records"]);
        url.query_pairs_mut().append_pair("affiliation", affiliation);

        let response: RorResponse = self.get_json(url).await?;
        debug!(
            total_results = response.meta.total_results,
            returned = response.results.len(),
            "ROR lookup complete"
        );
        Ok(response.results)
    }

    async fn fetch_dataset_catalog(&self) -> Result<Vec<DatasetInfo>> {
        let response: DatasetCatalogResponse =
            self.get_json(self.endpoint(&["tests", "datasets"])).await?;
        debug!(
            total_datasets = response.meta.total_datasets,
            total_tests = response.meta.total_tests,
            "Dataset catalog loaded"
        );
        Ok(response.results)
    }

    async fn fetch_dataset_tests(&self, dataset_name: &str) -> Result<ReconciledDataset> {
        let response = self
            .get_json(self.endpoint(&["tests", "datasets", dataset_name]))
            .await?;
        Ok(reconcile(response))
    }

    async fn fetch_single_test(&self, test_id: i64) -> Result<TestRecord> {
        let raw: RawTestRecord = self
            .get_json(self.endpoint(&["tests", &test_id.to_string()]))
            .await?;
        let hint = raw.is_passing;

        let record = TestRecord::from_raw(raw, RecordSource::Single);
        if hint.is_some_and(|h| h != record.is_passing()) {
            warn!(
                test_id,
                api_is_passing = ?hint,
                "API outcome disagrees with match sets"
            );
        }
        check_disjoint(&record);
        Ok(record)
    }
}
