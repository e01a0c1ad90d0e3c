//! Results view: resolve pasted affiliation strings into organizations
//!
//! Distinct affiliations are looked up concurrently and re-associated by
//! index. A failed lookup degrades to an empty result for that affiliation
//! only.

use futures::stream::{self, StreamExt};
use roracle_common::export::results_to_csv;
use roracle_common::{AffiliationResult, Error, Result, ResultsSummary, SessionContext};
use serde::Serialize;
use tracing::{info, warn};

use crate::client::RorApi;

/// State of the results page
#[derive(Debug, Clone, Serialize)]
pub struct ResultsView {
    /// Non-blank input lines in input order
    pub affiliations: Vec<String>,
    /// One entry per distinct affiliation, first-seen order
    pub results: Vec<AffiliationResult>,
    pub summary: ResultsSummary,
}

impl ResultsView {
    /// Organizations for `affiliation`, empty if it was never looked up
    pub fn organizations_for(&self, affiliation: &str) -> &[roracle_common::Organization] {
        self.results
            .iter()
            .find(|r| r.affiliation == affiliation)
            .map(|r| r.organizations.as_slice())
            .unwrap_or(&[])
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.failed).count()
    }

    pub fn to_csv(&self) -> Result<String> {
        results_to_csv(&self.results)
    }
}

/// Look up every affiliation in `session`, at most `concurrency` at a time
pub async fn load_results(
    api: &dyn RorApi,
    session: &SessionContext,
    concurrency: usize,
) -> Result<ResultsView> {
    let affiliations: Vec<String> = session
        .affiliations()
        .into_iter()
        .map(str::to_string)
        .collect();
    if affiliations.is_empty() {
        return Err(Error::InvalidInput(
            "no affiliation strings supplied".to_string(),
        ));
    }

    let distinct: Vec<String> = session
        .distinct_affiliations()
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut slots: Vec<Option<AffiliationResult>> = vec![None; distinct.len()];

    // Each lookup owns its affiliation; completion order is arbitrary
    let completed: Vec<(usize, String, Result<Vec<roracle_common::Organization>>)> =
        stream::iter(distinct.into_iter().enumerate())
            .map(move |(index, affiliation)| async move {
                let outcome = api.fetch_organizations(&affiliation).await;
                (index, affiliation, outcome)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    for (index, affiliation, outcome) in completed {
        slots[index] = Some(match outcome {
            Ok(organizations) => AffiliationResult::found(affiliation, organizations),
            Err(e) => {
                warn!(
                    affiliation = %affiliation,
                    error = %e,
                    "Affiliation lookup failed (recording no organizations)"
                );
                AffiliationResult::failed(affiliation)
            }
        });
    }

    let results: Vec<AffiliationResult> = slots.into_iter().flatten().collect();
    let summary = ResultsSummary::compute(affiliations.len(), &results);

    info!(
        affiliations = summary.affiliation_count,
        distinct = results.len(),
        organizations = summary.organization_count,
        failed = results.iter().filter(|r| r.failed).count(),
        "Results view loaded"
    );

    Ok(ResultsView {
        affiliations,
        results,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;
    use roracle_common::Organization;

    fn org(id: &str, name: &str) -> Organization {
        Organization::new(id, vec![name.to_string()], "")
    }

    fn mock() -> MockApi {
        let mut api = MockApi::default();
        api.organizations.insert(
            "MIT".to_string(),
            vec![org("https://ror.org/042nb2s44", "Massachusetts Institute of Technology")],
        );
        api.organizations.insert(
            "Harvard Medical School, Boston".to_string(),
            vec![
                org("https://ror.org/03vek6s52", "Harvard University"),
                org("https://ror.org/04b6nzv94", "Harvard Medical School"),
            ],
        );
        api.failing.push("Broken Lookup Institute".to_string());
        api
    }

    #[tokio::test]
    async fn test_results_keyed_to_originating_affiliation() {
        let api = mock();
        let session = SessionContext::new("MIT\nHarvard Medical School, Boston\nUnknown Lab");

        let view = load_results(&api, &session, 4).await.unwrap();

        let affiliations: Vec<&str> = view.results.iter().map(|r| r.affiliation.as_str()).collect();
        assert_eq!(
            affiliations,
            vec!["MIT", "Harvard Medical School, Boston", "Unknown Lab"]
        );
        assert_eq!(view.organizations_for("MIT")[0].id, "https://ror.org/042nb2s44");
        assert_eq!(view.organizations_for("Harvard Medical School, Boston").len(), 2);
        assert!(view.organizations_for("Unknown Lab").is_empty());
        assert_eq!(view.summary.organization_count, 3);
        assert!((view.summary.average_per_affiliation - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_failed_lookup_isolated_from_siblings() {
        let api = mock();
        let session = SessionContext::new("MIT\nBroken Lookup Institute\nHarvard Medical School, Boston");

        let view = load_results(&api, &session, 4).await.unwrap();

        assert_eq!(view.results.len(), 3);
        assert_eq!(view.failed_count(), 1);
        let broken = &view.results[1];
        assert_eq!(broken.affiliation, "Broken Lookup Institute");
        assert!(broken.failed);
        assert!(broken.organizations.is_empty());
        assert!(!view.results[0].failed);
        assert_eq!(view.results[0].organizations.len(), 1);
        assert_eq!(view.results[2].organizations.len(), 2);
    }

    #[tokio::test]
    async fn test_duplicates_looked_up_once() {
        let api = mock();
        let session = SessionContext::new("MIT\n\nMIT\nUnknown Lab\n");

        let view = load_results(&api, &session, 1).await.unwrap();

        assert_eq!(api.lookup_count(), 2);
        assert_eq!(view.affiliations.len(), 3);
        assert_eq!(view.summary.affiliation_count, 3);
        assert_eq!(view.results.len(), 2);
        assert!((view.summary.average_per_affiliation - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_lookups_bounded_by_concurrency() {
        let api = mock();
        let session = SessionContext::new("Lab A\nLab B\nLab C\nLab D\nLab E");

        let view = load_results(&api, &session, 2).await.unwrap();

        assert_eq!(view.results.len(), 5);
        assert_eq!(api.lookup_count(), 5);
        assert_eq!(api.max_in_flight(), 2);
    }

    #[tokio::test]
    async fn test_blank_session_rejected() {
        let api = mock();
        let err = load_results(&api, &SessionContext::new("  \n"), 4)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert_eq!(api.lookup_count(), 0);
    }

    #[tokio::test]
    async fn test_csv_export_from_view() {
        let api = mock();
        let session = SessionContext::new("MIT\nBroken Lookup Institute");
        let view = load_results(&api, &session, 2).await.unwrap();

        assert_eq!(
            view.to_csv().unwrap(),
            "Affiliation,ROR IDs\n\"MIT\",\"https://ror.org/042nb2s44\"\n\"Broken Lookup Institute\",\"\"\n"
        );
    }
}
