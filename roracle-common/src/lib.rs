//! # RORacle Common Library
//!
//! Shared code for the RORacle workbench:
//! - Organization and test record models (wire and domain shapes)
//! - Test outcome aggregation (counts, precision, recall) and filtering
//! - Dataset bucket reconciliation
//! - Affiliation lookup summaries and CSV export
//! - Session context passed between views
//! - Configuration loading

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod reconcile;
pub mod results;
pub mod session;

pub use aggregate::{aggregate, filter_by, AggregateMetrics, FilterMode};
pub use classify::MatchKind;
pub use error::{Error, Result};
pub use model::{DatasetInfo, DatasetMeta, Organization, RecordSource, TestRecord};
pub use reconcile::{reconcile, ReconciledDataset};
pub use results::{AffiliationResult, ResultsSummary};
pub use session::SessionContext;
