//! Results endpoints: affiliation lookup and CSV export

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use roracle_common::export::CSV_FILE_NAME;
use roracle_common::SessionContext;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::views::{load_results, ResultsView};
use crate::AppState;

/// Body carrying the pasted affiliation text
#[derive(Debug, Deserialize)]
pub struct ResultsRequest {
    /// One affiliation per line
    pub affiliation_text: String,
}

/// POST /api/results
///
/// Resolve each non-blank line of `affiliation_text`. Lines whose lookup
/// failed come back with `failed: true` and no organizations.
pub async fn lookup_results(
    State(state): State<AppState>,
    request: Result<Json<ResultsRequest>, JsonRejection>,
) -> ApiResult<Json<ResultsView>> {
    let Json(request) = request?;
    let session = SessionContext::new(request.affiliation_text);
    let view = load_results(state.api.as_ref(), &session, state.lookup_concurrency).await?;
    Ok(Json(view))
}

/// POST /api/results.csv
pub async fn export_results_csv(
    State(state): State<AppState>,
    request: Result<Json<ResultsRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(request) = request?;
    let session = SessionContext::new(request.affiliation_text);
    let view = load_results(state.api.as_ref(), &session, state.lookup_concurrency).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        view.to_csv()?,
    ))
}

/// Build results routes
pub fn results_routes() -> Router<AppState> {
    Router::new()
        .route("/api/results", post(lookup_results))
        .route("/api/results.csv", post(export_results_csv))
}
