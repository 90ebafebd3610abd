//! Advanced search endpoint.
//!
//! GET /api/v1/search/advanced?query=...&format=json|csv&withinIds=a,b

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use hub_search::{
    to_csv, AdvancedSearchRequest, OutputFormat, SearchResults, CSV_CONTENT_DISPOSITION,
    CSV_CONTENT_TYPE,
};

use crate::auth::CallerIdentity;
use crate::error::ApiError;
use crate::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AdvancedSearchParams {
    /// Search text. Supports AND, OR, NOT, "quoted phrases" and prefix*.
    pub query: Option<String>,
    /// `json` (default) or `csv`.
    pub format: Option<String>,
    /// Comma-separated content ids to search within.
    pub within_ids: Option<String>,
}

/// JSON success envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvancedSearchResponse {
    pub success: bool,
    pub data: SearchResults,
}

/// Parse the `withinIds` list. Blank entries are skipped; an empty list
/// means no restriction.
pub fn parse_within_ids(value: Option<&str>) -> Result<Option<Vec<Uuid>>, ApiError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let mut ids = Vec::new();
    for part in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let id = Uuid::parse_str(part).map_err(|_| {
            ApiError::validation_field("withinIds", format!("'{}' is not a valid id", part))
        })?;
        ids.push(id);
    }
    Ok(if ids.is_empty() { None } else { Some(ids) })
}

/// Search content visible to the caller.
///
/// All parameters are validated before any query runs.
#[utoipa::path(get, path = "/api/v1/search/advanced", tag = "Search",
    params(AdvancedSearchParams),
    responses(
        (status = 200, description = "Matching content (JSON, or CSV when format=csv)", body = AdvancedSearchResponse),
        (status = 400, description = "Invalid parameters", body = crate::error::ErrorResponse),
        (status = 500, description = "Search failed", body = crate::error::ErrorResponse)))]
pub async fn advanced_search(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    params: Result<Query<AdvancedSearchParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params?;
    let query = match params.query {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Err(ApiError::validation_field("query", "Search query is required")),
    };
    let format = OutputFormat::parse(params.format.as_deref())?;
    let within_ids = parse_within_ids(params.within_ids.as_deref())?;

    let request = AdvancedSearchRequest {
        query,
        caller,
        restrict_to_ids: within_ids,
    };
    let set = state.engine.execute(&request).await?;
    debug!(
        subsystem = "api",
        component = "advanced_search",
        format = format.as_str(),
        result_count = set.count(),
        "Rendering search response"
    );

    let response = match format {
        OutputFormat::Json => Json(AdvancedSearchResponse {
            success: true,
            data: SearchResults::new(request.query, &set),
        })
        .into_response(),
        OutputFormat::Csv => (
            [
                (header::CONTENT_TYPE, CSV_CONTENT_TYPE),
                (header::CONTENT_DISPOSITION, CSV_CONTENT_DISPOSITION),
            ],
            to_csv(&set.results)?,
        )
            .into_response(),
    };
    Ok(response)
}
