//! JSON API handlers.

use crate::config::PlannerConfig;
use crate::error::PlanError;
use crate::models::{parse_prefix_len, SubnetPlan};
use crate::processing::enumerate_limited;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Query or form fields of a planning request, all kept as raw text so bad
/// values reach [`SubnetParams::plan`] and get the JSON error body.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SubnetParams {
    pub subnet: Option<String>,
    pub prefix: Option<String>,
    pub limit: Option<String>,
}

/// Errors returned to HTTP clients as `400 {"error": ".."}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid input.")]
    InvalidInput,
    #[error(transparent)]
    Plan(#[from] PlanError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

impl SubnetParams {
    /// Validate the raw fields and plan the request.
    pub fn plan(&self, max_results: u64) -> Result<SubnetPlan, ApiError> {
        let subnet = non_empty(&self.subnet).ok_or(ApiError::InvalidInput)?;
        let prefix = non_empty(&self.prefix)
            .and_then(|prefix| parse_prefix_len(prefix).ok())
            .ok_or(ApiError::InvalidInput)?;
        let limit = match non_empty(&self.limit) {
            Some(limit) => Some(limit.parse::<u64>().map_err(|_| ApiError::InvalidInput)?),
            None => None,
        };
        Ok(enumerate_limited(subnet, prefix, limit, max_results)?)
    }
}

fn respond(params: &SubnetParams, config: &PlannerConfig) -> Result<Json<SubnetPlan>, ApiError> {
    match params.plan(config.max_results) {
        Ok(plan) => {
            log::info!(
                "planned {} -> /{}: returning {} of {}",
                plan.source(),
                plan.target_len(),
                plan.returned(),
                plan.total()
            );
            Ok(Json(plan))
        }
        Err(e) => {
            log::info!("rejected {params:?}: {e}");
            Err(e)
        }
    }
}

/// Requests the extractor cannot decode (duplicate fields, wrong content
/// type) are reported as invalid input.
fn rejected(rejection: impl std::fmt::Display) -> ApiError {
    log::info!("rejected malformed request: {rejection}");
    ApiError::InvalidInput
}

pub async fn subnet_query(
    State(config): State<Arc<PlannerConfig>>,
    query: Result<Query<SubnetParams>, QueryRejection>,
) -> Result<Json<SubnetPlan>, ApiError> {
    let Query(params) = query.map_err(rejected)?;
    respond(&params, &config)
}

pub async fn subnet_form(
    State(config): State<Arc<PlannerConfig>>,
    form: Result<Form<SubnetParams>, FormRejection>,
) -> Result<Json<SubnetPlan>, ApiError> {
    let Form(params) = form.map_err(rejected)?;
    respond(&params, &config)
}
