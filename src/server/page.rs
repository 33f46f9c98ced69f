//! HTML form page.

use super::api::{ApiError, SubnetParams};
use crate::config::PlannerConfig;
use crate::models::SubnetPlan;
use crate::output::text_header;
use askama::Template;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use std::sync::Arc;

/// The planner page, with the submitted fields echoed back.
#[derive(Template, Debug, Default)]
#[template(path = "index.html")]
pub struct IndexView {
    pub subnet: String,
    pub prefix: String,
    pub limit: String,
    pub warning: Option<String>,
    pub header: Option<String>,
    pub subnets: Vec<String>,
    pub error: Option<String>,
}

impl IndexView {
    pub fn new(params: &SubnetParams, result: Option<Result<SubnetPlan, ApiError>>) -> IndexView {
        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        let mut view = IndexView {
            subnet: field(&params.subnet),
            prefix: field(&params.prefix),
            limit: field(&params.limit),
            ..Default::default()
        };
        match result {
            Some(Ok(plan)) => {
                view.warning = plan.warning().map(|w| w.to_string());
                view.header = Some(text_header(&plan));
                view.subnets = plan.subnets().map(|net| net.to_string()).collect();
            }
            Some(Err(e)) => view.error = Some(e.to_string()),
            None => {}
        }
        view
    }
}

fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            log::error!("template rendering failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Template rendering error").into_response()
        }
    }
}

pub async fn index() -> Response {
    render_template(IndexView::new(&SubnetParams::default(), None))
}

pub async fn submit(
    State(config): State<Arc<PlannerConfig>>,
    Form(params): Form<SubnetParams>,
) -> Response {
    let result = params.plan(config.max_results);
    if let Err(e) = &result {
        log::info!("page request rejected: {e}");
    }
    render_template(IndexView::new(&params, Some(result)))
}
