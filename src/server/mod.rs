//! HTTP front end.
//!
//! Routes:
//! - `GET /api/subnet?subnet=..&prefix=..[&limit=..]` and form `POST /api/subnet` - JSON plan
//! - `GET /` and form `POST /` - HTML page around the same computation
//! - `GET /health` - liveness check
//!
//! Running in the background is left to the host supervisor (see
//! `deploy/ipv6-subnet-planner.service`); `serve --log-file` keeps the logs.

mod api;
mod page;

use crate::config::PlannerConfig;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use std::error::Error;
use std::sync::Arc;

pub use api::{ApiError, SubnetParams};

/// Build the router; every handler shares the same read-only config.
pub fn router(config: PlannerConfig) -> Router {
    let state = Arc::new(config);
    Router::new()
        .route("/", get(page::index).post(page::submit))
        .route("/api/subnet", get(api::subnet_query).post(api::subnet_form))
        .route("/health", get(health))
        .with_state(state)
}

/// Listen on `config.bind` until Ctrl-C.
pub async fn serve(config: PlannerConfig) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .map_err(|e| format!("Error binding {}: {e}", config.bind))?;
    log::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("HTTP server error: {e}"))?;
    log::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for Ctrl-C: {e}");
    }
    log::info!("shutdown requested");
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        router(PlannerConfig {
            max_results: 1 << 16,
            ..Default::default()
        })
    }

    async fn send(request: Request<Body>) -> (StatusCode, String) {
        let response = test_app().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        assert_eq!(send(request).await, (StatusCode::OK, "OK".to_string()));
    }

    #[tokio::test]
    async fn test_api_get_plan() {
        let (status, value) = get_json("/api/subnet?subnet=3fff:1::/32&prefix=48").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["warning"], Value::Null);
        assert_eq!(value["total_count"], 65536);
        assert_eq!(value["returned_count"], 65536);
        let subnets = value["subnets"].as_array().unwrap();
        assert_eq!(subnets.len(), 65536);
        assert_eq!(subnets[0], "3fff:1::/48");
        assert_eq!(subnets[1], "3fff:1:1::/48");
    }

    #[tokio::test]
    async fn test_api_get_with_limit_and_warning() {
        let (status, value) =
            get_json("/api/subnet?subnet=2001:db8::/32&prefix=50&limit=2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(value["warning"]
            .as_str()
            .unwrap()
            .contains("nibble boundary"));
        assert_eq!(value["total_count"], 262144);
        assert_eq!(value["returned_count"], 2);
        assert_eq!(
            value["subnets"],
            json!(["2001:db8::/50", "2001:db8:0:4000::/50"])
        );
    }

    #[tokio::test]
    async fn test_api_invalid_input() {
        for uri in [
            "/api/subnet",
            "/api/subnet?subnet=3fff:1::/32",
            "/api/subnet?prefix=48",
            "/api/subnet?subnet=3fff:1::/32&prefix=abc",
            "/api/subnet?subnet=&prefix=48",
            "/api/subnet?subnet=3fff:1::/32&prefix=48&limit=-3",
        ] {
            let (status, value) = get_json(uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(value, json!({"error": "Invalid input."}), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_api_malformed_requests() {
        let (status, value) =
            get_json("/api/subnet?subnet=3fff:1::/32&subnet=2001:db8::/32&prefix=48").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value, json!({"error": "Invalid input."}));

        let request = Request::builder()
            .method("POST")
            .uri("/api/subnet")
            .body(Body::from("subnet=3fff%3A1%3A%3A%2F32&prefix=48"))
            .unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value, json!({"error": "Invalid input."}));
    }

    #[tokio::test]
    async fn test_api_plan_errors() {
        let (status, value) = get_json("/api/subnet?subnet=2001:db8::/40&prefix=32").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            value["error"],
            "New prefix /32 must be larger than the original prefix /40"
        );

        let (status, value) = get_json("/api/subnet?subnet=2001:db8::/40&prefix=129").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].as_str().unwrap().contains("out of range"));

        let (status, value) = get_json("/api/subnet?subnet=3fff:1::/32&prefix=64").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].as_str().unwrap().contains("use a limit"));

        let (status, value) = get_json("/api/subnet?subnet=nope&prefix=64").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(value["error"].as_str().unwrap().starts_with("Invalid input: 'nope'"));
    }

    #[tokio::test]
    async fn test_api_post_form() {
        let request = form_post("/api/subnet", "subnet=2001%3Adb8%3A%3A%2F32&prefix=36");
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["total_count"], 16);
        assert_eq!(value["warning"], Value::Null);
        assert_eq!(value["subnets"][15], "2001:db8:f000::/36");
    }

    #[tokio::test]
    async fn test_page_get_and_post() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form method=\"post\""));
        assert!(!body.contains("<ol>"));

        let request = form_post("/", "subnet=2001%3Adb8%3A%3A%2F32&prefix=34&limit=");
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<li>2001:db8:c000::/34</li>"));
        assert!(body.contains("nibble boundary"));
        assert!(body.contains("value=\"2001:db8::/32\""));

        let request = form_post("/", "subnet=%3Cscript%3E&prefix=48");
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
    }
}
