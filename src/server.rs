// src/server.rs
// =============================================================================
// The HTTP face of the audit: one endpoint taking `?url=...`. Any method is
// answered the same way, GET being the usual one.
//
// - 200 with the AuditReport when the URL parses
// - 400 with {"error": "URL invalide"} when it is missing or malformed
//
// Both answers are JSON and marked `Cache-Control: no-store`. Network trouble
// on the audited site never changes the status code; it shows up inside the
// report instead.
// =============================================================================

use crate::audit::{validate_target, Auditor, ErrorBody};
use anyhow::Result;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub fn router(auditor: Auditor) -> Router {
    let state = Arc::new(auditor);

    Router::new()
        .route("/", any(audit))
        .route("/api/audit-lite", any(audit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(bind: SocketAddr, auditor: Auditor) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!(addr = %listener.local_addr()?, "audit endpoint listening");

    axum::serve(listener, router(auditor))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    // If the handler cannot be installed we just run until killed
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

// The query is read as a plain map so a missing or repeated `url` still goes
// through validation (a repeated key keeps its last value). A query that does
// not decode at all is treated like a missing `url`.
async fn audit(
    State(auditor): State<Arc<Auditor>>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Response {
    let params = match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            debug!(error = %rejection, "undecodable query string");
            HashMap::new()
        }
    };

    let target = match validate_target(params.get("url").map(String::as_str)) {
        Ok(url) => url,
        Err(e) => {
            let body = ErrorBody {
                error: e.to_string(),
            };
            return json_response(StatusCode::BAD_REQUEST, body);
        }
    };

    let report = auditor.run(&target).await;
    json_response(StatusCode::OK, report)
}

// Json sets a bare `application/json`; the header array overrides it
fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, JSON_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Json(body),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::AuditReport;
    use crate::checker::Fetcher;
    use crate::config::AuditSettings;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app() -> Router {
        let settings = AuditSettings {
            timeout: Duration::from_secs(5),
            ..AuditSettings::default()
        };
        let fetcher = Fetcher::new(&settings).unwrap();
        router(Auditor::new(fetcher, settings))
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, header::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let (status, headers, body) = send(app(), "/api/audit-lite").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");

        // Only the error field, nothing else
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "URL invalide" }));
    }

    #[tokio::test]
    async fn test_malformed_urls_are_bad_requests_without_probing() {
        let server = MockServer::start().await;
        // Host and port of a live server, but no scheme
        let schemeless = format!("/?url=127.0.0.1:{}/", server.address().port());

        for uri in [
            "/?url=",
            "/?url=%20%20",
            "/?url=not-a-url",
            "/api/audit-lite?url=example.com",
            schemeless.as_str(),
        ] {
            let (status, _, body) = send(app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            let error: ErrorBody = serde_json::from_slice(&body).unwrap();
            assert_eq!(error.error, "URL invalide");
        }

        let requests = server.received_requests().await.unwrap();
        assert!(requests.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_url_param_is_json_bad_request() {
        let (status, headers, body) = send(app(), "/?url=a&url=b").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(headers[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value, serde_json::json!({ "error": "URL invalide" }));
    }

    #[tokio::test]
    async fn test_other_methods_get_the_same_answer() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/audit-lite?url=nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let error: ErrorBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.error, "URL invalide");
    }

    #[tokio::test]
    async fn test_audit_returns_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Referrer-Policy", "no-referrer")
                    .set_body_string(r#"<a href="/missing">gone</a>"#),
            )
            .mount(&server)
            .await;

        let target = format!("{}/", server.uri());
        let uri = format!("/api/audit-lite?url={}", target);
        let (status, headers, body) = send(app(), &uri).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");

        let report: AuditReport = serde_json::from_slice(&body).unwrap();
        assert!(report.ok);
        assert_eq!(report.requested_url, target);
        assert_eq!(report.security.present, vec!["referrer-policy"]);
        assert_eq!(report.links.checked, 1);
        assert_eq!(report.links.broken, 1);
        assert_eq!(report.links.sample[0].status, 404);
    }

    #[tokio::test]
    async fn test_unreachable_target_is_still_ok() {
        let (status, _, body) = send(app(), "/?url=http://127.0.0.1:9/").await;

        assert_eq!(status, StatusCode::OK);
        let report: AuditReport = serde_json::from_slice(&body).unwrap();
        assert_eq!(report.sitemap.status, 0);
        assert!(report.security.present.is_empty());
        assert_eq!(report.links.checked, 0);
    }
}
