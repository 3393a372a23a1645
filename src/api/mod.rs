//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints are mounted under `/api/v1`, except `/health` and, with
//! the `swagger-ui` feature, the documentation under `/swagger-ui`.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use utoipa::OpenApi;

    use super::*;
    use crate::persistence::LocalStore;
    use crate::service::ModerationService;
    use crate::upstream::ModerationApi;
    use crate::upstream::fake::FakeApi;

    async fn app_with(fake: FakeApi) -> Router {
        let api: Arc<dyn ModerationApi> = Arc::new(fake);
        let service = ModerationService::new(api, LocalStore::disabled(), 10, 50);
        let Ok(_) = service.refresh_listings().await else {
            panic!("initial refresh should succeed");
        };
        build_router().with_state(AppState {
            service: Arc::new(service),
        })
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let Ok(request) = builder.body(body) else {
            panic!("request should build");
        };
        let Ok(response) = app.oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_is_served_at_root() {
        let app = app_with(FakeApi::default()).await;
        let (status, body) = send(app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn listing_query_paginates_with_metadata() {
        let app = app_with(FakeApi::with_listings(15)).await;
        let (status, body) = send(
            app,
            Method::GET,
            "/api/v1/listings?statuses=pending&sort=oldest-first&page=2",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["pagination"],
            json!({"page": 2, "per_page": 10, "total": 15, "total_pages": 2})
        );
        let Some(rows) = body["data"].as_array() else {
            panic!("data should be an array");
        };
        assert_eq!(rows.len(), 5);
        assert_eq!(rows.first().map(|r| r["id"].clone()), Some(json!(11)));
        assert_eq!(body["data"][0]["status_label"], "On review");
    }

    #[tokio::test]
    async fn out_of_range_page_is_clamped() {
        let app = app_with(FakeApi::with_listings(3)).await;
        let (status, body) = send(app, Method::GET, "/api/v1/listings?page=40", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["page"], 1);
    }

    #[tokio::test]
    async fn negative_and_oversized_pages_are_clamped() {
        let app = app_with(FakeApi::with_listings(23)).await;
        let (status, body) = send(app.clone(), Method::GET, "/api/v1/listings?page=-3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["page"], 1);

        let (status, body) = send(app, Method::GET, "/api/v1/listings?page=99999999999", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["page"], 3);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
    }

    #[tokio::test]
    async fn malformed_query_is_rejected() {
        let app = app_with(FakeApi::default()).await;
        let (status, body) = send(app, Method::GET, "/api/v1/listings?sort=random", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1002);
    }

    #[tokio::test]
    async fn unknown_listing_is_not_found() {
        let app = app_with(FakeApi::with_listings(2)).await;
        let (status, body) = send(app, Method::GET, "/api/v1/listings/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], 2001);
    }

    #[tokio::test]
    async fn listing_details_include_neighbours() {
        let app = app_with(FakeApi::with_listings(4)).await;
        let (status, body) = send(
            app.clone(),
            Method::GET,
            "/api/v1/listings/2/neighbours?sort=newest-first",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"previous": 3, "next": 1}));

        let (status, body) = send(app, Method::GET, "/api/v1/listings/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Listing 2");
        assert_eq!(body["history"], json!([]));
    }

    #[tokio::test]
    async fn rejection_needs_a_reason() {
        let app = app_with(FakeApi::with_listings(1)).await;
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/listings/1/reject",
            Some(json!({"reason": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], 1001);
    }

    #[tokio::test]
    async fn request_changes_records_history() {
        let app = app_with(FakeApi::with_listings(1)).await;
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/listings/1/request-changes",
            Some(json!({"reason": "Photo problems", "comment": "add a photo"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["history"][0]["action_label"], "Returned for changes");
        assert_eq!(body["history"][0]["comment"], "add a photo");
    }

    #[tokio::test]
    async fn bulk_partial_failure_is_reported() {
        let mut fake = FakeApi::with_listings(3);
        fake.rejecting = [3].into_iter().collect();
        let app = app_with(fake).await;
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/listings/bulk",
            Some(json!({"ids": [1, 2, 3], "action": "approve"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], 5003);
        assert_eq!(body["error"]["details"], "failed listings: 3");
    }

    #[tokio::test]
    async fn bulk_success_reports_refresh() {
        let app = app_with(FakeApi::with_listings(3)).await;
        let (status, body) = send(
            app,
            Method::POST,
            "/api/v1/listings/bulk",
            Some(json!({"ids": [1, 2], "action": "reject", "reason": "Suspected fraud"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["decided"], 2);
        assert_eq!(body["refreshed_listings"], 3);
    }

    #[tokio::test]
    async fn theme_toggles() {
        let app = app_with(FakeApi::default()).await;
        let (_, body) = send(app.clone(), Method::GET, "/api/v1/preferences/theme", None).await;
        assert_eq!(body, json!({"theme": "light"}));

        let (status, body) = send(
            app.clone(),
            Method::POST,
            "/api/v1/preferences/theme/toggle",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"theme": "dark"}));

        let (_, body) = send(
            app,
            Method::PUT,
            "/api/v1/preferences/theme",
            Some(json!({"theme": "light"})),
        )
        .await;
        assert_eq!(body, json!({"theme": "light"}));
    }

    #[tokio::test]
    async fn stats_reject_unknown_period() {
        let app = app_with(FakeApi::default()).await;
        let (status, _) = send(app.clone(), Method::GET, "/api/v1/stats?period=year", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(app, Method::GET, "/api/v1/stats?period=today", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"], "today");
        assert_eq!(body["average_review_time"], "01:30");
    }

    #[tokio::test]
    async fn config_endpoints_serve_static_data() {
        let app = app_with(FakeApi::default()).await;
        let (_, reasons) = send(app.clone(), Method::GET, "/api/v1/config/reasons", None).await;
        assert_eq!(reasons.as_array().map(Vec::len), Some(6));

        let (_, defaults) = send(app, Method::GET, "/api/v1/query/defaults", None).await;
        assert_eq!(defaults["sort"], "newest-first");
        assert_eq!(defaults["page"], 1);
    }

    #[test]
    fn openapi_document_lists_endpoints() {
        let Ok(doc) = openapi::ApiDoc::openapi().to_json() else {
            panic!("document should serialize");
        };
        assert!(doc.contains("/api/v1/listings/{id}/neighbours"));
        assert!(doc.contains("/api/v1/listings/bulk"));
    }
}
