//! HTTP implementation of [`ModerationApi`].

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::wire::{
    AdsPage, Advertisement, DecisionAck, ErrorEnvelope, ReasonBody, WireActivityPoint,
    WireModerator, WireStatsSummary,
};
use super::{ListingBatch, ModerationApi};
use crate::domain::{
    ActivityPoint, Decision, Listing, ListingId, Moderator, StatsPeriod, StatsSummary,
};
use crate::error::ConsoleError;

/// `reqwest`-backed moderation API client.
#[derive(Debug, Clone)]
pub struct HttpModerationApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpModerationApi {
    /// Creates a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ConsoleError::Internal`] if the HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ConsoleError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConsoleError::Internal(format!("failed to build http client: {e}")))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConsoleError> {
        let response = self.client.get(self.url(path)).send().await?;
        decode(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ConsoleError> {
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        decode(request.send().await?).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ConsoleError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(ErrorEnvelope::message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("no details").to_string()
                } else {
                    body
                }
            });
        return Err(ConsoleError::Upstream {
            status: status.as_u16(),
            message,
        });
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ConsoleError::UpstreamUnavailable(format!("malformed response: {e}")))
}

/// Maps an upstream 404 on a listing path to [`ConsoleError::ListingNotFound`].
fn listing_scoped(id: ListingId, err: ConsoleError) -> ConsoleError {
    match err {
        ConsoleError::Upstream { status, .. } if status == StatusCode::NOT_FOUND.as_u16() => {
            ConsoleError::ListingNotFound(id)
        }
        other => other,
    }
}

#[async_trait]
impl ModerationApi for HttpModerationApi {
    async fn list_listings(&self, page: u32, limit: u32) -> Result<ListingBatch, ConsoleError> {
        let raw: AdsPage = self.get(&format!("/ads?page={page}&limit={limit}")).await?;
        let listings = raw
            .ads
            .into_iter()
            .filter_map(|ad| {
                let id = ad.id;
                match Listing::try_from(ad) {
                    Ok(listing) => Some(listing),
                    Err(e) => {
                        tracing::warn!(listing_id = id, error = %e, "skipping unreadable listing");
                        None
                    }
                }
            })
            .collect();
        Ok(ListingBatch {
            listings,
            page: raw.pagination.current_page,
            total_pages: raw.pagination.total_pages,
            total_items: raw.pagination.total_items,
        })
    }

    async fn get_listing(&self, id: ListingId) -> Result<Listing, ConsoleError> {
        let ad: Advertisement = self
            .get(&format!("/ads/{id}"))
            .await
            .map_err(|e| listing_scoped(id, e))?;
        Listing::try_from(ad)
    }

    async fn submit_decision(
        &self,
        id: ListingId,
        decision: &Decision,
    ) -> Result<Listing, ConsoleError> {
        let ack: DecisionAck = match decision {
            Decision::Approve => {
                self.post::<_, ()>(&format!("/ads/{id}/approve"), None)
                    .await
            }
            Decision::Reject { reason, comment } => {
                let body = ReasonBody {
                    reason: reason.as_str(),
                    comment: comment.as_deref().unwrap_or(""),
                };
                self.post(&format!("/ads/{id}/reject"), Some(&body)).await
            }
            Decision::RequestChanges { reason, comment } => {
                let body = ReasonBody {
                    reason: reason.as_str(),
                    comment: comment.as_deref().unwrap_or(""),
                };
                self.post(&format!("/ads/{id}/request-changes"), Some(&body))
                    .await
            }
        }
        .map_err(|e| listing_scoped(id, e))?;
        Listing::try_from(ack.ad)
    }

    async fn stats_summary(&self, period: StatsPeriod) -> Result<StatsSummary, ConsoleError> {
        let raw: WireStatsSummary = self.get(&format!("/stats/summary?period={period}")).await?;
        Ok(raw.into())
    }

    async fn stats_activity(
        &self,
        period: StatsPeriod,
    ) -> Result<Vec<ActivityPoint>, ConsoleError> {
        let raw: Vec<WireActivityPoint> = self
            .get(&format!("/stats/chart/activity?period={period}"))
            .await?;
        Ok(raw.into_iter().map(ActivityPoint::from).collect())
    }

    async fn stats_categories(
        &self,
        period: StatsPeriod,
    ) -> Result<BTreeMap<String, u64>, ConsoleError> {
        self.get(&format!("/stats/chart/categories?period={period}"))
            .await
    }

    async fn current_moderator(&self) -> Result<Moderator, ConsoleError> {
        let raw: WireModerator = self.get("/moderators/me").await?;
        Ok(raw.into())
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::net::SocketAddr;

    use axum::extract::{Path, Query};
    use axum::http::StatusCode as AxumStatus;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{DecisionKind, ListingStatus};

    fn ad(id: u64, status: &str) -> Value {
        json!({
            "id": id,
            "title": format!("Listing {id}"),
            "description": "",
            "price": 1000 * id,
            "category": "Услуги",
            "categoryId": 4,
            "status": status,
            "priority": "normal",
            "createdAt": "2025-11-01T10:00:00Z",
            "updatedAt": "2025-11-01T10:00:00Z",
            "images": [],
            "characteristics": {},
            "moderationHistory": []
        })
    }

    async fn list(Query(q): Query<BTreeMap<String, String>>) -> Json<Value> {
        let page: u32 = q.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
        let ads = if page == 1 {
            vec![ad(1, "pending"), ad(2, "approved")]
        } else {
            vec![ad(3, "rejected")]
        };
        Json(json!({
            "ads": ads,
            "pagination": {"currentPage": page, "totalPages": 2, "totalItems": 3, "itemsPerPage": 2}
        }))
    }

    async fn one(Path(id): Path<u64>) -> Result<Json<Value>, (AxumStatus, Json<Value>)> {
        if id == 404 {
            return Err((AxumStatus::NOT_FOUND, Json(json!({"error": "Ad not found"}))));
        }
        Ok(Json(ad(id, "pending")))
    }

    async fn reject(Path(id): Path<u64>, Json(body): Json<Value>) -> Json<Value> {
        let mut listing = ad(id, "rejected");
        listing["moderationHistory"] = json!([{
            "id": 1, "moderatorId": 7, "moderatorName": "Anna",
            "action": "rejected",
            "reason": body["reason"], "comment": body["comment"],
            "timestamp": "2025-11-03T10:00:00Z"
        }]);
        Json(json!({"message": "ok", "ad": listing}))
    }

    async fn approve(Path(id): Path<u64>) -> Result<Json<Value>, (AxumStatus, Json<Value>)> {
        if id == 500 {
            return Err((
                AxumStatus::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "database is down"})),
            ));
        }
        Ok(Json(json!({"ad": ad(id, "approved")})))
    }

    async fn summary(Query(q): Query<BTreeMap<String, String>>) -> Json<Value> {
        let total = if q.get("period").map(String::as_str) == Some("today") {
            5
        } else {
            50
        };
        Json(json!({
            "totalReviewed": total,
            "totalReviewedToday": 5,
            "totalReviewedThisWeek": 30,
            "totalReviewedThisMonth": 50,
            "approvedPercentage": 60.0,
            "rejectedPercentage": 30.0,
            "requestChangesPercentage": 10.0,
            "averageReviewTime": 125
        }))
    }

    async fn spawn_fake() -> HttpModerationApi {
        let app = Router::new()
            .route("/api/v1/ads", get(list))
            .route("/api/v1/ads/{id}", get(one))
            .route("/api/v1/ads/{id}/approve", post(approve))
            .route("/api/v1/ads/{id}/reject", post(reject))
            .route("/api/v1/stats/summary", get(summary))
            .route(
                "/api/v1/stats/chart/categories",
                get(|| async { Json(json!({"Услуги": 4, "Мода": 1})) }),
            )
            .route(
                "/api/v1/moderators/me",
                get(|| async { Json(json!({"id": 7, "name": "Anna"})) }),
            );
        let Ok(listener) = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await
        else {
            panic!("should bind an ephemeral port");
        };
        let Ok(addr) = listener.local_addr() else {
            panic!("listener should have an address");
        };
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        let Ok(api) = HttpModerationApi::new(
            format!("http://{addr}/api/v1/"),
            Duration::from_secs(5),
        ) else {
            panic!("client should build");
        };
        api
    }

    #[tokio::test]
    async fn lists_a_page_of_listings() {
        let api = spawn_fake().await;
        assert!(!api.base_url().ends_with('/'));
        let Ok(batch) = api.list_listings(2, 2).await else {
            panic!("listing page should load");
        };
        assert_eq!(batch.page, 2);
        assert_eq!(batch.total_pages, 2);
        assert_eq!(batch.total_items, 3);
        let statuses: Vec<ListingStatus> = batch.listings.iter().map(|l| l.status).collect();
        assert_eq!(statuses, vec![ListingStatus::Rejected]);
    }

    #[tokio::test]
    async fn missing_listing_maps_to_not_found() {
        let api = spawn_fake().await;
        let result = api.get_listing(ListingId::new(404)).await;
        assert!(matches!(result, Err(ConsoleError::ListingNotFound(id)) if id.get() == 404));
    }

    #[tokio::test]
    async fn rejection_sends_reason_and_comment() {
        let api = spawn_fake().await;
        let decision = Decision::reject("Wrong category", Some("move to services".into()));
        let Ok(listing) = api.submit_decision(ListingId::new(8), &decision).await else {
            panic!("rejection should be accepted");
        };
        assert_eq!(listing.status, ListingStatus::Rejected);
        let Some(entry) = listing.moderation_history.latest() else {
            panic!("history should record the rejection");
        };
        assert_eq!(entry.action, DecisionKind::Rejected);
        assert_eq!(entry.reason.as_deref(), Some("Wrong category"));
        assert_eq!(entry.comment.as_deref(), Some("move to services"));
    }

    #[tokio::test]
    async fn upstream_error_body_becomes_message() {
        let api = spawn_fake().await;
        let result = api
            .submit_decision(ListingId::new(500), &Decision::Approve)
            .await;
        let Err(ConsoleError::Upstream { status, message }) = result else {
            panic!("expected upstream error, got {result:?}");
        };
        assert_eq!(status, 500);
        assert_eq!(message, "database is down");
    }

    #[tokio::test]
    async fn stats_and_moderator_decode() {
        let api = spawn_fake().await;
        let Ok(summary) = api.stats_summary(StatsPeriod::Today).await else {
            panic!("summary should load");
        };
        assert_eq!(summary.total_reviewed, 5);
        assert_eq!(summary.formatted_average_review_time(), "02:05");

        let Ok(categories) = api.stats_categories(StatsPeriod::Week).await else {
            panic!("categories should load");
        };
        assert_eq!(categories.get("Услуги"), Some(&4));

        let Ok(me) = api.current_moderator().await else {
            panic!("moderator should load");
        };
        assert_eq!(me.name, "Anna");
        assert_eq!(me.avatar_url, None);
    }

    #[tokio::test]
    async fn unreachable_api_is_unavailable() {
        let Ok(api) = HttpModerationApi::new("http://127.0.0.1:9", Duration::from_millis(500))
        else {
            panic!("client should build");
        };
        let result = api.current_moderator().await;
        assert!(matches!(result, Err(ConsoleError::UpstreamUnavailable(_))));
    }
}
