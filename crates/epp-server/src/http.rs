//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use epp_core::{
    validate_enhanced_article, ArticleSummary, EnhancedArticleWithVersions,
    EnhancedArticlesNoContentWithTotal, ListingQuery, StoreError,
};

use crate::AppState;

/// Outcome of a write request
#[derive(Debug, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: bool,
    pub message: String,
}

impl ResultResponse {
    fn ok() -> Self {
        Self {
            result: true,
            message: "OK".to_string(),
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            result: false,
            message: message.into(),
        }
    }
}

fn storage_error(e: StoreError) -> (StatusCode, String) {
    error!("repository failure: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

/// Validate and store one article version
pub async fn post_preprint(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, Json<ResultResponse>) {
    let article = match validate_enhanced_article(&payload) {
        Ok(article) => article,
        Err(e) => {
            warn!(path = ?e.content_path(), "rejected preprint payload: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(ResultResponse::failed(format!(
                    "body sent failed validation: {}",
                    e
                ))),
            );
        }
    };

    match state.repository.store_enhanced_article(article).await {
        Ok(true) => (StatusCode::OK, Json(ResultResponse::ok())),
        Ok(false) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ResultResponse::failed("Unable to save result to database")),
        ),
        Err(e) => {
            let (status, message) = storage_error(e);
            (status, Json(ResultResponse::failed(message)))
        }
    }
}

/// Paginated content-free listing
pub async fn list_preprints(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<EnhancedArticlesNoContentWithTotal>, (StatusCode, String)> {
    state
        .repository
        .get_enhanced_articles_no_content(&query)
        .await
        .map(Json)
        .map_err(storage_error)
}

/// One summary per stored version
pub async fn list_summaries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ArticleSummary>>, (StatusCode, String)> {
    state
        .repository
        .get_enhanced_article_summaries()
        .await
        .map(Json)
        .map_err(storage_error)
}

#[derive(Debug, Default, Deserialize)]
pub struct VersionQuery {
    #[serde(default)]
    pub previews: bool,
}

/// Resolve a version id or manuscript id
pub async fn get_preprint(
    State(state): State<Arc<AppState>>,
    Path(identifier): Path<String>,
    Query(query): Query<VersionQuery>,
) -> Result<Json<EnhancedArticleWithVersions>, (StatusCode, String)> {
    state
        .repository
        .find_article_version(&identifier, query.previews)
        .await
        .map_err(storage_error)?
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("Unable to locate versions with id/msid {}", identifier),
            )
        })
}

/// Delete one version by id
pub async fn delete_preprint(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ResultResponse>, (StatusCode, String)> {
    if state
        .repository
        .delete_article_version(&id)
        .await
        .map_err(storage_error)?
    {
        Ok(Json(ResultResponse::ok()))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            format!("Article version not found: {}", id),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_router;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(Arc::new(AppState::in_memory()))
    }

    fn payload(id: &str, posted: &str, published: Option<&str>) -> Value {
        json!({
            "id": id,
            "msid": "12345",
            "doi": "10.7554/eLife.12345",
            "versionIdentifier": id.trim_start_matches("12345v"),
            "article": {
                "title": [{ "type": "Emphasis", "content": "In vivo" }, " imaging"],
                "abstract": "Abstract",
                "authors": [{ "familyNames": ["Doe"] }],
                "licenses": [],
                "content": [{ "type": "Heading", "id": "s1", "depth": 1, "content": "Introduction" }],
                "references": []
            },
            "preprintDoi": "10.1101/2024.01.01.000001",
            "preprintUrl": "https://www.biorxiv.org/content/10.1101/2024.01.01.000001",
            "preprintPosted": posted,
            "published": published
        })
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn store_then_resolve() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/preprints",
            Some(payload("12345v1", "2024-01-01T00:00:00Z", Some("2024-01-05T00:00:00Z"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "result": true, "message": "OK" }));

        send(
            &app,
            Method::POST,
            "/api/preprints",
            Some(payload("12345v2", "2024-02-01T00:00:00Z", Some("2024-02-05T00:00:00Z"))),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/api/preprints/12345", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"]["id"], "12345v2");
        assert!(body["versions"]["12345v1"].is_object());
        assert!(body["versions"]["12345v1"].get("article").is_none());
    }

    #[tokio::test]
    async fn malformed_content_is_bad_request() {
        let app = app();
        let mut bad = payload("12345v1", "2024-01-01T00:00:00Z", None);
        bad["article"]["content"] = json!([{ "type": "Table" }]);

        let (status, body) = send(&app, Method::POST, "/api/preprints", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["result"], false);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("$.article.content[0]"));

        let (status, _) = send(&app, Method::GET, "/api/preprints/12345v1?previews=true", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn previews_need_the_query_flag() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/api/preprints",
            Some(payload("12345v1", "2024-01-01T00:00:00Z", None)),
        )
        .await;

        let (status, _) = send(&app, Method::GET, "/api/preprints/12345v1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&app, Method::GET, "/api/preprints/12345v1?previews=true", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"]["published"], Value::Null);
    }

    #[tokio::test]
    async fn listings_and_summaries() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/api/preprints",
            Some(payload("12345v1", "2024-01-01T00:00:00Z", Some("2024-01-05T00:00:00Z"))),
        )
        .await;
        send(
            &app,
            Method::POST,
            "/api/preprints",
            Some(payload("12345v2", "2024-02-01T00:00:00Z", None)),
        )
        .await;

        let (status, body) = send(&app, Method::GET, "/api/preprint-summaries", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/preprints?page=1&perPage=10&order=asc&startDate=2024-01-01&useDate=firstPublished",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 1);
        assert_eq!(body["articles"][0]["id"], "12345v1");
        assert!(body["articles"][0]["article"].get("content").is_none());
    }

    #[tokio::test]
    async fn any_identifier_resolves_under_preprints() {
        let app = app();
        let mut stored = payload("summaries", "2024-01-01T00:00:00Z", Some("2024-01-05T00:00:00Z"));
        stored["msid"] = json!("summaries");
        let (status, _) = send(&app, Method::POST, "/api/preprints", Some(stored)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::GET, "/api/preprints/summaries", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["article"]["id"], "summaries");

        let (status, body) = send(&app, Method::GET, "/api/preprint-summaries", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "summaries");
    }

    #[tokio::test]
    async fn calendar_date_payload_is_accepted() {
        let app = app();
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/preprints",
            Some(payload("12345v1", "2024-01-01", Some("2024-01-05"))),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);

        let (_, body) = send(&app, Method::GET, "/api/preprints/12345v1", None).await;
        assert_eq!(body["article"]["preprintPosted"], "2024-01-01T00:00:00Z");
    }

    #[tokio::test]
    async fn delete_reports_absence() {
        let app = app();
        send(
            &app,
            Method::POST,
            "/api/preprints",
            Some(payload("12345v1", "2024-01-01T00:00:00Z", Some("2024-01-05T00:00:00Z"))),
        )
        .await;

        let (status, body) = send(&app, Method::DELETE, "/api/preprints/12345v1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], true);

        let (status, _) = send(&app, Method::DELETE, "/api/preprints/12345v1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
