//! Axum route handlers: memo pages, form endpoints and the RPC API.

use crate::pages;
use crate::store::MemoStore;
use axum::extract::{Form, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use dated_memo_types::*;
use std::sync::Arc;
use std::time::Instant;

pub struct AppState {
    pub store: MemoStore,
    pub start_time: Instant,
}

pub fn router(state: Arc<AppState>) -> axum::Router {
    let cors = tower_http::cors::CorsLayer::permissive();

    axum::Router::new()
        .route("/", get(index))
        .route("/index", get(index))
        .route("/create_memo", post(create_memo))
        .route("/remove_memo", post(remove_memo))
        .route("/rpc/memos", get(list_memos))
        .route("/rpc/status", get(status))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
}

fn internal_error(e: impl std::fmt::Display) -> Response {
    log::error!("Request failed: {}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
}

// GET / and /index
pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    log::debug!("Main page entry");
    match state.store.list() {
        Ok(memos) => {
            for m in &memos {
                log::debug!("Memo: {:?}", m);
            }
            Html(pages::render_index(&memos)).into_response()
        }
        Err(e) => internal_error(e),
    }
}

// POST /create_memo
pub async fn create_memo(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateMemoForm>,
) -> Response {
    log::debug!("Create memo entry");
    match state.store.create(&form.time, &form.text) {
        Ok(_) => ACK_OK.into_response(),
        Err(e) if e.is_input_error() => {
            log::debug!("Rejected memo: {}", e);
            ACK_PARAMS_INVALID.into_response()
        }
        Err(e) => internal_error(e),
    }
}

// POST /remove_memo
pub async fn remove_memo(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RemoveMemoForm>,
) -> Response {
    log::debug!("Remove memo entry");
    match state.store.delete(&form.id) {
        Ok(_) => ACK_OK.into_response(),
        Err(e) if e.is_input_error() => {
            log::debug!("Rejected removal: {}", e);
            ACK_PARAMS_INVALID.into_response()
        }
        Err(e) => internal_error(e),
    }
}

// GET /rpc/memos
pub async fn list_memos(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<Vec<Memo>>>) {
    match state.store.list() {
        Ok(memos) => (StatusCode::OK, Json(RpcResponse::ok(memos))),
        Err(e) => {
            log::error!("Failed to list memos: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RpcResponse::err(e.to_string())),
            )
        }
    }
}

// GET /rpc/status
pub async fn status(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<RpcResponse<ServiceStatus>>) {
    let memo_count = state.store.count().unwrap_or_else(|e| {
        log::error!("Failed to count memos for status: {}", e);
        0
    });
    (
        StatusCode::OK,
        Json(RpcResponse::ok(ServiceStatus {
            running: true,
            uptime_secs: state.start_time.elapsed().as_secs(),
            memo_count,
        })),
    )
}

pub async fn not_found(headers: HeaderMap, uri: Uri) -> Response {
    log::debug!("Page not found: {}", uri);
    let bad_url = match headers.get(header::HOST).and_then(|h| h.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, uri.path()),
        None => uri.path().to_string(),
    };
    (
        StatusCode::NOT_FOUND,
        Html(pages::render_not_found(&bad_url, "/")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Db;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn test_app() -> (axum::Router, MemoStore) {
        test_app_with_db().0
    }

    fn test_app_with_db() -> ((axum::Router, MemoStore), Arc<Db>) {
        let db = Arc::new(Db::open(":memory:").unwrap());
        let store = MemoStore::new(db.clone());
        let state = Arc::new(AppState {
            store: store.clone(),
            start_time: Instant::now(),
        });
        ((router(state), store), db)
    }

    fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(resp: Response) -> String {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn create_then_list_page_shows_memo() {
        let (app, store) = test_app();

        let resp = app
            .clone()
            .oneshot(form_post("/create_memo", "time=01%2F15%2F2024&text=buy+milk"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "ok");
        assert_eq!(store.count().unwrap(), 1);

        for path in ["/", "/index"] {
            let resp = app
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            assert!(body_text(resp).await.contains("buy milk"));
        }
    }

    #[tokio::test]
    async fn create_with_bad_date_reports_params_invalid() {
        let (app, store) = test_app();

        let resp = app
            .oneshot(form_post("/create_memo", "time=13%2F40%2F2024&text=bad"))
            .await
            .unwrap();
        assert_eq!(body_text(resp).await, "params invalid");
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn remove_is_ok_for_existing_and_missing_ids() {
        let (app, store) = test_app();
        let memo = store.create("02/02/2024", "gone soon").unwrap();

        let resp = app
            .clone()
            .oneshot(form_post("/remove_memo", &format!("id={}", memo.id)))
            .await
            .unwrap();
        assert_eq!(body_text(resp).await, "ok");
        assert_eq!(store.count().unwrap(), 0);

        let resp = app
            .oneshot(form_post("/remove_memo", &format!("id={}", memo.id)))
            .await
            .unwrap();
        assert_eq!(body_text(resp).await, "ok");
    }

    #[tokio::test]
    async fn remove_with_malformed_id_reports_params_invalid() {
        let (app, store) = test_app();
        store.create("02/02/2024", "stays").unwrap();

        let resp = app
            .oneshot(form_post("/remove_memo", "id=not-an-id"))
            .await
            .unwrap();
        assert_eq!(body_text(resp).await, "params invalid");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn unknown_path_renders_not_found_page() {
        let (app, _) = test_app();

        let resp = app
            .oneshot(
                Request::get("/no/such/page")
                    .header(header::HOST, "memos.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let html = body_text(resp).await;
        assert!(html.contains("http://memos.test/no/such/page"));
        assert!(html.contains(r#"href="/""#));
    }

    #[tokio::test]
    async fn rpc_memos_lists_newest_first() {
        let (app, store) = test_app();
        store.create("01/10/2024", "first").unwrap();
        store.create("01/20/2024", "second").unwrap();

        let resp = app
            .oneshot(Request::get("/rpc/memos").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0]["text"], "second");
        assert_eq!(json["data"][1]["text"], "first");
        assert_eq!(json["data"][0]["type"], "dated_memo");
    }

    #[tokio::test]
    async fn status_reports_memo_count() {
        let (app, store) = test_app();
        store.create("05/05/2024", "one").unwrap();

        let resp = app
            .oneshot(Request::get("/rpc/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["data"]["running"], true);
        assert_eq!(json["data"]["memo_count"], 1);
    }

    #[tokio::test]
    async fn status_still_answers_when_counting_fails() {
        let ((app, _), db) = test_app_with_db();
        db.execute_raw("DROP TABLE documents").unwrap();

        let resp = app
            .oneshot(Request::get("/rpc/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(json["data"]["running"], true);
        assert_eq!(json["data"]["memo_count"], 0);
    }
}
