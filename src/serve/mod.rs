mod store;
mod templates;

use anyhow::{Context, Result};
use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use clap::Args;
use serde::Deserialize;
use serde_json::json;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

use crate::fetch::AgentFetcher;
use crate::http::{HttpClient, ReqwestClient};
use crate::telemetry;
use crate::telemetry::ops::serve::Phase as ServePhase;
use crate::util::time::session_key;

pub use store::ResultStore;

const BIND_ENV: &str = "AGENT_VIEWER_BIND";
const DEFAULT_BIND: &str = "0.0.0.0:5000";

#[derive(Args, Debug)]
pub struct ServeCmd {
    /// Listen address; falls back to AGENT_VIEWER_BIND, then 0.0.0.0:5000
    #[arg(long)] bind: Option<String>,
    #[arg(long, default_value_t = 30)] timeout: u64, // seconds, per fetch
}

pub struct AppState<C> {
    fetcher: AgentFetcher<C>,
    store: ResultStore,
}

impl<C: HttpClient> AppState<C> {
    pub fn new(fetcher: AgentFetcher<C>, store: ResultStore) -> Self {
        AppState { fetcher, store }
    }
}

pub async fn run(args: ServeCmd) -> Result<ExitCode> {
    let log = telemetry::serve();
    let addr = resolve_bind(args.bind.as_deref(), std::env::var(BIND_ENV).ok().as_deref());
    let (listener, app) = {
        let _s = log.span_kv(&ServePhase::Startup, [("bind", addr.clone()), ("timeout", args.timeout.to_string())]).entered();
        let fetcher = AgentFetcher::new(ReqwestClient::new()?, Duration::from_secs(args.timeout));
        let state = Arc::new(AppState::new(fetcher, ResultStore::new()));
        let listener = tokio::net::TcpListener::bind(&addr).await.with_context(|| format!("bind {addr}"))?;
        (listener, build_router(state))
    };
    log.info(format!("🚀 Agent viewer listening on http://{}", addr));
    axum::serve(listener, app).await.context("serve")?;
    Ok(ExitCode::SUCCESS)
}

fn resolve_bind(flag: Option<&str>, env: Option<&str>) -> String {
    flag.or(env).filter(|s| !s.trim().is_empty()).unwrap_or(DEFAULT_BIND).to_string()
}

pub fn build_router<C: HttpClient + 'static>(state: Arc<AppState<C>>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/fetch", post(fetch_agent::<C>))
        .route("/view/{key}", get(view_agent::<C>))
        .route("/api/data/{key}", get(agent_data::<C>))
        .route("/list", get(list_agents::<C>))
        .with_state(state)
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                }),
        )
}

// --- Handlers ---

#[derive(Deserialize)]
struct FetchForm {
    #[serde(default)]
    url: String,
}

async fn index() -> impl IntoResponse {
    Html(templates::render_index())
}

async fn fetch_agent<C: HttpClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Form(form): Form<FetchForm>,
) -> Response {
    let url = form.url.trim();
    if url.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "URL is required" }))).into_response();
    }
    let log = telemetry::serve();
    let span = log.span_kv(&ServePhase::Handle, [("url", url.to_string())]);
    let result = state.fetcher.fetch(url).instrument(span).await;
    let key = session_key(Utc::now());
    state.store.insert(key.clone(), result);
    log.info(format!("stored result {} ({} total)", key, state.store.len()));
    Redirect::to(&format!("/view/{key}")).into_response()
}

async fn view_agent<C: HttpClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(key): Path<String>,
) -> Response {
    match state.store.get(&key) {
        Some(result) => Html(templates::render_view(&key, &result)).into_response(),
        None => (StatusCode::NOT_FOUND, "Agent data not found").into_response(),
    }
}

async fn agent_data<C: HttpClient + 'static>(
    State(state): State<Arc<AppState<C>>>,
    Path(key): Path<String>,
) -> Response {
    match state.store.get(&key) {
        Some(result) => Json(result).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({ "error": "Agent data not found" }))).into_response(),
    }
}

async fn list_agents<C: HttpClient + 'static>(State(state): State<Arc<AppState<C>>>) -> impl IntoResponse {
    Html(templates::render_list(&state.store.list()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::stub::{Canned, StubClient};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use tower::ServiceExt;

    const AGENT: &str = "https://cursor.com/agents?selectedBcId=bc-89bdb1ce-f9e2-4db0-a1f4-e703b692633a";

    fn app() -> (Router, Arc<AppState<StubClient>>) {
        let client = StubClient::new().route(AGENT, Canned::Status(200, "application/json", br#"{"id":"bc-89bdb1ce-f9e2-4db0-a1f4-e703b692633a"}"#.to_vec()));
        let state = Arc::new(AppState::new(AgentFetcher::new(client, Duration::from_secs(5)), ResultStore::new()));
        (build_router(state.clone()), state)
    }

    fn form(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/fetch")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_text(resp: Response) -> String {
        String::from_utf8(to_bytes(resp.into_body(), usize::MAX).await.unwrap().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_serves_form() {
        let (app, _) = app();
        let resp = app.oneshot(get("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains(r#"action="/fetch""#));
    }

    #[tokio::test]
    async fn empty_url_is_bad_request() {
        let (app, state) = app();
        let resp = app.clone().oneshot(form("url=%20%20")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(v, json!({"error": "URL is required"}));
        let resp = app.oneshot(form("")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.len(), 0);
    }

    #[tokio::test]
    async fn fetch_stores_and_redirects_to_view() {
        let (app, state) = app();
        let encoded: String = url::form_urlencoded::byte_serialize(AGENT.as_bytes()).collect();
        let resp = app.clone().oneshot(form(&format!("url={encoded}"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert!(location.starts_with("/view/"));
        assert_eq!(state.store.len(), 1);

        let resp = app.clone().oneshot(get(&location)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("bc-89bdb1ce-f9e2-4db0-a1f4-e703b692633a"));

        let key = location.trim_start_matches("/view/");
        let resp = app.clone().oneshot(get(&format!("/api/data/{key}"))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(v["status_code"], json!(200));
        assert_eq!(v["payload"]["kind"], json!("json"));

        let resp = app.oneshot(get("/list")).await.unwrap();
        assert!(body_text(resp).await.contains(&format!("/view/{key}")));
    }

    #[tokio::test]
    async fn unknown_keys_are_not_found() {
        let (app, _) = app();
        let resp = app.clone().oneshot(get("/view/123")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(resp).await, "Agent data not found");

        let resp = app.oneshot(get("/api/data/123")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let v: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
        assert_eq!(v["error"], json!("Agent data not found"));
    }

    #[test]
    fn bind_precedence() {
        assert_eq!(resolve_bind(Some("127.0.0.1:8080"), Some("0.0.0.0:9000")), "127.0.0.1:8080");
        assert_eq!(resolve_bind(None, Some("0.0.0.0:9000")), "0.0.0.0:9000");
        assert_eq!(resolve_bind(None, None), DEFAULT_BIND);
        assert_eq!(resolve_bind(None, Some("  ")), DEFAULT_BIND);
    }
}
