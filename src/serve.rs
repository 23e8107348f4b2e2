use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::trace::TraceLayer;
use tracing::{span, Level};
use txr_resolver::ResolverConfig;
use txr_types::ConceptRecord;

#[derive(Clone)]
struct AppState {
    config: Arc<ResolverConfig>,
}

/// Wraps resolver/adapter/IO failures the way `anyhow::Error` is wrapped
/// at a service boundary: anything that reaches this path is a bug or an
/// infrastructure failure, never an expected "not found" outcome (those are
/// translated to their own response shapes below).
struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Deserialize)]
struct LookupParams {
    label: String,
    #[serde(default = "default_lang")]
    lang: String,
    source: String,
}

#[derive(Deserialize)]
struct LabelsParams {
    uri: String,
    #[serde(default)]
    languages: String,
    source: String,
}

#[derive(Deserialize)]
struct LabelsBatchBody {
    uris: Vec<String>,
    languages: Vec<String>,
    source: String,
}

#[derive(Deserialize)]
struct HierarchyParams {
    label: String,
    #[serde(default = "default_lang")]
    lang: String,
    source: String,
}

/// The external `/lookup` response shape, distinct from the on-disk
/// `ConceptRecord`: `altLabel` (a per-language map) becomes the flat
/// `altLabels` list for the lookup's own `lang`, and `narrower` is always
/// emitted empty — no adapter ever populates a narrower set, and
/// `wikipediaUrl` is `None` unless an adapter supplies one, rather than
/// inferring a value upstream never gave us.
#[derive(Serialize)]
struct LookupResponse {
    uri: String,
    #[serde(rename = "prefLabel")]
    pref_label: String,
    #[serde(rename = "altLabels")]
    alt_labels: Vec<String>,
    broader: Vec<BroaderResponse>,
    narrower: Vec<BroaderResponse>,
    source: String,
    labels: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(rename = "wikipediaUrl", skip_serializing_if = "Option::is_none")]
    wikipedia_url: Option<String>,
}

#[derive(Serialize)]
struct BroaderResponse {
    uri: String,
    label: String,
}

impl LookupResponse {
    fn from_record(record: ConceptRecord, lang: &str) -> Self {
        let alt_labels = record
            .alt_label
            .as_ref()
            .and_then(|m| m.get(lang))
            .cloned()
            .unwrap_or_default();
        LookupResponse {
            uri: record.uri,
            pref_label: record.pref_label,
            alt_labels,
            broader: record
                .broader
                .into_iter()
                .map(|b| BroaderResponse { uri: b.uri, label: b.label })
                .collect(),
            narrower: Vec::new(),
            source: record.source.as_str().to_string(),
            labels: record.labels.unwrap_or_default(),
            description: record.description,
            wikipedia_url: record.wikipedia_url,
        }
    }
}

#[derive(Serialize)]
struct LabelsResponse {
    uri: String,
    labels: HashMap<String, String>,
    source: String,
}

#[derive(Serialize)]
struct LabelsBatchResponse {
    labels: HashMap<String, HashMap<String, String>>,
    source: String,
}

#[derive(Serialize)]
struct HierarchyResponse {
    label: String,
    paths: Vec<String>,
    found: bool,
    source: String,
    uri_map: HashMap<String, String>,
}

fn default_lang() -> String {
    "en".to_string()
}

fn split_languages(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// `GET /lookup` → the concept's external shape, or a 404 when the
/// resolver reports authoritative absence (translated to 404 here, not
/// inside the resolver).
async fn lookup_handler(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> Result<Response, AppError> {
    let span = span!(Level::INFO, "lookup", label = %params.label, lang = %params.lang, source = %params.source);
    let _enter = span.enter();

    let config = state.config.clone();
    let lang = params.lang.clone();
    let record = tokio::task::spawn_blocking(move || {
        txr_resolver::lookup(&config, &params.label, &params.lang, &params.source)
    })
    .await?;

    Ok(match record {
        Some(record) => Json(LookupResponse::from_record(record, &lang)).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    })
}

/// `GET /labels` → `{uri, labels, source}`; upstream/cache misses degrade to
/// an empty `labels` map rather than an error.
async fn labels_handler(
    State(state): State<AppState>,
    Query(params): Query<LabelsParams>,
) -> Result<Json<LabelsResponse>, AppError> {
    let span = span!(Level::INFO, "labels", uri = %params.uri, source = %params.source);
    let _enter = span.enter();

    let languages = split_languages(&params.languages);
    let config = state.config.clone();
    let uri = params.uri.clone();
    let source = params.source.clone();
    let labels = tokio::task::spawn_blocking(move || {
        txr_resolver::get_labels(&config, &params.uri, &languages, &params.source)
    })
    .await?;
    Ok(Json(LabelsResponse { uri, labels, source }))
}

/// `POST /labels/batch` → `{labels: {uri: {lang: string}}, source}`.
async fn labels_batch_handler(
    State(state): State<AppState>,
    Json(body): Json<LabelsBatchBody>,
) -> Result<Json<LabelsBatchResponse>, AppError> {
    let span = span!(Level::INFO, "labels_batch", source = %body.source, count = body.uris.len());
    let _enter = span.enter();

    let config = state.config.clone();
    let source = body.source.clone();
    let labels = tokio::task::spawn_blocking(move || {
        txr_resolver::get_labels_batch(&config, &body.uris, &body.languages, &body.source)
    })
    .await?;
    Ok(Json(LabelsBatchResponse { labels, source }))
}

/// `GET /hierarchy` → `{label, paths, found, source, uri_map}`, HTTP 200
/// even when `found=false`: hierarchy failure is a normal, informative
/// result, not an error.
async fn hierarchy_handler(
    State(state): State<AppState>,
    Query(params): Query<HierarchyParams>,
) -> Result<Json<HierarchyResponse>, AppError> {
    let span = span!(Level::INFO, "hierarchy", label = %params.label, lang = %params.lang, source = %params.source);
    let _enter = span.enter();

    let config = state.config.clone();
    let label = params.label.clone();
    let source = params.source.clone();
    let (paths, found, uri_map) = tokio::task::spawn_blocking(move || {
        txr_resolver::hierarchy_paths(&config, &params.label, &params.lang, &params.source)
    })
    .await?;
    Ok(Json(HierarchyResponse {
        label,
        paths,
        found,
        source,
        uri_map,
    }))
}

async fn cache_stats_handler(State(state): State<AppState>) -> Result<Json<txr_cache::CacheStats>, AppError> {
    let config = state.config.clone();
    let stats = tokio::task::spawn_blocking(move || txr_cache::cache_stats(&config.cache_dir)).await?;
    Ok(Json(stats))
}

async fn healthz() -> &'static str {
    "ok"
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/lookup", get(lookup_handler))
        .route("/labels", get(labels_handler))
        .route("/labels/batch", post(labels_batch_handler))
        .route("/hierarchy", get(hierarchy_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn serve(config: ResolverConfig, bind_addr: &str) -> Result<(), anyhow::Error> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let state = AppState {
            config: Arc::new(config),
        };
        let listener = tokio::net::TcpListener::bind(bind_addr).await?;
        tracing::info!(addr = bind_addr, "listening");
        axum::serve(listener, router(state)).await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tempfile::tempdir;
    use tower::ServiceExt;
    use txr_adapters::AdapterConfig;

    fn test_config(cache_dir: std::path::PathBuf) -> ResolverConfig {
        ResolverConfig {
            cache_dir,
            cache_ttl_secs: 60.0,
            adapters: AdapterConfig {
                agrovoc_base_url: "http://127.0.0.1:1".to_string(),
                dbpedia_lookup_base_url: "http://127.0.0.1:1".to_string(),
                dbpedia_data_base_url: "http://127.0.0.1:1".to_string(),
                wikidata_base_url: "http://127.0.0.1:1".to_string(),
                http_timeout_secs: 0.2,
                user_agent: "txr-test/0 (SKOS lookup service)".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn lookup_miss_is_404() {
        let dir = tempdir().unwrap();
        let state = AppState {
            config: Arc::new(test_config(dir.path().to_path_buf())),
        };
        let app = router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/lookup?label=xyzzy&lang=en&source=agrovoc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let dir = tempdir().unwrap();
        let state = AppState {
            config: Arc::new(test_config(dir.path().to_path_buf())),
        };
        let app = router(state);
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn hierarchy_miss_is_200_with_found_false() {
        let dir = tempdir().unwrap();
        let state = AppState {
            config: Arc::new(test_config(dir.path().to_path_buf())),
        };
        let app = router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/hierarchy?label=xyzzy&lang=en&source=agrovoc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["found"], false);
        assert_eq!(value["paths"].as_array().unwrap().len(), 0);
    }
}
