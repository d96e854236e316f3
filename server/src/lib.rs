use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use docbase_core::{discover_sources, ingest_all, DocBase, DocBaseConfig, DocId, DocumentReport, Error, FullReport, SharedDocBase, Source};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct SearchResult {
    pub doc_id: DocId,
    pub name: String,
    pub similarity: f64,
    pub snippet: Option<String>,
}

#[derive(Deserialize)]
pub struct DocumentBody {
    pub name: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct AddResponse {
    pub doc_id: DocId,
    pub report: DocumentReport,
}

#[derive(Serialize)]
pub struct AnalyzeResponse {
    pub name: String,
    pub report: DocumentReport,
}

#[derive(Serialize)]
pub struct ReportResponse {
    #[serde(flatten)]
    pub report: FullReport,
    pub dimensions: usize,
}

/// Everything the service needs at startup.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    pub docbase: DocBaseConfig,
    /// Directory ingested at startup; the corpus is rebuilt on every start.
    pub corpus_dir: Option<PathBuf>,
    /// File extensions picked up from `corpus_dir`; empty means every file.
    pub extensions: Vec<String>,
    /// Required in `X-ADMIN-TOKEN` to add documents.
    pub admin_token: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub docbase: SharedDocBase,
    pub admin_token: Option<String>,
}

/// Build the document base and ingest the corpus directory, if any.
pub fn build_state(options: &AppOptions) -> Result<AppState> {
    let mut docbase = SharedDocBase::new(DocBase::new(options.docbase.clone())?);
    if let Some(dir) = &options.corpus_dir {
        let extensions: Vec<&str> = options.extensions.iter().map(String::as_str).collect();
        let sources = discover_sources(dir, &extensions)?;
        tracing::info!(dir = %dir.display(), files = sources.len(), "ingesting corpus");
        let batch = ingest_all(&mut docbase, sources);
        let db = docbase.read();
        tracing::info!(added = batch.added, skipped = batch.skipped, documents = db.document_count(), terms = db.term_count(), "corpus ready");
    }
    Ok(AppState { docbase, admin_token: options.admin_token.clone() })
}

pub fn build_app(options: &AppOptions) -> Result<Router> {
    Ok(router(build_state(options)?))
}

pub fn router(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/report", get(report_handler))
        .route("/documents", post(add_handler))
        .route("/documents/analyze", post(analyze_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let hits = state.docbase.search(&params.q).map_err(error_response)?;
    let total_hits = hits.len();
    let k = params.k.clamp(1, 100);

    // Raw query words for highlighting; the stems used for ranking rarely read well
    let raw_terms: Vec<String> = params.q.split_whitespace().map(|s| s.to_string()).collect();
    let results = {
        let db = state.docbase.read();
        hits.into_iter()
            .take(k)
            .map(|hit| {
                let snippet = db.document(&hit.doc_id).and_then(|d| snippet_from_text(&d.raw_text, &raw_terms));
                SearchResult { doc_id: hit.doc_id, name: hit.name, similarity: hit.similarity, snippet }
            })
            .collect()
    };

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<String>) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let db = state.docbase.read();
    match db.document(&DocId::from(doc_id)) {
        Some(doc) => Ok(Json(serde_json::json!({
            "doc_id": doc.id,
            "name": doc.name,
            "lang": doc.lang,
            "text": doc.raw_text,
        }))),
        None => Err((StatusCode::NOT_FOUND, "not found".into())),
    }
}

pub async fn report_handler(State(state): State<AppState>) -> Json<ReportResponse> {
    let db = state.docbase.read();
    Json(ReportResponse { report: db.full_report(), dimensions: db.dimension_count() })
}

async fn add_handler(State(state): State<AppState>, headers: HeaderMap, Json(body): Json<DocumentBody>) -> Result<(StatusCode, Json<AddResponse>), (StatusCode, String)> {
    authorize(&state, &headers)?;
    // the commit holds the write lock while it refreshes every vector; keep it off the async workers
    let docbase = state.docbase.clone();
    let (doc_id, report) = tokio::task::spawn_blocking(move || docbase.add_document(&Source::raw(body.name, body.text)))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(error_response)?;
    tracing::info!(%doc_id, terms = report.term_count, "document added");
    Ok((StatusCode::CREATED, Json(AddResponse { doc_id, report })))
}

async fn analyze_handler(State(state): State<AppState>, Json(body): Json<DocumentBody>) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let (name, report) = state.docbase.analyze_document(&Source::raw(body.name, body.text)).map_err(error_response)?;
    Ok(Json(AnalyzeResponse { name, report }))
}

fn error_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::EmptyQuery => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::AlreadyIndexed(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "request failed");
    }
    (status, err.to_string())
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}

fn snippet_from_text(text: &str, raw_terms: &[String]) -> Option<String> {
    if text.is_empty() { return None; }
    // first match (case-insensitive) of any raw term
    let first_idx = raw_terms
        .iter()
        .filter_map(|t| term_pattern(t))
        .find_map(|re| re.find(text).map(|m| m.start()));
    let snippet = match first_idx {
        Some(idx) => {
            let start = floor_char_boundary(text, idx.saturating_sub(100));
            let end = floor_char_boundary(text, (idx + 200).min(text.len()));
            text[start..end].to_string()
        }
        None => text.chars().take(200).collect(),
    };
    Some(highlight_terms(&snippet, raw_terms))
}

fn term_pattern(term: &str) -> Option<Regex> {
    if term.trim().is_empty() { return None; }
    RegexBuilder::new(&regex::escape(term)).case_insensitive(true).build().ok()
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while !s.is_char_boundary(idx) { idx -= 1; }
    idx
}

/// Escape the snippet text and wrap every term match in `<em>`.
fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut alternatives: Vec<String> = terms.iter().filter(|t| !t.trim().is_empty()).map(|t| regex::escape(t)).collect();
    // longest first so a term is never cut short by its own prefix
    alternatives.sort_by(|a, b| b.len().cmp(&a.len()));
    let Some(pat) = (!alternatives.is_empty())
        .then(|| RegexBuilder::new(&alternatives.join("|")).case_insensitive(true).build().ok())
        .flatten()
    else {
        return escape_html(snippet);
    };
    let mut out = String::with_capacity(snippet.len());
    let mut last = 0;
    for m in pat.find_iter(snippet) {
        out.push_str(&escape_html(&snippet[last..m.start()]));
        out.push_str("<em>");
        out.push_str(&escape_html(m.as_str()));
        out.push_str("</em>");
        last = m.end();
    }
    out.push_str(&escape_html(&snippet[last..]));
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
