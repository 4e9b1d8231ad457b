//! HTTP surface
//!
//! Thin JSON adapters over the core use cases: viewing reconciled state,
//! running the authorization flow, triggering an upload cycle and
//! downloading a local archive.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio_util::io::ReaderStream;

use cloudbak_core::domain::{BackupEntry, Slug};
use cloudbak_core::usecases::CycleOutcome;

use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/backups", get(list_backups))
        .route("/api/backups/{slug}/download", get(download_backup))
        .route("/api/status", get(status))
        .route("/api/auth/url", get(auth_url))
        .route("/api/auth/token", post(create_token))
        .route("/api/upload", post(run_upload))
        .with_state(state)
}

// ── Backups ──

#[derive(Serialize)]
struct BackupEntryBody {
    slug: Option<String>,
    name: String,
    date: String,
    size: String,
    in_local: bool,
    in_remote: bool,
}

impl From<BackupEntry> for BackupEntryBody {
    fn from(entry: BackupEntry) -> Self {
        Self {
            date: entry.formatted_date(),
            size: entry.formatted_size(),
            slug: entry.slug.map(|s| s.as_str().to_string()),
            name: entry.name,
            in_local: entry.in_local,
            in_remote: entry.in_remote,
        }
    }
}

async fn list_backups(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BackupEntryBody>>, AppError> {
    let entries = state.query.list().await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}

async fn download_backup(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let slug = Slug::new(slug).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let backup = state
        .query
        .find_local(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No local backup with slug {slug}")))?;

    let file = tokio::fs::File::open(&backup.path)
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e).context("Cannot open archive")))?;

    let file_name = backup
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("{slug}.tar"));

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "application/x-tar")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        )
        .body(Body::from_stream(ReaderStream::new(file)))
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(response)
}

// ── Status ──

#[derive(Serialize)]
struct StatusBody {
    authorized: bool,
    token_valid: bool,
    token_expires_at: Option<String>,
    last_cycle: Option<CycleOutcome>,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusBody> {
    let authorized = state.tokens.ensure_token().await;
    let token = state.tokens.token_state().await;

    Json(StatusBody {
        authorized,
        token_valid: token.as_ref().is_some_and(|t| !t.is_expired()),
        token_expires_at: token.map(|t| t.expires_at.to_rfc3339()),
        last_cycle: state.last_cycle.lock().await.clone(),
    })
}

// ── Authorization ──

#[derive(Serialize)]
struct AuthUrlBody {
    url: String,
}

async fn auth_url(State(state): State<Arc<AppState>>) -> Json<AuthUrlBody> {
    Json(AuthUrlBody {
        url: state.tokens.authorize_url(),
    })
}

#[derive(Deserialize)]
struct CreateTokenBody {
    check_code: String,
}

async fn create_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateTokenBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    if body.check_code.is_empty() {
        return Err(AppError::BadRequest("check_code is required".into()));
    }

    state
        .tokens
        .create_token(&body.check_code)
        .await
        .map_err(|e| AppError::BadRequest(format!("{e:#}")))?;

    Ok(Json(serde_json::json!({ "authorized": true })))
}

// ── Upload cycle ──

async fn run_upload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CycleOutcome>, AppError> {
    if !state.tokens.ensure_token().await {
        return Err(AppError::Conflict(
            "No access token; authorize first".into(),
        ));
    }

    let outcome = state.run_cycle().await?;
    Ok(Json(outcome))
}
