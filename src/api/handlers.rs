//! HTTP request handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use super::server::AppState;
use crate::render::{render_dashboard, render_error};
use crate::report::{render_report, ErrorContext, ReportContext};

/// Standard JSON response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Build the report on the blocking pool; the workbook read is synchronous
async fn build_report(state: &AppState) -> Result<ReportContext, ErrorContext> {
    let config = Arc::clone(&state.report);
    match tokio::task::spawn_blocking(move || render_report(&config)).await {
        Ok(result) => result,
        Err(join_error) => Err(ErrorContext::unexpected(join_error)),
    }
}

/// GET / and /index - Dashboard page
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Response {
    match build_report(&state).await {
        Ok(ctx) => Html(render_dashboard(&ctx)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(render_error(&err)),
        )
            .into_response(),
    }
}

/// GET /api/v1/report - Report context as JSON
pub async fn report(State(state): State<Arc<AppState>>) -> Response {
    match build_report(&state).await {
        Ok(ctx) => Json(ApiResponse::ok(ctx)).into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::<ReportContext>::err(err.error_message)),
        )
            .into_response(),
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub workbook_present: bool,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        workbook_present: state.report.workbook_path.exists(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub sheets: Vec<String>,
}

/// GET /version - Server version and configured sheets
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        sheets: state.report.sheet_names(),
    }))
}
