//! Axum route handlers for the course and resume endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::career::assistant::{ProcessedResume, DEFAULT_COURSE_RESULTS};
use crate::career::core_info::CoreInfo;
use crate::career::courses::{import_courses, ImportReport};
use crate::errors::AppError;
use crate::fallback::OperationOutcome;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImportCoursesRequest {
    pub courses: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendCoursesRequest {
    pub resume_text: String,
    #[serde(default)]
    pub target_role: Option<String>,
    #[serde(default)]
    pub max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendCoursesResponse {
    pub structured_resume: CoreInfo,
    pub recommendations: OperationOutcome,
}

#[derive(Debug, Deserialize)]
pub struct ProcessResumeRequest {
    pub resume_text: String,
    pub filename: String,
    #[serde(default)]
    pub target_role: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/courses/import
///
/// Adds scraped course records to the course index. Unusable records are skipped.
pub async fn handle_import_courses(
    State(state): State<AppState>,
    Json(request): Json<ImportCoursesRequest>,
) -> Result<Json<ImportReport>, AppError> {
    if request.courses.is_empty() {
        return Err(AppError::Validation("courses cannot be empty".to_string()));
    }

    let report = import_courses(&state.store, request.courses).await?;
    Ok(Json(report))
}

/// POST /api/v1/courses/recommend
///
/// Extracts skills from the resume, then searches, ranks and formats courses.
/// Always answers with text; `recommendations.resolution` says which path produced it.
pub async fn handle_recommend_courses(
    State(state): State<AppState>,
    Json(request): Json<RecommendCoursesRequest>,
) -> Result<Json<RecommendCoursesResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    let max_results = request.max_results.unwrap_or(DEFAULT_COURSE_RESULTS);
    if max_results == 0 {
        return Err(AppError::Validation("max_results must be at least 1".to_string()));
    }

    let core = state.assistant.core_info(&request.resume_text).await;
    let recommendations = state
        .assistant
        .recommend_courses(
            &request.resume_text,
            request.target_role.as_deref(),
            &core.skills_or_default(),
            max_results,
        )
        .await;

    Ok(Json(RecommendCoursesResponse {
        structured_resume: core,
        recommendations,
    }))
}

/// POST /api/v1/resumes/process
///
/// Runs every career operation for the resume and then adds it to the resume index.
pub async fn handle_process_resume(
    State(state): State<AppState>,
    Json(request): Json<ProcessResumeRequest>,
) -> Result<Json<ProcessedResume>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }

    let processed = state
        .assistant
        .process_resume(
            &request.resume_text,
            &request.filename,
            request.target_role.as_deref(),
        )
        .await?;
    Ok(Json(processed))
}
