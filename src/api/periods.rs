//! Reporting period API endpoints.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};

use super::{success, ApiResponse, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateNextPeriodRequest, LockPeriodRequest, NextPeriodPreview, PeriodDetail, Project,
    ReportingPeriod, RolloverPreview, UpdatePeriodRequest,
};
use crate::AppState;

/// GET /api/periods - List all periods, newest first.
pub async fn list_periods(State(state): State<AppState>) -> ApiResult<Vec<ReportingPeriod>> {
    let periods = state.repo.list_periods().await?;
    success(periods)
}

/// GET /api/periods/current - The single active period.
pub async fn get_current_period(State(state): State<AppState>) -> ApiResult<ReportingPeriod> {
    match state.repo.get_current_period().await? {
        Some(period) => success(period),
        None => Err(AppError::NotFound("No active reporting period".to_string())),
    }
}

/// GET /api/periods/next - Preview the next period without creating it.
pub async fn get_next_period(State(state): State<AppState>) -> ApiResult<NextPeriodPreview> {
    let bounds = state.repo.preview_next_period().await?;
    success(bounds.preview())
}

/// POST /api/periods/create-next - Preview or perform the period rollover.
///
/// Without `confirmed: true` this only returns what would happen; the
/// rollover itself is a single transaction behind the confirmation.
pub async fn create_next_period(
    State(state): State<AppState>,
    Json(request): Json<CreateNextPeriodRequest>,
) -> Result<Response, AppError> {
    if !request.confirmed {
        let bounds = state.repo.preview_next_period().await?;
        let preview = RolloverPreview {
            message: format!(
                "This will lock the current period and create {}. Re-send with confirmed=true to proceed.",
                bounds.name()
            ),
            next_period: bounds.preview(),
            actions: vec![
                "Lock and deactivate the current period".to_string(),
                "Create the new active period".to_string(),
                "Copy each project's report fields forward".to_string(),
            ],
        };
        return Ok(Json(serde_json::json!({ "preview": true, "data": preview })).into_response());
    }

    let summary = state.repo.create_next_period().await?;
    Ok(ApiResponse::new(summary).into_response())
}

/// GET /api/periods/:id - Single period with its derived project count.
pub async fn get_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<PeriodDetail> {
    let period = state
        .repo
        .get_period(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Period {} not found", id)))?;
    let project_count = state.repo.count_period_projects(&id).await?;

    success(PeriodDetail {
        period,
        project_count,
    })
}

/// GET /api/periods/:id/projects - All projects merged with that period's overrides.
pub async fn list_period_projects(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Project>> {
    let projects = state.repo.list_period_projects(&id).await?;
    success(projects)
}

/// PUT /api/periods/:id - Update a period's core fields.
///
/// Locked periods reject this unless the body carries `force: true`.
pub async fn update_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdatePeriodRequest>,
) -> ApiResult<ReportingPeriod> {
    if let Some(name) = &request.period_name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Period name cannot be empty".to_string()));
        }
    }

    let period = state.repo.update_period(&id, &request).await?;
    success(period)
}

/// POST /api/periods/:id/lock - Explicitly lock a period.
pub async fn lock_period(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<LockPeriodRequest>,
) -> ApiResult<ReportingPeriod> {
    let period = state.repo.lock_period(&id, &request).await?;
    success(period)
}

/// DELETE /api/periods/:id - Delete an unlocked period.
pub async fn delete_period(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_period(&id).await?;
    success(())
}
