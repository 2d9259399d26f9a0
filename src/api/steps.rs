//! Next-step API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateNextStepRequest, NextStep, UpdateNextStepRequest};
use crate::AppState;

/// GET /api/projects/:id/periods/:periodId/steps - List next steps.
pub async fn list_next_steps(
    State(state): State<AppState>,
    Path((id, period_id)): Path<(String, String)>,
) -> ApiResult<Vec<NextStep>> {
    let steps = state.repo.list_next_steps(&id, &period_id).await?;
    success(steps)
}

/// POST /api/projects/:id/periods/:periodId/steps - Create a next step.
pub async fn create_next_step(
    State(state): State<AppState>,
    Path((id, period_id)): Path<(String, String)>,
    Json(request): Json<CreateNextStepRequest>,
) -> ApiResult<NextStep> {
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "Step description is required".to_string(),
        ));
    }

    let step = state
        .repo
        .create_next_step(&id, &period_id, &request)
        .await?;
    success(step)
}

/// PUT /api/steps/:id - Update a next step.
pub async fn update_next_step(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateNextStepRequest>,
) -> ApiResult<NextStep> {
    if let Some(description) = &request.description {
        if description.trim().is_empty() {
            return Err(AppError::Validation(
                "Step description cannot be empty".to_string(),
            ));
        }
    }

    let step = state.repo.update_next_step(&id, &request).await?;
    success(step)
}

/// DELETE /api/steps/:id - Delete a next step.
pub async fn delete_next_step(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_next_step(&id).await?;
    success(())
}
