//! Project API endpoints, including period-scoped views and field writes.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CreateProjectRequest, FieldName, Project, ProjectData, SetFieldRequest, UpdateProjectRequest,
};
use crate::AppState;

const MAX_NAME_LEN: usize = 255;

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Project name is required".to_string()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(AppError::Validation(format!(
            "Project name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

/// GET /api/projects - List all projects with their live values.
pub async fn list_projects(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let projects = state.repo.list_projects().await?;
    success(projects)
}

/// GET /api/projects/:id - Get a single project's live values.
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Project> {
    match state.repo.get_project(&id).await? {
        Some(project) => success(project),
        None => Err(AppError::NotFound(format!("Project {} not found", id))),
    }
}

/// POST /api/projects - Create a new project.
pub async fn create_project(
    State(state): State<AppState>,
    Json(request): Json<CreateProjectRequest>,
) -> ApiResult<Project> {
    validate_name(&request.name)?;

    let project = state.repo.create_project(&request).await?;
    success(project)
}

/// PUT /api/projects/:id - Update a project's live values.
pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> ApiResult<Project> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }

    let project = state.repo.update_project(&id, &request).await?;
    success(project)
}

/// DELETE /api/projects/:id - Delete a project and its period-scoped data.
pub async fn delete_project(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.repo.delete_project(&id).await?;
    success(())
}

/// GET /api/projects/:id/periods/:periodId - Project as of a period.
///
/// Live values with that period's overrides layered on top.
pub async fn get_project_for_period(
    State(state): State<AppState>,
    Path((id, period_id)): Path<(String, String)>,
) -> ApiResult<Project> {
    let project = state.repo.get_merged_project(&id, &period_id).await?;
    success(project)
}

/// PUT /api/projects/:id/periods/:periodId/fields/:fieldName - Write one
/// period-scoped field value. Rejected while the period is locked.
pub async fn set_project_field(
    State(state): State<AppState>,
    Path((id, period_id, field_name)): Path<(String, String, String)>,
    Json(request): Json<SetFieldRequest>,
) -> ApiResult<ProjectData> {
    let field = FieldName::from_str(&field_name).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown field name: {}", field_name))
    })?;

    let data = state
        .repo
        .set_project_field(&id, &period_id, field, &request)
        .await?;
    success(data)
}
