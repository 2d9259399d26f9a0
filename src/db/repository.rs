//! Database repository for all period, project, and period-scoped data operations.
//!
//! Uses prepared statements and transactions for data integrity. The period
//! rollover is the only multi-row mutation in the system and runs as a
//! single transaction so partial progress is never observable.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    merged_view, AiStage, Benefits, CreateNextStepRequest, CreateProjectRequest, FieldName,
    LockPeriodRequest, NextStep, Project, ProjectData, ProjectStage, ReportingPeriod,
    RolloverSummary, SetFieldRequest, UpdateNextStepRequest, UpdatePeriodRequest,
    UpdateProjectRequest, COPY_FORWARD_FIELDS,
};
use crate::schedule::{self, PeriodBounds};

const PERIOD_COLUMNS: &str = "id, period_start, period_end, period_name, is_active, is_locked, locked_at, data_snapshot";

const PROJECT_COLUMNS: &str = "id, name, description, business_lead, initiator, dev_team_lead, \
     project_start_date, current_project_stage, current_ai_stage, target_next_stage_date, \
     target_completion_date, budget, benefits, key_risks, key_updates, created_at, updated_at";

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== PERIOD QUERIES ====================

    /// List all periods, newest first.
    pub async fn list_periods(&self) -> Result<Vec<ReportingPeriod>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {PERIOD_COLUMNS} FROM periods ORDER BY period_start DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(period_from_row).collect())
    }

    /// Get a period by ID.
    pub async fn get_period(&self, id: &str) -> Result<Option<ReportingPeriod>, AppError> {
        let row = sqlx::query(&format!("SELECT {PERIOD_COLUMNS} FROM periods WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(period_from_row))
    }

    /// Get the active period.
    ///
    /// Ordered by start date in case the at-most-one-active invariant was
    /// ever violated by out-of-band writes.
    pub async fn get_current_period(&self) -> Result<Option<ReportingPeriod>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {PERIOD_COLUMNS} FROM periods WHERE is_active = 1 ORDER BY period_start DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(period_from_row))
    }

    /// Find a period covering exactly the given range.
    pub async fn find_period_by_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<ReportingPeriod>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {PERIOD_COLUMNS} FROM periods WHERE period_start = ? AND period_end = ?"
        ))
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(period_from_row))
    }

    /// Count distinct projects holding data in a period.
    pub async fn count_period_projects(&self, period_id: &str) -> Result<i64, AppError> {
        let row = sqlx::query(
            "SELECT COUNT(DISTINCT project_id) AS n FROM project_data WHERE period_id = ?",
        )
        .bind(period_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("n"))
    }

    // ==================== PERIOD LIFECYCLE ====================

    /// Compute the boundaries the next rollover would create.
    ///
    /// Pure preview with no side effects; chained from the active period's
    /// end date, or from today when no period exists yet (bootstrap).
    pub async fn preview_next_period(&self) -> Result<PeriodBounds, AppError> {
        match self.get_current_period().await? {
            Some(current) => Ok(schedule::period_after(current.period_end)),
            None => Ok(schedule::period_containing(Utc::now().date_naive())),
        }
    }

    /// Roll over to the next reporting period.
    ///
    /// Locks every active period, creates the new active one, and copies
    /// each project's snapshot-able fields forward, all in one transaction.
    pub async fn create_next_period(&self) -> Result<RolloverSummary, AppError> {
        let bounds = self.preview_next_period().await?;

        // Application-level guard against double-rolls; the unique index on
        // (period_start, period_end) closes the remaining race window.
        if self
            .find_period_by_range(bounds.start, bounds.end)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(format!(
                "Period {} ({} to {}) already exists",
                bounds.name(),
                bounds.start,
                bounds.end
            )));
        }

        self.rollover_into(bounds).await
    }

    /// The rollover transaction itself. Dropping the transaction on any
    /// error path rolls everything back.
    pub(crate) async fn rollover_into(
        &self,
        bounds: PeriodBounds,
    ) -> Result<RolloverSummary, AppError> {
        let now = Utc::now().to_rfc3339();
        let name = bounds.name();
        let new_id = uuid::Uuid::new_v4().to_string();

        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query(
            "UPDATE periods SET is_active = 0, is_locked = 1, locked_at = ? WHERE is_active = 1",
        )
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let locked_count = locked.rows_affected() as i64;

        let insert = sqlx::query(
            "INSERT INTO periods (id, period_start, period_end, period_name, is_active, is_locked) VALUES (?, ?, ?, ?, 1, 0)",
        )
        .bind(&new_id)
        .bind(bounds.start)
        .bind(bounds.end)
        .bind(&name)
        .execute(&mut *tx)
        .await;

        if let Err(err) = insert {
            if is_unique_violation(&err) {
                return Err(AppError::Conflict(format!(
                    "Period {} ({} to {}) already exists",
                    name, bounds.start, bounds.end
                )));
            }
            return Err(err.into());
        }

        let project_rows = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects"))
            .fetch_all(&mut *tx)
            .await?;
        let projects: Vec<Project> = project_rows.iter().map(project_from_row).collect();

        let mut copied_rows = 0i64;
        for project in &projects {
            for field in COPY_FORWARD_FIELDS {
                let value = match field {
                    FieldName::Benefits => Some(serde_json::to_string(&project.benefits)?),
                    FieldName::KeyRisks => project.key_risks.clone(),
                    FieldName::KeyUpdates => project.key_updates.clone(),
                    FieldName::Description => project.description.clone(),
                    _ => None,
                };
                let Some(value) = value else { continue };

                sqlx::query(
                    "INSERT INTO project_data (id, project_id, period_id, field_name, field_value) VALUES (?, ?, ?, ?, ?)",
                )
                .bind(uuid::Uuid::new_v4().to_string())
                .bind(&project.id)
                .bind(&new_id)
                .bind(field.as_str())
                .bind(&value)
                .execute(&mut *tx)
                .await?;
                copied_rows += 1;
            }
        }

        tx.commit().await?;

        tracing::info!(
            "Rollover committed: period {} created, {} projects copied ({} rows), {} periods locked",
            name,
            projects.len(),
            copied_rows,
            locked_count
        );

        let new_period = self.get_period(&new_id).await?.ok_or_else(|| {
            AppError::Internal("Rollover committed but new period row is missing".to_string())
        })?;

        Ok(RolloverSummary {
            new_period,
            copied_projects_count: projects.len() as i64,
            copied_data_records_count: copied_rows,
            locked_previous_periods_count: locked_count,
        })
    }

    /// Update a period's core fields.
    ///
    /// Locked periods reject this unless the request carries `force`.
    pub async fn update_period(
        &self,
        id: &str,
        request: &UpdatePeriodRequest,
    ) -> Result<ReportingPeriod, AppError> {
        let existing = self
            .get_period(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", id)))?;

        if existing.is_locked && !request.force {
            return Err(AppError::Locked(format!(
                "Period {} is locked and cannot be modified",
                existing.period_name
            )));
        }

        let start = request.period_start.unwrap_or(existing.period_start);
        let end = request.period_end.unwrap_or(existing.period_end);
        if start >= end {
            return Err(AppError::Validation(
                "periodStart must be before periodEnd".to_string(),
            ));
        }
        let name = request
            .period_name
            .clone()
            .unwrap_or(existing.period_name);

        let result = sqlx::query(
            "UPDATE periods SET period_start = ?, period_end = ?, period_name = ? WHERE id = ?",
        )
        .bind(start)
        .bind(end)
        .bind(&name)
        .bind(id)
        .execute(&self.pool)
        .await;

        if let Err(err) = result {
            if is_unique_violation(&err) {
                return Err(AppError::Conflict(format!(
                    "A period covering {} to {} already exists",
                    start, end
                )));
            }
            return Err(err.into());
        }

        tracing::info!("Period {} updated (force: {})", id, request.force);

        self.get_period(id).await?.ok_or_else(|| {
            AppError::Internal("Period row disappeared during update".to_string())
        })
    }

    /// Explicitly lock a period, optionally storing a snapshot payload.
    pub async fn lock_period(
        &self,
        id: &str,
        request: &LockPeriodRequest,
    ) -> Result<ReportingPeriod, AppError> {
        let existing = self
            .get_period(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", id)))?;

        if existing.is_locked {
            return Err(AppError::Conflict(format!(
                "Period {} is already locked",
                existing.period_name
            )));
        }

        let now = Utc::now().to_rfc3339();
        let snapshot_json = request
            .data_snapshot
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            "UPDATE periods SET is_active = 0, is_locked = 1, locked_at = ?, data_snapshot = ? WHERE id = ?",
        )
        .bind(&now)
        .bind(&snapshot_json)
        .bind(id)
        .execute(&self.pool)
        .await?;

        tracing::info!("Period {} locked at {}", existing.period_name, now);

        self.get_period(id).await?.ok_or_else(|| {
            AppError::Internal("Period row disappeared during lock".to_string())
        })
    }

    /// Delete a period. Blocked while locked; cascades period-scoped data.
    pub async fn delete_period(&self, id: &str) -> Result<(), AppError> {
        let existing = self
            .get_period(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", id)))?;

        if existing.is_locked {
            return Err(AppError::Locked(format!(
                "Period {} is locked and cannot be deleted",
                existing.period_name
            )));
        }

        sqlx::query("DELETE FROM periods WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        tracing::info!("Period {} deleted", existing.period_name);
        Ok(())
    }

    // ==================== PROJECT OPERATIONS ====================

    /// List all projects with their live values.
    pub async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(project_from_row).collect())
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        let row = sqlx::query(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(project_from_row))
    }

    /// Create a new project.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let benefits_json = serde_json::to_string(&request.benefits)?;

        sqlx::query(
            r#"INSERT INTO projects (
                id, name, description, business_lead, initiator, dev_team_lead,
                project_start_date, current_project_stage, current_ai_stage,
                target_next_stage_date, target_completion_date, budget,
                benefits, key_risks, key_updates, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.business_lead)
        .bind(&request.initiator)
        .bind(&request.dev_team_lead)
        .bind(&request.project_start_date)
        .bind(request.current_project_stage.as_str())
        .bind(request.current_ai_stage.as_str())
        .bind(&request.target_next_stage_date)
        .bind(&request.target_completion_date)
        .bind(&request.budget)
        .bind(&benefits_json)
        .bind(&request.key_risks)
        .bind(&request.key_updates)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!("Project {} created ({})", request.name, id);

        Ok(Project {
            id,
            name: request.name.clone(),
            description: request.description.clone(),
            business_lead: request.business_lead.clone(),
            initiator: request.initiator.clone(),
            dev_team_lead: request.dev_team_lead.clone(),
            project_start_date: request.project_start_date.clone(),
            current_project_stage: request.current_project_stage,
            current_ai_stage: request.current_ai_stage,
            target_next_stage_date: request.target_next_stage_date.clone(),
            target_completion_date: request.target_completion_date.clone(),
            budget: request.budget.clone(),
            benefits: request.benefits.clone(),
            key_risks: request.key_risks.clone(),
            key_updates: request.key_updates.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update a project's live values, merging provided fields over existing ones.
    pub async fn update_project(
        &self,
        id: &str,
        request: &UpdateProjectRequest,
    ) -> Result<Project, AppError> {
        let existing = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))?;

        let now = Utc::now().to_rfc3339();

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let description = request.description.clone().or(existing.description.clone());
        let business_lead = request
            .business_lead
            .clone()
            .or(existing.business_lead.clone());
        let initiator = request.initiator.clone().or(existing.initiator.clone());
        let dev_team_lead = request
            .dev_team_lead
            .clone()
            .or(existing.dev_team_lead.clone());
        let project_start_date = request
            .project_start_date
            .clone()
            .or(existing.project_start_date.clone());
        let current_project_stage = request
            .current_project_stage
            .unwrap_or(existing.current_project_stage);
        let current_ai_stage = request.current_ai_stage.unwrap_or(existing.current_ai_stage);
        let target_next_stage_date = request
            .target_next_stage_date
            .clone()
            .or(existing.target_next_stage_date.clone());
        let target_completion_date = request
            .target_completion_date
            .clone()
            .or(existing.target_completion_date.clone());
        let budget = request.budget.clone().or(existing.budget.clone());
        let benefits = request.benefits.clone().unwrap_or(existing.benefits.clone());
        let key_risks = request.key_risks.clone().or(existing.key_risks.clone());
        let key_updates = request.key_updates.clone().or(existing.key_updates.clone());
        let benefits_json = serde_json::to_string(&benefits)?;

        sqlx::query(
            r#"UPDATE projects SET
                name = ?, description = ?, business_lead = ?, initiator = ?, dev_team_lead = ?,
                project_start_date = ?, current_project_stage = ?, current_ai_stage = ?,
                target_next_stage_date = ?, target_completion_date = ?, budget = ?,
                benefits = ?, key_risks = ?, key_updates = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(name)
        .bind(&description)
        .bind(&business_lead)
        .bind(&initiator)
        .bind(&dev_team_lead)
        .bind(&project_start_date)
        .bind(current_project_stage.as_str())
        .bind(current_ai_stage.as_str())
        .bind(&target_next_stage_date)
        .bind(&target_completion_date)
        .bind(&budget)
        .bind(&benefits_json)
        .bind(&key_risks)
        .bind(&key_updates)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Project {
            id: id.to_string(),
            name: name.clone(),
            description,
            business_lead,
            initiator,
            dev_team_lead,
            project_start_date,
            current_project_stage,
            current_ai_stage,
            target_next_stage_date,
            target_completion_date,
            budget,
            benefits,
            key_risks,
            key_updates,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a project, cascading its period-scoped data and next steps.
    pub async fn delete_project(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Project {} not found", id)));
        }

        tracing::info!("Project {} deleted", id);
        Ok(())
    }

    // ==================== PERIOD-SCOPED DATA ====================

    /// Fetch the override rows for one (project, period) pair.
    pub async fn get_project_data(
        &self,
        project_id: &str,
        period_id: &str,
    ) -> Result<Vec<ProjectData>, AppError> {
        let rows = sqlx::query(
            "SELECT id, project_id, period_id, field_name, field_value FROM project_data WHERE project_id = ? AND period_id = ?",
        )
        .bind(project_id)
        .bind(period_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().filter_map(data_from_row).collect())
    }

    /// Write a single period-scoped field value.
    ///
    /// Rejected with a Locked error when the owning period is locked; this
    /// is the direct-write guard behind the period-level lock.
    pub async fn set_project_field(
        &self,
        project_id: &str,
        period_id: &str,
        field: FieldName,
        request: &SetFieldRequest,
    ) -> Result<ProjectData, AppError> {
        self.get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))?;
        self.period_for_write(period_id).await?;

        let encoded = encode_field_value(field, &request.value)?;
        let id = uuid::Uuid::new_v4().to_string();

        // Upsert: at most one value per field per project per period.
        sqlx::query(
            r#"INSERT INTO project_data (id, project_id, period_id, field_name, field_value)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (project_id, period_id, field_name)
               DO UPDATE SET field_value = excluded.field_value"#,
        )
        .bind(&id)
        .bind(project_id)
        .bind(period_id)
        .bind(field.as_str())
        .bind(&encoded)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            "Field {} written for project {} in period {}",
            field.as_str(),
            project_id,
            period_id
        );

        let row = sqlx::query(
            "SELECT id, project_id, period_id, field_name, field_value FROM project_data WHERE project_id = ? AND period_id = ? AND field_name = ?",
        )
        .bind(project_id)
        .bind(period_id)
        .bind(field.as_str())
        .fetch_one(&self.pool)
        .await?;

        data_from_row(&row)
            .ok_or_else(|| AppError::Internal("Stored field row failed to decode".to_string()))
    }

    /// "Project P as of period Q": live row with the period's overrides layered on.
    pub async fn get_merged_project(
        &self,
        project_id: &str,
        period_id: &str,
    ) -> Result<Project, AppError> {
        let base = self
            .get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))?;
        self.get_period(period_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", period_id)))?;

        let overrides = self.get_project_data(project_id, period_id).await?;
        Ok(merged_view(&base, &overrides))
    }

    /// All projects as they looked during the given period.
    pub async fn list_period_projects(&self, period_id: &str) -> Result<Vec<Project>, AppError> {
        self.get_period(period_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", period_id)))?;

        let projects = self.list_projects().await?;

        let rows = sqlx::query(
            "SELECT id, project_id, period_id, field_name, field_value FROM project_data WHERE period_id = ?",
        )
        .bind(period_id)
        .fetch_all(&self.pool)
        .await?;

        let mut by_project: HashMap<String, Vec<ProjectData>> = HashMap::new();
        for data in rows.iter().filter_map(data_from_row) {
            by_project.entry(data.project_id.clone()).or_default().push(data);
        }

        Ok(projects
            .iter()
            .map(|p| match by_project.get(&p.id) {
                Some(overrides) => merged_view(p, overrides),
                None => p.clone(),
            })
            .collect())
    }

    // ==================== NEXT STEPS ====================

    /// List next steps for one (project, period) pair.
    pub async fn list_next_steps(
        &self,
        project_id: &str,
        period_id: &str,
    ) -> Result<Vec<NextStep>, AppError> {
        let rows = sqlx::query(
            "SELECT id, project_id, period_id, description, owner, due_date, completed, created_at, updated_at FROM next_steps WHERE project_id = ? AND period_id = ? ORDER BY created_at",
        )
        .bind(project_id)
        .bind(period_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(step_from_row).collect())
    }

    /// Create a next step scoped to an unlocked period.
    pub async fn create_next_step(
        &self,
        project_id: &str,
        period_id: &str,
        request: &CreateNextStepRequest,
    ) -> Result<NextStep, AppError> {
        self.get_project(project_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", project_id)))?;
        self.period_for_write(period_id).await?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO next_steps (id, project_id, period_id, description, owner, due_date, completed, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&id)
        .bind(project_id)
        .bind(period_id)
        .bind(&request.description)
        .bind(&request.owner)
        .bind(&request.due_date)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(NextStep {
            id,
            project_id: project_id.to_string(),
            period_id: period_id.to_string(),
            description: request.description.clone(),
            owner: request.owner.clone(),
            due_date: request.due_date.clone(),
            completed: false,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Update a next step; blocked once its period is locked.
    pub async fn update_next_step(
        &self,
        id: &str,
        request: &UpdateNextStepRequest,
    ) -> Result<NextStep, AppError> {
        let existing = self
            .get_next_step(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Next step {} not found", id)))?;
        self.period_for_write(&existing.period_id).await?;

        let now = Utc::now().to_rfc3339();
        let description = request
            .description
            .as_ref()
            .unwrap_or(&existing.description);
        let owner = request.owner.clone().or(existing.owner.clone());
        let due_date = request.due_date.clone().or(existing.due_date.clone());
        let completed = request.completed.unwrap_or(existing.completed);

        sqlx::query(
            "UPDATE next_steps SET description = ?, owner = ?, due_date = ?, completed = ?, updated_at = ? WHERE id = ?",
        )
        .bind(description)
        .bind(&owner)
        .bind(&due_date)
        .bind(completed as i32)
        .bind(&now)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(NextStep {
            id: id.to_string(),
            project_id: existing.project_id,
            period_id: existing.period_id,
            description: description.clone(),
            owner,
            due_date,
            completed,
            created_at: existing.created_at,
            updated_at: now,
        })
    }

    /// Delete a next step; blocked once its period is locked.
    pub async fn delete_next_step(&self, id: &str) -> Result<(), AppError> {
        let existing = self
            .get_next_step(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Next step {} not found", id)))?;
        self.period_for_write(&existing.period_id).await?;

        sqlx::query("DELETE FROM next_steps WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn get_next_step(&self, id: &str) -> Result<Option<NextStep>, AppError> {
        let row = sqlx::query(
            "SELECT id, project_id, period_id, description, owner, due_date, completed, created_at, updated_at FROM next_steps WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(step_from_row))
    }

    /// Resolve a period for a write path, rejecting locked periods.
    async fn period_for_write(&self, period_id: &str) -> Result<ReportingPeriod, AppError> {
        let period = self
            .get_period(period_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Period {} not found", period_id)))?;

        if period.is_locked {
            return Err(AppError::Locked(format!(
                "Period {} is locked; its data cannot be modified",
                period.period_name
            )));
        }

        Ok(period)
    }
}

/// Encode a field-write value per field kind: benefits keep their JSON
/// structure, everything else is stored as raw text.
fn encode_field_value(field: FieldName, value: &serde_json::Value) -> Result<String, AppError> {
    match field {
        FieldName::Benefits => {
            // Validate the shape before storing
            let benefits: Benefits = serde_json::from_value(value.clone()).map_err(|e| {
                AppError::Validation(format!("Invalid benefits payload: {}", e))
            })?;
            Ok(serde_json::to_string(&benefits)?)
        }
        FieldName::CurrentProjectStage => match value.as_str().and_then(ProjectStage::from_str) {
            Some(stage) => Ok(stage.as_str().to_string()),
            None => Err(AppError::Validation(format!(
                "Invalid project stage: {}",
                value
            ))),
        },
        FieldName::CurrentAiStage => match value.as_str().and_then(AiStage::from_str) {
            Some(stage) => Ok(stage.as_str().to_string()),
            None => Err(AppError::Validation(format!("Invalid AI stage: {}", value))),
        },
        _ => match value.as_str() {
            Some(s) => Ok(s.to_string()),
            None => Err(AppError::Validation(format!(
                "Field {} expects a string value",
                field.as_str()
            ))),
        },
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

// Helper functions for row conversion

fn period_from_row(row: &sqlx::sqlite::SqliteRow) -> ReportingPeriod {
    let is_active: i32 = row.get("is_active");
    let is_locked: i32 = row.get("is_locked");
    let snapshot: Option<String> = row.get("data_snapshot");
    ReportingPeriod {
        id: row.get("id"),
        period_start: row.get("period_start"),
        period_end: row.get("period_end"),
        period_name: row.get("period_name"),
        is_active: is_active != 0,
        is_locked: is_locked != 0,
        locked_at: row.get("locked_at"),
        data_snapshot: snapshot.and_then(|s| serde_json::from_str(&s).ok()),
    }
}

fn project_from_row(row: &sqlx::sqlite::SqliteRow) -> Project {
    let stage_str: String = row.get("current_project_stage");
    let ai_stage_str: String = row.get("current_ai_stage");
    let benefits_str: String = row.get("benefits");
    Project {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        business_lead: row.get("business_lead"),
        initiator: row.get("initiator"),
        dev_team_lead: row.get("dev_team_lead"),
        project_start_date: row.get("project_start_date"),
        current_project_stage: ProjectStage::from_str(&stage_str).unwrap_or_default(),
        current_ai_stage: AiStage::from_str(&ai_stage_str).unwrap_or_default(),
        target_next_stage_date: row.get("target_next_stage_date"),
        target_completion_date: row.get("target_completion_date"),
        budget: row.get("budget"),
        benefits: serde_json::from_str(&benefits_str).unwrap_or_default(),
        key_risks: row.get("key_risks"),
        key_updates: row.get("key_updates"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn data_from_row(row: &sqlx::sqlite::SqliteRow) -> Option<ProjectData> {
    let field_str: String = row.get("field_name");
    // Rows with unknown field names are skipped rather than surfaced
    let field_name = FieldName::from_str(&field_str)?;
    Some(ProjectData {
        id: row.get("id"),
        project_id: row.get("project_id"),
        period_id: row.get("period_id"),
        field_name,
        field_value: row.get("field_value"),
    })
}

fn step_from_row(row: &sqlx::sqlite::SqliteRow) -> NextStep {
    let completed: i32 = row.get("completed");
    NextStep {
        id: row.get("id"),
        project_id: row.get("project_id"),
        period_id: row.get("period_id"),
        description: row.get("description"),
        owner: row.get("owner"),
        due_date: row.get("due_date"),
        completed: completed != 0,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
