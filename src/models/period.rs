//! Reporting period model and rollover request/response shapes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A monthly reporting period bounded by the 15th of consecutive months.
///
/// Periods are half-open intervals `[period_start, period_end)`. At most one
/// period is active at a time; superseded periods are locked and never
/// mutated again outside the forced administrative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportingPeriod {
    pub id: String,
    pub period_start: NaiveDate,
    /// Exclusive upper bound.
    pub period_end: NaiveDate,
    pub period_name: String,
    pub is_active: bool,
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_at: Option<String>,
    /// Point-in-time copy stored only when locking with an explicit snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_snapshot: Option<serde_json::Value>,
}

/// Period detail with the derived count of projects holding data in it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodDetail {
    #[serde(flatten)]
    pub period: ReportingPeriod,
    pub project_count: i64,
}

/// Preview of the period that a rollover would create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPeriodPreview {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub name: String,
}

/// Request body for POST /api/periods/create-next.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateNextPeriodRequest {
    #[serde(default)]
    pub confirmed: bool,
}

/// Preview payload returned when the rollover is not yet confirmed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverPreview {
    pub next_period: NextPeriodPreview,
    pub message: String,
    pub actions: Vec<String>,
}

/// Summary returned after a confirmed rollover commits.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RolloverSummary {
    pub new_period: ReportingPeriod,
    pub copied_projects_count: i64,
    pub copied_data_records_count: i64,
    pub locked_previous_periods_count: i64,
}

/// Request body for updating a period's core fields.
///
/// Locked periods reject this unless `force` is set (administrative path).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePeriodRequest {
    #[serde(default)]
    pub period_name: Option<String>,
    #[serde(default)]
    pub period_start: Option<NaiveDate>,
    #[serde(default)]
    pub period_end: Option<NaiveDate>,
    #[serde(default)]
    pub force: bool,
}

/// Request body for explicitly locking a period.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LockPeriodRequest {
    #[serde(default)]
    pub data_snapshot: Option<serde_json::Value>,
}
