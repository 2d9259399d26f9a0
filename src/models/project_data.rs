//! Period-scoped field overrides.
//!
//! Instead of duplicating a full project row per period, each snapshot-able
//! field is stored sparsely as one row keyed by (project, period, field).

use serde::{Deserialize, Serialize};

use super::{AiStage, Benefits, Project, ProjectStage};

/// Field names allowed in the period-scoped override table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FieldName {
    Benefits,
    KeyRisks,
    KeyUpdates,
    Description,
    BusinessLead,
    Initiator,
    DevTeamLead,
    CurrentProjectStage,
    CurrentAiStage,
    TargetNextStageDate,
    TargetCompletionDate,
    Budget,
}

/// Fields copied forward into a freshly created period during rollover.
///
/// Sidebar fields (leads, stages, dates, budget) stay live-only; only the
/// four content fields are snapshotted automatically.
pub const COPY_FORWARD_FIELDS: [FieldName; 4] = [
    FieldName::Benefits,
    FieldName::KeyRisks,
    FieldName::KeyUpdates,
    FieldName::Description,
];

impl FieldName {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldName::Benefits => "benefits",
            FieldName::KeyRisks => "key_risks",
            FieldName::KeyUpdates => "key_updates",
            FieldName::Description => "description",
            FieldName::BusinessLead => "business_lead",
            FieldName::Initiator => "initiator",
            FieldName::DevTeamLead => "dev_team_lead",
            FieldName::CurrentProjectStage => "current_project_stage",
            FieldName::CurrentAiStage => "current_ai_stage",
            FieldName::TargetNextStageDate => "target_next_stage_date",
            FieldName::TargetCompletionDate => "target_completion_date",
            FieldName::Budget => "budget",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "benefits" => Some(FieldName::Benefits),
            "key_risks" => Some(FieldName::KeyRisks),
            "key_updates" => Some(FieldName::KeyUpdates),
            "description" => Some(FieldName::Description),
            "business_lead" => Some(FieldName::BusinessLead),
            "initiator" => Some(FieldName::Initiator),
            "dev_team_lead" => Some(FieldName::DevTeamLead),
            "current_project_stage" => Some(FieldName::CurrentProjectStage),
            "current_ai_stage" => Some(FieldName::CurrentAiStage),
            "target_next_stage_date" => Some(FieldName::TargetNextStageDate),
            "target_completion_date" => Some(FieldName::TargetCompletionDate),
            "budget" => Some(FieldName::Budget),
            _ => None,
        }
    }
}

/// One period-scoped override row.
///
/// `field_value` is JSON text for benefits and raw text for everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectData {
    pub id: String,
    pub project_id: String,
    pub period_id: String,
    pub field_name: FieldName,
    pub field_value: String,
}

/// Request body for writing a single period-scoped field.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetFieldRequest {
    pub value: serde_json::Value,
}

/// Layer period-scoped overrides onto a project's live row.
///
/// Fields with no override keep the live value. The base row is never
/// mutated; callers get a fresh merged view.
pub fn merged_view(base: &Project, overrides: &[ProjectData]) -> Project {
    let mut view = base.clone();
    for data in overrides {
        match data.field_name {
            FieldName::Benefits => {
                if let Ok(benefits) = serde_json::from_str::<Benefits>(&data.field_value) {
                    view.benefits = benefits;
                }
            }
            FieldName::KeyRisks => view.key_risks = Some(data.field_value.clone()),
            FieldName::KeyUpdates => view.key_updates = Some(data.field_value.clone()),
            FieldName::Description => view.description = Some(data.field_value.clone()),
            FieldName::BusinessLead => view.business_lead = Some(data.field_value.clone()),
            FieldName::Initiator => view.initiator = Some(data.field_value.clone()),
            FieldName::DevTeamLead => view.dev_team_lead = Some(data.field_value.clone()),
            FieldName::CurrentProjectStage => {
                if let Some(stage) = ProjectStage::from_str(&data.field_value) {
                    view.current_project_stage = stage;
                }
            }
            FieldName::CurrentAiStage => {
                if let Some(stage) = AiStage::from_str(&data.field_value) {
                    view.current_ai_stage = stage;
                }
            }
            FieldName::TargetNextStageDate => {
                view.target_next_stage_date = Some(data.field_value.clone())
            }
            FieldName::TargetCompletionDate => {
                view.target_completion_date = Some(data.field_value.clone())
            }
            FieldName::Budget => view.budget = Some(data.field_value.clone()),
        }
    }
    view
}
