//! Project model matching the frontend Project interface.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Delivery stage of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ProjectStage {
    #[serde(rename = "prototype")]
    Prototype,
    #[serde(rename = "poc")]
    Poc,
    #[serde(rename = "pilot")]
    Pilot,
    /// Empty string on the wire; kept for client compatibility.
    #[default]
    #[serde(rename = "")]
    Empty,
}

impl ProjectStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStage::Prototype => "prototype",
            ProjectStage::Poc => "poc",
            ProjectStage::Pilot => "pilot",
            ProjectStage::Empty => "",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "prototype" => Some(ProjectStage::Prototype),
            "poc" => Some(ProjectStage::Poc),
            "pilot" => Some(ProjectStage::Pilot),
            "" => Some(ProjectStage::Empty),
            _ => None,
        }
    }
}

/// AI lifecycle stage of a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum AiStage {
    #[serde(rename = "planning-design")]
    PlanningDesign,
    #[serde(rename = "data-collection")]
    DataCollection,
    #[serde(rename = "model-building")]
    ModelBuilding,
    #[serde(rename = "testing-validation")]
    TestingValidation,
    #[serde(rename = "deployment")]
    Deployment,
    #[serde(rename = "monitoring")]
    Monitoring,
    #[default]
    #[serde(rename = "")]
    Empty,
}

impl AiStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiStage::PlanningDesign => "planning-design",
            AiStage::DataCollection => "data-collection",
            AiStage::ModelBuilding => "model-building",
            AiStage::TestingValidation => "testing-validation",
            AiStage::Deployment => "deployment",
            AiStage::Monitoring => "monitoring",
            AiStage::Empty => "",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "planning-design" => Some(AiStage::PlanningDesign),
            "data-collection" => Some(AiStage::DataCollection),
            "model-building" => Some(AiStage::ModelBuilding),
            "testing-validation" => Some(AiStage::TestingValidation),
            "deployment" => Some(AiStage::Deployment),
            "monitoring" => Some(AiStage::Monitoring),
            "" => Some(AiStage::Empty),
            _ => None,
        }
    }
}

/// Whether a benefit category applies to a project.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Applicability {
    #[serde(rename = "yes")]
    Yes,
    #[serde(rename = "no")]
    No,
    #[default]
    #[serde(rename = "")]
    Empty,
}

/// One benefit category entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BenefitEntry {
    #[serde(default)]
    pub applicable: Applicability,
    #[serde(default)]
    pub details: String,
}

/// Benefit map keyed by category name (fteSavings, costReduction, ...).
///
/// The richer client may add custom categories, so the key set is open.
pub type Benefits = BTreeMap<String, BenefitEntry>;

/// A tracked AI/automation project with its live (current-period) values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_lead: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initiator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_team_lead: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_start_date: Option<String>,
    #[serde(default)]
    pub current_project_stage: ProjectStage,
    #[serde(default)]
    pub current_ai_stage: AiStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_next_stage_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_completion_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<String>,
    #[serde(default)]
    pub benefits: Benefits,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_risks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_updates: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for creating a new project.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub business_lead: Option<String>,
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default)]
    pub dev_team_lead: Option<String>,
    #[serde(default)]
    pub project_start_date: Option<String>,
    #[serde(default)]
    pub current_project_stage: ProjectStage,
    #[serde(default)]
    pub current_ai_stage: AiStage,
    #[serde(default)]
    pub target_next_stage_date: Option<String>,
    #[serde(default)]
    pub target_completion_date: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub benefits: Benefits,
    #[serde(default)]
    pub key_risks: Option<String>,
    #[serde(default)]
    pub key_updates: Option<String>,
}

/// Request body for updating an existing project's live values.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub business_lead: Option<String>,
    #[serde(default)]
    pub initiator: Option<String>,
    #[serde(default)]
    pub dev_team_lead: Option<String>,
    #[serde(default)]
    pub project_start_date: Option<String>,
    #[serde(default)]
    pub current_project_stage: Option<ProjectStage>,
    #[serde(default)]
    pub current_ai_stage: Option<AiStage>,
    #[serde(default)]
    pub target_next_stage_date: Option<String>,
    #[serde(default)]
    pub target_completion_date: Option<String>,
    #[serde(default)]
    pub budget: Option<String>,
    #[serde(default)]
    pub benefits: Option<Benefits>,
    #[serde(default)]
    pub key_risks: Option<String>,
    #[serde(default)]
    pub key_updates: Option<String>,
}
