use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::program::WorkoutProgram;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    pub program_id: String,
    pub client_id: String,
    pub status: AssignmentStatus,
    pub progress: Vec<ProgressEntry>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentStatus {
    #[default]
    Assigned,
    InProgress,
    Completed,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::InProgress => "in-progress",
            AssignmentStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "assigned" => Some(AssignmentStatus::Assigned),
            "in-progress" => Some(AssignmentStatus::InProgress),
            "completed" => Some(AssignmentStatus::Completed),
            _ => None,
        }
    }
}

/// One logged session against an assigned program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exercise_name: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignProgramRequest {
    pub program_id: String,
    /// One or more clients receiving the program.
    pub client_ids: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddProgressRequest {
    pub exercise_name: Option<String>,
    /// Defaults to now.
    pub date: Option<DateTime<Utc>>,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// An assignment with the program it refers to. `program` is `None` when the
/// program has since been deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentWithProgram {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub program: Option<WorkoutProgram>,
}
