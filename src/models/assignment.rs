use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Progress value at which an assignment counts as completed
pub const COMPLETE: u8 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Assignment {
    /// UUID to identify the assignment
    pub id: Uuid,
    /// User-facing auto-incremental assignment number
    pub number: u64,
    /// Title of the assignment, never empty
    pub title: String,
    /// Free text details, may be empty
    pub description: String,
    /// When the assignment is due
    pub due_date: Timestamp,
    pub priority: Priority,
    /// Completion percentage, always within 0..=100
    pub progress: u8,
    /// Course label, e.g. "CS101"
    pub course: Option<String>,
}

impl Assignment {
    pub fn is_completed(&self) -> bool {
        self.progress == COMPLETE
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort rank, most urgent first
    pub fn rank(self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        };
        f.write_str(label)
    }
}

/// Clamp any integer into the valid progress range
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, COMPLETE as i64) as u8
}

/// Fields supplied when creating an assignment
#[derive(Debug, Clone)]
pub struct AssignmentDraft {
    pub title: String,
    pub description: String,
    pub due_date: Timestamp,
    pub priority: Priority,
    /// Defaults to 0 when not set
    pub progress: Option<i64>,
    pub course: Option<String>,
}

/// Partial update: only the fields that are `Some` are applied
#[derive(Debug, Clone, Default)]
pub struct AssignmentPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<Timestamp>,
    pub priority: Option<Priority>,
    pub progress: Option<i64>,
    /// `Some(None)` clears the course
    pub course: Option<Option<String>>,
}

impl AssignmentPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.priority.is_none()
            && self.progress.is_none()
            && self.course.is_none()
    }
}
