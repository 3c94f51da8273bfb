use thiserror::Error;
use uuid::Uuid;

use crate::models::class_slot::{ClockTime, Weekday};

pub mod assignments;
pub mod classes;

/// Outcome of a gateway operation: the affected entity plus the
/// notifications the caller should dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    pub value: T,
    pub signals: Vec<Signal>,
}

impl<T> Mutation<T> {
    fn new(value: T, signals: Vec<Signal>) -> Self {
        Self { value, signals }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    AssignmentCreated { id: Uuid, title: String },
    AssignmentUpdated { id: Uuid, title: String },
    AssignmentDeleted { id: Uuid, title: String },
    AssignmentCompleted { id: Uuid, title: String },
    ClassCreated { id: String, subject: String },
    ClassDeleted { id: String, subject: String },
}

impl Signal {
    /// Id of the entity the signal is about
    pub fn entity_id(&self) -> String {
        match self {
            Signal::AssignmentCreated { id, .. }
            | Signal::AssignmentUpdated { id, .. }
            | Signal::AssignmentDeleted { id, .. }
            | Signal::AssignmentCompleted { id, .. } => id.to_string(),
            Signal::ClassCreated { id, .. } | Signal::ClassDeleted { id, .. } => id.clone(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Signal::AssignmentCreated { .. } => "Assignment added",
            Signal::AssignmentUpdated { .. } => "Assignment updated",
            Signal::AssignmentDeleted { .. } => "Assignment deleted",
            Signal::AssignmentCompleted { .. } => "Assignment completed!",
            Signal::ClassCreated { .. } => "Class added",
            Signal::ClassDeleted { .. } => "Class removed",
        }
    }

    pub fn description(&self) -> String {
        match self {
            Signal::AssignmentCreated { title, .. } => {
                format!("'{}' has been added to your tracker.", title)
            }
            Signal::AssignmentUpdated { title, .. } => {
                format!("'{}' has been updated.", title)
            }
            Signal::AssignmentDeleted { title, .. } => {
                format!("'{}' has been removed from your tracker.", title)
            }
            Signal::AssignmentCompleted { title, .. } => {
                format!("Great job on completing '{}'!", title)
            }
            Signal::ClassCreated { subject, .. } => {
                format!("{} has been added to your timetable.", subject)
            }
            Signal::ClassDeleted { subject, .. } => {
                format!("{} has been removed from your timetable.", subject)
            }
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Title required: please enter an assignment title")]
    EmptyTitle,

    #[error("Subject required: please enter a subject name")]
    EmptySubject,

    #[error("Progress must be a whole number between 0 and 100, got '{0}'")]
    InvalidProgress(String),

    #[error("Invalid due date '{0}', expected YYYY-MM-DD or YYYY-MM-DDTHH:MM")]
    InvalidDueDate(String),

    #[error("{0}")]
    InvalidClockTime(#[from] crate::models::class_slot::ClockTimeError),

    #[error("{0}")]
    InvalidWeekday(#[from] crate::models::class_slot::WeekdayParseError),

    #[error("A class cannot start and end at {0}")]
    EmptyInterval(ClockTime),

    #[error("{day} {start}-{end} overlaps '{subject}'")]
    SlotOccupied {
        day: Weekday,
        start: ClockTime,
        end: ClockTime,
        subject: String,
    },
}
