use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::{
    models::{
        assignment::{Assignment, AssignmentDraft, AssignmentPatch, COMPLETE, clamp_progress},
        store::Store,
    },
    services::{Mutation, Signal, ValidationError},
};

#[derive(Debug, Error, PartialEq)]
pub enum CreateAssignmentError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub fn create_assignment(
    store: &mut Store,
    draft: AssignmentDraft,
) -> Result<Mutation<Assignment>, CreateAssignmentError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle.into());
    }

    let assignment = Assignment {
        id: Uuid::new_v4(),
        // Assigned by the store
        number: 0,
        title: title.to_string(),
        description: draft.description,
        due_date: draft.due_date,
        priority: draft.priority,
        progress: draft.progress.map(clamp_progress).unwrap_or(0),
        course: draft.course.filter(|c| !c.trim().is_empty()),
    };

    let created = store.add_assignment(assignment).clone();
    debug!(id = %created.id, number = created.number, "assignment created");

    let signals = vec![Signal::AssignmentCreated {
        id: created.id,
        title: created.title.clone(),
    }];
    Ok(Mutation::new(created, signals))
}

#[derive(Debug, Error, PartialEq)]
pub enum UpdateAssignmentError {
    #[error("Assignment '{0}' not found")]
    AssignmentNotFound(Uuid),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub fn update_assignment(
    store: &mut Store,
    id: Uuid,
    patch: AssignmentPatch,
) -> Result<Mutation<Assignment>, UpdateAssignmentError> {
    let current = store
        .get_assignment(id)
        .ok_or(UpdateAssignmentError::AssignmentNotFound(id))?;

    // Build the merged value first so a rejected patch leaves the store untouched
    let mut updated = current.clone();
    if let Some(title) = patch.title {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle.into());
        }
        updated.title = title.to_string();
    }
    if let Some(description) = patch.description {
        updated.description = description;
    }
    if let Some(due_date) = patch.due_date {
        updated.due_date = due_date;
    }
    if let Some(priority) = patch.priority {
        updated.priority = priority;
    }
    if let Some(progress) = patch.progress {
        updated.progress = clamp_progress(progress);
    }
    if let Some(course) = patch.course {
        updated.course = course.filter(|c| !c.trim().is_empty());
    }

    let was_completed = current.is_completed();
    let mut signals = vec![Signal::AssignmentUpdated {
        id,
        title: updated.title.clone(),
    }];
    if !was_completed && updated.is_completed() {
        signals.push(Signal::AssignmentCompleted {
            id,
            title: updated.title.clone(),
        });
    }

    if let Some(slot) = store.get_assignment_mut(id) {
        *slot = updated.clone();
    }
    debug!(%id, "assignment updated");

    Ok(Mutation::new(updated, signals))
}

#[derive(Debug, Error, PartialEq)]
pub enum DeleteAssignmentError {
    #[error("Assignment '{0}' not found")]
    AssignmentNotFound(Uuid),
}

pub fn delete_assignment(
    store: &mut Store,
    id: Uuid,
) -> Result<Mutation<Assignment>, DeleteAssignmentError> {
    let removed = store
        .remove_assignment(id)
        .ok_or(DeleteAssignmentError::AssignmentNotFound(id))?;
    debug!(%id, "assignment deleted");

    let signals = vec![Signal::AssignmentDeleted {
        id,
        title: removed.title.clone(),
    }];
    Ok(Mutation::new(removed, signals))
}

#[derive(Debug, Error, PartialEq)]
pub enum SetProgressError {
    #[error("Assignment '{0}' not found")]
    AssignmentNotFound(Uuid),
}

/// Sets progress, clamped to 0..=100. Reaching 100 emits
/// [`Signal::AssignmentCompleted`] in addition to the update signal.
pub fn set_progress(
    store: &mut Store,
    id: Uuid,
    value: i64,
) -> Result<Mutation<Assignment>, SetProgressError> {
    let assignment = store
        .get_assignment_mut(id)
        .ok_or(SetProgressError::AssignmentNotFound(id))?;

    assignment.progress = clamp_progress(value);
    let updated = assignment.clone();
    debug!(%id, progress = updated.progress, "assignment progress set");

    let mut signals = vec![Signal::AssignmentUpdated {
        id,
        title: updated.title.clone(),
    }];
    if updated.progress == COMPLETE {
        signals.push(Signal::AssignmentCompleted {
            id,
            title: updated.title.clone(),
        });
    }
    Ok(Mutation::new(updated, signals))
}
