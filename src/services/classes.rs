use thiserror::Error;
use tracing::debug;

use crate::{
    models::{
        class_slot::{ClassDraft, ClassSlot, ClockTime, Weekday, class_id},
        store::Store,
    },
    services::{Mutation, Signal, ValidationError},
};

#[derive(Debug, Error, PartialEq)]
pub enum CreateClassError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub fn create_class(
    store: &mut Store,
    day: Weekday,
    start_time: ClockTime,
    draft: ClassDraft,
) -> Result<Mutation<ClassSlot>, CreateClassError> {
    let subject = draft.subject.trim();
    if subject.is_empty() {
        return Err(ValidationError::EmptySubject.into());
    }

    let end_time = draft.end_time.unwrap_or_else(|| start_time.plus_one_hour());
    if end_time == start_time {
        return Err(ValidationError::EmptyInterval(start_time).into());
    }

    let class = ClassSlot {
        id: class_id(day, start_time),
        weekday: day,
        subject: subject.to_string(),
        start_time,
        end_time,
        professor: non_blank(draft.professor),
        location: non_blank(draft.location),
        color: non_blank(draft.color),
    };

    if let Some(existing) = store
        .get_classes_on(day)
        .find(|existing| overlaps(existing, &class))
    {
        return Err(ValidationError::SlotOccupied {
            day,
            start: existing.start_time,
            end: existing.end_time,
            subject: existing.subject.clone(),
        }
        .into());
    }

    let created = store.add_class(class).clone();
    debug!(id = %created.id, "class created");

    let signals = vec![Signal::ClassCreated {
        id: created.id.clone(),
        subject: created.subject.clone(),
    }];
    Ok(Mutation::new(created, signals))
}

#[derive(Debug, Error, PartialEq)]
pub enum DeleteClassError {
    #[error("Class '{0}' not found")]
    ClassNotFound(String),
}

pub fn delete_class(store: &mut Store, id: &str) -> Result<Mutation<ClassSlot>, DeleteClassError> {
    let removed = store
        .remove_class(id)
        .ok_or_else(|| DeleteClassError::ClassNotFound(id.to_string()))?;
    debug!(%id, "class deleted");

    let signals = vec![Signal::ClassDeleted {
        id: removed.id.clone(),
        subject: removed.subject.clone(),
    }];
    Ok(Mutation::new(removed, signals))
}

fn overlaps(a: &ClassSlot, b: &ClassSlot) -> bool {
    a.occupies(b.start_time) || b.occupies(a.start_time)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
