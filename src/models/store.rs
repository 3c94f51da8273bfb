use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    assignment::Assignment,
    class_slot::{ClassSlot, Weekday},
};

/// Current schema version
pub const CURRENT_VERSION: u32 = 2;

/// Session-scoped owner of every collection
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Store {
    pub version: u32,
    pub assignments: Vec<Assignment>,
    pub classes: Vec<ClassSlot>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            assignments: vec![],
            classes: vec![],
        }
    }
}

impl Store {
    pub fn get_assignment(&self, id: Uuid) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    pub fn get_assignment_mut(&mut self, id: Uuid) -> Option<&mut Assignment> {
        self.assignments.iter_mut().find(|a| a.id == id)
    }

    pub fn get_assignment_by_number(&self, number: u64) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.number == number)
    }

    /// Appends the assignment and hands out the next user-facing number
    pub fn add_assignment(&mut self, mut assignment: Assignment) -> &Assignment {
        assignment.number = self.next_assignment_number();
        self.assignments.push(assignment);
        &self.assignments[self.assignments.len() - 1]
    }

    pub fn remove_assignment(&mut self, id: Uuid) -> Option<Assignment> {
        let index = self.assignments.iter().position(|a| a.id == id)?;
        Some(self.assignments.remove(index))
    }

    fn next_assignment_number(&self) -> u64 {
        self.assignments
            .iter()
            .map(|a| a.number)
            .max()
            .unwrap_or(0)
            + 1
    }

    pub fn get_classes_on(&self, weekday: Weekday) -> impl Iterator<Item = &ClassSlot> {
        self.classes.iter().filter(move |c| c.weekday == weekday)
    }

    pub fn add_class(&mut self, class: ClassSlot) -> &ClassSlot {
        self.classes.push(class);
        &self.classes[self.classes.len() - 1]
    }

    pub fn remove_class(&mut self, id: &str) -> Option<ClassSlot> {
        let index = self.classes.iter().position(|c| c.id == id)?;
        Some(self.classes.remove(index))
    }
}
