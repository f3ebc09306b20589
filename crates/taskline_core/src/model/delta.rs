use crate::error::AppError;
use crate::model::Task;
use time::OffsetDateTime;

/// What to do with one field of a task during an update. `Remove` clears an
/// optional field, which is different from leaving it alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange<T> {
    Keep,
    Update(T),
    Remove,
}

impl<T> Default for FieldChange<T> {
    fn default() -> Self {
        Self::Keep
    }
}

impl<T: Clone> FieldChange<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }

    fn apply_to(&self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Update(value) => Some(value.clone()),
            Self::Remove => None,
        }
    }
}

/// A partial update request for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeltaTask {
    pub name: FieldChange<String>,
    pub start: FieldChange<OffsetDateTime>,
    pub end: FieldChange<OffsetDateTime>,
}

impl DeltaTask {
    pub fn is_empty(&self) -> bool {
        self.name.is_keep() && self.start.is_keep() && self.end.is_keep()
    }

    pub fn apply(&self, task: &Task) -> Result<Task, AppError> {
        let name = match &self.name {
            FieldChange::Keep => task.name.clone(),
            FieldChange::Update(name) if !name.trim().is_empty() => name.trim().to_string(),
            FieldChange::Update(_) | FieldChange::Remove => {
                return Err(AppError::invalid_input("A task must have a name."));
            }
        };

        Ok(Task {
            name,
            start: self.start.apply_to(task.start),
            end: self.end.apply_to(task.end),
            done: task.done,
        })
    }
}
