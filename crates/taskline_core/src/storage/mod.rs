use crate::error::AppError;
use crate::model::Task;
use std::path::{Path, PathBuf};

pub mod json_store;
mod memory;

pub use json_store::JsonTaskStore;
pub use memory::MemoryTaskStore;

/// The persistence collaborator used by commands. Tasks are matched by
/// [`Task::same_identity`], so the `done` flag never affects lookups.
pub trait TaskStore {
    fn open(&mut self) -> Result<(), AppError>;

    fn close(&mut self) -> Result<(), AppError>;

    fn is_open(&self) -> bool;

    /// All tasks in insertion order.
    fn read_all_tasks(&self) -> Result<Vec<Task>, AppError>;

    fn write_task(&mut self, task: &Task) -> Result<(), AppError>;

    fn remove_task(&mut self, task: &Task) -> Result<(), AppError>;

    fn update_task(&mut self, old: &Task, new: &Task) -> Result<(), AppError>;

    fn clear_all_tasks(&mut self) -> Result<(), AppError>;

    /// Directory the store currently lives in.
    fn location(&self) -> PathBuf;

    /// Moves the store into `dir`, which must be an existing directory.
    fn change_location(&mut self, dir: &Path) -> Result<(), AppError>;
}

pub(crate) fn ensure_directory(dir: &Path) -> Result<(), AppError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(AppError::InvalidPath(dir.to_path_buf()))
    }
}

pub(crate) fn position_of(tasks: &[Task], task: &Task) -> Result<usize, AppError> {
    tasks
        .iter()
        .position(|candidate| candidate.same_identity(task))
        .ok_or_else(|| AppError::task_not_found(task.name.clone()))
}
