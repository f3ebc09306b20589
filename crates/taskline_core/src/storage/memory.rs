use crate::error::AppError;
use crate::model::Task;
use crate::storage::{TaskStore, ensure_directory, position_of};
use std::path::{Path, PathBuf};

/// Keeps tasks in memory. The location is only validated and remembered.
#[derive(Debug, Clone)]
pub struct MemoryTaskStore {
    tasks: Vec<Task>,
    location: PathBuf,
    open: bool,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::with_tasks(Vec::new())
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            location: std::env::temp_dir(),
            open: false,
        }
    }

    fn tasks_mut(&mut self) -> Result<&mut Vec<Task>, AppError> {
        if !self.open {
            return Err(AppError::io("task store is not open"));
        }
        Ok(&mut self.tasks)
    }
}

impl Default for MemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore for MemoryTaskStore {
    fn open(&mut self) -> Result<(), AppError> {
        self.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), AppError> {
        self.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn read_all_tasks(&self) -> Result<Vec<Task>, AppError> {
        if !self.open {
            return Err(AppError::io("task store is not open"));
        }
        Ok(self.tasks.clone())
    }

    fn write_task(&mut self, task: &Task) -> Result<(), AppError> {
        self.tasks_mut()?.push(task.clone());
        Ok(())
    }

    fn remove_task(&mut self, task: &Task) -> Result<(), AppError> {
        let tasks = self.tasks_mut()?;
        let index = position_of(tasks, task)?;
        tasks.remove(index);
        Ok(())
    }

    fn update_task(&mut self, old: &Task, new: &Task) -> Result<(), AppError> {
        let tasks = self.tasks_mut()?;
        let index = position_of(tasks, old)?;
        tasks[index] = new.clone();
        Ok(())
    }

    fn clear_all_tasks(&mut self) -> Result<(), AppError> {
        self.tasks_mut()?.clear();
        Ok(())
    }

    fn location(&self) -> PathBuf {
        self.location.clone()
    }

    fn change_location(&mut self, dir: &Path) -> Result<(), AppError> {
        ensure_directory(dir)?;
        self.location = dir.to_path_buf();
        Ok(())
    }
}
