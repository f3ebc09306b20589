use crate::error::AppError;
use crate::model::Task;
use crate::storage::{TaskStore, ensure_directory, position_of};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SCHEMA_VERSION: u32 = 1;
pub const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKLINE_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredTasks {
    schema_version: u32,
    tasks: Vec<Task>,
}

/// The data file named by `TASKLINE_STORE_PATH`, when set and non-blank.
pub fn store_path_override() -> Option<PathBuf> {
    std::env::var(STORE_ENV_VAR)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

/// Resolves the data file: `TASKLINE_STORE_PATH`, then the configured
/// directory, then the per-user config directory.
pub fn store_path(configured_dir: Option<&Path>) -> Result<PathBuf, AppError> {
    if let Some(path) = store_path_override() {
        return Ok(path);
    }

    if let Some(dir) = configured_dir {
        return Ok(dir.join(STORE_FILE_NAME));
    }

    Ok(crate::config::app_dir()?.join(STORE_FILE_NAME))
}

pub fn load_tasks(path: &Path) -> Result<Vec<Task>, AppError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let stored: StoredTasks = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(AppError::invalid_data(format!(
            "unsupported schema_version {} in {}",
            stored.schema_version,
            path.display()
        )));
    }

    Ok(stored.tasks)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredTasks {
        schema_version: SCHEMA_VERSION,
        tasks: tasks.to_vec(),
    };
    let content = serde_json::to_string_pretty(&stored)?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    Ok(())
}

/// A flat JSON file holding every task. The file is read once on `open` and
/// rewritten after each mutation.
#[derive(Debug)]
pub struct JsonTaskStore {
    path: PathBuf,
    tasks: Option<Vec<Task>>,
}

impl JsonTaskStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            tasks: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn loaded(&self) -> Result<&Vec<Task>, AppError> {
        self.tasks
            .as_ref()
            .ok_or_else(|| AppError::io("task store is not open"))
    }

    fn mutate<F>(&mut self, change: F) -> Result<(), AppError>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<(), AppError>,
    {
        let mut tasks = self.loaded()?.clone();
        change(&mut tasks)?;
        save_tasks(&self.path, &tasks)?;
        self.tasks = Some(tasks);
        Ok(())
    }
}

/// Compares directories by their resolved form so `a/b/..` and `a` match.
/// Falls back to the literal paths when either side cannot be resolved.
fn same_directory(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

impl TaskStore for JsonTaskStore {
    fn open(&mut self) -> Result<(), AppError> {
        let tasks = load_tasks(&self.path)?;
        info!(path = %self.path.display(), count = tasks.len(), "opened task store");
        self.tasks = Some(tasks);
        Ok(())
    }

    fn close(&mut self) -> Result<(), AppError> {
        if self.tasks.take().is_some() {
            info!(path = %self.path.display(), "closed task store");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.tasks.is_some()
    }

    fn read_all_tasks(&self) -> Result<Vec<Task>, AppError> {
        Ok(self.loaded()?.clone())
    }

    fn write_task(&mut self, task: &Task) -> Result<(), AppError> {
        self.mutate(|tasks| {
            tasks.push(task.clone());
            Ok(())
        })
    }

    fn remove_task(&mut self, task: &Task) -> Result<(), AppError> {
        self.mutate(|tasks| {
            let index = position_of(tasks, task)?;
            tasks.remove(index);
            Ok(())
        })
    }

    fn update_task(&mut self, old: &Task, new: &Task) -> Result<(), AppError> {
        self.mutate(|tasks| {
            let index = position_of(tasks, old)?;
            tasks[index] = new.clone();
            Ok(())
        })
    }

    fn clear_all_tasks(&mut self) -> Result<(), AppError> {
        self.mutate(|tasks| {
            tasks.clear();
            Ok(())
        })
    }

    fn location(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn change_location(&mut self, dir: &Path) -> Result<(), AppError> {
        ensure_directory(dir)?;

        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| STORE_FILE_NAME.into());
        let new_path = dir.join(file_name);
        if new_path == self.path || same_directory(dir, &self.location()) {
            debug!(path = %self.path.display(), "store already in target directory");
            return Ok(());
        }
        if new_path.exists() {
            return Err(AppError::StoreExists(new_path));
        }

        match self.tasks.as_ref() {
            Some(tasks) => save_tasks(&new_path, tasks)?,
            None if self.path.exists() => {
                std::fs::copy(&self.path, &new_path)?;
            }
            None => debug!(path = %self.path.display(), "no store file to move"),
        }

        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }

        info!(
            from = %self.path.display(),
            to = %new_path.display(),
            "relocated task store"
        );
        self.path = new_path;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonTaskStore, SCHEMA_VERSION, load_tasks, save_tasks};
    use crate::model::Task;
    use crate::storage::TaskStore;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};
    use time::macros::datetime;

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskline-{nanos}-{file_name}"))
    }

    #[test]
    fn save_and_load_round_trip() {
        let path = temp_path("tasks.json");
        let task = Task::new("demo").with_end(datetime!(2026-10-20 12:00 UTC));

        save_tasks(&path, std::slice::from_ref(&task)).unwrap();
        let loaded = load_tasks(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, vec![task]);
    }

    #[test]
    fn missing_file_loads_empty() {
        let path = temp_path("missing.json");
        assert!(load_tasks(&path).unwrap().is_empty());
    }

    #[test]
    fn schema_version_must_match() {
        let path = temp_path("bad-schema.json");
        let bad = format!(
            "{{\n  \"schema_version\": {},\n  \"tasks\": []\n}}",
            SCHEMA_VERSION + 1
        );
        fs::write(&path, bad).unwrap();

        let err = load_tasks(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn rejects_non_boolean_done_field() {
        let path = temp_path("bad-done.json");
        let content = "{\n  \"schema_version\": 1,\n  \"tasks\": [\n    {\n      \"name\": \"demo\",\n      \"done\": \"yes\"\n    }\n  ]\n}";
        fs::write(&path, content).unwrap();

        let err = load_tasks(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn mutations_are_persisted() {
        let path = temp_path("persisted.json");
        let mut store = JsonTaskStore::new(&path);
        store.open().unwrap();

        store.write_task(&Task::new("a")).unwrap();
        store.write_task(&Task::new("b")).unwrap();
        store
            .update_task(&Task::new("a"), &Task::new("a").toggled())
            .unwrap();
        store.remove_task(&Task::new("b")).unwrap();
        store.close().unwrap();

        let loaded = load_tasks(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, vec![Task::new("a").toggled()]);
    }

    #[test]
    fn closed_store_rejects_writes() {
        let path = temp_path("closed.json");
        let mut store = JsonTaskStore::new(&path);

        let err = store.write_task(&Task::new("a")).unwrap_err();

        assert_eq!(err.code(), "io_error");
        assert!(!path.exists());
    }

    #[test]
    fn change_location_moves_file() {
        let dir = temp_path("relocated");
        fs::create_dir_all(&dir).unwrap();
        let path = temp_path("moving.json");
        let mut store = JsonTaskStore::new(&path);
        store.open().unwrap();
        store.write_task(&Task::new("a")).unwrap();

        store.change_location(&dir).unwrap();

        let moved = dir.join(path.file_name().unwrap());
        assert_eq!(store.path(), moved.as_path());
        assert_eq!(store.location(), dir);
        assert!(!path.exists());
        assert_eq!(load_tasks(&moved).unwrap(), vec![Task::new("a")]);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn change_location_rejects_missing_directory() {
        let path = temp_path("stay.json");
        let mut store = JsonTaskStore::new(&path);
        store.open().unwrap();

        let err = store
            .change_location(&temp_path("no-such-dir"))
            .unwrap_err();

        assert_eq!(err.code(), "invalid_path");
        assert_eq!(store.path(), path.as_path());
    }

    #[test]
    fn change_location_to_same_directory_keeps_file() {
        let dir = temp_path("same-dir");
        fs::create_dir_all(dir.join("sub")).unwrap();
        let path = dir.join("tasks.json");
        let mut store = JsonTaskStore::new(&path);
        store.open().unwrap();
        store.write_task(&Task::new("keep me")).unwrap();

        store.change_location(&dir.join("sub").join("..")).unwrap();
        store.close().unwrap();

        let loaded = load_tasks(&path).unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(store.path(), path.as_path());
        assert_eq!(loaded, vec![Task::new("keep me")]);
    }

    #[test]
    fn change_location_refuses_to_overwrite_existing_store() {
        let dir = temp_path("occupied");
        fs::create_dir_all(&dir).unwrap();
        let other = dir.join("tasks.json");
        save_tasks(&other, &[Task::new("theirs")]).unwrap();
        let path = temp_path("tasks.json");
        let mut store = JsonTaskStore::new(&path);
        store.open().unwrap();
        store.write_task(&Task::new("mine")).unwrap();

        let err = store.change_location(&dir).unwrap_err();
        let theirs = load_tasks(&other).unwrap();
        let mine = load_tasks(&path).unwrap();
        fs::remove_dir_all(&dir).ok();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "store_exists");
        assert_eq!(store.path(), path.as_path());
        assert_eq!(theirs, vec![Task::new("theirs")]);
        assert_eq!(mine, vec![Task::new("mine")]);
    }

    #[test]
    fn failed_save_leaves_tasks_unchanged() {
        let path = temp_path("unwritable");
        let mut store = JsonTaskStore::new(&path);
        store.open().unwrap();
        fs::create_dir_all(&path).unwrap();

        let err = store.write_task(&Task::new("ghost")).unwrap_err();
        let remaining = store.read_all_tasks().unwrap();
        fs::remove_dir_all(&path).ok();

        assert_eq!(err.code(), "io_error");
        assert!(remaining.is_empty());
    }
}
