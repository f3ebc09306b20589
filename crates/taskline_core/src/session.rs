use crate::command::Command;
use crate::error::AppError;
use crate::history::History;
use crate::model::Task;
use crate::parser;
use crate::storage::TaskStore;
use tracing::{debug, warn};

/// State that lives for one run of the program: the store, the undo history
/// and the tasks most recently shown to the user.
pub struct Session {
    store: Box<dyn TaskStore>,
    history: History,
    last_shown: Vec<Task>,
    finished: bool,
}

impl Session {
    pub fn new(store: Box<dyn TaskStore>) -> Self {
        Self {
            store,
            history: History::new(),
            last_shown: Vec::new(),
            finished: false,
        }
    }

    /// Parses and runs one line of input.
    pub fn process_input(&mut self, line: &str) -> Result<Command, AppError> {
        let command = parser::parse(line)?;
        self.run(command)
    }

    /// Executes `command`, opening the store first if needed. Successful
    /// reversible commands are added to the history.
    pub fn run(&mut self, mut command: Command) -> Result<Command, AppError> {
        if self.finished {
            return Err(AppError::invalid_input("The session has already ended."));
        }
        if !self.store.is_open() {
            debug!("opening task store");
            self.store.open()?;
        }

        if let Err(err) = command.execute(self) {
            warn!(
                command = command.action().keyword(),
                code = err.code(),
                "command failed"
            );
            return Err(err);
        }

        self.history.record_if_undoable(&command);
        Ok(command)
    }

    /// Pops the most recent reversible command and undoes it. The entry is
    /// not restored if undoing fails.
    pub fn undo_last(&mut self) -> Result<Command, AppError> {
        let mut command = self.history.pop().ok_or(AppError::NoHistory)?;
        command.undo(self)?;
        Ok(command)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Tasks from the most recent `list`, which numbered commands refer to.
    pub fn last_shown(&self) -> &[Task] {
        &self.last_shown
    }

    pub fn store(&self) -> &dyn TaskStore {
        self.store.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Releases the store. Safe to call more than once.
    pub fn close(&mut self) -> Result<(), AppError> {
        if self.store.is_open() {
            self.store.close()?;
        }
        Ok(())
    }

    pub(crate) fn store_mut(&mut self) -> &mut dyn TaskStore {
        self.store.as_mut()
    }

    pub(crate) fn set_last_shown(&mut self, tasks: Vec<Task>) {
        self.last_shown = tasks;
    }

    pub(crate) fn replace_shown(&mut self, old: &Task, new: &Task) {
        if let Some(slot) = self.last_shown.iter_mut().find(|task| **task == *old) {
            *slot = new.clone();
        }
    }

    pub(crate) fn finish(&mut self) -> Result<(), AppError> {
        self.finished = true;
        self.close()
    }
}
