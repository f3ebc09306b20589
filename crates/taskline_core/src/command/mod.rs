use crate::error::{AppError, LifecycleError};
use crate::model::{DeltaTask, Task};
use crate::session::Session;
use std::path::PathBuf;
use tracing::info;

mod ops;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveTarget {
    /// 1-based position in the most recently listed tasks.
    Index(i64),
    Name(String),
}

/// What a command was asked to do, exactly as parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { task: Task },
    Remove { target: RemoveTarget },
    Update { index: i64, delta: DeltaTask },
    Done { index: i64 },
    List { keywords: Vec<String> },
    Undo,
    Clear,
    Relocate { path: PathBuf },
    Help { topic: Option<String> },
    Exit,
    Invalid { keyword: String },
}

impl Action {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Remove { .. } => "remove",
            Self::Update { .. } => "update",
            Self::Done { .. } => "done",
            Self::List { .. } => "list",
            Self::Undo => "undo",
            Self::Clear => "reformat",
            Self::Relocate { .. } => "relocate",
            Self::Help { .. } => "help",
            Self::Exit => "exit",
            Self::Invalid { .. } => "invalid",
        }
    }

    /// Commands that change persisted state and know how to reverse it.
    pub fn is_undoable(&self) -> bool {
        matches!(
            self,
            Self::Add { .. }
                | Self::Remove { .. }
                | Self::Update { .. }
                | Self::Done { .. }
                | Self::Clear
                | Self::Relocate { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionState {
    NotExecuted,
    Executed,
    Undone,
}

/// What execution resolved and changed; enough to render messages and to
/// reverse the change.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    Added(Task),
    Removed(Task),
    Updated { old: Task, new: Task },
    Toggled { old: Task, new: Task },
    Listed(String),
    Undid(String),
    Cleared(Vec<Task>),
    Relocated { previous: PathBuf, current: PathBuf },
    Helped(String),
    Exited,
}

/// A single-use command: executed at most once, undone at most once.
#[derive(Debug, Clone)]
pub struct Command {
    action: Action,
    state: ExecutionState,
    outcome: Option<Outcome>,
}

impl PartialEq for Command {
    fn eq(&self, other: &Self) -> bool {
        self.action == other.action
    }
}

impl Eq for Command {}

impl Command {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            state: ExecutionState::NotExecuted,
            outcome: None,
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn is_undoable(&self) -> bool {
        self.action.is_undoable()
    }

    pub fn execute(&mut self, session: &mut Session) -> Result<(), AppError> {
        if self.state != ExecutionState::NotExecuted {
            return Err(LifecycleError::AlreadyExecuted.into());
        }

        let outcome = ops::execute(&self.action, session)?;
        info!(command = self.action.keyword(), "executed command");
        self.outcome = Some(outcome);
        self.state = ExecutionState::Executed;
        Ok(())
    }

    /// Reverses a successful execution. A failed undo leaves the command in
    /// the executed state.
    pub fn undo(&mut self, session: &mut Session) -> Result<(), AppError> {
        if !self.is_undoable() {
            return Err(LifecycleError::NotUndoable.into());
        }
        let outcome = match self.state {
            ExecutionState::NotExecuted => return Err(LifecycleError::NotExecuted.into()),
            ExecutionState::Undone => return Err(LifecycleError::AlreadyUndone.into()),
            ExecutionState::Executed => self.recorded_outcome()?,
        };

        ops::undo(outcome, session)?;
        info!(command = self.action.keyword(), "undid command");
        self.state = ExecutionState::Undone;
        Ok(())
    }

    pub fn success_message(&self) -> Result<String, LifecycleError> {
        Ok(ops::success_message(self.recorded_outcome()?))
    }

    /// The message shown when this command is reversed by `undo`.
    pub fn undo_message(&self) -> Result<String, LifecycleError> {
        if !self.is_undoable() {
            return Err(LifecycleError::NotUndoable);
        }
        ops::undo_message(self.recorded_outcome()?).ok_or(LifecycleError::NotUndoable)
    }

    fn recorded_outcome(&self) -> Result<&Outcome, LifecycleError> {
        self.outcome.as_ref().ok_or(LifecycleError::NotExecuted)
    }
}
