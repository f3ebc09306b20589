use crate::command::{Command, ExecutionState};
use tracing::debug;

/// Executed, reversible commands, most recent last.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Command>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `command` if it executed successfully and can be undone.
    /// Returns whether it was recorded.
    pub fn record_if_undoable(&mut self, command: &Command) -> bool {
        if command.state() != ExecutionState::Executed || !command.is_undoable() {
            return false;
        }

        self.entries.push(command.clone());
        debug!(
            command = command.action().keyword(),
            depth = self.entries.len(),
            "recorded command"
        );
        true
    }

    pub fn pop(&mut self) -> Option<Command> {
        self.entries.pop()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
