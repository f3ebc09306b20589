use std::path::PathBuf;
use thiserror::Error;

/// Misuse of a command's execute/undo lifecycle. These indicate a bug in the
/// caller, never bad user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("command has not been executed")]
    NotExecuted,
    #[error("command was already executed")]
    AlreadyExecuted,
    #[error("command was already undone")]
    AlreadyUndone,
    #[error("command cannot be undone")]
    NotUndoable,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Unknown command \"{0}\". Type \"help\" to see the available commands.")]
    UnknownCommand(String),
    #[error("There is no task number {index}.")]
    IndexInvalid { index: i64 },
    #[error("No commands to undo.")]
    NoHistory,
    #[error("\"{}\" is not an existing directory.", .0.display())]
    InvalidPath(PathBuf),
    #[error("A task store already exists at \"{}\".", .0.display())]
    StoreExists(PathBuf),
    #[error("\"{0}\" could not be found.")]
    TaskNotFound(String),
    #[error("{0}")]
    InvalidData(String),
    #[error("{0}")]
    Io(String),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn task_not_found<M: Into<String>>(name: M) -> Self {
        Self::TaskNotFound(name.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnknownCommand(_) => "unknown_command",
            Self::IndexInvalid { .. } => "index_invalid",
            Self::NoHistory => "no_history",
            Self::InvalidPath(_) => "invalid_path",
            Self::StoreExists(_) => "store_exists",
            Self::TaskNotFound(_) => "task_not_found",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::Lifecycle(_) => "internal_error",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidData(err.to_string())
    }
}
