pub mod command;
pub mod config;
pub mod error;
pub mod help;
pub mod history;
pub mod model;
pub mod parser;
pub mod render;
pub mod search;
pub mod session;
pub mod storage;

pub use command::{Action, Command, ExecutionState};
pub use error::{AppError, LifecycleError};
pub use model::{DeltaTask, FieldChange, Task, TaskKind};
pub use session::Session;
pub use storage::{JsonTaskStore, MemoryTaskStore, TaskStore};
