mod delta;
mod task;
pub mod timestamp;

pub use delta::{DeltaTask, FieldChange};
pub use task::{Task, TaskKind};
