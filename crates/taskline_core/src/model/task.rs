use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
    #[serde(default)]
    pub done: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Unscheduled,
    Deadline,
    Event,
}

impl Task {
    pub fn new<N: Into<String>>(name: N) -> Self {
        Self {
            name: name.into(),
            start: None,
            end: None,
            done: false,
        }
    }

    pub fn with_start(mut self, start: OffsetDateTime) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: OffsetDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Storage identity: name and schedule. Completion is mutable state and
    /// does not take part.
    pub fn same_identity(&self, other: &Task) -> bool {
        self.name == other.name && self.start == other.start && self.end == other.end
    }

    /// A task with only a start time is treated as an open-ended event.
    pub fn kind(&self) -> TaskKind {
        match (self.start, self.end) {
            (None, None) => TaskKind::Unscheduled,
            (None, Some(_)) => TaskKind::Deadline,
            (Some(_), _) => TaskKind::Event,
        }
    }

    pub fn toggled(&self) -> Task {
        Task {
            done: !self.done,
            ..self.clone()
        }
    }
}
