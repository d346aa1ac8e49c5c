//! Scheduled units of work.

use std::time::Duration;

use crate::source::FlightSource;

/// How a task is driven: once, as soon as a worker is free, or on a fixed
/// cadence forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Immediate,
    Recurring { interval: Duration },
}

impl TaskKind {
    pub const fn is_recurring(&self) -> bool {
        matches!(self, Self::Recurring { .. })
    }

    pub const fn interval(&self) -> Option<Duration> {
        match self {
            Self::Immediate => None,
            Self::Recurring { interval } => Some(*interval),
        }
    }
}

/// One registered fetch task.
///
/// The identity is derived from (kind, source index), so re-registering the
/// same source list produces the same ids — reset-then-register is
/// idempotent by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub source: FlightSource,
    pub kind: TaskKind,
}

impl Task {
    pub fn immediate(index: usize, source: FlightSource) -> Self {
        Self {
            id: format!("immediate_{index}"),
            source,
            kind: TaskKind::Immediate,
        }
    }

    pub fn recurring(index: usize, source: FlightSource, interval: Duration) -> Self {
        Self {
            id: format!("repeat_{index}"),
            source,
            kind: TaskKind::Recurring { interval },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_ids_are_deterministic_per_kind_and_index() {
        let source = FlightSource::new("alpha", "https://example.test/a");

        let immediate = Task::immediate(0, source.clone());
        assert_eq!(immediate.id, "immediate_0");
        assert_eq!(immediate.kind.interval(), None);

        let recurring = Task::recurring(0, source, Duration::from_secs(60));
        assert_eq!(recurring.id, "repeat_0");
        assert!(recurring.kind.is_recurring());
        assert_eq!(
            recurring.kind.interval(),
            Some(Duration::from_secs(60))
        );
    }
}
