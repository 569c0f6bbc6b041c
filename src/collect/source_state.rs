use std::fmt;

/// Per-source collection state
///
/// `Pending -> Running -> {Completed, BudgetExhausted, Cancelled,
/// ErrorAborted}`. Ordinary per-URL failures never change the state;
/// `ErrorAborted` is reserved for configuration-level failures discovered at
/// frontier time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceState {
    /// Source selected but collection has not started
    Pending,

    /// Pull loop is executing
    Running,

    /// Frontier exhausted without unrecoverable error
    Completed,

    /// Accepting the next document would have exceeded the budget
    BudgetExhausted,

    /// Stopped early by a shutdown request; already-persisted items stand
    Cancelled,

    /// Unrecoverable configuration error (e.g. link regex failed to compile)
    ErrorAborted,
}

impl SourceState {
    /// True once the source will do no further work
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending | Self::Running)
    }

    /// True when the source ended without an unrecoverable error
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Completed | Self::BudgetExhausted | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::BudgetExhausted => "budget_exhausted",
            Self::Cancelled => "cancelled",
            Self::ErrorAborted => "error_aborted",
        }
    }
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_terminal() {
        assert!(!SourceState::Pending.is_terminal());
        assert!(!SourceState::Running.is_terminal());

        assert!(SourceState::Completed.is_terminal());
        assert!(SourceState::BudgetExhausted.is_terminal());
        assert!(SourceState::Cancelled.is_terminal());
        assert!(SourceState::ErrorAborted.is_terminal());
    }

    #[test]
    fn test_is_ok() {
        assert!(SourceState::Completed.is_ok());
        assert!(SourceState::BudgetExhausted.is_ok());
        assert!(SourceState::Cancelled.is_ok());

        assert!(!SourceState::ErrorAborted.is_ok());
        assert!(!SourceState::Running.is_ok());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", SourceState::BudgetExhausted), "budget_exhausted");
        assert_eq!(format!("{}", SourceState::Completed), "completed");
    }
}
