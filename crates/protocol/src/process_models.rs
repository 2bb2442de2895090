//! Runtime models for external commands and the supervised server.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of the supervised mock server.
///
/// The state only moves forward:
/// NotStarted -> Running -> Exited | Killed
///
/// Both `Exited` and `Killed` are terminal. There is no restart.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupervisorState {
    /// The executable has not been launched yet.
    NotStarted,

    /// The executable is running and being watched.
    Running,

    /// The executable ended on its own.
    Exited,

    /// The executable was killed after a termination request.
    Killed,
}

impl SupervisorState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SupervisorState::Exited | SupervisorState::Killed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: SupervisorState) -> bool {
        matches!(
            (self, next),
            (SupervisorState::NotStarted, SupervisorState::Running)
                | (SupervisorState::Running, SupervisorState::Exited)
                | (SupervisorState::Running, SupervisorState::Killed)
        )
    }
}

/// Exit status of an external command.
///
/// `code` is `None` when the process was ended by a signal, in which case
/// `signal` carries the signal number where the platform reports one.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl CommandStatus {
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn from_signal(signal: i32) -> Self {
        Self {
            code: None,
            signal: Some(signal),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit status {code}"),
            (None, Some(signal)) => write!(f, "terminated by signal {signal}"),
            (None, None) => write!(f, "terminated abnormally"),
        }
    }
}

/// Termination requests the supervisor listens for.
///
/// Only signals a process is able to intercept appear here. The kill signal
/// cannot be caught, so registering for it would never fire.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TerminationSignal {
    /// SIGINT, usually Ctrl-C.
    Interrupt,

    /// SIGTERM.
    Terminate,
}

impl fmt::Display for TerminationSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationSignal::Interrupt => f.write_str("SIGINT"),
            TerminationSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_only() {
        use SupervisorState::*;
        assert!(NotStarted.can_transition_to(Running));
        assert!(Running.can_transition_to(Exited));
        assert!(Running.can_transition_to(Killed));

        assert!(!NotStarted.can_transition_to(Exited));
        assert!(!Exited.can_transition_to(Running));
        assert!(!Killed.can_transition_to(Exited));
        assert!(!Exited.can_transition_to(Killed));
    }

    #[test]
    fn test_command_status_display() {
        assert_eq!(CommandStatus::from_code(2).to_string(), "exit status 2");
        assert_eq!(
            CommandStatus::from_signal(9).to_string(),
            "terminated by signal 9"
        );
        assert!(CommandStatus::from_code(0).success());
        assert!(!CommandStatus::from_signal(15).success());
    }
}
