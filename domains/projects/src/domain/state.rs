//! State machine for project status
//!
//! Project states: Active ⇄ Inactive. Neither state is terminal.

use serde::{Deserialize, Serialize};

pub use shipwright_common::StateError;

/// Project states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectState {
    Active,
    Inactive,
}

impl ProjectState {
    /// Get all valid next states from current state
    pub fn valid_transitions(&self) -> &'static [ProjectState] {
        match self {
            Self::Active => &[Self::Inactive],
            Self::Inactive => &[Self::Active],
        }
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// Events that trigger project state transitions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectEvent {
    /// Put the project back into the working set
    Activate,
    /// Park the project
    Deactivate,
}

impl std::fmt::Display for ProjectEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Activate => write!(f, "activate"),
            Self::Deactivate => write!(f, "deactivate"),
        }
    }
}

/// Project state machine
pub struct ProjectStateMachine;

impl ProjectStateMachine {
    /// Attempt a state transition
    pub fn transition(
        current: ProjectState,
        event: ProjectEvent,
    ) -> Result<ProjectState, StateError> {
        match (current, event) {
            (ProjectState::Inactive, ProjectEvent::Activate) => Ok(ProjectState::Active),
            (ProjectState::Active, ProjectEvent::Deactivate) => Ok(ProjectState::Inactive),
            _ => Err(StateError::InvalidTransition {
                from: current.to_string(),
                to: "unknown".to_string(),
                event: event.to_string(),
            }),
        }
    }

    /// Check if a transition is valid without performing it
    pub fn can_transition(current: ProjectState, event: ProjectEvent) -> bool {
        Self::transition(current, event).is_ok()
    }

    /// Event that moves `from` to `to`, if any
    pub fn event_for(from: ProjectState, to: ProjectState) -> Option<ProjectEvent> {
        match (from, to) {
            (ProjectState::Inactive, ProjectState::Active) => Some(ProjectEvent::Activate),
            (ProjectState::Active, ProjectState::Inactive) => Some(ProjectEvent::Deactivate),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_to_inactive() {
        let result = ProjectStateMachine::transition(ProjectState::Active, ProjectEvent::Deactivate);
        assert_eq!(result, Ok(ProjectState::Inactive));
    }

    #[test]
    fn test_inactive_to_active() {
        let result = ProjectStateMachine::transition(ProjectState::Inactive, ProjectEvent::Activate);
        assert_eq!(result, Ok(ProjectState::Active));
    }

    #[test]
    fn test_activate_when_active_is_invalid() {
        let result = ProjectStateMachine::transition(ProjectState::Active, ProjectEvent::Activate);
        assert_eq!(
            result,
            Err(StateError::InvalidTransition {
                from: "active".to_string(),
                to: "unknown".to_string(),
                event: "activate".to_string(),
            })
        );
    }

    #[test]
    fn test_deactivate_when_inactive_is_invalid() {
        assert!(!ProjectStateMachine::can_transition(
            ProjectState::Inactive,
            ProjectEvent::Deactivate
        ));
    }

    #[test]
    fn test_valid_transitions_agree_with_machine() {
        for state in [ProjectState::Active, ProjectState::Inactive] {
            for next in state.valid_transitions() {
                let event = ProjectStateMachine::event_for(state, *next).unwrap();
                assert_eq!(ProjectStateMachine::transition(state, event), Ok(*next));
            }
        }
    }

    #[test]
    fn test_no_event_for_same_state() {
        assert_eq!(
            ProjectStateMachine::event_for(ProjectState::Active, ProjectState::Active),
            None
        );
    }
}
