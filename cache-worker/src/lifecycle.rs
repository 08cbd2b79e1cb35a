//! Worker lifecycle
//!
//! Handles worker state transitions and records the lifecycle events they
//! raise.

use crate::error::WorkerError;

/// Worker states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkerState {
    /// Initial state, not yet installing
    #[default]
    Parsed,
    /// Precaching the manifest
    Installing,
    /// Installed, waiting to activate
    Installed,
    /// Cleaning up old caches
    Activating,
    /// Active and controlling pages
    Activated,
    /// Failed or replaced
    Redundant,
}

/// Lifecycle event types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Install,
    Activate,
    StateChange {
        old_state: WorkerState,
        new_state: WorkerState,
    },
    /// The worker took control of open pages
    ControllerChange,
}

/// Lifecycle manager
#[derive(Debug, Default)]
pub struct LifecycleManager {
    state: WorkerState,
    pending_events: Vec<LifecycleEvent>,
}

impl LifecycleManager {
    /// Create new lifecycle manager
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Get pending events
    pub fn pending_events(&self) -> &[LifecycleEvent] {
        &self.pending_events
    }

    /// Clear pending events
    pub fn clear_pending(&mut self) {
        self.pending_events.clear();
    }

    /// Transition worker state
    pub fn transition(&mut self, new_state: WorkerState) -> Result<(), WorkerError> {
        let old_state = self.state;

        if !is_valid_transition(old_state, new_state) {
            return Err(WorkerError::InvalidStateTransition {
                from: old_state,
                to: new_state,
            });
        }

        self.state = new_state;
        log::debug!("[AssetCache] {:?} -> {:?}", old_state, new_state);

        self.pending_events.push(LifecycleEvent::StateChange {
            old_state,
            new_state,
        });
        match new_state {
            WorkerState::Installing => self.pending_events.push(LifecycleEvent::Install),
            WorkerState::Activating => self.pending_events.push(LifecycleEvent::Activate),
            _ => {}
        }

        Ok(())
    }

    /// Skip waiting (start activating an installed worker right away)
    pub fn skip_waiting(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Installed {
            return Err(WorkerError::InvalidStateTransition {
                from: self.state,
                to: WorkerState::Activating,
            });
        }
        self.transition(WorkerState::Activating)
    }

    /// Claim clients (take control of all open pages)
    pub fn claim(&mut self) -> Result<(), WorkerError> {
        if self.state != WorkerState::Activated {
            return Err(WorkerError::InvalidStateTransition {
                from: self.state,
                to: WorkerState::Activated,
            });
        }
        self.pending_events.push(LifecycleEvent::ControllerChange);
        Ok(())
    }
}

/// Check if a state transition is valid
fn is_valid_transition(from: WorkerState, to: WorkerState) -> bool {
    use WorkerState::*;

    matches!(
        (from, to),
        (Parsed, Installing)
            | (Installing, Installed)
            | (Installing, Redundant)
            | (Installed, Activating)
            | (Activating, Activated)
            | (Activating, Redundant)
            | (Activated, Redundant)
    )
}
