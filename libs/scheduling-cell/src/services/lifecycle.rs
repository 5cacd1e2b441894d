// libs/scheduling-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use crate::error::SchedulingError;
use crate::models::AppointmentStatus;

/// The appointment state machine:
///
/// `pending -> in_progress -> completed`, with `cancelled` reachable from
/// `pending` and `in_progress`. `completed` and `cancelled` are terminal.
pub struct AppointmentLifecycle;

impl AppointmentLifecycle {
    pub fn new() -> Self {
        Self
    }

    /// Validate that a status transition is allowed. State is untouched on
    /// failure; the store only writes after this returns `Ok`.
    pub fn validate_transition(
        &self,
        current: AppointmentStatus,
        next: AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        debug!("Validating status transition {} -> {}", current, next);

        if !self.valid_transitions(current).contains(&next) {
            warn!("Invalid status transition attempted: {} -> {}", current, next);
            return Err(SchedulingError::InvalidTransition {
                from: current,
                to: next,
            });
        }

        Ok(())
    }

    /// All statuses reachable in one step from `current`.
    pub fn valid_transitions(&self, current: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::InProgress,
                AppointmentStatus::Cancelled,
            ],
            AppointmentStatus::InProgress => vec![
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed => vec![],
            AppointmentStatus::Cancelled => vec![],
        }
    }
}

impl Default for AppointmentLifecycle {
    fn default() -> Self {
        Self::new()
    }
}
