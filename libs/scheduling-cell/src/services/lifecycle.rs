// libs/scheduling-cell/src/services/lifecycle.rs
use tracing::{debug, warn};

use shared_models::scheduling::AppointmentStatus;

use crate::models::SchedulingError;

/// The allowed-transition set for status updates, as an explicit policy
/// value rather than an implicit absence of checks.
///
/// The default is permissive: any of the three statuses may be applied to an
/// appointment that exists, including moving a cancelled appointment back to
/// scheduled. `Restricted` is the strict alternative for deployments that
/// want terminal states frozen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransitionPolicy {
    #[default]
    Permissive,
    Restricted,
}

impl TransitionPolicy {
    pub fn allowed_targets(&self, from: AppointmentStatus) -> Vec<AppointmentStatus> {
        match self {
            TransitionPolicy::Permissive => vec![
                AppointmentStatus::Scheduled,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
            ],
            TransitionPolicy::Restricted => match from {
                AppointmentStatus::Scheduled => vec![
                    AppointmentStatus::Completed,
                    AppointmentStatus::Cancelled,
                ],
                // Terminal under the strict policy
                AppointmentStatus::Completed | AppointmentStatus::Cancelled => vec![],
            },
        }
    }

    pub fn validate(
        &self,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> Result<(), SchedulingError> {
        debug!("Validating status transition {} -> {}", from, to);

        if self.allowed_targets(from).contains(&to) {
            Ok(())
        } else {
            warn!("Invalid status transition attempted: {} -> {}", from, to);
            Err(SchedulingError::InvalidTransition { from, to })
        }
    }
}
