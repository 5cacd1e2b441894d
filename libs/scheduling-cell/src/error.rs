use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus};

/// One field-level validation failure. `field` is the path of the offending
/// field in the request (`client.email`, `start_time`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Expected failures of store operations. Always returned as values so a
/// form-handling layer can render field-level feedback without exception
/// control flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
pub enum SchedulingError {
    #[error("appointment request failed validation")]
    Validation { errors: Vec<FieldError> },

    #[error("time slot not available")]
    Conflict { conflicts: Vec<Appointment> },

    #[error("appointment not found: {0}")]
    NotFound(Uuid),

    #[error("invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("appointment in status {status} cannot be rescheduled")]
    NotReschedulable { status: AppointmentStatus },
}

/// Malformed time or date input reaching a slot utility. This is a caller
/// bug: the validation layer parses user input before anything else touches
/// it, so a `FormatError` past that point means validation was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("time must match HH:MM (24h): {0:?}")]
    Time(String),

    #[error("date must match YYYY-MM-DD: {0:?}")]
    Date(String),

    #[error("time arithmetic left the calendar day")]
    OutOfDay,
}
