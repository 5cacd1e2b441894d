// libs/scheduling-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Psychologist {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub room_number: String,
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub psychologist: Psychologist,
    pub client: Client,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Room,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Canonical status vocabulary. The legacy Spanish terms are accepted on
/// deserialization only and are never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[serde(alias = "pendiente")]
    Pending,

    #[serde(alias = "en_progreso")]
    InProgress,

    #[serde(alias = "terminada")]
    Completed,

    #[serde(alias = "cancelada")]
    Cancelled,
}

impl AppointmentStatus {
    /// Terminal states can never be left.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }

    /// Whether an appointment in this status still occupies its slot.
    /// Cancellation frees the slot; everything else keeps it, completed
    /// appointments included, since history occupies the room.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::InProgress => write!(f, "in_progress"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// Raw booking request as it arrives from the caller. Dates and times are
/// strings on purpose: the validation layer owns their parsing and
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub psychologist: Psychologist,
    pub client: Client,
    pub date: String,
    pub start_time: String,
    pub duration_minutes: i32,
    pub room: Room,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date: String,
    pub start_time: String,
    /// Keeps the current duration when absent.
    pub duration_minutes: Option<i32>,
    pub reason: Option<String>,
}

/// A booking request that passed every validation rule: client fields
/// normalized, date and times parsed, end time computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedBooking {
    pub psychologist: Psychologist,
    pub client: Client,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room: Room,
    pub notes: Option<String>,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// Which resource must be exclusively held for the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusivityMode {
    Room,
    Psychologist,
}

/// A proposed slot, persisted or hypothetical. `exclude_appointment_id`
/// lets a reschedule check ignore the appointment's own current slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotCandidate {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub room_id: String,
    pub psychologist_id: Uuid,
    pub exclude_appointment_id: Option<Uuid>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityCheck {
    pub available: bool,
    pub conflicts: Vec<Appointment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&AppointmentStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
    }

    #[test]
    fn status_accepts_legacy_spanish_vocabulary() {
        let status: AppointmentStatus = serde_json::from_str("\"pendiente\"").unwrap();
        assert_eq!(status, AppointmentStatus::Pending);

        let status: AppointmentStatus = serde_json::from_str("\"en_progreso\"").unwrap();
        assert_eq!(status, AppointmentStatus::InProgress);

        let status: AppointmentStatus = serde_json::from_str("\"terminada\"").unwrap();
        assert_eq!(status, AppointmentStatus::Completed);

        let status: AppointmentStatus = serde_json::from_str("\"cancelada\"").unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn terminal_statuses_are_sealed_and_cancelled_frees_the_slot() {
        assert!(AppointmentStatus::Completed.is_terminal());
        assert!(AppointmentStatus::Cancelled.is_terminal());
        assert!(!AppointmentStatus::Pending.is_terminal());

        assert!(AppointmentStatus::Completed.blocks_slot());
        assert!(AppointmentStatus::Pending.blocks_slot());
        assert!(!AppointmentStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn status_display_matches_wire_form() {
        assert_eq!(AppointmentStatus::InProgress.to_string(), "in_progress");
        assert_eq!(AppointmentStatus::Cancelled.to_string(), "cancelled");
    }
}
