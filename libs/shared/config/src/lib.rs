use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Scheduling policy for a deployment.
///
/// Everything here is policy, not code: business hours, slot granularity,
/// holidays, blackout windows and the various deny-lists vary per clinic and
/// are injected into the scheduling services rather than hardcoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingConfig {
    pub business_hours: BusinessHours,
    /// Appointments must start on a multiple of this many minutes past the
    /// hour, and durations must be a multiple of it as well.
    pub slot_granularity_minutes: u32,
    pub min_duration_minutes: u32,
    pub max_duration_minutes: u32,
    /// How far ahead a booking may be placed, counted from today.
    pub booking_horizon_months: u32,
    /// Windows inside business hours that cannot be booked (lunch, cleaning).
    pub blackout_windows: Vec<BlackoutWindow>,
    /// Recurring holidays, matched on month and day with the year ignored.
    pub holidays: Vec<Holiday>,
    /// Email domains rejected outright (disposable-mailbox providers).
    pub disposable_email_domains: Vec<String>,
    pub phone: PhoneFormat,
    pub max_notes_length: usize,
    /// Regexes that flag sensitive data in free-text notes.
    pub sensitive_note_patterns: Vec<String>,
    /// When set, a psychologist cannot hold two overlapping appointments even
    /// in different rooms.
    pub enforce_psychologist_exclusivity: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BusinessHours {
    pub opens_at: NaiveTime,
    /// Exclusive: the last appointment must end at or before this time.
    pub closes_at: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlackoutWindow {
    pub label: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holiday {
    pub month: u32,
    pub day: u32,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneFormat {
    /// Prefix of the canonical form, e.g. "+34".
    pub country_code: String,
    /// Regex the national number (separators stripped) must match.
    pub national_pattern: String,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            opens_at: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            closes_at: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        }
    }
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            business_hours: BusinessHours::default(),
            slot_granularity_minutes: 15,
            min_duration_minutes: 30,
            max_duration_minutes: 120,
            booking_horizon_months: 6,
            blackout_windows: vec![BlackoutWindow {
                label: "lunch".to_string(),
                start: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            }],
            holidays: vec![
                Holiday { month: 1, day: 1, label: "Año Nuevo".to_string() },
                Holiday { month: 1, day: 6, label: "Epifanía".to_string() },
                Holiday { month: 5, day: 1, label: "Día del Trabajador".to_string() },
                Holiday { month: 8, day: 15, label: "Asunción".to_string() },
                Holiday { month: 10, day: 12, label: "Fiesta Nacional".to_string() },
                Holiday { month: 12, day: 6, label: "Día de la Constitución".to_string() },
                Holiday { month: 12, day: 25, label: "Navidad".to_string() },
            ],
            disposable_email_domains: vec![
                "mailinator.com".to_string(),
                "guerrillamail.com".to_string(),
                "10minutemail.com".to_string(),
                "yopmail.com".to_string(),
                "tempmail.com".to_string(),
                "trashmail.com".to_string(),
            ],
            phone: PhoneFormat {
                country_code: "+34".to_string(),
                national_pattern: r"^[6789]\d{8}$".to_string(),
            },
            max_notes_length: 500,
            sensitive_note_patterns: vec![
                // National-ID-like: 8 digits followed by a control letter
                r"\b\d{8}[A-Za-z]\b".to_string(),
                // Payment-card-like: four groups of four digits
                r"\b\d{4}[\s\-]?\d{4}[\s\-]?\d{4}[\s\-]?\d{4}\b".to_string(),
            ],
            enforce_psychologist_exclusivity: true,
        }
    }
}

impl SchedulingConfig {
    /// Sanity check for hand-built or deserialized configs. A config that
    /// fails this would reject every request, which is a deployment mistake
    /// rather than a policy choice.
    pub fn is_usable(&self) -> bool {
        let usable = self.business_hours.opens_at < self.business_hours.closes_at
            && self.slot_granularity_minutes > 0
            && self.min_duration_minutes > 0
            && self.min_duration_minutes <= self.max_duration_minutes;

        if !usable {
            warn!("scheduling config is not usable - every booking would be rejected");
        }

        usable
    }
}
