// libs/scheduling-cell/src/services/validation.rs
//
// Rule-based validation of booking requests. Every rule failure is collected
// into the response; a rejected request always carries the complete list of
// field errors, never the first one found.

use chrono::{Datelike, Months, NaiveDate, NaiveTime, Timelike, Weekday};
use regex::Regex;
use tracing::{debug, warn};

use shared_config::SchedulingConfig;

use crate::error::FieldError;
use crate::models::{BookAppointmentRequest, Client, Room, ValidatedBooking};
use crate::services::slots;

pub struct ValidationService {
    config: SchedulingConfig,
    name_word: Regex,
    email: Regex,
    national_phone: Regex,
    sensitive: Vec<Regex>,
}

impl ValidationService {
    /// Compiles the rule patterns once. Panics if the config is unusable or a
    /// configured pattern does not compile - malformed policy is a deployment
    /// bug, not a user error.
    pub fn new(config: SchedulingConfig) -> Self {
        assert!(config.is_usable(), "scheduling config would reject every booking");

        let national_phone = Regex::new(&config.phone.national_pattern)
            .expect("configured phone pattern must be a valid regex");
        let sensitive = config
            .sensitive_note_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern).expect("configured sensitive-data pattern must be a valid regex")
            })
            .collect();

        Self {
            name_word: Regex::new(r"^[\p{L}]+(?:['’\-][\p{L}]+)*$").unwrap(),
            // Applied after trimming and lowercasing.
            email: Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$").unwrap(),
            national_phone,
            sensitive,
            config,
        }
    }

    /// Apply every rule to `request`. Either a fully normalized booking comes
    /// back, or the complete list of field failures.
    pub fn validate(
        &self,
        request: &BookAppointmentRequest,
        today: NaiveDate,
    ) -> Result<ValidatedBooking, Vec<FieldError>> {
        debug!(
            "Validating booking request for room {} on {}",
            request.room.id, request.date
        );

        let mut errors = Vec::new();

        let name = self
            .validate_client_name(&request.client.name)
            .map_err(|e| errors.push(e))
            .ok();
        let email = self
            .validate_client_email(&request.client.email)
            .map_err(|e| errors.push(e))
            .ok();
        let phone = match &request.client.phone {
            Some(raw) => match self.validate_client_phone(raw) {
                Ok(normalized) => Some(Some(normalized)),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            None => Some(None),
        };

        let slot = match self.validate_slot(
            &request.date,
            &request.start_time,
            request.duration_minutes,
            today,
        ) {
            Ok(slot) => Some(slot),
            Err(mut slot_errors) => {
                errors.append(&mut slot_errors);
                None
            }
        };

        if let Err(e) = self.validate_room(&request.room) {
            errors.push(e);
        }

        let notes = match &request.notes {
            Some(raw) => match self.validate_notes(raw) {
                Ok(normalized) => Some(Some(normalized)),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            None => Some(None),
        };

        match (name, email, phone, slot, notes) {
            (Some(name), Some(email), Some(phone), Some((date, start_time, end_time)), Some(notes))
                if errors.is_empty() =>
            {
                Ok(ValidatedBooking {
                    psychologist: request.psychologist.clone(),
                    client: Client {
                        id: request.client.id,
                        name,
                        email,
                        phone,
                    },
                    date,
                    start_time,
                    end_time,
                    room: request.room.clone(),
                    notes,
                })
            }
            _ => {
                warn!(
                    "Booking request rejected with {} validation error(s)",
                    errors.len()
                );
                Err(errors)
            }
        }
    }

    /// Validate the slot fields alone: date, start time, duration and the
    /// cross-field rules. Reschedules go through this, where the client and
    /// room are already on file.
    pub fn validate_slot(
        &self,
        date: &str,
        start_time: &str,
        duration_minutes: i32,
        today: NaiveDate,
    ) -> Result<(NaiveDate, NaiveTime, NaiveTime), Vec<FieldError>> {
        let mut errors = Vec::new();

        let date = self
            .validate_date(date, today)
            .map_err(|e| errors.push(e))
            .ok();
        let start = self
            .validate_start_time(start_time)
            .map_err(|e| errors.push(e))
            .ok();
        let duration = self
            .validate_duration(duration_minutes)
            .map_err(|e| errors.push(e))
            .ok();

        // Cross-field rules only make sense once both parts are individually
        // valid.
        let end = match (start, duration) {
            (Some(start), Some(duration)) => self
                .validate_interval(start, duration)
                .map_err(|e| errors.push(e))
                .ok(),
            _ => None,
        };

        match (date, start, end) {
            (Some(date), Some(start), Some(end)) if errors.is_empty() => Ok((date, start, end)),
            _ => Err(errors),
        }
    }

    fn validate_client_name(&self, raw: &str) -> Result<String, FieldError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if !(3..=100).contains(&length) {
            return Err(FieldError::new(
                "client.name",
                "name must be between 3 and 100 characters",
            ));
        }

        let words: Vec<&str> = trimmed.split_whitespace().collect();
        if words.len() < 2 {
            return Err(FieldError::new(
                "client.name",
                "both a given name and a family name are required",
            ));
        }
        if words.iter().any(|word| !self.name_word.is_match(word)) {
            return Err(FieldError::new(
                "client.name",
                "name may only contain letters, spaces, hyphens and apostrophes",
            ));
        }

        Ok(words
            .iter()
            .map(|word| capitalize_word(word))
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn validate_client_email(&self, raw: &str) -> Result<String, FieldError> {
        let email = raw.trim().to_lowercase();
        if email.len() > 254 || !self.email.is_match(&email) {
            return Err(FieldError::new(
                "client.email",
                "a valid email address is required",
            ));
        }

        let domain = email.split('@').nth(1).unwrap_or("");
        if self
            .config
            .disposable_email_domains
            .iter()
            .any(|denied| denied == domain)
        {
            return Err(FieldError::new(
                "client.email",
                "disposable email providers are not accepted",
            ));
        }

        Ok(email)
    }

    fn validate_client_phone(&self, raw: &str) -> Result<String, FieldError> {
        let compact: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let country_code = &self.config.phone.country_code;
        let international_prefix = format!("00{}", country_code.trim_start_matches('+'));
        let national = compact
            .strip_prefix(country_code.as_str())
            .or_else(|| compact.strip_prefix(international_prefix.as_str()))
            .unwrap_or(compact.as_str());

        if !self.national_phone.is_match(national) {
            return Err(FieldError::new(
                "client.phone",
                "phone number does not match the expected national format",
            ));
        }

        Ok(format!("{country_code}{national}"))
    }

    fn validate_date(&self, raw: &str, today: NaiveDate) -> Result<NaiveDate, FieldError> {
        let date = slots::parse_date(raw)
            .map_err(|_| FieldError::new("date", "date must be in YYYY-MM-DD format"))?;

        if date < today {
            return Err(FieldError::new("date", "date must not be in the past"));
        }

        let horizon = today
            .checked_add_months(Months::new(self.config.booking_horizon_months))
            .unwrap_or(NaiveDate::MAX);
        if date > horizon {
            return Err(FieldError::new(
                "date",
                format!(
                    "date must be within {} months from today",
                    self.config.booking_horizon_months
                ),
            ));
        }

        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(FieldError::new(
                "date",
                "appointments are not booked on weekends",
            ));
        }

        if let Some(holiday) = self
            .config
            .holidays
            .iter()
            .find(|h| h.month == date.month() && h.day == date.day())
        {
            return Err(FieldError::new(
                "date",
                format!("the clinic is closed on {}", holiday.label),
            ));
        }

        Ok(date)
    }

    fn validate_start_time(&self, raw: &str) -> Result<NaiveTime, FieldError> {
        let start = slots::parse_time(raw)
            .map_err(|_| FieldError::new("start_time", "start time must be in 24h HH:MM format"))?;

        let hours = self.config.business_hours;
        if start < hours.opens_at || start >= hours.closes_at {
            return Err(FieldError::new(
                "start_time",
                format!(
                    "start time must be between {} and {}",
                    slots::format_time(hours.opens_at),
                    slots::format_time(hours.closes_at)
                ),
            ));
        }

        let granularity = self.config.slot_granularity_minutes;
        if start.minute() % granularity != 0 {
            return Err(FieldError::new(
                "start_time",
                format!("start time must fall on a {granularity}-minute boundary"),
            ));
        }

        Ok(start)
    }

    fn validate_duration(&self, minutes: i32) -> Result<i32, FieldError> {
        let min = self.config.min_duration_minutes as i32;
        let max = self.config.max_duration_minutes as i32;
        if minutes < min || minutes > max {
            return Err(FieldError::new(
                "duration_minutes",
                format!("duration must be between {min} and {max} minutes"),
            ));
        }

        if minutes % self.config.slot_granularity_minutes as i32 != 0 {
            return Err(FieldError::new(
                "duration_minutes",
                format!(
                    "duration must be a multiple of {} minutes",
                    self.config.slot_granularity_minutes
                ),
            ));
        }

        Ok(minutes)
    }

    fn validate_room(&self, room: &Room) -> Result<(), FieldError> {
        if room.id.trim().is_empty() {
            return Err(FieldError::new("room", "a room is required"));
        }
        if !room.available {
            return Err(FieldError::new(
                "room",
                format!("room {} is not open for booking", room.room_number),
            ));
        }
        Ok(())
    }

    fn validate_notes(&self, raw: &str) -> Result<String, FieldError> {
        if raw.chars().count() > self.config.max_notes_length {
            return Err(FieldError::new(
                "notes",
                format!(
                    "notes must not exceed {} characters",
                    self.config.max_notes_length
                ),
            ));
        }

        if self.sensitive.iter().any(|pattern| pattern.is_match(raw)) {
            return Err(FieldError::new(
                "notes",
                "notes must not contain identity or payment numbers",
            ));
        }

        Ok(raw.to_string())
    }

    /// Cross-field rules: the appointment must end by close of business and
    /// must not touch a blackout window. The blackout test is a full interval
    /// overlap - an appointment ending exactly when a window starts is fine.
    fn validate_interval(
        &self,
        start: NaiveTime,
        duration_minutes: i32,
    ) -> Result<NaiveTime, FieldError> {
        let close = self.config.business_hours.closes_at;
        let end_minutes = slots::to_minutes(start) + duration_minutes;
        if end_minutes > slots::to_minutes(close) {
            return Err(FieldError::new(
                "start_time",
                format!("the appointment must end by {}", slots::format_time(close)),
            ));
        }

        let end = match slots::from_minutes(end_minutes) {
            Some(end) => end,
            None => {
                return Err(FieldError::new(
                    "start_time",
                    "the appointment must end within the same day",
                ))
            }
        };

        for window in &self.config.blackout_windows {
            if slots::overlaps(start, end, window.start, window.end) {
                return Err(FieldError::new(
                    "start_time",
                    format!(
                        "the slot overlaps the {} break ({} - {})",
                        window.label,
                        slots::format_time(window.start),
                        slots::format_time(window.end)
                    ),
                ));
            }
        }

        Ok(end)
    }
}

fn capitalize_word(word: &str) -> String {
    word.split('-')
        .map(capitalize_segment)
        .collect::<Vec<_>>()
        .join("-")
}

fn capitalize_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
