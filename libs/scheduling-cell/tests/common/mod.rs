// Shared fixtures for the scheduling-cell behavior tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use scheduling_cell::{AppointmentStore, BookAppointmentRequest, Client, FixedClock, Psychologist, Room};
use shared_config::SchedulingConfig;

pub const PSYCHOLOGIST_ID: &str = "550e8400-e29b-41d4-a716-446655440000";
pub const CLIENT_ID: &str = "550e8400-e29b-41d4-a716-446655440001";
pub const OTHER_PSYCHOLOGIST_ID: &str = "550e8400-e29b-41d4-a716-446655440002";

/// Frozen "today" for every suite: Saturday 2025-03-01, 08:00 UTC.
pub fn test_clock() -> FixedClock {
    FixedClock::at("2025-03-01T08:00:00Z".parse::<DateTime<Utc>>().unwrap())
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
}

pub fn store() -> AppointmentStore {
    store_with(SchedulingConfig::default())
}

pub fn store_with(config: SchedulingConfig) -> AppointmentStore {
    AppointmentStore::new(config, Arc::new(test_clock()))
}

pub fn psychologist() -> Psychologist {
    Psychologist {
        id: Uuid::parse_str(PSYCHOLOGIST_ID).unwrap(),
        name: "Laura Ferrer".to_string(),
        email: "laura.ferrer@clinic.example".to_string(),
    }
}

pub fn other_psychologist() -> Psychologist {
    Psychologist {
        id: Uuid::parse_str(OTHER_PSYCHOLOGIST_ID).unwrap(),
        name: "Carlos Ruiz".to_string(),
        email: "carlos.ruiz@clinic.example".to_string(),
    }
}

pub fn client() -> Client {
    Client {
        id: Uuid::parse_str(CLIENT_ID).unwrap(),
        name: "María García".to_string(),
        email: "Maria.Garcia@Example.com".to_string(),
        phone: Some("612 345 678".to_string()),
    }
}

pub fn room_a101() -> Room {
    Room {
        id: "A-101".to_string(),
        room_number: "A-101".to_string(),
        available: true,
    }
}

pub fn room_b202() -> Room {
    Room {
        id: "B-202".to_string(),
        room_number: "B-202".to_string(),
        available: true,
    }
}

pub fn request(date: &str, start: &str, duration: i32) -> BookAppointmentRequest {
    request_for(psychologist(), room_a101(), date, start, duration)
}

pub fn request_for(
    psychologist: Psychologist,
    room: Room,
    date: &str,
    start: &str,
    duration: i32,
) -> BookAppointmentRequest {
    BookAppointmentRequest {
        psychologist,
        client: client(),
        date: date.to_string(),
        start_time: start.to_string(),
        duration_minutes: duration,
        room,
        notes: None,
    }
}

/// Quiet tracing wiring so `RUST_LOG=debug cargo test` shows service logs.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
