// libs/scheduling-cell/src/services/conflict.rs
use tracing::{debug, warn};

use crate::models::{Appointment, AvailabilityCheck, ExclusivityMode, SlotCandidate};
use crate::services::slots;

/// Decide whether `candidate` can be booked against a snapshot of existing
/// appointments.
///
/// Pure over its inputs: the snapshot is supplied by the caller, nothing is
/// mutated, and the candidate may be hypothetical - "check before create"
/// and "check before reschedule" run through the exact same code. Every
/// conflicting appointment is returned, not just the first, so callers can
/// report specifics.
pub fn check_availability(
    candidate: &SlotCandidate,
    existing: &[Appointment],
    mode: ExclusivityMode,
) -> AvailabilityCheck {
    debug!(
        "Checking {:?} availability on {} from {} to {}",
        mode,
        candidate.date,
        slots::format_time(candidate.start_time),
        slots::format_time(candidate.end_time)
    );

    let conflicts: Vec<Appointment> = existing
        .iter()
        .filter(|apt| apt.date == candidate.date)
        .filter(|apt| apt.status.blocks_slot())
        .filter(|apt| match mode {
            ExclusivityMode::Room => apt.room.id == candidate.room_id,
            ExclusivityMode::Psychologist => apt.psychologist.id == candidate.psychologist_id,
        })
        .filter(|apt| Some(apt.id) != candidate.exclude_appointment_id)
        .filter(|apt| {
            slots::overlaps(
                candidate.start_time,
                candidate.end_time,
                apt.start_time,
                apt.end_time,
            )
        })
        .cloned()
        .collect();

    if !conflicts.is_empty() {
        warn!(
            "Slot on {} conflicts with {} existing appointment(s)",
            candidate.date,
            conflicts.len()
        );
    }

    AvailabilityCheck {
        available: conflicts.is_empty(),
        conflicts,
    }
}
