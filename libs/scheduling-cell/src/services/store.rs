// libs/scheduling-cell/src/services/store.rs
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_config::SchedulingConfig;

use crate::clock::{Clock, SystemClock};
use crate::error::SchedulingError;
use crate::models::{
    Appointment, AppointmentStatus, BookAppointmentRequest, ExclusivityMode, RescheduleRequest,
    SlotCandidate,
};
use crate::services::conflict;
use crate::services::lifecycle::AppointmentLifecycle;
use crate::services::slots;
use crate::services::validation::ValidationService;

/// Authoritative in-memory appointment collection.
///
/// Constructed explicitly and passed around by the caller - no globals, so
/// any number of independent stores can coexist in one process. Only the
/// store mutates the collection; readers get clones or a borrowed snapshot.
/// Every operation checks completely before it writes, so a failed call
/// leaves the store exactly as it was.
pub struct AppointmentStore {
    validator: ValidationService,
    lifecycle: AppointmentLifecycle,
    clock: Arc<dyn Clock>,
    enforce_psychologist_exclusivity: bool,
    appointments: Vec<Appointment>,
}

impl AppointmentStore {
    pub fn new(config: SchedulingConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            enforce_psychologist_exclusivity: config.enforce_psychologist_exclusivity,
            validator: ValidationService::new(config),
            lifecycle: AppointmentLifecycle::new(),
            clock,
            appointments: Vec::new(),
        }
    }

    pub fn with_system_clock(config: SchedulingConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    /// Validate, conflict-check and persist a new appointment.
    ///
    /// Room exclusivity is always enforced; psychologist exclusivity when
    /// the policy says so. The conflict error carries every conflicting
    /// appointment across both checks.
    pub fn create(
        &mut self,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, SchedulingError> {
        let today = self.clock.now().date_naive();
        let booking = self
            .validator
            .validate(&request, today)
            .map_err(|errors| SchedulingError::Validation { errors })?;

        let candidate = SlotCandidate {
            date: booking.date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            room_id: booking.room.id.clone(),
            psychologist_id: booking.psychologist.id,
            exclude_appointment_id: None,
        };
        self.ensure_available(&candidate)?;

        let now = self.clock.now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            psychologist: booking.psychologist,
            client: booking.client,
            date: booking.date,
            start_time: booking.start_time,
            end_time: booking.end_time,
            room: booking.room,
            status: AppointmentStatus::Pending,
            notes: booking.notes,
            created_at: now,
            updated_at: now,
        };

        info!(
            "Appointment {} booked in room {} on {} {} - {}",
            appointment.id,
            appointment.room.id,
            appointment.date,
            slots::format_time(appointment.start_time),
            slots::format_time(appointment.end_time)
        );
        self.appointments.push(appointment.clone());
        Ok(appointment)
    }

    /// Move an appointment through the state machine.
    pub fn transition(
        &mut self,
        id: Uuid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, SchedulingError> {
        let index = self.index_of(id)?;
        self.lifecycle
            .validate_transition(self.appointments[index].status, new_status)?;

        let now = self.clock.now();
        let appointment = &mut self.appointments[index];
        appointment.status = new_status;
        appointment.updated_at = now;

        info!("Appointment {} moved to {}", id, new_status);
        Ok(appointment.clone())
    }

    /// Cancel and record the reason. Cancellation is a status change, never a
    /// removal - the appointment stays on file for history.
    pub fn cancel(
        &mut self,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Appointment, SchedulingError> {
        let index = self.index_of(id)?;
        self.lifecycle
            .validate_transition(self.appointments[index].status, AppointmentStatus::Cancelled)?;

        let now = self.clock.now();
        let appointment = &mut self.appointments[index];
        appointment.status = AppointmentStatus::Cancelled;
        if let Some(reason) = reason {
            appointment.notes = Some(annotate(appointment.notes.take(), "Cancelled", reason));
        }
        appointment.updated_at = now;

        info!("Appointment {} cancelled", id);
        Ok(appointment.clone())
    }

    /// Move a pending appointment to a new slot. The appointment itself is
    /// excluded from the conflict check, so shifting within its own slot
    /// succeeds.
    pub fn reschedule(
        &mut self,
        id: Uuid,
        request: RescheduleRequest,
    ) -> Result<Appointment, SchedulingError> {
        let index = self.index_of(id)?;
        let (status, room_id, psychologist_id, current_duration) = {
            let current = &self.appointments[index];
            (
                current.status,
                current.room.id.clone(),
                current.psychologist.id,
                slots::to_minutes(current.end_time) - slots::to_minutes(current.start_time),
            )
        };

        if status != AppointmentStatus::Pending {
            warn!("Appointment {} in status {} cannot be rescheduled", id, status);
            return Err(SchedulingError::NotReschedulable { status });
        }

        let today = self.clock.now().date_naive();
        let duration = request.duration_minutes.unwrap_or(current_duration);
        let (date, start_time, end_time) = self
            .validator
            .validate_slot(&request.date, &request.start_time, duration, today)
            .map_err(|errors| SchedulingError::Validation { errors })?;

        let candidate = SlotCandidate {
            date,
            start_time,
            end_time,
            room_id,
            psychologist_id,
            exclude_appointment_id: Some(id),
        };
        self.ensure_available(&candidate)?;

        let now = self.clock.now();
        let appointment = &mut self.appointments[index];
        appointment.date = date;
        appointment.start_time = start_time;
        appointment.end_time = end_time;
        if let Some(reason) = &request.reason {
            appointment.notes = Some(annotate(appointment.notes.take(), "Rescheduled", reason));
        }
        appointment.updated_at = now;

        info!(
            "Appointment {} rescheduled to {} {} - {}",
            id,
            date,
            slots::format_time(start_time),
            slots::format_time(end_time)
        );
        Ok(appointment.clone())
    }

    pub fn get(&self, id: Uuid) -> Option<&Appointment> {
        self.appointments.iter().find(|apt| apt.id == id)
    }

    /// Appointments for one psychologist, ordered by date then start time.
    pub fn list_by_psychologist(&self, psychologist_id: Uuid) -> Vec<Appointment> {
        self.select(|apt| apt.psychologist.id == psychologist_id)
    }

    /// Appointments for one client, ordered by date then start time.
    pub fn list_by_client(&self, client_id: Uuid) -> Vec<Appointment> {
        self.select(|apt| apt.client.id == client_id)
    }

    /// Appointments with a date in `[from, to]`, ordered by date then start
    /// time.
    pub fn list_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> Vec<Appointment> {
        self.select(|apt| apt.date >= from && apt.date <= to)
    }

    /// Read-only snapshot for callers that run their own availability checks.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    fn ensure_available(&self, candidate: &SlotCandidate) -> Result<(), SchedulingError> {
        let mut conflicts =
            conflict::check_availability(candidate, &self.appointments, ExclusivityMode::Room)
                .conflicts;

        if self.enforce_psychologist_exclusivity {
            let psychologist_conflicts = conflict::check_availability(
                candidate,
                &self.appointments,
                ExclusivityMode::Psychologist,
            )
            .conflicts;
            for apt in psychologist_conflicts {
                if !conflicts.iter().any(|known| known.id == apt.id) {
                    conflicts.push(apt);
                }
            }
        }

        if conflicts.is_empty() {
            debug!(
                "Slot in room {} on {} is free",
                candidate.room_id, candidate.date
            );
            Ok(())
        } else {
            Err(SchedulingError::Conflict { conflicts })
        }
    }

    fn index_of(&self, id: Uuid) -> Result<usize, SchedulingError> {
        self.appointments
            .iter()
            .position(|apt| apt.id == id)
            .ok_or(SchedulingError::NotFound(id))
    }

    fn select(&self, keep: impl Fn(&Appointment) -> bool) -> Vec<Appointment> {
        let mut selected: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|apt| keep(apt))
            .cloned()
            .collect();
        selected.sort_by_key(|apt| (apt.date, apt.start_time));
        selected
    }
}

fn annotate(notes: Option<String>, label: &str, reason: &str) -> String {
    match notes {
        Some(existing) => format!("{existing}\n{label}: {reason}"),
        None => format!("{label}: {reason}"),
    }
}
