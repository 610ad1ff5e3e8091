// --- File: crates/reserva_scheduling/src/validator.rs ---
//! The composite slot validator.
//!
//! [`SlotValidator`] owns trait-object handles to the four data sources and
//! runs the check families in a fixed, cheapest-first order: policy bounds,
//! shift window, holiday blocking, appointment conflicts. The first failing
//! check's reason is returned; a slot is accepted only when every family
//! passes. For a fixed input snapshot and a fixed `now` the decision is
//! deterministic.
//!
//! Infrastructure failures are never swallowed: an `Err` from any source
//! propagates as [`SchedulingError`] and callers must treat it as "do not
//! book", not as "no conflict".

use crate::logic::{
    check_appointment_conflicts, check_booking_window, check_cancellation_cutoff,
    check_holiday_blocking, check_shift_window, check_simultaneous_limit, minutes_of_day,
    InvalidHolidayRule,
};
use crate::models::{
    AvailableSlot, CancellationInitiator, RejectionReason, SlotDecision, SlotRequest,
};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use reserva_common::error::ReservaError;
use reserva_common::services::{
    AppointmentSource, BoxedError, HolidaySource, PolicySource, SchedulingSources, ShiftSource,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Errors surfaced by the validation pipeline.
///
/// Expected rejections are NOT errors: they come back as
/// [`SlotDecision::Rejected`]. These variants cover infrastructure failures
/// and malformed input, and the HTTP layer maps them to a generic
/// "please try again" answer.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("schedule data source error: {0}")]
    Source(#[from] BoxedError),
    #[error("invalid schedule data: {0}")]
    InvalidData(#[from] InvalidHolidayRule),
    #[error("invalid slot request: {0}")]
    InvalidRequest(String),
    #[error("appointment not found: {0}")]
    AppointmentNotFound(Uuid),
}

impl From<SchedulingError> for ReservaError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::Source(source) => ReservaError::StoreError(source.to_string()),
            SchedulingError::InvalidData(data) => ReservaError::StoreError(data.to_string()),
            SchedulingError::InvalidRequest(message) => ReservaError::ValidationError(message),
            SchedulingError::AppointmentNotFound(id) => ReservaError::NotFoundError(id.to_string()),
        }
    }
}

/// Orchestrates the slot-validation pipeline over injected data sources.
pub struct SlotValidator {
    shifts: Arc<dyn ShiftSource<Error = BoxedError>>,
    holidays: Arc<dyn HolidaySource<Error = BoxedError>>,
    appointments: Arc<dyn AppointmentSource<Error = BoxedError>>,
    policies: Arc<dyn PolicySource<Error = BoxedError>>,
    /// Business-calendar time zone; shift and holiday windows are local times.
    time_zone: Tz,
}

impl SlotValidator {
    pub fn new(
        shifts: Arc<dyn ShiftSource<Error = BoxedError>>,
        holidays: Arc<dyn HolidaySource<Error = BoxedError>>,
        appointments: Arc<dyn AppointmentSource<Error = BoxedError>>,
        policies: Arc<dyn PolicySource<Error = BoxedError>>,
        time_zone: Tz,
    ) -> Self {
        SlotValidator {
            shifts,
            holidays,
            appointments,
            policies,
            time_zone,
        }
    }

    /// Build a validator from a bundled source provider.
    pub fn from_sources(sources: &dyn SchedulingSources, time_zone: Tz) -> Self {
        SlotValidator::new(
            sources.shift_source(),
            sources.holiday_source(),
            sources.appointment_source(),
            sources.policy_source(),
            time_zone,
        )
    }

    /// Validates a candidate slot against policy, shift, holiday, and conflict
    /// checks, in that order. Returns the first rejection, or `Accepted` when
    /// every family passes.
    ///
    /// `now` is explicit so the decision is reproducible for a fixed snapshot.
    pub async fn validate_slot(
        &self,
        request: &SlotRequest,
        now: DateTime<Utc>,
    ) -> Result<SlotDecision, SchedulingError> {
        if request.end <= request.start {
            return Err(SchedulingError::InvalidRequest(
                "end must be after start".to_string(),
            ));
        }

        let policy = self.policies.booking_policy(&request.business_slug).await?;

        // 1. Policy gate: basic time bounds, then the per-client booking count.
        if let Some(reason) = check_booking_window(&policy, request.start, now) {
            return Ok(SlotDecision::Rejected(reason));
        }
        // A reschedule is not a new booking; the client's count is unchanged.
        if request.exclude_appointment_id.is_none() {
            let open_count = self
                .appointments
                .client_open_appointments(&request.business_slug, request.client_id)
                .await?;
            if let Some(reason) = check_simultaneous_limit(&policy, open_count) {
                return Ok(SlotDecision::Rejected(reason));
            }
        }

        let local_start = request.start.with_timezone(&self.time_zone);
        let local_end = request.end.with_timezone(&self.time_zone);
        let date = local_start.date_naive();

        // Shift windows are times-of-day; a range crossing local midnight has
        // no meaningful containment check.
        if local_end.date_naive() != date {
            return Err(SchedulingError::InvalidRequest(
                "appointment must start and end on the same day".to_string(),
            ));
        }

        // 2. Shift window for the local weekday.
        let shifts = self
            .shifts
            .shifts_for(request.employee_id, date.weekday())
            .await?;
        if let Some(reason) = check_shift_window(&shifts, local_start.time(), local_end.time()) {
            return Ok(SlotDecision::Rejected(reason));
        }

        // 3. Holiday blocking rules for the local date.
        let holidays = self
            .holidays
            .active_holidays_on(&request.business_slug, date)
            .await?;
        if let Some(reason) =
            check_holiday_blocking(&holidays, local_start.time(), local_end.time())?
        {
            return Ok(SlotDecision::Rejected(reason));
        }

        // 4. Conflicts with the employee's existing appointments.
        let existing = self
            .appointments
            .appointments_for(
                &request.business_slug,
                request.employee_id,
                request.exclude_appointment_id,
            )
            .await?;
        let report = check_appointment_conflicts(
            &existing,
            request.start,
            request.end,
            request.exclude_appointment_id,
        );
        if report.has_conflict {
            debug!(
                "Slot {} - {} conflicts with {} appointment(s) for employee {}",
                request.start,
                request.end,
                report.conflicting.len(),
                request.employee_id
            );
            return Ok(SlotDecision::Rejected(
                RejectionReason::AppointmentConflict {
                    count: report.conflicting.len(),
                },
            ));
        }

        Ok(SlotDecision::Accepted)
    }

    /// Applies the cancellation cutoff to an existing appointment.
    pub async fn validate_cancellation(
        &self,
        business_slug: &str,
        appointment_id: Uuid,
        initiated_by: CancellationInitiator,
        now: DateTime<Utc>,
    ) -> Result<SlotDecision, SchedulingError> {
        let appointment = self
            .appointments
            .appointment(business_slug, appointment_id)
            .await?
            .ok_or(SchedulingError::AppointmentNotFound(appointment_id))?;

        let policy = self.policies.booking_policy(business_slug).await?;
        let reason = check_cancellation_cutoff(&policy, appointment.start, now, initiated_by);
        Ok(SlotDecision::from(reason))
    }

    /// Walks a day at the policy's grid interval and returns every bookable
    /// slot of the requested duration.
    ///
    /// The per-client simultaneous limit is not applied here: availability is
    /// listed before a client is known.
    pub async fn available_slots(
        &self,
        business_slug: &str,
        employee_id: Uuid,
        date: NaiveDate,
        duration: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<AvailableSlot>, SchedulingError> {
        if duration <= Duration::zero() {
            return Err(SchedulingError::InvalidRequest(
                "duration must be positive".to_string(),
            ));
        }

        let policy = self.policies.booking_policy(business_slug).await?;
        let shifts = self.shifts.shifts_for(employee_id, date.weekday()).await?;
        let shift = match shifts.first() {
            Some(shift) => shift,
            None => return Ok(Vec::new()),
        };

        let holidays = self.holidays.active_holidays_on(business_slug, date).await?;
        let existing = self
            .appointments
            .appointments_for(business_slug, employee_id, None)
            .await?;

        let step = policy.time_interval_minutes.max(1) as i64;
        let duration_minutes = duration.num_minutes();
        let shift_start = minutes_of_day(shift.start_time);
        let shift_end = minutes_of_day(shift.end_time);

        debug!(
            "Scanning {} for employee {} between {} and {} at {}min steps",
            date, employee_id, shift.start_time, shift.end_time, step
        );

        let mut slots = Vec::new();
        let mut cursor = shift_start;
        while cursor + duration_minutes <= shift_end {
            let start_time = NaiveTime::from_hms_opt((cursor / 60) as u32, (cursor % 60) as u32, 0)
                .expect("cursor stays within a day");
            let end_minute = cursor + duration_minutes;
            let end_time =
                NaiveTime::from_hms_opt((end_minute / 60) as u32, (end_minute % 60) as u32, 0)
                    .expect("end stays within a day");

            cursor += step;

            // DST gaps or ambiguous local times are skipped rather than guessed.
            let local_start = match self
                .time_zone
                .from_local_datetime(&date.and_time(start_time))
                .single()
            {
                Some(local_start) => local_start,
                None => continue,
            };
            let local_end = match self
                .time_zone
                .from_local_datetime(&date.and_time(end_time))
                .single()
            {
                Some(local_end) => local_end,
                None => continue,
            };

            if check_booking_window(&policy, local_start.with_timezone(&Utc), now).is_some() {
                continue;
            }
            if check_shift_window(&shifts, start_time, end_time).is_some() {
                continue;
            }
            if check_holiday_blocking(&holidays, start_time, end_time)?.is_some() {
                continue;
            }
            let report = check_appointment_conflicts(
                &existing,
                local_start.with_timezone(&Utc),
                local_end.with_timezone(&Utc),
                None,
            );
            if report.has_conflict {
                continue;
            }

            slots.push(AvailableSlot {
                start_time: local_start.to_rfc3339(),
                end_time: local_end.to_rfc3339(),
            });
        }

        Ok(slots)
    }
}
