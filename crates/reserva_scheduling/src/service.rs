// --- File: crates/reserva_scheduling/src/service.rs ---
//! In-memory schedule store.
//!
//! This module provides a thread-safe implementation of the four data-source
//! traits the validator consumes. It backs the service binary and the tests;
//! a production deployment would put the hosted datastore behind the same
//! traits.
//!
//! The check-then-write race is resolved here, not in the validator: the
//! validation pipeline is a user-experience pre-check, and
//! [`InMemoryScheduleStore::insert_appointment`] re-runs the overlap scan
//! under its write lock so a lost race surfaces as a conflict at write time.

use crate::logic::check_appointment_conflicts;
use crate::models::{Appointment, AppointmentStatus, BookingPolicy, Holiday, Shift};
use chrono::{NaiveDate, Weekday};
use reserva_common::services::{
    AppointmentSource, BoxFuture, BoxedError, HolidaySource, PolicySource, ShiftSource,
};
use std::collections::HashMap;
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

/// Errors that can occur when reading from or writing to the schedule store.
#[derive(Error, Debug)]
pub enum ScheduleStoreError {
    #[error("schedule store unavailable: {0}")]
    Unavailable(String),
    #[error("the requested time slot is no longer available")]
    Conflict,
    #[error("appointment not found: {0}")]
    NotFound(Uuid),
    #[error("appointment {0} is no longer open and cannot be cancelled")]
    NotCancellable(Uuid),
}

fn boxed(err: ScheduleStoreError) -> BoxedError {
    BoxedError(Box::new(err))
}

#[derive(Default)]
struct StoreInner {
    /// Shift rows keyed by employee.
    shifts: HashMap<Uuid, Vec<Shift>>,
    /// Holiday rules keyed by tenant, kept in insertion order.
    holidays: HashMap<String, Vec<Holiday>>,
    /// Appointments keyed by tenant.
    appointments: HashMap<String, Vec<Appointment>>,
    /// Tenant policy overrides.
    policies: HashMap<String, BookingPolicy>,
}

/// Thread-safe in-memory implementation of the scheduling data sources.
pub struct InMemoryScheduleStore {
    inner: RwLock<StoreInner>,
    default_policy: BookingPolicy,
}

impl InMemoryScheduleStore {
    /// Create an empty store with the given tenant-default policy.
    pub fn new(default_policy: BookingPolicy) -> Self {
        InMemoryScheduleStore {
            inner: RwLock::new(StoreInner::default()),
            default_policy,
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, StoreInner>, ScheduleStoreError> {
        self.inner
            .read()
            .map_err(|_| ScheduleStoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, StoreInner>, ScheduleStoreError> {
        self.inner
            .write()
            .map_err(|_| ScheduleStoreError::Unavailable("store lock poisoned".to_string()))
    }

    /// Add a recurring shift row for an employee.
    pub fn add_shift(&self, shift: Shift) -> Result<(), ScheduleStoreError> {
        let mut inner = self.write()?;
        inner.shifts.entry(shift.employee_id).or_default().push(shift);
        Ok(())
    }

    /// Add a holiday rule for a tenant. Evaluation order is insertion order.
    pub fn add_holiday(&self, business_slug: &str, holiday: Holiday) -> Result<(), ScheduleStoreError> {
        let mut inner = self.write()?;
        inner
            .holidays
            .entry(business_slug.to_string())
            .or_default()
            .push(holiday);
        Ok(())
    }

    /// Set a tenant's policy override.
    pub fn set_policy(
        &self,
        business_slug: &str,
        policy: BookingPolicy,
    ) -> Result<(), ScheduleStoreError> {
        let mut inner = self.write()?;
        inner.policies.insert(business_slug.to_string(), policy);
        Ok(())
    }

    /// Insert an appointment, re-checking conflicts under the write lock.
    ///
    /// The storage layer is the source of truth for double bookings: two
    /// requests that both passed validation serialize here, and the loser
    /// gets `Conflict`.
    pub fn insert_appointment(
        &self,
        business_slug: &str,
        appointment: Appointment,
    ) -> Result<Appointment, ScheduleStoreError> {
        let mut inner = self.write()?;
        let rows = inner
            .appointments
            .entry(business_slug.to_string())
            .or_default();

        let same_employee: Vec<Appointment> = rows
            .iter()
            .filter(|existing| existing.employee_id == appointment.employee_id)
            .cloned()
            .collect();
        let report = check_appointment_conflicts(
            &same_employee,
            appointment.start,
            appointment.end,
            Some(appointment.id),
        );
        if report.has_conflict {
            info!(
                "Rejected write for {}: slot already taken by {} appointment(s)",
                appointment.id,
                report.conflicting.len()
            );
            return Err(ScheduleStoreError::Conflict);
        }

        rows.push(appointment.clone());
        debug!("Stored appointment {}", appointment.id);
        Ok(appointment)
    }

    /// Mark an appointment as canceled. The cutoff check belongs to the
    /// validator; this flips the status, refusing rows that already reached a
    /// terminal state (completed, canceled, no-show).
    pub fn cancel_appointment(
        &self,
        business_slug: &str,
        id: Uuid,
    ) -> Result<Appointment, ScheduleStoreError> {
        let mut inner = self.write()?;
        let rows = inner
            .appointments
            .get_mut(business_slug)
            .ok_or(ScheduleStoreError::NotFound(id))?;
        let appointment = rows
            .iter_mut()
            .find(|appointment| appointment.id == id)
            .ok_or(ScheduleStoreError::NotFound(id))?;
        if !appointment.status.counts_as_open() {
            return Err(ScheduleStoreError::NotCancellable(id));
        }
        appointment.status = AppointmentStatus::Canceled;
        Ok(appointment.clone())
    }
}

impl ShiftSource for InMemoryScheduleStore {
    type Error = BoxedError;

    fn shifts_for(
        &self,
        employee_id: Uuid,
        weekday: Weekday,
    ) -> BoxFuture<'_, Vec<Shift>, Self::Error> {
        Box::pin(async move {
            let inner = self.read().map_err(boxed)?;
            Ok(inner
                .shifts
                .get(&employee_id)
                .map(|rows| {
                    rows.iter()
                        .filter(|shift| shift.weekday == weekday)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }
}

impl HolidaySource for InMemoryScheduleStore {
    type Error = BoxedError;

    fn active_holidays_on(
        &self,
        business_slug: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<Holiday>, Self::Error> {
        let business_slug = business_slug.to_string();
        Box::pin(async move {
            let inner = self.read().map_err(boxed)?;
            Ok(inner
                .holidays
                .get(&business_slug)
                .map(|rows| {
                    rows.iter()
                        .filter(|holiday| holiday.date == date && holiday.is_active)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }
}

impl AppointmentSource for InMemoryScheduleStore {
    type Error = BoxedError;

    fn appointments_for(
        &self,
        business_slug: &str,
        employee_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> BoxFuture<'_, Vec<Appointment>, Self::Error> {
        let business_slug = business_slug.to_string();
        Box::pin(async move {
            let inner = self.read().map_err(boxed)?;
            Ok(inner
                .appointments
                .get(&business_slug)
                .map(|rows| {
                    rows.iter()
                        .filter(|appointment| appointment.employee_id == employee_id)
                        .filter(|appointment| appointment.status.blocks_slot())
                        .filter(|appointment| Some(appointment.id) != exclude_id)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        })
    }

    fn appointment(
        &self,
        business_slug: &str,
        id: Uuid,
    ) -> BoxFuture<'_, Option<Appointment>, Self::Error> {
        let business_slug = business_slug.to_string();
        Box::pin(async move {
            let inner = self.read().map_err(boxed)?;
            Ok(inner
                .appointments
                .get(&business_slug)
                .and_then(|rows| rows.iter().find(|appointment| appointment.id == id))
                .cloned())
        })
    }

    fn client_open_appointments(
        &self,
        business_slug: &str,
        client_id: Uuid,
    ) -> BoxFuture<'_, usize, Self::Error> {
        let business_slug = business_slug.to_string();
        Box::pin(async move {
            let inner = self.read().map_err(boxed)?;
            Ok(inner
                .appointments
                .get(&business_slug)
                .map(|rows| {
                    rows.iter()
                        .filter(|appointment| appointment.client_id == client_id)
                        .filter(|appointment| appointment.status.counts_as_open())
                        .count()
                })
                .unwrap_or(0))
        })
    }
}

impl PolicySource for InMemoryScheduleStore {
    type Error = BoxedError;

    fn booking_policy(&self, business_slug: &str) -> BoxFuture<'_, BookingPolicy, Self::Error> {
        let business_slug = business_slug.to_string();
        Box::pin(async move {
            let inner = self.read().map_err(boxed)?;
            Ok(inner
                .policies
                .get(&business_slug)
                .cloned()
                .unwrap_or_else(|| self.default_policy.clone()))
        })
    }
}

