// --- File: crates/reserva_common/src/services.rs ---
//! Data-source abstractions for the scheduling core.
//!
//! This module provides trait definitions for the external data sources the
//! slot-validation pipeline consumes, together with the domain model those
//! traits speak. The traits allow for dependency injection and easier testing
//! by decoupling the validation logic from any specific persistence backend:
//! the validators only ever see pre-fetched rows.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use uuid::Uuid;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

// --- Domain model ---

/// A recurring weekly availability window for an employee.
///
/// A shift is a pattern, not a dated instance: "Mondays, 08:00-18:00,
/// lunch 12:00-13:00". Rows are immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Shift {
    /// The employee this shift belongs to.
    pub employee_id: Uuid,
    /// Day of the week the shift recurs on.
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "Mon"))]
    pub weekday: Weekday,
    /// Start of the working window.
    #[cfg_attr(feature = "openapi", schema(example = "08:00:00"))]
    pub start_time: NaiveTime,
    /// End of the working window.
    #[cfg_attr(feature = "openapi", schema(example = "18:00:00"))]
    pub end_time: NaiveTime,
    /// Optional lunch break start; appointments may not overlap the break.
    pub lunch_break_start: Option<NaiveTime>,
    /// Optional lunch break end.
    pub lunch_break_end: Option<NaiveTime>,
}

/// Category of a holiday rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum HolidayKind {
    National,
    State,
    Municipal,
    Custom,
}

/// How much of the day a holiday rule blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum BlockingRule {
    /// The whole day is unbookable.
    FullDay,
    /// Blocks appointments starting before 12:00.
    Morning,
    /// Blocks appointments starting at or after 12:00.
    Afternoon,
    /// Blocks the `[custom_start, custom_end)` window only.
    Custom,
}

/// A holiday-derived blocking rule for a single calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Holiday {
    /// The calendar date the rule applies to.
    #[cfg_attr(feature = "openapi", schema(example = "2024-01-01"))]
    pub date: NaiveDate,
    /// Display name, surfaced verbatim in rejection reasons.
    #[cfg_attr(feature = "openapi", schema(example = "New Year's Day"))]
    pub name: String,
    pub kind: HolidayKind,
    /// Inactive rules never block.
    pub is_active: bool,
    pub blocking: BlockingRule,
    /// Start of the blocked window; required when `blocking` is `Custom`.
    pub custom_start: Option<NaiveTime>,
    /// End of the blocked window; required when `blocking` is `Custom`.
    pub custom_end: Option<NaiveTime>,
}

/// Lifecycle status of an appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    Completed,
    Canceled,
    NoShow,
}

impl AppointmentStatus {
    /// Whether an appointment in this status occupies its time slot.
    ///
    /// Canceled and no-show appointments are excluded from conflict checks;
    /// this is an explicit invariant of the booking flow.
    pub fn blocks_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Canceled | AppointmentStatus::NoShow)
    }

    /// Whether this status counts toward a client's simultaneous-booking limit.
    pub fn counts_as_open(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
        )
    }
}

/// A booked (or historical) appointment for an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Appointment {
    pub id: Uuid,
    pub employee_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    /// Start of the appointment, UTC.
    pub start: DateTime<Utc>,
    /// End of the appointment, UTC (half-open: the end instant is free).
    pub end: DateTime<Utc>,
    pub status: AppointmentStatus,
}

/// Tenant-level booking limits, derived from the business settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BookingPolicy {
    /// Minimum lead time between "now" and an appointment start, in hours.
    pub min_advance_hours: u32,
    /// How far into the future a booking may be placed, in days.
    pub future_limit_days: u32,
    /// Maximum number of open (scheduled/confirmed) appointments per client.
    pub simultaneous_limit: u32,
    /// Granularity of the booking grid, in minutes.
    pub time_interval_minutes: u32,
    /// Minimum lead time for a client-initiated cancellation, in hours.
    pub cancel_min_hours: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        BookingPolicy {
            min_advance_hours: 0,
            future_limit_days: 90,
            simultaneous_limit: 3,
            time_interval_minutes: 30,
            cancel_min_hours: 24,
        }
    }
}

/// Who asked for an appointment to be cancelled.
///
/// Business-initiated cancellations bypass the cancellation cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum CancellationInitiator {
    Client,
    Business,
}

// --- Data-source traits ---

/// Source of recurring weekly shift rows.
pub trait ShiftSource: Send + Sync {
    /// Error type returned by shift lookups.
    type Error: StdError + Send + Sync + 'static;

    /// Get the shift rows for an employee on a given weekday.
    ///
    /// Returns an empty vector when the employee does not work that day.
    fn shifts_for(&self, employee_id: Uuid, weekday: Weekday)
        -> BoxFuture<'_, Vec<Shift>, Self::Error>;
}

/// Source of holiday blocking rules.
pub trait HolidaySource: Send + Sync {
    /// Error type returned by holiday lookups.
    type Error: StdError + Send + Sync + 'static;

    /// Get the active holiday rules matching a calendar date, pre-filtered to
    /// `is_active = true`, in evaluation order.
    fn active_holidays_on(
        &self,
        business_slug: &str,
        date: NaiveDate,
    ) -> BoxFuture<'_, Vec<Holiday>, Self::Error>;
}

/// Source of existing appointments for conflict scanning.
pub trait AppointmentSource: Send + Sync {
    /// Error type returned by appointment lookups.
    type Error: StdError + Send + Sync + 'static;

    /// Get the slot-blocking appointments for an employee within the tenant
    /// scope. Canceled and no-show rows are filtered at the source; `exclude_id`
    /// removes the appointment being rescheduled from its own conflict scan.
    fn appointments_for(
        &self,
        business_slug: &str,
        employee_id: Uuid,
        exclude_id: Option<Uuid>,
    ) -> BoxFuture<'_, Vec<Appointment>, Self::Error>;

    /// Look up a single appointment by id within the tenant scope.
    fn appointment(
        &self,
        business_slug: &str,
        id: Uuid,
    ) -> BoxFuture<'_, Option<Appointment>, Self::Error>;

    /// Count a client's open (scheduled/confirmed) appointments, used by the
    /// simultaneous-booking limit.
    fn client_open_appointments(
        &self,
        business_slug: &str,
        client_id: Uuid,
    ) -> BoxFuture<'_, usize, Self::Error>;
}

/// Source of tenant-level booking policy.
pub trait PolicySource: Send + Sync {
    /// Error type returned by policy lookups.
    type Error: StdError + Send + Sync + 'static;

    /// Get the booking policy for a tenant.
    fn booking_policy(&self, business_slug: &str) -> BoxFuture<'_, BookingPolicy, Self::Error>;
}

/// A bundle of the four data sources the slot validator consumes.
///
/// This trait provides access to the sources behind `BoxedError`, mirroring how
/// the application wires a single store implementation into the validator.
pub trait SchedulingSources: Send + Sync {
    /// Get a shift source instance.
    fn shift_source(&self) -> Arc<dyn ShiftSource<Error = BoxedError>>;

    /// Get a holiday source instance.
    fn holiday_source(&self) -> Arc<dyn HolidaySource<Error = BoxedError>>;

    /// Get an appointment source instance.
    fn appointment_source(&self) -> Arc<dyn AppointmentSource<Error = BoxedError>>;

    /// Get a policy source instance.
    fn policy_source(&self) -> Arc<dyn PolicySource<Error = BoxedError>>;
}

/// Any shared store that implements all four source traits is a source bundle.
impl<T> SchedulingSources for Arc<T>
where
    T: ShiftSource<Error = BoxedError>
        + HolidaySource<Error = BoxedError>
        + AppointmentSource<Error = BoxedError>
        + PolicySource<Error = BoxedError>
        + Send
        + Sync
        + 'static,
{
    fn shift_source(&self) -> Arc<dyn ShiftSource<Error = BoxedError>> {
        self.clone()
    }

    fn holiday_source(&self) -> Arc<dyn HolidaySource<Error = BoxedError>> {
        self.clone()
    }

    fn appointment_source(&self) -> Arc<dyn AppointmentSource<Error = BoxedError>> {
        self.clone()
    }

    fn policy_source(&self) -> Arc<dyn PolicySource<Error = BoxedError>> {
        self.clone()
    }
}
