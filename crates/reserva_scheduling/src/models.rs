// --- File: crates/reserva_scheduling/src/models.rs ---
//! Request, decision, and response types for the slot-validation pipeline.
//!
//! The domain rows themselves (shifts, holidays, appointments, policy) live in
//! `reserva_common::services` next to the source traits that fetch them; this
//! module holds everything layered on top: the candidate-slot request, the
//! typed accept/reject decision, and the HTTP DTOs.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use reserva_common::services::{
    Appointment, AppointmentStatus, BlockingRule, BookingPolicy, CancellationInitiator, Holiday,
    HolidayKind, Shift,
};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A candidate appointment slot for a specific employee.
#[derive(Debug, Clone)]
pub struct SlotRequest {
    /// Tenant scope: the business the booking belongs to.
    pub business_slug: String,
    pub employee_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    /// Proposed start, UTC.
    pub start: DateTime<Utc>,
    /// Proposed end, UTC (half-open).
    pub end: DateTime<Utc>,
    /// Appointment to leave out of the conflict scan (reschedule flows).
    pub exclude_appointment_id: Option<Uuid>,
}

/// Why a candidate slot was rejected.
///
/// Rejections are values, not errors: every variant renders to a human-readable
/// message surfaced verbatim to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum RejectionReason {
    /// The start is closer to "now" than the policy's minimum lead time.
    TooSoon { min_advance_hours: u32 },
    /// The start is beyond the policy's future-booking horizon.
    TooFarAhead { future_limit_days: u32 },
    /// The client already has too many open appointments.
    SimultaneousLimit { limit: u32 },
    /// The employee has no shift on the requested weekday.
    EmployeeOff,
    /// The range is not fully contained in the employee's shift window.
    OutsideShift {
        shift_start: NaiveTime,
        shift_end: NaiveTime,
    },
    /// The range overlaps the employee's lunch break.
    LunchBreak {
        break_start: NaiveTime,
        break_end: NaiveTime,
    },
    /// An active holiday rule blocks the range.
    HolidayBlocked { name: String },
    /// The range overlaps existing appointments for the employee.
    AppointmentConflict { count: usize },
    /// Too late for a client-initiated cancellation.
    CancellationCutoff { cancel_min_hours: u32 },
}

impl RejectionReason {
    /// User-facing message for this rejection, suitable for verbatim display.
    pub fn message(&self) -> String {
        match self {
            RejectionReason::TooSoon { min_advance_hours } => format!(
                "Bookings must be made at least {} hour(s) in advance.",
                min_advance_hours
            ),
            RejectionReason::TooFarAhead { future_limit_days } => format!(
                "Bookings can be made at most {} day(s) ahead.",
                future_limit_days
            ),
            RejectionReason::SimultaneousLimit { limit } => format!(
                "You already have {} open appointment(s); please complete or cancel one first.",
                limit
            ),
            RejectionReason::EmployeeOff => {
                "The selected professional does not work on this day.".to_string()
            }
            RejectionReason::OutsideShift {
                shift_start,
                shift_end,
            } => format!(
                "Appointments with this professional must be between {} and {}.",
                shift_start.format("%H:%M"),
                shift_end.format("%H:%M")
            ),
            RejectionReason::LunchBreak {
                break_start,
                break_end,
            } => format!(
                "The selected time falls in the lunch break ({} - {}).",
                break_start.format("%H:%M"),
                break_end.format("%H:%M")
            ),
            RejectionReason::HolidayBlocked { name } => {
                format!("This time is blocked by a holiday: {}.", name)
            }
            RejectionReason::AppointmentConflict { count } => format!(
                "The selected time conflicts with {} existing appointment(s).",
                count
            ),
            RejectionReason::CancellationCutoff { cancel_min_hours } => format!(
                "Cancellations must be made at least {} hour(s) before the appointment.",
                cancel_min_hours
            ),
        }
    }
}

/// Outcome of running the validation pipeline over a candidate slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotDecision {
    Accepted,
    Rejected(RejectionReason),
}

impl SlotDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SlotDecision::Accepted)
    }

    /// The rejection message, if any.
    pub fn reason_message(&self) -> Option<String> {
        match self {
            SlotDecision::Accepted => None,
            SlotDecision::Rejected(reason) => Some(reason.message()),
        }
    }
}

impl From<Option<RejectionReason>> for SlotDecision {
    fn from(reason: Option<RejectionReason>) -> Self {
        match reason {
            None => SlotDecision::Accepted,
            Some(reason) => SlotDecision::Rejected(reason),
        }
    }
}

// --- HTTP DTOs ---

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ValidateSlotRequest {
    #[cfg_attr(feature = "openapi", schema(example = "bella-hair-studio"))]
    pub business_slug: String,
    pub employee_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    /// Proposed start in RFC 3339 format.
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:00:00Z"))]
    pub start_time: String,
    /// Proposed end in RFC 3339 format.
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-15T10:30:00Z"))]
    pub end_time: String,
    /// Appointment id to exclude from conflict checks (reschedule flows).
    pub exclude_appointment_id: Option<Uuid>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SlotDecisionResponse {
    pub accepted: bool,
    /// Rejection reason, surfaced verbatim for display. Absent when accepted.
    pub reason: Option<String>,
    /// Machine-readable rejection code. Absent when accepted.
    pub rejection: Option<RejectionReason>,
}

impl From<SlotDecision> for SlotDecisionResponse {
    fn from(decision: SlotDecision) -> Self {
        match decision {
            SlotDecision::Accepted => SlotDecisionResponse {
                accepted: true,
                reason: None,
                rejection: None,
            },
            SlotDecision::Rejected(reason) => SlotDecisionResponse {
                accepted: false,
                reason: Some(reason.message()),
                rejection: Some(reason),
            },
        }
    }
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams, ToSchema))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct AvailabilityQuery {
    #[cfg_attr(feature = "openapi", schema(example = "bella-hair-studio"))]
    pub business_slug: String,
    pub employee_id: Uuid,
    /// Date in YYYY-MM-DD format
    #[cfg_attr(feature = "openapi", schema(format = "date", example = "2025-05-05"))]
    pub date: String,
    /// Duration in minutes
    #[cfg_attr(feature = "openapi", schema(example = 30))]
    pub duration_minutes: i64,
}

#[derive(Serialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailableSlot {
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T10:00:00-03:00"))]
    pub start_time: String, // ISO 8601 format, business time zone
    #[cfg_attr(feature = "openapi", schema(example = "2025-05-05T10:30:00-03:00"))]
    pub end_time: String, // ISO 8601 format, business time zone
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AvailableSlotsResponse {
    pub slots: Vec<AvailableSlot>,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookSlotRequest {
    #[cfg_attr(feature = "openapi", schema(example = "bella-hair-studio"))]
    pub business_slug: String,
    pub employee_id: Uuid,
    pub client_id: Uuid,
    pub service_id: Uuid,
    /// Start in RFC 3339 format.
    pub start_time: String,
    /// End in RFC 3339 format.
    pub end_time: String,
    /// Book directly as confirmed instead of scheduled.
    pub confirmed: Option<bool>,
}

#[derive(Serialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct BookingResponse {
    pub success: bool,
    pub appointment_id: Option<Uuid>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CancelBookingRequest {
    pub business_slug: String,
    pub initiated_by: CancellationInitiator,
}

#[derive(Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CancellationResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Deserialize, Debug)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AddHolidayRequest {
    pub business_slug: String,
    #[serde(flatten)]
    pub holiday: Holiday,
}
