// --- File: crates/reserva_scheduling/src/logic.rs ---
//! The slot-validation check families as pure functions.
//!
//! Every function here is a synchronous predicate over rows that have already
//! been fetched: no clock access, no I/O, no shared state. The orchestrator in
//! [`crate::validator`] fetches the inputs and runs these checks in order.
//! Rejections are returned as values ([`RejectionReason`]); only malformed
//! data (a `custom` holiday rule without a window) is an error.

use crate::models::{
    Appointment, BlockingRule, BookingPolicy, CancellationInitiator, Holiday, RejectionReason,
    Shift,
};
use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Noon boundary for `Morning`/`Afternoon` holiday rules.
const NOON_HOUR: u32 = 12;

/// A holiday row that cannot be evaluated.
///
/// This is a data error, not a rejection: the validator maps it to an
/// infrastructure failure so a broken rule can never silently admit a booking.
#[derive(Error, Debug)]
#[error("holiday '{name}' has a custom blocking rule without a custom window")]
pub struct InvalidHolidayRule {
    pub name: String,
}

/// Half-open interval overlap: `[a_start, a_end)` intersects `[b_start, b_end)`.
///
/// Touching endpoints do not overlap, and zero-duration ranges overlap nothing
/// (including themselves).
pub fn overlaps<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < a_end && b_start < b_end && a_start < b_end && b_start < a_end
}

/// Minutes since midnight for a time-of-day. Seconds are ignored: the booking
/// grid is minute-resolution.
pub fn minutes_of_day(time: NaiveTime) -> i64 {
    (time.hour() * 60 + time.minute()) as i64
}

/// Checks that a proposed time-of-day range fits the employee's shift window.
///
/// `shifts` holds the rows for the requested weekday. No rows means the
/// employee does not work that day. A shift's lunch break is carved out of the
/// window: any overlap with `[lunch_start, lunch_end)` rejects.
pub fn check_shift_window(
    shifts: &[Shift],
    start: NaiveTime,
    end: NaiveTime,
) -> Option<RejectionReason> {
    // Only the first row per weekday is honored. Whether split shifts should
    // be a union of windows is unresolved product behavior; see DESIGN.md.
    let shift = match shifts.first() {
        Some(shift) => shift,
        None => return Some(RejectionReason::EmployeeOff),
    };

    let shift_start = minutes_of_day(shift.start_time);
    let shift_end = minutes_of_day(shift.end_time);
    let slot_start = minutes_of_day(start);
    let slot_end = minutes_of_day(end);

    if slot_start < shift_start || slot_end > shift_end {
        return Some(RejectionReason::OutsideShift {
            shift_start: shift.start_time,
            shift_end: shift.end_time,
        });
    }

    if let (Some(break_start), Some(break_end)) = (shift.lunch_break_start, shift.lunch_break_end)
    {
        if overlaps(
            slot_start,
            slot_end,
            minutes_of_day(break_start),
            minutes_of_day(break_end),
        ) {
            return Some(RejectionReason::LunchBreak {
                break_start,
                break_end,
            });
        }
    }

    None
}

/// Checks a proposed time-of-day range against the day's holiday rules.
///
/// Rules are evaluated in order and the first blocking rule wins; when several
/// would independently block, the reported reason is the first match. Inactive
/// rules are skipped even if the source forgot to filter them.
pub fn check_holiday_blocking(
    holidays: &[Holiday],
    start: NaiveTime,
    end: NaiveTime,
) -> Result<Option<RejectionReason>, InvalidHolidayRule> {
    for holiday in holidays.iter().filter(|holiday| holiday.is_active) {
        let blocked = match holiday.blocking {
            BlockingRule::FullDay => true,
            BlockingRule::Morning => start.hour() < NOON_HOUR,
            BlockingRule::Afternoon => start.hour() >= NOON_HOUR,
            BlockingRule::Custom => {
                let (custom_start, custom_end) = match (holiday.custom_start, holiday.custom_end) {
                    (Some(custom_start), Some(custom_end)) => (custom_start, custom_end),
                    _ => {
                        return Err(InvalidHolidayRule {
                            name: holiday.name.clone(),
                        })
                    }
                };
                overlaps(
                    minutes_of_day(start),
                    minutes_of_day(end),
                    minutes_of_day(custom_start),
                    minutes_of_day(custom_end),
                )
            }
        };

        if blocked {
            debug!("Slot blocked by holiday rule: {}", holiday.name);
            return Ok(Some(RejectionReason::HolidayBlocked {
                name: holiday.name.clone(),
            }));
        }
    }
    Ok(None)
}

/// Result of scanning an employee's existing appointments for collisions.
#[derive(Debug, Clone)]
pub struct ConflictReport {
    pub has_conflict: bool,
    /// Every colliding appointment, so callers can report the exact bookings.
    pub conflicting: Vec<Appointment>,
}

/// Scans existing appointments for overlaps with a proposed range.
///
/// Canceled and no-show rows never conflict; `exclude_id` removes the
/// appointment being rescheduled from its own scan. All conflicts are
/// collected, not just the first.
pub fn check_appointment_conflicts(
    existing: &[Appointment],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_id: Option<Uuid>,
) -> ConflictReport {
    let conflicting: Vec<Appointment> = existing
        .iter()
        .filter(|appointment| Some(appointment.id) != exclude_id)
        .filter(|appointment| appointment.status.blocks_slot())
        .filter(|appointment| overlaps(start, end, appointment.start, appointment.end))
        .cloned()
        .collect();

    ConflictReport {
        has_conflict: !conflicting.is_empty(),
        conflicting,
    }
}

/// Checks the advance-notice and future-horizon bounds of the booking policy.
///
/// `now` is an explicit parameter so callers control the clock and the check
/// stays deterministic.
pub fn check_booking_window(
    policy: &BookingPolicy,
    start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Option<RejectionReason> {
    if start < now + Duration::hours(policy.min_advance_hours as i64) {
        return Some(RejectionReason::TooSoon {
            min_advance_hours: policy.min_advance_hours,
        });
    }

    let horizon = now + Duration::days(policy.future_limit_days as i64);
    if start.date_naive() > horizon.date_naive() {
        return Some(RejectionReason::TooFarAhead {
            future_limit_days: policy.future_limit_days,
        });
    }

    None
}

/// Checks the client's open-appointment count against the simultaneous limit.
pub fn check_simultaneous_limit(
    policy: &BookingPolicy,
    open_count: usize,
) -> Option<RejectionReason> {
    if open_count >= policy.simultaneous_limit as usize {
        return Some(RejectionReason::SimultaneousLimit {
            limit: policy.simultaneous_limit,
        });
    }
    None
}

/// Checks the cancellation cutoff for a cancel action.
///
/// Business-initiated cancellations bypass the cutoff; clients must cancel at
/// least `cancel_min_hours` before the appointment starts.
pub fn check_cancellation_cutoff(
    policy: &BookingPolicy,
    appointment_start: DateTime<Utc>,
    now: DateTime<Utc>,
    initiated_by: CancellationInitiator,
) -> Option<RejectionReason> {
    if initiated_by == CancellationInitiator::Business {
        return None;
    }

    if now + Duration::hours(policy.cancel_min_hours as i64) > appointment_start {
        return Some(RejectionReason::CancellationCutoff {
            cancel_min_hours: policy.cancel_min_hours,
        });
    }
    None
}
