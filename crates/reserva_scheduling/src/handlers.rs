// File: crates/reserva_scheduling/src/handlers.rs
use crate::models::{
    Appointment, AppointmentStatus, AvailabilityQuery, AvailableSlotsResponse, AddHolidayRequest,
    BlockingRule, BookSlotRequest, BookingResponse, CancelBookingRequest, CancellationResponse,
    Shift, SlotDecision, SlotDecisionResponse, SlotRequest, ValidateSlotRequest,
};
use crate::service::{InMemoryScheduleStore, ScheduleStoreError};
use crate::validator::{SchedulingError, SlotValidator};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reserva_common::error::{HttpStatusCode, ReservaError};
use reserva_config::AppConfig;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

// Shared state needed by the scheduling handlers
pub struct SchedulingState {
    pub config: Arc<AppConfig>,
    pub validator: SlotValidator,
    pub store: Arc<InMemoryScheduleStore>,
}

/// Maps a pipeline error to an HTTP answer.
///
/// Infrastructure failures deliberately surface a generic retry message:
/// internals stay in the log, and the caller must never read an error as
/// "slot is free".
fn scheduling_error_response(err: SchedulingError) -> (StatusCode, String) {
    error!("Slot validation failed: {}", err);
    let mapped = ReservaError::from(err);
    let status = StatusCode::from_u16(mapped.status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match status {
        StatusCode::BAD_REQUEST => mapped.to_string(),
        StatusCode::NOT_FOUND => "Appointment not found.".to_string(),
        _ => "Could not verify availability right now. Please try again.".to_string(),
    };
    (status, message)
}

fn parse_rfc3339(value: &str, field: &str) -> Result<DateTime<Utc>, (StatusCode, String)> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| {
            (
                StatusCode::BAD_REQUEST,
                format!("Invalid {} (expected RFC 3339)", field),
            )
        })
}

/// Handler to validate a candidate slot without booking it.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/slots/validate", // Path relative to /api
    request_body = ValidateSlotRequest,
    responses(
        (status = 200, description = "Validation decision (rejections are values, not errors)", body = SlotDecisionResponse),
        (status = 400, description = "Malformed request"),
        (status = 503, description = "Availability could not be verified")
    ),
    tag = "Scheduling"
))]
pub async fn validate_slot_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(body): Json<ValidateSlotRequest>,
) -> Result<Json<SlotDecisionResponse>, (StatusCode, String)> {
    let start = parse_rfc3339(&body.start_time, "start_time")?;
    let end = parse_rfc3339(&body.end_time, "end_time")?;

    let request = SlotRequest {
        business_slug: body.business_slug,
        employee_id: body.employee_id,
        client_id: body.client_id,
        service_id: body.service_id,
        start,
        end,
        exclude_appointment_id: body.exclude_appointment_id,
    };

    let decision = state
        .validator
        .validate_slot(&request, Utc::now())
        .await
        .map_err(scheduling_error_response)?;

    Ok(Json(SlotDecisionResponse::from(decision)))
}

/// Handler to list bookable slots for an employee on a date.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/slots/availability", // Path relative to /api
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Bookable slots on the requested date", body = AvailableSlotsResponse),
        (status = 400, description = "Bad request (e.g., invalid date format)"),
        (status = 503, description = "Availability could not be verified")
    ),
    tag = "Scheduling"
))]
pub async fn get_availability_handler(
    State(state): State<Arc<SchedulingState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailableSlotsResponse>, (StatusCode, String)> {
    let date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d").map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            "Invalid date format (YYYY-MM-DD)".to_string(),
        )
    })?;
    if query.duration_minutes <= 0 {
        return Err((
            StatusCode::BAD_REQUEST,
            "duration_minutes must be positive".to_string(),
        ));
    }

    let slots = state
        .validator
        .available_slots(
            &query.business_slug,
            query.employee_id,
            date,
            Duration::minutes(query.duration_minutes),
            Utc::now(),
        )
        .await
        .map_err(scheduling_error_response)?;

    info!(
        "Availability scan for {} on {}: {} slot(s)",
        query.employee_id,
        date,
        slots.len()
    );
    Ok(Json(AvailableSlotsResponse { slots }))
}

/// Handler to book a slot: validate, then write. The store re-checks the
/// slot under its write lock, so a lost race comes back as 409.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/book", // Path relative to /api
    request_body = BookSlotRequest,
    responses(
        (status = 200, description = "Booking result", body = BookingResponse),
        (status = 409, description = "Slot already booked"),
        (status = 503, description = "Availability could not be verified")
    ),
    tag = "Scheduling"
))]
pub async fn book_slot_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(body): Json<BookSlotRequest>,
) -> Result<Json<BookingResponse>, (StatusCode, String)> {
    let start = parse_rfc3339(&body.start_time, "start_time")?;
    let end = parse_rfc3339(&body.end_time, "end_time")?;

    let request = SlotRequest {
        business_slug: body.business_slug.clone(),
        employee_id: body.employee_id,
        client_id: body.client_id,
        service_id: body.service_id,
        start,
        end,
        exclude_appointment_id: None,
    };

    let decision = state
        .validator
        .validate_slot(&request, Utc::now())
        .await
        .map_err(scheduling_error_response)?;

    if let SlotDecision::Rejected(reason) = decision {
        return Ok(Json(BookingResponse {
            success: false,
            appointment_id: None,
            message: reason.message(),
        }));
    }

    let status = if body.confirmed.unwrap_or(false) {
        AppointmentStatus::Confirmed
    } else {
        AppointmentStatus::Scheduled
    };
    let appointment = Appointment {
        id: Uuid::new_v4(),
        employee_id: body.employee_id,
        client_id: body.client_id,
        service_id: body.service_id,
        start,
        end,
        status,
    };

    match state.store.insert_appointment(&body.business_slug, appointment) {
        Ok(stored) => {
            info!("Booked appointment {} for {}", stored.id, stored.client_id);
            Ok(Json(BookingResponse {
                success: true,
                appointment_id: Some(stored.id),
                message: "Appointment booked successfully.".to_string(),
            }))
        }
        Err(ScheduleStoreError::Conflict) => Err((
            StatusCode::CONFLICT,
            "Requested time slot is no longer available.".to_string(),
        )),
        Err(err) => {
            error!("Failed to store appointment: {}", err);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "Could not complete the booking right now. Please try again.".to_string(),
            ))
        }
    }
}

/// Handler to cancel an appointment, applying the cancellation cutoff for
/// client-initiated requests.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/appointments/{id}/cancel", // Path relative to /api
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Cancellation result", body = CancellationResponse),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment already in a terminal state")
    ),
    tag = "Scheduling"
))]
pub async fn cancel_appointment_handler(
    State(state): State<Arc<SchedulingState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<CancelBookingRequest>,
) -> Result<Json<CancellationResponse>, (StatusCode, String)> {
    let decision = state
        .validator
        .validate_cancellation(&body.business_slug, id, body.initiated_by, Utc::now())
        .await
        .map_err(scheduling_error_response)?;

    if let SlotDecision::Rejected(reason) = decision {
        return Ok(Json(CancellationResponse {
            success: false,
            message: reason.message(),
        }));
    }

    match state.store.cancel_appointment(&body.business_slug, id) {
        Ok(_) => Ok(Json(CancellationResponse {
            success: true,
            message: "Appointment cancelled.".to_string(),
        })),
        Err(ScheduleStoreError::NotFound(_)) => {
            Err((StatusCode::NOT_FOUND, "Appointment not found.".to_string()))
        }
        Err(ScheduleStoreError::NotCancellable(_)) => Err((
            StatusCode::CONFLICT,
            "Appointment can no longer be cancelled.".to_string(),
        )),
        Err(err) => {
            error!("Failed to cancel appointment {}: {}", id, err);
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "Could not cancel the appointment right now. Please try again.".to_string(),
            ))
        }
    }
}

/// Handler to register a recurring shift row for an employee.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/shifts", // Path relative to /api
    request_body = Shift,
    responses(
        (status = 201, description = "Shift stored"),
        (status = 400, description = "Malformed shift")
    ),
    tag = "Scheduling"
))]
pub async fn add_shift_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(shift): Json<Shift>,
) -> Result<StatusCode, (StatusCode, String)> {
    if shift.end_time <= shift.start_time {
        return Err((
            StatusCode::BAD_REQUEST,
            "Shift end must be after shift start".to_string(),
        ));
    }
    if shift.lunch_break_start.is_some() != shift.lunch_break_end.is_some() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Lunch break needs both a start and an end".to_string(),
        ));
    }
    // An inverted break is an empty interval that would never block anything.
    if let (Some(break_start), Some(break_end)) = (shift.lunch_break_start, shift.lunch_break_end)
    {
        if break_end <= break_start {
            return Err((
                StatusCode::BAD_REQUEST,
                "Lunch break end must be after its start".to_string(),
            ));
        }
        if break_start < shift.start_time || break_end > shift.end_time {
            return Err((
                StatusCode::BAD_REQUEST,
                "Lunch break must sit inside the shift window".to_string(),
            ));
        }
    }

    state.store.add_shift(shift).map_err(|err| {
        error!("Failed to store shift: {}", err);
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Could not store the shift right now. Please try again.".to_string(),
        )
    })?;
    Ok(StatusCode::CREATED)
}

/// Handler to register a holiday blocking rule for a tenant.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/admin/holidays", // Path relative to /api
    request_body = AddHolidayRequest,
    responses(
        (status = 201, description = "Holiday stored"),
        (status = 400, description = "Malformed holiday rule")
    ),
    tag = "Scheduling"
))]
pub async fn add_holiday_handler(
    State(state): State<Arc<SchedulingState>>,
    Json(body): Json<AddHolidayRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    // A custom rule without a usable window could never block; refuse it at
    // the door instead of failing every later validation.
    if body.holiday.blocking == BlockingRule::Custom {
        match (body.holiday.custom_start, body.holiday.custom_end) {
            (Some(custom_start), Some(custom_end)) if custom_start < custom_end => {}
            (Some(_), Some(_)) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    "custom_end must be after custom_start".to_string(),
                ));
            }
            _ => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    "Custom blocking rules need custom_start and custom_end".to_string(),
                ));
            }
        }
    }

    state
        .store
        .add_holiday(&body.business_slug, body.holiday)
        .map_err(|err| {
            error!("Failed to store holiday: {}", err);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "Could not store the holiday right now. Please try again.".to_string(),
            )
        })?;
    Ok(StatusCode::CREATED)
}
