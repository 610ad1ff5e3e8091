// File: crates/reserva_scheduling/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::handlers;
use crate::models::{
    AddHolidayRequest, Appointment, AppointmentStatus, AvailabilityQuery, AvailableSlot,
    AvailableSlotsResponse, BlockingRule, BookSlotRequest, BookingPolicy, BookingResponse,
    CancelBookingRequest, CancellationInitiator, CancellationResponse, Holiday, HolidayKind,
    RejectionReason, Shift, SlotDecisionResponse, ValidateSlotRequest,
};

/// OpenAPI documentation for the scheduling endpoints.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::validate_slot_handler,
        handlers::get_availability_handler,
        handlers::book_slot_handler,
        handlers::cancel_appointment_handler,
        handlers::add_shift_handler,
        handlers::add_holiday_handler,
    ),
    components(schemas(
        AddHolidayRequest,
        Appointment,
        AppointmentStatus,
        AvailabilityQuery,
        AvailableSlot,
        AvailableSlotsResponse,
        BlockingRule,
        BookSlotRequest,
        BookingPolicy,
        BookingResponse,
        CancelBookingRequest,
        CancellationInitiator,
        CancellationResponse,
        Holiday,
        HolidayKind,
        RejectionReason,
        Shift,
        SlotDecisionResponse,
        ValidateSlotRequest,
    )),
    tags((name = "Scheduling", description = "Slot validation and booking endpoints"))
)]
pub struct SchedulingApiDoc;
