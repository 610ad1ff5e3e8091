// --- File: crates/reserva_scheduling/src/routes.rs ---

use crate::handlers::{
    add_holiday_handler, add_shift_handler, book_slot_handler, cancel_appointment_handler,
    get_availability_handler, validate_slot_handler, SchedulingState,
};
use crate::service::InMemoryScheduleStore;
use crate::validator::SlotValidator;
use axum::{
    routing::{get, post},
    Router,
};
use chrono_tz::Tz;
use reserva_config::AppConfig;
use std::str::FromStr;
use std::sync::Arc;

/// Creates a router containing all routes for the scheduling feature.
///
/// The validator is wired to the given store through the source traits; the
/// binary passes its shared in-memory store here.
pub fn routes(config: Arc<AppConfig>, store: Arc<InMemoryScheduleStore>) -> Router {
    let time_zone = config
        .time_zone
        .clone()
        .unwrap_or_else(|| "America/Sao_Paulo".to_string());
    let time_zone = Tz::from_str(&time_zone).unwrap_or(Tz::America__Sao_Paulo);

    let validator = SlotValidator::from_sources(&store, time_zone);
    let state = Arc::new(SchedulingState {
        config,
        validator,
        store,
    });

    Router::new()
        .route("/slots/validate", post(validate_slot_handler))
        .route("/slots/availability", get(get_availability_handler))
        .route("/book", post(book_slot_handler))
        .route(
            "/appointments/{id}/cancel",
            post(cancel_appointment_handler),
        )
        .route("/admin/shifts", post(add_shift_handler))
        .route("/admin/holidays", post(add_holiday_handler))
        .with_state(state)
}
