// File: services/reserva_backend/src/main.rs
use axum::{routing::get, Router};
use reserva_config::{load_config, AppConfig};
use reserva_scheduling::models::BookingPolicy;
use reserva_scheduling::routes as scheduling_routes;
use reserva_scheduling::service::InMemoryScheduleStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Builds the schedule store seeded with the configured booking defaults.
/// Tenants that set their own policy override these values per business.
fn build_store(config: &AppConfig) -> Arc<InMemoryScheduleStore> {
    let booking = &config.booking;
    Arc::new(InMemoryScheduleStore::new(BookingPolicy {
        min_advance_hours: booking.min_advance_hours,
        future_limit_days: booking.future_limit_days,
        simultaneous_limit: booking.simultaneous_limit,
        time_interval_minutes: booking.time_interval_minutes,
        cancel_min_hours: booking.cancel_min_hours,
    }))
}

#[tokio::main]
async fn main() {
    reserva_common::logging::init();
    let config = Arc::new(load_config().expect("Failed to load config"));
    let store = build_store(&config);

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Reserva API!" }))
        .merge(scheduling_routes::routes(config.clone(), store));

    #[allow(unused_mut)] // mutated only when the openapi feature is enabled
    let mut app = Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use reserva_scheduling::doc::SchedulingApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Reserva API",
                version = "0.1.0",
                description = "Appointment scheduling service API docs",
            ),
            components(),
            tags( (name = "Reserva", description = "Core scheduling endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(SchedulingApiDoc::openapi());
        info!("Adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
