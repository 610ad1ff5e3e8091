// --- File: crates/reserva_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Booking policy defaults ---
// Tenant-level overrides live in the schedule store; these values apply when a
// business has not configured its own limits.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BookingDefaults {
    /// Minimum lead time between "now" and an appointment start, in hours.
    #[serde(default)]
    pub min_advance_hours: u32,
    /// How far into the future a booking may be placed, in days.
    #[serde(default = "default_future_limit_days")]
    pub future_limit_days: u32,
    /// Maximum number of open (scheduled/confirmed) appointments per client.
    #[serde(default = "default_simultaneous_limit")]
    pub simultaneous_limit: u32,
    /// Granularity of the booking grid, in minutes.
    #[serde(default = "default_time_interval_minutes")]
    pub time_interval_minutes: u32,
    /// Minimum lead time for a client-initiated cancellation, in hours.
    #[serde(default = "default_cancel_min_hours")]
    pub cancel_min_hours: u32,
}

fn default_future_limit_days() -> u32 {
    90
}

fn default_simultaneous_limit() -> u32 {
    3
}

fn default_time_interval_minutes() -> u32 {
    30
}

fn default_cancel_min_hours() -> u32 {
    24
}

impl Default for BookingDefaults {
    fn default() -> Self {
        BookingDefaults {
            min_advance_hours: 0,
            future_limit_days: default_future_limit_days(),
            simultaneous_limit: default_simultaneous_limit(),
            time_interval_minutes: default_time_interval_minutes(),
            cancel_min_hours: default_cancel_min_hours(),
        }
    }
}

// --- Unified App Configuration ---
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    /// IANA time zone the business calendar lives in, e.g. "America/Sao_Paulo".
    /// Shift and holiday windows are interpreted in this zone.
    pub time_zone: Option<String>,

    /// Booking policy defaults for tenants without explicit settings.
    #[serde(default)]
    pub booking: BookingDefaults,
}
