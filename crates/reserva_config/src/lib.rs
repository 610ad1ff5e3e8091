// --- File: crates/reserva_config/src/lib.rs ---

pub mod models;

pub use models::{AppConfig, BookingDefaults, ServerConfig};

use config::{Config, ConfigError, Environment, File};
use once_cell::sync::Lazy;
use tracing::debug;

static DOTENV: Lazy<()> = Lazy::new(|| {
    // Missing .env files are fine; env vars may come from the environment itself.
    let _ = dotenv::dotenv();
});

/// Loads `.env` exactly once per process.
///
/// Called by `load_config`, exposed so binaries and tests that read env vars
/// directly get the same behavior.
pub fn ensure_dotenv_loaded() {
    Lazy::force(&DOTENV);
}

/// Loads the unified application configuration.
///
/// Layering, lowest priority first: built-in defaults, `config/default.yml`,
/// `config/{RUN_ENV}.yml`, then environment variables prefixed with `APP`
/// using `__` as the separator (e.g. `APP_SERVER__PORT=8086`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();
    let run_env = std::env::var("RUN_ENV").unwrap_or_else(|_| "default".to_string());
    debug!("Loading configuration for RUN_ENV={}", run_env);

    let builder = Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8086)?
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{}", run_env)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"));

    builder.build()?.try_deserialize()
}
