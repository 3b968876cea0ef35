use std::sync::Arc;

use crate::config::Config;
use donation_relay_core::donations::{DonationBuffer, DonationService, DonationServiceTrait};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Shared state injected into every handler.
///
/// The donation buffer behind `donation_service` is the only mutable state in
/// the process; it is created empty at startup and never persisted.
pub struct AppState {
    pub donation_service: Arc<dyn DonationServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("RELAY_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> Arc<AppState> {
    let buffer = Arc::new(DonationBuffer::with_capacity(config.buffer_capacity));
    let donation_service = Arc::new(DonationService::new(buffer));
    tracing::info!(
        "Donation buffer ready, retaining the last {} donations",
        config.buffer_capacity
    );
    Arc::new(AppState { donation_service })
}
