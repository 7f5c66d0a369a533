use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "spend_ledger=info";

/// Installs the global tracing subscriber.
///
/// `directive` overrides `RUST_LOG`; without either, `spend_ledger=info` is used.
/// Only the first call installs a subscriber.
pub fn init_tracing(directive: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = match directive {
            Some(directive) => EnvFilter::new(directive),
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        };

        // Another subscriber may already be installed by the host application.
        if fmt().with_env_filter(filter).try_init().is_ok() {
            tracing::info!("Spend Ledger tracing initialized.");
        }
    });
}
