//! Tracing setup for the native viewer, the CLI and the browser build.

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "agrolink=info,warehouse_board=info";

/// Install the global subscriber. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Install the console subscriber and panic hook.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
}
