//! Telemetry initialization.
//!
//! Controlled by `FLAGSTATE_LOG`:
//! - unset → no subscriber (tracing disabled, zero overhead)
//! - `"stderr"` → human-readable events to stderr
//! - `"json"` → JSON events to stderr
//!
//! Event verbosity is filtered by `RUST_LOG` (default `info`).

use tracing_subscriber::EnvFilter;

/// Initialize telemetry based on `FLAGSTATE_LOG`.
pub fn init() {
    match std::env::var("FLAGSTATE_LOG").ok().as_deref() {
        None | Some("") => {}
        Some("json") => init_stderr(true),
        Some(_) => init_stderr(false),
    }
}

fn init_stderr(json: bool) {
    use tracing_subscriber::layer::SubscriberExt as _;
    use tracing_subscriber::util::SubscriberInitExt as _;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
