use tracing_subscriber::EnvFilter;

/// Initialise logging. The default level is `info`; when `debug_logging` is
/// set in the settings file the level becomes `debug` and can be overridden
/// via the `RUST_LOG` environment variable.
pub fn init(debug: bool) {
    // Without debug logging `RUST_LOG` is ignored so a stray variable in the
    // user's environment cannot flood the console.
    let level = if debug { "debug" } else { "info" };

    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}
