use tracing_subscriber::EnvFilter;

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "NETBOARD_LOG";

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init_tracing(verbose: bool, json: bool) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "info,network_board=debug,board_common=debug"
    } else {
        "warn,network_board=info"
    }
}
