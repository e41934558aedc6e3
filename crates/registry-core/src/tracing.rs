use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured stdout tracing. Call once at service startup.
///
/// Output is JSON by default; set `LOG_FORMAT=plain` for a human-readable
/// layer during local development. Filtering follows `RUST_LOG`.
///
/// Safe to call multiple times; subsequent calls are silently ignored.
pub fn init_tracing() {
    let plain = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("plain"));
    let fmt_layer = if plain {
        fmt::layer().boxed()
    } else {
        fmt::layer().json().boxed()
    };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt_layer)
        .try_init();
}
