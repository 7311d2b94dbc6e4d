use tracing::Level;

pub fn init_logging_with_level(level: Level) {
    let _ = tracing_subscriber::fmt().with_max_level(level).try_init();
}

/// Parse a config level name; unknown names fall back to `INFO`.
pub fn parse_level(value: &str) -> Level {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
