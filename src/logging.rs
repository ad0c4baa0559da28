use std::io::Write;

fn level_label(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARN ",
        log::Level::Info => "INFO ",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

/// Logs go to stderr so stdout only ever carries the report.
///
/// `RUST_LOG` wins over the default: warnings only, or this crate at `debug` with `--debug`.
pub fn init_logging(debug: bool) {
    let default_level = if debug {
        "warn,pubmed_fetcher=debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format(|buf, record| writeln!(buf, "[{}] {}", level_label(record.level()), record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}
