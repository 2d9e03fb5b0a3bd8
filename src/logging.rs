use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber for the CLI.
///
/// Events go to stderr so tables and charts on stdout stay clean. `RUST_LOG`
/// takes precedence over `verbose`.
pub fn init_logger(verbose: bool) {
    let default_directives = if verbose {
        "catch_growth_analyzer=debug,warn"
    } else {
        "catch_growth_analyzer=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    // a second init (tests, demos) is harmless
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
