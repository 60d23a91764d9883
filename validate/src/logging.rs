//! Logging setup for the replay driver.
//!
//! Engine logs go to stderr so they never interleave with the report on
//! stdout. Set `DEBUG_LOGGING=1` (or pass `--verbose`) for debug output from
//! the xpbar crates.

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init(verbose: bool, quiet: bool) {
    let debug_logging = verbose || std::env::var("DEBUG_LOGGING").is_ok();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter_directive = if debug_logging {
        "info,xpbar_core=debug,xpbar_validate=debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(EnvFilter::new(filter_directive))
        .init();

    tracing::debug!(debug_logging, "xpbar-validate logging initialized");
}
