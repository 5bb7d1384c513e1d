//! Tracing initialisation for the mediaflavor binary.
//!
//! Logs go to stderr so stdout stays reserved for command output. Without
//! `RUST_LOG`, only the mediaflavor crates log at the requested level;
//! dependencies are held at `warn`.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter directives used when `RUST_LOG` is absent or unparsable.
fn default_directives(level: Level) -> String {
    format!("warn,mediaflavor={level},mediaflavor_core={level}")
}

/// Install the global subscriber. Only the first call in a process wins.
///
/// With `json`, each line carries the enclosing resolution span so events
/// can be grouped by release.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .try_init()
    };
    // A subscriber set by an earlier call or a test harness stays in place.
    installed.ok();
}
