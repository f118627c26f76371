//! # Logging
//!
//! `keybridge` is mostly run inside pipelines (`keybridge sign … | xargs …`),
//! so stdout carries results only and every log line goes to stderr. The
//! default filter is `warn`: a successful run prints nothing on stderr, and a
//! failed one prints a single `error` event next to the error kind.
//!
//! To see what the library did, raise `keybridge_core`:
//!
//! ```text
//! RUST_LOG=keybridge_core=debug keybridge bridge --message hi
//! ```
//!
//! At `debug` that shows the digest per sign/recover step, the recovery id
//! each recovered key came from, and the attempt at which the EOS canonical
//! loop found an acceptable signature. The binary's own `keybridge=info`
//! events only mark the start of a sign and the bridge verdict.
//!
//! `--log-level` (`KEYBRIDGE_LOG_LEVEL`) sets the filter when `RUST_LOG` is
//! unset; `--log-format json` (`KEYBRIDGE_LOG_FORMAT`) switches to JSON lines
//! for log collectors.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Used when `--log-level` does not parse as a filter.
const FALLBACK_FILTER: &str = "warn";

/// Shape of the stderr log stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// `"json"` in any case selects JSON; anything else is pretty.
    pub fn from_str_lossy(s: &str) -> Self {
        if s.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// A non-empty `RUST_LOG` wins over `--log-level`. A `--log-level` that is
/// not a valid filter degrades to `warn` rather than aborting the command.
fn select_filter(rust_log: Option<&str>, default_level: &str) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(default_level).ok())
        .unwrap_or_else(|| EnvFilter::new(FALLBACK_FILTER))
}

/// Installs the global subscriber. Called once, before the subcommand runs.
pub fn init_logging(default_level: &str, format: LogFormat) {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = select_filter(rust_log.as_deref(), default_level);
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_file(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}
