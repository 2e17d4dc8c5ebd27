//! This module provides observability hooks for the estimator.
//!
//! Estimation is a pipeline of opaque numeric steps (factor counts, baseline draws,
//! correction factors), so the orchestrator reports each step as a structured
//! key-value line. The `log_metric!` macro is the primary tool; `init_logging` wires
//! the `log` facade to `env_logger` for binaries and the Python bindings.

use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use crate::error::Result;

#[doc(hidden)]
pub use log as __log;

/// Logs a structured key-value metric line at `debug` level, only in debug builds.
///
/// # Example
/// ```
/// use sweetsourcod::log_metric;
/// let factors = 42;
/// log_metric!("event" = "lz77_parse", "factors" = &factors);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            $crate::observability::__log::debug!("SWEETSOURCOD_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` backend once per process.
///
/// Later calls are no-ops. With `log_file`, records are appended to that file instead
/// of stderr.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<()> {
    let target = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);

        // Just the level and the message.
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())
        });

        if let Some(file) = target {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}
