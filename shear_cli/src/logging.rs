//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding an explicit filter directive
pub const LOG_ENV: &str = "SHEAR_LOG";

/// Default filter for a `-v` count when `SHEAR_LOG` is unset.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "shear_core=warn,shear_cli=warn",
        1 => "shear_core=info,shear_cli=info",
        2 => "shear_core=debug,shear_cli=debug",
        _ => "shear_core=trace,shear_cli=trace",
    }
}

/// Initialize logging to stderr.
///
/// Reads `SHEAR_LOG` (e.g. `SHEAR_LOG=shear_core=debug`); falls back to the
/// directive for `verbosity` if it is unset or invalid. Safe to call twice.
pub fn init_tracing(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert!(default_directive(0).contains("warn"));
        assert!(default_directive(1).contains("info"));
        assert!(default_directive(2).contains("debug"));
        assert_eq!(default_directive(9), default_directive(3));
    }

    #[test]
    fn test_directives_parse() {
        for v in 0..4 {
            assert!(default_directive(v).parse::<EnvFilter>().is_ok());
        }
    }
}
