// file: src/logging/logger.rs
// version: 1.0.0
// guid: 2a90d7f3-b1c6-4e48-8d25-7f30e6a1c594

//! Logger initialization and configuration

use crate::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system
pub fn init_logger(verbose: bool, quiet: bool) -> Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init()
        .map_err(|e| {
            crate::error::DeployError::config(format!("Failed to initialize logger: {}", e))
        })?;

    Ok(())
}

/// Create a scoped logger for operations
pub fn with_operation_span<F, R>(operation: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    let span = tracing::info_span!("operation", name = operation);
    let _enter = span.enter();
    f()
}

// Re-export tracing macros for convenience
pub use tracing::{debug, error, info, trace, warn};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger() {
        // The subscriber can only be set once per process, so initialization
        // may legitimately fail when another test got there first.
        let result = init_logger(false, false);
        assert!(result.is_ok() || result.is_err());
    }

    #[test]
    fn test_with_operation_span() {
        let mut executed = false;
        let result = with_operation_span("test_operation", || {
            executed = true;
            42
        });
        assert!(executed);
        assert_eq!(result, 42);
    }
}
