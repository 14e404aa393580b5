// Error types for playwright-session

use thiserror::Error;

/// Result type alias for session-manager operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while managing browser sessions
#[derive(Debug, Error)]
pub enum Error {
    /// A lifecycle operation was invoked before any driver was launched.
    ///
    /// `launch_context` (and anything else that needs an active driver)
    /// requires a prior successful `launch_driver` call.
    #[error("No active drivers launched")]
    NoActiveDriver,

    /// The referenced driver key is not present in the registry.
    ///
    /// Raised by `switch_driver` and `close_driver`. The key must match one
    /// used in an earlier `launch_driver` call that has not been closed since.
    #[error("Driver '{key}' was not found")]
    DriverNotFound { key: String },

    /// No context with the given name tag exists on the active driver.
    ///
    /// Raised by `switch_context` and `close_context`. Context names are
    /// assigned at creation time: `"default"` for the context created by
    /// `launch_driver`, the caller-supplied key for `launch_context`.
    #[error("Context '{name}' was not found")]
    ContextNotFound { name: String },

    /// The driver has no open contexts to resolve a default from.
    ///
    /// Can occur when switching to a driver whose contexts were all closed
    /// (e.g. by a non-reusing teardown) without relaunching it first.
    #[error("Driver has no open contexts")]
    NoOpenContexts,

    /// The context has no open pages to resolve a first page from.
    #[error("Context has no open pages")]
    NoOpenPages,

    /// `launch_context` was called while an embedded-application driver is
    /// active; such drivers have exactly one intrinsic context.
    #[error("Embedded application drivers cannot open additional contexts")]
    EmbeddedAppContexts,

    /// Failure surfaced by the underlying driver, context, or page.
    ///
    /// Propagated unmodified; the manager adds no retry or wrapping logic.
    #[error(transparent)]
    Driver(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps an arbitrary driver-side failure for propagation.
    pub fn driver(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Driver(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let err = Error::DriverNotFound {
            key: "chrome".to_string(),
        };
        assert_eq!(err.to_string(), "Driver 'chrome' was not found");

        let err = Error::ContextNotFound {
            name: "incognito".to_string(),
        };
        assert_eq!(err.to_string(), "Context 'incognito' was not found");
    }

    #[test]
    fn test_usage_error_message() {
        assert_eq!(
            Error::NoActiveDriver.to_string(),
            "No active drivers launched"
        );
    }

    #[test]
    fn test_driver_error_is_transparent() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "browser process exited");
        let err = Error::driver(io);
        assert_eq!(err.to_string(), "browser process exited");
    }
}
