//! Result and error types for Repasar.

use thiserror::Error;

/// Result type for Repasar operations
pub type RepasarResult<T> = Result<T, RepasarError>;

/// Errors that can occur while replaying a step sequence
#[derive(Debug, Error)]
pub enum RepasarError {
    /// Browser executable not found
    #[error("Browser not found. Install Chromium or set CHROMIUM_PATH")]
    BrowserNotFound,

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Page error
    #[error("Page error: {message}")]
    Page {
        /// Error message
        message: String,
    },

    /// Navigation error (recovered by the runner, logged as a warning)
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// Target element did not become visible within the timeout
    #[error("Element '{selector}' not visible after {ms}ms")]
    ElementTimeout {
        /// Selector that failed to resolve
        selector: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// The interaction call itself failed (click, fill, select, ...)
    #[error("{action} failed on '{selector}': {message}")]
    Interaction {
        /// Action that failed
        action: String,
        /// Target selector
        selector: String,
        /// Error message
        message: String,
    },

    /// Screenshot error
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RepasarError {
    /// Whether this error belongs to the setup class (browser/page could not
    /// be created). Setup errors abort before any step runs and escape to the
    /// process boundary; everything else is caught at the runner boundary.
    #[must_use]
    pub const fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::BrowserNotFound | Self::BrowserLaunch { .. } | Self::Page { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_timeout_display() {
        let err = RepasarError::ElementTimeout {
            selector: "#cart".to_string(),
            ms: 5000,
        };
        assert_eq!(err.to_string(), "Element '#cart' not visible after 5000ms");
    }

    #[test]
    fn test_interaction_display() {
        let err = RepasarError::Interaction {
            action: "Click".to_string(),
            selector: ".buy-now".to_string(),
            message: "node detached".to_string(),
        };
        assert!(err.to_string().contains("Click failed on '.buy-now'"));
        assert!(err.to_string().contains("node detached"));
    }

    #[test]
    fn test_navigation_display() {
        let err = RepasarError::Navigation {
            url: "https://shop.example.com".to_string(),
            message: "net::ERR_TIMED_OUT".to_string(),
        };
        assert!(err.to_string().contains("https://shop.example.com"));
    }

    #[test]
    fn test_setup_classification() {
        assert!(RepasarError::BrowserNotFound.is_setup());
        assert!(RepasarError::BrowserLaunch {
            message: "no chrome".to_string()
        }
        .is_setup());
        assert!(RepasarError::Page {
            message: "target closed".to_string()
        }
        .is_setup());
        assert!(!RepasarError::ElementTimeout {
            selector: "#a".to_string(),
            ms: 500
        }
        .is_setup());
        assert!(!RepasarError::Navigation {
            url: "http://x".to_string(),
            message: "refused".to_string()
        }
        .is_setup());
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: RepasarError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
