//! Error types for the progress renderer.

use thiserror::Error;

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a [`CancellationToken`](crate::CancellationToken) fired.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CancelCause {
    /// Cancelled explicitly without a reason.
    #[error("operation cancelled")]
    Cancelled,

    /// The token's deadline passed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Cancelled explicitly with a reason.
    #[error("operation cancelled: {0}")]
    Reason(String),
}

/// Main error type for the progress renderer.
#[derive(Error, Debug)]
pub enum Error {
    /// The surrounding context was cancelled while the writer was running.
    #[error(transparent)]
    Cancelled(#[from] CancelCause),

    /// Writing to the output sink failed.
    #[error("progress output error: {0}")]
    Io(#[from] std::io::Error),

    /// `start` was called while another `start` on the same writer is running.
    #[error("progress writer is already running")]
    AlreadyRunning,

    /// `start` was called on a writer whose run already ended.
    #[error("progress writer already ran; writers are single use")]
    AlreadyStopped,
}

impl Error {
    /// Returns true if this error came from a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// The cancellation cause, if this error is a cancellation.
    pub fn cancel_cause(&self) -> Option<&CancelCause> {
        match self {
            Self::Cancelled(cause) => Some(cause),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_display() {
        assert_eq!(CancelCause::Cancelled.to_string(), "operation cancelled");
        assert_eq!(
            CancelCause::Reason("ctrl-c".into()).to_string(),
            "operation cancelled: ctrl-c"
        );
        let err = Error::from(CancelCause::DeadlineExceeded);
        assert_eq!(err.to_string(), "deadline exceeded");
    }

    #[test]
    fn test_is_cancelled() {
        let err = Error::from(CancelCause::Cancelled);
        assert!(err.is_cancelled());
        assert_eq!(err.cancel_cause(), Some(&CancelCause::Cancelled));

        let io = Error::from(std::io::Error::other("broken pipe"));
        assert!(!io.is_cancelled());
        assert!(io.cancel_cause().is_none());
    }
}
