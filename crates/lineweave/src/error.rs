//! Error types for the runtime.

use std::io;

use crate::app::ModeId;

/// Errors that can occur while running a lineweave application.
///
/// Errors surfaced from [`App::run`](crate::App::run) are reported only
/// after the terminal has been restored to its original state; a failed
/// session never leaves the terminal in raw mode or on the alternate
/// screen.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O error during terminal operations.
    ///
    /// Typically the terminal is not available (running in a pipe), was
    /// closed unexpectedly, or a control sequence could not be written.
    #[error("terminal io error: {0}")]
    Io(#[from] io::Error),

    /// Failed to enable or disable raw mode.
    ///
    /// Raw mode is required to read input byte-by-byte without echo. This
    /// usually means the program is not attached to a TTY.
    #[error("failed to {action} raw mode: {source}")]
    RawMode {
        /// Whether we were trying to enable or disable raw mode.
        action: &'static str,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A mode identifier with no registered mode was selected.
    #[error("no mode registered under id {0}")]
    UnknownMode(ModeId),

    /// The application was run without an active mode.
    ///
    /// Register at least one mode with [`App::add_mode`](crate::App::add_mode)
    /// before calling `run`.
    #[error("no active mode")]
    NoActiveMode,

    /// A handler requested a fatal exit via
    /// [`Context::fail`](crate::Context::fail).
    #[error("{0}")]
    Fatal(String),
}

/// A specialized [`Result`] type for lineweave operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::UnknownMode(3).to_string(), "no mode registered under id 3");
        assert_eq!(Error::Fatal("boom".into()).to_string(), "boom");
        assert_eq!(Error::NoActiveMode.to_string(), "no active mode");
    }

    #[test]
    fn test_error_from_io() {
        let err: Error = io::Error::other("nope").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
