//! Error handling for bugsdl.
//!
//! Errors carry an [`ErrorKind`] that tells the host what category of
//! failure occurred, plus the underlying error with the vendor's own message
//! where one is available.
//!
//! # Error Categories
//!
//! * Bad credentials ([`ErrorKind::Unauthenticated`])
//! * Non-success HTTP status or vendor failure code ([`ErrorKind::Unavailable`])
//! * Caller misuse such as an unknown bitrate ([`ErrorKind::InvalidArgument`])
//! * Insufficient subscription ([`ErrorKind::PermissionDenied`])
//! * Unsupported operations like playlists ([`ErrorKind::Unimplemented`])
//! * Vendor payloads that do not have the expected shape ([`ErrorKind::DataLoss`])
//!
//! # Example
//!
//! ```rust
//! use bugsdl::error::{Error, ErrorKind, Result};
//!
//! fn check(level: &str) -> Result<()> {
//!     if level != "VIP" {
//!         return Err(Error::permission_denied("VIP account required"));
//!     }
//!     Ok(())
//! }
//! ```

#![allow(clippy::enum_glob_use)]

use std::fmt;
use thiserror::Error;

/// Main error type combining error kind and details.
#[derive(Debug)]
pub struct Error {
    /// Classification of the error
    pub kind: ErrorKind,

    /// Details of the underlying error
    pub error: Box<dyn std::error::Error + Send + Sync>,
}

impl Error {
    /// Attempts to downcast the underlying error to a concrete type.
    #[must_use]
    pub fn downcast<E>(&self) -> Option<&E>
    where
        E: std::error::Error + 'static,
    {
        self.error.downcast_ref::<E>()
    }
}

/// Standard result type for bugsdl operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories, loosely based on gRPC status codes.
#[expect(clippy::module_name_repetitions)]
#[derive(Clone, Copy, Debug, Eq, Error, Hash, Ord, PartialEq, PartialOrd)]
#[repr(u32)]
pub enum ErrorKind {
    /// Anything that does not fit another category.
    #[error("unknown error")]
    Unknown = 2,

    /// The caller passed a value the vendor API does not accept.
    #[error("invalid argument specified")]
    InvalidArgument = 3,

    /// The transport gave up waiting for the vendor.
    #[error("operation timed out")]
    DeadlineExceeded = 4,

    /// A file or setting could not be found.
    #[error("not found")]
    NotFound = 5,

    /// The account is not entitled to use this module.
    #[error("permission denied")]
    PermissionDenied = 7,

    /// The vendor rejected the credentials.
    #[error("no valid authentication credentials")]
    Unauthenticated = 16,

    /// The operation is not offered by this service.
    #[error("not implemented")]
    Unimplemented = 12,

    /// A bug or broken invariant on our side.
    #[error("internal error")]
    Internal = 13,

    /// The vendor refused or failed the request.
    #[error("service unavailable")]
    Unavailable = 14,

    /// The vendor sent a payload that does not have the expected shape.
    #[error("unrecoverable data loss or corruption")]
    DataLoss = 15,
}

impl Error {
    /// Creates a new error with specified kind and details.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let err = Error::new(ErrorKind::NotFound, "secrets file missing");
    /// assert_eq!(err.kind, ErrorKind::NotFound);
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self {
            kind,
            error: error.into(),
        }
    }

    /// Creates an error for payloads that are missing or malformed.
    pub fn data_loss<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::DataLoss, error)
    }

    /// Creates an error for a transport that timed out.
    pub fn deadline_exceeded<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::DeadlineExceeded, error)
    }

    /// Creates an error for internal errors.
    ///
    /// Use for unexpected internal errors that shouldn't occur during normal
    /// operation, like a constant URL that fails to parse.
    pub fn internal<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Internal, error)
    }

    /// Creates an error for invalid arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let err = Error::invalid_argument("bitrate must be one of flac24, flac, aac256, 320k, aac");
    /// assert_eq!(err.kind, ErrorKind::InvalidArgument);
    /// ```
    pub fn invalid_argument<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::InvalidArgument, error)
    }

    pub fn not_found<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::NotFound, error)
    }

    /// Creates an error for accounts without the required subscription.
    pub fn permission_denied<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::PermissionDenied, error)
    }

    /// Creates an error for rejected credentials.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let err = Error::unauthenticated("invalid username or password");
    /// assert_eq!(err.kind, ErrorKind::Unauthenticated);
    /// ```
    pub fn unauthenticated<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Unauthenticated, error)
    }

    /// Creates an error for failed vendor requests.
    ///
    /// Carries the vendor's message or the raw response body.
    pub fn unavailable<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Unavailable, error)
    }

    /// Creates an error for operations the service does not offer.
    pub fn unimplemented<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Unimplemented, error)
    }

    pub fn unknown<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::new(ErrorKind::Unknown, error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "{}: ", self.kind)?;
        self.error.fmt(fmt)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind::*;
        match err.kind() {
            NotFound => Self::not_found(err),
            PermissionDenied => Self::permission_denied(err),
            AddrNotAvailable | ConnectionRefused | NotConnected | ConnectionReset
            | ConnectionAborted | BrokenPipe => Self::unavailable(err),
            UnexpectedEof => Self::data_loss(err),
            TimedOut => Self::deadline_exceeded(err),
            InvalidInput | InvalidData => Self::invalid_argument(err),
            _ => Self::unknown(err),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_body() || err.is_decode() {
            return Self::data_loss(err);
        }

        if err.is_builder() {
            return Self::internal(err);
        }

        if err.is_timeout() {
            return Self::deadline_exceeded(err);
        }

        if err.is_connect() || err.is_redirect() || err.is_status() {
            return Self::unavailable(err);
        }

        Self::unknown(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::data_loss(err)
    }
}

impl From<url::ParseError> for Error {
    fn from(e: url::ParseError) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::invalid_argument(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<time::error::Parse> for Error {
    fn from(e: time::error::Parse) -> Self {
        Self::data_loss(e.to_string())
    }
}

impl From<time::error::Format> for Error {
    fn from(e: time::error::Format) -> Self {
        Self::internal(e.to_string())
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(e: std::num::ParseIntError) -> Self {
        Self::invalid_argument(e.to_string())
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(e: std::num::ParseFloatError) -> Self {
        Self::data_loss(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_kind() {
        let err = Error::permission_denied("VIP account required");
        assert_eq!(err.to_string(), "permission denied: VIP account required");
    }

    #[test]
    fn io_errors_are_categorized() {
        let err = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(err.kind, ErrorKind::NotFound);

        let err = Error::from(std::io::Error::new(std::io::ErrorKind::TimedOut, "slow"));
        assert_eq!(err.kind, ErrorKind::DeadlineExceeded);
    }

    #[test]
    fn parse_int_is_invalid_argument() {
        let err = Error::from("abc".parse::<u64>().unwrap_err());
        assert_eq!(err.kind, ErrorKind::InvalidArgument);
    }
}
