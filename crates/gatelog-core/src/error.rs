//! Unified error types for the gatelog core library.
//!
//! This module provides a unified error type [`GatelogError`] that covers all
//! failure modes across the gatelog system.
//!
//! # Design Principles
//!
//! - **Specific variants**: Each error variant captures exactly one failure mode
//! - **Actionable messages**: Error messages guide users toward resolution
//! - **HTTP-ready**: Error types include HTTP status codes and error codes
//!
//! A cooldown-suppressed scan is deliberately *not* an error: it is reported
//! as [`crate::scan::ScanOutcome::Ignored`], a success-shaped outcome, so that
//! callers never present duplicate reads from a single physical scan as a
//! failure state.

use std::path::PathBuf;
use thiserror::Error;

/// The unified error type for all gatelog operations.
///
/// Each variant is designed to be:
///
/// 1. **Self-descriptive**: The variant name indicates the failure mode
/// 2. **Contextual**: Variants include relevant data for debugging
/// 3. **Actionable**: Error messages suggest how to resolve the issue
#[derive(Debug, Error)]
pub enum GatelogError {
    // =========================================================================
    // SCAN VALIDATION ERRORS
    // =========================================================================
    /// The scan submission carried no enrollment number.
    #[error("Enrollment number is required")]
    EmptyEnrollmentNumber,

    // =========================================================================
    // LOOKUP ERRORS
    // =========================================================================
    /// The enrollment number does not resolve to a known student.
    #[error("Student not found: '{0}'")]
    StudentNotFound(String),

    // =========================================================================
    // ROSTER & CONFIGURATION ERRORS
    // =========================================================================
    /// The roster file was not found at the expected path.
    #[error("Roster file not found at: {}", .0.display())]
    RosterNotFound(PathBuf),

    /// The roster file exists but could not be parsed.
    #[error("Failed to parse roster: {0}")]
    RosterParseError(String),

    /// The configuration file exists but could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    ConfigParseError(String),

    /// The configuration was parsed but contains invalid values.
    #[error("Configuration validation failed: {0}")]
    ConfigValidationError(String),

    // =========================================================================
    // PERSISTENCE & I/O ERRORS
    // =========================================================================
    /// An error occurred while persisting or reading event log data.
    #[error("Persistence error: {0}")]
    PersistenceError(String),

    /// A low-level I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A specialized [`Result`] type for gatelog operations.
///
/// This type alias eliminates the need to specify the error type explicitly
/// when returning results from gatelog functions.
pub type Result<T> = std::result::Result<T, GatelogError>;

/// Shorthand error type alias.
pub type Error = GatelogError;

impl GatelogError {
    /// Returns `true` if this error was caused by malformed caller input.
    #[inline]
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Self::EmptyEnrollmentNumber)
    }

    /// Returns `true` if this error means a lookup came up empty.
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::StudentNotFound(_) | Self::RosterNotFound(_))
    }

    /// Returns `true` if this error is related to configuration or roster data.
    #[inline]
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::RosterNotFound(_)
                | Self::RosterParseError(_)
                | Self::ConfigParseError(_)
                | Self::ConfigValidationError(_)
        )
    }

    /// Returns `true` if this error is related to I/O or persistence.
    #[inline]
    #[must_use]
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::PersistenceError(_) | Self::IoError(_))
    }

    /// Returns `true` if a retry (e.g. rescanning the barcode) may succeed.
    ///
    /// Persistence failures leave no partial state behind, so the caller is
    /// free to rescan once the store recovers.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::PersistenceError(_) | Self::IoError(_))
    }

    /// Returns an HTTP-appropriate status code for this error.
    #[inline]
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - malformed input
            Self::EmptyEnrollmentNumber => 400,

            // 404 Not Found
            Self::StudentNotFound(_) | Self::RosterNotFound(_) => 404,

            // 422 Unprocessable Entity - semantic errors
            Self::RosterParseError(_)
            | Self::ConfigParseError(_)
            | Self::ConfigValidationError(_) => 422,

            // 500 Internal Server Error - server-side issues
            Self::PersistenceError(_) | Self::IoError(_) => 500,
        }
    }

    /// Returns a machine-readable error code for API responses.
    #[inline]
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyEnrollmentNumber => "EMPTY_ENROLLMENT_NUMBER",
            Self::StudentNotFound(_) => "STUDENT_NOT_FOUND",
            Self::RosterNotFound(_) => "ROSTER_NOT_FOUND",
            Self::RosterParseError(_) => "ROSTER_PARSE_ERROR",
            Self::ConfigParseError(_) => "CONFIG_PARSE_ERROR",
            Self::ConfigValidationError(_) => "CONFIG_VALIDATION_ERROR",
            Self::PersistenceError(_) => "PERSISTENCE_ERROR",
            Self::IoError(_) => "IO_ERROR",
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
