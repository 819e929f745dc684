//! # gatelog-core
//!
//! Core business logic for the gatelog campus library entry/exit tracker.
//!
//! This crate provides:
//! - The scan decision engine (cooldown + entry/exit toggle)
//! - The append-only event log store with filtered listing
//! - The student roster (identity store)
//! - Live broadcast fan-out of accepted scans
//! - CSV export of paired visits
//! - Configuration management
//!
//! ## Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`scan`] - Scan-to-log decision engine, the sole writer of the log
//! - [`events`] - Append-only event log store and listing queries
//! - [`roster`] - Read-only student roster keyed by enrollment number
//! - [`broadcast`] - Topic-tagged publish/subscribe for live observers
//! - [`export`] - Visit-paired CSV rendering
//! - [`config`] - Application configuration loading, saving, and validation
//! - [`error`] - Unified error types for the crate

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

pub mod broadcast;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod roster;
pub mod scan;

// Re-export primary types for convenience
pub use broadcast::{
    ScanBroadcaster, ScanNotice, ScanPayload, StudentSummary, DEFAULT_CHANNEL_CAPACITY,
};
pub use config::{default_data_dir, default_log_dir, GatelogConfig};
pub use error::{Error, GatelogError, Result};
pub use events::{now_millis, EventLog, LogEvent, LogFilter, LogPage, ScanAction};
pub use export::export_csv;
pub use roster::{normalize_enrollment_number, Roster, Student};
pub use scan::{ScanEngine, ScanOutcome, DEFAULT_COOLDOWN_MS};
