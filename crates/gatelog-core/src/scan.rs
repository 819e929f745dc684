//! Scan decision engine.
//!
//! Converts one raw scan input into at most one new [`LogEvent`]:
//!
//! 1. Validate and normalize the scanned identifier.
//! 2. Resolve the student from the roster.
//! 3. Cooldown check against the latest event — within the window the scan
//!    is silently ignored, absorbing duplicate decode events from a single
//!    physical barcode read.
//! 4. Toggle: no prior event or prior EXIT yields ENTRY; prior ENTRY yields
//!    EXIT. The log is the only ground truth of presence.
//! 5. Persist the event, then broadcast it.
//!
//! Steps 3-5 run under a per-enrollment-number async mutex, so the
//! read-decide-append sequence is serialized per student while scans for
//! different students proceed in parallel. The engine is otherwise
//! stateless: "last event" is always a fresh query against the durable
//! store, never cached.
//!
//! The cooldown suppresses a scan even when the toggle would have been
//! valid (rapid legitimate re-entry within the window is indistinguishable
//! from a duplicate read). False suppression is preferred over false
//! duplication; do not "fix" this.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::broadcast::ScanBroadcaster;
use crate::error::{Error, Result};
use crate::events::{now_millis, EventLog, LogEvent, ScanAction};
use crate::roster::{normalize_enrollment_number, Roster};

/// Minimum elapsed milliseconds between two accepted events for the same
/// student.
pub const DEFAULT_COOLDOWN_MS: i64 = 5_000;

/// Result of one scan submission.
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    /// The scan landed inside the cooldown window and was suppressed.
    /// No event was written, nothing was broadcast. Not an error.
    Ignored,

    /// The scan was accepted and recorded.
    Accepted {
        /// The action that was recorded.
        action: ScanAction,
        /// The persisted event.
        event: LogEvent,
    },
}

impl ScanOutcome {
    /// Whether this scan was suppressed by the cooldown.
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// The scan-to-log decision engine.
///
/// Sole writer of the event log for enrolled students, and sole enforcer of
/// the alternation invariant: per enrollment number, persisted actions
/// alternate ENTRY, EXIT, ENTRY, ... starting from ENTRY.
pub struct ScanEngine {
    roster: Arc<Roster>,
    log: Arc<EventLog>,
    broadcaster: ScanBroadcaster,
    cooldown_ms: i64,
    /// Per-enrollment-number locks serializing read-decide-append.
    /// Entries are never reclaimed; only resolved students get one, so
    /// the map is bounded by the roster size.
    key_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl ScanEngine {
    /// Create an engine over the given roster, log store, and broadcaster.
    #[must_use]
    pub fn new(
        roster: Arc<Roster>,
        log: Arc<EventLog>,
        broadcaster: ScanBroadcaster,
        cooldown_ms: i64,
    ) -> Self {
        Self {
            roster,
            log,
            broadcaster,
            cooldown_ms,
            key_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Submit one raw scanned identifier.
    ///
    /// On an accepted scan exactly one event is appended and one broadcast
    /// pair is published. Ignored and failed scans have zero side effects.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyEnrollmentNumber`] for an empty/blank identifier
    ///   (no store access attempted).
    /// - [`Error::StudentNotFound`] for an unknown identifier (nothing
    ///   written or broadcast).
    /// - [`Error::PersistenceError`] if the append fails (no broadcast;
    ///   no partial state, so rescanning is safe).
    pub async fn submit_scan(&self, raw_identifier: &str) -> Result<ScanOutcome> {
        if raw_identifier.trim().is_empty() {
            return Err(Error::EmptyEnrollmentNumber);
        }
        let enrollment_number = normalize_enrollment_number(raw_identifier);

        // The roster is immutable, so the lookup needs no serialization.
        // Resolving first keeps unknown identifiers out of the lock map.
        let student = self
            .roster
            .find_by_enrollment_number(&enrollment_number)
            .ok_or_else(|| Error::StudentNotFound(enrollment_number.clone()))?;

        let key_lock = self.key_lock(&enrollment_number);
        let _guard = key_lock.lock().await;

        let now = now_millis();
        let latest = self.log.find_latest(&enrollment_number);

        if let Some(last) = &latest {
            if now - last.timestamp < self.cooldown_ms {
                info!(
                    enrollment_number = %enrollment_number,
                    name = %student.name,
                    elapsed_ms = now - last.timestamp,
                    "cooldown active, scan silently ignored"
                );
                return Ok(ScanOutcome::Ignored);
            }
        }

        let action = latest.map_or(ScanAction::Entry, |last| last.action.toggled());

        let event = self.log.append(LogEvent::new(student, action, now))?;

        debug!(
            enrollment_number = %enrollment_number,
            action = action.as_str(),
            "scan recorded"
        );

        // Broadcast failure never rolls back or fails the persisted event.
        self.broadcaster.publish_scan(&event);

        Ok(ScanOutcome::Accepted { action, event })
    }

    /// Configured cooldown window in milliseconds.
    #[must_use]
    pub const fn cooldown_ms(&self) -> i64 {
        self.cooldown_ms
    }

    fn key_lock(&self, enrollment_number: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.key_locks.lock().expect("key lock map poisoned");
        locks
            .entry(enrollment_number.to_string())
            .or_default()
            .clone()
    }
}
