//! Live broadcast channel for accepted scans.
//!
//! Fan-out is topic-tagged and best-effort: publishing never blocks and never
//! fails the scan that triggered it. The event log remains the source of
//! truth, so observers that disconnect or lag simply re-fetch current state
//! through the reporting endpoints instead of expecting replay.
//!
//! Two logical topics carry identical payload content per accepted scan:
//! `new-scan` for table-style observers (admin dashboard) and `scan-status`
//! for state-mirroring observers (landing display). They exist so each
//! observer can subscribe to only the shape it needs.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::events::{LogEvent, ScanAction};

/// Default capacity of the broadcast ring buffer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Student attributes carried alongside a scan notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentSummary {
    /// Student name.
    pub name: String,
    /// Enrollment number.
    pub enrollment_number: String,
    /// Department.
    pub department: String,
    /// Semester.
    pub semester: u8,
}

/// Payload published for every accepted scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ScanPayload {
    /// Snapshot of the student who scanned.
    pub student: StudentSummary,
    /// The action that was recorded.
    pub action: ScanAction,
    /// Identifier of the persisted event.
    pub id: Uuid,
    /// Event timestamp in milliseconds since epoch.
    pub timestamp: i64,
}

impl From<&LogEvent> for ScanPayload {
    fn from(event: &LogEvent) -> Self {
        Self {
            student: StudentSummary {
                name: event.name.clone(),
                enrollment_number: event.enrollment_number.clone(),
                department: event.department.clone(),
                semester: event.semester,
            },
            action: event.action,
            id: event.id,
            timestamp: event.timestamp,
        }
    }
}

/// A topic-tagged notification delivered to connected observers.
///
/// Serializes as `{"topic": "...", "payload": ...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "topic", content = "payload")]
pub enum ScanNotice {
    /// Raw event data for table-style observers.
    #[serde(rename = "new-scan")]
    TableUpdate(ScanPayload),

    /// The same event wrapped as a state-transition notification.
    #[serde(rename = "scan-status")]
    StatusMirror {
        /// Transition marker; currently always `SCANNED`.
        status: String,
        /// The event data.
        data: ScanPayload,
    },
}

/// Publish/subscribe hub for scan notifications.
///
/// Thin wrapper over [`tokio::sync::broadcast`]: cloning is cheap, and
/// observers come and go without the publisher knowing who is listening.
#[derive(Debug, Clone)]
pub struct ScanBroadcaster {
    sender: broadcast::Sender<ScanNotice>,
}

impl ScanBroadcaster {
    /// Create a broadcaster with the given ring buffer capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to all future notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ScanNotice> {
        self.sender.subscribe()
    }

    /// Number of currently connected observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish both notifications for an accepted scan.
    ///
    /// Fire-and-forget: a send error only means nobody is listening right
    /// now, which is fine — the event is already durably persisted.
    pub fn publish_scan(&self, event: &LogEvent) {
        let payload = ScanPayload::from(event);

        if self
            .sender
            .send(ScanNotice::TableUpdate(payload.clone()))
            .is_err()
        {
            tracing::debug!(
                enrollment_number = %event.enrollment_number,
                "no observers connected, table update dropped"
            );
        }

        if self
            .sender
            .send(ScanNotice::StatusMirror {
                status: "SCANNED".to_string(),
                data: payload,
            })
            .is_err()
        {
            tracing::debug!(
                enrollment_number = %event.enrollment_number,
                "no observers connected, status mirror dropped"
            );
        }
    }
}

impl Default for ScanBroadcaster {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}
