//! Append-only event log store.
//!
//! Every accepted scan becomes one [`LogEvent`], persisted as a line of JSON
//! in the data directory and indexed in memory for fast latest-event lookup
//! and filtered listing. Events are never updated in place; the only
//! destructive operation is the explicit bulk [`EventLog::clear`].
//!
//! Event rows carry a denormalized snapshot of the student at scan time, so
//! historical reporting stays accurate even if roster attributes change
//! later. Do not normalize this away by joining against the roster at read
//! time.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::roster::{normalize_enrollment_number, Student};

/// Current time as milliseconds since the Unix epoch.
///
/// Event timestamps use this representation both as the ordering key and as
/// the cooldown reference.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Direction of an accepted scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanAction {
    /// The student entered the library.
    Entry,
    /// The student left the library.
    Exit,
}

impl ScanAction {
    /// The action that follows this one under the toggle rule.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Entry => Self::Exit,
            Self::Exit => Self::Entry,
        }
    }

    /// Uppercase wire representation, matching the persisted form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entry => "ENTRY",
            Self::Exit => "EXIT",
        }
    }
}

/// One entry/exit event in the log.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LogEvent {
    /// Event identifier.
    pub id: Uuid,

    /// Enrollment number snapshot (normalized).
    #[schema(example = "EN2023001")]
    pub enrollment_number: String,

    /// Student name snapshot.
    #[schema(example = "Priya Sharma")]
    pub name: String,

    /// Department snapshot.
    #[schema(example = "Computer Science")]
    pub department: String,

    /// Semester snapshot.
    #[schema(example = 5)]
    pub semester: u8,

    /// Entry or exit.
    pub action: ScanAction,

    /// Milliseconds since epoch, assigned at creation.
    #[schema(example = 1_735_689_600_000_i64)]
    pub timestamp: i64,

    /// Back-reference to the student record (relation only).
    pub student_id: Uuid,
}

impl LogEvent {
    /// Build a new event snapshotting the given student.
    #[must_use]
    pub fn new(student: &Student, action: ScanAction, timestamp: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            enrollment_number: student.enrollment_number.clone(),
            name: student.name.clone(),
            department: student.department.clone(),
            semester: student.semester,
            action,
            timestamp,
            student_id: student.id,
        }
    }
}

/// Filter criteria for log listing and export.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    /// Inclusive lower bound on `timestamp` (milliseconds).
    pub start: Option<i64>,
    /// Inclusive upper bound on `timestamp` (milliseconds).
    pub end: Option<i64>,
    /// Restrict to one enrollment number (normalized on construction).
    pub enrollment_number: Option<String>,
    /// Restrict to one action.
    pub action: Option<ScanAction>,
}

impl LogFilter {
    /// Normalize the enrollment number filter to the store's key convention.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if let Some(en) = self.enrollment_number.take() {
            self.enrollment_number = Some(normalize_enrollment_number(&en));
        }
        self
    }

    fn matches(&self, event: &LogEvent) -> bool {
        if self.start.is_some_and(|s| event.timestamp < s) {
            return false;
        }
        if self.end.is_some_and(|e| event.timestamp > e) {
            return false;
        }
        if self
            .enrollment_number
            .as_deref()
            .is_some_and(|en| event.enrollment_number != en)
        {
            return false;
        }
        if self.action.is_some_and(|a| event.action != a) {
            return false;
        }
        true
    }
}

/// One page of log listing results.
#[derive(Debug, Clone)]
pub struct LogPage {
    /// Matching events, newest first.
    pub logs: Vec<LogEvent>,
    /// 1-based page number that was returned.
    pub current_page: usize,
    /// Total pages available for this filter.
    pub total_pages: usize,
    /// Total events matching the filter.
    pub total_logs: usize,
    /// Page size used.
    pub logs_per_page: usize,
}

#[derive(Debug, Default)]
struct LogIndex {
    /// All events in append order.
    events: Vec<LogEvent>,
    /// Offset of the latest event per enrollment number.
    latest: HashMap<String, usize>,
}

/// Durable, append-only store of scan events.
///
/// Events are persisted one JSON object per line. The in-memory index is
/// rebuilt from the file on open, so restarts keep the full history. All
/// methods take `&self`; writers hold the interior lock across the file
/// write and index update so an append is observed atomically.
#[derive(Debug)]
pub struct EventLog {
    path: PathBuf,
    inner: RwLock<LogIndex>,
}

impl EventLog {
    /// Open (or create) the event log at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PersistenceError`] if an existing file cannot be read
    /// or contains a line that does not parse as an event.
    pub fn open(path: &Path) -> Result<Self> {
        let mut index = LogIndex::default();
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .map_err(|e| Error::PersistenceError(format!("read {}: {e}", path.display())))?;
            for line in content.lines().filter(|l| !l.trim().is_empty()) {
                let event: LogEvent = serde_json::from_str(line).map_err(|e| {
                    Error::PersistenceError(format!("corrupt event in {}: {e}", path.display()))
                })?;
                index.latest.insert(event.enrollment_number.clone(), index.events.len());
                index.events.push(event);
            }
        } else if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self {
            path: path.to_path_buf(),
            inner: RwLock::new(index),
        })
    }

    /// Append one event, durably.
    ///
    /// The file write happens before the index update; on write failure the
    /// in-memory state is untouched and the caller sees a
    /// [`Error::PersistenceError`], so a retry starts from a clean slate.
    pub fn append(&self, event: LogEvent) -> Result<LogEvent> {
        let line = serde_json::to_string(&event)
            .map_err(|e| Error::PersistenceError(format!("serialize event: {e}")))?;

        let mut index = self.inner.write().expect("event log lock poisoned");
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::PersistenceError(format!("open {}: {e}", self.path.display())))?;
        writeln!(file, "{line}")
            .map_err(|e| Error::PersistenceError(format!("write {}: {e}", self.path.display())))?;

        let offset = index.events.len();
        index.latest.insert(event.enrollment_number.clone(), offset);
        index.events.push(event.clone());
        Ok(event)
    }

    /// Most recent event for an enrollment number, if any.
    #[must_use]
    pub fn find_latest(&self, enrollment_number: &str) -> Option<LogEvent> {
        let index = self.inner.read().expect("event log lock poisoned");
        index
            .latest
            .get(enrollment_number)
            .map(|&i| index.events[i].clone())
    }

    /// All events matching the filter, newest first.
    #[must_use]
    pub fn query(&self, filter: &LogFilter) -> Vec<LogEvent> {
        let index = self.inner.read().expect("event log lock poisoned");
        let mut matches: Vec<LogEvent> = index
            .events
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches
    }

    /// One page of events matching the filter, newest first.
    ///
    /// `page` is 1-based; a zero `page` or `limit` is clamped to 1.
    #[must_use]
    pub fn list(&self, filter: &LogFilter, page: usize, limit: usize) -> LogPage {
        let page = page.max(1);
        let limit = limit.max(1);
        let matches = self.query(filter);
        let total_logs = matches.len();
        let total_pages = total_logs.div_ceil(limit);
        let logs = matches
            .into_iter()
            .skip((page - 1) * limit)
            .take(limit)
            .collect();
        LogPage {
            logs,
            current_page: page,
            total_pages,
            total_logs,
            logs_per_page: limit,
        }
    }

    /// Remove every event from the store. Reporting-scope bulk clear.
    pub fn clear(&self) -> Result<()> {
        let mut index = self.inner.write().expect("event log lock poisoned");
        std::fs::write(&self.path, "")
            .map_err(|e| Error::PersistenceError(format!("truncate {}: {e}", self.path.display())))?;
        index.events.clear();
        index.latest.clear();
        Ok(())
    }

    /// Total number of events in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().expect("event log lock poisoned").events.len()
    }

    /// Whether the store holds no events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(enrollment: &str) -> Student {
        Student {
            id: Uuid::new_v4(),
            enrollment_number: enrollment.to_string(),
            name: "Priya Sharma".to_string(),
            department: "Computer Science".to_string(),
            semester: 5,
        }
    }

    fn open_temp() -> (tempfile::TempDir, EventLog) {
        let dir = tempfile::tempdir().unwrap();
        let log = EventLog::open(&dir.path().join("events.jsonl")).unwrap();
        (dir, log)
    }

    #[test]
    fn test_toggled_action() {
        assert_eq!(ScanAction::Entry.toggled(), ScanAction::Exit);
        assert_eq!(ScanAction::Exit.toggled(), ScanAction::Entry);
    }

    #[test]
    fn test_action_wire_format() {
        assert_eq!(serde_json::to_string(&ScanAction::Entry).unwrap(), "\"ENTRY\"");
        assert_eq!(serde_json::to_string(&ScanAction::Exit).unwrap(), "\"EXIT\"");
        assert_eq!(ScanAction::Entry.as_str(), "ENTRY");
    }

    #[test]
    fn test_append_and_find_latest() {
        let (_dir, log) = open_temp();
        let s = student("EN2023001");

        log.append(LogEvent::new(&s, ScanAction::Entry, 1_000)).unwrap();
        log.append(LogEvent::new(&s, ScanAction::Exit, 2_000)).unwrap();

        let latest = log.find_latest("EN2023001").unwrap();
        assert_eq!(latest.action, ScanAction::Exit);
        assert_eq!(latest.timestamp, 2_000);
        assert!(log.find_latest("EN2023002").is_none());
    }

    #[test]
    fn test_latest_index_tracks_interleaved_students() {
        let (_dir, log) = open_temp();
        let a = student("EN2023001");
        let b = student("EN2023002");

        log.append(LogEvent::new(&a, ScanAction::Entry, 1_000)).unwrap();
        log.append(LogEvent::new(&b, ScanAction::Entry, 2_000)).unwrap();
        log.append(LogEvent::new(&a, ScanAction::Exit, 3_000)).unwrap();

        assert_eq!(log.find_latest("EN2023001").unwrap().timestamp, 3_000);
        assert_eq!(log.find_latest("EN2023002").unwrap().timestamp, 2_000);
    }

    #[test]
    fn test_events_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let s = student("EN2023001");

        {
            let log = EventLog::open(&path).unwrap();
            log.append(LogEvent::new(&s, ScanAction::Entry, 1_000)).unwrap();
            log.append(LogEvent::new(&s, ScanAction::Exit, 9_000)).unwrap();
        }

        let log = EventLog::open(&path).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.find_latest("EN2023001").unwrap().action, ScanAction::Exit);
    }

    #[test]
    fn test_open_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        std::fs::write(&path, "not an event\n").unwrap();

        let err = EventLog::open(&path).unwrap_err();
        assert!(matches!(err, Error::PersistenceError(_)));
    }

    #[test]
    fn test_query_filters_and_orders() {
        let (_dir, log) = open_temp();
        let a = student("EN2023001");
        let b = student("EN2023002");

        log.append(LogEvent::new(&a, ScanAction::Entry, 1_000)).unwrap();
        log.append(LogEvent::new(&b, ScanAction::Entry, 2_000)).unwrap();
        log.append(LogEvent::new(&a, ScanAction::Exit, 9_000)).unwrap();

        let all = log.query(&LogFilter::default());
        assert_eq!(all.len(), 3);
        // Newest first
        assert_eq!(all[0].timestamp, 9_000);

        let only_a = log.query(&LogFilter {
            enrollment_number: Some("EN2023001".into()),
            ..LogFilter::default()
        });
        assert_eq!(only_a.len(), 2);

        let exits = log.query(&LogFilter {
            action: Some(ScanAction::Exit),
            ..LogFilter::default()
        });
        assert_eq!(exits.len(), 1);

        let windowed = log.query(&LogFilter {
            start: Some(1_500),
            end: Some(8_000),
            ..LogFilter::default()
        });
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].timestamp, 2_000);
    }

    #[test]
    fn test_filter_normalization() {
        let filter = LogFilter {
            enrollment_number: Some(" en2023001 ".into()),
            ..LogFilter::default()
        }
        .normalized();
        assert_eq!(filter.enrollment_number.as_deref(), Some("EN2023001"));
    }

    #[test]
    fn test_list_pagination() {
        let (_dir, log) = open_temp();
        let s = student("EN2023001");
        for i in 0..5 {
            let action = if i % 2 == 0 { ScanAction::Entry } else { ScanAction::Exit };
            log.append(LogEvent::new(&s, action, i * 10_000)).unwrap();
        }

        let page = log.list(&LogFilter::default(), 1, 2);
        assert_eq!(page.logs.len(), 2);
        assert_eq!(page.total_logs, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.logs[0].timestamp, 40_000);

        let last = log.list(&LogFilter::default(), 3, 2);
        assert_eq!(last.logs.len(), 1);
        assert_eq!(last.logs[0].timestamp, 0);

        // Past the end
        let empty = log.list(&LogFilter::default(), 9, 2);
        assert!(empty.logs.is_empty());
    }

    #[test]
    fn test_clear_empties_store_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let log = EventLog::open(&path).unwrap();
        let s = student("EN2023001");
        log.append(LogEvent::new(&s, ScanAction::Entry, 1_000)).unwrap();

        log.clear().unwrap();
        assert!(log.is_empty());
        assert!(log.find_latest("EN2023001").is_none());

        // Reopen to confirm the file was truncated too
        drop(log);
        let log = EventLog::open(&path).unwrap();
        assert!(log.is_empty());
    }
}
