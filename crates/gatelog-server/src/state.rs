//! Application state shared across handlers.

use std::sync::Arc;

use gatelog_core::{
    EventLog, GatelogConfig, Roster, ScanBroadcaster, ScanEngine,
};
use tracing::warn;

/// Shared application state.
///
/// Cheap to clone; all components live behind one [`Arc`].
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Alias used by handlers and routers.
pub type SharedState = AppState;

struct AppStateInner {
    config: GatelogConfig,
    roster: Arc<Roster>,
    event_log: Arc<EventLog>,
    broadcaster: ScanBroadcaster,
    engine: ScanEngine,
}

impl AppState {
    /// Build application state from configuration.
    ///
    /// Opens the event log (replaying any existing history) and loads the
    /// roster. A missing roster file is tolerated with a warning so a fresh
    /// deployment can come up before the roster is provisioned; every scan
    /// will resolve to not-found until it exists.
    pub fn new(config: GatelogConfig) -> gatelog_core::Result<Self> {
        let roster = if config.roster_path.exists() {
            Arc::new(Roster::load(&config.roster_path)?)
        } else {
            warn!(
                path = %config.roster_path.display(),
                "roster file not found, starting with an empty roster"
            );
            Arc::new(Roster::default())
        };

        let event_log = Arc::new(EventLog::open(&config.events_path())?);
        let broadcaster = ScanBroadcaster::new(config.channel_capacity);
        let engine = ScanEngine::new(
            Arc::clone(&roster),
            Arc::clone(&event_log),
            broadcaster.clone(),
            config.cooldown_ms,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                roster,
                event_log,
                broadcaster,
                engine,
            }),
        })
    }

    /// The loaded configuration.
    #[must_use]
    pub fn config(&self) -> &GatelogConfig {
        &self.inner.config
    }

    /// The student roster.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.inner.roster
    }

    /// The event log store.
    #[must_use]
    pub fn event_log(&self) -> &EventLog {
        &self.inner.event_log
    }

    /// The live broadcast hub.
    #[must_use]
    pub fn broadcaster(&self) -> &ScanBroadcaster {
        &self.inner.broadcaster
    }

    /// The scan decision engine.
    #[must_use]
    pub fn engine(&self) -> &ScanEngine {
        &self.inner.engine
    }
}
