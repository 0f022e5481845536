//! StationApp struct definition and constructor.

use std::rc::Rc;
use std::time::{Duration, Instant};

use winit::window::Window;

use wtstation_config::StationConfig;
use wtstation_store::RecordStore;
use wtstation_webview::{
    ChromeView, ConsistencyMonitor, EventSink, SessionRegistry, SurfaceEvent,
    VisibilityCoordinator,
};

/// Session registry and visibility coordinator, built once the host window
/// exists and torn down at shutdown.
pub(super) struct SessionCore {
    pub(super) registry: SessionRegistry,
    pub(super) coordinator: VisibilityCoordinator,
    pub(super) surface_events: EventSink<SurfaceEvent>,
}

/// Top-level application state.
pub struct StationApp {
    pub(super) config: StationConfig,
    pub(super) store: RecordStore,

    // Windowing
    pub(super) window: Option<Rc<Window>>,
    pub(super) chrome: Option<ChromeView>,

    // Sessions
    pub(super) core: Option<SessionCore>,
    pub(super) monitor: ConsistencyMonitor,
    /// Pending `initialize_all_views`.
    pub(super) init_views_at: Option<Instant>,

    pub(super) should_exit: bool,
    pub(super) last_poll: Instant,
}

impl StationApp {
    pub fn new(config: StationConfig, store: RecordStore) -> Self {
        let monitor = ConsistencyMonitor::from_config(&config.consistency);
        Self {
            config,
            store,
            window: None,
            chrome: None,
            core: None,
            monitor,
            init_views_at: None,
            should_exit: false,
            last_poll: Instant::now(),
        }
    }

    /// Run `initialize_all_views` after `delay`, keeping an earlier
    /// pending run if there is one.
    pub(super) fn schedule_initialize_views(&mut self, delay: Duration) {
        let at = Instant::now() + delay;
        self.init_views_at = Some(match self.init_views_at {
            Some(pending) => pending.min(at),
            None => at,
        });
    }

    /// Push an event to the chrome, if it exists.
    pub(super) fn notify_chrome(&self, kind: &str, payload: &serde_json::Value) {
        if let Some(chrome) = &self.chrome {
            chrome.dispatch(kind, payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_initialization_wins() {
        let mut app = StationApp::new(StationConfig::default(), RecordStore::in_memory());
        app.schedule_initialize_views(Duration::from_secs(10));
        let first = app.init_views_at.unwrap();
        app.schedule_initialize_views(Duration::from_secs(60));
        assert_eq!(app.init_views_at, Some(first));
        app.schedule_initialize_views(Duration::ZERO);
        assert!(app.init_views_at.unwrap() < first);
    }

    #[test]
    fn fresh_app_has_no_window_or_core() {
        let app = StationApp::new(StationConfig::default(), RecordStore::in_memory());
        assert!(app.window.is_none());
        assert!(app.chrome.is_none());
        assert!(app.core.is_none());
        assert!(!app.should_exit);
    }
}
