//! Graceful shutdown: evict and destroy surfaces, drop the chrome, flush
//! the store.

use super::core::StationApp;

// =============================================================================
// SHUTDOWN
// =============================================================================

impl StationApp {
    /// Perform graceful shutdown of all subsystems. Safe to call twice.
    ///
    /// Surfaces are destroyed before the window they are parented to; the
    /// store is flushed last.
    pub(super) fn shutdown(&mut self) {
        if let Some(mut core) = self.core.take() {
            tracing::info!(sessions = core.registry.len(), "Initiating graceful shutdown");
            core.coordinator.remove_all_views_from_window(&core.registry);
            core.coordinator.unbind_compositor();
            core.registry.destroy_all();
        }

        self.chrome = None;
        self.window = None;
        self.init_views_at = None;

        if let Err(e) = self.store.flush() {
            tracing::warn!(error = %e, "Failed to flush record store");
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::app_state::core::StationApp;
    use wtstation_config::StationConfig;
    use wtstation_store::{RecordStore, WorkspaceDraft};

    #[test]
    fn shutdown_on_fresh_app_does_not_panic() {
        let mut app = StationApp::new(StationConfig::default(), RecordStore::in_memory());
        app.schedule_initialize_views(Duration::from_millis(500));

        app.shutdown();

        assert!(app.core.is_none());
        assert!(app.chrome.is_none());
        assert!(app.window.is_none());
        assert!(app.init_views_at.is_none());
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut app = StationApp::new(StationConfig::default(), RecordStore::in_memory());
        app.shutdown();
        app.shutdown();
        assert!(app.core.is_none());
    }

    #[test]
    fn shutdown_leaves_the_store_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let mut store = RecordStore::open(&path).unwrap();
        store
            .add_workspace(WorkspaceDraft::new("Sales", Default::default()))
            .unwrap();

        let mut app = StationApp::new(StationConfig::default(), store);
        app.shutdown();

        let reopened = RecordStore::open(&path).unwrap();
        assert_eq!(reopened.list_workspaces().len(), 1);
    }
}
