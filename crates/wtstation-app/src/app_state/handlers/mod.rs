//! IPC handlers, grouped by the record or surface they act on.

mod library;
mod sessions;
mod settings;
mod window;
mod workspaces;


use wtstation_common::{SessionId, StoreError, SurfaceError};

use crate::app_state::core::StationApp;

fn store_err(e: StoreError) -> String {
    e.to_string()
}

fn no_window() -> String {
    SurfaceError::NoWindow.to_string()
}

impl StationApp {
    /// Destroy the surfaces of sessions the store no longer lists. Runs
    /// after every removal, whether or not the store write succeeded.
    pub(in crate::app_state) fn release_orphaned_surfaces(&mut self) {
        let Some(core) = &mut self.core else {
            return;
        };
        let orphans: Vec<SessionId> = core
            .registry
            .list_all()
            .into_iter()
            .map(|session| session.id)
            .filter(|id| self.store.session(id).is_none())
            .collect();
        for id in &orphans {
            core.coordinator.release_session(&mut core.registry, id);
        }
        if !orphans.is_empty() {
            tracing::debug!(count = orphans.len(), "Released orphaned surfaces");
        }
    }
}
