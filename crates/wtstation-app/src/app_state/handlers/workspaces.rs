use serde_json::Value;
use wtstation_common::WorkspaceId;
use wtstation_store::{WorkspaceDraft, WorkspacePatch};

use super::store_err;
use crate::app_state::core::StationApp;
use crate::app_state::ipc_dispatch::{to_value, HandlerResult};
use crate::app_state::payload::{parse, string_arg};

impl StationApp {
    pub(in crate::app_state) fn handle_workspaces_list(&self) -> HandlerResult {
        Ok(to_value(self.store.list_workspaces()))
    }

    pub(in crate::app_state) fn handle_workspaces_add(&mut self, payload: &Value) -> HandlerResult {
        let draft: WorkspaceDraft = parse(payload)?;
        let workspace = self.store.add_workspace(draft).map_err(store_err)?;
        Ok(to_value(workspace))
    }

    pub(in crate::app_state) fn handle_workspaces_update(
        &mut self,
        payload: &Value,
    ) -> HandlerResult {
        let patch: WorkspacePatch = parse(payload)?;
        let workspace = self.store.update_workspace(patch).map_err(store_err)?;
        Ok(to_value(workspace))
    }

    /// Deleting a workspace takes its sessions, and their surfaces, with it.
    pub(in crate::app_state) fn handle_workspaces_delete(
        &mut self,
        payload: &Value,
    ) -> HandlerResult {
        let id = WorkspaceId::from(string_arg(payload, &["workspaceId", "id"])?);
        let result = self.store.delete_workspace(&id);
        self.release_orphaned_surfaces();
        let removed = result.map_err(store_err)?;
        Ok(to_value(removed))
    }
}
