//! The record-store interface the session core consumes.

use crate::id::{SessionId, WorkspaceId};
use crate::types::{Session, WorkspaceType};

/// Authoritative session/workspace metadata, local and synchronous.
///
/// The core rehydrates its registry from `list_sessions` after a restart and
/// asks `workspace_type` whenever it must (re)create a surface.
pub trait SessionDirectory {
    fn list_sessions(&self) -> Vec<Session>;

    /// Service type of a workspace; unknown workspaces resolve to the default.
    fn workspace_type(&self, workspace_id: &WorkspaceId) -> WorkspaceType;

    fn update_last_active(&mut self, session_id: &SessionId, at: i64);
}
