//! Session Registry: session id -> (surface handle, session metadata).
//!
//! The registry is the only owner of surface handles. Other components
//! borrow them through [`SurfaceSlot`] and ask the registry to create or
//! recreate; only [`SessionRegistry::destroy`] tears a surface down.

use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};
use wtstation_common::{
    Rect, Session, SessionId, SessionStatus, SurfaceError, WorkspaceId, WorkspaceType,
};

use crate::events::{is_error_page, PageLoadState, StatusChange, SurfaceEvent, SurfaceEventKind};
use crate::services::{css_injection_script, ServiceCatalog, QR_PROBE_DELAY, QR_REPROBE_INTERVAL};
use crate::slot::SurfaceSlot;
use crate::surface::{SurfaceFactory, SurfaceRef, SurfaceSpec};

struct Entry {
    meta: Session,
    service: WorkspaceType,
    surface: Option<SurfaceRef>,
    next_probe: Option<Instant>,
}

pub struct SessionRegistry {
    factory: Box<dyn SurfaceFactory>,
    catalog: ServiceCatalog,
    /// Where freshly built surfaces are placed until the coordinator moves them.
    park_at: Rect,
    entries: HashMap<SessionId, Entry>,
    changes: Vec<StatusChange>,
}

impl SessionRegistry {
    pub fn new(factory: Box<dyn SurfaceFactory>, catalog: ServiceCatalog, park_at: Rect) -> Self {
        Self {
            factory,
            catalog,
            park_at,
            entries: HashMap::new(),
            changes: Vec::new(),
        }
    }

    // =========================================================================
    // SURFACE LIFECYCLE
    // =========================================================================

    /// Return the live surface for `meta.id`, creating it if needed.
    ///
    /// An existing live surface is returned untouched: no reload, no status
    /// reset. A new surface starts in `connecting`. Fails if another session
    /// already holds the same isolation key.
    pub fn create_or_get_surface(
        &mut self,
        meta: &Session,
        service: WorkspaceType,
    ) -> Result<SurfaceRef, SurfaceError> {
        if let Some(entry) = self.entries.get(&meta.id) {
            if let SurfaceSlot::Live(surface) = SurfaceSlot::from_handle(entry.surface.as_ref()) {
                return Ok(surface);
            }
        }

        if let Some(owner) = self
            .entries
            .values()
            .find(|e| e.meta.id != meta.id && e.meta.partition == meta.partition)
        {
            return Err(SurfaceError::IsolationKeyInUse {
                key: meta.partition.clone(),
                owner: owner.meta.id.to_string(),
            });
        }

        let entry = self.entries.entry(meta.id.clone()).or_insert_with(|| Entry {
            meta: meta.clone(),
            service,
            surface: None,
            next_probe: None,
        });
        if entry.meta.partition != meta.partition {
            warn!(
                session_id = %meta.id,
                kept = %entry.meta.partition,
                "Ignoring isolation key change for existing session"
            );
        }
        entry.service = service;

        let spec = SurfaceSpec {
            session_id: entry.meta.id.clone(),
            isolation_key: entry.meta.partition.clone(),
            service,
            profile: self.catalog.profile(service),
            initial_bounds: self.park_at,
        };

        match self.factory.create(&spec) {
            Ok(surface) => {
                info!(
                    session_id = %spec.session_id,
                    surface = %surface.id(),
                    ?service,
                    "Surface created"
                );
                entry.surface = Some(surface.clone());
                entry.next_probe = None;
                transition(entry, &mut self.changes, SessionStatus::Connecting, None);
                Ok(surface)
            }
            Err(e) => {
                warn!(session_id = %spec.session_id, error = %e, "Surface creation failed");
                entry.surface = None;
                transition(entry, &mut self.changes, SessionStatus::Disconnected, None);
                Err(e)
            }
        }
    }

    /// Tear down the surface and forget the session. Unknown ids are a no-op.
    pub fn destroy(&mut self, id: &SessionId) -> bool {
        let Some(entry) = self.entries.remove(id) else {
            debug!(session_id = %id, "Destroy requested for unknown session");
            return false;
        };
        if let Some(surface) = entry.surface {
            if !surface.is_destroyed() {
                surface.destroy();
            }
        }
        info!(session_id = %id, "Session surface destroyed");
        true
    }

    /// Return a usable surface, rebuilding it from stored metadata when the
    /// previous one was destroyed. `Ok(None)` means the session is unknown.
    pub fn recreate_if_needed(
        &mut self,
        id: &SessionId,
        service: WorkspaceType,
    ) -> Result<Option<SurfaceRef>, SurfaceError> {
        let Some(entry) = self.entries.get_mut(id) else {
            debug!(session_id = %id, "Cannot recreate: no metadata");
            return Ok(None);
        };

        match SurfaceSlot::from_handle(entry.surface.as_ref()) {
            SurfaceSlot::Live(surface) => return Ok(Some(surface)),
            SurfaceSlot::Destroyed => {
                info!(session_id = %id, "Surface was destroyed; recreating");
                entry.surface = None;
            }
            SurfaceSlot::Absent => {}
        }

        let meta = entry.meta.clone();
        self.create_or_get_surface(&meta, service).map(Some)
    }

    /// Destroy every surface, keeping no metadata. Used at shutdown.
    pub fn destroy_all(&mut self) {
        for id in self.session_ids() {
            self.destroy(&id);
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn surface(&self, id: &SessionId) -> SurfaceSlot {
        self.entries
            .get(id)
            .map(|e| SurfaceSlot::from_handle(e.surface.as_ref()))
            .unwrap_or(SurfaceSlot::Absent)
    }

    pub fn metadata(&self, id: &SessionId) -> Option<&Session> {
        self.entries.get(id).map(|e| &e.meta)
    }

    /// All sessions, oldest first.
    pub fn list_all(&self) -> Vec<Session> {
        let mut list: Vec<Session> = self.entries.values().map(|e| e.meta.clone()).collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        list
    }

    pub fn list_by_workspace(&self, workspace_id: &WorkspaceId) -> Vec<Session> {
        self.list_all()
            .into_iter()
            .filter(|s| &s.workspace_id == workspace_id)
            .collect()
    }

    /// Known session ids in a stable order.
    pub fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<SessionId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Every surface that is currently alive.
    pub fn live_surfaces(&self) -> Vec<SurfaceRef> {
        self.session_ids()
            .iter()
            .filter_map(|id| self.surface(id).live())
            .collect()
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    pub fn set_status(&mut self, id: &SessionId, status: SessionStatus, qr_code: Option<String>) {
        if let Some(entry) = self.entries.get_mut(id) {
            transition(entry, &mut self.changes, status, qr_code);
        }
    }

    pub fn touch(&mut self, id: &SessionId, at: i64) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.meta.last_active_at = at;
        }
    }

    /// Status transitions since the last drain.
    pub fn drain_changes(&mut self) -> Vec<StatusChange> {
        std::mem::take(&mut self.changes)
    }

    /// Fold a surface event into session status.
    ///
    /// Events from a surface that has since been replaced are dropped.
    pub fn handle_event(&mut self, event: SurfaceEvent, now: Instant) {
        let Some(entry) = self.entries.get_mut(&event.session_id) else {
            debug!(session_id = %event.session_id, "Event for unknown session dropped");
            return;
        };
        let Some(surface) = entry
            .surface
            .as_ref()
            .filter(|s| s.id() == event.surface_id)
            .cloned()
        else {
            debug!(
                session_id = %event.session_id,
                surface = %event.surface_id,
                "Event from replaced surface dropped"
            );
            return;
        };

        match event.kind {
            SurfaceEventKind::PageLoad {
                state: PageLoadState::Started,
                url,
            } => {
                debug!(session_id = %event.session_id, url = %url, "Page load started");
            }
            SurfaceEventKind::PageLoad { url, .. } if is_error_page(&url) => {
                warn!(session_id = %event.session_id, url = %url, "Surface landed on an error page");
                entry.next_probe = None;
                transition(entry, &mut self.changes, SessionStatus::Disconnected, None);
            }
            SurfaceEventKind::PageLoad { url, .. } => {
                debug!(session_id = %event.session_id, url = %url, "Page load finished");
                transition(entry, &mut self.changes, SessionStatus::Connected, None);

                let profile = self.catalog.profile(entry.service);
                if let Some(css) = profile.cosmetic_css {
                    if let Err(e) = surface.evaluate_script(&css_injection_script(css)) {
                        warn!(session_id = %event.session_id, error = %e, "Failed to inject CSS");
                    }
                }
                entry.next_probe = profile.qr_probe.map(|_| now + QR_PROBE_DELAY);
            }
            SurfaceEventKind::LoadFailed { reason } => {
                warn!(session_id = %event.session_id, reason = %reason, "Surface failed to load");
                entry.next_probe = None;
                transition(entry, &mut self.changes, SessionStatus::Disconnected, None);
            }
            SurfaceEventKind::ProbeResult(Some(payload)) if !payload.is_empty() => {
                entry.next_probe = Some(now + QR_REPROBE_INTERVAL);
                transition(entry, &mut self.changes, SessionStatus::QrPending, Some(payload));
            }
            SurfaceEventKind::ProbeResult(_) => {
                entry.next_probe = None;
                if entry.meta.status == SessionStatus::QrPending {
                    transition(entry, &mut self.changes, SessionStatus::Connected, None);
                }
            }
            SurfaceEventKind::ExternalLink(url) => {
                debug!(session_id = %event.session_id, url = %url, "External link requested");
            }
        }
    }

    /// Run QR probes whose deadline has passed. Returns how many ran.
    pub fn poll_probes(&mut self, now: Instant) -> usize {
        let mut ran = 0;
        for entry in self.entries.values_mut() {
            if !entry.next_probe.is_some_and(|at| at <= now) {
                continue;
            }
            entry.next_probe = None;

            let Some(surface) = SurfaceSlot::from_handle(entry.surface.as_ref()).live() else {
                continue;
            };
            let Some(script) = self.catalog.profile(entry.service).qr_probe else {
                continue;
            };
            match surface.probe(script) {
                Ok(()) => ran += 1,
                Err(e) => warn!(session_id = %entry.meta.id, error = %e, "QR probe failed"),
            }
        }
        ran
    }
}

fn transition(
    entry: &mut Entry,
    changes: &mut Vec<StatusChange>,
    status: SessionStatus,
    qr_code: Option<String>,
) {
    let qr_code = match status {
        SessionStatus::QrPending => qr_code,
        _ => None,
    };
    if entry.meta.status == status && entry.meta.qr_code == qr_code {
        return;
    }
    entry.meta.status = status;
    entry.meta.qr_code = qr_code.clone();
    debug!(session_id = %entry.meta.id, ?status, "Session status changed");
    changes.push(StatusChange {
        session_id: entry.meta.id.clone(),
        status,
        qr_code,
    });
}

#[cfg(test)]
mod tests;
