//! Visibility Coordinator.
//!
//! Keeps at most one session surface in the visible content region and
//! every other surface parked off-screen. Surfaces are never destroyed to
//! hide them: they are repositioned and, where needed, evicted from the
//! compositor, so switching back is a bounds change rather than a reload.
//!
//! Every operation re-derives what it needs from the registry and the
//! compositor instead of trusting earlier calls, so repeated or reordered
//! requests converge on the same state. Failures on one surface are logged
//! and never abort the rest of a batch.

use std::collections::BTreeSet;

use tracing::{debug, error, info, warn};
use wtstation_common::{now_millis, Rect, SessionDirectory, SessionId};

use crate::bounds::{BoundsCalculator, WindowSize};
use crate::registry::SessionRegistry;
use crate::slot::SurfaceSlot;
use crate::surface::{Compositor, SurfaceId, SurfaceRef};

pub struct VisibilityCoordinator {
    bounds: BoundsCalculator,
    /// `None` until the host window exists, and again after teardown.
    compositor: Option<Box<dyn Compositor>>,
    /// Surfaces this coordinator inserted into the compositor.
    attached: BTreeSet<SurfaceId>,
    active: Option<SessionId>,
    window: WindowSize,
    sidebar_collapsed: bool,
}

impl VisibilityCoordinator {
    pub fn new(bounds: BoundsCalculator) -> Self {
        Self {
            bounds,
            compositor: None,
            attached: BTreeSet::new(),
            active: None,
            window: WindowSize::new(1.0, 1.0),
            sidebar_collapsed: false,
        }
    }

    // =========================================================================
    // HOST WINDOW
    // =========================================================================

    pub fn bind_compositor(&mut self, compositor: Box<dyn Compositor>, window: WindowSize) {
        self.compositor = Some(compositor);
        self.window = window;
        self.attached.clear();
    }

    /// Drop the compositor, e.g. while the window is being torn down.
    pub fn unbind_compositor(&mut self) -> Option<Box<dyn Compositor>> {
        self.attached.clear();
        self.active = None;
        self.compositor.take()
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn active_session(&self) -> Option<&SessionId> {
        self.active.as_ref()
    }

    pub fn visible_region(&self) -> Rect {
        self.bounds.visible(self.window, self.sidebar_collapsed)
    }

    pub fn offscreen_region(&self) -> Rect {
        self.bounds.offscreen()
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.sidebar_collapsed
    }

    /// Surfaces the compositor reports as inserted, whoever inserted them.
    pub fn attached_count(&self) -> usize {
        self.compositor
            .as_ref()
            .map(|c| c.attached_count())
            .unwrap_or(0)
    }

    /// The coordinator's own bookkeeping of inserted surfaces.
    pub fn tracked(&self) -> Vec<SurfaceId> {
        self.attached.iter().copied().collect()
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Show `id`'s surface in the visible region and park every other one.
    ///
    /// Returns `false` when the session is unknown or its surface cannot be
    /// built; nothing else changes in that case.
    pub fn attach(
        &mut self,
        registry: &mut SessionRegistry,
        directory: &mut dyn SessionDirectory,
        id: &SessionId,
    ) -> bool {
        let Some(target) = self.resolve(registry, &*directory, id) else {
            return false;
        };
        self.prune_destroyed(registry);

        let visible = self.visible_region();
        let offscreen = self.offscreen_region();

        for other in registry.live_surfaces() {
            if other.session_id() == id {
                continue;
            }
            place(&other, offscreen);
            self.evict(other.id());
        }

        place(&target, visible);
        self.insert(&target);
        self.active = Some(id.clone());

        let at = now_millis();
        registry.touch(id, at);
        directory.update_last_active(id, at);

        info!(session_id = %id, surface = %target.id(), "Session attached");
        true
    }

    /// Park `id`'s surface off-screen without evicting or destroying it.
    pub fn detach(&mut self, registry: &SessionRegistry, id: &SessionId) {
        match registry.surface(id) {
            SurfaceSlot::Live(surface) => place(&surface, self.offscreen_region()),
            SurfaceSlot::Destroyed => debug!(session_id = %id, "Detach: surface already destroyed"),
            SurfaceSlot::Absent => debug!(session_id = %id, "Detach: no surface"),
        }
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        debug!(session_id = %id, "Session detached");
    }

    /// Park and evict every surface so a non-session view owns the content area.
    pub fn hide_all_views(&mut self, registry: &SessionRegistry) {
        self.prune_destroyed(registry);
        let offscreen = self.offscreen_region();
        for surface in registry.live_surfaces() {
            place(&surface, offscreen);
            self.evict(surface.id());
        }
        self.attached.clear();
        self.active = None;
        debug!("All views hidden");
    }

    /// [`hide_all_views`](Self::hide_all_views), then evict anything the
    /// compositor still reports, verifying and retrying once.
    ///
    /// Returns how many surfaces remain inserted (zero on success).
    pub fn remove_all_views_from_window(&mut self, registry: &SessionRegistry) -> usize {
        self.hide_all_views(registry);

        let Some(compositor) = self.compositor.as_mut() else {
            debug!("No host window; nothing to evict");
            return 0;
        };

        let stray = compositor.attached();
        if !stray.is_empty() {
            warn!(count = stray.len(), "Evicting surfaces attached outside bookkeeping");
            evict_all(&mut **compositor, &stray);
        }

        let remaining = compositor.attached();
        if !remaining.is_empty() {
            warn!(count = remaining.len(), "Eviction did not take effect; retrying");
            evict_all(&mut **compositor, &remaining);
        }

        let left = compositor.attached_count();
        if left > 0 {
            error!(count = left, "Surfaces still attached after retry");
        }
        left
    }

    /// Reassign bounds after a resize or sidebar toggle. Membership in the
    /// compositor is left as it is.
    pub fn update_view_bounds(&mut self, registry: &SessionRegistry) {
        let visible = self.visible_region();
        let offscreen = self.offscreen_region();
        for surface in registry.live_surfaces() {
            let rect = if self.active.as_ref() == Some(surface.session_id()) {
                visible
            } else {
                offscreen
            };
            place(&surface, rect);
        }
    }

    /// Make sure every stored session has a surface inserted in the
    /// compositor, parked unless it is the active one. Returns how many
    /// surfaces are in place.
    pub fn initialize_all_views(
        &mut self,
        registry: &mut SessionRegistry,
        directory: &dyn SessionDirectory,
    ) -> usize {
        self.prune_destroyed(registry);
        let visible = self.visible_region();
        let offscreen = self.offscreen_region();

        let mut ready = 0;
        for meta in directory.list_sessions() {
            let service = directory.workspace_type(&meta.workspace_id);
            let result = if registry.contains(&meta.id) {
                registry.recreate_if_needed(&meta.id, service)
            } else {
                registry.create_or_get_surface(&meta, service).map(Some)
            };
            let surface = match result {
                Ok(Some(surface)) => surface,
                Ok(None) => continue,
                Err(e) => {
                    warn!(session_id = %meta.id, error = %e, "Skipping session during initialization");
                    continue;
                }
            };

            let rect = if self.active.as_ref() == Some(&meta.id) {
                visible
            } else {
                offscreen
            };
            place(&surface, rect);
            self.insert(&surface);
            ready += 1;
        }

        info!(ready, attached = self.attached.len(), "Views initialized");
        ready
    }

    pub fn set_window_size(&mut self, registry: &SessionRegistry, size: WindowSize) {
        if self.window == size {
            return;
        }
        self.window = size;
        self.update_view_bounds(registry);
    }

    pub fn set_sidebar_collapsed(&mut self, registry: &SessionRegistry, collapsed: bool) {
        if self.sidebar_collapsed == collapsed {
            return;
        }
        self.sidebar_collapsed = collapsed;
        debug!(collapsed, "Sidebar toggled");
        self.update_view_bounds(registry);
    }

    /// Evict and destroy a session's surface when the session itself goes away.
    pub fn release_session(&mut self, registry: &mut SessionRegistry, id: &SessionId) {
        if let SurfaceSlot::Live(surface) = registry.surface(id) {
            place(&surface, self.offscreen_region());
            self.evict(surface.id());
        }
        if self.active.as_ref() == Some(id) {
            self.active = None;
        }
        registry.destroy(id);
        self.prune_destroyed(registry);
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Find or rebuild the surface for `id`, creating it from the directory
    /// when the registry has never seen the session.
    fn resolve(
        &self,
        registry: &mut SessionRegistry,
        directory: &dyn SessionDirectory,
        id: &SessionId,
    ) -> Option<SurfaceRef> {
        let known_service = registry
            .metadata(id)
            .map(|meta| directory.workspace_type(&meta.workspace_id));
        let result = match known_service {
            Some(service) => registry.recreate_if_needed(id, service),
            None => {
                let Some(meta) = directory.list_sessions().into_iter().find(|s| &s.id == id)
                else {
                    debug!(session_id = %id, "Unknown session; nothing to attach");
                    return None;
                };
                let service = directory.workspace_type(&meta.workspace_id);
                registry.create_or_get_surface(&meta, service).map(Some)
            }
        };
        match result {
            Ok(surface) => surface,
            Err(e) => {
                warn!(session_id = %id, error = %e, "Could not obtain surface");
                None
            }
        }
    }

    fn insert(&mut self, surface: &SurfaceRef) {
        let Some(compositor) = self.compositor.as_mut() else {
            debug!(session_id = %surface.session_id(), "No host window; surface not inserted");
            return;
        };
        if !compositor.contains(surface.id()) {
            if let Err(e) = compositor.insert(surface) {
                warn!(session_id = %surface.session_id(), error = %e, "Compositor insert failed");
                return;
            }
        }
        self.attached.insert(surface.id());
    }

    fn evict(&mut self, id: SurfaceId) {
        let tracked = self.attached.remove(&id);
        let Some(compositor) = self.compositor.as_mut() else {
            return;
        };
        if !tracked && !compositor.contains(id) {
            return;
        }
        if let Err(e) = compositor.remove(id) {
            warn!(surface = %id, error = %e, "Compositor remove failed");
        }
    }

    /// Forget bookkeeping for surfaces that are no longer live.
    fn prune_destroyed(&mut self, registry: &SessionRegistry) {
        let live: BTreeSet<SurfaceId> = registry.live_surfaces().iter().map(|s| s.id()).collect();
        let stale: Vec<SurfaceId> = self.attached.difference(&live).copied().collect();
        for id in stale {
            debug!(surface = %id, "Dropping destroyed surface from attached set");
            self.attached.remove(&id);
            if let Some(compositor) = self.compositor.as_mut() {
                if let Err(e) = compositor.remove(id) {
                    debug!(surface = %id, error = %e, "Stale surface already gone");
                }
            }
        }
    }
}

fn place(surface: &SurfaceRef, rect: Rect) {
    if let Err(e) = surface.set_bounds(rect) {
        warn!(
            session_id = %surface.session_id(),
            error = %e,
            "Failed to reposition surface"
        );
    }
}

fn evict_all(compositor: &mut dyn Compositor, ids: &[SurfaceId]) {
    for id in ids {
        if let Err(e) = compositor.remove(*id) {
            warn!(surface = %id, error = %e, "Compositor remove failed");
        }
    }
}
