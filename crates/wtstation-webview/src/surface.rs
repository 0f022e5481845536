//! The surface abstraction the session core is written against.
//!
//! A surface is one embedded web-content view bound to a session's
//! isolation key. The core never touches `wry` directly: it drives
//! surfaces through [`Surface`], creates them through [`SurfaceFactory`],
//! and inserts/evicts them through a [`Compositor`]. The production
//! implementations live in `wry_backend`; tests use recording fakes.

use std::fmt;
use std::rc::Rc;

use wtstation_common::{Rect, SessionId, SurfaceError, WorkspaceType};

use crate::services::ServiceProfile;

/// Runtime identity of one surface instance.
///
/// A recreated surface gets a fresh id even though it serves the same
/// session, so stale compositor bookkeeping can never alias a new handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surface#{}", self.0)
    }
}

/// Shared handle to a live surface. Single-threaded: surfaces are owned by
/// the event loop that owns the host window.
pub type SurfaceRef = Rc<dyn Surface>;

pub trait Surface {
    fn id(&self) -> SurfaceId;

    fn session_id(&self) -> &SessionId;

    fn isolation_key(&self) -> &str;

    /// True once the underlying view is gone, whoever tore it down.
    fn is_destroyed(&self) -> bool;

    /// Last bounds successfully applied.
    fn bounds(&self) -> Option<Rect>;

    fn set_bounds(&self, bounds: Rect) -> Result<(), SurfaceError>;

    fn set_visible(&self, visible: bool) -> Result<(), SurfaceError>;

    /// Fire-and-forget script evaluation.
    fn evaluate_script(&self, js: &str) -> Result<(), SurfaceError>;

    /// Evaluate a script whose result comes back later as a
    /// [`SurfaceEventKind::ProbeResult`](crate::events::SurfaceEventKind::ProbeResult).
    fn probe(&self, js: &str) -> Result<(), SurfaceError>;

    /// Tear the view down. Idempotent.
    fn destroy(&self);
}

/// Everything a factory needs to build a surface for one session.
#[derive(Debug, Clone)]
pub struct SurfaceSpec {
    pub session_id: SessionId,
    pub isolation_key: String,
    pub service: WorkspaceType,
    pub profile: ServiceProfile,
    /// Where the surface first appears; always the off-screen region.
    pub initial_bounds: Rect,
}

pub trait SurfaceFactory {
    fn create(&mut self, spec: &SurfaceSpec) -> Result<SurfaceRef, SurfaceError>;
}

/// The host window's compositing layer.
///
/// Tracks which surfaces are inserted. `attached` is a direct query and is
/// what the consistency check trusts, independent of any caller's own
/// bookkeeping.
pub trait Compositor {
    fn insert(&mut self, surface: &SurfaceRef) -> Result<(), SurfaceError>;

    /// Evict a surface. Evicting something that is not inserted is a no-op.
    fn remove(&mut self, id: SurfaceId) -> Result<(), SurfaceError>;

    fn attached(&self) -> Vec<SurfaceId>;

    fn attached_count(&self) -> usize {
        self.attached().len()
    }

    fn contains(&self, id: SurfaceId) -> bool {
        self.attached().contains(&id)
    }
}
