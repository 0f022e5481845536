//! Recording fakes for the surface traits.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashSet};
use std::rc::Rc;

use wtstation_common::{Rect, Session, SessionId, SessionStatus, SurfaceError, WorkspaceId};

use crate::surface::{Compositor, Surface, SurfaceFactory, SurfaceId, SurfaceRef, SurfaceSpec};

pub struct FakeSurface {
    pub id: SurfaceId,
    pub session_id: SessionId,
    pub isolation_key: String,
    pub url: String,
    pub destroyed: Cell<bool>,
    pub bounds: Cell<Option<Rect>>,
    pub visible: Cell<bool>,
    pub fail_bounds: Cell<bool>,
    pub scripts: RefCell<Vec<String>>,
    pub probes: RefCell<Vec<String>>,
}

impl Surface for FakeSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    fn isolation_key(&self) -> &str {
        &self.isolation_key
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed.get()
    }

    fn bounds(&self) -> Option<Rect> {
        self.bounds.get()
    }

    fn set_bounds(&self, bounds: Rect) -> Result<(), SurfaceError> {
        if self.destroyed.get() {
            return Err(SurfaceError::Destroyed(self.session_id.to_string()));
        }
        if self.fail_bounds.get() {
            return Err(SurfaceError::Compositor("set_bounds failed".into()));
        }
        self.bounds.set(Some(bounds));
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> Result<(), SurfaceError> {
        if self.destroyed.get() {
            return Err(SurfaceError::Destroyed(self.session_id.to_string()));
        }
        self.visible.set(visible);
        Ok(())
    }

    fn evaluate_script(&self, js: &str) -> Result<(), SurfaceError> {
        self.scripts.borrow_mut().push(js.to_string());
        Ok(())
    }

    fn probe(&self, js: &str) -> Result<(), SurfaceError> {
        self.probes.borrow_mut().push(js.to_string());
        Ok(())
    }

    fn destroy(&self) {
        self.destroyed.set(true);
    }
}

/// Creates [`FakeSurface`]s and remembers every one it made.
#[derive(Clone, Default)]
pub struct FakeFactory {
    pub created: Rc<RefCell<Vec<Rc<FakeSurface>>>>,
    pub fail: Rc<Cell<bool>>,
    next_id: Rc<Cell<u64>>,
}

impl FakeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent surface built for `session`.
    pub fn latest(&self, session: &SessionId) -> Option<Rc<FakeSurface>> {
        self.created
            .borrow()
            .iter()
            .rev()
            .find(|s| &s.session_id == session)
            .cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.borrow().len()
    }
}

impl SurfaceFactory for FakeFactory {
    fn create(&mut self, spec: &SurfaceSpec) -> Result<SurfaceRef, SurfaceError> {
        if self.fail.get() {
            return Err(SurfaceError::Creation("factory offline".into()));
        }
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let surface = Rc::new(FakeSurface {
            id: SurfaceId(id),
            session_id: spec.session_id.clone(),
            isolation_key: spec.isolation_key.clone(),
            url: spec.profile.url.clone(),
            destroyed: Cell::new(false),
            bounds: Cell::new(Some(spec.initial_bounds)),
            visible: Cell::new(false),
            fail_bounds: Cell::new(false),
            scripts: RefCell::new(Vec::new()),
            probes: RefCell::new(Vec::new()),
        });
        self.created.borrow_mut().push(surface.clone());
        Ok(surface)
    }
}

#[derive(Default)]
pub struct CompositorState {
    pub members: BTreeSet<SurfaceId>,
    /// Surfaces whose removal raises an error.
    pub failing: HashSet<SurfaceId>,
    /// Number of upcoming `remove` calls that report success but leave the
    /// surface inserted.
    pub ineffective_removes: u32,
    pub inserts: u32,
    pub removes: u32,
}

/// A compositor whose state tests can inspect and tamper with.
#[derive(Clone, Default)]
pub struct FakeCompositor {
    pub state: Rc<RefCell<CompositorState>>,
}

impl FakeCompositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a surface behind the coordinator's back.
    pub fn insert_untracked(&self, id: SurfaceId) {
        self.state.borrow_mut().members.insert(id);
    }

    pub fn members(&self) -> Vec<SurfaceId> {
        self.state.borrow().members.iter().copied().collect()
    }
}

impl Compositor for FakeCompositor {
    fn insert(&mut self, surface: &SurfaceRef) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        state.inserts += 1;
        state.members.insert(surface.id());
        Ok(())
    }

    fn remove(&mut self, id: SurfaceId) -> Result<(), SurfaceError> {
        let mut state = self.state.borrow_mut();
        state.removes += 1;
        if state.failing.contains(&id) {
            return Err(SurfaceError::Compositor(format!("{id} refused removal")));
        }
        if state.ineffective_removes > 0 {
            state.ineffective_removes -= 1;
            return Ok(());
        }
        state.members.remove(&id);
        Ok(())
    }

    fn attached(&self) -> Vec<SurfaceId> {
        self.members()
    }
}

/// Session metadata as the record store would hand it out.
pub fn session(id: &str, workspace: &str) -> Session {
    Session {
        id: SessionId::from(id),
        workspace_id: WorkspaceId::from(workspace),
        name: id.to_uppercase(),
        partition: format!("persist:wa-{workspace}-{id}"),
        status: SessionStatus::Disconnected,
        qr_code: None,
        unread_count: 0,
        last_active_at: 0,
        created_at: 0,
    }
}

/// In-memory stand-in for the record store.
#[derive(Default)]
pub struct FakeDirectory {
    pub sessions: Vec<Session>,
    pub types: std::collections::HashMap<WorkspaceId, wtstation_common::WorkspaceType>,
    pub touched: Vec<SessionId>,
}

impl FakeDirectory {
    pub fn with_sessions(ids: &[&str]) -> Self {
        Self {
            sessions: ids.iter().map(|id| session(id, "w1")).collect(),
            ..Default::default()
        }
    }
}

impl wtstation_common::SessionDirectory for FakeDirectory {
    fn list_sessions(&self) -> Vec<Session> {
        self.sessions.clone()
    }

    fn workspace_type(&self, workspace_id: &WorkspaceId) -> wtstation_common::WorkspaceType {
        self.types.get(workspace_id).copied().unwrap_or_default()
    }

    fn update_last_active(&mut self, session_id: &SessionId, _at: i64) {
        self.touched.push(session_id.clone());
    }
}
