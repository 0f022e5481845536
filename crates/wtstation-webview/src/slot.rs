use crate::surface::SurfaceRef;

/// What the registry currently holds for a session.
///
/// Every consumer matches on this instead of keeping a raw reference,
/// because a surface can be destroyed outside the registry's control.
#[derive(Clone)]
pub enum SurfaceSlot {
    /// No surface has been created, or the session is unknown.
    Absent,
    Live(SurfaceRef),
    /// A surface existed but its view is gone; recreate before use.
    Destroyed,
}

impl SurfaceSlot {
    pub fn from_handle(handle: Option<&SurfaceRef>) -> Self {
        match handle {
            None => SurfaceSlot::Absent,
            Some(s) if s.is_destroyed() => SurfaceSlot::Destroyed,
            Some(s) => SurfaceSlot::Live(s.clone()),
        }
    }

    pub fn live(self) -> Option<SurfaceRef> {
        match self {
            SurfaceSlot::Live(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SurfaceSlot::Live(_))
    }
}

impl std::fmt::Debug for SurfaceSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceSlot::Absent => write!(f, "Absent"),
            SurfaceSlot::Live(s) => write!(f, "Live({})", s.id()),
            SurfaceSlot::Destroyed => write!(f, "Destroyed"),
        }
    }
}
