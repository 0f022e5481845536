//! The host window's compositing layer for child webviews.
//!
//! Child webviews are always parented to the host window, so "inserting"
//! means showing a surface and "evicting" means hiding it natively. The
//! member table holds weak handles: a surface dropped or destroyed
//! elsewhere simply stops counting as attached.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use tracing::debug;
use wtstation_common::SurfaceError;

use crate::surface::{Compositor, Surface, SurfaceId, SurfaceRef};

#[derive(Default)]
pub struct WindowCompositor {
    members: HashMap<SurfaceId, Weak<dyn Surface>>,
}

impl WindowCompositor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Compositor for WindowCompositor {
    fn insert(&mut self, surface: &SurfaceRef) -> Result<(), SurfaceError> {
        surface.set_visible(true)?;
        self.members.insert(surface.id(), Rc::downgrade(surface));
        Ok(())
    }

    fn remove(&mut self, id: SurfaceId) -> Result<(), SurfaceError> {
        let Some(member) = self.members.get(&id) else {
            return Ok(());
        };
        match member.upgrade() {
            Some(surface) if !surface.is_destroyed() => {
                surface.set_visible(false)?;
            }
            _ => debug!(surface = %id, "Evicting a surface that is already gone"),
        }
        self.members.remove(&id);
        Ok(())
    }

    fn attached(&self) -> Vec<SurfaceId> {
        let mut ids: Vec<SurfaceId> = self
            .members
            .iter()
            .filter(|(_, weak)| weak.upgrade().is_some_and(|s| !s.is_destroyed()))
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }
}
