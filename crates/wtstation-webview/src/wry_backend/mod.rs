//! `wry`-backed session surfaces.
//!
//! Each surface is a child webview of the host window with its own
//! [`wry::WebContext`] rooted in a per-isolation-key data directory, so
//! cookies and storage of one account never leak into another.

use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use tracing::debug;
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebContext, WebViewBuilder};
use wtstation_common::SurfaceError;
use wtstation_config::schema::SurfaceConfig;

use crate::bounds::to_wry_rect;
use crate::events::SurfaceEvent;
use crate::surface::{SurfaceFactory, SurfaceId, SurfaceRef, SurfaceSpec};

mod handlers;
mod surface;

pub use surface::WrySurface;

/// Queue shared between webview callbacks and the event loop.
pub type EventSink<T> = Arc<Mutex<Vec<T>>>;

pub fn drain<T>(sink: &EventSink<T>) -> Vec<T> {
    match sink.lock() {
        Ok(mut events) => std::mem::take(&mut *events),
        Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    }
}

pub struct WrySurfaceFactory {
    parent: Rc<dyn HasWindowHandle>,
    user_agent: String,
    devtools: bool,
    data_root: PathBuf,
    events: EventSink<SurfaceEvent>,
    next_id: u64,
}

impl WrySurfaceFactory {
    /// `data_root` holds one profile directory per isolation key.
    pub fn new(parent: Rc<dyn HasWindowHandle>, config: &SurfaceConfig, data_root: &Path) -> Self {
        Self {
            parent,
            user_agent: config.user_agent.clone(),
            devtools: config.devtools,
            data_root: data_root.to_path_buf(),
            events: Arc::new(Mutex::new(Vec::new())),
            next_id: 0,
        }
    }

    /// The sink surface events are pushed to.
    pub fn events(&self) -> EventSink<SurfaceEvent> {
        Arc::clone(&self.events)
    }
}

impl SurfaceFactory for WrySurfaceFactory {
    fn create(&mut self, spec: &SurfaceSpec) -> Result<SurfaceRef, SurfaceError> {
        self.next_id += 1;
        let id = SurfaceId(self.next_id);

        let data_dir = self.data_root.join(profile_dir_name(&spec.isolation_key));
        std::fs::create_dir_all(&data_dir).map_err(|e| {
            SurfaceError::Creation(format!("profile dir {}: {e}", data_dir.display()))
        })?;
        let mut context = WebContext::new(Some(data_dir));

        let mut builder = WebViewBuilder::with_web_context(&mut context)
            .with_bounds(to_wry_rect(&spec.initial_bounds))
            .with_user_agent(&self.user_agent)
            .with_devtools(self.devtools)
            .with_clipboard(true)
            .with_autoplay(true)
            .with_focused(false)
            .with_url(spec.profile.url.as_str());

        builder = handlers::attach_page_load_handler(
            builder,
            Arc::clone(&self.events),
            spec.session_id.clone(),
            id,
        );
        builder = handlers::attach_navigation_handler(builder, spec.session_id.clone());
        builder = handlers::attach_new_window_handler(
            builder,
            Arc::clone(&self.events),
            spec.session_id.clone(),
            id,
        );

        let webview = builder
            .build_as_child(&self.parent)
            .map_err(|e| SurfaceError::Creation(e.to_string()))?;

        debug!(session_id = %spec.session_id, surface = %id, url = %spec.profile.url, "WebView created");

        Ok(Rc::new(WrySurface::new(
            id,
            spec.session_id.clone(),
            spec.isolation_key.clone(),
            webview,
            context,
            spec.initial_bounds,
            Arc::clone(&self.events),
        )))
    }
}

/// Filesystem-safe directory name for an isolation key.
fn profile_dir_name(isolation_key: &str) -> String {
    isolation_key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
