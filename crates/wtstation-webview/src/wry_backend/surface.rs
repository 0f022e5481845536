use std::cell::{Cell, Ref, RefCell};

use wry::{WebContext, WebView};
use wtstation_common::{Rect, SessionId, SurfaceError};

use super::handlers::push;
use super::EventSink;
use crate::bounds::to_wry_rect;
use crate::events::{SurfaceEvent, SurfaceEventKind};
use crate::surface::{Surface, SurfaceId};

/// A session surface backed by a child `wry::WebView`.
///
/// Destroying takes the webview out and drops it, which removes it from
/// the host window.
pub struct WrySurface {
    id: SurfaceId,
    session_id: SessionId,
    isolation_key: String,
    webview: RefCell<Option<WebView>>,
    /// Must outlive the webview on some platforms.
    context: RefCell<Option<WebContext>>,
    bounds: Cell<Option<Rect>>,
    events: EventSink<SurfaceEvent>,
}

impl WrySurface {
    pub(super) fn new(
        id: SurfaceId,
        session_id: SessionId,
        isolation_key: String,
        webview: WebView,
        context: WebContext,
        bounds: Rect,
        events: EventSink<SurfaceEvent>,
    ) -> Self {
        Self {
            id,
            session_id,
            isolation_key,
            webview: RefCell::new(Some(webview)),
            context: RefCell::new(Some(context)),
            bounds: Cell::new(Some(bounds)),
            events,
        }
    }

    fn webview(&self) -> Result<Ref<'_, WebView>, SurfaceError> {
        Ref::filter_map(self.webview.borrow(), Option::as_ref)
            .map_err(|_| SurfaceError::Destroyed(self.session_id.to_string()))
    }
}

impl Surface for WrySurface {
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
        self.webview.borrow().is_none()
    }

    fn bounds(&self) -> Option<Rect> {
        self.bounds.get()
    }

    fn set_bounds(&self, bounds: Rect) -> Result<(), SurfaceError> {
        self.webview()?
            .set_bounds(to_wry_rect(&bounds))
            .map_err(|e| SurfaceError::Compositor(e.to_string()))?;
        self.bounds.set(Some(bounds));
        Ok(())
    }

    fn set_visible(&self, visible: bool) -> Result<(), SurfaceError> {
        self.webview()?
            .set_visible(visible)
            .map_err(|e| SurfaceError::Compositor(e.to_string()))
    }

    fn evaluate_script(&self, js: &str) -> Result<(), SurfaceError> {
        self.webview()?
            .evaluate_script(js)
            .map_err(|e| SurfaceError::Script(e.to_string()))
    }

    fn probe(&self, js: &str) -> Result<(), SurfaceError> {
        let sink = self.events.clone();
        let session_id = self.session_id.clone();
        let surface_id = self.id;
        self.webview()?
            .evaluate_script_with_callback(js, move |raw| {
                let payload = serde_json::from_str::<Option<String>>(&raw)
                    .ok()
                    .flatten();
                push(
                    &sink,
                    SurfaceEvent {
                        session_id: session_id.clone(),
                        surface_id,
                        kind: SurfaceEventKind::ProbeResult(payload),
                    },
                );
            })
            .map_err(|e| SurfaceError::Script(e.to_string()))
    }

    fn destroy(&self) {
        let webview = self.webview.borrow_mut().take();
        drop(webview);
        self.context.borrow_mut().take();
    }
}
