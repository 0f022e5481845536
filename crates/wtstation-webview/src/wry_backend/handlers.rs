use tracing::{debug, warn};
use wry::WebViewBuilder;
use wtstation_common::SessionId;

use super::EventSink;
use crate::events::{PageLoadState, SurfaceEvent, SurfaceEventKind};
use crate::surface::SurfaceId;

/// Schemes a session surface may navigate its main frame to.
const SURFACE_NAV_SCHEMES: &[&str] = &["https://", "http://", "about:", "blob:", "data:"];

pub(super) fn is_surface_navigation_allowed(url: &str) -> bool {
    SURFACE_NAV_SCHEMES.iter().any(|s| url.starts_with(s))
}

pub(super) fn push(sink: &EventSink<SurfaceEvent>, event: SurfaceEvent) {
    if let Ok(mut events) = sink.lock() {
        events.push(event);
    }
}

pub(super) fn attach_page_load_handler<'a>(
    builder: WebViewBuilder<'a>,
    sink: EventSink<SurfaceEvent>,
    session_id: SessionId,
    surface_id: SurfaceId,
) -> WebViewBuilder<'a> {
    builder.with_on_page_load_handler(move |event, url| {
        let state = PageLoadState::from(event);
        debug!(session_id = %session_id, ?state, url = %url, "page load");
        push(
            &sink,
            SurfaceEvent {
                session_id: session_id.clone(),
                surface_id,
                kind: SurfaceEventKind::PageLoad { state, url },
            },
        );
    })
}

pub(super) fn attach_navigation_handler<'a>(
    builder: WebViewBuilder<'a>,
    session_id: SessionId,
) -> WebViewBuilder<'a> {
    builder.with_navigation_handler(move |url| {
        let allowed = is_surface_navigation_allowed(&url);
        if !allowed {
            warn!(session_id = %session_id, url = %url, "navigation blocked");
        }
        allowed
    })
}

/// Popups are never opened inside the surface; the shell forwards them to
/// the system browser.
pub(super) fn attach_new_window_handler<'a>(
    builder: WebViewBuilder<'a>,
    sink: EventSink<SurfaceEvent>,
    session_id: SessionId,
    surface_id: SurfaceId,
) -> WebViewBuilder<'a> {
    builder.with_new_window_req_handler(move |url| {
        debug!(session_id = %session_id, url = %url, "new window request denied");
        push(
            &sink,
            SurfaceEvent {
                session_id: session_id.clone(),
                surface_id,
                kind: SurfaceEventKind::ExternalLink(url),
            },
        );
        false
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn web_navigation_allowed() {
        assert!(is_surface_navigation_allowed("https://web.whatsapp.com/"));
        assert!(is_surface_navigation_allowed("about:blank"));
        assert!(is_surface_navigation_allowed("blob:https://web.telegram.org/1"));
    }

    #[test]
    fn local_and_script_navigation_blocked() {
        assert!(!is_surface_navigation_allowed("file:///etc/passwd"));
        assert!(!is_surface_navigation_allowed("javascript:alert(1)"));
        assert!(!is_surface_navigation_allowed("wtstation://localhost/index.html"));
    }

    #[test]
    fn push_appends_event() {
        let sink: EventSink<SurfaceEvent> = Arc::new(Mutex::new(Vec::new()));
        push(
            &sink,
            SurfaceEvent {
                session_id: SessionId::from("s"),
                surface_id: SurfaceId(1),
                kind: SurfaceEventKind::ExternalLink("https://example.com".into()),
            },
        );
        assert_eq!(sink.lock().unwrap().len(), 1);
    }
}
