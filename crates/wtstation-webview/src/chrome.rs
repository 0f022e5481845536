//! The chrome webview: title bar, sidebar and settings UI.
//!
//! It covers the whole host window underneath the session surfaces, serves
//! its assets over the `wtstation://` protocol and talks to the shell
//! through the `window.wtstation` IPC bridge.

use std::sync::{Arc, Mutex};

use tracing::{debug, warn};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};
use wtstation_common::{Rect, SurfaceError, UiMode};

use crate::bounds::to_wry_rect;
use crate::content::{ContentProvider, CHROME_URL, PROTOCOL};
use crate::events::PageLoadState;
use crate::ipc::{js_dispatch_message, js_resolve, IpcResponse, IPC_INIT_SCRIPT};
use crate::monitor::{parse_reported_mode, ACTIVE_VIEW_QUERY};
use crate::wry_backend::{drain, EventSink};

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// The chrome may only show its own bundled pages.
pub const ALLOWED_NAV_PREFIXES: &[&str] = &[
    "wtstation://",
    // WebView2 rewrites custom protocols to http://<scheme>.localhost/
    "http://wtstation.localhost/",
    "about:blank",
];

pub fn is_navigation_allowed(url: &str) -> bool {
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChromeEvent {
    /// Raw JSON body posted by `window.wtstation`.
    Ipc(String),
    PageLoad(PageLoadState),
    /// Answer to [`ChromeView::query_active_view`].
    ActiveView(Option<UiMode>),
    /// A link the chrome tried to navigate to; it belongs in the browser.
    ExternalLink(String),
}

pub struct ChromeView {
    webview: WebView,
    events: EventSink<ChromeEvent>,
}

impl ChromeView {
    pub fn build<W: HasWindowHandle>(
        window: &W,
        bounds: Rect,
        content: ContentProvider,
        devtools: bool,
    ) -> Result<Self, SurfaceError> {
        let events: EventSink<ChromeEvent> = Arc::new(Mutex::new(Vec::new()));
        let content = Arc::new(content);

        let ipc_events = Arc::clone(&events);
        let load_events = Arc::clone(&events);
        let nav_events = Arc::clone(&events);

        let builder = WebViewBuilder::new()
            .with_bounds(to_wry_rect(&bounds))
            .with_devtools(devtools)
            .with_clipboard(true)
            .with_initialization_script(IPC_INIT_SCRIPT)
            .with_custom_protocol(PROTOCOL.to_string(), move |_wv_id, request| {
                content.respond(&request.uri().to_string())
            })
            .with_ipc_handler(move |request| {
                let body = request.body().to_string();
                if serde_json::from_str::<serde_json::Value>(&body).is_err() {
                    warn!(body_len = body.len(), "IPC message rejected: invalid JSON");
                    return;
                }
                push(&ipc_events, ChromeEvent::Ipc(body));
            })
            .with_on_page_load_handler(move |event, url| {
                let state = PageLoadState::from(event);
                debug!(?state, url = %url, "chrome page load");
                push(&load_events, ChromeEvent::PageLoad(state));
            })
            .with_navigation_handler(move |url| {
                if is_navigation_allowed(&url) {
                    return true;
                }
                if url.starts_with("https://") || url.starts_with("http://") {
                    push(&nav_events, ChromeEvent::ExternalLink(url));
                } else {
                    warn!(url = %url, "chrome navigation blocked");
                }
                false
            })
            .with_url(CHROME_URL);

        let webview = builder
            .build_as_child(window)
            .map_err(|e| SurfaceError::Creation(format!("chrome: {e}")))?;

        Ok(Self { webview, events })
    }

    pub fn drain_events(&self) -> Vec<ChromeEvent> {
        drain(&self.events)
    }

    pub fn set_bounds(&self, bounds: Rect) {
        if let Err(e) = self.webview.set_bounds(to_wry_rect(&bounds)) {
            warn!(error = %e, "failed to resize chrome");
        }
    }

    /// Push a `window.wtstation.on(kind, ...)` event to the UI.
    pub fn dispatch(&self, kind: &str, payload: &serde_json::Value) {
        self.eval(&js_dispatch_message(kind, payload));
    }

    /// Settle a pending `window.wtstation.invoke` promise.
    pub fn reply(&self, response: &IpcResponse) {
        self.eval(&js_resolve(response));
    }

    /// Ask the UI which view it is showing; the answer arrives as
    /// [`ChromeEvent::ActiveView`].
    pub fn query_active_view(&self) {
        let sink = Arc::clone(&self.events);
        let result = self
            .webview
            .evaluate_script_with_callback(ACTIVE_VIEW_QUERY, move |raw| {
                push(&sink, ChromeEvent::ActiveView(parse_reported_mode(&raw)));
            });
        if let Err(e) = result {
            warn!(error = %e, "active view query failed");
        }
    }

    fn eval(&self, js: &str) {
        if let Err(e) = self.webview.evaluate_script(js) {
            warn!(error = %e, "chrome script evaluation failed");
        }
    }
}

fn push(sink: &EventSink<ChromeEvent>, event: ChromeEvent) {
    if let Ok(mut events) = sink.lock() {
        events.push(event);
    }
}
