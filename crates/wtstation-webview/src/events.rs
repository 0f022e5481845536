//! Events emitted by session surfaces and status changes derived from them.

use serde::Serialize;
use wtstation_common::{SessionId, SessionStatus};

use crate::surface::SurfaceId;

/// State of a page load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLoadState {
    Started,
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEventKind {
    PageLoad { state: PageLoadState, url: String },
    /// The page could not be loaded at all.
    LoadFailed { reason: String },
    /// Result of a [`Surface::probe`](crate::Surface::probe) call.
    ProbeResult(Option<String>),
    /// The page asked to open a new window; it was denied in place.
    ExternalLink(String),
}

/// An event tagged with the surface instance that produced it.
///
/// The surface id lets the registry drop events from a surface that has
/// since been replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceEvent {
    pub session_id: SessionId,
    pub surface_id: SurfaceId,
    pub kind: SurfaceEventKind,
}

/// A session status transition, for persistence and for the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub session_id: SessionId,
    pub status: SessionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

/// Error pages the engines substitute when navigation fails.
const ERROR_PAGE_PREFIXES: &[&str] = &["chrome-error://", "about:neterror", "about:certerror"];

pub fn is_error_page(url: &str) -> bool {
    ERROR_PAGE_PREFIXES.iter().any(|p| url.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_pages_detected() {
        assert!(is_error_page("chrome-error://chromewebdata/"));
        assert!(is_error_page("about:neterror?e=dnsNotFound"));
        assert!(!is_error_page("https://web.whatsapp.com/"));
        assert!(!is_error_page("about:blank"));
    }

    #[test]
    fn status_change_serializes_for_ui() {
        let change = StatusChange {
            session_id: SessionId::from("s1"),
            status: SessionStatus::QrPending,
            qr_code: Some("data:image/png;base64,AAA".into()),
        };
        let value = serde_json::to_value(&change).unwrap();
        assert_eq!(value["sessionId"], "s1");
        assert_eq!(value["status"], "qr-pending");
        assert_eq!(value["qrCode"], "data:image/png;base64,AAA");
    }
}
