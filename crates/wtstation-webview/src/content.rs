//! Bundled chrome assets served over the `wtstation://` custom protocol.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;
use wry::http::{header, HeaderValue, Response, StatusCode};

pub const PROTOCOL: &str = "wtstation";

/// Entry point of the chrome UI.
pub const CHROME_URL: &str = "wtstation://localhost/index.html";

/// Served for `index.html` when the assets directory has none.
pub const FALLBACK_INDEX: &str = r#"<!doctype html>
<html>
<head><meta charset="utf-8"><title>WT Station</title>
<style>
  body { margin: 0; font-family: system-ui, sans-serif; background: #111b21; color: #e9edef; }
  .bar { height: 40px; display: flex; align-items: center; padding: 0 12px; -webkit-app-region: drag; }
  .msg { padding: 24px; color: #8696a0; }
</style>
</head>
<body>
  <div class="bar">WT Station</div>
  <div class="msg">The interface assets were not found next to the executable.</div>
  <script>window.__wtstationActiveView = null;</script>
</body>
</html>
"#;

/// File extensions the chrome ships, and their MIME types.
const MIME_TYPES: &[(&str, &str)] = &[
    ("html", "text/html"),
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("svg", "image/svg+xml"),
    ("png", "image/png"),
    ("ico", "image/x-icon"),
    ("woff2", "font/woff2"),
];

/// Serves files from the chrome assets directory.
pub struct ContentProvider {
    root: PathBuf,
    serve_fallback: bool,
}

impl ContentProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            serve_fallback: false,
        }
    }

    /// Like [`ContentProvider::new`], but answers `index.html` with
    /// [`FALLBACK_INDEX`] when the directory has none.
    pub fn with_fallback(root: impl Into<PathBuf>) -> Self {
        let mut provider = Self::new(root);
        if provider.read_file("index.html").is_none() {
            warn!(
                root = %provider.root.display(),
                "Chrome assets missing; serving fallback page"
            );
            provider.serve_fallback = true;
        }
        provider
    }

    /// MIME type and bytes for a request path, query and fragment ignored.
    pub fn resolve(&self, path: &str) -> Option<(&'static str, Cow<'static, [u8]>)> {
        let path = path.trim_start_matches('/');
        let path = path.split(['?', '#']).next().unwrap_or_default();

        if self.serve_fallback && path == "index.html" {
            return Some(("text/html", Cow::Borrowed(FALLBACK_INDEX.as_bytes())));
        }
        self.read_file(path)
            .map(|data| (mime_for(Path::new(path)), Cow::Owned(data)))
    }

    /// Reads `path` only if it canonicalizes to a file inside the root.
    fn read_file(&self, path: &str) -> Option<Vec<u8>> {
        let root = fs::canonicalize(&self.root).ok()?;
        let file = fs::canonicalize(self.root.join(path)).ok()?;
        if file.starts_with(&root) && file.is_file() {
            fs::read(file).ok()
        } else {
            None
        }
    }

    /// Custom-protocol response for a request URI.
    pub fn respond(&self, uri: &str) -> Response<Cow<'static, [u8]>> {
        let path = strip_protocol(uri);
        let Some((mime, body)) = self.resolve(path) else {
            warn!(path = %path, "Chrome asset not found");
            let mut response = Response::new(Cow::Borrowed(&b"Not Found"[..]));
            *response.status_mut() = StatusCode::NOT_FOUND;
            return response;
        };

        let mut response = Response::new(body);
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(mime));
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("wtstation://localhost"),
        );
        response
    }
}

/// Strip the scheme and host in any of the forms the engines produce,
/// including WebView2's `http://wtstation.localhost/` rewrite.
fn strip_protocol(uri: &str) -> &str {
    [
        "wtstation://localhost/",
        "wtstation://localhost",
        "http://wtstation.localhost/",
        "https://wtstation.localhost/",
        "wtstation:///",
        "wtstation://",
    ]
    .iter()
    .find_map(|prefix| uri.strip_prefix(prefix))
    .unwrap_or("")
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    MIME_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
        .unwrap_or("application/octet-stream")
}
