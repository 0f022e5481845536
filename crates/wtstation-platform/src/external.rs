use tracing::info;
use wtstation_common::PlatformError;

const OPENABLE_SCHEMES: &[&str] = &["https://", "http://", "mailto:"];

/// Whether `url` may be handed to the system browser.
pub fn is_openable(url: &str) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    OPENABLE_SCHEMES.iter().any(|s| lower.starts_with(s))
}

/// Open a link from an embedded page in the user's default browser.
///
/// Only web and mail links are forwarded; anything else (`file:`,
/// `javascript:`, custom schemes) is refused.
pub fn open_external(url: &str) -> Result<(), PlatformError> {
    if !is_openable(url) {
        return Err(PlatformError::NotSupported(format!(
            "refusing to open non-web link: {url}"
        )));
    }
    spawn_opener(url)?;
    info!(url = %url, "opened link in system browser");
    Ok(())
}

#[cfg(target_os = "macos")]
fn spawn_opener(url: &str) -> Result<(), PlatformError> {
    std::process::Command::new("open")
        .arg(url)
        .spawn()
        .map(|_| ())
        .map_err(|e| PlatformError::PathError(format!("failed to run open: {e}")))
}

#[cfg(target_os = "windows")]
fn spawn_opener(url: &str) -> Result<(), PlatformError> {
    std::process::Command::new("rundll32")
        .arg("url.dll,FileProtocolHandler")
        .arg(url)
        .spawn()
        .map(|_| ())
        .map_err(|e| PlatformError::PathError(format!("failed to run rundll32: {e}")))
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn spawn_opener(url: &str) -> Result<(), PlatformError> {
    std::process::Command::new("xdg-open")
        .arg(url)
        .spawn()
        .map(|_| ())
        .map_err(|e| PlatformError::PathError(format!("failed to run xdg-open: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_links_are_openable() {
        assert!(is_openable("https://faq.whatsapp.com/"));
        assert!(is_openable("HTTP://example.com"));
        assert!(is_openable("mailto:someone@example.com"));
    }

    #[test]
    fn other_schemes_are_refused() {
        assert!(!is_openable("file:///etc/passwd"));
        assert!(!is_openable("javascript:alert(1)"));
        assert!(!is_openable("wtstation://localhost/index.html"));
        assert!(!is_openable(""));
    }

    #[test]
    fn open_external_rejects_before_spawning() {
        let err = open_external("file:///tmp/x").unwrap_err();
        assert!(matches!(err, PlatformError::NotSupported(_)));
    }
}
