//! Per-service surface setup: start URL, cosmetic cleanup, QR detection.

use std::time::Duration;

use wtstation_common::WorkspaceType;
use wtstation_config::schema::SurfaceConfig;

/// Delay between a page finishing its load and the first QR probe.
pub const QR_PROBE_DELAY: Duration = Duration::from_secs(2);

/// How often to re-probe while a session is waiting for a scan.
pub const QR_REPROBE_INTERVAL: Duration = Duration::from_secs(5);

const WHATSAPP_CSS: &str = r#"
header[role="banner"],
div[role="tablist"],
nav[role="navigation"],
div[data-testid="chatlist-loading"],
div[data-testid="spinner"],
[aria-label*="loading"],
[aria-label*="Loading"],
.landing-wrapper,
div[role="tab"],
button[aria-label*="tab"] {
  display: none !important;
  visibility: hidden !important;
  opacity: 0 !important;
  height: 0 !important;
  overflow: hidden !important;
}
#app {
  height: 100vh !important;
  overflow: hidden !important;
}
"#;

/// Returns the QR image as a data URL (or image src), or `null`.
const WHATSAPP_QR_PROBE: &str = r#"(function() {
  var el = document.querySelector('canvas, img[alt*="QR"]');
  if (!el) { return null; }
  if (el.src) { return el.src; }
  try { return el.toDataURL ? el.toDataURL() : null; } catch (e) { return null; }
})()"#;

/// How a surface is set up for one service.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceProfile {
    pub url: String,
    pub cosmetic_css: Option<&'static str>,
    pub qr_probe: Option<&'static str>,
}

/// Resolves a [`WorkspaceType`] to its [`ServiceProfile`].
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    whatsapp_url: String,
    telegram_url: String,
}

impl ServiceCatalog {
    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self {
            whatsapp_url: config.whatsapp_url.clone(),
            telegram_url: config.telegram_url.clone(),
        }
    }

    /// `Custom` workspaces load WhatsApp Web until custom URLs exist.
    pub fn profile(&self, service: WorkspaceType) -> ServiceProfile {
        match service {
            WorkspaceType::Telegram => ServiceProfile {
                url: self.telegram_url.clone(),
                cosmetic_css: None,
                qr_probe: None,
            },
            WorkspaceType::Whatsapp | WorkspaceType::Custom => ServiceProfile {
                url: self.whatsapp_url.clone(),
                cosmetic_css: Some(WHATSAPP_CSS),
                qr_probe: Some(WHATSAPP_QR_PROBE),
            },
        }
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::from_config(&SurfaceConfig::default())
    }
}

/// Script that installs `css` in the page once, replacing a previous copy.
pub fn css_injection_script(css: &str) -> String {
    let css_json = serde_json::to_string(css).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        "(function() {{\
           var id = 'wtstation-cosmetic';\
           var el = document.getElementById(id);\
           if (!el) {{ el = document.createElement('style'); el.id = id;\
             (document.head || document.documentElement).appendChild(el); }}\
           el.textContent = {css_json};\
         }})();"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telegram_has_no_cleanup_or_probe() {
        let profile = ServiceCatalog::default().profile(WorkspaceType::Telegram);
        assert_eq!(profile.url, "https://web.telegram.org");
        assert!(profile.cosmetic_css.is_none());
        assert!(profile.qr_probe.is_none());
    }

    #[test]
    fn custom_falls_back_to_whatsapp() {
        let catalog = ServiceCatalog::default();
        assert_eq!(
            catalog.profile(WorkspaceType::Custom),
            catalog.profile(WorkspaceType::Whatsapp)
        );
        assert_eq!(
            catalog.profile(WorkspaceType::Whatsapp).url,
            "https://web.whatsapp.com"
        );
    }

    #[test]
    fn urls_come_from_config() {
        let config = SurfaceConfig {
            telegram_url: "https://web.telegram.org/k/".into(),
            ..Default::default()
        };
        let profile = ServiceCatalog::from_config(&config).profile(WorkspaceType::Telegram);
        assert_eq!(profile.url, "https://web.telegram.org/k/");
    }

    #[test]
    fn css_script_escapes_content() {
        let script = css_injection_script("a[title=\"x\"] { color: red; }");
        assert!(script.contains(r#"a[title=\"x\"]"#));
        assert!(script.contains("wtstation-cosmetic"));
    }

    #[test]
    fn qr_probe_matches_canvas_and_img() {
        let probe = ServiceCatalog::default()
            .profile(WorkspaceType::Whatsapp)
            .qr_probe
            .unwrap();
        assert!(probe.contains("canvas, img[alt*=\"QR\"]"));
        assert!(probe.contains("toDataURL"));
    }
}
