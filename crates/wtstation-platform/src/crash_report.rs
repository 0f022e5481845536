//! Panic reports written as JSON next to the logs.

use std::backtrace::Backtrace;
use std::fs;
use std::io;
use std::panic::PanicHookInfo;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::paths::crash_report_dir;

/// Pattern and replacement, most specific first. The QR payload is the
/// login credential of a session, so it never reaches disk.
const REDACTIONS: &[(&str, &str)] = &[
    (r"data:image/[a-zA-Z+]+;base64,[a-zA-Z0-9+/=]+", "[REDACTED]"),
    (r"Bearer [a-zA-Z0-9._\-]+", "Bearer [REDACTED]"),
    (r"(?i)((?:key|token|secret|password)=)[a-zA-Z0-9]{16,}", "${1}[REDACTED]"),
];

fn redaction_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        REDACTIONS
            .iter()
            .filter_map(|(pattern, replacement)| {
                Regex::new(pattern).ok().map(|re| (re, *replacement))
            })
            .collect()
    })
}

/// Strip QR payloads, bearer tokens and `key=`/`token=` style secrets.
pub fn sanitize_secrets(input: &str) -> String {
    redaction_rules()
        .iter()
        .fold(input.to_string(), |text, (re, replacement)| {
            re.replace_all(&text, *replacement).into_owned()
        })
}

#[derive(Debug, Serialize)]
pub struct PanicLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Serialize)]
pub struct CrashReport {
    pub timestamp: String,
    pub version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub panic_message: String,
    pub location: Option<PanicLocation>,
    pub backtrace: String,
}

impl CrashReport {
    /// Build a sanitized report for `message` at `location`.
    pub fn new(message: &str, location: Option<PanicLocation>, backtrace: &str) -> Self {
        Self {
            timestamp: chrono::Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            panic_message: sanitize_secrets(message),
            location,
            backtrace: sanitize_secrets(backtrace),
        }
    }

    pub fn capture(info: &PanicHookInfo) -> Self {
        let payload = info.payload();
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        let location = info.location().map(|loc| PanicLocation {
            file: loc.file().to_string(),
            line: loc.line(),
            column: loc.column(),
        });
        Self::new(
            &message,
            location,
            &Backtrace::force_capture().to_string(),
        )
    }

    /// Write `crash_<utc>.json` into `dir` (owner-only on Unix).
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let stamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
        let path = dir.join(format!("crash_{stamp}.json"));
        let json = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(&path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(path)
    }
}

/// Panic-hook entry point. Every failure is swallowed.
pub fn write_crash_report(info: &PanicHookInfo) -> Option<PathBuf> {
    let dir = crash_report_dir().ok()?;
    CrashReport::capture(info).write_to(&dir).ok()
}
