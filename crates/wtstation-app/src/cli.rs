use std::path::PathBuf;

use clap::Parser;

/// WTStation: several messaging accounts side by side in one window.
#[derive(Parser, Debug)]
#[command(name = "wtstation", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Record store path override.
    #[arg(long)]
    pub store: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error) or a full
    /// filter directive.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

impl Args {
    /// The `EnvFilter` directive to install: the CLI flag wins over the
    /// config file.
    pub fn log_directive(&self, configured: &str) -> String {
        match self.log_level.as_deref() {
            Some(level) if level.contains('=') => level.to_string(),
            Some(level) => format!("wtstation={level}"),
            None => configured.to_string(),
        }
    }
}
