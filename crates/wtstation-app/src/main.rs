mod app_state;
mod cli;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use wtstation_config::StationConfig;
use wtstation_store::RecordStore;

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let path = wtstation_platform::crash_report::write_crash_report(info);

        eprintln!("\n--- WTStation crashed ---");
        if let Some(p) = &path {
            eprintln!("Crash report written to: {}", p.display());
        }
        eprintln!("-------------------------\n");

        default_hook(info);
    }));
}

fn open_store(args: &cli::Args) -> RecordStore {
    let path = match &args.store {
        Some(p) => Ok(p.clone()),
        None => wtstation_platform::store_file(),
    };
    let opened = path
        .map_err(|e| e.to_string())
        .and_then(|p| RecordStore::open(p).map_err(|e| e.to_string()));
    match opened {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Record store unavailable, running without persistence: {e}");
            RecordStore::in_memory()
        }
    }
}

fn main() {
    install_panic_hook();

    let args = cli::parse();

    // Config is loaded before logging so its level can seed the filter.
    let loaded = wtstation_config::load_config(args.config.as_deref());
    let config_level = loaded
        .as_ref()
        .map(|c| c.logging.level.as_directive())
        .unwrap_or("wtstation=info");

    let directive = args.log_directive(config_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                directive
                    .parse()
                    .unwrap_or_else(|_| "wtstation=info".parse().expect("static directive")),
            ),
        )
        .init();

    tracing::info!("WTStation v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        StationConfig::default()
    });

    if let Err(e) = wtstation_platform::ensure_dirs() {
        tracing::warn!("Failed to create directories: {e}");
    }

    let store = open_store(&args);

    let event_loop = match EventLoop::new() {
        Ok(el) => el,
        Err(e) => {
            tracing::error!("Failed to create event loop: {e}");
            std::process::exit(1);
        }
    };
    let mut app = app_state::StationApp::new(config, store);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
