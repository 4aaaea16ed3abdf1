use tracing_subscriber::EnvFilter;

/// Bundled config for mobile builds (iOS/Android)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to bundled config (mobile builds)
    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for item in dotenvy::from_read_iter(BUNDLED_CONFIG.as_bytes()) {
        let (key, value) = match item {
            Ok(pair) => pair,
            Err(err) => {
                eprintln!("skipping bundled config line: {err}");
                continue;
            }
        };
        // Only set if not already set (allow env override)
        if std::env::var(&key).is_err() {
            // SAFETY: We're setting env vars at startup before any threads are spawned
            unsafe {
                std::env::set_var(key, value);
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() {
    load_dotenv();
    init_tracing();
    tracing::info!("starting chatshell");
    dioxus::launch(chatshell::ui::App);
}
