//! Native window for local development
//!
//! Run with: cargo run --features native

#[cfg(not(target_arch = "wasm32"))]
fn main() -> eframe::Result<()> {
    use distance_timer::app::TimerApp;
    use distance_timer::config::TimerConfig;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,distance_timer=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let config = TimerConfig::from_env();

    eframe::run_native(
        "distance-timer",
        eframe::NativeOptions::default(),
        Box::new(move |cc| {
            TimerApp::new(cc, config)
                .map(|app| Box::new(app) as Box<dyn eframe::App>)
                .map_err(Into::into)
        }),
    )
}

#[cfg(target_arch = "wasm32")]
fn main() {}
