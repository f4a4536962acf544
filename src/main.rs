mod app;
mod client;
mod config;
mod export;
mod models;

use eframe::egui;
use tracing::info;

use crate::app::DashboardApp;
use crate::client::ReportsClient;
use crate::config::AppConfig;

const BANNER: &str = r#"
  ___ _         _      _         _
 | __| |___ ___| |_ __| |__ _ __| |_
 | _|| / -_) -_)  _/ _` / _` (_-< ' \
 |_| |_\___\___|\__\__,_\__,_/__/_||_|
  Device Compliance Dashboard
"#;

fn main() -> anyhow::Result<()> {
    // ── Logging ─────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleetdash=info".into()),
        )
        .compact()
        .init();

    println!("{BANNER}");

    // ── Config ──────────────────────────────────────────────────
    let cfg = AppConfig::load(None)?;
    info!(
        "Config loaded — API at {}, export to {}",
        cfg.api.base_url,
        cfg.export.path.display()
    );

    // ── Backend client + runtime for in-flight requests ─────────
    let client = ReportsClient::new(&cfg.api.base_url)?;
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    // ── UI ──────────────────────────────────────────────────────
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fleetdash",
        options,
        Box::new(move |cc| Box::new(DashboardApp::new(cc, client, &cfg, rt))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
