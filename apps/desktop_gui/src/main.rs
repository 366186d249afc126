mod backend_bridge;
mod controller;
mod ui;

use std::path::PathBuf;

use clap::Parser;
use client_core::{load_settings, ClipboardService};
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{StartupConfig, TestMateApp};

#[derive(Parser, Debug)]
#[command(about = "Desktop editor that turns source code into generated unit tests")]
struct Args {
    /// Base URL of the generation service (overrides BACKEND_URL).
    #[arg(long)]
    backend_url: Option<String>,
    /// Directory the Download buttons write into.
    #[arg(long)]
    export_dir: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(raw) = args.backend_url.as_deref() {
        match settings.clone().with_backend_url(raw) {
            Ok(updated) => settings = updated,
            Err(err) => tracing::warn!("ignoring --backend-url: {err:#}"),
        }
    }
    if let Some(dir) = args.export_dir {
        settings.export_dir = Some(dir);
    }
    let startup = StartupConfig::from(&settings);
    tracing::info!(backend = %startup.backend_url, export_dir = %startup.export_dir.display(), "starting Test Mate");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, startup.backend_url.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Test Mate")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Test Mate",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(TestMateApp::new(
                cmd_tx,
                ui_rx,
                startup,
                ClipboardService::detect(),
            )))
        }),
    )
}
