mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use clap::Parser;
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use ui::app::{NilScopeApp, PersistedUiSettings, StartupConfig, SETTINGS_STORAGE_KEY};

#[derive(Debug, Parser)]
#[command(name = "nilscope", about = "NILScope contract analysis desktop app")]
struct Cli {
    /// Base URL of the contract-analysis API.
    #[arg(long, env = "NIL_API_URL", default_value = "http://localhost:8000")]
    api_url: String,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let cli = Cli::parse();

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(cli.api_url.clone(), cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("NILScope")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([900.0, 600.0]),
        ..Default::default()
    };
    let startup = StartupConfig {
        api_url: cli.api_url,
    };
    eframe::run_native(
        "NILScope",
        options,
        Box::new(move |cc| {
            let persisted = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedUiSettings>(&text).ok())
            });
            Ok(Box::new(NilScopeApp::new(cmd_tx, ui_rx, persisted, startup)))
        }),
    )
}
