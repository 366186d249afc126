use std::{
    io::{self, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    export::write_text_file, load_settings, run_generation, ClipboardService, GenerationClient,
    InteractionController, Pane, RequestState,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Generate unit tests for a source file from the command line")]
struct Args {
    /// Source file to generate tests for; `-` reads stdin.
    #[arg(long, default_value = "-")]
    source: PathBuf,
    /// Write the generated tests here instead of printing them.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Also place the generated tests on the clipboard.
    #[arg(long)]
    copy: bool,
    /// Base URL of the generation service (overrides BACKEND_URL).
    #[arg(long)]
    backend_url: Option<String>,
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("failed to read source from stdin")?;
        return Ok(source);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read source file '{}'", path.display()))
}

/// The process exits right after copying, so the clipboard must not depend on
/// this process staying alive.
fn cli_clipboard() -> ClipboardService {
    ClipboardService::detect_persistent()
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(raw) = args.backend_url.as_deref() {
        settings = settings.with_backend_url(raw)?;
    }

    let mut controller = InteractionController::new(read_source(&args.source)?);
    let client = GenerationClient::new(&settings.backend_url);
    tracing::info!(endpoint = %client.endpoint(), "generating tests");

    match run_generation(&mut controller, &client).await {
        None => {
            tracing::warn!("source is empty; nothing to generate");
            return Ok(ExitCode::from(2));
        }
        Some(RequestState::Failed) => {
            tracing::error!("⚠ {}", controller.error().unwrap_or("Request failed"));
            return Ok(ExitCode::FAILURE);
        }
        Some(_) => {
            tracing::info!(bytes = controller.generated().len(), "generation finished");
        }
    }

    let generated = controller.text(Pane::Generated);
    match &args.output {
        Some(path) => {
            write_text_file(path, generated)?;
            tracing::info!("saved generated tests to {}", path.display());
        }
        None => println!("{generated}"),
    }

    if args.copy {
        let mut clipboard = cli_clipboard();
        if controller.copy_pane(&mut clipboard, Pane::Generated, std::time::Instant::now()) {
            tracing::info!(strategy = clipboard.strategy_name(), "copied to clipboard");
        } else {
            tracing::warn!(strategy = clipboard.strategy_name(), "copy failed");
        }
    }

    Ok(ExitCode::SUCCESS)
}
