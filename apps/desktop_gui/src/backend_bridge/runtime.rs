//! Runtime bridge between UI command queue and backend event intake.

use std::thread;

use client_core::{GenerationClient, GenerationService};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

/// Spawns the backend worker. The thread exits once the UI drops its command
/// sender.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    backend_url: String,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let client = GenerationClient::new(&backend_url);
            tracing::info!(endpoint = client.endpoint(), "backend worker ready");
            let _ = ui_tx.try_send(UiEvent::Info("Backend worker ready".to_string()));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::Generate { ticket_id, code } => {
                        let outcome = client.generate(&code).await;
                        // Blocking send: a dropped completion would leave the
                        // UI loading forever.
                        if ui_tx
                            .send(UiEvent::GenerationFinished { ticket_id, outcome })
                            .is_err()
                        {
                            tracing::debug!("ui event channel closed; stopping backend worker");
                            break;
                        }
                    }
                }
            }
        });
    })
}
