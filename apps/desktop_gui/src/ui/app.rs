use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use chrono::Local;
use client_core::{
    export::write_text_file, ClientSettings, ClipboardService, ExportService, GenerationError,
    InteractionController, Pane,
};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::shortcuts::take_submit_shortcut;

const SOURCE_EDITOR_ID: &str = "source_editor";
const GENERATING_PLACEHOLDER: &str = "Generating tests…";

#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub backend_url: String,
    pub export_dir: PathBuf,
}

impl From<&ClientSettings> for StartupConfig {
    fn from(settings: &ClientSettings) -> Self {
        Self {
            backend_url: settings.backend_url.clone(),
            export_dir: settings.resolve_export_dir(),
        }
    }
}

pub struct TestMateApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    backend_url: String,
    controller: InteractionController,
    clipboard: ClipboardService,
    export: ExportService,

    status: String,
}

impl TestMateApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        startup: StartupConfig,
        clipboard: ClipboardService,
    ) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            backend_url: startup.backend_url,
            controller: InteractionController::with_sample(),
            clipboard,
            export: ExportService::new(startup.export_dir),
            status: "Ready".to_string(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::Error(err) => {
                    tracing::error!(context = ?err.context(), "{}", err.message());
                    self.status = err.status_line();
                }
                UiEvent::GenerationFinished { ticket_id, outcome } => {
                    if self.controller.complete_generation(ticket_id, outcome) {
                        self.status = match self.controller.last_generated_at() {
                            Some(at) if self.controller.error().is_none() => {
                                format!("Generated tests at {}", at.format("%H:%M:%S"))
                            }
                            _ => "Generation failed".to_string(),
                        };
                    }
                }
            }
        }
    }

    fn try_generate(&mut self) {
        let Some(ticket) = self.controller.begin_generation() else {
            return;
        };
        self.status = "Generating…".to_string();

        let cmd = BackendCommand::Generate {
            ticket_id: ticket.id,
            code: ticket.source,
        };
        if let Err(err) = dispatch_backend_command(&self.cmd_tx, cmd) {
            tracing::error!(context = ?err.context(), "{}", err.message());
            self.status = err.status_line();
            self.controller.complete_generation(
                ticket.id,
                Err(GenerationError::Transport(err.message().to_string())),
            );
        }
    }

    fn copy_pane(&mut self, pane: Pane) {
        if self
            .controller
            .copy_pane(&mut self.clipboard, pane, Instant::now())
        {
            self.status = format!("Copied {} to clipboard", pane.label());
        } else {
            self.status = format!("Copy failed ({} clipboard)", self.clipboard.strategy_name());
        }
    }

    fn download_pane(&mut self, pane: Pane) {
        match self.controller.export_pane(&self.export, pane) {
            Ok(path) => {
                self.status = format!(
                    "Saved {} to {} at {}",
                    pane.label(),
                    path.display(),
                    Local::now().format("%H:%M:%S")
                );
            }
            Err(err) => self.report_export_failure(err),
        }
    }

    fn save_pane_as(&mut self, pane: Pane) {
        let Some(path) = rfd::FileDialog::new()
            .set_directory(self.export.dir())
            .set_file_name(pane.default_filename())
            .save_file()
        else {
            return;
        };

        match write_text_file(&path, self.controller.text(pane)) {
            Ok(()) => self.status = format!("Saved {} to {}", pane.label(), path.display()),
            Err(err) => self.report_export_failure(err),
        }
    }

    fn report_export_failure(&mut self, err: anyhow::Error) {
        let err = UiError::from_message(UiErrorContext::Export, format!("{err:#}"));
        tracing::warn!("export failed: {}", err.message());
        self.status = err.status_line();
    }

    fn show_banners(&mut self, ui: &mut egui::Ui) {
        if self.controller.copied() {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(38, 94, 62))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(86, 160, 112)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.label(egui::RichText::new("Copied to clipboard").color(egui::Color32::WHITE));
                });
            ui.add_space(6.0);
        }

        if let Some(message) = self.controller.error().map(str::to_string) {
            egui::Frame::NONE
                .fill(egui::Color32::from_rgb(111, 53, 53))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
                .corner_radius(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(format!("⚠ {message}")).color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.controller.dismiss_error();
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn pane_tools(&mut self, ui: &mut egui::Ui, pane: Pane) {
        let has_text = self.controller.has_text(pane);
        if ui.add_enabled(has_text, egui::Button::new("Copy")).clicked() {
            self.copy_pane(pane);
        }
        if ui
            .add_enabled(has_text, egui::Button::new("Download .py"))
            .on_hover_text(format!("Save as {}", pane.default_filename()))
            .clicked()
        {
            self.download_pane(pane);
        }
        if ui.add_enabled(has_text, egui::Button::new("Save as…")).clicked() {
            self.save_pane_as(pane);
        }
    }

    fn show_source_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Source Code");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.pane_tools(ui, Pane::Source);
                if ui.button("Clear").clicked() {
                    self.controller.clear_source();
                }
                if ui.button("Load sample").clicked() {
                    self.controller.load_sample();
                }
            });
        });

        let source_id = egui::Id::new(SOURCE_EDITOR_ID);
        let focused = ui.ctx().memory(|memory| memory.has_focus(source_id));
        if focused && ui.ctx().input_mut(take_submit_shortcut) {
            self.try_generate();
        }

        let editor_height = (ui.available_height() - 90.0).max(120.0);
        egui::ScrollArea::vertical()
            .id_salt("source_scroll")
            .max_height(editor_height)
            .show(ui, |ui| {
                ui.add_sized(
                    [ui.available_width(), editor_height],
                    egui::TextEdit::multiline(self.controller.source_mut())
                        .id(source_id)
                        .code_editor()
                        .hint_text("Paste your Python code here…"),
                );
            });

        ui.add_space(8.0);
        let label = if self.controller.is_in_flight() {
            "Generating…"
        } else {
            "Generate Tests"
        };
        if ui
            .add_enabled(self.controller.can_generate(), egui::Button::new(label))
            .on_hover_text("Generate unit tests from the code above")
            .clicked()
        {
            self.try_generate();
        }
        ui.label(
            egui::RichText::new(
                "The backend injects this code into the generated tests so they run without separate imports. (Shortcut: Cmd/Ctrl + Enter)",
            )
            .small()
            .weak(),
        );
    }

    fn show_generated_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Generated Tests");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.pane_tools(ui, Pane::Generated);
            });
        });

        let editor_height = (ui.available_height() - 40.0).max(120.0);
        egui::ScrollArea::vertical()
            .id_salt("generated_scroll")
            .max_height(editor_height)
            .show(ui, |ui| {
                if self.controller.is_in_flight() {
                    let mut placeholder = GENERATING_PLACEHOLDER;
                    ui.add_enabled(
                        false,
                        egui::TextEdit::multiline(&mut placeholder)
                            .code_editor()
                            .desired_width(f32::INFINITY)
                            .min_size(egui::vec2(0.0, editor_height)),
                    );
                } else {
                    ui.add_sized(
                        [ui.available_width(), editor_height],
                        egui::TextEdit::multiline(self.controller.generated_mut())
                            .code_editor()
                            .hint_text(
                                "Your generated pytest code will appear here. You can edit it before downloading.",
                            ),
                    );
                }
            });

        ui.label(egui::RichText::new("Editable. Run with `pytest -q` in your project.").small().weak());
    }

    fn next_repaint(&self, now: Instant) -> Duration {
        let mut next = if self.controller.is_in_flight() {
            Duration::from_millis(50)
        } else {
            Duration::from_millis(250)
        };
        if let Some(remaining) = self.controller.copied_remaining(now) {
            next = next.min(remaining);
        }
        next
    }
}

impl eframe::App for TestMateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.process_ui_events();
        self.controller.tick(now);

        egui::TopBottomPanel::top("topbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("●").color(egui::Color32::from_rgb(120, 180, 255)));
                ui.strong("Test Mate");
            });
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label("Backend:");
                ui.code(&self.backend_url);
                ui.separator();
                ui.label(&self.status);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_banners(ui);
            ui.columns(2, |columns| {
                self.show_source_panel(&mut columns[0]);
                self.show_generated_panel(&mut columns[1]);
            });
        });

        ctx.request_repaint_after(self.next_repaint(now));
    }
}

#[cfg(test)]
mod tests {
    use client_core::{ClipboardError, ClipboardStrategy, RequestState};
    use crossbeam_channel::bounded;

    use super::*;

    struct NullClipboard;

    impl ClipboardStrategy for NullClipboard {
        fn name(&self) -> &'static str {
            "null"
        }

        fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
            Ok(())
        }
    }

    fn app_with_channels() -> (TestMateApp, Receiver<BackendCommand>, Sender<UiEvent>) {
        let (cmd_tx, cmd_rx) = bounded(4);
        let (ui_tx, ui_rx) = bounded(4);
        let app = TestMateApp::new(
            cmd_tx,
            ui_rx,
            StartupConfig {
                backend_url: "http://localhost:8000".to_string(),
                export_dir: std::env::temp_dir(),
            },
            ClipboardService::with_strategy(Box::new(NullClipboard)),
        );
        (app, cmd_rx, ui_tx)
    }

    #[test]
    fn generate_queues_snapshot_and_applies_completion() {
        let (mut app, cmd_rx, ui_tx) = app_with_channels();

        app.try_generate();
        app.try_generate();

        let BackendCommand::Generate { ticket_id, code } = cmd_rx.try_recv().expect("queued");
        assert!(cmd_rx.try_recv().is_err(), "second trigger must not queue");
        assert_eq!(code, app.controller.source());
        assert_eq!(app.controller.request_state(), RequestState::InFlight);

        ui_tx
            .send(UiEvent::GenerationFinished {
                ticket_id,
                outcome: Ok("import pytest".to_string()),
            })
            .expect("send");
        app.process_ui_events();

        assert_eq!(app.controller.request_state(), RequestState::Succeeded);
        assert_eq!(app.controller.generated(), "import pytest");
        assert!(app.status.starts_with("Generated tests at"));
    }

    #[test]
    fn dead_backend_fails_request_instead_of_hanging() {
        let (mut app, cmd_rx, _ui_tx) = app_with_channels();
        drop(cmd_rx);

        app.try_generate();

        assert_eq!(app.controller.request_state(), RequestState::Failed);
        assert!(app.controller.error().is_some_and(|message| message.contains("disconnected")));
        assert!(app.controller.can_generate());
    }

    #[test]
    fn startup_error_goes_to_status_not_banner() {
        let (mut app, _cmd_rx, ui_tx) = app_with_channels();
        ui_tx
            .send(UiEvent::Error(UiError::from_message(
                UiErrorContext::BackendStartup,
                "backend worker startup failure: failed to build runtime: network unavailable",
            )))
            .expect("send");

        app.process_ui_events();

        assert!(app.status.starts_with("Transport error:"));
        assert_eq!(app.controller.error(), None);
    }

    #[test]
    fn copy_sets_banner_and_status() {
        let (mut app, _cmd_rx, _ui_tx) = app_with_channels();

        app.copy_pane(Pane::Source);

        assert!(app.controller.copied());
        assert_eq!(app.status, "Copied source to clipboard");
        assert!(app.next_repaint(Instant::now()) <= Duration::from_millis(250));
    }

    #[test]
    fn blank_source_does_not_start_generation() {
        let (mut app, cmd_rx, _ui_tx) = app_with_channels();
        app.controller.clear_source();

        app.try_generate();

        assert!(cmd_rx.try_recv().is_err());
        assert_eq!(app.controller.request_state(), RequestState::Idle);
        assert!(!app.controller.can_generate());
        assert_eq!(app.status, "Ready");
    }
}
