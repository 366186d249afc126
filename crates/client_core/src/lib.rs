//! Client side of Test Mate: the interaction controller plus the services it
//! drives (generation HTTP client, clipboard, file export).

pub mod client;
pub mod clipboard;
pub mod config;
pub mod controller;
pub mod error;
pub mod export;
pub mod sample;
pub mod timer;

pub use client::{interpret_response, GenerationClient, GenerationService};
pub use clipboard::{ClipboardService, ClipboardStrategy, CommandClipboard, SystemClipboard};
pub use config::{load_settings, ClientSettings};
pub use controller::{run_generation, GenerationTicket, InteractionController, Pane, RequestState};
pub use error::{ClipboardError, GenerationError};
pub use export::ExportService;
pub use timer::COPIED_BANNER_DURATION;
