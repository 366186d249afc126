//! Clipboard service with a native backend and a copy-command fallback.

use std::{
    io::Write,
    process::{Command, Stdio},
};

use arboard::Clipboard;

use crate::error::ClipboardError;

/// One way of placing text on the system clipboard.
pub trait ClipboardStrategy {
    fn name(&self) -> &'static str;
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Native clipboard through arboard. The handle is kept open for the lifetime
/// of the service so X11 selections stay owned after the copy.
pub struct SystemClipboard {
    inner: Clipboard,
}

impl SystemClipboard {
    pub fn open() -> Result<Self, ClipboardError> {
        Ok(Self {
            inner: Clipboard::new()?,
        })
    }
}

impl ClipboardStrategy for SystemClipboard {
    fn name(&self) -> &'static str {
        "system"
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        Ok(self.inner.set_text(text.to_owned())?)
    }
}

/// Fallback that pipes the text into the platform copy command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandClipboard {
    program: String,
    args: Vec<String>,
}

impl CommandClipboard {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    /// Copy command for the current platform, or `Unavailable` when there is
    /// no display server to copy into.
    pub fn platform_default() -> Result<Self, ClipboardError> {
        Self::for_display(
            std::env::var_os("WAYLAND_DISPLAY").is_some(),
            std::env::var_os("DISPLAY").is_some(),
        )
    }

    #[cfg(target_os = "windows")]
    fn for_display(_wayland: bool, _x11: bool) -> Result<Self, ClipboardError> {
        Ok(Self::new("clip", &[]))
    }

    #[cfg(target_os = "macos")]
    fn for_display(_wayland: bool, _x11: bool) -> Result<Self, ClipboardError> {
        Ok(Self::new("pbcopy", &[]))
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn for_display(wayland: bool, x11: bool) -> Result<Self, ClipboardError> {
        if wayland {
            Ok(Self::new("wl-copy", &[]))
        } else if x11 {
            Ok(Self::new("xclip", &["-selection", "clipboard"]))
        } else {
            Err(ClipboardError::Unavailable)
        }
    }

    #[cfg(not(any(unix, target_os = "windows")))]
    fn for_display(_wayland: bool, _x11: bool) -> Result<Self, ClipboardError> {
        Err(ClipboardError::Unavailable)
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ClipboardStrategy for CommandClipboard {
    fn name(&self) -> &'static str {
        "command"
    }

    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        let io_err = |source| ClipboardError::Io {
            command: self.command_line(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(io_err)?;

        // stdin is dropped at the end of this block so the command sees EOF.
        let written = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(text.as_bytes()),
            None => Err(std::io::Error::other("copy command stdin unavailable")),
        };
        if let Err(err) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io_err(err));
        }

        let status = child.wait().map_err(io_err)?;
        if !status.success() {
            return Err(ClipboardError::CommandFailed {
                command: self.command_line(),
                status,
            });
        }
        Ok(())
    }
}

/// Whether text placed through arboard stays on the clipboard after the
/// process exits. On X11 and Wayland the owning process serves the selection,
/// so it is lost with the handle.
pub const fn native_clipboard_outlives_process() -> bool {
    cfg!(any(target_os = "windows", target_os = "macos"))
}

pub struct ClipboardService {
    strategy: Option<Box<dyn ClipboardStrategy>>,
}

impl ClipboardService {
    /// Uses the native clipboard when it can be opened, the copy command
    /// otherwise.
    pub fn detect() -> Self {
        match SystemClipboard::open() {
            Ok(system) => Self::with_strategy(Box::new(system)),
            Err(err) => {
                tracing::info!("native clipboard unavailable ({err}); using copy command fallback");
                Self::command_fallback()
            }
        }
    }

    /// For short-lived processes. Prefers the copy command wherever the native
    /// clipboard would be emptied on exit; `xclip` and `wl-copy` fork and keep
    /// serving the selection.
    pub fn detect_persistent() -> Self {
        if native_clipboard_outlives_process() {
            Self::detect()
        } else {
            Self::command_fallback()
        }
    }

    fn command_fallback() -> Self {
        match CommandClipboard::platform_default() {
            Ok(command) => {
                tracing::debug!(command = %command.command_line(), "using copy command");
                Self::with_strategy(Box::new(command))
            }
            Err(err) => {
                tracing::warn!("{err}; copying is disabled");
                Self { strategy: None }
            }
        }
    }

    pub fn with_strategy(strategy: Box<dyn ClipboardStrategy>) -> Self {
        Self {
            strategy: Some(strategy),
        }
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy
            .as_ref()
            .map_or("none", |strategy| strategy.name())
    }

    /// Returns true when the text reached the clipboard. Empty text is a
    /// no-op; failures are logged and reported as false.
    pub fn copy(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }

        let written = match self.strategy.as_mut() {
            Some(strategy) => strategy.write_text(text),
            None => Err(ClipboardError::Unavailable),
        };
        match written {
            Ok(()) => {
                tracing::debug!(strategy = self.strategy_name(), bytes = text.len(), "copied");
                true
            }
            Err(err) => {
                tracing::error!(strategy = self.strategy_name(), "Copy failed: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/clipboard_tests.rs"]
mod tests;
