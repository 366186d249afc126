use std::{fmt, io, process::ExitStatus};

use thiserror::Error;

/// Failure of a generation request. `Display` is the bare message so it can be
/// shown verbatim in the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The service answered, but reported an error field or a failing status.
    #[error("{0}")]
    Application(String),
    /// The request never produced a usable response.
    #[error("{0}")]
    Transport(String),
}

impl GenerationError {
    pub fn transport<E: fmt::Display + fmt::Debug>(err: E) -> Self {
        Self::Transport(describe(&err))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Application(message) | Self::Transport(message) => message,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Prefers the error's description and falls back to its debug form when the
/// description is empty.
pub fn describe<E: fmt::Display + fmt::Debug + ?Sized>(err: &E) -> String {
    let text = err.to_string();
    if text.trim().is_empty() {
        format!("{err:?}")
    } else {
        text
    }
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("no clipboard backend available")]
    Unavailable,
    #[error("copy command `{command}` failed with {status}")]
    CommandFailed { command: String, status: ExitStatus },
    #[error("copy command `{command}` could not run: {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
    #[error("clipboard backend error: {0}")]
    Backend(String),
}

impl From<arboard::Error> for ClipboardError {
    fn from(value: arboard::Error) -> Self {
        Self::Backend(value.to_string())
    }
}
