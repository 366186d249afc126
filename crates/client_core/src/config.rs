use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use url::Url;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";
pub const SETTINGS_FILE: &str = "test_mate.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub backend_url: String,
    pub export_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.into(),
            export_dir: None,
        }
    }
}

impl ClientSettings {
    /// Directory downloads are written to: the configured one, else the
    /// user's download directory, else the working directory.
    pub fn resolve_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn with_backend_url(mut self, raw: &str) -> anyhow::Result<Self> {
        self.backend_url = normalize_backend_url(raw)?;
        Ok(self)
    }
}

pub fn load_settings() -> ClientSettings {
    load_settings_with(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_with(
    settings_file: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();
    let mut backend_url = None;

    if let Ok(raw) = fs::read_to_string(settings_file) {
        match toml::from_str::<HashMap<String, String>>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.get("backend_url") {
                    backend_url = Some(v.clone());
                }
                if let Some(v) = file_cfg.get("export_dir") {
                    settings.export_dir = Some(PathBuf::from(v));
                }
            }
            Err(err) => {
                tracing::warn!(
                    path = %settings_file.display(),
                    "ignoring unreadable settings file: {err}"
                );
            }
        }
    }

    if let Some(v) = env("BACKEND_URL") {
        backend_url = Some(v);
    }
    if let Some(v) = env("APP__BACKEND_URL") {
        backend_url = Some(v);
    }

    if let Some(v) = env("EXPORT_DIR") {
        settings.export_dir = Some(PathBuf::from(v));
    }
    if let Some(v) = env("APP__EXPORT_DIR") {
        settings.export_dir = Some(PathBuf::from(v));
    }

    if let Some(raw) = backend_url {
        match normalize_backend_url(&raw) {
            Ok(url) => settings.backend_url = url,
            Err(err) => {
                tracing::warn!("invalid backend url {raw:?}, using {DEFAULT_BACKEND_URL}: {err:#}")
            }
        }
    }

    settings
}

/// Trims whitespace and trailing slashes and checks the result is an http(s)
/// URL. A blank value selects the default.
pub fn normalize_backend_url(raw: &str) -> anyhow::Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(DEFAULT_BACKEND_URL.to_string());
    }

    let parsed =
        Url::parse(trimmed).with_context(|| format!("backend url '{trimmed}' is not a url"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        bail!(
            "backend url '{trimmed}' must use http or https, not '{}'",
            parsed.scheme()
        );
    }

    Ok(trimmed.to_string())
}
