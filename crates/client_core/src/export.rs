use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Writes pane contents to files in a fixed directory.
#[derive(Debug, Clone)]
pub struct ExportService {
    dir: PathBuf,
}

impl ExportService {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Saves `content` as `<dir>/<filename>` and returns the written path. The
    /// filename is used as given.
    pub fn download(&self, filename: &str, content: &str) -> anyhow::Result<PathBuf> {
        let path = self.dir.join(filename);
        write_text_file(&path, content)?;
        tracing::info!(path = %path.display(), bytes = content.len(), "exported file");
        Ok(path)
    }
}

/// Writes UTF-8 text through a hidden temporary sibling that is renamed onto
/// `path`. The temporary never outlives the call.
pub fn write_text_file(path: &Path, content: &str) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("export path '{}' has no file name", path.display()))?;

    fs::create_dir_all(parent).with_context(|| {
        format!("failed to create export directory '{}'", parent.display())
    })?;

    let mut temp_name = std::ffi::OsString::from(".");
    temp_name.push(file_name);
    temp_name.push(".part");
    let temp_path = parent.join(temp_name);

    let result = fs::write(&temp_path, content.as_bytes())
        .with_context(|| format!("failed to write '{}'", temp_path.display()))
        .and_then(|()| {
            fs::rename(&temp_path, path)
                .with_context(|| format!("failed to move export into '{}'", path.display()))
        });

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
