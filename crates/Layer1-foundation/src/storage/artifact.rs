//! 결과 아티팩트 저장소

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Timestamp used in artifact file names (`%Y%m%d_%H%M%S`)
pub fn run_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Directory holding the artifacts of one or more runs
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    base_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Store rooted at a subdirectory of this one
    pub fn subdir(&self, name: &str) -> Self {
        Self::new(self.base_dir.join(name))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn file_path(&self, filename: &str) -> PathBuf {
        self.base_dir.join(filename)
    }

    pub fn ensure_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            std::fs::create_dir_all(&self.base_dir).map_err(|e| {
                Error::Config(format!(
                    "Failed to create directory {}: {}",
                    self.base_dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// JSON 저장 (pretty, non-ASCII preserved)
    pub fn save_json<T: Serialize>(&self, filename: &str, data: &T) -> Result<PathBuf> {
        let content = serde_json::to_string_pretty(data)?;
        self.save_text(filename, &content)
    }

    /// 텍스트 저장 (Markdown 등)
    pub fn save_text(&self, filename: &str, content: &str) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.file_path(filename);
        std::fs::write(&path, content)?;
        debug!("Wrote artifact: {}", path.display());
        Ok(path)
    }

    /// JSON 로드 (임의 경로)
    pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(Error::from)
    }

    /// Copy `src` into this directory, keeping its file name
    pub fn copy_in(&self, src: &Path) -> Result<PathBuf> {
        let filename = src
            .file_name()
            .ok_or_else(|| Error::Internal(format!("Not a file: {}", src.display())))?;
        self.ensure_dir()?;
        let dst = self.base_dir.join(filename);
        std::fs::copy(src, &dst)?;
        Ok(dst)
    }
}
