//! Asset sources for the bundled model and feature specification.
//!
//! The predictor never touches the filesystem directly; it reads named
//! assets through [`AssetSource`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ForecastError, ForecastResult};

/// Read-only access to named assets.
pub trait AssetSource {
    /// Read the full contents of the named asset.
    ///
    /// # Errors
    /// - `ForecastError::AssetLoad` if the asset is missing or unreadable
    fn read(&self, name: &str) -> ForecastResult<Vec<u8>>;

    /// Human-readable location, used in log events.
    fn describe(&self) -> String;
}

/// Assets stored as files below a root directory.
#[derive(Debug, Clone)]
pub struct DirAssets {
    root: PathBuf,
}

impl DirAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, name: &str) -> ForecastResult<PathBuf> {
        let relative = Path::new(name);
        // Asset names are bundle-relative; reject anything that could escape the root.
        if relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ForecastError::asset(name, "asset name must be relative to the bundle"));
        }
        Ok(self.root.join(relative))
    }
}

impl AssetSource for DirAssets {
    fn read(&self, name: &str) -> ForecastResult<Vec<u8>> {
        let path = self.resolve(name)?;
        std::fs::read(&path)
            .map_err(|e| ForecastError::asset(name, format!("{}: {}", path.display(), e)))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// In-memory assets.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssets {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), bytes.into());
    }
}

impl AssetSource for MemoryAssets {
    fn read(&self, name: &str) -> ForecastResult<Vec<u8>> {
        self.entries
            .get(name)
            .cloned()
            .ok_or_else(|| ForecastError::asset(name, "not present in memory bundle"))
    }

    fn describe(&self) -> String {
        format!("memory bundle ({} assets)", self.entries.len())
    }
}
