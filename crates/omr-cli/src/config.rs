//! Configuration file support for omr.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/omr/config.toml` (lowest priority)
//! - Project-local: `.omr.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

/// Project-local config file name.
const PROJECT_CONFIG: &str = ".omr.toml";

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Grading thresholds.
    pub grading: GradingConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
    /// Sheet rendering settings.
    pub render: RenderConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Grading threshold configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GradingConfig {
    /// Luma below which a pixel is dark (0-255).
    pub luminance_threshold: Option<u8>,
    /// Dark fraction above which a bubble is marked (0.0-1.0).
    pub fill_threshold: Option<f64>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
    /// JSON Lines file every result is appended to.
    pub store: Option<PathBuf>,
}

/// Sheet rendering configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Page width in pixels.
    pub width: Option<u32>,
    /// Page height in pixels.
    pub height: Option<u32>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/omr/config.toml`
    /// 2. Project-local: `.omr.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}");
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.grading.fill_threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("grading.fill_threshold must be 0.0-1.0, got {t}"));
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        if self.render.width == Some(0) || self.render.height == Some(0) {
            return Err("render.width and render.height must be at least 1".to_string());
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        self.grading.luminance_threshold = other
            .grading
            .luminance_threshold
            .or(self.grading.luminance_threshold);
        self.grading.fill_threshold = other.grading.fill_threshold.or(self.grading.fill_threshold);

        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
        self.output.store = other.output.store.or_else(|| self.output.store.take());

        self.render.width = other.render.width.or(self.render.width);
        self.render.height = other.render.height.or(self.render.height);
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("omr").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.omr.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(PROJECT_CONFIG);
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
