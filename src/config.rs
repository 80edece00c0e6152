//! Configuration for quillr.
//!
//! Loaded from `~/.config/quillr/quillr.yml` or `./quillr.yml`. Every section
//! is optional; missing keys take their defaults.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::image::fal;
use crate::llm::chat;
use crate::search::tavily;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub image: ImageConfig,
    /// Use mock collaborators for every external service.
    pub offline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
    pub temperatures: Temperatures,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: chat::DEFAULT_MODEL.to_string(),
            base_url: chat::DEFAULT_BASE_URL.to_string(),
            api_key_env: chat::DEFAULT_API_KEY_ENV.to_string(),
            max_tokens: 2048,
            timeout_ms: 120_000,
            temperatures: Temperatures::default(),
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Sampling temperature per collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Temperatures {
    pub brief: f32,
    pub cv: f32,
    pub review: f32,
    pub refine: f32,
}

impl Default for Temperatures {
    fn default() -> Self {
        Self {
            brief: 0.7,
            cv: 0.5,
            review: 0.3,
            refine: 0.7,
        }
    }
}

impl Temperatures {
    fn iter(&self) -> impl Iterator<Item = (&'static str, f32)> {
        [
            ("brief", self.brief),
            ("cv", self.cv),
            ("review", self.review),
            ("refine", self.refine),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub api_key_env: String,
    pub max_results: usize,
    pub timeout_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key_env: tavily::DEFAULT_API_KEY_ENV.to_string(),
            max_results: 5,
            timeout_ms: 30_000,
        }
    }
}

impl SearchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub model: String,
    pub aspect_ratio: String,
    pub api_key_env: String,
    pub timeout_ms: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            model: fal::DEFAULT_MODEL.to_string(),
            aspect_ratio: fal::DEFAULT_ASPECT_RATIO.to_string(),
            api_key_env: fal::DEFAULT_API_KEY_ENV.to_string(),
            timeout_ms: 120_000,
        }
    }
}

impl ImageConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// 1. Explicit path if provided
    /// 2. ~/.config/quillr/quillr.yml
    /// 3. ./quillr.yml
    /// 4. Defaults
    ///
    /// The first file that exists is the one used; if it cannot be read or
    /// parsed the load fails instead of moving on to the next candidate.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        Self::load_first(&Self::candidate_paths())
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let project_name = env!("CARGO_PKG_NAME");
        let file_name = format!("{}.yml", project_name);

        let mut paths = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join(project_name).join(&file_name));
        }
        paths.push(PathBuf::from(file_name));
        paths
    }

    fn load_first(candidates: &[PathBuf]) -> Result<Self> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => {
                Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()))
            }
            None => {
                log::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.llm.max_tokens == 0 {
            eyre::bail!("llm.max_tokens must be > 0");
        }
        if self.search.max_results == 0 {
            eyre::bail!("search.max_results must be > 0");
        }
        for (name, value) in self.llm.temperatures.iter() {
            if !(0.0..=2.0).contains(&value) {
                eyre::bail!("llm.temperatures.{} must be within 0.0..=2.0, got {}", name, value);
            }
        }
        if self.image.aspect_ratio.trim().is_empty() {
            eyre::bail!("image.aspect_ratio must not be empty");
        }
        Ok(())
    }
}
