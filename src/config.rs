//! # Configuration
//!
//! A sync is described by a small YAML document naming the project, the
//! output directory and the build variant being assembled:
//!
//! ```yaml
//! project_dir: /work/app
//! output_dir: build/generated/play/demoRelease/res
//! play_path: play
//! variant:
//!   name: demo-release
//!   source_sets: [main, demo, release, demoRelease]
//! ```
//!
//! `output_dir` is resolved against `project_dir` when relative, and
//! `project_dir` against the configuration file's directory when loaded with
//! [`from_file`]. Resource roots are always absolute: a `project_dir` that is
//! still relative (including the default `.`) is taken against the current
//! directory. `play_path` defaults to `play`.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::overlay::{OverlayResolver, Variant, DEFAULT_PLAY_PATH};
use crate::sync::SyncEngine;

/// Everything needed to run passes for one variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Root of the project holding `src/<source-set>/` directories.
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,
    /// Merged output directory.
    pub output_dir: PathBuf,
    /// Subpath of each source set holding Play resources.
    #[serde(default = "default_play_path")]
    pub play_path: String,
    pub variant: Variant,
}

pub fn default_project_dir() -> PathBuf {
    PathBuf::from(".")
}

pub fn default_play_path() -> String {
    DEFAULT_PLAY_PATH.to_string()
}

impl SyncConfig {
    /// Build the overlay resolver for this configuration. Its roots are
    /// absolute, matching the absolute paths a change feed carries.
    pub fn resolver(&self) -> OverlayResolver {
        OverlayResolver::new(self.project_root(), &self.play_path, self.variant.clone())
    }

    /// `project_dir` made absolute against the current directory.
    pub fn project_root(&self) -> PathBuf {
        std::path::absolute(&self.project_dir).unwrap_or_else(|_| self.project_dir.clone())
    }

    /// The output directory, resolved against the project root when relative.
    pub fn output_root(&self) -> PathBuf {
        if self.output_dir.is_absolute() {
            self.output_dir.clone()
        } else {
            self.project_root().join(&self.output_dir)
        }
    }

    /// An engine syncing this configuration to disk.
    pub fn engine(&self) -> SyncEngine {
        SyncEngine::on_disk(self.resolver(), self.output_root())
    }

    /// Check the fields serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.variant.name.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "variant.name must not be empty".to_string(),
                hint: Some("Use the variant base name, e.g. 'demo-release'".to_string()),
            });
        }
        if self.variant.source_sets.is_empty() {
            return Err(Error::ConfigParse {
                message: format!("variant '{}' has no source sets", self.variant.name),
                hint: Some("List at least 'main' under variant.source_sets".to_string()),
            });
        }
        if let Some(bad) = self
            .variant
            .source_sets
            .iter()
            .find(|name| !is_single_segment(name))
        {
            return Err(Error::ConfigParse {
                message: format!("Invalid source set name '{}'", bad),
                hint: Some("Source set names are plain directory names under src/".to_string()),
            });
        }
        if !is_single_segment(&self.play_path) {
            return Err(Error::ConfigParse {
                message: format!("Invalid play_path '{}'", self.play_path),
                hint: Some("play_path must be a single directory name, e.g. 'play'".to_string()),
            });
        }
        Ok(())
    }
}

/// Whether `name` is exactly one normal path component.
fn is_single_segment(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Parse and check a configuration from YAML.
pub fn parse(yaml_content: &str) -> Result<SyncConfig> {
    let config: SyncConfig = serde_yaml::from_str(yaml_content).map_err(Error::Yaml)?;
    config.validate()?;
    Ok(config)
}

/// Parse a configuration file. A relative `project_dir` is taken relative
/// to the file's directory, and the result is made absolute.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SyncConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    let mut config = parse(&content)?;
    if config.project_dir.is_relative() {
        if let Some(base) = path.parent() {
            config.project_dir = base.join(&config.project_dir);
        }
    }
    config.project_dir = std::path::absolute(&config.project_dir)?;
    Ok(config)
}
