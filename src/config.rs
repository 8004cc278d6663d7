//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/tabtree/tabtree.toml`
//! 3. Local config: `<dir>/.tabtree.toml`
//! 4. Environment variables: `TABTREE_*` prefix, `__` between sections,
//!    e.g. `TABTREE_RENDER__BRANCH`

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::RenderStyle;
use crate::errors::{ConfigError, ConfigResult};

/// Raw render style for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderStyle {
    pub branch: Option<String>,
    pub last_branch: Option<String>,
    pub vertical: Option<String>,
    pub blank: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderStyle,
}

impl RenderStyle {
    /// Overlay wins for every glyph it specifies.
    pub fn merge(&self, overlay: &RawRenderStyle) -> Self {
        Self {
            branch: overlay.branch.clone().unwrap_or_else(|| self.branch.clone()),
            last_branch: overlay
                .last_branch
                .clone()
                .unwrap_or_else(|| self.last_branch.clone()),
            vertical: overlay
                .vertical
                .clone()
                .unwrap_or_else(|| self.vertical.clone()),
            blank: overlay.blank.clone().unwrap_or_else(|| self.blank.clone()),
        }
    }
}

/// Unified configuration for tabtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Settings {
    /// Glyphs used by rendering
    pub render: RenderStyle,
}

/// Get the XDG config directory for tabtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tabtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("tabtree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".tabtree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ConfigResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: self.render.merge(&overlay.render),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.tabtree.toml`
    pub fn load(local_dir: Option<&Path>) -> ConfigResult<Self> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config file.
    ///
    /// `None` skips the global layer.
    #[instrument(level = "debug")]
    pub fn load_from(global: Option<&Path>, local_dir: Option<&Path>) -> ConfigResult<Self> {
        let mut current = Self::default();

        let layers = global
            .map(Path::to_path_buf)
            .into_iter()
            .chain(local_dir.map(local_config_path));
        for path in layers {
            if path.exists() {
                debug!("loading config layer {}", path.display());
                current = current.merge_with(&load_raw_settings(&path)?);
            }
        }

        Self::apply_env_overrides(current)
    }

    /// Apply TABTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> ConfigResult<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TABTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        if let Ok(val) = config.get_string("render.branch") {
            settings.render.branch = val;
        }
        if let Ok(val) = config.get_string("render.last_branch") {
            settings.render.last_branch = val;
        }
        if let Ok(val) = config.get_string("render.vertical") {
            settings.render.vertical = val;
        }
        if let Ok(val) = config.get_string("render.blank") {
            settings.render.blank = val;
        }

        Ok(settings)
    }

    /// Serialize settings as TOML, e.g. to seed a config file.
    pub fn to_toml(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unspecified_glyphs() {
        let base = RenderStyle::default();
        let overlay = RawRenderStyle {
            branch: Some("+- ".into()),
            ..Default::default()
        };

        let merged = base.merge(&overlay);
        assert_eq!(merged.branch, "+- ");
        assert_eq!(merged.last_branch, base.last_branch);
        assert_eq!(merged.vertical, base.vertical);
    }

    #[test]
    fn test_to_toml_contains_render_section() {
        let toml = Settings::default().to_toml().unwrap();
        assert!(toml.contains("[render]"));
        assert!(toml.contains("last_branch"));
    }
}
