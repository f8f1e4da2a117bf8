//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/coursecat/coursecat.toml`
//! 3. Local config: `<data_dir>/.coursecat.toml`
//! 4. Environment variables: `COURSECAT_*` prefix
//!
//! Command-line flags are applied on top by the CLI.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// How a catalog is printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CatalogView {
    /// One course per line in label order
    #[default]
    List,
    /// Preorder listing indented by depth
    Indent,
    /// Box-drawing tree of labels
    Tree,
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub extension: Option<String>,
    pub academy_a: Option<String>,
    pub academy_b: Option<String>,
    pub view: Option<CatalogView>,
}

/// Unified configuration for coursecat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory searched for catalogs given by bare name (default: current directory)
    pub data_dir: PathBuf,
    /// Extension appended to bare catalog names (default: txt)
    pub extension: String,
    /// Display name of the first academy, used to disambiguate renamed courses
    pub academy_a: String,
    /// Display name of the second academy
    pub academy_b: String,
    /// Default output view
    pub view: CatalogView,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            extension: "txt".into(),
            academy_a: "AcademyA".into(),
            academy_b: "AcademyB".into(),
            view: CatalogView::default(),
        }
    }
}

/// Get the XDG config directory for coursecat.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "coursecat").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("coursecat.toml"))
}

/// Get the path to the local config file in a data directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".coursecat.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; unknown variables leave the input untouched.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_dir.to_string_lossy().as_ref());
        self.data_dir = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            extension: overlay
                .extension
                .clone()
                .unwrap_or_else(|| self.extension.clone()),
            academy_a: overlay
                .academy_a
                .clone()
                .unwrap_or_else(|| self.academy_a.clone()),
            academy_b: overlay
                .academy_b
                .clone()
                .unwrap_or_else(|| self.academy_b.clone()),
            view: overlay.view.unwrap_or(self.view),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.coursecat.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply COURSECAT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("COURSECAT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("extension") {
            settings.extension = val;
        }
        if let Ok(val) = config.get_string("academy_a") {
            settings.academy_a = val;
        }
        if let Ok(val) = config.get_string("academy_b") {
            settings.academy_b = val;
        }
        match config.get::<CatalogView>("view") {
            Ok(val) => settings.view = val,
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => {
                return Err(ApplicationError::Config {
                    message: format!("COURSECAT_VIEW: {e}"),
                })
            }
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# coursecat configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/coursecat/coursecat.toml
#   Local:  <data_dir>/.coursecat.toml
#   Env:    COURSECAT_* environment variables

# Directory searched for catalogs given by bare name
# data_dir = "~/academies"

# Extension appended to bare catalog names
# extension = "txt"

# Academy names appended to courses renamed by the added offer
# academy_a = "AcademyA"
# academy_b = "AcademyB"

# Default view: list, indent or tree
# view = "list"
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
