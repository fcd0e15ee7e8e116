//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/flavortree/flavortree.toml`
//! 3. Local config: `<project_dir>/.flavortree.toml`
//! 4. Environment variables: `FLAVORTREE_*` prefix

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::util::path::{expand_env_vars, resolve_path};

/// One tag-picker widget: which taxonomy it offers and whether badges keep a manual order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetConfig {
    /// Taxonomy document (`.json` or `.toml`)
    pub taxonomy: PathBuf,
    /// Keep a user-arrangeable badge order (default: true)
    #[serde(default = "default_ordered")]
    pub ordered: bool,
}

fn default_ordered() -> bool {
    true
}

/// Raw widget entry for intermediate parsing, fields left out inherit from the lower layer.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawWidgetConfig {
    pub taxonomy: Option<PathBuf>,
    pub ordered: Option<bool>,
}

/// Raw settings for intermediate parsing (all fields Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub prune_self_named_children: Option<bool>,
    pub widgets: BTreeMap<String, RawWidgetConfig>,
}

/// Unified configuration for flavortree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Where widget selections are stored (default: ~/.flavortree)
    pub data_dir: PathBuf,
    /// Drop children that repeat their parent's name when building a taxonomy
    pub prune_self_named_children: bool,
    /// Configured widgets by name
    pub widgets: BTreeMap<String, WidgetConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: dirs_default_data_dir(),
            prune_self_named_children: true,
            widgets: BTreeMap::new(),
        }
    }
}

/// Get the default data directory (~/.flavortree).
fn dirs_default_data_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".flavortree"))
        .unwrap_or_else(|| PathBuf::from("~/.flavortree"))
}

/// Get the XDG config directory for flavortree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flavortree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("flavortree.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".flavortree.toml")
}

/// Load a TOML file into RawSettings for manual merging.
///
/// Relative taxonomy paths are resolved against the file's directory.
pub fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    let mut raw: RawSettings = toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    for widget in raw.widgets.values_mut() {
        if let Some(taxonomy) = widget.taxonomy.take() {
            widget.taxonomy = Some(resolve_path(&taxonomy, base));
        }
    }
    Ok(raw)
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = PathBuf::from(expand_env_vars(&self.data_dir.to_string_lossy()));
        for widget in self.widgets.values_mut() {
            widget.taxonomy = PathBuf::from(expand_env_vars(&widget.taxonomy.to_string_lossy()));
        }
    }

    /// Overlay a raw layer onto self.
    ///
    /// - Scalars: overlay wins if Some
    /// - Widgets: merged by name, a new widget needs a taxonomy
    pub fn merge_with(&self, overlay: &RawSettings) -> Result<Self, ApplicationError> {
        let mut widgets = self.widgets.clone();
        for (name, raw) in &overlay.widgets {
            let merged = match (widgets.get(name), &raw.taxonomy) {
                (Some(base), taxonomy) => WidgetConfig {
                    taxonomy: taxonomy.clone().unwrap_or_else(|| base.taxonomy.clone()),
                    ordered: raw.ordered.unwrap_or(base.ordered),
                },
                (None, Some(taxonomy)) => WidgetConfig {
                    taxonomy: taxonomy.clone(),
                    ordered: raw.ordered.unwrap_or_else(default_ordered),
                },
                (None, None) => {
                    return Err(ApplicationError::Config {
                        message: format!("widget '{}' has no taxonomy", name),
                    })
                }
            };
            widgets.insert(name.clone(), merged);
        }

        Ok(Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            prune_self_named_children: overlay
                .prune_self_named_children
                .unwrap_or(self.prune_self_named_children),
            widgets,
        })
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional directory holding a local `.flavortree.toml`
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|path| path.exists());
        let local = project_dir
            .map(local_config_path)
            .filter(|path| path.exists());
        Self::load_from(global.as_deref(), local.as_deref())
    }

    /// Load settings from explicit global and local files, then apply env overrides.
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        for path in [global, local].into_iter().flatten() {
            debug!("loading config layer {}", path.display());
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw)?;
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Apply FLAVORTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FLAVORTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_bool("prune_self_named_children") {
            settings.prune_self_named_children = val;
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
        r#"# flavortree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/flavortree/flavortree.toml
#   Local:  <project_dir>/.flavortree.toml
#   Env:    FLAVORTREE_* environment variables

# Where widget selections are stored
# data_dir = "~/.flavortree"

# Drop taxonomy children that repeat their parent's name
# prune_self_named_children = true

# One table per widget; relative paths resolve against this file
# [widgets.flavor]
# taxonomy = "taxonomies/flavor.json"
# ordered = true
#
# [widgets.body]
# taxonomy = "taxonomies/body.toml"
# ordered = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_widget(taxonomy: Option<&str>, ordered: Option<bool>) -> RawWidgetConfig {
        RawWidgetConfig {
            taxonomy: taxonomy.map(PathBuf::from),
            ordered,
        }
    }

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load_from(None, None).expect("load defaults");
        assert!(settings.data_dir.to_string_lossy().contains(".flavortree"));
        assert!(settings.prune_self_named_children);
        assert!(settings.widgets.is_empty());
    }

    #[test]
    fn given_tilde_in_paths_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            data_dir: PathBuf::from("~/.flavortree"),
            prune_self_named_children: true,
            widgets: BTreeMap::from([(
                "flavor".to_string(),
                WidgetConfig {
                    taxonomy: PathBuf::from("~/wheel.json"),
                    ordered: true,
                },
            )]),
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.data_dir.to_string_lossy().starts_with(&home));
        assert!(settings.widgets["flavor"]
            .taxonomy
            .to_string_lossy()
            .starts_with(&home));
    }

    #[test]
    fn given_overlay_widget_when_merging_then_fields_inherit_by_name() {
        let base = Settings::default()
            .merge_with(&RawSettings {
                widgets: BTreeMap::from([(
                    "flavor".to_string(),
                    raw_widget(Some("/wheel.json"), Some(true)),
                )]),
                ..Default::default()
            })
            .expect("base layer");

        let merged = base
            .merge_with(&RawSettings {
                prune_self_named_children: Some(false),
                widgets: BTreeMap::from([
                    ("flavor".to_string(), raw_widget(None, Some(false))),
                    ("body".to_string(), raw_widget(Some("/body.toml"), None)),
                ]),
                ..Default::default()
            })
            .expect("overlay");

        assert!(!merged.prune_self_named_children);
        assert_eq!(merged.widgets["flavor"].taxonomy, PathBuf::from("/wheel.json"));
        assert!(!merged.widgets["flavor"].ordered);
        assert!(merged.widgets["body"].ordered);
    }

    #[test]
    fn given_new_widget_without_taxonomy_when_merging_then_config_error() {
        let result = Settings::default().merge_with(&RawSettings {
            widgets: BTreeMap::from([("ghost".to_string(), raw_widget(None, Some(true)))]),
            ..Default::default()
        });
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).expect("template parses");
        assert!(raw.widgets.is_empty());
    }
}
