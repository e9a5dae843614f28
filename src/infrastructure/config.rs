//! Configuration loading
//!
//! The embedded `.config/config.json5` supplies defaults for every setting.
//! A user config file in the platform config directory is layered on top,
//! table by table, so a sparse user file only overrides what it names.

use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;

use crate::presentation::config::keybindings::KeyBindings;
use crate::presentation::config::styles::Styles;
use crate::utils;

const CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub _data_dir: PathBuf,
    #[serde(default)]
    pub _config_dir: PathBuf,
}

/// Requested page length for each list surface
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageSizes {
    pub feed: u32,
    pub directory: u32,
    pub blacklist: u32,
    pub people: u32,
    pub comments: u32,
}

impl Default for PageSizes {
    fn default() -> Self {
        Self {
            feed: 8,
            directory: 10,
            blacklist: 12,
            people: 16,
            comments: 20,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub page_sizes: PageSizes,
    #[serde(default)]
    pub keybindings: KeyBindings,
    #[serde(default)]
    pub styles: Styles,
}

impl Default for Config {
    // The embedded config ships with the binary; failing to parse it is a
    // build defect, not a runtime condition.
    fn default() -> Self {
        json5::from_str(CONFIG).expect("embedded default config must parse")
    }
}

impl Config {
    pub fn new() -> Result<Self, ConfigError> {
        let default_config = Self::default();
        let data_dir = utils::paths::get_data_dir();
        let config_dir = utils::paths::get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            builder = builder.add_source(
                config::File::from(config_dir.join(file))
                    .format(*format)
                    .required(false),
            );
            if config_dir.join(file).exists() {
                found_config = true
            }
        }
        if !found_config {
            log::info!("no user configuration file found, using defaults");
            return Ok(default_config);
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        // Sparse user tables fall back to the shipped defaults per entry
        for (mode, default_bindings) in default_config.keybindings.iter() {
            let user_bindings = cfg.keybindings.entry(*mode).or_default();
            for (key, action) in default_bindings.iter() {
                user_bindings.entry(key.clone()).or_insert(*action);
            }
        }
        for (section, default_styles) in default_config.styles.iter() {
            let user_styles = cfg.styles.entry(section.clone()).or_default();
            for (name, style) in default_styles.iter() {
                user_styles.entry(name.clone()).or_insert(*style);
            }
        }

        if cfg.base_url.is_empty() {
            cfg.base_url.clone_from(&default_config.base_url);
        }

        Ok(cfg)
    }
}
