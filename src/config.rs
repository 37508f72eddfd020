use chrono::Weekday;
use serde::Deserialize;
use serde_with::{serde_as, DisplayFromStr};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind, Result};
use crate::holidays::DEFAULT_FRIDAY_LABEL;
use crate::keyboard::Markers;

const CONFIG_PATH_ENV_VAR: &str = "TAQVIM_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("taqvim").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".taqvim.toml"));
    }

    locations
}

#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Token prefix of this calendar instance.
    pub prefix: String,
    /// JSON file with `{"YYYY/M/D": "label"}` entries.
    pub holidays: Option<PathBuf>,
    #[serde_as(as = "DisplayFromStr")]
    pub first_weekday: Weekday,
    pub holiday_marker: String,
    pub today_marker: String,
    pub friday_label: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            prefix: "calendar".to_owned(),
            holidays: None,
            first_weekday: Weekday::Sat,
            holiday_marker: "🔴".to_owned(),
            today_marker: "*".to_owned(),
            friday_label: DEFAULT_FRIDAY_LABEL.to_owned(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Config> {
        Ok(toml::from_str(content)?)
    }

    /// Relative holiday paths are taken relative to the config file.
    pub fn from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content).map_err(|err| {
            Error::new(ErrorKind::Config, &format!("'{}': {}", path.display(), err))
        })?;

        config.holidays = config.holidays.map(|holidays| match path.parent() {
            Some(dir) if holidays.is_relative() => dir.join(holidays),
            _ => holidays,
        });

        Ok(config)
    }

    pub fn markers(&self) -> Markers {
        Markers::default()
            .holiday_symbol(&self.holiday_marker)
            .today_symbol(&self.today_marker)
    }
}

/// An explicit path has to exist; otherwise the first existing default
/// location is used, falling back to built-in defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|candidate| candidate.is_file())
    {
        Some(found) => {
            log::info!("Using config file '{}'", found.display());
            Config::from_file(&found)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}
