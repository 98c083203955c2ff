use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

/// Runtime configuration for the snowflake animation.
#[derive(Clone)]
pub struct SnowConfig {
    pub time_step: f32,
    pub seed: Option<u64>,
}

/// Optional defaults read from the user config dir. A missing or malformed
/// file degrades to the built-in defaults.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub viz: VizSettings,
}

#[derive(Debug, Default, Deserialize)]
pub struct VizSettings {
    pub time_step: Option<f32>,
}

impl Settings {
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("termflake")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn parses_partial_settings() {
        let settings: Settings = toml::from_str("[viz]\ntime_step = 0.25\n").unwrap();
        assert_eq!(settings.viz.time_step, Some(0.25));
    }

    #[test]
    fn empty_settings_fall_back_to_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert!(settings.viz.time_step.is_none());
    }
}
