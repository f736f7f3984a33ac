use std::{env, path::PathBuf};

use crate::player::parse_hex_color;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `ZENSYNC__`), over the struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("ZENSYNC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        let w = &self.waveform;
        for (name, value) in [
            ("wave_top", &w.wave_top),
            ("wave_bottom", &w.wave_bottom),
            ("progress_top", &w.progress_top),
            ("progress_bottom", &w.progress_bottom),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(format!("waveform.{name} must be a #RRGGBB color, got {value:?}"));
            }
        }
        if !(0.0..=1.0).contains(&w.split) {
            return Err("waveform.split must be between 0 and 1".to_string());
        }
        if w.bar_width == 0 {
            return Err("waveform.bar_width must be >= 1".to_string());
        }
        if w.height == 0 {
            return Err("waveform.height must be >= 1".to_string());
        }
        if w.resolution == 0 {
            return Err("waveform.resolution must be >= 1".to_string());
        }
        if self.source.location.trim().is_empty() {
            return Err("source.location must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `ZENSYNC_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("ZENSYNC_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/zensync/config.toml`
/// or `~/.config/zensync/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("zensync").join("config.toml"))
}

/// Default log directory under `$XDG_STATE_HOME/zensync/logs` or
/// `~/.local/state/zensync/logs`.
pub fn default_log_dir() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join("zensync").join("logs"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
