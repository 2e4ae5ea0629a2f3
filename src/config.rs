use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::layout::LayoutMetrics;
use crate::locale::{Locale, WeekDisplay};
use crate::zoom::ZoomLevel;

const APP_DIR: &str = "yearwheel_gantt";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("failed to parse config {path}: {source}")]
	Toml {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},
}

/// Presentation defaults read from `config.toml`.
///
/// ```toml
/// locale = "sv"
/// week_display = "range"
/// container_width = 1400
/// zoom = "week"
///
/// [layout]
/// row_height = 32
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GanttConfig {
	pub locale: Locale,
	pub week_display: WeekDisplay,
	pub container_width: f64,
	pub zoom: ZoomLevel,
	pub layout: LayoutMetrics,
}

impl Default for GanttConfig {
	fn default() -> Self {
		Self {
			locale: Locale::default(),
			week_display: WeekDisplay::default(),
			container_width: 1000.0,
			zoom: ZoomLevel::default(),
			layout: LayoutMetrics::default(),
		}
	}
}

/// Loads the configuration at `path`. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<GanttConfig, ConfigError> {
	let raw = match fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(err) if err.kind() == ErrorKind::NotFound => {
			tracing::debug!(path = %path.display(), "no config file, using defaults");
			return Ok(GanttConfig::default());
		}
		Err(source) => {
			return Err(ConfigError::Io {
				path: path.to_path_buf(),
				source,
			});
		}
	};

	toml::from_str(&raw).map_err(|source| ConfigError::Toml {
		path: path.to_path_buf(),
		source,
	})
}

/// Flag, then `YEARWHEEL_CONFIG`, then the user config directory.
pub fn resolve_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
	if let Some(path) = cli_path {
		return Some(path);
	}

	if let Some(path) = env::var_os("YEARWHEEL_CONFIG") {
		let path = PathBuf::from(path);
		if !path.as_os_str().is_empty() {
			return Some(path);
		}
	}

	config_dir().map(|dir| dir.join(CONFIG_FILE))
}

fn config_dir() -> Option<PathBuf> {
	#[cfg(target_os = "windows")]
	{
		if let Some(path) = env::var_os("APPDATA") {
			return Some(PathBuf::from(path).join(APP_DIR));
		}
	}

	if let Some(path) = env::var_os("XDG_CONFIG_HOME") {
		return Some(PathBuf::from(path).join(APP_DIR));
	}

	env::var_os("HOME").map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
}

#[cfg(test)]
mod tests {
	use std::fs;
	use std::path::PathBuf;

	use crate::locale::{Locale, WeekDisplay};
	use crate::zoom::ZoomLevel;

	use super::{ConfigError, GanttConfig, load_config, resolve_config_path};

	#[test]
	fn partial_file_keeps_remaining_defaults() {
		let path = temp_file("yearwheel_config_partial.toml");
		fs::write(
			&path,
			"locale = \"en\"\nweek_display = \"range\"\nzoom = \"week\"\n\n[layout]\nrow_height = 32.0\n",
		)
		.expect("write config");

		let config = load_config(&path).expect("config should parse");
		assert_eq!(config.locale, Locale::En);
		assert_eq!(config.week_display, WeekDisplay::Range);
		assert_eq!(config.zoom, ZoomLevel::Week);
		assert_eq!(config.container_width, 1000.0);
		assert_eq!(config.layout.row_height, 32.0);
		assert_eq!(config.layout.header_height, 36.0);
		let _ = fs::remove_file(path);
	}

	#[test]
	fn missing_file_means_defaults() {
		let path = temp_file("yearwheel_config_missing.toml");
		let _ = fs::remove_file(&path);
		assert_eq!(load_config(&path).expect("defaults"), GanttConfig::default());
	}

	#[test]
	fn malformed_file_is_an_error() {
		let path = temp_file("yearwheel_config_broken.toml");
		fs::write(&path, "zoom = \"hour\"\n").expect("write config");
		assert!(matches!(load_config(&path), Err(ConfigError::Toml { .. })));
		let _ = fs::remove_file(path);
	}

	#[test]
	fn explicit_path_wins() {
		let explicit = PathBuf::from("/tmp/explicit.toml");
		assert_eq!(resolve_config_path(Some(explicit.clone())), Some(explicit));
	}

	fn temp_file(name: &str) -> PathBuf {
		let mut path = std::env::temp_dir();
		path.push(format!("{}_{}", name, std::process::id()));
		path
	}
}
