//! Command-line configuration.
//!
//! ```toml
//! database = "firmware.json"
//!
//! [log]
//! filter = "marginalia_tags=debug,info"
//! file = "marginalia.log"
//!
//! [tags]
//! max-blob-len = 2048
//! ```

use std::path::{Path, PathBuf};

use marginalia_tags::{ConfigError, TagConfig};
use serde::{Deserialize, Serialize};

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "marginalia.toml";

/// Snapshot used when neither `--database` nor the config names one.
pub const DEFAULT_DATABASE: &str = "marginalia.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
	/// Snapshot to operate on.
	pub database: Option<PathBuf>,
	pub log: LogConfig,
	pub tags: TagConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// `EnvFilter` directives. `MARGINALIA_LOG` takes precedence.
	pub filter: Option<String>,
	/// Append logs here instead of writing them to stderr.
	pub file: Option<PathBuf>,
}

impl CliConfig {
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	/// Loads `explicit`, or [`DEFAULT_CONFIG`] from `dir` if it exists, or
	/// the defaults.
	pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
		if let Some(path) = explicit {
			return Self::load(path);
		}
		let fallback = dir.join(DEFAULT_CONFIG);
		if fallback.is_file() {
			Self::load(&fallback)
		} else {
			Ok(Self::default())
		}
	}
}
