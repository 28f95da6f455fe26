//! Engine configuration.
//!
//! Read from TOML. Every field has a default, so an empty file (or no file)
//! is a valid configuration:
//!
//! ```toml
//! max-blob-len = 1024
//! anchor = 0xff000000
//! verify-on-open = false
//! ```

use std::path::{Path, PathBuf};

use marginalia_primitives::Ea;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Node holding the per-scope count tables unless configured otherwise.
pub const DEFAULT_ANCHOR: Ea = Ea(0xFF00_0000);

/// Tunables for a [`TagDatabase`](crate::TagDatabase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TagConfig {
	/// Largest encoded tag blob a comment slot accepts, in bytes.
	pub max_blob_len: usize,
	/// Scratch-store node holding the name → count tables.
	pub anchor: Ea,
	/// Audit the indices when the database is opened and log any drift.
	pub verify_on_open: bool,
}

impl Default for TagConfig {
	fn default() -> Self {
		Self {
			max_blob_len: marginalia_codec::DEFAULT_MAX_LEN,
			anchor: DEFAULT_ANCHOR,
			verify_on_open: false,
		}
	}
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("I/O error reading {path}: {error}")]
	Io { path: PathBuf, error: std::io::Error },

	#[error("TOML parse error: {0}")]
	Parse(#[from] toml::de::Error),
}

impl TagConfig {
	/// Parses a TOML document.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(input)?)
	}

	/// Loads a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}
}
