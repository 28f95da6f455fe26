//! Errors surfaced by tag operations.
//!
//! Data-quality problems found while reading (corrupt blobs, slot conflicts,
//! stale index entries) are not errors: they are logged and the read
//! degrades to a best-effort answer.

use marginalia_codec::CodecError;
use marginalia_host::HostError;
use marginalia_primitives::Ea;
use thiserror::Error;

/// Errors returned by [`TagDatabase`](crate::TagDatabase) operations.
#[derive(Debug, Error)]
pub enum TagError {
	/// The value (or name) cannot be stored under this tag.
	#[error("invalid value for tag {key:?}: {reason}")]
	InvalidValue { key: String, reason: String },

	#[error("tag {key:?} not found at {ea}")]
	TagNotFound { ea: Ea, key: String },

	/// The encoded blob would not fit in the comment slot. Nothing was written.
	#[error("tags at {ea} encode to {len} bytes, the comment slot holds {max}")]
	EncodingTooLarge { ea: Ea, len: usize, max: usize },

	#[error("address {0} is outside the database")]
	OutOfBounds(Ea),

	#[error("no function contains {0}")]
	FunctionNotFound(Ea),

	/// An extra comment block has more lines than the host supports.
	#[error("extra comment at {ea} has {lines} lines, at most {max} are supported")]
	ExtraTooLong { ea: Ea, lines: usize, max: usize },

	#[error(transparent)]
	Host(#[from] HostError),

	/// An index record could not be serialized.
	#[error("failed to encode index record: {0}")]
	IndexEncoding(#[from] postcard::Error),
}

impl TagError {
	pub(crate) fn invalid(key: &str, reason: impl ToString) -> Self {
		TagError::InvalidValue {
			key: key.to_string(),
			reason: reason.to_string(),
		}
	}

	pub(crate) fn not_found(ea: Ea, key: &str) -> Self {
		TagError::TagNotFound {
			ea,
			key: key.to_string(),
		}
	}

	pub(crate) fn from_codec(ea: Ea, error: CodecError) -> Self {
		match error {
			CodecError::EncodingTooLarge { len, max } => TagError::EncodingTooLarge { ea, len, max },
			CodecError::InvalidKey { key, source } => TagError::invalid(&key, source),
			CodecError::UnsupportedValue { key, source } => TagError::invalid(&key, source),
		}
	}

	/// Returns true for [`TagError::TagNotFound`].
	pub fn is_not_found(&self) -> bool {
		matches!(self, TagError::TagNotFound { .. })
	}
}

/// Result type for tag operations.
pub type Result<T> = std::result::Result<T, TagError>;
