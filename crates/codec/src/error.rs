use marginalia_primitives::{NameError, ValueError};
use thiserror::Error;

/// A mapping that cannot be written to a comment slot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
	/// The encoded blob does not fit in the slot.
	#[error("encoded tags take {len} bytes, the slot holds {max}")]
	EncodingTooLarge { len: usize, max: usize },
	#[error("tag name {key:?} cannot be encoded: {source}")]
	InvalidKey { key: String, source: NameError },
	#[error("value of tag {key:?} cannot be encoded: {source}")]
	UnsupportedValue { key: String, source: ValueError },
}

/// A comment slot whose content is not a tag blob.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("corrupt tag data at line {line}: {kind}")]
pub struct CorruptTagData {
	/// 1-based line of the first bad record.
	pub line: usize,
	pub kind: CorruptKind,
}

/// What was wrong with a corrupt record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CorruptKind {
	#[error("line is not a `[name] value` record")]
	NotARecord,
	#[error("tag name is missing its closing bracket")]
	UnterminatedName,
	#[error("invalid escape {0:?} in tag name")]
	BadEscape(Option<char>),
	#[error("expected a space after the tag name")]
	MissingSeparator,
	#[error("{0}")]
	Name(NameError),
	#[error("malformed value: {0}")]
	Json(String),
	#[error("{0}")]
	Value(ValueError),
	#[error("tag {0:?} appears more than once")]
	Duplicate(String),
}
