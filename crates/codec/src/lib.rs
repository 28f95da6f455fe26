//! Wire format for tag blobs.
//!
//! A location's tags are packed into the single string a comment slot holds.
//! The format is line oriented so a blob stays readable when the host shows
//! it as a plain comment.
//!
//! # Format, version 1
//!
//! ```text
//! [note] "check this later"
//! [refs] 3
//! [seen by\]me] [true,0.5,"x"]
//! ```
//!
//! - One record per line, `[<name>] <json>`, in ascending name order.
//! - Inside `<name>`, a backslash is written `\\` and a closing bracket `\]`.
//! - `<json>` is compact JSON: a string, an integer, a float (always written
//!   with a fraction or exponent so it decodes as a float), a boolean, or an
//!   array of these.
//! - Blank lines are ignored. Lines starting with `@` are directives reserved
//!   for later versions; version 1 skips them, so newer blobs that only add
//!   directives stay readable.
//!
//! Anything else (null, objects, out-of-range integers, duplicate names, or a
//! line that is not a record) makes the whole blob corrupt. Corrupt blobs
//! decode as empty: a person may have typed a free-text comment into the slot.

mod error;
mod key;


pub use error::{CodecError, CorruptKind, CorruptTagData};
use marginalia_primitives::{TagMap, TagValue, validate_name};
use serde_json::Value;

/// Default upper bound on an encoded blob, in bytes.
pub const DEFAULT_MAX_LEN: usize = 1024;

/// Encodes a mapping, failing rather than truncating if it exceeds `max_len` bytes.
///
/// An empty mapping encodes as the empty string.
pub fn encode(tags: &TagMap, max_len: usize) -> Result<String, CodecError> {
	let mut out = String::new();
	for (name, value) in tags {
		validate_name(name).map_err(|source| CodecError::InvalidKey {
			key: name.clone(),
			source,
		})?;
		let json = value.to_json().map_err(|source| CodecError::UnsupportedValue {
			key: name.clone(),
			source,
		})?;

		if !out.is_empty() {
			out.push('\n');
		}
		out.push('[');
		key::escape_into(name, &mut out);
		out.push_str("] ");
		out.push_str(&json.to_string());
	}

	if out.len() > max_len {
		return Err(CodecError::EncodingTooLarge { len: out.len(), max: max_len });
	}
	Ok(out)
}

/// Decodes a blob, reporting why a malformed one was rejected.
pub fn try_decode(text: &str) -> Result<TagMap, CorruptTagData> {
	let mut tags = TagMap::new();
	for (index, line) in text.lines().enumerate() {
		if line.trim().is_empty() || line.starts_with('@') {
			continue;
		}
		let corrupt = |kind| CorruptTagData { line: index + 1, kind };

		let (name, json) = key::split_record(line).map_err(corrupt)?;
		validate_name(&name).map_err(|e| corrupt(CorruptKind::Name(e)))?;
		let json: Value = serde_json::from_str(json).map_err(|e| corrupt(CorruptKind::Json(e.to_string())))?;
		let value = TagValue::try_from(json).map_err(|e| corrupt(CorruptKind::Value(e)))?;

		if tags.contains_key(&name) {
			return Err(corrupt(CorruptKind::Duplicate(name)));
		}
		tags.insert(name, value);
	}
	Ok(tags)
}

/// Decodes a blob, treating a malformed one as empty.
///
/// Missing and empty blobs decode to an empty mapping without a log entry.
/// The warning carries no location; callers that know where the blob came
/// from use [`try_decode`] and log the failure with that context.
pub fn decode(text: &str) -> TagMap {
	match try_decode(text) {
		Ok(tags) => tags,
		Err(error) => {
			tracing::warn!(%error, "corrupt tag data; decoding as empty");
			TagMap::new()
		}
	}
}
