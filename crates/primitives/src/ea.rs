use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An address inside the analyzed database.
///
/// Displays as lowercase hex with a `0x` prefix, which is also the form
/// every log line uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ea(pub u64);

impl Ea {
	/// Wraps a raw address.
	pub const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw address.
	#[inline]
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl From<u64> for Ea {
	fn from(raw: u64) -> Self {
		Self(raw)
	}
}

impl fmt::Display for Ea {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

impl fmt::LowerHex for Ea {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::LowerHex::fmt(&self.0, f)
	}
}

/// Error parsing an address from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid address {input:?}: {reason}")]
pub struct ParseEaError {
	/// The rejected input.
	pub input: String,
	/// Why it was rejected.
	pub reason: std::num::ParseIntError,
}

impl FromStr for Ea {
	type Err = ParseEaError;

	/// Accepts `0x`-prefixed hex or plain decimal.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let trimmed = s.trim();
		let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
			Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
			None => trimmed.replace('_', "").parse::<u64>(),
		};
		parsed.map(Ea).map_err(|reason| ParseEaError {
			input: s.to_string(),
			reason,
		})
	}
}

/// The extent of a function body, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Function {
	/// Entry address. Function-level tags are keyed by it.
	pub start: Ea,
	/// One past the last byte of the body.
	pub end: Ea,
}

impl Function {
	/// Creates a function extent.
	pub fn new(start: impl Into<Ea>, end: impl Into<Ea>) -> Self {
		Self {
			start: start.into(),
			end: end.into(),
		}
	}

	/// Returns true if `ea` lies within the body.
	#[inline]
	pub fn contains(&self, ea: Ea) -> bool {
		self.start <= ea && ea < self.end
	}

	/// Returns true if `other` shares at least one address with this body.
	pub fn overlaps(&self, other: &Function) -> bool {
		self.start < other.end && other.start < self.end
	}

	/// Returns true if `ea` is the entry address.
	#[inline]
	pub fn is_entry(&self, ea: Ea) -> bool {
		self.start == ea
	}
}
