//! Error types for host primitives.

use marginalia_primitives::{Ea, Function};
use thiserror::Error;

/// Failure of a host write primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
	/// The address lies outside the database.
	#[error("address {0} is outside the database")]
	OutOfBounds(Ea),

	/// The host refused a symbol name.
	#[error("invalid name {name:?} at {ea}")]
	InvalidName {
		/// Where the name was applied.
		ea: Ea,
		/// The rejected name.
		name: String,
	},

	/// A new function body would overlap an existing one.
	#[error("function {new_start}..{new_end} overlaps function at {existing}")]
	FunctionOverlap {
		new_start: Ea,
		new_end: Ea,
		existing: Ea,
	},

	/// A function extent is empty or reversed.
	#[error("function {start}..{end} is empty")]
	EmptyFunction { start: Ea, end: Ea },
}

impl HostError {
	pub(crate) fn overlap(new: Function, existing: Function) -> Self {
		HostError::FunctionOverlap {
			new_start: new.start,
			new_end: new.end,
			existing: existing.start,
		}
	}
}

/// Result type for host operations.
pub type Result<T> = std::result::Result<T, HostError>;
