use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ea::{Ea, Function};

/// One of the two comment fields every location carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Slot {
	/// Shown at every reference to the location.
	Repeatable,
	/// Shown only at the location itself.
	NonRepeatable,
}

impl Slot {
	/// Returns the opposite slot.
	#[inline]
	pub fn other(self) -> Slot {
		match self {
			Slot::Repeatable => Slot::NonRepeatable,
			Slot::NonRepeatable => Slot::Repeatable,
		}
	}

	/// Returns true for [`Slot::Repeatable`].
	#[inline]
	pub fn is_repeatable(self) -> bool {
		matches!(self, Slot::Repeatable)
	}

	/// Returns the slot's display name.
	pub fn name(self) -> &'static str {
		match self {
			Slot::Repeatable => "repeatable",
			Slot::NonRepeatable => "non-repeatable",
		}
	}
}

impl fmt::Display for Slot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// The index a location's tags are recorded in.
///
/// Locations inside a function body belong to that function's contents;
/// everything else is global.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
	/// Outside any function.
	Global,
	/// Inside the body of the given function.
	Contents(Function),
}

impl Scope {
	/// Derives the scope from the function containing a location, if any.
	pub fn of(function: Option<Function>) -> Self {
		match function {
			Some(f) => Scope::Contents(f),
			None => Scope::Global,
		}
	}

	/// Returns the containing function for [`Scope::Contents`].
	pub fn function(&self) -> Option<Function> {
		match self {
			Scope::Global => None,
			Scope::Contents(f) => Some(*f),
		}
	}

	/// Returns the entry address of the containing function.
	pub fn owner(&self) -> Option<Ea> {
		self.function().map(|f| f.start)
	}
}

impl fmt::Display for Scope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Scope::Global => f.write_str("global"),
			Scope::Contents(func) => write!(f, "contents({})", func.start),
		}
	}
}
