//! Primitives the analysis database provides to the tag engine.
//!
//! The engine never talks to a concrete disassembler. It consumes four small
//! capabilities, each a trait here, and [`Host`] bundles them with the
//! database bounds:
//!
//! - [`Comments`]: the repeatable and non-repeatable comment of a location.
//! - [`Functions`]: which function body, if any, contains a location.
//! - [`SupStore`]: persistent per-node scratch storage keyed by small
//!   integer indices, walkable in address order.
//! - [`Attributes`]: symbol name and item color.
//!
//! [`MemoryDatabase`] implements all of them in memory and is what the test
//! suites and the command-line tool run against.

mod error;
pub mod memory;

use marginalia_primitives::{Ea, Function, Slot};

pub use error::{HostError, Result};
pub use memory::MemoryDatabase;

/// Index into a node's scratch storage.
pub type SupIndex = u32;

/// Comment slots of each location.
pub trait Comments {
	/// Returns the comment in `slot`, or `None` if it is empty.
	fn comment(&self, ea: Ea, slot: Slot) -> Option<String>;

	/// Replaces the comment in `slot`. An empty string clears it.
	fn set_comment(&mut self, ea: Ea, slot: Slot, text: &str) -> Result<()>;

	/// Returns the first location after `after` (or the first overall) that
	/// has a comment in either slot.
	fn comment_next(&self, after: Option<Ea>) -> Option<Ea>;
}

/// Function membership.
pub trait Functions {
	/// Returns the function whose body contains `ea`.
	fn function_at(&self, ea: Ea) -> Option<Function>;

	/// Returns every function, ordered by entry address.
	fn functions(&self) -> Vec<Function>;

	fn is_within_function(&self, ea: Ea) -> bool {
		self.function_at(ea).is_some()
	}
}

/// Persistent scratch storage, one small table per node.
///
/// Nodes are addresses or reserved anchor values; the store does not care
/// which.
pub trait SupStore {
	fn sup(&self, node: Ea, index: SupIndex) -> Option<Vec<u8>>;

	fn set_sup(&mut self, node: Ea, index: SupIndex, value: &[u8]) -> Result<()>;

	/// Removes a value, returning whether one was present.
	fn remove_sup(&mut self, node: Ea, index: SupIndex) -> bool;

	/// Returns the first node after `after` (or the first overall) holding a
	/// value at `index`.
	fn sup_next(&self, index: SupIndex, after: Option<Ea>) -> Option<Ea>;
}

/// Per-location attributes backing the implicit tags.
pub trait Attributes {
	/// Returns the user-defined name at `ea`. Names the host generated
	/// itself are not reported.
	fn name(&self, ea: Ea) -> Option<String>;

	/// Sets or (with `None`) removes the name at `ea`. `listed` publishes the
	/// name in the host's name list.
	fn set_name(&mut self, ea: Ea, name: Option<&str>, listed: bool) -> Result<()>;

	/// Returns the raw `0xBBGGRR` item color, [`DEFCOLOR`] when unset.
	///
	/// [`DEFCOLOR`]: marginalia_primitives::DEFCOLOR
	fn item_color(&self, ea: Ea) -> u32;

	fn set_item_color(&mut self, ea: Ea, raw: u32) -> Result<()>;
}

/// A database the tag engine can run against.
pub trait Host: Comments + Functions + SupStore + Attributes {
	/// Returns the half-open address range `[min, max)` of the database.
	fn bounds(&self) -> (Ea, Ea);

	fn contains(&self, ea: Ea) -> bool {
		let (min, max) = self.bounds();
		min <= ea && ea < max
	}
}
