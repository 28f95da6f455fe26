//! Tags attached to a whole function.
//!
//! Stored in the repeatable comment of the function entry and recorded in the
//! global index under the entry address.

use marginalia_host::Host;
use marginalia_primitives::{Ea, Function, Slot, TagMap, TagValue};

use crate::database::TagDatabase;
use crate::error::{Result, TagError};
use crate::implicit::{self, ImplicitKey};
use crate::index::IndexKind;

/// Slot holding function tags.
pub const FUNCTION_SLOT: Slot = Slot::Repeatable;

const FUNCTION_IMPLICIT: [ImplicitKey; 2] = [ImplicitKey::Name, ImplicitKey::Color];

impl<H: Host> TagDatabase<H> {
	/// Returns the function containing `ea`.
	pub fn function_of(&self, ea: Ea) -> Result<Function> {
		self.check(ea)?;
		self.host.function_at(ea).ok_or(TagError::FunctionNotFound(ea))
	}

	/// Returns the tags of the function containing `ea`, with its name and
	/// color.
	pub fn function_tags(&self, ea: Ea) -> Result<TagMap> {
		let entry = self.function_of(ea)?.start;
		let mut tags = self.read_slot(entry, FUNCTION_SLOT);
		implicit::overlay(&self.host, entry, &FUNCTION_IMPLICIT, &mut tags);
		Ok(tags)
	}

	pub fn function_tag(&self, ea: Ea, key: &str) -> Result<TagValue> {
		let entry = self.function_of(ea)?.start;
		function_implicit(key)?;
		self.function_tags(ea)?
			.remove(key)
			.ok_or_else(|| TagError::not_found(entry, key))
	}

	/// Sets a tag on the function containing `ea`, returning the value it
	/// replaced.
	pub fn set_function_tag(&mut self, ea: Ea, key: &str, value: impl Into<TagValue>) -> Result<Option<TagValue>> {
		let entry = self.function_of(ea)?.start;
		let value = value.into();
		if let Some(implicit) = function_implicit(key)? {
			return implicit.write(&mut self.host, entry, value);
		}
		self.write_tag(entry, FUNCTION_SLOT, IndexKind::Global, None, key, value)
	}

	/// Removes a tag from the function containing `ea`, returning its value.
	pub fn delete_function_tag(&mut self, ea: Ea, key: &str) -> Result<TagValue> {
		let entry = self.function_of(ea)?.start;
		if let Some(implicit) = function_implicit(key)? {
			return implicit.clear(&mut self.host, entry);
		}
		self.remove_tag(entry, FUNCTION_SLOT, IndexKind::Global, None, key)
	}
}

/// Extra comments belong to items, not functions.
fn function_implicit(key: &str) -> Result<Option<ImplicitKey>> {
	match ImplicitKey::parse(key) {
		Some(implicit) if !implicit.applies_to_functions() => {
			Err(TagError::invalid(key, "not available on function tags"))
		}
		other => Ok(other),
	}
}
