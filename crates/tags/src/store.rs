//! Reading and writing the tags of a single location.

use std::collections::BTreeSet;

use marginalia_codec::{encode, try_decode};
use marginalia_host::Host;
use marginalia_primitives::{DEFCOLOR, Ea, Slot, TagMap, TagValue, validate_name};

use crate::database::TagDatabase;
use crate::error::{Result, TagError};
use crate::implicit::{self, ImplicitKey};
use crate::index::IndexKind;
use crate::slot::{Resolved, resolve, slot_for};

#[cfg(test)]
mod tests;

/// Rejects names and values that cannot be stored in a blob.
pub(crate) fn validate(key: &str, value: &TagValue) -> Result<()> {
	validate_name(key).map_err(|error| TagError::invalid(key, error))?;
	value.check().map_err(|error| TagError::invalid(key, error))
}

impl<H: Host> TagDatabase<H> {
	/// Decodes one comment slot. A corrupt blob is logged and reads as empty.
	pub(crate) fn read_slot(&self, ea: Ea, slot: Slot) -> TagMap {
		let Some(text) = self.host.comment(ea, slot) else {
			return TagMap::new();
		};
		try_decode(&text).unwrap_or_else(|error| {
			tracing::warn!(%ea, %slot, %error, "corrupt tag data; treating slot as empty");
			TagMap::new()
		})
	}

	/// Names stored in one slot's blob, as the indices record them.
	pub(crate) fn live_keys(&self, ea: Ea, slot: Slot) -> BTreeSet<String> {
		self.read_slot(ea, slot)
			.into_keys()
			.filter(|key| ImplicitKey::parse(key).is_none())
			.collect()
	}

	/// Returns every tag at `ea`, implicit tags included.
	///
	/// Both comment slots are read. When they share a name, the slot the
	/// location's scope writes to wins.
	pub fn tags(&self, ea: Ea) -> Result<TagMap> {
		let slot = slot_for(&self.scope(ea)?);
		let Resolved { mut tags, conflicts } = resolve(self.read_slot(ea, slot), self.read_slot(ea, slot.other()));
		if !conflicts.is_empty() {
			let keys: Vec<&str> = conflicts.iter().map(|c| c.key.as_str()).collect();
			tracing::info!(%ea, ?keys, kept = %slot, "both comment slots hold the same tags; keeping the canonical values");
		}
		implicit::overlay(&self.host, ea, &ImplicitKey::ALL, &mut tags);
		Ok(tags)
	}

	/// Returns one tag at `ea`.
	pub fn tag(&self, ea: Ea, key: &str) -> Result<TagValue> {
		self.tags(ea)?.remove(key).ok_or_else(|| TagError::not_found(ea, key))
	}

	/// Sets a tag, returning the value it replaced.
	pub fn set_tag(&mut self, ea: Ea, key: &str, value: impl Into<TagValue>) -> Result<Option<TagValue>> {
		let scope = self.scope(ea)?;
		let value = value.into();
		if let Some(implicit) = ImplicitKey::parse(key) {
			return implicit.write(&mut self.host, ea, value);
		}
		self.write_tag(ea, slot_for(&scope), IndexKind::of(&scope), scope.owner(), key, value)
	}

	/// Removes a tag, returning its value.
	pub fn delete_tag(&mut self, ea: Ea, key: &str) -> Result<TagValue> {
		let scope = self.scope(ea)?;
		if let Some(implicit) = ImplicitKey::parse(key) {
			return implicit.clear(&mut self.host, ea);
		}
		self.remove_tag(ea, slot_for(&scope), IndexKind::of(&scope), scope.owner(), key)
	}

	/// Sets a tag, or removes it when `value` is `None`.
	pub fn update(&mut self, ea: Ea, key: &str, value: Option<TagValue>) -> Result<Option<TagValue>> {
		match value {
			Some(value) => self.set_tag(ea, key, value),
			None => self.delete_tag(ea, key).map(Some),
		}
	}

	/// Removes every tag at `ea` and clears its color. Returns what was removed.
	///
	/// Tags that only exist in the slot the location's scope does not write
	/// to are left in place.
	pub fn erase(&mut self, ea: Ea) -> Result<TagMap> {
		let tags = self.tags(ea)?;
		let mut removed = TagMap::new();
		for key in tags.into_keys() {
			match self.delete_tag(ea, &key) {
				Ok(value) => {
					removed.insert(key, value);
				}
				Err(error) if error.is_not_found() => {
					tracing::debug!(%ea, key, "tag is stored in the other comment slot; leaving it");
				}
				Err(error) => return Err(error),
			}
		}
		self.host.set_item_color(ea, DEFCOLOR)?;
		Ok(removed)
	}

	/// Writes one blob tag and records a new name in `kind`'s index.
	pub(crate) fn write_tag(
		&mut self,
		node: Ea,
		slot: Slot,
		kind: IndexKind,
		owner: Option<Ea>,
		key: &str,
		value: TagValue,
	) -> Result<Option<TagValue>> {
		validate(key, &value)?;
		let mut state = self.read_slot(node, slot);
		let previous = state.insert(key.to_string(), value);
		let blob = encode(&state, self.config.max_blob_len).map_err(|error| TagError::from_codec(node, error))?;
		self.host.set_comment(node, slot, &blob)?;

		if previous.is_none() {
			let (host, index) = self.parts(kind);
			index.increment(host, node, owner, key)?;
		}
		tracing::debug!(ea = %node, %slot, key, replaced = previous.is_some(), "tag written");
		Ok(previous)
	}

	/// Removes one blob tag and its reference from `kind`'s index.
	pub(crate) fn remove_tag(&mut self, node: Ea, slot: Slot, kind: IndexKind, owner: Option<Ea>, key: &str) -> Result<TagValue> {
		let mut state = self.read_slot(node, slot);
		let removed = state.remove(key).ok_or_else(|| TagError::not_found(node, key))?;
		// Removal never grows the blob, which may predate a smaller `max_blob_len`.
		let blob = encode(&state, usize::MAX).map_err(|error| TagError::from_codec(node, error))?;
		self.host.set_comment(node, slot, &blob)?;

		let (host, index) = self.parts(kind);
		index.decrement(host, node, owner, key)?;
		tracing::debug!(ea = %node, %slot, key, "tag removed");
		Ok(removed)
	}
}
