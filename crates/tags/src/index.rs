//! Reference-counted indices of which tag names exist where.
//!
//! Each index keeps, in the host's scratch store:
//!
//! - per location, the set of tag names recorded there;
//! - at the anchor node, a table of name → number of locations carrying it.
//!
//! The contents index additionally keeps one name → count table per function,
//! stored at the function's entry. Count tables are loaded once and written
//! through on every change. Records are postcard-encoded.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use marginalia_host::{SupIndex, SupStore};
use marginalia_primitives::{Ea, Scope};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

#[cfg(test)]
mod tests;

/// Key set of a global location.
pub const GLOBAL_KEYS: SupIndex = 0x10;
/// Key set of a location inside a function.
pub const CONTENTS_KEYS: SupIndex = 0x11;
/// Global name → count table, at the anchor.
pub const GLOBAL_COUNTS: SupIndex = 0x20;
/// Contents name → count table over all functions, at the anchor.
pub const CONTENTS_COUNTS: SupIndex = 0x21;
/// Per-function name → count table, at the function entry.
pub const FUNCTION_COUNTS: SupIndex = 0x22;

/// Name → number of locations.
pub type Counts = BTreeMap<String, u32>;

/// Which index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexKind {
	/// Locations outside any function, and function tags.
	Global,
	/// Locations inside function bodies.
	Contents,
}

impl IndexKind {
	/// The index a location in `scope` records its tags in.
	pub fn of(scope: &Scope) -> Self {
		match scope {
			Scope::Global => IndexKind::Global,
			Scope::Contents(_) => IndexKind::Contents,
		}
	}

	fn keys(self) -> SupIndex {
		match self {
			IndexKind::Global => GLOBAL_KEYS,
			IndexKind::Contents => CONTENTS_KEYS,
		}
	}

	fn counts(self) -> SupIndex {
		match self {
			IndexKind::Global => GLOBAL_COUNTS,
			IndexKind::Contents => CONTENTS_COUNTS,
		}
	}
}

impl fmt::Display for IndexKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			IndexKind::Global => "global",
			IndexKind::Contents => "contents",
		})
	}
}

fn read_record<S, T>(store: &S, node: Ea, index: SupIndex) -> T
where
	S: SupStore + ?Sized,
	T: DeserializeOwned + Default,
{
	let Some(bytes) = store.sup(node, index) else {
		return T::default();
	};
	postcard::from_bytes(&bytes).unwrap_or_else(|error| {
		tracing::warn!(node = %node, index, %error, "corrupt index record; treating as empty");
		T::default()
	})
}

/// Writes a record, or removes it when `empty`.
fn write_record<S, T>(store: &mut S, node: Ea, index: SupIndex, value: &T, empty: bool) -> Result<()>
where
	S: SupStore + ?Sized,
	T: Serialize,
{
	if empty {
		store.remove_sup(node, index);
	} else {
		store.set_sup(node, index, &postcard::to_allocvec(value)?)?;
	}
	Ok(())
}

fn bump(counts: &mut Counts, key: &str) {
	*counts.entry(key.to_string()).or_default() += 1;
}

/// Decrements a count, dropping it at zero. Returns false if it was missing.
fn drop_one(counts: &mut Counts, key: &str) -> bool {
	let Some(count) = counts.get_mut(key) else {
		return false;
	};
	*count = count.saturating_sub(1);
	if *count == 0 {
		counts.remove(key);
	}
	true
}

/// One reference index with its count table held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefIndex {
	kind: IndexKind,
	anchor: Ea,
	counts: Counts,
}

impl RefIndex {
	/// Loads the count table from the anchor node.
	pub fn load<S: SupStore + ?Sized>(store: &S, kind: IndexKind, anchor: Ea) -> Self {
		let counts = read_record(store, anchor, kind.counts());
		Self { kind, anchor, counts }
	}

	#[inline]
	pub fn kind(&self) -> IndexKind {
		self.kind
	}

	/// Tag names recorded at `ea`.
	pub fn keys<S: SupStore + ?Sized>(&self, store: &S, ea: Ea) -> BTreeSet<String> {
		read_record(store, ea, self.kind.keys())
	}

	/// Records `key` at `ea`. Returns false if it was already recorded.
	///
	/// `owner` is the entry of the function containing `ea`; contents
	/// indices also count the name in that function's table.
	pub fn increment<S: SupStore + ?Sized>(&mut self, store: &mut S, ea: Ea, owner: Option<Ea>, key: &str) -> Result<bool> {
		let mut keys = self.keys(&*store, ea);
		if !keys.insert(key.to_string()) {
			return Ok(false);
		}
		write_record(store, ea, self.kind.keys(), &keys, false)?;

		bump(&mut self.counts, key);
		write_record(store, self.anchor, self.kind.counts(), &self.counts, false)?;

		if let Some(entry) = self.function_table(owner) {
			let mut table: Counts = read_record(&*store, entry, FUNCTION_COUNTS);
			bump(&mut table, key);
			write_record(store, entry, FUNCTION_COUNTS, &table, false)?;
		}
		tracing::trace!(index = %self.kind, %ea, key, "index reference added");
		Ok(true)
	}

	/// Removes `key` from `ea`. Returns false if it was not recorded.
	pub fn decrement<S: SupStore + ?Sized>(&mut self, store: &mut S, ea: Ea, owner: Option<Ea>, key: &str) -> Result<bool> {
		let mut keys = self.keys(&*store, ea);
		if !keys.remove(key) {
			tracing::warn!(index = %self.kind, %ea, key, "index desync: removing a tag the index never recorded");
			return Ok(false);
		}
		write_record(store, ea, self.kind.keys(), &keys, keys.is_empty())?;

		if !drop_one(&mut self.counts, key) {
			tracing::warn!(index = %self.kind, key, "index desync: name missing from count table");
		}
		write_record(store, self.anchor, self.kind.counts(), &self.counts, self.counts.is_empty())?;

		if let Some(entry) = self.function_table(owner) {
			let mut table: Counts = read_record(&*store, entry, FUNCTION_COUNTS);
			drop_one(&mut table, key);
			write_record(store, entry, FUNCTION_COUNTS, &table, table.is_empty())?;
		}
		tracing::trace!(index = %self.kind, %ea, key, "index reference removed");
		Ok(true)
	}

	fn function_table(&self, owner: Option<Ea>) -> Option<Ea> {
		match self.kind {
			IndexKind::Contents => owner,
			IndexKind::Global => None,
		}
	}

	/// Names referenced at least once.
	pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
		self.counts.keys().map(String::as_str)
	}

	/// Number of locations carrying `name`.
	pub fn count(&self, name: &str) -> u32 {
		self.counts.get(name).copied().unwrap_or(0)
	}

	pub fn counts(&self) -> &Counts {
		&self.counts
	}

	/// Locations with at least one recorded name, ascending.
	pub fn addresses<'s, S: SupStore + ?Sized>(&self, store: &'s S) -> impl Iterator<Item = Ea> + 's {
		let index = self.kind.keys();
		std::iter::successors(store.sup_next(index, None), move |&ea| store.sup_next(index, Some(ea)))
	}

	/// Function entries with a count table, and the names used in each.
	///
	/// Always empty for the global index.
	pub fn iterate<'s, S: SupStore + ?Sized>(&self, store: &'s S) -> impl Iterator<Item = (Ea, BTreeSet<String>)> + 's {
		let first = match self.kind {
			IndexKind::Contents => store.sup_next(FUNCTION_COUNTS, None),
			IndexKind::Global => None,
		};
		std::iter::successors(first, move |&ea| store.sup_next(FUNCTION_COUNTS, Some(ea)))
			.map(move |entry| (entry, function_names(store, entry)))
	}

	/// Forgets every record of this index, in memory and in the store.
	pub fn clear<S: SupStore + ?Sized>(&mut self, store: &mut S) {
		let stale: Vec<Ea> = self.addresses(&*store).collect();
		for ea in stale {
			store.remove_sup(ea, self.kind.keys());
		}
		if self.kind == IndexKind::Contents {
			let entries: Vec<Ea> =
				std::iter::successors(store.sup_next(FUNCTION_COUNTS, None), |&ea| store.sup_next(FUNCTION_COUNTS, Some(ea)))
					.collect();
			for entry in entries {
				store.remove_sup(entry, FUNCTION_COUNTS);
			}
		}
		store.remove_sup(self.anchor, self.kind.counts());
		self.counts.clear();
	}
}

/// Names recorded in one function's table.
pub fn function_names<S: SupStore + ?Sized>(store: &S, entry: Ea) -> BTreeSet<String> {
	let table: Counts = read_record(store, entry, FUNCTION_COUNTS);
	table.into_keys().collect()
}
