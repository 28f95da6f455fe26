//! Which comment slot holds a location's tags, and how the two slots combine.

use marginalia_primitives::{Scope, Slot, TagMap};

/// Returns the slot tag blobs are written to for a scope.
///
/// Function bodies use the non-repeatable slot so their tags do not echo at
/// every reference; the repeatable slot is left for whole-function remarks.
#[inline]
pub fn slot_for(scope: &Scope) -> Slot {
	match scope {
		Scope::Contents(_) => Slot::NonRepeatable,
		Scope::Global => Slot::Repeatable,
	}
}

/// A key present in both slots with the canonical value kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
	pub key: String,
}

/// The combined view of both slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
	pub tags: TagMap,
	pub conflicts: Vec<Conflict>,
}

/// Overlays the canonical mapping on the other one. Canonical values win.
pub fn resolve(canonical: TagMap, other: TagMap) -> Resolved {
	let mut tags = other;
	let mut conflicts = Vec::new();
	for (key, value) in canonical {
		if tags.insert(key.clone(), value).is_some() {
			conflicts.push(Conflict { key });
		}
	}
	Resolved { tags, conflicts }
}
