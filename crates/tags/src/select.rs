//! Walking the indices to answer queries.

use std::collections::BTreeSet;

use marginalia_host::Host;
use marginalia_primitives::{Ea, Slot, TagMap};

use crate::database::TagDatabase;
use crate::query::Query;

impl<H: Host> TagDatabase<H> {
	/// Selects global locations and functions by tag.
	///
	/// Yields each indexed location, in ascending order, with the tags that
	/// satisfied `query`. Function entries are matched on their function
	/// tags. The empty query yields every location with all of its tags.
	pub fn select<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = (Ea, TagMap)> + 'a {
		self.global.addresses(&self.host).filter_map(move |ea| {
			let tags = self.global_tags(ea)?;
			let names = query.matches(tags.keys())?;
			let selected: TagMap = tags.into_iter().filter(|(key, _)| names.contains(key)).collect();
			Some((ea, selected))
		})
	}

	/// Selects locations inside functions by tag name.
	///
	/// Yields each indexed location, in ascending order, with the names that
	/// satisfied `query`. A recorded key set that disagrees with the blob is
	/// logged and the blob's names are used instead.
	pub fn select_contents<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = (Ea, BTreeSet<String>)> + 'a {
		self.contents.addresses(&self.host).filter_map(move |ea| {
			let recorded = self.contents.keys(&self.host, ea);
			let live = self.live_keys(ea, Slot::NonRepeatable);
			let keys = if recorded == live {
				recorded
			} else {
				tracing::warn!(%ea, ?recorded, ?live, "index desync: contents index disagrees with the tag blob; using the blob");
				live
			};
			query.matches(&keys).map(|names| (ea, names))
		})
	}

	/// Selects functions by the tag names used anywhere in their bodies.
	///
	/// Yields each function entry with the names that satisfied `query`.
	pub fn select_functions<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = (Ea, BTreeSet<String>)> + 'a {
		self.contents
			.iterate(&self.host)
			.filter_map(move |(entry, names)| query.matches(&names).map(|found| (entry, found)))
	}

	/// Function tags at a function entry, location tags elsewhere.
	fn global_tags(&self, ea: Ea) -> Option<TagMap> {
		let result = if self.host.is_within_function(ea) {
			self.function_tags(ea)
		} else {
			self.tags(ea)
		};
		result
			.inspect_err(|error| tracing::warn!(%ea, %error, "skipping unreadable indexed location"))
			.ok()
	}
}
