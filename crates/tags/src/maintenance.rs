//! Checking and rebuilding the indices from the tag blobs.

use std::collections::{BTreeSet, HashSet};

use marginalia_host::Host;
use marginalia_primitives::{Ea, Scope, Slot};

use crate::database::TagDatabase;
use crate::error::Result;
use crate::function::FUNCTION_SLOT;
use crate::index::{IndexKind, RefIndex};


/// A location whose recorded names differ from its tag blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desync {
	pub ea: Ea,
	pub index: IndexKind,
	/// Names the index records.
	pub recorded: BTreeSet<String>,
	/// Names the blob holds.
	pub live: BTreeSet<String>,
}

/// What a rebuild recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
	/// Locations visited.
	pub locations: usize,
	/// References recorded in the global index.
	pub global: usize,
	/// References recorded in the contents index.
	pub contents: usize,
}

impl<H: Host> TagDatabase<H> {
	/// Compares every commented or indexed location against both indices.
	///
	/// Read only: nothing is repaired.
	pub fn audit(&self) -> Vec<Desync> {
		let mut drift = Vec::new();
		for ea in self.candidates() {
			let scope = Scope::of(self.host.function_at(ea));
			for index in [&self.global, &self.contents] {
				let recorded = index.keys(&self.host, ea);
				let live = self.expected_keys(ea, &scope, index.kind());
				if recorded != live {
					tracing::warn!(%ea, index = %index.kind(), ?recorded, ?live, "index desync");
					drift.push(Desync {
						ea,
						index: index.kind(),
						recorded,
						live,
					});
				}
			}
		}
		drift
	}

	/// Discards both indices and records every blob tag again.
	pub fn rebuild(&mut self) -> Result<RebuildReport> {
		let locations: Vec<Ea> = comment_addresses(&self.host).collect();

		let anchor = self.config.anchor;
		self.global.clear(&mut self.host);
		self.contents.clear(&mut self.host);

		let mut report = RebuildReport {
			locations: locations.len(),
			..RebuildReport::default()
		};
		for ea in locations {
			let scope = Scope::of(self.host.function_at(ea));
			for kind in [IndexKind::Global, IndexKind::Contents] {
				let keys = self.expected_keys(ea, &scope, kind);
				let (host, index) = self.parts(kind);
				for key in &keys {
					if index.increment(host, ea, scope.owner(), key)? {
						match kind {
							IndexKind::Global => report.global += 1,
							IndexKind::Contents => report.contents += 1,
						}
					}
				}
			}
		}

		self.global = RefIndex::load(&self.host, IndexKind::Global, anchor);
		self.contents = RefIndex::load(&self.host, IndexKind::Contents, anchor);
		tracing::info!(
			locations = report.locations,
			global = report.global,
			contents = report.contents,
			"tag indices rebuilt"
		);
		Ok(report)
	}

	/// Names `kind`'s index should record at `ea`.
	fn expected_keys(&self, ea: Ea, scope: &Scope, kind: IndexKind) -> BTreeSet<String> {
		let slot = match (kind, scope) {
			(IndexKind::Global, Scope::Global) => Some(Slot::Repeatable),
			(IndexKind::Global, Scope::Contents(f)) if f.is_entry(ea) => Some(FUNCTION_SLOT),
			(IndexKind::Contents, Scope::Contents(_)) => Some(Slot::NonRepeatable),
			_ => None,
		};
		slot.map(|slot| self.live_keys(ea, slot)).unwrap_or_default()
	}

	/// Commented locations followed by indexed ones not already seen.
	fn candidates(&self) -> Vec<Ea> {
		let mut seen = HashSet::new();
		comment_addresses(&self.host)
			.chain(self.global.addresses(&self.host))
			.chain(self.contents.addresses(&self.host))
			.filter(|ea| seen.insert(*ea))
			.collect()
	}
}

fn comment_addresses<H: Host>(host: &H) -> impl Iterator<Item = Ea> + '_ {
	std::iter::successors(host.comment_next(None), move |&ea| host.comment_next(Some(ea)))
}
