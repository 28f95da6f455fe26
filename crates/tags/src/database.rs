use marginalia_host::Host;
use marginalia_primitives::{Ea, Scope};

use crate::config::TagConfig;
use crate::error::{Result, TagError};
use crate::extra::ExtraComments;
use crate::index::{IndexKind, RefIndex};

/// Tag storage and indices over one host database.
///
/// Owns the host. Reads take `&self` and writes take `&mut self`; the host is
/// assumed to see no other writers while a `TagDatabase` is open.
///
/// Writes made directly through [`host_mut`](Self::host_mut) bypass the
/// indices. [`audit`](Self::audit) reports the resulting drift and
/// [`rebuild`](Self::rebuild) repairs it.
#[derive(Debug)]
pub struct TagDatabase<H> {
	pub(crate) host: H,
	pub(crate) config: TagConfig,
	pub(crate) global: RefIndex,
	pub(crate) contents: RefIndex,
}

impl<H: Host> TagDatabase<H> {
	/// Opens a database, loading the index count tables from the host.
	pub fn open(host: H, config: TagConfig) -> Self {
		let global = RefIndex::load(&host, IndexKind::Global, config.anchor);
		let contents = RefIndex::load(&host, IndexKind::Contents, config.anchor);
		tracing::debug!(
			anchor = %config.anchor,
			global = global.counts().len(),
			contents = contents.counts().len(),
			"tag indices loaded"
		);

		let db = Self {
			host,
			config,
			global,
			contents,
		};
		if db.config.verify_on_open {
			let drift = db.audit();
			if !drift.is_empty() {
				tracing::warn!(locations = drift.len(), "tag indices are out of sync; a rebuild will repair them");
			}
		}
		db
	}

	pub fn host(&self) -> &H {
		&self.host
	}

	/// Direct access to the host. Writes through it are not indexed.
	pub fn host_mut(&mut self) -> &mut H {
		&mut self.host
	}

	pub fn into_host(self) -> H {
		self.host
	}

	pub fn config(&self) -> &TagConfig {
		&self.config
	}

	pub fn index(&self, kind: IndexKind) -> &RefIndex {
		match kind {
			IndexKind::Global => &self.global,
			IndexKind::Contents => &self.contents,
		}
	}

	/// Tag names used by global locations and function tags.
	pub fn tag_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.global.names()
	}

	/// Tag names used inside function bodies.
	pub fn content_names(&self) -> impl Iterator<Item = &str> + '_ {
		self.contents.names()
	}

	/// Returns the scope of `ea`, failing if it lies outside the database.
	pub fn scope(&self, ea: Ea) -> Result<Scope> {
		self.check(ea)?;
		Ok(Scope::of(self.host.function_at(ea)))
	}

	/// Prefix and suffix comment blocks at `ea`.
	pub fn extra(&mut self, ea: Ea) -> Result<ExtraComments<'_, H>> {
		self.check(ea)?;
		Ok(ExtraComments::new(&mut self.host, ea))
	}

	pub(crate) fn check(&self, ea: Ea) -> Result<()> {
		if self.host.contains(ea) {
			Ok(())
		} else {
			Err(TagError::OutOfBounds(ea))
		}
	}

	/// Splits out the host and one index so both can be borrowed mutably.
	pub(crate) fn parts(&mut self, kind: IndexKind) -> (&mut H, &mut RefIndex) {
		let index = match kind {
			IndexKind::Global => &mut self.global,
			IndexKind::Contents => &mut self.contents,
		};
		(&mut self.host, index)
	}
}
