//! Extra comment blocks shown before (prefix) and after (suffix) an item.
//!
//! A block is stored one line per scratch-store row at consecutive indices
//! from its base. The block ends at the first missing row.

use marginalia_host::{SupIndex, SupStore};
use marginalia_primitives::Ea;

use crate::error::{Result, TagError};


/// First row of the prefix block.
pub const E_PREV: SupIndex = 1000;
/// First row of the suffix block.
pub const E_NEXT: SupIndex = 2000;
/// Most lines a block can hold.
pub const MAX_ITEM_LINES: usize = 1000;

/// Which block of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
	/// Lines shown before the item.
	Prefix,
	/// Lines shown after the item.
	Suffix,
}

impl Side {
	#[inline]
	fn base(self) -> SupIndex {
		match self {
			Side::Prefix => E_PREV,
			Side::Suffix => E_NEXT,
		}
	}

	fn rows(self) -> impl Iterator<Item = SupIndex> {
		(self.base()..).take(MAX_ITEM_LINES)
	}
}

fn count<S: SupStore + ?Sized>(store: &S, ea: Ea, side: Side) -> usize {
	side.rows().take_while(|&index| store.sup(ea, index).is_some()).count()
}

/// Returns the block joined with newlines, or `None` if it has no lines.
pub fn get<S: SupStore + ?Sized>(store: &S, ea: Ea, side: Side) -> Option<String> {
	let mut lines = Vec::new();
	for index in side.rows() {
		let Some(row) = store.sup(ea, index) else {
			break;
		};
		lines.push(String::from_utf8_lossy(&row).into_owned());
	}
	(!lines.is_empty()).then(|| lines.join("\n"))
}

/// Removes the block, returning its previous text.
pub fn delete<S: SupStore + ?Sized>(store: &mut S, ea: Ea, side: Side) -> Option<String> {
	let previous = get(&*store, ea, side)?;
	let rows = count(&*store, ea, side);
	for index in side.rows().take(rows) {
		store.remove_sup(ea, index);
	}
	Some(previous)
}

/// Replaces the block, one row per line, returning its previous text.
///
/// Nothing is written when `text` has more than [`MAX_ITEM_LINES`] lines.
pub fn set<S: SupStore + ?Sized>(store: &mut S, ea: Ea, side: Side, text: &str) -> Result<Option<String>> {
	let lines: Vec<&str> = text.split('\n').collect();
	if lines.len() > MAX_ITEM_LINES {
		return Err(TagError::ExtraTooLong {
			ea,
			lines: lines.len(),
			max: MAX_ITEM_LINES,
		});
	}

	let previous = delete(store, ea, side);
	for (index, line) in side.rows().zip(lines) {
		store.set_sup(ea, index, line.as_bytes())?;
	}
	tracing::trace!(%ea, ?side, "extra comment written");
	Ok(previous)
}

/// Adds `count` blank lines to the start of the block.
///
/// A negative `count` removes leading blank lines. The block is removed once
/// it holds neither text nor blank lines.
pub fn insert_lines<S: SupStore + ?Sized>(store: &mut S, ea: Ea, side: Side, count: i64) -> Result<Option<String>> {
	let current = get(&*store, ea, side);
	let (body, lines) = match current.as_deref() {
		None => ("", 0),
		Some(text) => {
			let body = text.trim_start_matches('\n');
			(body, text.len() - body.len() + 1)
		}
	};
	respace(store, ea, side, body, lines, count, |blank, body| format!("{blank}{body}"))
}

/// Adds `count` blank lines to the end of the block.
///
/// A negative `count` removes trailing blank lines.
pub fn append_lines<S: SupStore + ?Sized>(store: &mut S, ea: Ea, side: Side, count: i64) -> Result<Option<String>> {
	let current = get(&*store, ea, side);
	let (body, lines) = match current.as_deref() {
		None => ("", 0),
		Some(text) => {
			let body = text.trim_end_matches('\n');
			(body, text.len() - body.len() + 1)
		}
	};
	respace(store, ea, side, body, lines, count, |blank, body| format!("{body}{blank}"))
}

/// `lines` counts the blank lines around `body` plus one, or zero when the
/// block is absent.
fn respace<S: SupStore + ?Sized>(
	store: &mut S,
	ea: Ea,
	side: Side,
	body: &str,
	lines: usize,
	count: i64,
	join: impl FnOnce(&str, &str) -> String,
) -> Result<Option<String>> {
	let total = i64::try_from(lines).unwrap_or(i64::MAX).saturating_add(count);
	if total <= 0 && body.is_empty() {
		return Ok(delete(store, ea, side));
	}
	let blanks = total.saturating_sub(1).max(0);
	let body_lines = i64::try_from(body.split('\n').count()).unwrap_or(i64::MAX);
	let rows = blanks.saturating_add(body_lines);
	if rows > MAX_ITEM_LINES as i64 {
		return Err(TagError::ExtraTooLong {
			ea,
			lines: usize::try_from(rows).unwrap_or(usize::MAX),
			max: MAX_ITEM_LINES,
		});
	}
	let blank = "\n".repeat(usize::try_from(blanks).unwrap_or(0));
	let text = join(&blank, body);
	set(store, ea, side, &text)
}

/// Prefix and suffix blocks of one item.
pub struct ExtraComments<'a, S: ?Sized> {
	store: &'a mut S,
	ea: Ea,
}

impl<'a, S: SupStore + ?Sized> ExtraComments<'a, S> {
	pub fn new(store: &'a mut S, ea: Ea) -> Self {
		Self { store, ea }
	}

	pub fn ea(&self) -> Ea {
		self.ea
	}

	pub fn prefix(&self) -> Option<String> {
		get(&*self.store, self.ea, Side::Prefix)
	}

	pub fn suffix(&self) -> Option<String> {
		get(&*self.store, self.ea, Side::Suffix)
	}

	/// Replaces the prefix block, returning the old one.
	pub fn set_prefix(&mut self, text: &str) -> Result<Option<String>> {
		set(&mut *self.store, self.ea, Side::Prefix, text)
	}

	/// Replaces the suffix block, returning the old one.
	pub fn set_suffix(&mut self, text: &str) -> Result<Option<String>> {
		set(&mut *self.store, self.ea, Side::Suffix, text)
	}

	pub fn delete_prefix(&mut self) -> Option<String> {
		delete(&mut *self.store, self.ea, Side::Prefix)
	}

	pub fn delete_suffix(&mut self) -> Option<String> {
		delete(&mut *self.store, self.ea, Side::Suffix)
	}

	/// Inserts `count` blank lines at the top of the prefix.
	pub fn preinsert(&mut self, count: i64) -> Result<Option<String>> {
		insert_lines(&mut *self.store, self.ea, Side::Prefix, count)
	}

	/// Appends `count` blank lines to the bottom of the prefix.
	pub fn preappend(&mut self, count: i64) -> Result<Option<String>> {
		append_lines(&mut *self.store, self.ea, Side::Prefix, count)
	}

	/// Inserts `count` blank lines at the top of the suffix.
	pub fn postinsert(&mut self, count: i64) -> Result<Option<String>> {
		insert_lines(&mut *self.store, self.ea, Side::Suffix, count)
	}

	/// Appends `count` blank lines to the bottom of the suffix.
	pub fn postappend(&mut self, count: i64) -> Result<Option<String>> {
		append_lines(&mut *self.store, self.ea, Side::Suffix, count)
	}
}
