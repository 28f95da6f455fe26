//! In-memory host database.

use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use marginalia_primitives::{DEFCOLOR, Ea, Function, Slot};
use serde::{Deserialize, Serialize};

use crate::{Attributes, Comments, Functions, Host, HostError, Result, SupIndex, SupStore};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct CommentPair {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	repeatable: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	non_repeatable: Option<String>,
}

impl CommentPair {
	fn get(&self, slot: Slot) -> Option<&String> {
		match slot {
			Slot::Repeatable => self.repeatable.as_ref(),
			Slot::NonRepeatable => self.non_repeatable.as_ref(),
		}
	}

	fn get_mut(&mut self, slot: Slot) -> &mut Option<String> {
		match slot {
			Slot::Repeatable => &mut self.repeatable,
			Slot::NonRepeatable => &mut self.non_repeatable,
		}
	}

	fn is_empty(&self) -> bool {
		self.repeatable.is_none() && self.non_repeatable.is_none()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct NameEntry {
	name: String,
	listed: bool,
}

/// A complete host database held in memory.
///
/// Serializes with serde so a session can be snapshotted to disk and
/// reopened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryDatabase {
	min: Ea,
	max: Ea,
	#[serde(default)]
	functions: BTreeMap<Ea, Function>,
	#[serde(default)]
	comments: BTreeMap<Ea, CommentPair>,
	#[serde(default)]
	sups: BTreeMap<SupIndex, BTreeMap<Ea, Vec<u8>>>,
	#[serde(default)]
	names: BTreeMap<Ea, NameEntry>,
	#[serde(default)]
	colors: BTreeMap<Ea, u32>,
}

impl MemoryDatabase {
	/// Creates an empty database spanning `[min, max)`.
	pub fn new(min: impl Into<Ea>, max: impl Into<Ea>) -> Self {
		Self {
			min: min.into(),
			max: max.into(),
			functions: BTreeMap::new(),
			comments: BTreeMap::new(),
			sups: BTreeMap::new(),
			names: BTreeMap::new(),
			colors: BTreeMap::new(),
		}
	}

	/// Defines a function body. Bodies may not overlap.
	pub fn add_function(&mut self, function: Function) -> Result<()> {
		if function.start >= function.end {
			return Err(HostError::EmptyFunction {
				start: function.start,
				end: function.end,
			});
		}
		self.check(function.start)?;
		if function.end > self.max {
			return Err(HostError::OutOfBounds(function.end));
		}

		if let Some((_, existing)) = self.functions.range(..function.end).next_back()
			&& existing.overlaps(&function)
		{
			return Err(HostError::overlap(function, *existing));
		}
		self.functions.insert(function.start, function);
		Ok(())
	}

	/// Removes the function whose entry is `start`.
	pub fn remove_function(&mut self, start: Ea) -> Option<Function> {
		self.functions.remove(&start)
	}

	/// Returns whether the name at `ea` is published in the name list.
	pub fn is_listed(&self, ea: Ea) -> bool {
		self.names.get(&ea).is_some_and(|n| n.listed)
	}

	fn check(&self, ea: Ea) -> Result<()> {
		if self.contains(ea) {
			Ok(())
		} else {
			Err(HostError::OutOfBounds(ea))
		}
	}
}

impl Comments for MemoryDatabase {
	fn comment(&self, ea: Ea, slot: Slot) -> Option<String> {
		self.comments.get(&ea)?.get(slot).cloned()
	}

	fn set_comment(&mut self, ea: Ea, slot: Slot, text: &str) -> Result<()> {
		self.check(ea)?;
		if text.is_empty() {
			if let Some(pair) = self.comments.get_mut(&ea) {
				*pair.get_mut(slot) = None;
				if pair.is_empty() {
					self.comments.remove(&ea);
				}
			}
		} else {
			*self.comments.entry(ea).or_default().get_mut(slot) = Some(text.to_string());
		}
		Ok(())
	}

	fn comment_next(&self, after: Option<Ea>) -> Option<Ea> {
		match after {
			Some(after) => self.comments.range((Excluded(after), Unbounded)).next(),
			None => self.comments.iter().next(),
		}
		.map(|(ea, _)| *ea)
	}
}

impl Functions for MemoryDatabase {
	fn function_at(&self, ea: Ea) -> Option<Function> {
		self.functions
			.range(..=ea)
			.next_back()
			.map(|(_, f)| *f)
			.filter(|f| f.contains(ea))
	}

	fn functions(&self) -> Vec<Function> {
		self.functions.values().copied().collect()
	}
}

impl SupStore for MemoryDatabase {
	fn sup(&self, node: Ea, index: SupIndex) -> Option<Vec<u8>> {
		self.sups.get(&index)?.get(&node).cloned()
	}

	fn set_sup(&mut self, node: Ea, index: SupIndex, value: &[u8]) -> Result<()> {
		self.sups.entry(index).or_default().insert(node, value.to_vec());
		Ok(())
	}

	fn remove_sup(&mut self, node: Ea, index: SupIndex) -> bool {
		let Some(table) = self.sups.get_mut(&index) else {
			return false;
		};
		let removed = table.remove(&node).is_some();
		if table.is_empty() {
			self.sups.remove(&index);
		}
		removed
	}

	fn sup_next(&self, index: SupIndex, after: Option<Ea>) -> Option<Ea> {
		let table = self.sups.get(&index)?;
		match after {
			Some(after) => table.range((Excluded(after), Unbounded)).next(),
			None => table.iter().next(),
		}
		.map(|(ea, _)| *ea)
	}
}

impl Attributes for MemoryDatabase {
	fn name(&self, ea: Ea) -> Option<String> {
		self.names.get(&ea).map(|n| n.name.clone())
	}

	fn set_name(&mut self, ea: Ea, name: Option<&str>, listed: bool) -> Result<()> {
		self.check(ea)?;
		match name {
			None => {
				self.names.remove(&ea);
			}
			Some(name) if name.is_empty() || name.chars().any(char::is_whitespace) => {
				return Err(HostError::InvalidName {
					ea,
					name: name.to_string(),
				});
			}
			Some(name) => {
				self.names.insert(
					ea,
					NameEntry {
						name: name.to_string(),
						listed,
					},
				);
			}
		}
		Ok(())
	}

	fn item_color(&self, ea: Ea) -> u32 {
		self.colors.get(&ea).copied().unwrap_or(DEFCOLOR)
	}

	fn set_item_color(&mut self, ea: Ea, raw: u32) -> Result<()> {
		self.check(ea)?;
		if raw == DEFCOLOR {
			self.colors.remove(&ea);
		} else {
			self.colors.insert(ea, raw);
		}
		Ok(())
	}
}

impl Host for MemoryDatabase {
	fn bounds(&self) -> (Ea, Ea) {
		(self.min, self.max)
	}
}
