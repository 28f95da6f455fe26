//! Boolean tag queries: "has every one of these, or any of those".

use std::collections::BTreeSet;

/// A normalized set of tag names.
///
/// Built from a single name or any collection of names, so query builders
/// accept both `"a"` and `["a", "b"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Names(BTreeSet<String>);

impl Names {
	pub fn into_inner(self) -> BTreeSet<String> {
		self.0
	}
}

impl From<&str> for Names {
	fn from(name: &str) -> Self {
		Self(BTreeSet::from([name.to_string()]))
	}
}

impl From<String> for Names {
	fn from(name: String) -> Self {
		Self(BTreeSet::from([name]))
	}
}

impl From<&String> for Names {
	fn from(name: &String) -> Self {
		Self::from(name.as_str())
	}
}

impl<S: Into<String>> From<Vec<S>> for Names {
	fn from(names: Vec<S>) -> Self {
		names.into_iter().collect()
	}
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Names {
	fn from(names: [S; N]) -> Self {
		names.into_iter().collect()
	}
}

impl From<BTreeSet<String>> for Names {
	fn from(names: BTreeSet<String>) -> Self {
		Self(names)
	}
}

impl<S: Into<String>> FromIterator<S> for Names {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

/// Which tags a location must carry to be selected.
///
/// A location matches when it has every `required` name, or at least one
/// `optional` name. The match reports the names that made it match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
	required: BTreeSet<String>,
	optional: BTreeSet<String>,
}

impl Query {
	/// The empty query, which selects every tagged location.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requires every one of `names`.
	pub fn all_of(names: impl Into<Names>) -> Self {
		Self::new().and(names)
	}

	/// Accepts any one of `names`.
	pub fn any_of(names: impl Into<Names>) -> Self {
		Self::new().or(names)
	}

	pub fn and(mut self, names: impl Into<Names>) -> Self {
		self.required.extend(names.into().0);
		self
	}

	pub fn or(mut self, names: impl Into<Names>) -> Self {
		self.optional.extend(names.into().0);
		self
	}

	pub fn required(&self) -> &BTreeSet<String> {
		&self.required
	}

	pub fn optional(&self) -> &BTreeSet<String> {
		&self.optional
	}

	pub fn is_empty(&self) -> bool {
		self.required.is_empty() && self.optional.is_empty()
	}

	/// Returns the names of `keys` that satisfy the query, or `None` when
	/// nothing does.
	///
	/// The empty query accepts any non-empty key set whole.
	pub fn matches<'k, I>(&self, keys: I) -> Option<BTreeSet<String>>
	where
		I: IntoIterator<Item = &'k String>,
	{
		let keys: BTreeSet<&String> = keys.into_iter().collect();
		if self.is_empty() {
			return (!keys.is_empty()).then(|| keys.into_iter().cloned().collect());
		}

		let mut found: BTreeSet<String> = self.optional.iter().filter(|k| keys.contains(k)).cloned().collect();
		if !self.required.is_empty() && self.required.iter().all(|k| keys.contains(k)) {
			found.extend(self.required.iter().cloned());
		}
		(!found.is_empty()).then_some(found)
	}
}
