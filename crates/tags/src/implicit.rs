//! Tags backed by item attributes instead of the comment blob.

use std::fmt;

use marginalia_host::{Host, HostError};
use marginalia_primitives::{DEFCOLOR, Ea, Rgb, TagMap, TagValue};

use crate::error::{Result, TagError};
use crate::extra::{self, Side};

/// A reserved tag name that reads and writes an item attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImplicitKey {
	/// `__name__`: the user-defined symbol name.
	Name,
	/// `__color__`: the item color as `0xRRGGBB`.
	Color,
	/// `__extra_prefix__`: lines shown before the item.
	ExtraPrefix,
	/// `__extra_suffix__`: lines shown after the item.
	ExtraSuffix,
}

impl ImplicitKey {
	pub const ALL: [ImplicitKey; 4] = [
		ImplicitKey::Name,
		ImplicitKey::ExtraPrefix,
		ImplicitKey::ExtraSuffix,
		ImplicitKey::Color,
	];

	pub fn parse(key: &str) -> Option<Self> {
		Some(match key {
			"__name__" => ImplicitKey::Name,
			"__color__" => ImplicitKey::Color,
			"__extra_prefix__" => ImplicitKey::ExtraPrefix,
			"__extra_suffix__" => ImplicitKey::ExtraSuffix,
			_ => return None,
		})
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ImplicitKey::Name => "__name__",
			ImplicitKey::Color => "__color__",
			ImplicitKey::ExtraPrefix => "__extra_prefix__",
			ImplicitKey::ExtraSuffix => "__extra_suffix__",
		}
	}

	/// Returns whether the key is valid on function tags.
	pub fn applies_to_functions(self) -> bool {
		matches!(self, ImplicitKey::Name | ImplicitKey::Color)
	}

	/// Reads the attribute, `None` when it is unset.
	pub fn read<H: Host + ?Sized>(self, host: &H, ea: Ea) -> Option<TagValue> {
		match self {
			ImplicitKey::Name => host.name(ea).map(TagValue::Str),
			ImplicitKey::Color => Rgb::from_item_color(host.item_color(ea)).map(|rgb| TagValue::Int(rgb.get().into())),
			ImplicitKey::ExtraPrefix => extra::get(host, ea, Side::Prefix).map(TagValue::Str),
			ImplicitKey::ExtraSuffix => extra::get(host, ea, Side::Suffix).map(TagValue::Str),
		}
	}

	/// Writes the attribute, returning its previous value.
	pub fn write<H: Host + ?Sized>(self, host: &mut H, ea: Ea, value: TagValue) -> Result<Option<TagValue>> {
		let previous = self.read(&*host, ea);
		match self {
			ImplicitKey::Name => {
				let name = self.expect_str(&value)?;
				if name.is_empty() {
					return Err(TagError::invalid(self.as_str(), "names cannot be empty"));
				}
				host.set_name(ea, Some(name), true).map_err(|error| match error {
					HostError::InvalidName { name, .. } => {
						TagError::invalid(self.as_str(), format!("the database rejected the name {name:?}"))
					}
					other => other.into(),
				})?;
			}
			ImplicitKey::Color => {
				let rgb = value
					.as_int()
					.and_then(|raw| u32::try_from(raw).ok())
					.and_then(Rgb::new)
					.ok_or_else(|| TagError::invalid(self.as_str(), format!("expected an integer 0..={:#x}, got {value}", Rgb::MAX)))?;
				host.set_item_color(ea, rgb.to_item_color())?;
			}
			ImplicitKey::ExtraPrefix | ImplicitKey::ExtraSuffix => {
				let text = self.expect_str(&value)?;
				extra::set(host, ea, self.side(), text)?;
			}
		}
		Ok(previous)
	}

	/// Clears the attribute, returning the removed value.
	pub fn clear<H: Host + ?Sized>(self, host: &mut H, ea: Ea) -> Result<TagValue> {
		let previous = self
			.read(&*host, ea)
			.ok_or_else(|| TagError::not_found(ea, self.as_str()))?;
		match self {
			ImplicitKey::Name => host.set_name(ea, None, true)?,
			ImplicitKey::Color => host.set_item_color(ea, DEFCOLOR)?,
			ImplicitKey::ExtraPrefix | ImplicitKey::ExtraSuffix => {
				extra::delete(host, ea, self.side());
			}
		}
		Ok(previous)
	}

	fn side(self) -> Side {
		match self {
			ImplicitKey::ExtraSuffix => Side::Suffix,
			_ => Side::Prefix,
		}
	}

	fn expect_str(self, value: &TagValue) -> Result<&str> {
		value
			.as_str()
			.ok_or_else(|| TagError::invalid(self.as_str(), format!("expected a string, got a {}", value.type_name())))
	}
}

impl fmt::Display for ImplicitKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Adds each present attribute in `keys` to `tags` unless the key is taken.
pub(crate) fn overlay<H: Host + ?Sized>(host: &H, ea: Ea, keys: &[ImplicitKey], tags: &mut TagMap) {
	for key in keys {
		if let Some(value) = key.read(host, ea) {
			tags.entry(key.as_str().to_string()).or_insert(value);
		}
	}
}
