//! Core types for tagging: addresses, function extents, scopes, comment slots and tag values.

/// Item color conversion between `0xRRGGBB` and the host's byte order.
pub mod color;
/// Addresses and function extents.
pub mod ea;
/// Comment slots and index scopes.
pub mod scope;
/// Tag names, values and mappings.
pub mod value;

pub use color::{DEFCOLOR, Rgb};
pub use ea::{Ea, Function, ParseEaError};
pub use scope::{Scope, Slot};
pub use value::{NameError, TagMap, TagValue, ValueError, validate_name};
