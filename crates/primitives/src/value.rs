use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Number, Value};
use thiserror::Error;


/// A location's tags, keyed by tag name.
pub type TagMap = BTreeMap<String, TagValue>;

/// A value stored under a tag name.
///
/// There is no null variant: removing a tag is a separate operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
	/// UTF-8 text.
	Str(String),
	/// Signed 64-bit integer.
	Int(i64),
	/// Finite 64-bit float.
	Float(f64),
	/// Boolean.
	Bool(bool),
	/// Ordered sequence of values.
	List(Vec<TagValue>),
}

/// A value that cannot be stored as a tag.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
	/// Null has no stored form; delete the tag instead.
	#[error("null is not a storable value")]
	Null,
	/// Objects have no stored form.
	#[error("objects are not storable values")]
	Object,
	/// The integer does not fit in an `i64`.
	#[error("integer {0} does not fit in 64 signed bits")]
	IntegerRange(Number),
	/// NaN or infinity.
	#[error("float {0} is not finite")]
	NonFinite(f64),
}

/// A tag name that cannot be stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
	#[error("tag name is empty")]
	Empty,
	#[error("tag name contains forbidden character {0:?}")]
	Forbidden(char),
}

/// Checks that a tag name can round-trip through a comment blob.
///
/// Names are non-empty and carry no NUL, CR or LF.
pub fn validate_name(name: &str) -> Result<(), NameError> {
	if name.is_empty() {
		return Err(NameError::Empty);
	}
	match name.chars().find(|c| matches!(c, '\0' | '\r' | '\n')) {
		Some(c) => Err(NameError::Forbidden(c)),
		None => Ok(()),
	}
}

impl TagValue {
	/// Returns a short name for the value's type.
	pub fn type_name(&self) -> &'static str {
		match self {
			TagValue::Str(_) => "string",
			TagValue::Int(_) => "integer",
			TagValue::Float(_) => "float",
			TagValue::Bool(_) => "boolean",
			TagValue::List(_) => "list",
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			TagValue::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			TagValue::Int(i) => Some(*i),
			_ => None,
		}
	}

	/// Rejects values with no stored form (non-finite floats, at any depth).
	pub fn check(&self) -> Result<(), ValueError> {
		match self {
			TagValue::Float(f) if !f.is_finite() => Err(ValueError::NonFinite(*f)),
			TagValue::List(items) => items.iter().try_for_each(TagValue::check),
			_ => Ok(()),
		}
	}

	/// Converts to a JSON value.
	///
	/// Floats stay floats: `1.0` serializes as `1.0`, never `1`.
	pub fn to_json(&self) -> Result<Value, ValueError> {
		Ok(match self {
			TagValue::Str(s) => Value::String(s.clone()),
			TagValue::Int(i) => Value::Number((*i).into()),
			TagValue::Float(f) => Value::Number(Number::from_f64(*f).ok_or(ValueError::NonFinite(*f))?),
			TagValue::Bool(b) => Value::Bool(*b),
			TagValue::List(items) => Value::Array(items.iter().map(TagValue::to_json).collect::<Result<_, _>>()?),
		})
	}
}

impl TryFrom<Value> for TagValue {
	type Error = ValueError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		Ok(match value {
			Value::Null => return Err(ValueError::Null),
			Value::Object(_) => return Err(ValueError::Object),
			Value::Bool(b) => TagValue::Bool(b),
			Value::String(s) => TagValue::Str(s),
			Value::Number(n) => {
				if let Some(i) = n.as_i64() {
					TagValue::Int(i)
				} else if n.is_f64()
					&& let Some(f) = n.as_f64()
				{
					TagValue::Float(f)
				} else {
					return Err(ValueError::IntegerRange(n));
				}
			}
			Value::Array(items) => TagValue::List(items.into_iter().map(TagValue::try_from).collect::<Result<_, _>>()?),
		})
	}
}

impl fmt::Display for TagValue {
	/// Strings display bare; everything else displays as JSON.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TagValue::Str(s) => f.write_str(s),
			TagValue::Int(i) => write!(f, "{i}"),
			TagValue::Float(x) => write!(f, "{x:?}"),
			TagValue::Bool(b) => write!(f, "{b}"),
			TagValue::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					match item {
						TagValue::Str(s) => write!(f, "{s:?}")?,
						other => write!(f, "{other}")?,
					}
				}
				f.write_str("]")
			}
		}
	}
}

impl From<&str> for TagValue {
	fn from(s: &str) -> Self {
		TagValue::Str(s.to_string())
	}
}

impl From<String> for TagValue {
	fn from(s: String) -> Self {
		TagValue::Str(s)
	}
}

impl From<i64> for TagValue {
	fn from(i: i64) -> Self {
		TagValue::Int(i)
	}
}

impl From<i32> for TagValue {
	fn from(i: i32) -> Self {
		TagValue::Int(i.into())
	}
}

impl From<u32> for TagValue {
	fn from(i: u32) -> Self {
		TagValue::Int(i.into())
	}
}

impl From<f64> for TagValue {
	fn from(f: f64) -> Self {
		TagValue::Float(f)
	}
}

impl From<bool> for TagValue {
	fn from(b: bool) -> Self {
		TagValue::Bool(b)
	}
}

impl<T: Into<TagValue>> From<Vec<T>> for TagValue {
	fn from(items: Vec<T>) -> Self {
		TagValue::List(items.into_iter().map(Into::into).collect())
	}
}
