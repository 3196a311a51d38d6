//! Structural equality and field-level diffs.
//!
//! A type opts in by listing its fields in declaration order. Types that
//! already derive `Serialize` get that for free through [`impl_structural!`]:
//!
//! ```
//! use polyformat_core::impl_structural;
//! use polyformat_core::structural::{Structural, object_differences};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Release {
//! 	version: String,
//! 	name: String,
//! }
//!
//! impl_structural!(Release);
//!
//! let a = Release { version: "1.0".into(), name: "core".into() };
//! let b = Release { version: "2.0".into(), name: "core".into() };
//!
//! assert!(!a.structurally_eq(&b));
//! assert_eq!(
//! 	object_differences(Some(&a), Some(&b)),
//! 	vec!["Property 'Version' differs: '1.0' vs. '2.0'".to_string()]
//! );
//! ```
//!
//! Field values are compared by value at every depth, nested objects and
//! sequences included.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::codec::render_json_scalar;

/// One named field of a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
	/// Field name as it appears on the wire.
	pub name: String,
	/// Field value.
	pub value: Value,
}

impl Field {
	/// Creates a field.
	pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
		}
	}

	/// Value as printed in difference messages; null renders as empty.
	pub fn display_value(&self) -> String {
		render_json_scalar(&self.value).unwrap_or_default()
	}
}

/// Enumerates a value's public fields in a fixed order.
pub trait Structural {
	/// Fields in declaration order.
	fn fields(&self) -> Vec<Field>;

	/// Stable, order-preserving text form of every field.
	fn canonical(&self) -> String {
		let object: Map<String, Value> = self
			.fields()
			.into_iter()
			.map(|field| (field.name, field.value))
			.collect();
		Value::Object(object).to_string()
	}

	/// True when both canonical forms are identical.
	fn structurally_eq(&self, other: &Self) -> bool {
		self.canonical() == other.canonical()
	}
}

/// Builds fields from a value's serde representation.
///
/// Structs and maps yield one field per entry. Any other shape yields a single
/// field named `value`.
pub fn serde_fields<T: Serialize + ?Sized>(value: &T) -> Vec<Field> {
	match serde_json::to_value(value) {
		Ok(Value::Object(object)) => object
			.into_iter()
			.map(|(name, value)| Field { name, value })
			.collect(),
		Ok(other) => vec![Field::new("value", other)],
		Err(e) => {
			tracing::warn!(
				type_name = std::any::type_name::<T>(),
				error = %e,
				"Value cannot be represented structurally"
			);
			Vec::new()
		}
	}
}

/// Implements [`Structural`] through [`serde_fields`] for `Serialize` types.
#[macro_export]
macro_rules! impl_structural {
	($($ty:ty),+ $(,)?) => {
		$(
			impl $crate::structural::Structural for $ty {
				fn fields(&self) -> ::std::vec::Vec<$crate::structural::Field> {
					$crate::structural::serde_fields(self)
				}
			}
		)+
	};
}

/// Both absent, or both present with identical canonical forms.
pub fn are_objects_equal<T: Structural>(first: Option<&T>, second: Option<&T>) -> bool {
	match (first, second) {
		(None, None) => true,
		(Some(first), Some(second)) => first.structurally_eq(second),
		_ => false,
	}
}

/// Human-readable list of differences between two optional values.
///
/// Empty exactly when [`are_objects_equal`] is true.
pub fn object_differences<T: Structural>(first: Option<&T>, second: Option<&T>) -> Vec<String> {
	let (first, second) = match (first, second) {
		(None, None) => return Vec::new(),
		(None, Some(_)) => return vec!["Object 1 is null while Object 2 has a value.".to_string()],
		(Some(_), None) => return vec!["Object 2 is null while Object 1 has a value.".to_string()],
		(Some(first), Some(second)) => (first.fields(), second.fields()),
	};

	let mut differences = Vec::new();
	for (index, left) in first.iter().enumerate() {
		let right = second
			.get(index)
			.filter(|right| right.name == left.name)
			.or_else(|| second.iter().find(|right| right.name == left.name));
		let right_value = right.map(Field::display_value).unwrap_or_default();
		if right.map(|right| &right.value) != Some(&left.value) {
			differences.push(format!(
				"Property '{}' differs: '{}' vs. '{}'",
				left.name,
				left.display_value(),
				right_value
			));
		}
	}
	for right in second
		.iter()
		.filter(|right| !first.iter().any(|left| left.name == right.name))
	{
		differences.push(format!(
			"Property '{}' differs: '' vs. '{}'",
			right.name,
			right.display_value()
		));
	}
	differences
}
