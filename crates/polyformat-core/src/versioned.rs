//! Version-carrying payloads.

use serde::{Deserialize, Serialize};

use crate::formats::normalize_format;

/// Wire name of the version marker.
pub const VERSION_FIELD: &str = "Version";

/// A payload exposing a mutable version marker.
///
/// The marker must be serialized under the field name [`VERSION_FIELD`]
/// (matched case-insensitively when read back from the wire).
pub trait Versioned {
	/// Current version, if any.
	fn version(&self) -> Option<&str>;

	/// Replaces the version.
	fn set_version(&mut self, version: String);
}

/// Encoded payload together with the format that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionedDocument {
	/// Normalized format key.
	pub format: String,
	/// Encoded payload.
	pub body: String,
}

impl VersionedDocument {
	/// Creates a document, normalizing the format key.
	pub fn new(format: &str, body: impl Into<String>) -> Self {
		Self {
			format: normalize_format(format),
			body: body.into(),
		}
	}
}

/// Minimal versioned payload: a version and a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VersionObject {
	/// Version marker.
	pub version: String,
	/// Display name.
	pub name: String,
}

impl VersionObject {
	/// Creates a version object.
	pub fn new(version: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			version: version.into(),
			name: name.into(),
		}
	}
}

impl Versioned for VersionObject {
	fn version(&self) -> Option<&str> {
		Some(&self.version).filter(|v| !v.is_empty()).map(String::as_str)
	}

	fn set_version(&mut self, version: String) {
		self.version = version;
	}
}

crate::impl_structural!(VersionObject);
