//! Version-stamped encoding.

use polyformat_core::codec::{Codec, Payload, SharedCodec};
use polyformat_core::error::{CodecError, CodecResult};
use polyformat_core::versioned::{VERSION_FIELD, Versioned, VersionedDocument};
use tracing::debug;

/// Codec wrapper that stamps and reads back the `Version` marker.
pub struct VersionedCodec<T> {
	codec: SharedCodec<T>,
}

impl<T> Clone for VersionedCodec<T> {
	fn clone(&self) -> Self {
		Self {
			codec: self.codec.clone(),
		}
	}
}

impl<T> std::fmt::Debug for VersionedCodec<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("VersionedCodec")
			.field("format", &self.codec.format())
			.finish()
	}
}

impl<T: Payload + Versioned> VersionedCodec<T> {
	/// Wraps `codec`.
	pub fn new(codec: SharedCodec<T>) -> Self {
		Self { codec }
	}

	/// Underlying codec.
	pub fn codec(&self) -> &SharedCodec<T> {
		&self.codec
	}

	/// Sets the version on `value`, then encodes it.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] when `version` is empty or `value` carries no
	/// version yet.
	pub fn serialize_with_version(
		&self,
		value: &mut T,
		version: &str,
	) -> CodecResult<VersionedDocument> {
		if version.is_empty() {
			return Err(CodecError::NullInput("version"));
		}
		if value.version().is_none_or(str::is_empty) {
			return Err(CodecError::NullInput("value.version"));
		}

		value.set_version(version.to_string());
		let body = self.codec.serialize(value)?;
		debug!(format = self.codec.format(), version, "Serialized versioned payload");
		Ok(VersionedDocument::new(self.codec.format(), body))
	}

	/// Decodes `document` and returns the value with its wire version.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for an empty body and
	/// [`CodecError::MissingField`] when the body carries no version marker.
	pub fn deserialize_with_version(&self, document: &VersionedDocument) -> CodecResult<(T, String)> {
		if document.body.is_empty() {
			return Err(CodecError::NullInput("body"));
		}

		let version = self
			.codec
			.read_field(&document.body, VERSION_FIELD)?
			.filter(|v| !v.is_empty())
			.ok_or_else(|| CodecError::MissingField(VERSION_FIELD.to_string()))?;
		let value = self.codec.deserialize(&document.body)?;
		Ok((value, version))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use polyformat_core::formats::{BsonCodec, JsonCodec, XmlCodec, YamlCodec};
	use polyformat_core::versioned::VersionObject;
	use rstest::rstest;

	fn codec(format: &str) -> VersionedCodec<VersionObject> {
		let codec: SharedCodec<VersionObject> = match format {
			"JSON" => Arc::new(JsonCodec::<VersionObject>::new()),
			"XML" => Arc::new(XmlCodec::<VersionObject>::new()),
			"YAML" => Arc::new(YamlCodec::<VersionObject>::new()),
			_ => Arc::new(BsonCodec::<VersionObject>::new()),
		};
		VersionedCodec::new(codec)
	}

	#[rstest]
	#[case("JSON")]
	#[case("XML")]
	#[case("YAML")]
	#[case("BSON")]
	fn test_version_round_trip(#[case] format: &str) {
		let codec = codec(format);
		let mut value = VersionObject::new("1.0", "Initial");

		let document = codec.serialize_with_version(&mut value, "2.0").unwrap();
		assert_eq!(value.version, "2.0");
		assert_eq!(document.format, format);

		let (back, version) = codec.deserialize_with_version(&document).unwrap();
		assert_eq!(version, "2.0");
		assert_eq!(back, value);
	}

	#[rstest]
	fn test_empty_version_rejected() {
		let mut value = VersionObject::new("1.0", "Initial");
		assert!(matches!(
			codec("JSON").serialize_with_version(&mut value, ""),
			Err(CodecError::NullInput("version"))
		));
		assert_eq!(value.version, "1.0");
	}

	#[rstest]
	fn test_value_without_version_rejected() {
		let mut value = VersionObject::new("", "Initial");
		assert!(matches!(
			codec("JSON").serialize_with_version(&mut value, "2.0"),
			Err(CodecError::NullInput("value.version"))
		));
	}

	#[rstest]
	#[case(r#"{"Name":"Initial"}"#)]
	#[case(r#"{"Version":"","Name":"Initial"}"#)]
	#[case("{}")]
	fn test_missing_marker(#[case] body: &str) {
		let document = VersionedDocument::new("json", body);
		let error = codec("JSON").deserialize_with_version(&document).unwrap_err();
		assert!(matches!(error, CodecError::MissingField(ref field) if field == "Version"));
	}

	#[rstest]
	fn test_empty_body() {
		let document = VersionedDocument::new("json", "");
		assert!(matches!(
			codec("JSON").deserialize_with_version(&document),
			Err(CodecError::NullInput("body"))
		));
	}
}
