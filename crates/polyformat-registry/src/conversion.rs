//! Cross-format conversion and structural comparison.
//!
//! Payloads are decoded with the codec registered for their format and then
//! re-encoded or compared as values, so the same data carried as JSON and as
//! XML compares equal.

use polyformat_core::codec::{Codec, Payload};
use polyformat_core::error::{CodecError, CodecResult, Stage};
use polyformat_core::structural::{Structural, are_objects_equal, object_differences};
use tracing::{debug, warn};

use crate::registry::FormatRegistry;

/// Conversion and comparison over the codecs of one [`FormatRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct VersionedConversion<'r> {
	registry: &'r FormatRegistry,
}

impl<'r> VersionedConversion<'r> {
	/// Works against `registry`.
	pub fn new(registry: &'r FormatRegistry) -> Self {
		Self { registry }
	}

	/// Re-encodes `data` from `source_format` into `target_format`.
	///
	/// # Errors
	///
	/// Unknown formats are reported as resolved by the registry. Codec
	/// failures are wrapped in [`CodecError::Stage`] naming the side that
	/// failed.
	pub fn convert_between_formats<T: Payload>(
		&self,
		data: &str,
		source_format: &str,
		target_format: &str,
	) -> CodecResult<String> {
		let source = self.registry.resolve::<T>(source_format)?;
		let target = self.registry.resolve::<T>(target_format)?;

		let value = staged(Stage::Decode, source.format(), source.deserialize(data))?;
		let converted = staged(Stage::Encode, target.format(), target.serialize(&value))?;
		debug!(
			source = source.format(),
			target = target.format(),
			"Converted payload between formats"
		);
		Ok(converted)
	}

	/// Whether two payloads decode to structurally equal values.
	///
	/// A null payload equals only another null payload.
	pub fn compare_serialized_data<T: Payload + Structural>(
		&self,
		data1: &str,
		format1: &str,
		data2: &str,
		format2: &str,
	) -> CodecResult<bool> {
		let (first, second) = self.decode_pair::<T>(data1, format1, data2, format2)?;
		Ok(are_objects_equal(first.as_ref(), second.as_ref()))
	}

	/// Field-level differences between two payloads.
	///
	/// Empty exactly when [`Self::compare_serialized_data`] returns true.
	pub fn get_differences<T: Payload + Structural>(
		&self,
		data1: &str,
		format1: &str,
		data2: &str,
		format2: &str,
	) -> CodecResult<Vec<String>> {
		let (first, second) = self.decode_pair::<T>(data1, format1, data2, format2)?;
		let differences = object_differences(first.as_ref(), second.as_ref());
		if !differences.is_empty() {
			warn!(count = differences.len(), "Payloads differ");
		}
		Ok(differences)
	}

	fn decode_pair<T: Payload>(
		&self,
		data1: &str,
		format1: &str,
		data2: &str,
		format2: &str,
	) -> CodecResult<(Option<T>, Option<T>)> {
		let first_codec = self.registry.resolve::<T>(format1)?;
		let second_codec = self.registry.resolve::<T>(format2)?;
		let first = staged(
			Stage::Decode,
			first_codec.format(),
			first_codec.deserialize_nullable(data1),
		)?;
		let second = staged(
			Stage::Decode,
			second_codec.format(),
			second_codec.deserialize_nullable(data2),
		)?;
		Ok((first, second))
	}
}

fn staged<V>(stage: Stage, format: &str, result: CodecResult<V>) -> CodecResult<V> {
	result.map_err(|source| CodecError::Stage {
		stage,
		format: format.to_string(),
		source: Box::new(source),
	})
}

/// [`VersionedConversion::convert_between_formats`] over the global registry.
pub fn convert_between_formats<T: Payload>(
	data: &str,
	source_format: &str,
	target_format: &str,
) -> CodecResult<String> {
	FormatRegistry::global()
		.conversion()
		.convert_between_formats::<T>(data, source_format, target_format)
}

/// [`VersionedConversion::compare_serialized_data`] over the global registry.
pub fn compare_serialized_data<T: Payload + Structural>(
	data1: &str,
	format1: &str,
	data2: &str,
	format2: &str,
) -> CodecResult<bool> {
	FormatRegistry::global()
		.conversion()
		.compare_serialized_data::<T>(data1, format1, data2, format2)
}

/// [`VersionedConversion::get_differences`] over the global registry.
pub fn get_differences<T: Payload + Structural>(
	data1: &str,
	format1: &str,
	data2: &str,
	format2: &str,
) -> CodecResult<Vec<String>> {
	FormatRegistry::global()
		.conversion()
		.get_differences::<T>(data1, format1, data2, format2)
}

#[cfg(test)]
mod tests {
	use super::*;
	use polyformat_core::versioned::VersionObject;
	use rstest::{fixture, rstest};

	#[fixture]
	fn registry() -> FormatRegistry {
		FormatRegistry::with_builtin_formats()
	}

	#[rstest]
	#[case("JSON", "XML")]
	#[case("XML", "YAML")]
	#[case("YAML", "BSON")]
	#[case("BSON", "JSON_CANONICAL")]
	fn test_convert_preserves_value(registry: FormatRegistry, #[case] from: &str, #[case] to: &str) {
		let value = VersionObject::new("1.0", "Initial");
		let source = registry.resolve::<VersionObject>(from).unwrap();
		let target = registry.resolve::<VersionObject>(to).unwrap();

		let converted = registry
			.conversion()
			.convert_between_formats::<VersionObject>(&source.serialize(&value).unwrap(), from, to)
			.unwrap();
		assert_eq!(target.deserialize(&converted).unwrap(), value);
	}

	#[rstest]
	fn test_convert_decode_failure_is_staged(registry: FormatRegistry) {
		let error = registry
			.conversion()
			.convert_between_formats::<VersionObject>("<not-json", "json", "xml")
			.unwrap_err();
		match error {
			CodecError::Stage { stage, format, source } => {
				assert_eq!(stage, Stage::Decode);
				assert_eq!(format, "JSON");
				assert!(matches!(*source, CodecError::Decode { .. }));
			}
			other => panic!("unexpected error: {other}"),
		}
	}

	#[rstest]
	fn test_convert_unknown_format(registry: FormatRegistry) {
		let error = registry
			.conversion()
			.convert_between_formats::<VersionObject>("{}", "json", "toml")
			.unwrap_err();
		assert!(matches!(error, CodecError::UnsupportedFormat(ref key) if key == "toml"));
	}

	#[rstest]
	fn test_compare_across_formats(registry: FormatRegistry) {
		let conversion = registry.conversion();
		let json = r#"{"Version":"1.0","Name":"Initial"}"#;
		let xml = "<VersionObject><Version>1.0</Version><Name>Initial</Name></VersionObject>";

		assert!(
			conversion
				.compare_serialized_data::<VersionObject>(json, "JSON", xml, "XML")
				.unwrap()
		);
		assert!(
			conversion
				.get_differences::<VersionObject>(json, "JSON", xml, "XML")
				.unwrap()
				.is_empty()
		);
	}

	#[rstest]
	fn test_version_difference_message(registry: FormatRegistry) {
		let conversion = registry.conversion();
		let v1 = r#"{"Version":"1.0","Name":"Initial"}"#;
		let v2 = r#"{"Version":"2.0","Name":"Initial"}"#;

		assert!(
			!conversion
				.compare_serialized_data::<VersionObject>(v1, "JSON", v2, "JSON")
				.unwrap()
		);
		assert_eq!(
			conversion
				.get_differences::<VersionObject>(v1, "JSON", v2, "JSON")
				.unwrap(),
			vec!["Property 'Version' differs: '1.0' vs. '2.0'".to_string()]
		);
	}

	#[rstest]
	#[case("null", "JSON", "null", "YAML", true, vec![])]
	#[case(
		"null",
		"JSON",
		r#"{"Version":"1.0","Name":"Initial"}"#,
		"JSON",
		false,
		vec!["Object 1 is null while Object 2 has a value."]
	)]
	#[case(
		"Version: '1.0'\nName: Initial\n",
		"YAML",
		"~",
		"YAML",
		false,
		vec!["Object 2 is null while Object 1 has a value."]
	)]
	fn test_null_payloads(
		registry: FormatRegistry,
		#[case] data1: &str,
		#[case] format1: &str,
		#[case] data2: &str,
		#[case] format2: &str,
		#[case] equal: bool,
		#[case] expected: Vec<&str>,
	) {
		let conversion = registry.conversion();
		assert_eq!(
			conversion
				.compare_serialized_data::<VersionObject>(data1, format1, data2, format2)
				.unwrap(),
			equal
		);
		assert_eq!(
			conversion
				.get_differences::<VersionObject>(data1, format1, data2, format2)
				.unwrap(),
			expected
		);
	}
}
