//! BSON engine backed by the `bson` crate.
//!
//! BSON is binary, so documents travel as lowercase hex text (see
//! [`crate::hex`]). A combined batch is a single document holding every
//! element in its `Messages` array.

use std::marker::PhantomData;
use std::sync::Arc;

use ::bson::{Bson, Document};

use super::BSON;
use crate::codec::{Codec, Payload, SchemaValidator};
use crate::error::{CodecError, CodecResult};
use crate::hex::{bytes_to_hex, hex_to_bytes};
use crate::options::OutputStyle;

const MESSAGES_FIELD: &str = "Messages";

/// BSON codec.
pub struct BsonCodec<T> {
	validator: Option<Arc<dyn SchemaValidator>>,
	_marker: PhantomData<fn() -> T>,
}

impl<T> BsonCodec<T> {
	/// Creates a BSON codec.
	pub fn new() -> Self {
		Self {
			validator: None,
			_marker: PhantomData,
		}
	}

	/// Sets the schema validator.
	pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
		self.validator = Some(validator);
		self
	}
}

impl<T> Default for BsonCodec<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Clone for BsonCodec<T> {
	fn clone(&self) -> Self {
		Self {
			validator: self.validator.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for BsonCodec<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BsonCodec").finish()
	}
}

fn read_document(text: &str) -> CodecResult<Document> {
	let bytes = hex_to_bytes(text.trim())?;
	::bson::deserialize_from_slice(&bytes).map_err(|e| CodecError::decode(BSON, e))
}

fn write_document(document: &Document) -> CodecResult<String> {
	let bytes = ::bson::serialize_to_vec(document).map_err(|e| CodecError::encode(BSON, e))?;
	Ok(bytes_to_hex(&bytes))
}

impl<T: Payload> Codec<T> for BsonCodec<T> {
	fn format(&self) -> &str {
		BSON
	}

	fn encode(&self, value: &T, _style: OutputStyle) -> CodecResult<String> {
		let bytes = ::bson::serialize_to_vec(value).map_err(|e| CodecError::encode(BSON, e))?;
		Ok(bytes_to_hex(&bytes))
	}

	fn decode(&self, text: &str) -> CodecResult<T> {
		let bytes = hex_to_bytes(text.trim())?;
		::bson::deserialize_from_slice(&bytes).map_err(|e| CodecError::decode(BSON, e))
	}

	fn combine(&self, documents: Vec<String>) -> CodecResult<String> {
		let messages = documents
			.iter()
			.map(|document| read_document(document).map(Bson::Document))
			.collect::<CodecResult<Vec<_>>>()?;
		let mut envelope = Document::new();
		envelope.insert(MESSAGES_FIELD, Bson::Array(messages));
		write_document(&envelope)
	}

	fn split(&self, combined: &str) -> CodecResult<Vec<String>> {
		let envelope = read_document(combined).map_err(|e| match e {
			CodecError::Decode { .. } => e,
			other => CodecError::decode(BSON, other),
		})?;
		let messages = match envelope.get(MESSAGES_FIELD) {
			Some(Bson::Array(messages)) => messages,
			_ => {
				return Err(CodecError::decode(
					BSON,
					"expected a 'Messages' array in the combined document",
				));
			}
		};
		messages
			.iter()
			.enumerate()
			.map(|(index, message)| match message {
				Bson::Document(document) => write_document(document),
				other => Err(CodecError::BatchElement {
					index,
					source: Box::new(CodecError::decode(
						BSON,
						format!("expected an embedded document, found {:?}", other.element_type()),
					)),
				}),
			})
			.collect()
	}

	fn read_field(&self, text: &str, name: &str) -> CodecResult<Option<String>> {
		let document = read_document(text)?;
		let found = document
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value);
		Ok(match found {
			None | Some(Bson::Null) => None,
			Some(Bson::String(s)) => Some(s.clone()),
			Some(other) => Some(other.to_string()),
		})
	}

	fn schema_validator(&self) -> Option<&dyn SchemaValidator> {
		self.validator.as_deref()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde::{Deserialize, Serialize};

	#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
	#[serde(rename_all = "PascalCase")]
	struct Person {
		name: String,
		age: i32,
		version: String,
	}

	fn person(name: &str) -> Person {
		Person {
			name: name.to_string(),
			age: 30,
			version: "1.0".to_string(),
		}
	}

	#[rstest]
	fn test_output_is_lowercase_hex() {
		let text = BsonCodec::<Person>::new().serialize(&person("John Doe")).unwrap();
		assert_eq!(text.len() % 2, 0);
		assert!(text.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
	}

	#[rstest]
	fn test_round_trip() {
		let codec = BsonCodec::<Person>::new();
		let text = codec.serialize(&person("John Doe")).unwrap();
		assert_eq!(codec.deserialize(&text).unwrap(), person("John Doe"));
	}

	#[rstest]
	fn test_odd_hex_is_rejected() {
		let error = BsonCodec::<Person>::new().deserialize("abc").unwrap_err();
		assert!(matches!(error, CodecError::OddLength(3)));
	}

	#[rstest]
	fn test_batch_uses_messages_envelope() {
		let codec = BsonCodec::<Person>::new();
		let values = vec![person("John Doe"), person("Jane Doe")];
		let combined = codec.serialize_batch(&values).unwrap();

		let envelope = read_document(&combined).unwrap();
		assert_eq!(envelope.get_array(MESSAGES_FIELD).unwrap().len(), 2);
		assert_eq!(codec.deserialize_batch(&combined).unwrap(), values);
	}

	#[rstest]
	fn test_split_without_messages_is_decode_error() {
		let codec = BsonCodec::<Person>::new();
		let single = codec.serialize(&person("John Doe")).unwrap();
		let error = codec.split(&single).unwrap_err();
		assert!(matches!(error, CodecError::Decode { .. }));
	}

	#[rstest]
	#[case("abc")]
	#[case("zzzz")]
	fn test_split_unreadable_hex_is_decode_error(#[case] input: &str) {
		let error = BsonCodec::<Person>::new().split(input).unwrap_err();
		assert!(matches!(error, CodecError::Decode { .. }));
	}

	#[rstest]
	fn test_split_non_document_element() {
		let mut envelope = Document::new();
		envelope.insert(MESSAGES_FIELD, Bson::Array(vec![Bson::Int32(1)]));
		let combined = write_document(&envelope).unwrap();

		let error = BsonCodec::<Person>::new().split(&combined).unwrap_err();
		assert!(matches!(error, CodecError::BatchElement { index: 0, .. }));
	}

	#[rstest]
	#[case("version", Some("1.0"))]
	#[case("Age", Some("30"))]
	#[case("Missing", None)]
	fn test_read_field(#[case] name: &str, #[case] expected: Option<&str>) {
		let codec = BsonCodec::<Person>::new();
		let text = codec.serialize(&person("John Doe")).unwrap();
		assert_eq!(codec.read_field(&text, name).unwrap().as_deref(), expected);
	}
}
