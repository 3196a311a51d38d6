//! The codec contract implemented by every wire format.
//!
//! A format engine implements a handful of primitives (`encode`, `decode`,
//! `combine`, `split`, `read_field`). Everything else a caller needs (batches,
//! streams, gzip payloads, validation) is provided on top of them, so each
//! backend behaves identically outside its native encoding.

use std::io::{Read, Write};
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::compression;
use crate::error::{CodecError, CodecResult, EngineError};
use crate::options::OutputStyle;

/// Types that can travel through a codec.
pub trait Payload: Serialize + DeserializeOwned + Send + Sync + 'static {}

impl<T> Payload for T where T: Serialize + DeserializeOwned + Send + Sync + 'static {}

/// External schema validator (JSON Schema, XSD, ...).
///
/// Errors returned here never reach the caller of [`Codec::validate`]; they
/// are logged and reported as an invalid document.
pub trait SchemaValidator: Send + Sync {
	/// Checks `document` against `schema`.
	fn validate(&self, document: &str, schema: &str) -> Result<bool, EngineError>;
}

/// Encoder/decoder pair for one wire format and one payload type.
pub trait Codec<T>: Send + Sync {
	/// Normalized format key, e.g. `"JSON"`.
	fn format(&self) -> &str;

	/// Encodes a single value.
	fn encode(&self, value: &T, style: OutputStyle) -> CodecResult<String>;

	/// Decodes a single document.
	fn decode(&self, text: &str) -> CodecResult<T>;

	/// Wraps already-encoded documents into one array-shaped wire unit.
	fn combine(&self, documents: Vec<String>) -> CodecResult<String>;

	/// Splits a wire unit produced by [`Codec::combine`] back into documents.
	///
	/// Fails with [`CodecError::Decode`] when the outer array shape cannot be
	/// parsed.
	fn split(&self, combined: &str) -> CodecResult<Vec<String>>;

	/// Reads a top-level field straight from an encoded document, matching
	/// `name` case-insensitively. Scalars are rendered as plain text.
	fn read_field(&self, text: &str, name: &str) -> CodecResult<Option<String>>;

	/// Validator used by [`Codec::validate`]. `None` means a decode check.
	fn schema_validator(&self) -> Option<&dyn SchemaValidator> {
		None
	}

	/// Encodes `value` with compact output.
	fn serialize(&self, value: &T) -> CodecResult<String> {
		self.encode(value, OutputStyle::Compact)
	}

	/// Decodes `text`.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for empty text, otherwise whatever the engine
	/// reports.
	fn deserialize(&self, text: &str) -> CodecResult<T> {
		if text.is_empty() {
			return Err(CodecError::NullInput("text"));
		}
		self.decode(text)
	}

	/// Decodes `text`, reading a bare null literal (`null`, `~`) as `None`.
	///
	/// # Errors
	///
	/// Same as [`Codec::deserialize`].
	fn deserialize_nullable(&self, text: &str) -> CodecResult<Option<T>> {
		if is_null_literal(text) {
			return Ok(None);
		}
		self.deserialize(text).map(Some)
	}

	/// Encodes a sequence as one wire unit.
	fn serialize_batch(&self, values: &[T]) -> CodecResult<String> {
		let documents = values
			.iter()
			.map(|value| self.encode(value, OutputStyle::Compact))
			.collect::<CodecResult<Vec<_>>>()?;
		self.combine(documents)
	}

	/// Decodes a wire unit produced by [`Codec::serialize_batch`].
	fn deserialize_batch(&self, combined: &str) -> CodecResult<Vec<T>> {
		if combined.is_empty() {
			return Err(CodecError::NullInput("combined"));
		}
		self.split(combined)?
			.iter()
			.enumerate()
			.map(|(index, document)| {
				self.deserialize(document)
					.map_err(|source| CodecError::BatchElement {
						index,
						source: Box::new(source),
					})
			})
			.collect()
	}

	/// Writes the compact encoding of `value` to `sink`.
	fn serialize_to_stream(&self, value: &T, sink: &mut dyn Write) -> CodecResult<()> {
		let text = self.serialize(value)?;
		sink.write_all(text.as_bytes())?;
		sink.flush()?;
		Ok(())
	}

	/// Reads `source` to its end and decodes the text.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] when the stream yields no bytes.
	fn deserialize_from_stream(&self, source: &mut dyn Read) -> CodecResult<T> {
		let mut text = String::new();
		source.read_to_string(&mut text)?;
		if text.is_empty() {
			return Err(CodecError::NullInput("stream"));
		}
		self.decode(&text)
	}

	/// Gzip of the UTF-8 compact encoding.
	fn serialize_compressed(&self, value: &T) -> CodecResult<Vec<u8>> {
		let text = self.serialize(value)?;
		compression::compress(text.as_bytes())
	}

	/// Inverse of [`Codec::serialize_compressed`].
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for an empty buffer, [`CodecError::CorruptData`]
	/// when gzip rejects it.
	fn deserialize_compressed(&self, compressed: &[u8]) -> CodecResult<T> {
		if compressed.is_empty() {
			return Err(CodecError::NullInput("compressed_data"));
		}
		let bytes = compression::decompress(compressed)?;
		let text = String::from_utf8(bytes).map_err(|e| CodecError::CorruptData(e.to_string()))?;
		self.deserialize(&text)
	}

	/// Returns whether `text` satisfies `schema`.
	///
	/// Validator failures are logged and yield `false`.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] when `text` or `schema` is empty.
	fn validate(&self, text: &str, schema: &str) -> CodecResult<bool> {
		if text.is_empty() {
			return Err(CodecError::NullInput("text"));
		}
		if schema.is_empty() {
			return Err(CodecError::NullInput("schema"));
		}
		let outcome = match self.schema_validator() {
			Some(validator) => validator.validate(text, schema),
			None => self.decode(text).map(|_| true).map_err(EngineError::from),
		};
		match outcome {
			Ok(valid) => Ok(valid),
			Err(cause) => {
				tracing::warn!(format = self.format(), error = %cause, "Schema validation failed");
				Ok(false)
			}
		}
	}
}

impl<T, C> Codec<T> for Arc<C>
where
	C: Codec<T> + ?Sized,
{
	fn format(&self) -> &str {
		(**self).format()
	}

	fn encode(&self, value: &T, style: OutputStyle) -> CodecResult<String> {
		(**self).encode(value, style)
	}

	fn decode(&self, text: &str) -> CodecResult<T> {
		(**self).decode(text)
	}

	fn combine(&self, documents: Vec<String>) -> CodecResult<String> {
		(**self).combine(documents)
	}

	fn split(&self, combined: &str) -> CodecResult<Vec<String>> {
		(**self).split(combined)
	}

	fn read_field(&self, text: &str, name: &str) -> CodecResult<Option<String>> {
		(**self).read_field(text, name)
	}

	fn deserialize_nullable(&self, text: &str) -> CodecResult<Option<T>> {
		(**self).deserialize_nullable(text)
	}

	fn schema_validator(&self) -> Option<&dyn SchemaValidator> {
		(**self).schema_validator()
	}
}

fn is_null_literal(text: &str) -> bool {
	matches!(text.trim(), "null" | "Null" | "NULL" | "~")
}

/// Shared codec handle, as handed out by registries.
pub type SharedCodec<T> = Arc<dyn Codec<T>>;

/// Renders a JSON scalar the way field readers and diffs print it.
///
/// `null` becomes `None`, strings are unquoted, everything else is compact JSON.
pub fn render_json_scalar(value: &serde_json::Value) -> Option<String> {
	match value {
		serde_json::Value::Null => None,
		serde_json::Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}
