//! JSON engine backed by `serde_json`.
//!
//! Two variants share this type. The regular engine writes fields in
//! declaration order. The canonical engine goes through a `serde_json::Value`
//! tree and sorts object keys, so equal values always produce byte-identical
//! text.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::{JSON, JSON_CANONICAL};
use crate::codec::{Codec, Payload, SchemaValidator, render_json_scalar};
use crate::error::{CodecError, CodecResult};
use crate::options::{JsonSettings, OutputStyle};

/// JSON codec.
pub struct JsonCodec<T> {
	settings: JsonSettings,
	canonical: bool,
	validator: Option<Arc<dyn SchemaValidator>>,
	_marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T> {
	/// Creates the regular JSON engine with default settings.
	pub fn new() -> Self {
		Self {
			settings: JsonSettings::default(),
			canonical: false,
			validator: None,
			_marker: PhantomData,
		}
	}

	/// Creates the canonical engine (`JSON_CANONICAL`).
	pub fn canonical() -> Self {
		Self {
			canonical: true,
			..Self::new()
		}
	}

	/// Sets engine settings.
	pub fn with_settings(mut self, settings: JsonSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Sets the schema validator.
	pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
		self.validator = Some(validator);
		self
	}

	/// Returns true for the canonical engine.
	pub fn is_canonical(&self) -> bool {
		self.canonical
	}

	fn key(&self) -> &'static str {
		if self.canonical { JSON_CANONICAL } else { JSON }
	}

	fn write<S: Serialize + ?Sized>(&self, value: &S, style: OutputStyle) -> CodecResult<String> {
		match style {
			OutputStyle::Compact => {
				serde_json::to_string(value).map_err(|e| CodecError::encode(self.key(), e))
			}
			OutputStyle::Indented => {
				let indent = vec![b' '; self.settings.indent_width];
				let mut buffer = Vec::new();
				let mut serializer = serde_json::Serializer::with_formatter(
					&mut buffer,
					PrettyFormatter::with_indent(&indent),
				);
				value
					.serialize(&mut serializer)
					.map_err(|e| CodecError::encode(self.key(), e))?;
				String::from_utf8(buffer).map_err(|e| CodecError::encode(self.key(), e))
			}
		}
	}
}

impl<T> Default for JsonCodec<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Clone for JsonCodec<T> {
	fn clone(&self) -> Self {
		Self {
			settings: self.settings.clone(),
			canonical: self.canonical,
			validator: self.validator.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for JsonCodec<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("JsonCodec")
			.field("format", &self.key())
			.field("settings", &self.settings)
			.finish()
	}
}

impl<T: Payload> Codec<T> for JsonCodec<T> {
	fn format(&self) -> &str {
		self.key()
	}

	fn encode(&self, value: &T, style: OutputStyle) -> CodecResult<String> {
		if self.canonical {
			let tree = serde_json::to_value(value).map_err(|e| CodecError::encode(self.key(), e))?;
			self.write(&sort_keys(tree), style)
		} else {
			self.write(value, style)
		}
	}

	fn decode(&self, text: &str) -> CodecResult<T> {
		serde_json::from_str(text).map_err(|e| CodecError::decode(self.key(), e))
	}

	fn combine(&self, documents: Vec<String>) -> CodecResult<String> {
		Ok(format!("[{}]", documents.join(",")))
	}

	fn split(&self, combined: &str) -> CodecResult<Vec<String>> {
		let items: Vec<Value> =
			serde_json::from_str(combined).map_err(|e| CodecError::decode(self.key(), e))?;
		Ok(items.iter().map(Value::to_string).collect())
	}

	fn read_field(&self, text: &str, name: &str) -> CodecResult<Option<String>> {
		let document: Value =
			serde_json::from_str(text).map_err(|e| CodecError::decode(self.key(), e))?;
		Ok(document.as_object().and_then(|object| {
			object
				.iter()
				.find(|(key, _)| key.eq_ignore_ascii_case(name))
				.and_then(|(_, value)| render_json_scalar(value))
		}))
	}

	fn schema_validator(&self) -> Option<&dyn SchemaValidator> {
		self.validator.as_deref()
	}
}

fn sort_keys(value: Value) -> Value {
	match value {
		Value::Object(object) => {
			let mut entries: Vec<(String, Value)> = object.into_iter().collect();
			entries.sort_by(|a, b| a.0.cmp(&b.0));
			let sorted: Map<String, Value> = entries
				.into_iter()
				.map(|(key, value)| (key, sort_keys(value)))
				.collect();
			Value::Object(sorted)
		}
		Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
		other => other,
	}
}
