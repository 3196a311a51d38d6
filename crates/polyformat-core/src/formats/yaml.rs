//! YAML engine backed by `serde_yaml`.
//!
//! YAML output is always block style, so the requested [`OutputStyle`] has no
//! effect. Combined batches are a top-level sequence.

use std::marker::PhantomData;
use std::sync::Arc;

use serde_yaml::Value;

use super::YAML;
use crate::codec::{Codec, Payload, SchemaValidator};
use crate::error::{CodecError, CodecResult};
use crate::options::OutputStyle;

/// YAML codec.
pub struct YamlCodec<T> {
	validator: Option<Arc<dyn SchemaValidator>>,
	_marker: PhantomData<fn() -> T>,
}

impl<T> YamlCodec<T> {
	/// Creates a YAML codec.
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

impl<T> Default for YamlCodec<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Clone for YamlCodec<T> {
	fn clone(&self) -> Self {
		Self {
			validator: self.validator.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for YamlCodec<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("YamlCodec").finish()
	}
}

impl<T: Payload> Codec<T> for YamlCodec<T> {
	fn format(&self) -> &str {
		YAML
	}

	fn encode(&self, value: &T, _style: OutputStyle) -> CodecResult<String> {
		serde_yaml::to_string(value).map_err(|e| CodecError::encode(YAML, e))
	}

	fn decode(&self, text: &str) -> CodecResult<T> {
		serde_yaml::from_str(text).map_err(|e| CodecError::decode(YAML, e))
	}

	fn combine(&self, documents: Vec<String>) -> CodecResult<String> {
		let items = documents
			.iter()
			.map(|document| serde_yaml::from_str::<Value>(document))
			.collect::<Result<Vec<_>, _>>()
			.map_err(|e| CodecError::encode(YAML, e))?;
		serde_yaml::to_string(&Value::Sequence(items)).map_err(|e| CodecError::encode(YAML, e))
	}

	fn split(&self, combined: &str) -> CodecResult<Vec<String>> {
		let items: Vec<Value> =
			serde_yaml::from_str(combined).map_err(|e| CodecError::decode(YAML, e))?;
		items
			.iter()
			.map(|item| serde_yaml::to_string(item).map_err(|e| CodecError::decode(YAML, e)))
			.collect()
	}

	fn read_field(&self, text: &str, name: &str) -> CodecResult<Option<String>> {
		let document: Value =
			serde_yaml::from_str(text).map_err(|e| CodecError::decode(YAML, e))?;
		let Some(mapping) = document.as_mapping() else {
			return Ok(None);
		};
		let found = mapping.iter().find(|(key, _)| {
			key.as_str()
				.is_some_and(|key| key.eq_ignore_ascii_case(name))
		});
		Ok(match found {
			None | Some((_, Value::Null)) => None,
			Some((_, Value::String(s))) => Some(s.clone()),
			Some((_, Value::Bool(b))) => Some(b.to_string()),
			Some((_, Value::Number(n))) => Some(n.to_string()),
			Some((_, other)) => Some(
				serde_yaml::to_string(other)
					.map_err(|e| CodecError::decode(YAML, e))?
					.trim_end()
					.to_string(),
			),
		})
	}

	fn schema_validator(&self) -> Option<&dyn SchemaValidator> {
		self.validator.as_deref()
	}
}
