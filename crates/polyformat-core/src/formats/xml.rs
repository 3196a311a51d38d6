//! XML engine backed by `quick-xml`'s serde support.
//!
//! The root element is named after the payload type. Combined batches look
//! like:
//!
//! ```xml
//! <Batch><Item><Person>..</Person></Item><Item><Person>..</Person></Item></Batch>
//! ```

use std::marker::PhantomData;
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::events::Event;

use super::XML;
use crate::codec::{Codec, Payload, SchemaValidator};
use crate::error::{CodecError, CodecResult};
use crate::options::{OutputStyle, XmlSettings};

const DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;
const BATCH_TAG: &[u8] = b"Batch";
const ITEM_TAG: &[u8] = b"Item";

/// XML codec.
pub struct XmlCodec<T> {
	settings: XmlSettings,
	validator: Option<Arc<dyn SchemaValidator>>,
	_marker: PhantomData<fn() -> T>,
}

impl<T> XmlCodec<T> {
	/// Creates an XML codec with default settings.
	pub fn new() -> Self {
		Self {
			settings: XmlSettings::default(),
			validator: None,
			_marker: PhantomData,
		}
	}

	/// Sets engine settings.
	pub fn with_settings(mut self, settings: XmlSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Sets the schema validator.
	pub fn with_validator(mut self, validator: Arc<dyn SchemaValidator>) -> Self {
		self.validator = Some(validator);
		self
	}
}

impl<T> Default for XmlCodec<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Clone for XmlCodec<T> {
	fn clone(&self) -> Self {
		Self {
			settings: self.settings.clone(),
			validator: self.validator.clone(),
			_marker: PhantomData,
		}
	}
}

impl<T> std::fmt::Debug for XmlCodec<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("XmlCodec")
			.field("settings", &self.settings)
			.finish()
	}
}

impl<T: Payload> Codec<T> for XmlCodec<T> {
	fn format(&self) -> &str {
		XML
	}

	fn encode(&self, value: &T, style: OutputStyle) -> CodecResult<String> {
		let mut body = String::new();
		let mut serializer = quick_xml::se::Serializer::new(&mut body);
		if style == OutputStyle::Indented {
			serializer.indent(' ', self.settings.indent_width);
		}
		value
			.serialize(serializer)
			.map_err(|e| CodecError::encode(XML, e))?;

		if !self.settings.include_declaration {
			return Ok(body);
		}
		let separator = match style {
			OutputStyle::Indented => "\n",
			OutputStyle::Compact => "",
		};
		Ok(format!("{}{}{}", DECLARATION, separator, body))
	}

	fn decode(&self, text: &str) -> CodecResult<T> {
		quick_xml::de::from_str(text).map_err(|e| CodecError::decode(XML, e))
	}

	fn combine(&self, documents: Vec<String>) -> CodecResult<String> {
		let mut combined = String::from("<Batch>");
		for document in &documents {
			combined.push_str("<Item>");
			combined.push_str(strip_declaration(document));
			combined.push_str("</Item>");
		}
		combined.push_str("</Batch>");
		Ok(combined)
	}

	fn split(&self, combined: &str) -> CodecResult<Vec<String>> {
		let mut reader = Reader::from_str(combined);
		let mut depth = 0usize;
		let mut seen_root = false;
		let mut item_start: Option<usize> = None;
		let mut items = Vec::new();

		loop {
			let position = reader.buffer_position() as usize;
			match reader.read_event().map_err(|e| CodecError::decode(XML, e))? {
				Event::Start(e) => {
					depth += 1;
					match depth {
						1 => {
							if e.name().as_ref() != BATCH_TAG {
								return Err(unexpected_root());
							}
							seen_root = true;
						}
						2 if e.name().as_ref() == ITEM_TAG => {
							item_start = Some(reader.buffer_position() as usize);
						}
						2 => return Err(CodecError::decode(XML, "expected <Item> inside <Batch>")),
						_ => {}
					}
				}
				Event::End(_) => {
					if depth == 2 {
						if let Some(start) = item_start.take() {
							items.push(combined[start..position].trim().to_string());
						}
					}
					depth = depth.saturating_sub(1);
				}
				Event::Empty(e) => match depth {
					0 if e.name().as_ref() == BATCH_TAG => seen_root = true,
					0 => return Err(unexpected_root()),
					1 if e.name().as_ref() == ITEM_TAG => items.push(String::new()),
					1 => return Err(CodecError::decode(XML, "expected <Item> inside <Batch>")),
					_ => {}
				},
				Event::Eof => break,
				_ => {}
			}
		}

		if !seen_root {
			return Err(unexpected_root());
		}
		Ok(items)
	}

	fn read_field(&self, text: &str, name: &str) -> CodecResult<Option<String>> {
		let mut reader = Reader::from_str(text);
		let mut depth = 0usize;
		let mut captured: Option<String> = None;

		loop {
			match reader.read_event().map_err(|e| CodecError::decode(XML, e))? {
				Event::Start(e) => {
					depth += 1;
					if depth == 2 && e.name().as_ref().eq_ignore_ascii_case(name.as_bytes()) {
						captured = Some(String::new());
					}
				}
				Event::Text(e) => {
					if let Some(buffer) = captured.as_mut() {
						let text = e.unescape().map_err(|e| CodecError::decode(XML, e))?;
						buffer.push_str(&text);
					}
				}
				Event::CData(e) => {
					if let Some(buffer) = captured.as_mut() {
						buffer.push_str(&String::from_utf8_lossy(&e.into_inner()));
					}
				}
				Event::End(_) => {
					if depth == 2 {
						if let Some(value) = captured.take() {
							return Ok(Some(value.trim().to_string()));
						}
					}
					depth = depth.saturating_sub(1);
				}
				Event::Empty(e) => {
					if depth == 1 && e.name().as_ref().eq_ignore_ascii_case(name.as_bytes()) {
						return Ok(Some(String::new()));
					}
				}
				Event::Eof => return Ok(None),
				_ => {}
			}
		}
	}

	fn schema_validator(&self) -> Option<&dyn SchemaValidator> {
		self.validator.as_deref()
	}
}

fn strip_declaration(document: &str) -> &str {
	let trimmed = document.trim_start();
	if trimmed.starts_with("<?xml") {
		if let Some(end) = trimmed.find("?>") {
			return trimmed[end + 2..].trim_start();
		}
	}
	trimmed
}

fn unexpected_root() -> CodecError {
	CodecError::decode(XML, "expected a <Batch> root element")
}
