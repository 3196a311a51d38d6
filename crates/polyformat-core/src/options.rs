//! Pipeline configuration.
//!
//! Options are built once, then shared behind an `Arc` by every pipeline that
//! uses them. They can be assembled with the `with_*` builders or loaded from
//! TOML:
//!
//! ```
//! use polyformat_core::options::{OutputStyle, PipelineOptions};
//!
//! let options = PipelineOptions::from_toml_str(
//! 	r#"
//! enable_encryption = true
//! default_style = "indented"
//!
//! [encryption]
//! key = "defaultKey123"
//!
//! [json]
//! indent_width = 4
//! "#,
//! )
//! .unwrap();
//!
//! assert!(options.enable_encryption);
//! assert_eq!(options.default_style, OutputStyle::Indented);
//! assert_eq!(options.json.indent_width, 4);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compression::DEFAULT_COMPRESSION_LEVEL;
use crate::encryption::{EncryptionConfig, NonceStrategy};
use crate::error::{CodecError, CodecResult};

/// Layout of encoded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
	/// No insignificant whitespace.
	#[default]
	Compact,
	/// Human-readable, line-broken and indented.
	Indented,
}

impl OutputStyle {
	/// Parses `"Compact"` or `"Indented"`, ignoring case.
	///
	/// Unknown names fall back to [`OutputStyle::Compact`].
	pub fn parse(name: &str) -> Self {
		if name.trim().eq_ignore_ascii_case("indented") {
			Self::Indented
		} else {
			Self::Compact
		}
	}

	/// Canonical name of the style.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Compact => "Compact",
			Self::Indented => "Indented",
		}
	}
}

impl std::fmt::Display for OutputStyle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// JSON engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonSettings {
	/// Spaces per level in indented output.
	pub indent_width: usize,
}

impl Default for JsonSettings {
	fn default() -> Self {
		Self { indent_width: 2 }
	}
}

/// XML engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlSettings {
	/// Prepend `<?xml version="1.0" encoding="utf-8"?>` to documents.
	pub include_declaration: bool,
	/// Spaces per level in indented output.
	pub indent_width: usize,
}

impl Default for XmlSettings {
	fn default() -> Self {
		Self {
			include_declaration: false,
			indent_width: 2,
		}
	}
}

/// Configuration bundle shared by pipelines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
	/// Encrypt on serialize and decrypt on deserialize unless overridden per call.
	pub enable_encryption: bool,
	/// Key material and nonce policy.
	pub encryption: EncryptionConfig,
	/// Style used when a call does not name one.
	pub default_style: OutputStyle,
	/// JSON engine settings.
	pub json: JsonSettings,
	/// XML engine settings.
	pub xml: XmlSettings,
	/// Gzip level for compressed payloads (0-9).
	pub compression_level: u32,
}

impl Default for PipelineOptions {
	fn default() -> Self {
		Self {
			enable_encryption: false,
			encryption: EncryptionConfig::default(),
			default_style: OutputStyle::Compact,
			json: JsonSettings::default(),
			xml: XmlSettings::default(),
			compression_level: DEFAULT_COMPRESSION_LEVEL,
		}
	}
}

impl PipelineOptions {
	/// Creates default options: no encryption, compact output.
	pub fn new() -> Self {
		Self::default()
	}

	/// Enables encryption with the given key.
	pub fn with_encryption_key(mut self, key: impl Into<String>) -> Self {
		self.enable_encryption = true;
		self.encryption.key = Some(key.into());
		self
	}

	/// Sets whether encryption is on by default.
	pub fn with_encryption_enabled(mut self, enabled: bool) -> Self {
		self.enable_encryption = enabled;
		self
	}

	/// Sets the nonce strategy.
	pub fn with_nonce_strategy(mut self, nonce: NonceStrategy) -> Self {
		self.encryption.nonce = nonce;
		self
	}

	/// Sets the default output style.
	pub fn with_default_style(mut self, style: OutputStyle) -> Self {
		self.default_style = style;
		self
	}

	/// Sets the JSON engine settings.
	pub fn with_json(mut self, json: JsonSettings) -> Self {
		self.json = json;
		self
	}

	/// Sets the XML engine settings.
	pub fn with_xml(mut self, xml: XmlSettings) -> Self {
		self.xml = xml;
		self
	}

	/// Sets the gzip level, clamped to 9.
	pub fn with_compression_level(mut self, level: u32) -> Self {
		self.compression_level = level.min(9);
		self
	}

	/// Style to use for a call: the explicit name if given, else the default.
	pub fn effective_style(&self, explicit: Option<&str>) -> OutputStyle {
		explicit.map_or(self.default_style, OutputStyle::parse)
	}

	/// Parses options from TOML text.
	///
	/// # Errors
	///
	/// Returns [`CodecError::Config`] on malformed TOML or unknown values.
	pub fn from_toml_str(text: &str) -> CodecResult<Self> {
		let options: Self = toml::from_str(text).map_err(|e| CodecError::Config(e.to_string()))?;
		let level = options.compression_level;
		Ok(options.with_compression_level(level))
	}

	/// Reads and parses a TOML options file.
	pub fn from_toml_file(path: impl AsRef<Path>) -> CodecResult<Self> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path)
			.map_err(|e| CodecError::Config(format!("{}: {}", path.display(), e)))?;
		Self::from_toml_str(&text)
	}

	/// Renders the options as TOML.
	pub fn to_toml_string(&self) -> CodecResult<String> {
		toml::to_string(self).map_err(|e| CodecError::Config(e.to_string()))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("Compact", OutputStyle::Compact)]
	#[case("indented", OutputStyle::Indented)]
	#[case("INDENTED", OutputStyle::Indented)]
	#[case("something else", OutputStyle::Compact)]
	fn test_output_style_parse(#[case] name: &str, #[case] expected: OutputStyle) {
		assert_eq!(OutputStyle::parse(name), expected);
	}

	#[rstest]
	fn test_defaults() {
		let options = PipelineOptions::new();
		assert!(!options.enable_encryption);
		assert!(!options.encryption.has_key());
		assert_eq!(options.default_style, OutputStyle::Compact);
		assert_eq!(options.compression_level, DEFAULT_COMPRESSION_LEVEL);
	}

	#[rstest]
	fn test_effective_style() {
		let options = PipelineOptions::new().with_default_style(OutputStyle::Indented);
		assert_eq!(options.effective_style(None), OutputStyle::Indented);
		assert_eq!(options.effective_style(Some("Compact")), OutputStyle::Compact);
	}

	#[rstest]
	fn test_from_toml_partial() {
		let options = PipelineOptions::from_toml_str(
			r#"
compression_level = 12

[xml]
include_declaration = true
"#,
		)
		.unwrap();
		assert_eq!(options.compression_level, 9);
		assert!(options.xml.include_declaration);
		assert_eq!(options.xml.indent_width, 2);
		assert!(!options.enable_encryption);
	}

	#[rstest]
	fn test_from_toml_nonce_strategy() {
		let options = PipelineOptions::from_toml_str(
			r#"
[encryption]
key = "abc"
nonce = "random"
"#,
		)
		.unwrap();
		assert_eq!(options.encryption.nonce, NonceStrategy::Random);
		assert_eq!(options.encryption.key.as_deref(), Some("abc"));
	}

	#[rstest]
	fn test_from_toml_invalid() {
		let error = PipelineOptions::from_toml_str("default_style = \"sideways\"").unwrap_err();
		assert!(matches!(error, CodecError::Config(_)));
	}

	#[rstest]
	fn test_from_toml_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("polyformat.toml");
		let options = PipelineOptions::new().with_encryption_key("k1");
		std::fs::write(&path, options.to_toml_string().unwrap()).unwrap();

		let loaded = PipelineOptions::from_toml_file(&path).unwrap();
		assert_eq!(loaded, options);
	}

	#[rstest]
	fn test_from_missing_file() {
		let error = PipelineOptions::from_toml_file("/nonexistent/polyformat.toml").unwrap_err();
		assert!(matches!(error, CodecError::Config(_)));
	}
}
