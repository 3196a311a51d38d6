//! The hook-decorated pipeline.
//!
//! Serialization runs `before_serialize` hook, encode, encrypt. Deserialization
//! runs the exact reverse: decrypt, decode, `after_deserialize` hook. The
//! compressed variants add gzip as the outermost layer on both sides.

use std::sync::Arc;
use std::time::Instant;

use polyformat_core::codec::{Codec, Payload, SharedCodec};
use polyformat_core::compression::{Compressor, GzipCompressor};
use polyformat_core::encryption::Encryptor;
use polyformat_core::error::{CodecError, CodecResult};
use polyformat_core::formats::{BsonCodec, JsonCodec, XmlCodec, YamlCodec};
use polyformat_core::hook::{Hook, apply_hook};
use polyformat_core::options::{OutputStyle, PipelineOptions};
use tracing::debug;

/// Codec wrapped with optional hooks, encryption and compression.
///
/// Every piece of state is immutable and shared, so clones are cheap and a
/// single pipeline can serve many threads at once.
///
/// # Example
///
/// ```
/// use polyformat_core::PipelineOptions;
/// use polyformat_pipeline::HookedPipeline;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Person {
/// 	name: String,
/// }
///
/// let pipeline = HookedPipeline::json(PipelineOptions::new().with_encryption_key("defaultKey123"))
/// 	.with_before_serialize(|mut p: Person| {
/// 		p.name = p.name.to_uppercase();
/// 		p
/// 	});
///
/// let sealed = pipeline.serialize(&Person { name: "john".into() }, None, None).unwrap();
/// let back = pipeline.deserialize(&sealed, None).unwrap();
/// assert_eq!(back.name, "JOHN");
/// ```
pub struct HookedPipeline<T> {
	pub(crate) codec: SharedCodec<T>,
	pub(crate) options: Arc<PipelineOptions>,
	pub(crate) encryptor: Arc<Encryptor>,
	pub(crate) compressor: GzipCompressor,
	pub(crate) before_serialize: Option<Hook<T>>,
	pub(crate) after_deserialize: Option<Hook<T>>,
}

impl<T> Clone for HookedPipeline<T> {
	fn clone(&self) -> Self {
		Self {
			codec: Arc::clone(&self.codec),
			options: Arc::clone(&self.options),
			encryptor: Arc::clone(&self.encryptor),
			compressor: self.compressor.clone(),
			before_serialize: self.before_serialize.clone(),
			after_deserialize: self.after_deserialize.clone(),
		}
	}
}

impl<T> std::fmt::Debug for HookedPipeline<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("HookedPipeline")
			.field("format", &self.codec.format())
			.field("options", &self.options)
			.field("before_serialize", &self.before_serialize.is_some())
			.field("after_deserialize", &self.after_deserialize.is_some())
			.finish()
	}
}

impl<T> HookedPipeline<T> {
	/// Wraps `codec` with the given options and no hooks.
	pub fn new(codec: SharedCodec<T>, options: PipelineOptions) -> Self {
		let encryptor = Encryptor::new(options.encryption.clone());
		let compressor = GzipCompressor::with_level(options.compression_level);
		Self {
			codec,
			options: Arc::new(options),
			encryptor: Arc::new(encryptor),
			compressor,
			before_serialize: None,
			after_deserialize: None,
		}
	}

	/// Sets the hook run on every value right before encoding.
	pub fn with_before_serialize<F>(mut self, hook: F) -> Self
	where
		F: Fn(T) -> T + Send + Sync + 'static,
	{
		self.before_serialize = Some(Hook::new(hook));
		self
	}

	/// Sets the hook run on every value right after decoding.
	pub fn with_after_deserialize<F>(mut self, hook: F) -> Self
	where
		F: Fn(T) -> T + Send + Sync + 'static,
	{
		self.after_deserialize = Some(Hook::new(hook));
		self
	}

	/// Replaces the before-serialize hook; `None` restores identity.
	pub fn set_before_serialize(&mut self, hook: Option<Hook<T>>) {
		self.before_serialize = hook;
	}

	/// Replaces the after-deserialize hook; `None` restores identity.
	pub fn set_after_deserialize(&mut self, hook: Option<Hook<T>>) {
		self.after_deserialize = hook;
	}

	/// Wrapped codec.
	pub fn codec(&self) -> &SharedCodec<T> {
		&self.codec
	}

	/// Options in effect.
	pub fn options(&self) -> &PipelineOptions {
		&self.options
	}

	/// Format key of the wrapped codec.
	pub fn format(&self) -> &str {
		self.codec.format()
	}

	pub(crate) fn encrypt_flag(&self, explicit: Option<bool>) -> bool {
		explicit.unwrap_or(self.options.enable_encryption)
	}

	pub(crate) fn seal(&self, text: String, encrypt: bool) -> CodecResult<String> {
		if encrypt {
			self.encryptor.encrypt(&text)
		} else {
			Ok(text)
		}
	}

	pub(crate) fn unseal<'a>(
		&self,
		text: &'a str,
		decrypt: bool,
	) -> CodecResult<std::borrow::Cow<'a, str>> {
		if decrypt {
			Ok(std::borrow::Cow::Owned(self.encryptor.decrypt(text)?))
		} else {
			Ok(std::borrow::Cow::Borrowed(text))
		}
	}
}

impl<T: Payload> HookedPipeline<T> {
	/// JSON pipeline using the JSON settings from `options`.
	pub fn json(options: PipelineOptions) -> Self {
		let codec = JsonCodec::<T>::new().with_settings(options.json.clone());
		Self::new(Arc::new(codec), options)
	}

	/// Canonical JSON pipeline.
	pub fn json_canonical(options: PipelineOptions) -> Self {
		let codec = JsonCodec::<T>::canonical().with_settings(options.json.clone());
		Self::new(Arc::new(codec), options)
	}

	/// XML pipeline using the XML settings from `options`.
	pub fn xml(options: PipelineOptions) -> Self {
		let codec = XmlCodec::<T>::new().with_settings(options.xml.clone());
		Self::new(Arc::new(codec), options)
	}

	/// YAML pipeline.
	pub fn yaml(options: PipelineOptions) -> Self {
		Self::new(Arc::new(YamlCodec::<T>::new()), options)
	}

	/// BSON pipeline.
	pub fn bson(options: PipelineOptions) -> Self {
		Self::new(Arc::new(BsonCodec::<T>::new()), options)
	}
}

impl<T: Payload + Clone> HookedPipeline<T> {
	/// Hook, encode, then encrypt.
	///
	/// `style` is parsed case-insensitively (`"Compact"` / `"Indented"`) and
	/// defaults to the configured style. `encrypt` defaults to
	/// [`PipelineOptions::enable_encryption`].
	///
	/// # Errors
	///
	/// [`CodecError::MissingKey`] when encryption is requested without a key;
	/// engine errors pass through.
	pub fn serialize(&self, value: &T, encrypt: Option<bool>, style: Option<&str>) -> CodecResult<String> {
		let started = Instant::now();
		let style = self.options.effective_style(style);
		let encrypt = self.encrypt_flag(encrypt);

		let text = self.encode_one(value, style)?;
		let text = self.seal(text, encrypt)?;

		debug!(
			type_name = std::any::type_name::<T>(),
			format = self.format(),
			%style,
			encrypt,
			size = text.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Serialized payload"
		);
		Ok(text)
	}

	/// Decrypt, decode, then hook.
	///
	/// `decrypt` defaults to [`PipelineOptions::enable_encryption`].
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for empty input.
	pub fn deserialize(&self, data: &str, decrypt: Option<bool>) -> CodecResult<T> {
		if data.is_empty() {
			return Err(CodecError::NullInput("data"));
		}
		let started = Instant::now();
		let decrypt = self.encrypt_flag(decrypt);

		let text = self.unseal(data, decrypt)?;
		let value = self.decode_one(&text)?;

		debug!(
			type_name = std::any::type_name::<T>(),
			format = self.format(),
			decrypt,
			size = data.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Deserialized payload"
		);
		Ok(value)
	}

	/// [`HookedPipeline::serialize`] followed by gzip.
	pub fn serialize_compressed(
		&self,
		value: &T,
		encrypt: Option<bool>,
		style: Option<&str>,
	) -> CodecResult<Vec<u8>> {
		let text = self.serialize(value, encrypt, style)?;
		self.compressor.compress(text.as_bytes())
	}

	/// Gunzip followed by [`HookedPipeline::deserialize`].
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for an empty buffer and
	/// [`CodecError::CorruptData`] when decompression fails.
	pub fn deserialize_compressed(&self, compressed: &[u8], decrypt: Option<bool>) -> CodecResult<T> {
		if compressed.is_empty() {
			return Err(CodecError::NullInput("compressed_data"));
		}
		let bytes = self.compressor.decompress(compressed)?;
		let text = String::from_utf8(bytes).map_err(|e| CodecError::CorruptData(e.to_string()))?;
		self.deserialize(&text, decrypt)
	}

	pub(crate) fn encode_one(&self, value: &T, style: OutputStyle) -> CodecResult<String> {
		match &self.before_serialize {
			Some(hook) => self.codec.encode(&hook.apply(value.clone()), style),
			None => self.codec.encode(value, style),
		}
	}

	pub(crate) fn decode_one(&self, text: &str) -> CodecResult<T> {
		let value = self.codec.deserialize(text)?;
		Ok(apply_hook(self.after_deserialize.as_ref(), value))
	}
}
