//! Codec factories.
//!
//! A factory is registered once per format key and asked for a codec each time
//! a new payload type resolves that key. Factories hand back type-erased
//! codecs; the registry downcasts them to `SharedCodec<T>`.

use std::any::{Any, TypeId};
use std::marker::PhantomData;
use std::sync::Arc;

use polyformat_core::codec::{Payload, SharedCodec};
use polyformat_core::error::CodecResult;
use polyformat_core::formats::{self, BsonCodec, JsonCodec, XmlCodec, YamlCodec};
use polyformat_core::options::{JsonSettings, PipelineOptions, XmlSettings};

/// A codec with its payload type erased. Always holds a `SharedCodec<T>`.
pub type ErasedCodec = Box<dyn Any + Send + Sync>;

/// Erases the payload type of `codec`.
pub fn erase<T: Payload>(codec: SharedCodec<T>) -> ErasedCodec {
	Box::new(codec)
}

/// Builds codecs for the payload type carried by a [`CodecRequest`].
trait CodecBuilders: Send + Sync {
	fn json(&self, settings: &JsonSettings, canonical: bool) -> ErasedCodec;
	fn xml(&self, settings: &XmlSettings) -> ErasedCodec;
	fn yaml(&self) -> ErasedCodec;
	fn bson(&self) -> ErasedCodec;
}

struct PayloadBuilders<T>(PhantomData<fn() -> T>);

impl<T: Payload> CodecBuilders for PayloadBuilders<T> {
	fn json(&self, settings: &JsonSettings, canonical: bool) -> ErasedCodec {
		let codec = if canonical {
			JsonCodec::<T>::canonical()
		} else {
			JsonCodec::<T>::new()
		};
		erase::<T>(Arc::new(codec.with_settings(settings.clone())))
	}

	fn xml(&self, settings: &XmlSettings) -> ErasedCodec {
		erase::<T>(Arc::new(XmlCodec::<T>::new().with_settings(settings.clone())))
	}

	fn yaml(&self) -> ErasedCodec {
		erase::<T>(Arc::new(YamlCodec::<T>::new()))
	}

	fn bson(&self) -> ErasedCodec {
		erase::<T>(Arc::new(BsonCodec::<T>::new()))
	}
}

/// Describes the codec a factory is asked to produce.
pub struct CodecRequest {
	format: String,
	type_id: TypeId,
	type_name: &'static str,
	builders: Box<dyn CodecBuilders>,
}

impl CodecRequest {
	/// Request for payload type `T` under the normalized key `format`.
	pub fn new<T: Payload>(format: impl Into<String>) -> Self {
		Self {
			format: format.into(),
			type_id: TypeId::of::<T>(),
			type_name: std::any::type_name::<T>(),
			builders: Box::new(PayloadBuilders::<T>(PhantomData)),
		}
	}

	/// Normalized format key being resolved.
	pub fn format(&self) -> &str {
		&self.format
	}

	/// Requested payload type.
	pub fn type_id(&self) -> TypeId {
		self.type_id
	}

	/// Name of the requested payload type.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Whether the request is for payload type `T`.
	pub fn is<T: 'static>(&self) -> bool {
		self.type_id == TypeId::of::<T>()
	}

	/// Built-in JSON codec for the requested type.
	pub fn json(&self, settings: &JsonSettings) -> ErasedCodec {
		self.builders.json(settings, false)
	}

	/// Built-in canonical JSON codec for the requested type.
	pub fn json_canonical(&self, settings: &JsonSettings) -> ErasedCodec {
		self.builders.json(settings, true)
	}

	/// Built-in XML codec for the requested type.
	pub fn xml(&self, settings: &XmlSettings) -> ErasedCodec {
		self.builders.xml(settings)
	}

	/// Built-in YAML codec for the requested type.
	pub fn yaml(&self) -> ErasedCodec {
		self.builders.yaml()
	}

	/// Built-in BSON codec for the requested type.
	pub fn bson(&self) -> ErasedCodec {
		self.builders.bson()
	}
}

impl std::fmt::Debug for CodecRequest {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CodecRequest")
			.field("format", &self.format)
			.field("type_name", &self.type_name)
			.finish()
	}
}

/// Produces codecs for one format key.
pub trait FormatFactory: Send + Sync {
	/// Returns a codec for the payload type described by `request`.
	///
	/// A factory that cannot serve the requested type may return a codec for
	/// another type; the registry reports that as
	/// [`CodecError::InvalidCast`](polyformat_core::CodecError::InvalidCast).
	fn create(&self, request: &CodecRequest) -> CodecResult<ErasedCodec>;
}

/// Adapts a closure into a [`FormatFactory`].
pub struct FnFactory<F>(pub F);

impl<F> FormatFactory for FnFactory<F>
where
	F: Fn(&CodecRequest) -> CodecResult<ErasedCodec> + Send + Sync,
{
	fn create(&self, request: &CodecRequest) -> CodecResult<ErasedCodec> {
		(self.0)(request)
	}
}

/// Factory serving a single, already-built codec.
///
/// Resolving its key for any type other than `T` fails with `InvalidCast`.
pub struct InstanceFactory<T> {
	codec: SharedCodec<T>,
}

impl<T: Payload> InstanceFactory<T> {
	/// Wraps `codec`.
	pub fn new(codec: SharedCodec<T>) -> Self {
		Self { codec }
	}
}

impl<T: Payload> FormatFactory for InstanceFactory<T> {
	fn create(&self, _request: &CodecRequest) -> CodecResult<ErasedCodec> {
		Ok(erase(Arc::clone(&self.codec)))
	}
}

/// Factories for the built-in formats.
#[derive(Debug, Clone)]
pub enum BuiltinFactory {
	/// `JSON`
	Json(JsonSettings),
	/// `JSON_CANONICAL`
	JsonCanonical(JsonSettings),
	/// `XML`
	Xml(XmlSettings),
	/// `YAML`
	Yaml,
	/// `BSON`
	Bson,
}

impl BuiltinFactory {
	/// All built-in factories configured from `options`.
	pub fn all(options: &PipelineOptions) -> Vec<Self> {
		vec![
			Self::Bson,
			Self::Json(options.json.clone()),
			Self::JsonCanonical(options.json.clone()),
			Self::Xml(options.xml.clone()),
			Self::Yaml,
		]
	}

	/// Built-in factory for `key`, if there is one.
	pub fn for_format(key: &str, options: &PipelineOptions) -> Option<Self> {
		let key = formats::normalize_format(key);
		Self::all(options).into_iter().find(|f| f.key() == key)
	}

	/// Format key this factory is registered under.
	pub fn key(&self) -> &'static str {
		match self {
			Self::Json(_) => formats::JSON,
			Self::JsonCanonical(_) => formats::JSON_CANONICAL,
			Self::Xml(_) => formats::XML,
			Self::Yaml => formats::YAML,
			Self::Bson => formats::BSON,
		}
	}
}

impl FormatFactory for BuiltinFactory {
	fn create(&self, request: &CodecRequest) -> CodecResult<ErasedCodec> {
		Ok(match self {
			Self::Json(settings) => request.json(settings),
			Self::JsonCanonical(settings) => request.json_canonical(settings),
			Self::Xml(settings) => request.xml(settings),
			Self::Yaml => request.yaml(),
			Self::Bson => request.bson(),
		})
	}
}
