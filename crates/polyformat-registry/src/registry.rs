//! Format registry.
//!
//! Maps normalized format keys to codec factories. Codecs are built lazily
//! the first time a key is resolved for a payload type and cached per
//! `(key, type)` until the registry is cleared.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use polyformat_core::codec::{Payload, SharedCodec};
use polyformat_core::error::{CodecError, CodecResult};
use polyformat_core::formats::normalize_format;
use polyformat_core::options::PipelineOptions;
use polyformat_core::versioned::Versioned;
use tracing::{debug, info};

use crate::conversion::VersionedConversion;
use crate::factory::{
	BuiltinFactory, CodecRequest, ErasedCodec, FnFactory, FormatFactory, InstanceFactory,
};
use crate::versioned::VersionedCodec;

type CacheKey = (String, TypeId);

/// Process-wide registry, empty until something registers into it.
static GLOBAL_REGISTRY: Lazy<FormatRegistry> = Lazy::new(FormatRegistry::new);

/// Registry of codec factories keyed by normalized format name.
///
/// Registration is insert-if-absent under a single write lock, so concurrent
/// registrations of the same key succeed exactly once.
#[derive(Default)]
pub struct FormatRegistry {
	factories: RwLock<HashMap<String, Arc<dyn FormatFactory>>>,
	instances: RwLock<HashMap<CacheKey, Arc<dyn Any + Send + Sync>>>,
}

impl FormatRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding the built-in formats with default settings.
	pub fn with_builtin_formats() -> Self {
		let registry = Self::new();
		registry.install_builtin_formats();
		registry
	}

	/// The process-wide registry.
	pub fn global() -> &'static FormatRegistry {
		&GLOBAL_REGISTRY
	}

	/// Registers `factory` under `key`.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for a blank key and
	/// [`CodecError::DuplicateRegistration`] if the normalized key is taken.
	pub fn register<F>(&self, key: &str, factory: F) -> CodecResult<()>
	where
		F: FormatFactory + 'static,
	{
		let normalized = normalize_format(key);
		if normalized.is_empty() {
			return Err(CodecError::NullInput("format"));
		}

		match self.factories.write().entry(normalized) {
			Entry::Occupied(_) => Err(CodecError::DuplicateRegistration(key.to_string())),
			Entry::Vacant(slot) => {
				info!(format = %slot.key(), "Registered codec factory");
				slot.insert(Arc::new(factory));
				Ok(())
			}
		}
	}

	/// Registers a closure as the factory for `key`.
	pub fn register_fn<F>(&self, key: &str, factory: F) -> CodecResult<()>
	where
		F: Fn(&CodecRequest) -> CodecResult<ErasedCodec> + Send + Sync + 'static,
	{
		self.register(key, FnFactory(factory))
	}

	/// Registers a ready-made codec for a single payload type under `key`.
	pub fn register_codec<T: Payload>(&self, key: &str, codec: SharedCodec<T>) -> CodecResult<()> {
		self.register(key, InstanceFactory::new(codec))
	}

	/// Registers every built-in format not yet present, using default settings.
	///
	/// Returns how many keys were added.
	pub fn install_builtin_formats(&self) -> usize {
		self.install_builtin_formats_with(&PipelineOptions::default())
	}

	/// Registers every built-in format not yet present, configured from
	/// `options`.
	pub fn install_builtin_formats_with(&self, options: &PipelineOptions) -> usize {
		let mut factories = self.factories.write();
		let mut added = 0;
		for factory in BuiltinFactory::all(options) {
			if let Entry::Vacant(slot) = factories.entry(factory.key().to_string()) {
				slot.insert(Arc::new(factory));
				added += 1;
			}
		}
		info!(added, "Installed built-in formats");
		added
	}

	/// Resolves the codec for `key` and payload type `T`.
	///
	/// # Errors
	///
	/// [`CodecError::UnsupportedFormat`] if nothing is registered under the
	/// key, [`CodecError::InvalidCast`] if the factory built a codec for a
	/// different type. Factory errors are returned unchanged.
	pub fn resolve<T: Payload>(&self, key: &str) -> CodecResult<SharedCodec<T>> {
		let normalized = normalize_format(key);
		let cache_key = (normalized.clone(), TypeId::of::<T>());

		if let Some(codec) = self
			.instances
			.read()
			.get(&cache_key)
			.and_then(|hit| hit.downcast_ref::<SharedCodec<T>>())
		{
			return Ok(Arc::clone(codec));
		}

		let factory = self
			.factories
			.read()
			.get(&normalized)
			.cloned()
			.ok_or_else(|| CodecError::UnsupportedFormat(key.to_string()))?;

		let request = CodecRequest::new::<T>(normalized.clone());
		let erased: Arc<dyn Any + Send + Sync> = Arc::from(factory.create(&request)?);
		let codec = erased
			.downcast_ref::<SharedCodec<T>>()
			.cloned()
			.ok_or_else(|| CodecError::InvalidCast {
				format: normalized.clone(),
				type_name: std::any::type_name::<T>(),
			})?;

		debug!(format = %normalized, type_name = request.type_name(), "Built codec");
		self.instances.write().entry(cache_key).or_insert(erased);
		Ok(codec)
	}

	/// Resolves a [`VersionedCodec`] for `key`.
	pub fn resolve_versioned<T>(&self, key: &str) -> CodecResult<VersionedCodec<T>>
	where
		T: Payload + Versioned,
	{
		self.resolve::<T>(key).map(VersionedCodec::new)
	}

	/// Cross-format conversion and comparison over this registry.
	pub fn conversion(&self) -> VersionedConversion<'_> {
		VersionedConversion::new(self)
	}

	/// Registered keys, sorted.
	pub fn list_formats(&self) -> Vec<String> {
		let mut keys: Vec<String> = self.factories.read().keys().cloned().collect();
		keys.sort();
		keys
	}

	/// Whether `key` is registered.
	pub fn contains(&self, key: &str) -> bool {
		self.factories.read().contains_key(&normalize_format(key))
	}

	/// Number of registered keys.
	pub fn len(&self) -> usize {
		self.factories.read().len()
	}

	/// Returns true if nothing is registered.
	pub fn is_empty(&self) -> bool {
		self.factories.read().is_empty()
	}

	/// Removes every factory and cached codec.
	pub fn clear(&self) {
		self.factories.write().clear();
		self.instances.write().clear();
	}
}

impl std::fmt::Debug for FormatRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormatRegistry")
			.field("formats", &self.list_formats())
			.field("cached", &self.instances.read().len())
			.finish()
	}
}
