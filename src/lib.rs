//! # polyformat
//!
//! Pluggable multi-format serialization for Rust.
//!
//! polyformat turns typed values into JSON, XML, YAML or BSON text and back,
//! with optional pre/post hooks, AES-256-GCM encryption, gzip compression,
//! batch encoding, version stamping and structural comparison of payloads
//! carried in different formats.
//!
//! ## Feature Flags
//!
//! - `pipeline` - Hooked pipelines, async adapters, file and stream front ends
//! - `registry` - Format registry, versioned codecs and cross-format conversion
//! - `full` (default) - Everything above
//!
//! With `default-features = false` only the codecs and their helpers from
//! `polyformat-core` are exported.
//!
//! ## Quick Example
//!
//! ```
//! use polyformat::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Person {
//! 	name: String,
//! 	age: i32,
//! }
//!
//! let options = PipelineOptions::new().with_encryption_key("defaultKey123");
//! let pipeline = HookedPipeline::yaml(options);
//!
//! let john = Person { name: "John Doe".into(), age: 30 };
//! let sealed = pipeline.serialize(&john, None, None).unwrap();
//! assert_eq!(pipeline.deserialize(&sealed, None).unwrap(), john);
//! ```

#![warn(missing_docs)]

pub use polyformat_core::*;

#[cfg(feature = "pipeline")]
pub use polyformat_pipeline as pipeline;
#[cfg(feature = "pipeline")]
pub use polyformat_pipeline::{
	CancellationToken, FileDestination, FileOperationResult, HookedPipeline, MessageLevel,
	NetworkChannel, OperationMessage,
};

#[cfg(feature = "registry")]
pub use polyformat_registry as registry;
#[cfg(feature = "registry")]
pub use polyformat_registry::{
	BuiltinFactory, CodecRequest, FormatFactory, FormatRegistry, VersionedCodec,
	VersionedConversion,
};

/// Commonly used types.
pub mod prelude {
	pub use polyformat_core::{
		Codec, CodecError, CodecResult, DeserializeWith, NonceStrategy, OutputStyle,
		PipelineOptions, SerializeWith, Structural, VersionObject, Versioned, VersionedDocument,
		impl_structural,
	};

	#[cfg(feature = "pipeline")]
	pub use polyformat_pipeline::{CancellationToken, FileDestination, HookedPipeline};

	#[cfg(feature = "registry")]
	pub use polyformat_registry::{FormatRegistry, VersionedCodec};
}
