//! Codec contract and format engines for polyformat.
//!
//! This crate holds everything a single format needs to turn a typed value
//! into text and back:
//!
//! - **Codec contract**: [`Codec`] with single-value, batch, stream, gzip and
//!   validation operations
//! - **Format engines**: JSON, canonical JSON, XML, YAML and BSON in [`formats`]
//! - **Helpers**: hex armor, gzip compression and AES-256-GCM encryption
//! - **Structural comparison**: [`Structural`] field enumeration and diffs
//! - **Versioning**: the [`Versioned`] marker trait and [`VersionedDocument`]
//!
//! Pipelines with hooks live in `polyformat-pipeline`; the format registry and
//! cross-format conversion live in `polyformat-registry`.
//!
//! # Quick Start
//!
//! ```
//! use polyformat_core::{Codec, OutputStyle};
//! use polyformat_core::formats::XmlCodec;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, PartialEq, Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Person {
//! 	name: String,
//! 	age: i32,
//! }
//!
//! let codec = XmlCodec::<Person>::new();
//! let person = Person { name: "John Doe".into(), age: 30 };
//!
//! let text = codec.encode(&person, OutputStyle::Compact).unwrap();
//! assert_eq!(text, "<Person><Name>John Doe</Name><Age>30</Age></Person>");
//! assert_eq!(codec.deserialize(&text).unwrap(), person);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod codec;
pub mod compression;
pub mod encryption;
pub mod error;
pub mod ext;
pub mod formats;
pub mod hex;
pub mod hook;
pub mod options;
pub mod structural;
pub mod versioned;

// Re-export commonly used types at crate root
pub use codec::{Codec, Payload, SchemaValidator, SharedCodec};
pub use compression::{Compressor, GzipCompressor};
pub use encryption::{EncryptionConfig, Encryptor, NonceStrategy};
pub use error::{CodecError, CodecResult, Stage};
pub use ext::{DeserializeWith, SerializeWith};
pub use formats::{BsonCodec, JsonCodec, XmlCodec, YamlCodec, normalize_format};
pub use hook::Hook;
pub use options::{JsonSettings, OutputStyle, PipelineOptions, XmlSettings};
pub use structural::{Field, Structural, are_objects_equal, object_differences};
pub use versioned::{VERSION_FIELD, VersionObject, Versioned, VersionedDocument};
