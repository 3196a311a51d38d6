//! Format registry for polyformat.
//!
//! Resolves a format name to a codec for any payload type, and builds the
//! version-aware and cross-format operations on top of it.
//!
//! ## Quick Start
//!
//! ```
//! use polyformat_registry::FormatRegistry;
//! use polyformat_core::VersionObject;
//!
//! let registry = FormatRegistry::with_builtin_formats();
//!
//! let json = r#"{"Version":"1.0","Name":"Initial"}"#;
//! let yaml = registry
//! 	.conversion()
//! 	.convert_between_formats::<VersionObject>(json, "json", "yaml")
//! 	.unwrap();
//!
//! assert!(registry
//! 	.conversion()
//! 	.compare_serialized_data::<VersionObject>(json, "json", &yaml, "yaml")
//! 	.unwrap());
//! ```
//!
//! ## Process-wide registry
//!
//! [`FormatRegistry::global`] starts empty. Call
//! [`FormatRegistry::install_builtin_formats`] on it once at startup, then
//! register custom formats as needed.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod conversion;
pub mod factory;
pub mod registry;
pub mod versioned;

pub use conversion::{
	VersionedConversion, compare_serialized_data, convert_between_formats, get_differences,
};
pub use factory::{
	BuiltinFactory, CodecRequest, ErasedCodec, FnFactory, FormatFactory, InstanceFactory, erase,
};
pub use registry::FormatRegistry;
pub use versioned::VersionedCodec;
