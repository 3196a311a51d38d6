//! Error types shared by every polyformat crate.
//!
//! Argument-validation failures always name the offending argument, key or
//! path. Failures reported by a format engine are carried as boxed sources and
//! are never translated into another variant.

use std::path::PathBuf;

use thiserror::Error;

/// Boxed error produced by an underlying format engine.
pub type EngineError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which half of a conversion failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// Decoding the source payload.
	Decode,
	/// Encoding into the target format.
	Encode,
}

impl std::fmt::Display for Stage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Decode => write!(f, "decode"),
			Self::Encode => write!(f, "encode"),
		}
	}
}

/// Errors that can occur while encoding, decoding or resolving codecs.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CodecError {
	/// A required argument was absent or empty.
	#[error("Argument '{0}' cannot be null or empty")]
	NullInput(&'static str),

	/// No codec is registered under the requested format key.
	#[error("The serialization format '{0}' is not supported")]
	UnsupportedFormat(String),

	/// A codec is already registered under the format key.
	#[error("A codec for format '{0}' is already registered")]
	DuplicateRegistration(String),

	/// A factory produced a codec for a different payload type.
	#[error("Codec registered for format '{format}' cannot be used with type '{type_name}'")]
	InvalidCast {
		/// Normalized format key.
		format: String,
		/// Requested payload type.
		type_name: &'static str,
	},

	/// Compression or decompression failed.
	#[error("The compressed data is invalid or corrupted: {0}")]
	CorruptData(String),

	/// A required wire field is missing.
	#[error("Required field '{0}' is missing from the document")]
	MissingField(String),

	/// Hex input had an odd number of digits.
	#[error("The hex string must have an even length, got {0} characters")]
	OddLength(usize),

	/// Hex input contained a non-hex digit.
	#[error("Invalid hex string: {0}")]
	InvalidHex(String),

	/// The format engine rejected the input while decoding.
	#[error("{format} decode error: {source}")]
	Decode {
		/// Format that failed.
		format: String,
		/// Engine error, untranslated.
		#[source]
		source: EngineError,
	},

	/// The format engine rejected the value while encoding.
	#[error("{format} encode error: {source}")]
	Encode {
		/// Format that failed.
		format: String,
		/// Engine error, untranslated.
		#[source]
		source: EngineError,
	},

	/// One element of a combined batch could not be decoded.
	#[error("Batch element {index} could not be decoded: {source}")]
	BatchElement {
		/// Zero-based position inside the batch.
		index: usize,
		/// Error for that element.
		#[source]
		source: Box<CodecError>,
	},

	/// Encryption was requested without a configured key.
	#[error("Encryption key is not set")]
	MissingKey,

	/// The cipher or its text armor rejected the input.
	#[error("Encryption error: {0}")]
	Encryption(String),

	/// The file to read does not exist.
	#[error("File not found: {}", .0.display())]
	FileNotFound(PathBuf),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Options could not be loaded.
	#[error("Configuration error: {0}")]
	Config(String),

	/// The caller cancelled an asynchronous operation.
	#[error("Operation was cancelled")]
	Cancelled,

	/// A cross-format conversion failed at a given stage.
	#[error("Conversion failed during {stage} with format '{format}': {source}")]
	Stage {
		/// Stage that failed.
		stage: Stage,
		/// Format used at that stage.
		format: String,
		/// Underlying error.
		#[source]
		source: Box<CodecError>,
	},
}

impl CodecError {
	/// Wraps an engine failure raised while decoding.
	pub fn decode(format: impl Into<String>, source: impl Into<EngineError>) -> Self {
		Self::Decode {
			format: format.into(),
			source: source.into(),
		}
	}

	/// Wraps an engine failure raised while encoding.
	pub fn encode(format: impl Into<String>, source: impl Into<EngineError>) -> Self {
		Self::Encode {
			format: format.into(),
			source: source.into(),
		}
	}

	/// Returns true for errors raised while validating arguments.
	pub fn is_argument_error(&self) -> bool {
		matches!(
			self,
			Self::NullInput(_)
				| Self::OddLength(_)
				| Self::MissingKey
				| Self::DuplicateRegistration(_)
				| Self::UnsupportedFormat(_)
				| Self::MissingField(_)
				| Self::FileNotFound(_)
		)
	}
}

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
