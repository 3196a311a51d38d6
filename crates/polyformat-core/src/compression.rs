//! Gzip compression for serialized payloads.
//!
//! Output is RFC 1952 gzip, so compressed payloads can be exchanged with any
//! gzip-compatible reader. Every call builds its own encoder or decoder, which
//! keeps a shared [`GzipCompressor`] safe to use from many threads.
//!
//! ## Example
//!
//! ```rust
//! use polyformat_core::compression::{Compressor, GzipCompressor};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let compressor = GzipCompressor::new();
//!
//! let data = b"Hello, World! This is test data for compression.";
//! let compressed = compressor.compress(data)?;
//! let decompressed = compressor.decompress(&compressed)?;
//!
//! assert_eq!(data, decompressed.as_slice());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::io::Read;

use flate2::Compression;
use flate2::read::{GzDecoder, GzEncoder};

use crate::error::{CodecError, CodecResult};

/// Default gzip level, balanced between speed and ratio.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Byte-level compression primitive used by codecs and pipelines.
pub trait Compressor: Send + Sync {
	/// Compresses `data`.
	fn compress(&self, data: &[u8]) -> CodecResult<Vec<u8>>;

	/// Decompresses `compressed`.
	///
	/// Returns [`CodecError::CorruptData`] on malformed or truncated input,
	/// including altered trailer bytes.
	fn decompress(&self, compressed: &[u8]) -> CodecResult<Vec<u8>>;

	/// Short algorithm name.
	fn name(&self) -> &'static str;
}

/// Gzip compressor
///
/// # Compression Levels
///
/// - Level 0: No compression
/// - Level 1-3: Fast compression, lower compression ratio
/// - Level 4-6: Balanced (default: 6)
/// - Level 7-9: Better compression, slower
#[derive(Debug, Clone)]
pub struct GzipCompressor {
	level: u32,
}

impl GzipCompressor {
	/// Create a new Gzip compressor with default level (6)
	pub fn new() -> Self {
		Self {
			level: DEFAULT_COMPRESSION_LEVEL,
		}
	}

	/// Create a new Gzip compressor with custom level, clamped to 0-9
	pub fn with_level(level: u32) -> Self {
		Self {
			level: level.min(9),
		}
	}

	/// Get the compression level
	pub fn level(&self) -> u32 {
		self.level
	}
}

impl Default for GzipCompressor {
	fn default() -> Self {
		Self::new()
	}
}

impl Compressor for GzipCompressor {
	fn compress(&self, data: &[u8]) -> CodecResult<Vec<u8>> {
		let mut encoder = GzEncoder::new(data, Compression::new(self.level));
		let mut compressed = Vec::new();
		encoder
			.read_to_end(&mut compressed)
			.map_err(|e| CodecError::CorruptData(e.to_string()))?;
		Ok(compressed)
	}

	fn decompress(&self, compressed: &[u8]) -> CodecResult<Vec<u8>> {
		let mut decoder = GzDecoder::new(compressed);
		let mut decompressed = Vec::new();
		decoder
			.read_to_end(&mut decompressed)
			.map_err(|e| CodecError::CorruptData(e.to_string()))?;
		Ok(decompressed)
	}

	fn name(&self) -> &'static str {
		"gzip"
	}
}

/// Compresses with the default gzip settings.
pub fn compress(data: &[u8]) -> CodecResult<Vec<u8>> {
	GzipCompressor::new().compress(data)
}

/// Decompresses gzip data.
pub fn decompress(compressed: &[u8]) -> CodecResult<Vec<u8>> {
	GzipCompressor::new().decompress(compressed)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;

	#[rstest]
	fn test_gzip_compress_decompress() {
		let compressor = GzipCompressor::new();
		let data = b"Hello, World! This is test data for Gzip compression.";

		let compressed = compressor.compress(data).unwrap();
		let decompressed = compressor.decompress(&compressed).unwrap();

		assert_eq!(data, decompressed.as_slice());
	}

	#[rstest]
	fn test_gzip_header_magic() {
		let compressed = compress(b"payload").unwrap();
		assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
	}

	#[rstest]
	fn test_gzip_empty_data() {
		let compressed = compress(b"").unwrap();
		assert!(decompress(&compressed).unwrap().is_empty());
	}

	#[rstest]
	fn test_corrupted_trailer_rejected() {
		let mut compressed = compress(b"some data that will be damaged").unwrap();
		let last = compressed.len() - 1;
		compressed[last] ^= 0xFF;

		let error = decompress(&compressed).unwrap_err();
		assert!(matches!(error, CodecError::CorruptData(_)));
		assert!(error.to_string().contains("invalid or corrupted"));
	}

	#[rstest]
	fn test_gzip_with_level() {
		let low = GzipCompressor::with_level(1);
		let high = GzipCompressor::with_level(9);
		let data = b"Test data for compression level comparison.".repeat(10);

		let low_compressed = low.compress(&data).unwrap();
		let high_compressed = high.compress(&data).unwrap();

		assert!(high_compressed.len() <= low_compressed.len());
		assert_eq!(low.decompress(&low_compressed).unwrap(), data);
		assert_eq!(high.decompress(&high_compressed).unwrap(), data);
	}

	#[rstest]
	fn test_level_is_clamped() {
		assert_eq!(GzipCompressor::with_level(42).level(), 9);
		assert_eq!(GzipCompressor::default().level(), DEFAULT_COMPRESSION_LEVEL);
	}

	proptest! {
		#[test]
		fn prop_gzip_round_trip(bytes in proptest::collection::vec(any::<u8>(), 0..2048)) {
			let compressed = compress(&bytes).unwrap();
			prop_assert_eq!(decompress(&compressed).unwrap(), bytes);
		}
	}
}
