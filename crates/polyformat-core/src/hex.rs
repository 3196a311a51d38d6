//! Lowercase hex encoding for binary payloads.
//!
//! The BSON codec uses these helpers to carry binary documents through
//! text-only channels.
//!
//! # Examples
//!
//! ```
//! use polyformat_core::hex::{bytes_to_hex, hex_to_bytes};
//!
//! let text = bytes_to_hex(&[0xDE, 0xAD, 0xBE, 0xEF]);
//! assert_eq!(text, "deadbeef");
//! assert_eq!(hex_to_bytes(&text).unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
//! ```

use crate::error::{CodecError, CodecResult};

/// Encodes bytes as a lowercase hex string of length `2 * bytes.len()`.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
	::hex::encode(bytes)
}

/// Decodes a hex string (either case) into bytes.
///
/// # Errors
///
/// Returns [`CodecError::OddLength`] when the string has an odd number of
/// characters and [`CodecError::InvalidHex`] when it contains a non-hex digit.
pub fn hex_to_bytes(hex: &str) -> CodecResult<Vec<u8>> {
	if hex.len() % 2 != 0 {
		return Err(CodecError::OddLength(hex.len()));
	}
	::hex::decode(hex).map_err(|e| CodecError::InvalidHex(e.to_string()))
}
