//! Combining many values into one wire unit and splitting it back.

use std::time::Instant;

use polyformat_core::codec::{Codec, Payload};
use polyformat_core::error::{CodecError, CodecResult};
use tracing::debug;

use crate::pipeline::HookedPipeline;

impl<T: Payload + Clone> HookedPipeline<T> {
	/// Hooks and encodes every value, wraps the documents in the format's
	/// native array shape, then optionally encrypts the whole unit.
	pub fn combine_serialized(
		&self,
		values: &[T],
		encrypt: Option<bool>,
		style: Option<&str>,
	) -> CodecResult<String> {
		let started = Instant::now();
		let style = self.options.effective_style(style);
		let encrypt = self.encrypt_flag(encrypt);

		let documents = values
			.iter()
			.map(|value| self.encode_one(value, style))
			.collect::<CodecResult<Vec<_>>>()?;
		let combined = self.codec.combine(documents)?;
		let combined = self.seal(combined, encrypt)?;

		debug!(
			format = self.format(),
			count = values.len(),
			encrypt,
			size = combined.len(),
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Combined payloads"
		);
		Ok(combined)
	}

	/// Reverses [`HookedPipeline::combine_serialized`].
	///
	/// `decrypt` defaults to [`PipelineOptions::enable_encryption`](polyformat_core::PipelineOptions).
	///
	/// # Errors
	///
	/// - [`CodecError::NullInput`] for empty input
	/// - [`CodecError::Decode`] when the outer array cannot be parsed
	/// - [`CodecError::BatchElement`] naming the first element that fails
	pub fn split_serialized(&self, combined: &str, decrypt: Option<bool>) -> CodecResult<Vec<T>> {
		if combined.is_empty() {
			return Err(CodecError::NullInput("combined"));
		}
		let started = Instant::now();
		let decrypt = self.encrypt_flag(decrypt);

		let text = self.unseal(combined, decrypt)?;
		let values = self
			.codec
			.split(&text)?
			.iter()
			.enumerate()
			.map(|(index, document)| {
				self.decode_one(document)
					.map_err(|source| CodecError::BatchElement {
						index,
						source: Box::new(source),
					})
			})
			.collect::<CodecResult<Vec<_>>>()?;

		debug!(
			format = self.format(),
			count = values.len(),
			decrypt,
			elapsed_ms = started.elapsed().as_millis() as u64,
			"Split payloads"
		);
		Ok(values)
	}
}
