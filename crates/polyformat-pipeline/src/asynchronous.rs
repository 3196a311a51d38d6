//! Non-blocking entry points.
//!
//! Each adapter moves the synchronous call onto tokio's blocking pool and waits
//! for it, racing the caller's [`CancellationToken`]. Cancelling returns
//! [`CodecError::Cancelled`] immediately. The blocking work itself runs to
//! completion in the background and its result is dropped.

use polyformat_core::codec::Payload;
use polyformat_core::error::{CodecError, CodecResult};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::pipeline::HookedPipeline;

async fn run_blocking<R, F>(
	operation: &'static str,
	cancel: &CancellationToken,
	work: F,
) -> CodecResult<R>
where
	R: Send + 'static,
	F: FnOnce() -> CodecResult<R> + Send + 'static,
{
	if cancel.is_cancelled() {
		return Err(CodecError::Cancelled);
	}
	let handle = tokio::task::spawn_blocking(work);
	tokio::select! {
		biased;
		_ = cancel.cancelled() => {
			debug!(operation, "Operation cancelled by caller");
			Err(CodecError::Cancelled)
		}
		joined = handle => match joined {
			Ok(result) => result,
			Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
			Err(_) => Err(CodecError::Cancelled),
		},
	}
}

impl<T: Payload + Clone> HookedPipeline<T> {
	/// Async adapter for [`HookedPipeline::serialize`].
	pub async fn serialize_async(
		&self,
		value: T,
		encrypt: Option<bool>,
		style: Option<String>,
		cancel: &CancellationToken,
	) -> CodecResult<String> {
		let pipeline = self.clone();
		run_blocking("serialize", cancel, move || {
			pipeline.serialize(&value, encrypt, style.as_deref())
		})
		.await
	}

	/// Async adapter for [`HookedPipeline::deserialize`].
	pub async fn deserialize_async(
		&self,
		data: String,
		decrypt: Option<bool>,
		cancel: &CancellationToken,
	) -> CodecResult<T> {
		let pipeline = self.clone();
		run_blocking("deserialize", cancel, move || {
			pipeline.deserialize(&data, decrypt)
		})
		.await
	}

	/// Async adapter for [`HookedPipeline::serialize_compressed`].
	pub async fn serialize_compressed_async(
		&self,
		value: T,
		encrypt: Option<bool>,
		style: Option<String>,
		cancel: &CancellationToken,
	) -> CodecResult<Vec<u8>> {
		let pipeline = self.clone();
		run_blocking("serialize_compressed", cancel, move || {
			pipeline.serialize_compressed(&value, encrypt, style.as_deref())
		})
		.await
	}

	/// Async adapter for [`HookedPipeline::deserialize_compressed`].
	pub async fn deserialize_compressed_async(
		&self,
		compressed: Vec<u8>,
		decrypt: Option<bool>,
		cancel: &CancellationToken,
	) -> CodecResult<T> {
		let pipeline = self.clone();
		run_blocking("deserialize_compressed", cancel, move || {
			pipeline.deserialize_compressed(&compressed, decrypt)
		})
		.await
	}

	/// Async adapter for [`HookedPipeline::combine_serialized`].
	pub async fn combine_serialized_async(
		&self,
		values: Vec<T>,
		encrypt: Option<bool>,
		style: Option<String>,
		cancel: &CancellationToken,
	) -> CodecResult<String> {
		let pipeline = self.clone();
		run_blocking("combine_serialized", cancel, move || {
			pipeline.combine_serialized(&values, encrypt, style.as_deref())
		})
		.await
	}

	/// Async adapter for [`HookedPipeline::split_serialized`].
	pub async fn split_serialized_async(
		&self,
		combined: String,
		decrypt: Option<bool>,
		cancel: &CancellationToken,
	) -> CodecResult<Vec<T>> {
		let pipeline = self.clone();
		run_blocking("split_serialized", cancel, move || {
			pipeline.split_serialized(&combined, decrypt)
		})
		.await
	}
}
