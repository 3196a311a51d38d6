//! Hook-decorated serialization pipelines for polyformat.
//!
//! A [`HookedPipeline`] wraps any [`Codec`](polyformat_core::Codec) and adds:
//!
//! - **Hooks**: optional `before_serialize` / `after_deserialize` transforms
//! - **Encryption**: AES-256-GCM applied after encoding, removed before decoding
//! - **Compression**: gzip as the outermost layer of the compressed variants
//! - **Batches**: many values combined into one format-native array
//! - **Async adapters**: blocking-pool offload with explicit cancellation
//!
//! [`FileDestination`] and [`NetworkChannel`] put a pipeline in front of files
//! and byte streams.
//!
//! # Ordering
//!
//! ```text
//! serialize:               hook -> encode -> encrypt
//! deserialize:             decrypt -> decode -> hook
//! serialize_compressed:    hook -> encode -> encrypt -> gzip
//! deserialize_compressed:  gunzip -> decrypt -> decode -> hook
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod asynchronous;
mod batch;
pub mod destinations;
pub mod network;
pub mod pipeline;

pub use destinations::{FileDestination, FileOperationResult, MessageLevel, OperationMessage};
pub use network::NetworkChannel;
pub use pipeline::HookedPipeline;

// Cancellation token accepted by the `*_async` adapters
pub use tokio_util::sync::CancellationToken;
