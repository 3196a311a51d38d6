//! Pass-through transport over async byte streams.
//!
//! One payload per connection: the sender writes the compact, unencrypted
//! serialization and shuts down its write half; the receiver reads to EOF.

use polyformat_core::codec::Payload;
use polyformat_core::error::CodecResult;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::info;

use crate::pipeline::HookedPipeline;

/// Sends and receives single payloads over any tokio stream.
#[derive(Debug, Clone)]
pub struct NetworkChannel<T> {
	pipeline: HookedPipeline<T>,
}

impl<T: Payload + Clone> NetworkChannel<T> {
	/// Uses `pipeline` for encoding and decoding.
	pub fn new(pipeline: HookedPipeline<T>) -> Self {
		Self { pipeline }
	}

	/// Writes `value` to `writer`, then shuts the writer down.
	pub async fn send<W>(&self, value: &T, writer: &mut W) -> CodecResult<usize>
	where
		W: AsyncWrite + Unpin,
	{
		let text = self.pipeline.serialize(value, Some(false), Some("Compact"))?;
		writer.write_all(text.as_bytes()).await?;
		writer.shutdown().await?;
		info!(size = text.len(), "Data sent to network");
		Ok(text.len())
	}

	/// Reads `reader` to EOF and deserializes the content.
	pub async fn receive<R>(&self, reader: &mut R) -> CodecResult<T>
	where
		R: AsyncRead + Unpin,
	{
		let mut text = String::new();
		reader.read_to_string(&mut text).await?;
		info!(size = text.len(), "Data received from network");
		self.pipeline.deserialize(&text, Some(false))
	}

	/// Connects to `addr` and sends `value`.
	pub async fn send_to<A: ToSocketAddrs>(&self, value: &T, addr: A) -> CodecResult<usize> {
		let mut stream = TcpStream::connect(addr).await?;
		self.send(value, &mut stream).await
	}

	/// Connects to `addr` and receives one payload.
	pub async fn receive_from<A: ToSocketAddrs>(&self, addr: A) -> CodecResult<T> {
		let mut stream = TcpStream::connect(addr).await?;
		self.receive(&mut stream).await
	}
}
