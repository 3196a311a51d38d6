//! Writing payloads to files and reading them back.

use std::path::{Path, PathBuf};

use polyformat_core::codec::Payload;
use polyformat_core::error::{CodecError, CodecResult};
use serde::Serialize;
use tracing::{error, info};

use crate::pipeline::HookedPipeline;

/// Severity of an [`OperationMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
	/// Progress information.
	Info,
	/// Failure detail.
	Error,
}

/// One diagnostic line recorded during a file operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationMessage {
	/// Severity.
	pub level: MessageLevel,
	/// Message text.
	pub body: String,
}

/// Outcome of a write-to-file operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileOperationResult {
	/// Whether the payload reached the file.
	pub success: bool,
	/// Target path.
	pub path: PathBuf,
	/// Bytes written.
	pub bytes_written: usize,
	/// Messages in the order they were recorded.
	pub messages: Vec<OperationMessage>,
}

impl FileOperationResult {
	fn new(path: &Path) -> Self {
		Self {
			path: path.to_path_buf(),
			..Self::default()
		}
	}

	fn info(&mut self, body: String) {
		info!("{}", body);
		self.messages.push(OperationMessage {
			level: MessageLevel::Info,
			body,
		});
	}

	/// Messages at the given level.
	pub fn messages_at(&self, level: MessageLevel) -> impl Iterator<Item = &OperationMessage> {
		self.messages.iter().filter(move |m| m.level == level)
	}
}

/// File-backed front end for a [`HookedPipeline`].
#[derive(Debug, Clone)]
pub struct FileDestination<T> {
	pipeline: HookedPipeline<T>,
}

impl<T: Payload + Clone> FileDestination<T> {
	/// Uses `pipeline` for encoding and decoding.
	pub fn new(pipeline: HookedPipeline<T>) -> Self {
		Self { pipeline }
	}

	/// Underlying pipeline.
	pub fn pipeline(&self) -> &HookedPipeline<T> {
		&self.pipeline
	}

	/// Serializes `value` into `path`, creating missing parent directories.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for an empty path. Encoding and I/O errors are
	/// logged, then returned unchanged.
	pub fn serialize_to_file(
		&self,
		value: &T,
		path: impl AsRef<Path>,
		style: Option<&str>,
		encrypt: Option<bool>,
	) -> CodecResult<FileOperationResult> {
		let path = path.as_ref();
		if path.as_os_str().is_empty() {
			return Err(CodecError::NullInput("path"));
		}

		let mut result = FileOperationResult::new(path);
		let text = self
			.pipeline
			.serialize(value, encrypt, style)
			.inspect_err(|e| error!(path = %path.display(), error = %e, "Error during serialization"))?;

		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			if !parent.exists() {
				std::fs::create_dir_all(parent).inspect_err(|e| {
					error!(path = %parent.display(), error = %e, "Failed to create directory");
				})?;
				result.info(format!("Created directory: {}", parent.display()));
			}
		}

		std::fs::write(path, text.as_bytes())
			.inspect_err(|e| error!(path = %path.display(), error = %e, "Failed to write file"))?;

		result.bytes_written = text.len();
		result.success = true;
		result.info(format!("Data serialized and saved to file: {}", path.display()));
		Ok(result)
	}

	/// Reads `path` and deserializes its content.
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for an empty path and
	/// [`CodecError::FileNotFound`] when the file does not exist.
	pub fn deserialize_from_file(&self, path: impl AsRef<Path>, decrypt: Option<bool>) -> CodecResult<T> {
		let path = path.as_ref();
		if path.as_os_str().is_empty() {
			return Err(CodecError::NullInput("path"));
		}
		if !path.is_file() {
			info!(path = %path.display(), "File not found");
			return Err(CodecError::FileNotFound(path.to_path_buf()));
		}

		info!(path = %path.display(), "Reading data from file");
		let text = std::fs::read_to_string(path).inspect_err(|e| {
			error!(path = %path.display(), error = %e, "Error during deserialization from file");
		})?;

		let value = self.pipeline.deserialize(&text, decrypt).inspect_err(|e| {
			error!(path = %path.display(), error = %e, "Error during deserialization from file");
		})?;
		info!(path = %path.display(), "Data deserialized successfully from file");
		Ok(value)
	}
}
