//! Method-call sugar over [`Codec`].
//!
//! ```
//! use polyformat_core::ext::{DeserializeWith, SerializeWith};
//! use polyformat_core::formats::JsonCodec;
//!
//! let codec = JsonCodec::<Vec<u32>>::new();
//! let text = vec![1, 2, 3].serialize_with(&codec).unwrap();
//! let back: Vec<u32> = text.deserialize_with(&codec).unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```

use crate::codec::Codec;
use crate::error::CodecResult;

/// `value.serialize_with(&codec)`.
pub trait SerializeWith: Sized {
	/// Serializes `self` with `codec`.
	fn serialize_with<C>(&self, codec: &C) -> CodecResult<String>
	where
		C: Codec<Self> + ?Sized;
}

impl<T> SerializeWith for T {
	fn serialize_with<C>(&self, codec: &C) -> CodecResult<String>
	where
		C: Codec<Self> + ?Sized,
	{
		codec.serialize(self)
	}
}

/// `text.deserialize_with(&codec)`.
pub trait DeserializeWith {
	/// Deserializes `self` with `codec`.
	fn deserialize_with<T, C>(&self, codec: &C) -> CodecResult<T>
	where
		C: Codec<T> + ?Sized;
}

impl DeserializeWith for str {
	fn deserialize_with<T, C>(&self, codec: &C) -> CodecResult<T>
	where
		C: Codec<T> + ?Sized,
	{
		codec.deserialize(self)
	}
}

impl DeserializeWith for String {
	fn deserialize_with<T, C>(&self, codec: &C) -> CodecResult<T>
	where
		C: Codec<T> + ?Sized,
	{
		codec.deserialize(self)
	}
}
