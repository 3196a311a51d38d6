//! Symmetric text encryption for serialized payloads.
//!
//! Payload text is sealed with AES-256-GCM and armored with standard base64 so
//! the result stays a string. The 32-byte key is the UTF-8 key text padded with
//! spaces (or truncated) to 32 bytes.
//!
//! Two nonce strategies are available:
//!
//! - [`NonceStrategy::Synthetic`] derives the nonce with HMAC-SHA256 over the
//!   plaintext under a subkey of the key material. The same plaintext and key
//!   always produce the same ciphertext, which lets equal payloads be
//!   recognised but also leaks that equality to observers. Distinct
//!   plaintexts never share a nonce.
//! - [`NonceStrategy::Random`] draws a fresh nonce per message.
//!
//! Either way the nonce is prefixed to the ciphertext before armoring.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::{CodecError, CodecResult};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const NONCE_KEY_LABEL: &[u8] = b"polyformat synthetic nonce";

type HmacSha256 = Hmac<Sha256>;

/// How the per-message nonce is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonceStrategy {
	/// Nonce derived from the key and plaintext; deterministic output.
	#[default]
	Synthetic,
	/// Random nonce transmitted in front of the ciphertext.
	Random,
}

/// Key material and nonce policy.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
	/// Key text. `None` or empty means encryption is unavailable.
	pub key: Option<String>,
	/// Nonce policy.
	pub nonce: NonceStrategy,
}

impl std::fmt::Debug for EncryptionConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EncryptionConfig")
			.field("key", &self.key.as_ref().map(|_| "<redacted>"))
			.field("nonce", &self.nonce)
			.finish()
	}
}

impl EncryptionConfig {
	/// Creates a configuration with the given key and a synthetic nonce.
	pub fn with_key(key: impl Into<String>) -> Self {
		Self {
			key: Some(key.into()),
			nonce: NonceStrategy::Synthetic,
		}
	}

	/// Sets the nonce strategy.
	pub fn with_nonce(mut self, nonce: NonceStrategy) -> Self {
		self.nonce = nonce;
		self
	}

	/// Returns true when a non-empty key is configured.
	pub fn has_key(&self) -> bool {
		self.key.as_deref().is_some_and(|k| !k.is_empty())
	}
}

/// Encrypts and decrypts payload text.
///
/// A fresh cipher is built for every call.
///
/// # Example
///
/// ```
/// use polyformat_core::encryption::{EncryptionConfig, Encryptor};
///
/// let encryptor = Encryptor::new(EncryptionConfig::with_key("defaultKey123"));
/// let sealed = encryptor.encrypt("{\"Name\":\"John\"}").unwrap();
/// assert_eq!(encryptor.decrypt(&sealed).unwrap(), "{\"Name\":\"John\"}");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Encryptor {
	config: EncryptionConfig,
}

impl Encryptor {
	/// Creates an encryptor from its configuration.
	pub fn new(config: EncryptionConfig) -> Self {
		Self { config }
	}

	/// Returns the configuration.
	pub fn config(&self) -> &EncryptionConfig {
		&self.config
	}

	/// Encrypts `plain_text` and returns base64 text.
	///
	/// # Errors
	///
	/// [`CodecError::MissingKey`] when no key is configured.
	pub fn encrypt(&self, plain_text: &str) -> CodecResult<String> {
		let key = self.key_material()?;
		let cipher = Aes256Gcm::new_from_slice(&key)
			.map_err(|e| CodecError::Encryption(e.to_string()))?;

		let nonce = match self.config.nonce {
			NonceStrategy::Synthetic => Nonce::from(synthetic_nonce(&key, plain_text.as_bytes())?),
			NonceStrategy::Random => Aes256Gcm::generate_nonce(&mut OsRng),
		};
		let ciphertext = cipher
			.encrypt(&nonce, plain_text.as_bytes())
			.map_err(|e| CodecError::Encryption(e.to_string()))?;

		let mut sealed = nonce.to_vec();
		sealed.extend_from_slice(&ciphertext);
		Ok(STANDARD.encode(sealed))
	}

	/// Decrypts base64 text produced by [`Encryptor::encrypt`].
	///
	/// # Errors
	///
	/// [`CodecError::NullInput`] for empty input, [`CodecError::MissingKey`]
	/// without a key, [`CodecError::Encryption`] when the armor or the
	/// authentication tag is invalid.
	pub fn decrypt(&self, cipher_text: &str) -> CodecResult<String> {
		if cipher_text.is_empty() {
			return Err(CodecError::NullInput("cipher_text"));
		}
		let key = self.key_material()?;
		let cipher = Aes256Gcm::new_from_slice(&key)
			.map_err(|e| CodecError::Encryption(e.to_string()))?;
		let sealed = STANDARD
			.decode(cipher_text.trim())
			.map_err(|e| CodecError::Encryption(e.to_string()))?;

		if sealed.len() < NONCE_LEN {
			return Err(CodecError::Encryption(
				"Invalid encrypted data: too short".to_string(),
			));
		}
		let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
		let plain = cipher
			.decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
			.map_err(|e| CodecError::Encryption(e.to_string()))?;

		if self.config.nonce == NonceStrategy::Synthetic {
			nonce_mac(&key, &plain)?
				.verify_truncated_left(nonce_bytes)
				.map_err(|_| CodecError::Encryption("synthetic nonce mismatch".to_string()))?;
		}

		String::from_utf8(plain).map_err(|e| CodecError::Encryption(e.to_string()))
	}

	fn key_material(&self) -> CodecResult<[u8; KEY_LEN]> {
		let key = self
			.config
			.key
			.as_deref()
			.filter(|k| !k.is_empty())
			.ok_or(CodecError::MissingKey)?;
		let mut material = [b' '; KEY_LEN];
		let bytes = key.as_bytes();
		let len = bytes.len().min(KEY_LEN);
		material[..len].copy_from_slice(&bytes[..len]);
		Ok(material)
	}
}

fn nonce_mac(key: &[u8; KEY_LEN], plain: &[u8]) -> CodecResult<HmacSha256> {
	let mut subkey = <HmacSha256 as Mac>::new_from_slice(key)
		.map_err(|e| CodecError::Encryption(e.to_string()))?;
	subkey.update(NONCE_KEY_LABEL);
	let subkey = subkey.finalize().into_bytes();

	let mut mac = <HmacSha256 as Mac>::new_from_slice(&subkey)
		.map_err(|e| CodecError::Encryption(e.to_string()))?;
	mac.update(plain);
	Ok(mac)
}

fn synthetic_nonce(key: &[u8; KEY_LEN], plain: &[u8]) -> CodecResult<[u8; NONCE_LEN]> {
	let tag = nonce_mac(key, plain)?.finalize().into_bytes();
	let mut nonce = [0u8; NONCE_LEN];
	nonce.copy_from_slice(&tag[..NONCE_LEN]);
	Ok(nonce)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn encryptor(nonce: NonceStrategy) -> Encryptor {
		Encryptor::new(EncryptionConfig::with_key("defaultKey123").with_nonce(nonce))
	}

	#[rstest]
	#[case(NonceStrategy::Synthetic)]
	#[case(NonceStrategy::Random)]
	fn test_round_trip(#[case] nonce: NonceStrategy) {
		let encryptor = encryptor(nonce);
		let sealed = encryptor.encrypt("{\"Name\":\"John Doe\",\"Age\":30}").unwrap();
		assert_ne!(sealed, "{\"Name\":\"John Doe\",\"Age\":30}");
		assert_eq!(
			encryptor.decrypt(&sealed).unwrap(),
			"{\"Name\":\"John Doe\",\"Age\":30}"
		);
	}

	#[rstest]
	fn test_synthetic_is_deterministic() {
		let encryptor = encryptor(NonceStrategy::Synthetic);
		let first = encryptor.encrypt("same plaintext").unwrap();
		let second = encryptor.encrypt("same plaintext").unwrap();
		assert_eq!(first, second);
	}

	#[rstest]
	fn test_random_nonce_differs_per_message() {
		let encryptor = encryptor(NonceStrategy::Random);
		let first = encryptor.encrypt("same plaintext").unwrap();
		let second = encryptor.encrypt("same plaintext").unwrap();
		assert_ne!(first, second);
	}

	#[rstest]
	fn test_missing_key() {
		let encryptor = Encryptor::default();
		assert!(matches!(
			encryptor.encrypt("text"),
			Err(CodecError::MissingKey)
		));
		let empty = Encryptor::new(EncryptionConfig::with_key(""));
		assert!(matches!(empty.decrypt("abcd"), Err(CodecError::MissingKey)));
	}

	#[rstest]
	fn test_empty_cipher_text() {
		let encryptor = encryptor(NonceStrategy::Synthetic);
		assert!(matches!(
			encryptor.decrypt(""),
			Err(CodecError::NullInput("cipher_text"))
		));
	}

	#[rstest]
	fn test_wrong_key_fails_authentication() {
		let sealed = encryptor(NonceStrategy::Synthetic).encrypt("secret").unwrap();
		let other = Encryptor::new(EncryptionConfig::with_key("anotherKey456"));
		assert!(matches!(
			other.decrypt(&sealed),
			Err(CodecError::Encryption(_))
		));
	}

	#[rstest]
	fn test_long_key_is_truncated() {
		let long = "k".repeat(64);
		let encryptor = Encryptor::new(EncryptionConfig::with_key(long.clone()));
		let truncated = Encryptor::new(EncryptionConfig::with_key(&long[..32]));
		let sealed = encryptor.encrypt("payload").unwrap();
		assert_eq!(truncated.decrypt(&sealed).unwrap(), "payload");
	}

	#[rstest]
	fn test_debug_redacts_key() {
		let config = EncryptionConfig::with_key("topsecret");
		assert!(!format!("{:?}", config).contains("topsecret"));
	}

	/// Test that distinct plaintexts never share a keystream
	///
	/// **Category**: Security
	/// **Verifies**: XOR of two deterministic ciphertexts with one known plaintext does not reveal the other
	#[rstest]
	fn test_synthetic_nonce_differs_per_plaintext() {
		let encryptor = encryptor(NonceStrategy::Synthetic);
		let known = "{\"Name\":\"John Doe\",\"Age\":30}";
		let secret = "{\"Name\":\"Jane Roe\",\"Age\":41}";
		let first = STANDARD.decode(encryptor.encrypt(known).unwrap()).unwrap();
		let second = STANDARD.decode(encryptor.encrypt(secret).unwrap()).unwrap();

		assert_ne!(first[..NONCE_LEN], second[..NONCE_LEN]);
		let recovered: Vec<u8> = first[NONCE_LEN..]
			.iter()
			.zip(&second[NONCE_LEN..])
			.zip(known.as_bytes())
			.map(|((a, b), p)| a ^ b ^ p)
			.collect();
		assert_ne!(recovered, secret.as_bytes());
	}

	#[rstest]
	fn test_tampered_nonce_is_rejected() {
		let encryptor = encryptor(NonceStrategy::Synthetic);
		let mut sealed = STANDARD.decode(encryptor.encrypt("payload").unwrap()).unwrap();
		sealed[0] ^= 0x01;
		assert!(matches!(
			encryptor.decrypt(&STANDARD.encode(sealed)),
			Err(CodecError::Encryption(_))
		));
	}

	#[rstest]
	fn test_truncated_cipher_text() {
		let encryptor = encryptor(NonceStrategy::Synthetic);
		assert!(matches!(
			encryptor.decrypt(&STANDARD.encode([0u8; 4])),
			Err(CodecError::Encryption(_))
		));
	}
}
