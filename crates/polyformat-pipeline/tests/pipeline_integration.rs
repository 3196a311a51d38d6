//! Pipeline integration tests
//!
//! End-to-end scenarios across encryption, compression, hooks and files.

use std::sync::Arc;
use std::thread;

use polyformat_core::{CodecError, NonceStrategy, OutputStyle, PipelineOptions};
use polyformat_pipeline::{CancellationToken, FileDestination, HookedPipeline};
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
	name: String,
	age: i32,
}

// =============================================================================
// Fixtures
// =============================================================================

#[fixture]
fn john() -> Person {
	Person {
		name: "John Doe".to_string(),
		age: 30,
	}
}

#[fixture]
fn options() -> PipelineOptions {
	PipelineOptions::from_toml_str(
		r#"
enable_encryption = true
default_style = "indented"

[encryption]
key = "defaultKey123"
"#,
	)
	.unwrap()
}

// =============================================================================
// End-to-End Tests
// =============================================================================

/// Test the compressed round trip
///
/// **Category**: Happy Path
/// **Verifies**: compress then decompress yields an equal value on every field
#[rstest]
fn test_compressed_end_to_end(john: Person, options: PipelineOptions) {
	let pipeline = HookedPipeline::json(options);
	let compressed = pipeline.serialize_compressed(&john, None, None).unwrap();
	let back = pipeline.deserialize_compressed(&compressed, None).unwrap();
	assert_eq!(back.name, john.name);
	assert_eq!(back.age, john.age);
}

/// Test deterministic encryption across pipelines
///
/// **Category**: Happy Path
/// **Verifies**: the synthetic nonce yields identical ciphertext
#[rstest]
fn test_synthetic_nonce_ciphertext_is_stable(john: Person, options: PipelineOptions) {
	let first = HookedPipeline::xml(options.clone());
	let second = HookedPipeline::xml(options);
	assert_eq!(
		first.serialize(&john, None, None).unwrap(),
		second.serialize(&john, None, None).unwrap()
	);
}

/// Test random nonces across calls
///
/// **Category**: Happy Path
/// **Verifies**: random nonces differ yet both decrypt
#[rstest]
fn test_random_nonce_round_trip(john: Person, options: PipelineOptions) {
	let pipeline = HookedPipeline::yaml(options.with_nonce_strategy(NonceStrategy::Random));
	let first = pipeline.serialize(&john, None, None).unwrap();
	let second = pipeline.serialize(&john, None, None).unwrap();
	assert_ne!(first, second);
	assert_eq!(pipeline.deserialize(&first, None).unwrap(), john);
	assert_eq!(pipeline.deserialize(&second, None).unwrap(), john);
}

/// Test mismatched decrypt flag
///
/// **Category**: Error Path
/// **Verifies**: plain text fed to the decrypting side fails in the cipher layer
#[rstest]
fn test_decrypting_plain_text_fails(john: Person, options: PipelineOptions) {
	let pipeline = HookedPipeline::json(options);
	let plain = pipeline.serialize(&john, Some(false), None).unwrap();
	assert!(matches!(
		pipeline.deserialize(&plain, None),
		Err(CodecError::Encryption(_))
	));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

/// Test one pipeline shared by many threads
///
/// **Category**: Concurrency
/// **Verifies**: concurrent calls are independent and race-free
#[rstest]
fn test_shared_pipeline_across_threads(options: PipelineOptions) {
	let pipeline = Arc::new(HookedPipeline::json(options).with_after_deserialize(
		|mut p: Person| {
			p.name = p.name.trim().to_string();
			p
		},
	));

	let handles: Vec<_> = (0..8)
		.map(|i| {
			let pipeline = Arc::clone(&pipeline);
			thread::spawn(move || {
				let person = Person {
					name: format!(" worker {} ", i),
					age: i,
				};
				let sealed = pipeline.serialize(&person, None, None).unwrap();
				pipeline.deserialize(&sealed, None).unwrap()
			})
		})
		.collect();

	for (i, handle) in handles.into_iter().enumerate() {
		let person = handle.join().unwrap();
		assert_eq!(person.name, format!("worker {}", i));
		assert_eq!(person.age, i as i32);
	}
}

/// Test async adapters racing the same token
///
/// **Category**: Concurrency
/// **Verifies**: many in-flight adapters complete when never cancelled
#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_adapters_in_parallel(options: PipelineOptions) {
	let pipeline = HookedPipeline::bson(options);
	let cancel = CancellationToken::new();

	let mut tasks = Vec::new();
	for age in 0..4 {
		let pipeline = pipeline.clone();
		let cancel = cancel.clone();
		tasks.push(tokio::spawn(async move {
			let person = Person {
				name: "async".to_string(),
				age,
			};
			let sealed = pipeline
				.serialize_async(person.clone(), None, None, &cancel)
				.await
				.unwrap();
			let back = pipeline.deserialize_async(sealed, None, &cancel).await.unwrap();
			assert_eq!(back, person);
		}));
	}
	for task in tasks {
		task.await.unwrap();
	}
}

// =============================================================================
// File Destination Tests
// =============================================================================

/// Test file round trip with configured default style
///
/// **Category**: Happy Path
/// **Verifies**: files written with defaults read back with defaults
#[rstest]
fn test_file_destination_defaults(john: Person) {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("out").join("person.xml");
	let options = PipelineOptions::new().with_default_style(OutputStyle::Indented);
	let destination = FileDestination::new(HookedPipeline::xml(options));

	let result = destination.serialize_to_file(&john, &path, None, None).unwrap();
	assert!(result.success);
	let written = std::fs::read_to_string(&path).unwrap();
	assert!(written.contains("\n  <Name>John Doe</Name>"));
	assert_eq!(destination.deserialize_from_file(&path, None).unwrap(), john);
}
