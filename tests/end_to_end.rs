//! End-to-end scenarios through the facade crate.

use polyformat::prelude::*;
use polyformat::{FormatRegistry, NetworkChannel};
use rstest::{fixture, rstest};
use serde::{Deserialize, Serialize};
use serial_test::serial;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Person {
	name: String,
	age: i32,
}

impl_structural!(Person);

#[fixture]
fn john() -> Person {
	Person {
		name: "John Doe".to_string(),
		age: 30,
	}
}

/// Test the compressed round trip and cross-format comparison
///
/// **Category**: Happy Path
/// **Verifies**: compressed data decodes to an equal value and JSON/XML forms compare equal
#[rstest]
#[serial(global_registry)]
fn test_person_end_to_end(john: Person) {
	let pipeline = HookedPipeline::json(PipelineOptions::new().with_encryption_key("defaultKey123"));
	let compressed = pipeline.serialize_compressed(&john, Some(true), None).unwrap();
	let back = pipeline.deserialize_compressed(&compressed, Some(true)).unwrap();
	assert_eq!(back.name, john.name);
	assert_eq!(back.age, john.age);

	let registry = FormatRegistry::global();
	registry.clear();
	registry.install_builtin_formats();

	let json = registry.resolve::<Person>("json").unwrap().serialize(&john).unwrap();
	let xml = registry.resolve::<Person>("xml").unwrap().serialize(&john).unwrap();
	assert!(
		polyformat::registry::compare_serialized_data::<Person>(&json, "JSON", &xml, "XML")
			.unwrap()
	);
}

/// Test extension traits against a registry codec
///
/// **Category**: Happy Path
/// **Verifies**: `serialize_with` and `deserialize_with` agree with the codec
#[rstest]
fn test_extension_traits(john: Person) {
	let registry = FormatRegistry::with_builtin_formats();
	let codec = registry.resolve::<Person>("yaml").unwrap();

	let text = john.serialize_with(&codec).unwrap();
	let back: Person = text.deserialize_with(&codec).unwrap();
	assert_eq!(back, john);
}

/// Test the network channel over an in-memory pipe
///
/// **Category**: Happy Path
/// **Verifies**: one payload travels from sender to receiver unchanged
#[rstest]
#[tokio::test]
async fn test_network_channel(john: Person) {
	let channel = NetworkChannel::new(HookedPipeline::xml(PipelineOptions::new()));
	let (mut client, mut server) = tokio::io::duplex(256);

	let sender = channel.clone();
	let value = john.clone();
	let send = tokio::spawn(async move { sender.send(&value, &mut client).await });

	assert_eq!(channel.receive(&mut server).await.unwrap(), john);
	send.await.unwrap().unwrap();
}
