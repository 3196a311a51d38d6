//! Built-in format engines.
//!
//! | key              | engine         | combined shape                      |
//! |------------------|----------------|-------------------------------------|
//! | `JSON`           | `serde_json`   | JSON array of documents             |
//! | `JSON_CANONICAL` | `serde_json`   | JSON array, keys sorted             |
//! | `XML`            | `quick-xml`    | `<Batch><Item>..</Item></Batch>`    |
//! | `YAML`           | `serde_yaml`   | YAML sequence                       |
//! | `BSON`           | `bson`         | `{ "Messages": [docs] }` as hex     |

mod bson;
mod json;
mod xml;
mod yaml;

pub use self::bson::BsonCodec;
pub use self::json::JsonCodec;
pub use self::xml::XmlCodec;
pub use self::yaml::YamlCodec;

/// JSON format key.
pub const JSON: &str = "JSON";
/// Canonical (sorted-key) JSON format key.
pub const JSON_CANONICAL: &str = "JSON_CANONICAL";
/// XML format key.
pub const XML: &str = "XML";
/// YAML format key.
pub const YAML: &str = "YAML";
/// BSON format key.
pub const BSON: &str = "BSON";

/// Keys of every built-in format, sorted.
pub const BUILTIN_FORMATS: [&str; 5] = [BSON, JSON, JSON_CANONICAL, XML, YAML];

/// Normalizes a format name: trimmed, ASCII upper-case.
pub fn normalize_format(name: &str) -> String {
	name.trim().to_ascii_uppercase()
}
