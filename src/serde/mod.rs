//! Binding between literal syntax and Rust types via serde.
//!
//! [to_string] writes any `Serialize` type as a literal, [from_str] reads a
//! literal into any `Deserialize` type by way of the parsed [crate::Value]
//! tree.

mod de;
mod error;
mod ser;

pub use de::{ValueDeserializer, from_str, from_value};
pub use error::{Error, Result};
pub use ser::{Serializer, to_string};
