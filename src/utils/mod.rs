
use rand::Rng;
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};

/// Random session id attached to a client for the lifetime of its connection.
pub fn new_sid() -> String {
    format!("{:016x}", rand::rng().random::<u64>())
}

/// Parses a wire enum name (e.g. `"broadcastAV"`, `"superModerator"`) using
/// the type's serde names.
pub fn parse_name<T: DeserializeOwned>(value: &str) -> Result<T, ValueError> {
    let deserializer: StrDeserializer<'_, ValueError> = value.into_deserializer();
    T::deserialize(deserializer)
}
