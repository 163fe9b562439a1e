//! Module providing abstractions on top of [`serde`] components to make them easier to use.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// Trait to represent a serialization provider.
pub trait SerializationProvider {
    /// Serialized bytes container.
    type SerializedBytes: Deref<Target = [u8]>;

    /// Error type used by the fallible functions of this trait.
    type Error: std::error::Error;

    /// Media type to advertise for the serialized representation.
    const CONTENT_TYPE: &'static str;

    /// Serializes the given value.
    fn serialize<T>(value: &T) -> Result<Self::SerializedBytes, Self::Error>
    where
        T: Serialize;

    /// Deserializes the given serialized bytes into a `T` instance.
    fn deserialize<'a, T>(bytes: &'a [u8]) -> Result<T, Self::Error>
    where
        T: Deserialize<'a>;
}

pub mod json {
    //! Module providing a JSON serialization provider.

    /// Implements [`SerializationProvider`](super::SerializationProvider) for [`serde_json`].
    pub struct Json;

    impl super::SerializationProvider for Json {
        type Error = serde_json::Error;

        type SerializedBytes = Vec<u8>;

        const CONTENT_TYPE: &'static str = "application/json";

        fn serialize<T>(value: &T) -> Result<Self::SerializedBytes, Self::Error>
        where
            T: serde::Serialize,
        {
            serde_json::to_vec(value)
        }

        fn deserialize<'a, T>(bytes: &'a [u8]) -> Result<T, Self::Error>
        where
            T: serde::Deserialize<'a>,
        {
            serde_json::from_slice(bytes)
        }
    }
}
