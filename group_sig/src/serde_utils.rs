//! Serde serialization for `arkworks-rs` objects they themselves don't implement serde, and the canonical byte
//! encoding used for keys, credentials, signatures and tags.

use crate::error::GroupSigError;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::vec::Vec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{DeserializeAs, SerializeAs};

pub type ArkObjectBytes = AsCanonical;

/// Serializes as the compressed canonical bytes. Deserialization validates the object, i.e. points must be on the
/// curve and in the prime order subgroup.
pub struct AsCanonical;

impl AsCanonical {
    pub fn serialize<S, T>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: CanonicalSerialize,
        S: Serializer,
    {
        let mut bytes = Vec::with_capacity(x.compressed_size());
        x.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;
        Serialize::serialize(&bytes, serializer)
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        T: CanonicalDeserialize,
        D: Deserializer<'de>,
    {
        let y: Vec<u8> = Deserialize::deserialize(deserializer)?;
        from_canonical_bytes(&y).map_err(|_| serde::de::Error::custom("malformed canonical bytes"))
    }
}

impl<T> SerializeAs<T> for AsCanonical
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(x: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Self::serialize(x, serializer)
    }
}

impl<'de, T> DeserializeAs<'de, T> for AsCanonical
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
    {
        Self::deserialize(deserializer)
    }
}

/// Compressed canonical encoding. The same value always encodes to the same bytes.
pub fn to_canonical_bytes<T: CanonicalSerialize>(obj: &T) -> Result<Vec<u8>, GroupSigError> {
    let mut bytes = Vec::with_capacity(obj.compressed_size());
    obj.serialize_compressed(&mut bytes)?;
    Ok(bytes)
}

/// Decode the compressed canonical encoding with full validation. Trailing bytes are rejected so that every
/// object has exactly one encoding.
pub fn from_canonical_bytes<T: CanonicalDeserialize>(bytes: &[u8]) -> Result<T, GroupSigError> {
    let mut reader = bytes;
    let obj =
        T::deserialize_compressed(&mut reader).map_err(|_| GroupSigError::MalformedInput)?;
    if !reader.is_empty() {
        return Err(GroupSigError::MalformedInput);
    }
    Ok(obj)
}
