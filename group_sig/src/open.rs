//! Opening a signature to the member that produced it.
//!
//! `(T1, T2, T3)` is a linear encryption of the certificate `A` so the holder of `(xi1, xi2)` recovers
//! `A = T3 - T1 * xi1 - T2 * xi2`. The certificate is mapped to a fixed size [`Tag`] by hashing its canonical encoding,
//! so a member's tag is the same for all their signatures and different members get different tags.

use crate::{
    error::GroupSigError,
    message::MessageDigest,
    serde_utils::to_canonical_bytes,
    setup::{GroupKey, OpeningKey, PreparedGroupPublicKey},
    signature::Signature,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{
    end_timer, fmt,
    io::{Read, Write},
    start_timer,
    vec::Vec,
};
use digest::Digest;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Sha512;
use tracing::debug;

/// Size of a [`Tag`] in bytes
pub const TAG_SIZE: usize = 64;

const TAG_DOMAIN: &[u8] = b"BBS04-GROUP-SIG-TAG-V1";

/// Identifies the member whose certificate a signature encrypts
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub [u8; TAG_SIZE]);

impl Tag {
    /// `SHA-512(domain || compressed certificate)`
    pub fn from_certificate<G: AffineRepr>(certificate: &G) -> Result<Self, GroupSigError> {
        let bytes = to_canonical_bytes(certificate)?;
        let mut hasher = Sha512::new();
        hasher.update(TAG_DOMAIN);
        hasher.update(&bytes);
        let mut tag = [0u8; TAG_SIZE];
        tag.copy_from_slice(&hasher.finalize());
        Ok(Self(tag))
    }

    pub fn as_bytes(&self) -> &[u8; TAG_SIZE] {
        &self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let tag: [u8; TAG_SIZE] = bytes
            .try_into()
            .map_err(|_| GroupSigError::MalformedInput)?;
        Ok(Self(tag))
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0.iter() {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag({})", self)
    }
}

impl Valid for Tag {
    fn check(&self) -> Result<(), SerializationError> {
        Ok(())
    }
}

impl CanonicalSerialize for Tag {
    fn serialize_with_mode<W: Write>(
        &self,
        mut writer: W,
        _compress: Compress,
    ) -> Result<(), SerializationError> {
        writer.write_all(&self.0)?;
        Ok(())
    }

    fn serialized_size(&self, _compress: Compress) -> usize {
        TAG_SIZE
    }
}

impl CanonicalDeserialize for Tag {
    fn deserialize_with_mode<R: Read>(
        mut reader: R,
        _compress: Compress,
        _validate: Validate,
    ) -> Result<Self, SerializationError> {
        let mut tag = [0u8; TAG_SIZE];
        reader.read_exact(&mut tag)?;
        Ok(Self(tag))
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes: Vec<u8> = serde_bytes_or_seq(deserializer)?;
        Self::from_bytes(&bytes).map_err(|_| serde::de::Error::invalid_length(bytes.len(), &"64"))
    }
}

/// Self describing formats may hand bytes back as a sequence
fn serde_bytes_or_seq<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    struct BytesVisitor;

    impl<'de> serde::de::Visitor<'de> for BytesVisitor {
        type Value = Vec<u8>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a byte array")
        }

        fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
            Ok(v.to_vec())
        }

        fn visit_byte_buf<E: serde::de::Error>(self, v: Vec<u8>) -> Result<Self::Value, E> {
            Ok(v)
        }

        fn visit_seq<A: serde::de::SeqAccess<'de>>(
            self,
            mut seq: A,
        ) -> Result<Self::Value, A::Error> {
            let mut v = Vec::with_capacity(seq.size_hint().unwrap_or(TAG_SIZE));
            while let Some(b) = seq.next_element::<u8>()? {
                v.push(b);
            }
            Ok(v)
        }
    }

    deserializer.deserialize_bytes(BytesVisitor)
}

impl<F: PrimeField> OpeningKey<F> {
    /// Trace a signature to its signer's tag. Refuses with `OpenRefused` unless the signature verifies on `digest`.
    pub fn open<E: Pairing<ScalarField = F>>(
        &self,
        digest: &MessageDigest,
        signature: &Signature<E>,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<Tag, GroupSigError> {
        let certificate = self.open_certificate(digest, signature, group)?;
        Tag::from_certificate(&certificate)
    }

    /// Recover the certificate `A` encrypted in a valid signature
    pub fn open_certificate<E: Pairing<ScalarField = F>>(
        &self,
        digest: &MessageDigest,
        signature: &Signature<E>,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<E::G1Affine, GroupSigError> {
        let timer = start_timer!(|| "Group signature opening");
        if let Err(e) = signature.verify_with_reason(digest, group) {
            debug!(reason = ?e, "refusing to open a signature that does not verify");
            end_timer!(timer);
            return Err(GroupSigError::OpenRefused);
        }
        let certificate = (signature.T3.into_group()
            - signature.T1 * self.xi1
            - signature.T2 * self.xi2)
            .into_affine();
        end_timer!(timer);
        Ok(certificate)
    }
}

impl<E: Pairing> GroupKey<E> {
    /// Trace a signature to its signer's tag
    pub fn open(
        &self,
        digest: &MessageDigest,
        signature: &Signature<E>,
    ) -> Result<Tag, GroupSigError> {
        let group = self.public.prepare()?;
        self.opening_key.open(digest, signature, &group)
    }
}
