//! Message digests. The scheme never signs raw bytes, only a fixed length digest whose algorithm is pinned in the
//! group's public key when the group is created. Signing rejects a digest of any other algorithm and verification
//! returns false for it.

use crate::error::GroupSigError;
use ark_serialize::{
    CanonicalDeserialize, CanonicalSerialize, Compress, SerializationError, Valid, Validate,
};
use ark_std::{
    io::{Read, Write},
    vec::Vec,
};
use blake2::Blake2b512;
use digest::Digest;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Sha512};

/// Hash function used to compute message digests for a group
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Default, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    #[default]
    Sha256,
    Sha512,
    Blake2b512,
}

impl DigestAlgorithm {
    /// Size of the digest in bytes
    pub const fn output_size(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
            Self::Blake2b512 => 64,
        }
    }

    /// Byte used to identify the algorithm in the canonical encoding of the public key and in the challenge
    pub const fn id(&self) -> u8 {
        match self {
            Self::Sha256 => 1,
            Self::Sha512 => 2,
            Self::Blake2b512 => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Sha256),
            2 => Some(Self::Sha512),
            3 => Some(Self::Blake2b512),
            _ => None,
        }
    }

    /// Hash the message
    pub fn digest(&self, message: &[u8]) -> MessageDigest {
        let bytes = match self {
            Self::Sha256 => Sha256::digest(message).to_vec(),
            Self::Sha512 => Sha512::digest(message).to_vec(),
            Self::Blake2b512 => Blake2b512::digest(message).to_vec(),
        };
        MessageDigest {
            algorithm: *self,
            bytes,
        }
    }
}

impl Valid for DigestAlgorithm {
    fn check(&self) -> Result<(), SerializationError> {
        Ok(())
    }
}

impl CanonicalSerialize for DigestAlgorithm {
    fn serialize_with_mode<W: Write>(
        &self,
        writer: W,
        compress: Compress,
    ) -> Result<(), SerializationError> {
        self.id().serialize_with_mode(writer, compress)
    }

    fn serialized_size(&self, compress: Compress) -> usize {
        self.id().serialized_size(compress)
    }
}

impl CanonicalDeserialize for DigestAlgorithm {
    fn deserialize_with_mode<R: Read>(
        reader: R,
        compress: Compress,
        validate: Validate,
    ) -> Result<Self, SerializationError> {
        let id = u8::deserialize_with_mode(reader, compress, validate)?;
        Self::from_id(id).ok_or(SerializationError::InvalidData)
    }
}

/// Digest of a message along with the algorithm that produced it
#[derive(Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct MessageDigest {
    algorithm: DigestAlgorithm,
    bytes: Vec<u8>,
}

impl MessageDigest {
    /// Wrap an already computed digest. Fails if the length does not match the algorithm's output size.
    pub fn new(algorithm: DigestAlgorithm, bytes: impl Into<Vec<u8>>) -> Result<Self, GroupSigError> {
        let bytes = bytes.into();
        if bytes.len() != algorithm.output_size() {
            return Err(GroupSigError::InvalidDigestLength {
                expected: algorithm.output_size(),
                found: bytes.len(),
            });
        }
        Ok(Self { algorithm, bytes })
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Check that this digest was created by `expected` and has the right length
    pub fn check_algorithm(&self, expected: DigestAlgorithm) -> Result<(), GroupSigError> {
        if self.algorithm != expected {
            return Err(GroupSigError::DigestAlgorithmMismatch {
                expected,
                found: self.algorithm,
            });
        }
        if self.bytes.len() != expected.output_size() {
            return Err(GroupSigError::InvalidDigestLength {
                expected: expected.output_size(),
                found: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn challenge_contribution<W: Write>(
        &self,
        mut writer: W,
    ) -> Result<(), SerializationError> {
        self.algorithm.serialize_compressed(&mut writer)?;
        writer.write_all(&self.bytes)?;
        Ok(())
    }
}

impl AsRef<[u8]> for MessageDigest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}
