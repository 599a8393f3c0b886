use crate::message::DigestAlgorithm;
use ark_serialize::SerializationError;

#[derive(Debug)]
pub enum GroupSigError {
    /// The randomness source could not supply the requested bytes. Fatal for the operation.
    InsufficientEntropy,
    /// The certificate handed to a member does not satisfy `e(A, w + g2*x) = e(g1, g2)` or `gamma + x` was 0.
    /// Retrying issuance with fresh randomness is safe.
    IssuanceProtocolError,
    /// Bytes or elements failed a structural, on-curve or subgroup check
    MalformedInput,
    /// Opening was attempted on a signature that does not verify
    OpenRefused,
    InvalidSetupParams,
    InvalidSignature,
    DigestAlgorithmMismatch {
        expected: DigestAlgorithm,
        found: DigestAlgorithm,
    },
    InvalidDigestLength {
        expected: usize,
        found: usize,
    },
    Serialization(SerializationError),
}

impl From<SerializationError> for GroupSigError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
