//! Keys and setup parameters
//!
//! The group manager generates
//! - issuing key `gamma`, used to give members their certificates
//! - opening key `(xi1, xi2)`, used to trace signatures
//! - public key `(g1, g2, h, u, v, w)` with `u * xi1 = v * xi2 = h` and `w = g2 * gamma`, and the digest algorithm that
//!   every signer and verifier of the group must use.
//!
//! The issuing and opening keys are sampled independently so that the two roles can be split between different
//! parties.

use crate::{
    entropy::random_scalar,
    error::GroupSigError,
    hashing_utils::affine_group_elem_from_try_and_incr,
    message::{DigestAlgorithm, MessageDigest},
    serde_utils::{from_canonical_bytes, to_canonical_bytes, ArkObjectBytes},
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_ff::{Field, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError, Valid};
use ark_std::{
    end_timer,
    io::Write,
    rand::{CryptoRng, RngCore},
    start_timer,
    vec::Vec,
};
use blake2::Blake2b512;
use digest::Digest;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Label hashed to get the generators when no label is given
pub const DEFAULT_LABEL: &[u8] = b"BBS04-GROUP-SIG-SETUP-PARAMS";

/// Generators of G1 and G2
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct GroupSetupParams<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
}

/// Secret `gamma` of the group manager used to issue member certificates
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct IssuingKey<F: PrimeField>(#[serde_as(as = "ArkObjectBytes")] pub F);

/// Secret `(xi1, xi2)` of the group manager used to open signatures. Must never reach members or verifiers.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Serialize,
    Deserialize,
    Zeroize,
    ZeroizeOnDrop,
)]
pub struct OpeningKey<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub xi1: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub xi2: F,
}

/// Public key of the group, needed by signers and verifiers
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct GroupPublicKey<E: Pairing> {
    pub params: GroupSetupParams<E>,
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G1Affine,
    /// `h * 1/xi1`
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G1Affine,
    /// `h * 1/xi2`
    #[serde_as(as = "ArkObjectBytes")]
    pub v: E::G1Affine,
    /// `g2 * gamma`
    #[serde_as(as = "ArkObjectBytes")]
    pub w: E::G2Affine,
    pub digest_algorithm: DigestAlgorithm,
}

/// `GroupPublicKey` with pre-computation done for signing and verification to be more efficient
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct PreparedGroupPublicKey<E: Pairing> {
    pub public: GroupPublicKey<E>,
    pub g2_prepared: E::G2Prepared,
    pub w_prepared: E::G2Prepared,
    /// pairing e(g1, g2)
    pub g1g2: PairingOutput<E>,
}

/// Everything the group manager holds
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct GroupKey<E: Pairing> {
    pub public: GroupPublicKey<E>,
    pub issuing_key: IssuingKey<E::ScalarField>,
    pub opening_key: OpeningKey<E::ScalarField>,
}

impl<E: Pairing> GroupSetupParams<E> {
    /// Generate by hashing a public label so that nobody knows the discrete log relation between the generators
    pub fn new<D: Digest>(label: &[u8]) -> Self {
        let g1 =
            affine_group_elem_from_try_and_incr::<E::G1Affine, D>(&concat_slices!(label, b" : g1"));
        let g2 =
            affine_group_elem_from_try_and_incr::<E::G2Affine, D>(&concat_slices!(label, b" : g2"));
        Self { g1, g2 }
    }

    pub fn generate_using_rng<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, GroupSigError> {
        let g1 = E::G1Affine::generator() * random_scalar::<E::ScalarField, R>(rng)?;
        let g2 = E::G2Affine::generator() * random_scalar::<E::ScalarField, R>(rng)?;
        Ok(Self {
            g1: g1.into_affine(),
            g2: g2.into_affine(),
        })
    }

    pub fn is_valid(&self) -> bool {
        !(self.g1.is_zero() || self.g2.is_zero())
    }
}

impl<E: Pairing> Default for GroupSetupParams<E> {
    fn default() -> Self {
        Self::new::<Blake2b512>(DEFAULT_LABEL)
    }
}

impl<F: PrimeField> AsRef<F> for IssuingKey<F> {
    fn as_ref(&self) -> &F {
        &self.0
    }
}

impl<E: Pairing> GroupPublicKey<E> {
    /// None of the elements should be 0
    pub fn is_valid(&self) -> bool {
        self.params.is_valid()
            && !(self.h.is_zero() || self.u.is_zero() || self.v.is_zero() || self.w.is_zero())
    }

    /// Checks that all elements are in the correct subgroup and non-zero and does the pairing pre-computation.
    /// A public key received from elsewhere must pass this before being used.
    pub fn prepare(&self) -> Result<PreparedGroupPublicKey<E>, GroupSigError> {
        if !self.is_valid() || self.check().is_err() {
            return Err(GroupSigError::MalformedInput);
        }
        Ok(PreparedGroupPublicKey {
            g2_prepared: E::G2Prepared::from(self.params.g2),
            w_prepared: E::G2Prepared::from(self.w),
            g1g2: E::pairing(self.params.g1, self.params.g2),
            public: self.clone(),
        })
    }

    /// Fails if the digest was not created with the digest algorithm of this group
    pub fn check_digest(&self, digest: &MessageDigest) -> Result<(), GroupSigError> {
        digest.check_algorithm(self.digest_algorithm)
    }

    /// Hash a message with the digest algorithm of this group
    pub fn digest(&self, message: &[u8]) -> MessageDigest {
        self.digest_algorithm.digest(message)
    }

    pub fn challenge_contribution<W: Write>(&self, writer: W) -> Result<(), SerializationError> {
        self.serialize_compressed(writer)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GroupSigError> {
        to_canonical_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let pk: Self = from_canonical_bytes(bytes)?;
        if !pk.is_valid() {
            return Err(GroupSigError::MalformedInput);
        }
        Ok(pk)
    }
}

impl<E: Pairing> AsRef<GroupPublicKey<E>> for PreparedGroupPublicKey<E> {
    fn as_ref(&self) -> &GroupPublicKey<E> {
        &self.public
    }
}

impl<E: Pairing> GroupKey<E> {
    /// Create a new group. `rng` must be a cryptographically secure source; a predictable source gives keys that
    /// anyone can recompute.
    pub fn generate<R: RngCore + CryptoRng>(
        rng: &mut R,
        params: GroupSetupParams<E>,
        digest_algorithm: DigestAlgorithm,
    ) -> Result<Self, GroupSigError> {
        if !params.is_valid() {
            return Err(GroupSigError::InvalidSetupParams);
        }
        let timer = start_timer!(|| "Group key generation");
        let mut h_exp = random_scalar::<E::ScalarField, R>(rng)?;
        let xi1 = random_scalar::<E::ScalarField, R>(rng)?;
        let xi2 = random_scalar::<E::ScalarField, R>(rng)?;
        let gamma = random_scalar::<E::ScalarField, R>(rng)?;

        let h = params.g1 * h_exp;
        h_exp.zeroize();
        // Scalars from `random_scalar` are non-zero so the inverses exist
        let xi1_inv = xi1.inverse().ok_or(GroupSigError::InvalidSetupParams)?;
        let xi2_inv = xi2.inverse().ok_or(GroupSigError::InvalidSetupParams)?;
        let g1_elems = E::G1::normalize_batch(&[h, h * xi1_inv, h * xi2_inv]);
        let w = (params.g2 * gamma).into_affine();
        let public = GroupPublicKey {
            params,
            h: g1_elems[0],
            u: g1_elems[1],
            v: g1_elems[2],
            w,
            digest_algorithm,
        };
        end_timer!(timer);
        Ok(Self {
            public,
            issuing_key: IssuingKey(gamma),
            opening_key: OpeningKey { xi1, xi2 },
        })
    }

    /// Create a new group with generators from [`DEFAULT_LABEL`] and SHA-256 message digests
    pub fn generate_default<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, GroupSigError> {
        Self::generate(rng, GroupSetupParams::default(), DigestAlgorithm::Sha256)
    }
}
