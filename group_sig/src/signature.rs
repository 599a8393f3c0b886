//! Group signature: a linear encryption of the member's certificate `A` under the opening key and a Fiat-Shamir proof
//! of knowledge of the encryption randomness and of a valid credential `(x, A)`.
//!
//! The signer picks `alpha, beta` and computes
//! - `T1 = u * alpha`
//! - `T2 = v * beta`
//! - `T3 = A + h * (alpha + beta)`
//! - `delta1 = x * alpha`, `delta2 = x * beta`
//!
//! and proves knowledge of `(alpha, beta, x, delta1, delta2)` satisfying
//! - `u * alpha = T1`
//! - `v * beta = T2`
//! - `T1 * x - u * delta1 = 0`
//! - `T2 * x - v * delta2 = 0`
//! - `e(T3, g2) * x - e(h, w) * (alpha + beta) - e(h, g2) * (delta1 + delta2) = e(g1, g2) - e(T3, w)`
//!
//! With blindings `r_alpha, r_beta, r_x, r_delta1, r_delta2` the commitments are
//! - `R1 = u * r_alpha`
//! - `R2 = v * r_beta`
//! - `R3 = e(T3 * r_x - h * (r_delta1 + r_delta2), g2) + e(-h * (r_alpha + r_beta), w)`
//! - `R4 = T1 * r_x - u * r_delta1`
//! - `R5 = T2 * r_x - v * r_delta2`
//!
//! The challenge `c` is the hash of the group public key, the message digest, `T1, T2, T3` and `R1..R5`, and the
//! responses are `s_k = r_k + c * k`. The signature is `(T1, T2, T3, c, s_alpha, s_beta, s_x, s_delta1, s_delta2)`.
//! The verifier recomputes the commitments from the responses and accepts iff the recomputed challenge equals `c`.

use crate::{
    entropy::HedgedBlindings,
    error::GroupSigError,
    hashing_utils::compute_random_oracle_challenge,
    member::MemberCredential,
    message::MessageDigest,
    serde_utils::{from_canonical_bytes, to_canonical_bytes, ArkObjectBytes},
    setup::{GroupPublicKey, PreparedGroupPublicKey},
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError, Valid};
use ark_std::{
    end_timer,
    io::Write,
    ops::Neg,
    rand::{CryptoRng, RngCore},
    start_timer,
    vec::Vec,
};
use blake2::Blake2b512;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Domain separator of the challenge hash
pub const CHALLENGE_LABEL: &[u8] = b"BBS04-GROUP-SIG-CHALLENGE-V1";

/// Signer's state after the commitment step
#[derive(Clone, PartialEq, Eq, Debug, Zeroize, ZeroizeOnDrop)]
pub struct SignatureProtocol<E: Pairing> {
    /// `u * alpha`
    #[zeroize(skip)]
    pub T1: E::G1Affine,
    /// `v * beta`
    #[zeroize(skip)]
    pub T2: E::G1Affine,
    /// `A + h * (alpha + beta)`
    #[zeroize(skip)]
    pub T3: E::G1Affine,
    #[zeroize(skip)]
    pub R1: E::G1Affine,
    #[zeroize(skip)]
    pub R2: E::G1Affine,
    #[zeroize(skip)]
    pub R3: PairingOutput<E>,
    #[zeroize(skip)]
    pub R4: E::G1Affine,
    #[zeroize(skip)]
    pub R5: E::G1Affine,
    alpha: E::ScalarField,
    beta: E::ScalarField,
    x: E::ScalarField,
    delta1: E::ScalarField,
    delta2: E::ScalarField,
    r_alpha: E::ScalarField,
    r_beta: E::ScalarField,
    r_x: E::ScalarField,
    r_delta1: E::ScalarField,
    r_delta2: E::ScalarField,
}

/// A group signature on a message digest
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct Signature<E: Pairing> {
    /// `u * alpha`
    #[serde_as(as = "ArkObjectBytes")]
    pub T1: E::G1Affine,
    /// `v * beta`
    #[serde_as(as = "ArkObjectBytes")]
    pub T2: E::G1Affine,
    /// `A + h * (alpha + beta)`
    #[serde_as(as = "ArkObjectBytes")]
    pub T3: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub challenge: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_alpha: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_beta: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_x: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta1: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta2: E::ScalarField,
}

impl<E: Pairing> SignatureProtocol<E> {
    /// Encrypt the certificate and commit to the blindings. The blindings are derived from fresh randomness bound to
    /// the credential and the digest.
    pub fn init<R: RngCore + CryptoRng>(
        rng: &mut R,
        digest: &MessageDigest,
        credential: &MemberCredential<E>,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<Self, GroupSigError> {
        let pk = &group.public;
        pk.check_digest(digest)?;

        let mut secret_bytes = to_canonical_bytes(&credential.secret)?;
        let certificate_bytes = to_canonical_bytes(&credential.certificate)?;
        let blindings = HedgedBlindings::new(
            rng,
            &[
                secret_bytes.as_slice(),
                certificate_bytes.as_slice(),
                digest.as_bytes(),
            ],
        );
        secret_bytes.zeroize();
        let blindings = blindings?;

        let alpha = blindings.scalar::<E::ScalarField>(0)?;
        let beta = blindings.scalar::<E::ScalarField>(1)?;
        let r_alpha = blindings.scalar::<E::ScalarField>(2)?;
        let r_beta = blindings.scalar::<E::ScalarField>(3)?;
        let r_x = blindings.scalar::<E::ScalarField>(4)?;
        let r_delta1 = blindings.scalar::<E::ScalarField>(5)?;
        let r_delta2 = blindings.scalar::<E::ScalarField>(6)?;

        let x = credential.secret;
        let delta1 = x * alpha;
        let delta2 = x * beta;

        let T1 = pk.u * alpha;
        let T2 = pk.v * beta;
        let T3 = credential.certificate + pk.h * (alpha + beta);
        let R1 = pk.u * r_alpha;
        let R2 = pk.v * r_beta;
        let R4 = T1 * r_x - pk.u * r_delta1;
        let R5 = T2 * r_x - pk.v * r_delta2;
        let R3 = E::multi_pairing(
            [
                E::G1Prepared::from(T3 * r_x - pk.h * (r_delta1 + r_delta2)),
                E::G1Prepared::from((pk.h * (r_alpha + r_beta)).neg()),
            ],
            [group.g2_prepared.clone(), group.w_prepared.clone()],
        );
        let affine = E::G1::normalize_batch(&[T1, T2, T3, R1, R2, R4, R5]);
        Ok(Self {
            T1: affine[0],
            T2: affine[1],
            T3: affine[2],
            R1: affine[3],
            R2: affine[4],
            R3,
            R4: affine[5],
            R5: affine[6],
            alpha,
            beta,
            x,
            delta1,
            delta2,
            r_alpha,
            r_beta,
            r_x,
            r_delta1,
            r_delta2,
        })
    }

    pub fn challenge_contribution<W: Write>(
        &self,
        digest: &MessageDigest,
        pk: &GroupPublicKey<E>,
        writer: W,
    ) -> Result<(), GroupSigError> {
        Self::compute_challenge_contribution(
            pk, digest, &self.T1, &self.T2, &self.T3, &self.R1, &self.R2, &self.R3, &self.R4,
            &self.R5, writer,
        )
    }

    pub fn gen_proof(self, challenge: &E::ScalarField) -> Signature<E> {
        Signature {
            T1: self.T1,
            T2: self.T2,
            T3: self.T3,
            challenge: *challenge,
            s_alpha: self.r_alpha + self.alpha * challenge,
            s_beta: self.r_beta + self.beta * challenge,
            s_x: self.r_x + self.x * challenge,
            s_delta1: self.r_delta1 + self.delta1 * challenge,
            s_delta2: self.r_delta2 + self.delta2 * challenge,
        }
    }

    pub fn compute_challenge_contribution<W: Write>(
        pk: &GroupPublicKey<E>,
        digest: &MessageDigest,
        T1: &E::G1Affine,
        T2: &E::G1Affine,
        T3: &E::G1Affine,
        R1: &E::G1Affine,
        R2: &E::G1Affine,
        R3: &PairingOutput<E>,
        R4: &E::G1Affine,
        R5: &E::G1Affine,
        mut writer: W,
    ) -> Result<(), GroupSigError> {
        writer
            .write_all(CHALLENGE_LABEL)
            .map_err(SerializationError::from)?;
        pk.challenge_contribution(&mut writer)?;
        digest.challenge_contribution(&mut writer)?;
        T1.serialize_compressed(&mut writer)?;
        T2.serialize_compressed(&mut writer)?;
        T3.serialize_compressed(&mut writer)?;
        R1.serialize_compressed(&mut writer)?;
        R2.serialize_compressed(&mut writer)?;
        R3.serialize_compressed(&mut writer)?;
        R4.serialize_compressed(&mut writer)?;
        R5.serialize_compressed(&mut writer)?;
        Ok(())
    }
}

impl<E: Pairing> Signature<E> {
    /// Sign `digest` with the member's credential
    pub fn new<R: RngCore + CryptoRng>(
        rng: &mut R,
        digest: &MessageDigest,
        credential: &MemberCredential<E>,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<Self, GroupSigError> {
        let timer = start_timer!(|| "Group signature generation");
        let protocol = SignatureProtocol::init(rng, digest, credential, group)?;
        let mut challenge_bytes = Vec::new();
        protocol.challenge_contribution(digest, &group.public, &mut challenge_bytes)?;
        let challenge =
            compute_random_oracle_challenge::<E::ScalarField, Blake2b512>(&challenge_bytes);
        let sig = protocol.gen_proof(&challenge);
        end_timer!(timer);
        Ok(sig)
    }

    /// Returns true iff the signature was produced by some member of the group on this digest
    pub fn verify(&self, digest: &MessageDigest, group: &PreparedGroupPublicKey<E>) -> bool {
        let timer = start_timer!(|| "Group signature verification");
        let result = self.verify_with_reason(digest, group);
        end_timer!(timer);
        match result {
            Ok(()) => true,
            Err(e) => {
                debug!(reason = ?e, "group signature rejected");
                false
            }
        }
    }

    /// Same as [`Self::verify`] but says why a signature was rejected
    pub fn verify_with_reason(
        &self,
        digest: &MessageDigest,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<(), GroupSigError> {
        let pk = &group.public;
        pk.check_digest(digest)?;
        self.check_elements()?;

        let c = self.challenge;
        let R1 = pk.u * self.s_alpha - self.T1 * c;
        let R2 = pk.v * self.s_beta - self.T2 * c;
        let R4 = self.T1 * self.s_x - pk.u * self.s_delta1;
        let R5 = self.T2 * self.s_x - pk.v * self.s_delta2;
        let R3 = E::multi_pairing(
            [
                E::G1Prepared::from(
                    self.T3 * self.s_x
                        - pk.h * (self.s_delta1 + self.s_delta2)
                        - pk.params.g1 * c,
                ),
                E::G1Prepared::from(self.T3 * c - pk.h * (self.s_alpha + self.s_beta)),
            ],
            [group.g2_prepared.clone(), group.w_prepared.clone()],
        );
        let affine = E::G1::normalize_batch(&[R1, R2, R4, R5]);

        let mut challenge_bytes = Vec::new();
        SignatureProtocol::<E>::compute_challenge_contribution(
            pk,
            digest,
            &self.T1,
            &self.T2,
            &self.T3,
            &affine[0],
            &affine[1],
            &R3,
            &affine[2],
            &affine[3],
            &mut challenge_bytes,
        )?;
        let challenge =
            compute_random_oracle_challenge::<E::ScalarField, Blake2b512>(&challenge_bytes);
        if challenge != self.challenge {
            return Err(GroupSigError::InvalidSignature);
        }
        Ok(())
    }

    /// `T1, T2, T3` must be non-zero and in the prime order subgroup
    pub fn check_elements(&self) -> Result<(), GroupSigError> {
        for T in [&self.T1, &self.T2, &self.T3] {
            if T.is_zero() || T.check().is_err() {
                return Err(GroupSigError::MalformedInput);
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GroupSigError> {
        to_canonical_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let sig: Self = from_canonical_bytes(bytes)?;
        sig.check_elements()?;
        Ok(sig)
    }
}

impl<E: Pairing> GroupPublicKey<E> {
    /// Prepares the public key on every call. Use [`Signature::verify`] with a [`PreparedGroupPublicKey`] when
    /// verifying many signatures.
    pub fn verify(&self, digest: &MessageDigest, signature: &Signature<E>) -> bool {
        match self.prepare() {
            Ok(group) => signature.verify(digest, &group),
            Err(e) => {
                debug!(reason = ?e, "group public key is malformed");
                false
            }
        }
    }

    /// Verify an encoded signature. Bytes that do not decode to a well-formed signature are rejected.
    pub fn verify_bytes(&self, digest: &MessageDigest, signature: &[u8]) -> bool {
        match Signature::<E>::from_bytes(signature) {
            Ok(sig) => self.verify(digest, &sig),
            Err(e) => {
                debug!(reason = ?e, "could not decode group signature");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entropy::tests::FailingRng,
        message::DigestAlgorithm,
        setup::{GroupKey, GroupSetupParams},
    };
    use ark_bls12_381::{Bls12_381, Fr, G1Affine};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };

    fn setup(rng: &mut StdRng) -> (GroupKey<Bls12_381>, PreparedGroupPublicKey<Bls12_381>) {
        let group = GroupKey::<Bls12_381>::generate_default(rng).unwrap();
        let prepared = group.public.prepare().unwrap();
        (group, prepared)
    }

    #[test]
    fn sign_and_verify() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let members = (0..3)
            .map(|_| group.issue_member(&mut rng).unwrap())
            .collect::<Vec<_>>();

        for (i, member) in members.iter().enumerate() {
            let digest = DigestAlgorithm::Sha256.digest(format!("message {}", i).as_bytes());
            let sig = member.sign(&mut rng, &digest, &prepared).unwrap();
            sig.verify_with_reason(&digest, &prepared).unwrap();
            assert!(sig.verify(&digest, &prepared));
            assert!(group.public.verify(&digest, &sig));
            assert!(group
                .public
                .verify_bytes(&digest, &sig.to_bytes().unwrap()));

            // Signing the same digest again gives an unlinkable signature
            let sig2 = member.sign(&mut rng, &digest, &prepared).unwrap();
            assert!(sig2.verify(&digest, &prepared));
            assert_ne!(sig.T1, sig2.T1);
            assert_ne!(sig.T3, sig2.T3);
            assert_ne!(sig.challenge, sig2.challenge);
        }
    }

    #[test]
    fn protocol_steps() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");

        let protocol = SignatureProtocol::init(&mut rng, &digest, &member, &prepared).unwrap();
        let mut chal_bytes_prover = vec![];
        protocol
            .challenge_contribution(&digest, &group.public, &mut chal_bytes_prover)
            .unwrap();
        let challenge = compute_random_oracle_challenge::<Fr, Blake2b512>(&chal_bytes_prover);
        let (R1, R2, R3, R4, R5) = (
            protocol.R1,
            protocol.R2,
            protocol.R3,
            protocol.R4,
            protocol.R5,
        );
        let sig = protocol.gen_proof(&challenge);
        assert!(sig.verify(&digest, &prepared));

        // The verifier's recomputed commitments are the prover's
        let pk = &group.public;
        let c = sig.challenge;
        assert_eq!((pk.u * sig.s_alpha - sig.T1 * c).into_affine(), R1);
        assert_eq!((pk.v * sig.s_beta - sig.T2 * c).into_affine(), R2);
        assert_eq!((sig.T1 * sig.s_x - pk.u * sig.s_delta1).into_affine(), R4);
        assert_eq!((sig.T2 * sig.s_x - pk.v * sig.s_delta2).into_affine(), R5);
        assert_eq!(
            Bls12_381::multi_pairing(
                [
                    sig.T3 * sig.s_x - pk.h * (sig.s_delta1 + sig.s_delta2) - pk.params.g1 * c,
                    sig.T3 * c - pk.h * (sig.s_alpha + sig.s_beta),
                ],
                [pk.params.g2, pk.w],
            ),
            R3
        );

        // A different challenge gives an invalid signature
        let protocol = SignatureProtocol::init(&mut rng, &digest, &member, &prepared).unwrap();
        let sig = protocol.gen_proof(&Fr::rand(&mut rng));
        assert!(matches!(
            sig.verify_with_reason(&digest, &prepared),
            Err(GroupSigError::InvalidSignature)
        ));
    }

    #[test]
    fn modified_digest_fails() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");
        let sig = member.sign(&mut rng, &digest, &prepared).unwrap();

        let mut bytes = digest.as_bytes().to_vec();
        bytes[0] ^= 0x02;
        let flipped = MessageDigest::new(DigestAlgorithm::Sha256, bytes.clone()).unwrap();
        assert!(!sig.verify(&flipped, &prepared));
        bytes[0] ^= 0x02;
        let restored = MessageDigest::new(DigestAlgorithm::Sha256, bytes).unwrap();
        assert!(sig.verify(&restored, &prepared));

        let other = DigestAlgorithm::Sha256.digest(b"Age: 44");
        assert!(!sig.verify(&other, &prepared));
    }

    #[test]
    fn tampered_signature_fails() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");
        let sig = member.sign(&mut rng, &digest, &prepared).unwrap();
        let bytes = sig.to_bytes().unwrap();
        assert_eq!(bytes.len(), 3 * 48 + 6 * 32);

        // Every byte, cycling through the bit positions
        for i in 0..bytes.len() {
            let bit = 1u8 << (i % 8);
            let mut tampered = bytes.clone();
            tampered[i] ^= bit;
            let accepted = match Signature::<Bls12_381>::from_bytes(&tampered) {
                Ok(t) => t.verify(&digest, &prepared),
                Err(_) => false,
            };
            assert!(!accepted, "flipping bit {} of byte {} was accepted", bit, i);
        }
        // Top bit of every byte, which hits the point flags and pushes scalars out of range
        for i in 0..bytes.len() {
            let mut tampered = bytes.clone();
            tampered[i] ^= 0x80;
            assert!(!group.public.verify_bytes(&digest, &tampered));
        }

        // Every bit of the digest
        for i in 0..digest.as_bytes().len() * 8 {
            let mut d = digest.as_bytes().to_vec();
            d[i / 8] ^= 1 << (i % 8);
            let d = MessageDigest::new(DigestAlgorithm::Sha256, d).unwrap();
            assert!(!sig.verify(&d, &prepared), "flipping digest bit {} was accepted", i);
        }

        // Swapping responses
        let mut swapped = sig.clone();
        swapped.s_alpha = sig.s_beta;
        swapped.s_beta = sig.s_alpha;
        assert!(!swapped.verify(&digest, &prepared));
        let mut swapped = sig.clone();
        swapped.T1 = sig.T2;
        swapped.T2 = sig.T1;
        assert!(!swapped.verify(&digest, &prepared));

        // Truncated and extended encodings
        assert!(!group.public.verify_bytes(&digest, &bytes[..bytes.len() - 1]));
        let mut longer = bytes.clone();
        longer.push(0);
        assert!(!group.public.verify_bytes(&digest, &longer));
        assert!(group.public.verify_bytes(&digest, &bytes));
    }

    #[test]
    fn identity_elements_rejected() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");
        let sig = member.sign(&mut rng, &digest, &prepared).unwrap();

        for i in 0..3 {
            let mut bad = sig.clone();
            match i {
                0 => bad.T1 = G1Affine::zero(),
                1 => bad.T2 = G1Affine::zero(),
                _ => bad.T3 = G1Affine::zero(),
            }
            assert!(matches!(
                bad.verify_with_reason(&digest, &prepared),
                Err(GroupSigError::MalformedInput)
            ));
            let mut bytes = vec![];
            bad.serialize_compressed(&mut bytes).unwrap();
            assert!(matches!(
                Signature::<Bls12_381>::from_bytes(&bytes),
                Err(GroupSigError::MalformedInput)
            ));
        }

        // All zero signature
        let zero = Signature::<Bls12_381> {
            T1: G1Affine::zero(),
            T2: G1Affine::zero(),
            T3: G1Affine::zero(),
            challenge: Fr::from(0u64),
            s_alpha: Fr::from(0u64),
            s_beta: Fr::from(0u64),
            s_x: Fr::from(0u64),
            s_delta1: Fr::from(0u64),
            s_delta2: Fr::from(0u64),
        };
        assert!(!zero.verify(&digest, &prepared));
    }

    #[test]
    fn other_group_fails() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let (other, other_prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let other_member = other.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");

        let sig = member.sign(&mut rng, &digest, &prepared).unwrap();
        assert!(sig.verify(&digest, &prepared));
        assert!(!sig.verify(&digest, &other_prepared));

        // A credential of another group signing against this group's key
        let sig = other_member.sign(&mut rng, &digest, &prepared).unwrap();
        assert!(!sig.verify(&digest, &prepared));

        // Different generators
        let params = GroupSetupParams::<Bls12_381>::new::<Blake2b512>(b"other-label");
        let relabelled = GroupKey::<Bls12_381>::generate(&mut rng, params, DigestAlgorithm::Sha256)
            .unwrap();
        let relabelled_prepared = relabelled.public.prepare().unwrap();
        let sig = member.sign(&mut rng, &digest, &prepared).unwrap();
        assert!(!sig.verify(&digest, &relabelled_prepared));
    }

    #[test]
    fn digest_algorithm_is_pinned() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let sha512 = DigestAlgorithm::Sha512.digest(b"Age: 43");
        assert!(matches!(
            member.sign(&mut rng, &sha512, &prepared),
            Err(GroupSigError::DigestAlgorithmMismatch {
                expected: DigestAlgorithm::Sha256,
                found: DigestAlgorithm::Sha512
            })
        ));

        let sha256 = DigestAlgorithm::Sha256.digest(b"Age: 43");
        let sig = member.sign(&mut rng, &sha256, &prepared).unwrap();
        assert!(!sig.verify(&sha512, &prepared));
        // Same bytes labelled with another algorithm of the same length
        let relabelled = MessageDigest::new(
            DigestAlgorithm::Sha512,
            [sha256.as_bytes(), sha256.as_bytes()].concat(),
        )
        .unwrap();
        assert!(!sig.verify(&relabelled, &prepared));

        // A group pinned to Blake2b512
        let blake_group = GroupKey::<Bls12_381>::generate(
            &mut rng,
            GroupSetupParams::default(),
            DigestAlgorithm::Blake2b512,
        )
        .unwrap();
        let blake_prepared = blake_group.public.prepare().unwrap();
        let blake_member = blake_group.issue_member(&mut rng).unwrap();
        let digest = blake_group.public.digest(b"Age: 43");
        let sig = blake_member.sign(&mut rng, &digest, &blake_prepared).unwrap();
        assert!(sig.verify(&digest, &blake_prepared));
        assert!(!sig.verify(&sha256, &blake_prepared));
    }

    #[test]
    fn signing_fails_without_entropy() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");
        assert!(matches!(
            member.sign(&mut FailingRng, &digest, &prepared),
            Err(GroupSigError::InsufficientEntropy)
        ));
    }

    #[test]
    fn serialization() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");
        let sig = member.sign(&mut rng, &digest, &prepared).unwrap();
        test_serialization!(Signature<Bls12_381>, sig);

        let bytes = sig.to_bytes().unwrap();
        assert_eq!(bytes, sig.to_bytes().unwrap());
        let decoded = Signature::<Bls12_381>::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, sig);
        assert!(decoded.verify(&digest, &prepared));
    }

    /// Compressed BLS12-381 G1 generator
    const G1_GENERATOR: [u8; 48] = [
        0x97, 0xf1, 0xd3, 0xa7, 0x31, 0x97, 0xd7, 0x94, 0x26, 0x95, 0x63, 0x8c,
        0x4f, 0xa9, 0xac, 0x0f, 0xc3, 0x68, 0x8c, 0x4f, 0x97, 0x74, 0xb9, 0x05,
        0xa1, 0x4e, 0x3a, 0x3f, 0x17, 0x1b, 0xac, 0x58, 0x6c, 0x55, 0xe8, 0x3f,
        0xf9, 0x7a, 0x1a, 0xef, 0xfb, 0x3a, 0xf0, 0x0a, 0xdb, 0x22, 0xc6, 0xbb,
    ];

    #[test]
    fn encoding_vectors() {
        let g = G1Affine::generator();
        assert_eq!(to_canonical_bytes(&g).unwrap(), G1_GENERATOR.to_vec());

        // Fields are encoded in declaration order, points compressed and scalars little endian
        let sig = Signature::<Bls12_381> {
            T1: g,
            T2: g,
            T3: g,
            challenge: Fr::from(1u64),
            s_alpha: Fr::from(2u64),
            s_beta: Fr::from(3u64),
            s_x: Fr::from(4u64),
            s_delta1: Fr::from(5u64),
            s_delta2: Fr::from(6u64),
        };
        let mut expected = vec![];
        for _ in 0..3 {
            expected.extend_from_slice(&G1_GENERATOR);
        }
        for k in 1u8..=6 {
            let mut scalar = [0u8; 32];
            scalar[0] = k;
            expected.extend_from_slice(&scalar);
        }
        let bytes = sig.to_bytes().unwrap();
        assert_eq!(bytes, expected);
        assert_eq!(Signature::<Bls12_381>::from_bytes(&bytes).unwrap(), sig);

        // Tag of the generator
        let tag = crate::open::Tag::from_certificate(&g).unwrap();
        assert_eq!(
            tag.to_string(),
            "c88550d981afa94d903a30be024546f8487b058372c8167381d2129c94e469dc6db1fde2ae5eb730148745bccfe8eb7cbe9d418a371b9448d59a305e6ba3514b"
        );
    }

    #[test]
    fn seeded_signing_is_reproducible() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (group, prepared) = setup(&mut rng);
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");

        let sign_with_seed = |seed: u64| {
            member
                .sign(&mut StdRng::seed_from_u64(seed), &digest, &prepared)
                .unwrap()
                .to_bytes()
                .unwrap()
        };
        let bytes = sign_with_seed(42);
        assert_eq!(bytes, sign_with_seed(42));
        assert_ne!(bytes, sign_with_seed(43));
        assert!(group.public.verify_bytes(&digest, &bytes));

        // Same randomness on another digest still gives unrelated blindings
        let other = DigestAlgorithm::Sha256.digest(b"Age: 44");
        let other_sig = member
            .sign(&mut StdRng::seed_from_u64(42), &other, &prepared)
            .unwrap();
        let sig = Signature::<Bls12_381>::from_bytes(&bytes).unwrap();
        assert_ne!(other_sig.T1, sig.T1);
        assert_ne!(other_sig.T3, sig.T3);
    }

    #[test]
    fn works_on_bn254() {
        use ark_bn254::Bn254;

        let mut rng = StdRng::seed_from_u64(0u64);
        let group = GroupKey::<Bn254>::generate_default(&mut rng).unwrap();
        let prepared = group.public.prepare().unwrap();
        let member = group.issue_member(&mut rng).unwrap();
        let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");
        let sig = member.sign(&mut rng, &digest, &prepared).unwrap();
        assert!(sig.verify(&digest, &prepared));
        assert!(!sig.verify(&DigestAlgorithm::Sha256.digest(b"Age: 42"), &prepared));
        assert_eq!(
            group.opening_key.open(&digest, &sig, &prepared).unwrap(),
            member.tag().unwrap()
        );
    }
}
