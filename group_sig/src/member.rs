//! Member credentials and their issuance.
//!
//! A member's credential is a secret `x` with certificate `A = g1 * 1/(gamma + x)`, a weak-BB signature on `x` under
//! the issuing key `gamma`. It is valid iff `e(A, w + g2 * x) = e(g1, g2)`. The member checks this before accepting the
//! credential so a faulty or malicious issuer is caught at issuance rather than at the first verification failure.

use crate::{
    entropy::random_scalar,
    error::GroupSigError,
    message::MessageDigest,
    open::Tag,
    serde_utils::{from_canonical_bytes, to_canonical_bytes, ArkObjectBytes},
    setup::{GroupKey, IssuingKey, PreparedGroupPublicKey},
    signature::Signature,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, Valid};
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret signing material of a group member. Decoding through serde or `CanonicalDeserialize` only checks that the
/// elements are well formed; a credential loaded that way must pass [`MemberCredential::verify`] before use.
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
#[serde(bound = "")]
pub struct MemberCredential<E: Pairing> {
    /// `x`
    #[serde_as(as = "ArkObjectBytes")]
    pub secret: E::ScalarField,
    /// `A = g1 * 1/(gamma + x)`. Known to the group manager and what opening recovers.
    #[zeroize(skip)]
    #[serde_as(as = "ArkObjectBytes")]
    pub certificate: E::G1Affine,
}

impl<F: PrimeField> IssuingKey<F> {
    /// Sample a fresh member secret and certify it. The result is checked against the group public key as the member
    /// would, so a mismatch between this key and the public key is reported as `IssuanceProtocolError`.
    pub fn issue<E: Pairing<ScalarField = F>, R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<MemberCredential<E>, GroupSigError> {
        let secret = random_scalar::<F, R>(rng)?;
        let certificate = self.certify::<E>(&secret, &group.public.params.g1)?;
        MemberCredential::new(secret, certificate, group)
    }

    /// `g1 * 1/(gamma + x)`
    pub fn certify<E: Pairing<ScalarField = F>>(
        &self,
        secret: &F,
        g1: &E::G1Affine,
    ) -> Result<E::G1Affine, GroupSigError> {
        let exp = (self.0 + secret)
            .inverse()
            .ok_or(GroupSigError::IssuanceProtocolError)?;
        Ok((*g1 * exp).into_affine())
    }
}

impl<E: Pairing> GroupKey<E> {
    /// Issue a credential to a new member
    pub fn issue_member<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
    ) -> Result<MemberCredential<E>, GroupSigError> {
        let group = self.public.prepare()?;
        self.issuing_key.issue(rng, &group)
    }
}

impl<E: Pairing> MemberCredential<E> {
    /// Accept a credential received from the issuer. Fails with `IssuanceProtocolError` if the certificate does not
    /// verify under the group public key.
    pub fn new(
        secret: E::ScalarField,
        certificate: E::G1Affine,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<Self, GroupSigError> {
        let cred = Self {
            secret,
            certificate,
        };
        cred.verify(group)?;
        Ok(cred)
    }

    /// Check `e(A, w + g2 * x) = e(g1, g2)`
    pub fn verify(&self, group: &PreparedGroupPublicKey<E>) -> Result<(), GroupSigError> {
        if self.secret.is_zero() || self.certificate.is_zero() || self.certificate.check().is_err()
        {
            debug!("member credential has a zero or out of subgroup component");
            return Err(GroupSigError::IssuanceProtocolError);
        }
        let pk = &group.public;
        let rhs = pk.params.g2 * self.secret + pk.w;
        if E::pairing(self.certificate, rhs) != group.g1g2 {
            debug!("member certificate does not verify under the group public key");
            return Err(GroupSigError::IssuanceProtocolError);
        }
        Ok(())
    }

    /// Identifier the group manager obtains when opening this member's signatures
    pub fn tag(&self) -> Result<Tag, GroupSigError> {
        Tag::from_certificate(&self.certificate)
    }

    /// Sign a message digest on behalf of the group
    pub fn sign<R: RngCore + CryptoRng>(
        &self,
        rng: &mut R,
        digest: &MessageDigest,
        group: &PreparedGroupPublicKey<E>,
    ) -> Result<Signature<E>, GroupSigError> {
        Signature::new(rng, digest, self, group)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, GroupSigError> {
        to_canonical_bytes(self)
    }

    /// Only decodes; use [`Self::verify`] to check the credential against a group
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GroupSigError> {
        let cred: Self = from_canonical_bytes(bytes)?;
        if cred.certificate.is_zero() {
            return Err(GroupSigError::MalformedInput);
        }
        Ok(cred)
    }
}
