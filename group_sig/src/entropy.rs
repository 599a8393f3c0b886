//! Fallible randomness. Every draw goes through `RngCore::try_fill_bytes` so that a failing source surfaces as
//! [`GroupSigError::InsufficientEntropy`] instead of a panic or silently weaker randomness.
//!
//! Blinding scalars used in signing are hedged: they are expanded with HKDF-SHA512 from fresh random bytes together
//! with the signer's secret, certificate and the message digest. Two signing calls never share blindings unless the
//! source repeats its output *and* the same credential signs the same digest, in which case the signatures are
//! identical and nothing leaks.

use crate::error::GroupSigError;
use ark_ff::PrimeField;
use ark_std::{
    rand::{CryptoRng, RngCore},
    vec::Vec,
};
use hkdf::Hkdf;
use sha2::Sha512;
use zeroize::Zeroize;

/// Number of random bytes reduced modulo the field order to get a scalar. Twice the field size keeps the bias
/// negligible.
pub const SCALAR_SAMPLE_BYTES: usize = 64;

/// A source returning zero scalars this many times in a row is treated as broken
pub const MAX_ZERO_DRAWS: usize = 8;

const BLINDING_SALT: &[u8] = b"BBS04-GROUP-SIG-BLINDING-V1";

/// Draw `dest.len()` bytes from the source
pub fn fill_bytes<R: RngCore + CryptoRng>(rng: &mut R, dest: &mut [u8]) -> Result<(), GroupSigError> {
    rng.try_fill_bytes(dest)
        .map_err(|_| GroupSigError::InsufficientEntropy)
}

/// Draw a uniformly random non-zero scalar
pub fn random_scalar<F: PrimeField, R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<F, GroupSigError> {
    let mut bytes = [0u8; SCALAR_SAMPLE_BYTES];
    for _ in 0..MAX_ZERO_DRAWS {
        fill_bytes(rng, &mut bytes)?;
        let f = F::from_le_bytes_mod_order(&bytes);
        bytes.zeroize();
        if !f.is_zero() {
            return Ok(f);
        }
    }
    Err(GroupSigError::InsufficientEntropy)
}

/// Derives blinding scalars from fresh randomness and secret material
pub struct HedgedBlindings {
    hkdf: Hkdf<Sha512>,
}

impl HedgedBlindings {
    /// Draws `SCALAR_SAMPLE_BYTES` fresh bytes and binds them to every slice in `bound`
    pub fn new<R: RngCore + CryptoRng>(rng: &mut R, bound: &[&[u8]]) -> Result<Self, GroupSigError> {
        let mut fresh = [0u8; SCALAR_SAMPLE_BYTES];
        fill_bytes(rng, &mut fresh)?;
        let mut ikm = Vec::with_capacity(
            SCALAR_SAMPLE_BYTES + bound.iter().map(|b| b.len() + 8).sum::<usize>(),
        );
        ikm.extend_from_slice(&fresh);
        for b in bound {
            // length prefix so that different splits of the same bytes give different keys
            ikm.extend_from_slice(&(b.len() as u64).to_le_bytes());
            ikm.extend_from_slice(b);
        }
        let hkdf = Hkdf::<Sha512>::new(Some(BLINDING_SALT), &ikm);
        fresh.zeroize();
        ikm.zeroize();
        Ok(Self { hkdf })
    }

    /// The `index`-th non-zero blinding scalar
    pub fn scalar<F: PrimeField>(&self, index: u8) -> Result<F, GroupSigError> {
        let mut okm = [0u8; SCALAR_SAMPLE_BYTES];
        for attempt in 0..MAX_ZERO_DRAWS as u8 {
            self.hkdf
                .expand(&[index, attempt], &mut okm)
                .map_err(|_| GroupSigError::InsufficientEntropy)?;
            let f = F::from_le_bytes_mod_order(&okm);
            okm.zeroize();
            if !f.is_zero() {
                return Ok(f);
            }
        }
        Err(GroupSigError::InsufficientEntropy)
    }
}
