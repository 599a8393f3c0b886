#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! # Short group signatures with opening
//!
//! Implements the group signature scheme from section 5 of the paper [Short Group Signatures](https://eprint.iacr.org/2004/174)
//! by Boneh, Boyen and Shacham. Any member of a group can sign anonymously on behalf of the group, anyone can verify
//! the signature against the group's public key, and only the group manager holding the opening key can trace a
//! signature back to a per-member [`Tag`](open::Tag).
//!
//! 1. The group manager creates a [`GroupKey`](setup::GroupKey) consisting of the public key, an issuing key `gamma`
//!    and an opening key `(xi1, xi2)` such that `u * xi1 = v * xi2 = h`. The message digest algorithm is pinned in the
//!    public key.
//! 2. A member gets a [`MemberCredential`](member::MemberCredential) `(x, A)` where `A = g1 * 1/(gamma + x)`, i.e. a
//!    weak-BB signature on `x`.
//! 3. Signing creates a linear encryption `(T1, T2, T3)` of `A` and a Fiat-Shamir proof of knowledge of `x`, `A` and
//!    the encryption randomness. See [`signature`] for the details.
//! 4. Opening decrypts `A` from `(T1, T2, T3)` using `(xi1, xi2)` after verifying the signature.
//!
//! Usage:
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use ark_std::rand::{rngs::StdRng, SeedableRng};
//! use group_sig::{message::DigestAlgorithm, setup::GroupKey};
//!
//! let mut rng = StdRng::seed_from_u64(0u64);
//! let group = GroupKey::<Bls12_381>::generate_default(&mut rng).unwrap();
//! let prepared = group.public.prepare().unwrap();
//! let member = group.issue_member(&mut rng).unwrap();
//!
//! let digest = DigestAlgorithm::Sha256.digest(b"Age: 43");
//! let sig = member.sign(&mut rng, &digest, &prepared).unwrap();
//! assert!(sig.verify(&digest, &prepared));
//! assert_eq!(group.open(&digest, &sig).unwrap(), member.tag().unwrap());
//! ```
//!
//! All randomness comes from a caller supplied `RngCore + CryptoRng` and every draw is fallible. A source that fails
//! aborts the operation with [`GroupSigError::InsufficientEntropy`](error::GroupSigError::InsufficientEntropy).

#[macro_use]
mod macros;

pub mod entropy;
pub mod error;
pub mod hashing_utils;
pub mod member;
pub mod message;
pub mod open;
pub mod serde_utils;
pub mod setup;
pub mod signature;

pub use crate::{
    error::GroupSigError,
    member::MemberCredential,
    message::{DigestAlgorithm, MessageDigest},
    open::Tag,
    setup::{
        GroupKey, GroupPublicKey, GroupSetupParams, IssuingKey, OpeningKey, PreparedGroupPublicKey,
    },
    signature::{Signature, SignatureProtocol},
};
