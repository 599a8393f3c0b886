use ark_ec::AffineRepr;
use ark_ff::PrimeField;
use digest::Digest;

/// Hash bytes to a point on the curve in the prime order subgroup. This is vulnerable to timing attack and is only
/// used when input is public anyway like when generating setup parameters.
pub fn affine_group_elem_from_try_and_incr<G: AffineRepr, D: Digest>(bytes: &[u8]) -> G {
    let mut hash = D::digest(bytes);
    let mut j = 1u64;
    loop {
        if let Some(g) = G::from_random_bytes(&hash) {
            let g = g.clear_cofactor();
            if !g.is_zero() {
                return g;
            }
        }
        hash = D::digest(&concat_slices!(bytes, b"-attempt-", j.to_le_bytes()));
        j += 1;
    }
}

/// Hash bytes to a field element. This is vulnerable to timing attack and is only used when input
/// is public anyway like when generating the challenge
pub fn field_elem_from_try_and_incr<F: PrimeField, D: Digest>(bytes: &[u8]) -> F {
    let mut hash = D::digest(bytes);
    let mut j = 1u64;
    loop {
        if let Some(f) = F::from_random_bytes(&hash) {
            return f;
        }
        hash = D::digest(&concat_slices!(bytes, b"-attempt-", j.to_le_bytes()));
        j += 1;
    }
}

/// Fiat-Shamir challenge from the bytes of the transcript. Uses try-and-increment.
pub fn compute_random_oracle_challenge<F: PrimeField, D: Digest>(challenge_bytes: &[u8]) -> F {
    field_elem_from_try_and_incr::<F, D>(challenge_bytes)
}
