//! Montgomery batch normalization of Jacobian points (spec §4.4, C5).
//!
//! Ported from `aztec_common/batch_normalize.hpp`: one field inversion is
//! amortized across the whole slice by first accumulating running products
//! of the `Z` coordinates, inverting once, then walking backwards to recover
//! each point's individual `Z^-1`.

use ark_bn254::{Fq, Fq2, G1Projective, G2Projective};
use ark_ff::{Field, Zero};

/// Normalizes every point in `points` to affine form in place (`z == 1`),
/// using a single field inversion regardless of slice length. A point at
/// infinity (`z == 0`) is left untouched; the caller never feeds the
/// ceremony's toxic-waste-derived points through this with `z == 0`, since a
/// legitimate SRS point is never the identity.
pub fn batch_normalize_g1(points: &mut [G1Projective]) {
    let mut accumulator = Fq::ONE;
    let mut partial_products = Vec::with_capacity(points.len());
    for point in points.iter() {
        partial_products.push(accumulator);
        if !point.z.is_zero() {
            accumulator *= point.z;
        }
    }
    let mut accumulator = accumulator.inverse().unwrap_or(Fq::ONE);

    for (point, partial) in points.iter_mut().zip(partial_products.iter()).rev() {
        if point.z.is_zero() {
            continue;
        }
        let z_inv = accumulator * partial;
        let zz_inv = z_inv.square();
        point.x *= zz_inv;
        point.y *= zz_inv * z_inv;
        accumulator *= point.z;
        point.z = Fq::ONE;
    }
}

/// `G2` counterpart of [`batch_normalize_g1`].
pub fn batch_normalize_g2(points: &mut [G2Projective]) {
    let mut accumulator = Fq2::ONE;
    let mut partial_products = Vec::with_capacity(points.len());
    for point in points.iter() {
        partial_products.push(accumulator);
        if !point.z.is_zero() {
            accumulator *= point.z;
        }
    }
    let mut accumulator = accumulator.inverse().unwrap_or(Fq2::ONE);

    for (point, partial) in points.iter_mut().zip(partial_products.iter()).rev() {
        if point.z.is_zero() {
            continue;
        }
        let z_inv = accumulator * partial;
        let zz_inv = z_inv.square();
        point.x *= zz_inv;
        point.y *= zz_inv * z_inv;
        accumulator *= point.z;
        point.z = Fq2::ONE;
    }
}
