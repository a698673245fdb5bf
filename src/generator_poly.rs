//! Generator polynomial builder (spec §4.7, C9).
//!
//! Builds `G(X) = ∏_{k=0}^{n} (X − k)` by logarithmic-depth pairwise
//! polynomial multiplication, mirroring the divide-and-conquer structure of
//! `generator/compute_generator_polynomial.hpp`: `n+1` degree-1 factors are
//! padded to a power of two with constant-1 polynomials, then repeatedly
//! convolved pairwise until a single polynomial remains.

use ark_bn254::Fr;
use ark_ff::{One, Zero};

/// Textbook O(deg(a)·deg(b)) convolution of two dense, low-degree-first
/// coefficient lists.
fn convolve(a: &[Fr], b: &[Fr]) -> Vec<Fr> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Fr::zero(); a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        if ai.is_zero() {
            continue;
        }
        for (j, bj) in b.iter().enumerate() {
            out[i + j] += *ai * bj;
        }
    }
    out
}

/// Strips trailing zero coefficients, leaving at least a single `[0]` if
/// every coefficient was zero.
fn condense(mut coeffs: Vec<Fr>) -> Vec<Fr> {
    while coeffs.len() > 1 && coeffs.last().is_some_and(Zero::is_zero) {
        coeffs.pop();
    }
    coeffs
}

/// Computes the coefficients (low-degree first) of `∏_{k=0}^{n} (X − k)`,
/// degree `n+1`.
pub fn build_generator_polynomial(n: u64) -> Vec<Fr> {
    let factor_count = (n + 1) as usize;
    let mut factors: Vec<Vec<Fr>> = (0..factor_count)
        .map(|k| vec![-Fr::from(k as u64), Fr::one()])
        .collect();

    let padded_len = factor_count.next_power_of_two();
    factors.resize(padded_len, vec![Fr::one()]);

    while factors.len() > 1 {
        factors = factors
            .chunks(2)
            .map(|pair| match pair {
                [a, b] => convolve(a, b),
                [a] => a.clone(),
                _ => unreachable!(),
            })
            .collect();
    }

    condense(factors.into_iter().next().unwrap_or_else(|| vec![Fr::zero()]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(coeffs: &[Fr], x: Fr) -> Fr {
        let mut acc = Fr::zero();
        for c in coeffs.iter().rev() {
            acc = acc * x + c;
        }
        acc
    }

    #[test]
    fn roots_are_zero_to_n() {
        let n = 12;
        let g = build_generator_polynomial(n);
        assert_eq!(g.len() as u64, n + 2);
        for k in 0..=n {
            assert!(eval(&g, Fr::from(k)).is_zero());
        }
    }

    #[test]
    fn nonroot_is_nonzero() {
        let n = 6;
        let g = build_generator_polynomial(n);
        assert!(!eval(&g, Fr::from(n + 1)).is_zero());
    }

    #[test]
    fn leading_coefficient_is_one() {
        let g = build_generator_polynomial(9);
        assert_eq!(*g.last().unwrap(), Fr::one());
    }

    #[test]
    fn degree_zero_is_just_x() {
        let g = build_generator_polynomial(0);
        assert_eq!(g, vec![Fr::zero(), Fr::one()]);
    }

    #[test]
    fn matches_direct_convolution_for_small_n() {
        let g = build_generator_polynomial(3);
        let mut expected = vec![Fr::one()];
        for k in 0u64..=3 {
            expected = convolve(&expected, &[-Fr::from(k), Fr::one()]);
        }
        assert_eq!(g, expected);
    }
}
