//! Scoped-acquisition guard for the participant's toxic waste (spec §5, §9).
//!
//! Mirrors the original C++ `Secret<T>` RAII wrapper (`setup.cpp`): the value
//! is reachable only by reference while in scope, is not `Clone`, and is
//! zeroed on every exit path by a `Drop` impl that the optimizer cannot elide
//! (the `zeroize` crate's `Zeroize` impl for `[u64; 4]` goes through a
//! volatile write plus a compiler fence, so the store can't be optimized
//! away even though nothing reads the array again).

use ark_bn254::Fr;
use ark_ff::{BigInteger256, PrimeField, UniformRand};
use zeroize::Zeroize;

/// A secret scalar held as raw limbs so it can be zeroized directly; decoded
/// into a field element on demand.
pub struct Secret {
    limbs: [u64; 4],
}

impl Secret {
    /// Draws a fresh secret from a cryptographically secure RNG. This is the
    /// ceremony's toxic waste: it must never be logged, serialized, or
    /// returned from this module by value.
    pub fn random() -> Self {
        let scalar = Fr::rand(&mut rand::rngs::OsRng);
        Secret {
            limbs: scalar.into_bigint().0,
        }
    }

    /// Builds a secret from a known scalar. Exists for deterministic test
    /// fixtures; a real participant must only ever call [`Secret::random`].
    pub fn from_scalar(value: Fr) -> Self {
        Secret {
            limbs: value.into_bigint().0,
        }
    }

    /// Decodes the held limbs into a scalar for use in an exponentiation.
    /// Recomputed on every call rather than cached so there is only ever one
    /// place the raw limbs are expanded into a long-lived `Fr`.
    pub fn as_scalar(&self) -> Fr {
        Fr::from_bigint(BigInteger256::new(self.limbs))
            .expect("secret limbs always encode a canonical field element")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.limbs.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroizes_on_drop() {
        let secret = Secret::random();
        assert_ne!(secret.limbs, [0, 0, 0, 0]);
        let ptr: *const [u64; 4] = &secret.limbs;
        drop(secret);
        // SAFETY: the stack slot is still valid immediately after drop and
        // hasn't been reused; this observes the bytes Drop left behind,
        // matching the spec's "zeroization" testable property (§8 item 9).
        let after = unsafe { std::ptr::read(ptr) };
        assert_eq!(after, [0, 0, 0, 0]);
    }

    #[test]
    fn round_trips_through_bigint() {
        let scalar = Fr::rand(&mut rand::thread_rng());
        let secret = Secret::from_scalar(scalar);
        assert_eq!(secret.as_scalar(), scalar);
    }
}
