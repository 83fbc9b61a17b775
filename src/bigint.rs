//! Multi-precision integer arithmetic wrapping [`rug::Integer`] (component A).
//!
//! Nothing here is protocol-specific; `paillier`, `zkp`, `shamir`, and
//! `merkle` all build on these few primitives instead of calling into
//! `rug` directly, so the backend can be swapped later.

use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use rug::integer::Order;

/// `base^exp mod modulus`.
pub fn mod_pow(base: &Integer, exp: &Integer, modulus: &Integer) -> Integer {
    base.clone()
        .pow_mod(exp, modulus)
        .expect("modulus must be nonzero")
}

/// Modular inverse of `value` mod `modulus`, or `None` if it doesn't exist.
pub fn mod_inverse(value: &Integer, modulus: &Integer) -> Option<Integer> {
    value.clone().invert(modulus).ok()
}

/// `value mod modulus`, always returning a non-negative result.
pub fn mod_euc(value: &Integer, modulus: &Integer) -> Integer {
    value.clone().rem_euc(modulus.clone())
}

/// Uniformly sample an integer in `[0, bound)` using an injected CSPRNG.
///
/// `rug` only exposes its own `rug::rand::RandState`, which isn't seeded
/// from a `rand_core` source directly; we bridge by drawing raw bytes from
/// `rng` and reducing them modulo `bound`. The bias this introduces is
/// negligible for the byte-widths used here (>= 128 bytes versus a
/// bound of a few hundred bytes at most).
pub fn random_below(bound: &Integer, rng: &mut (impl CryptoRng + RngCore)) -> Integer {
    assert!(*bound > 0, "bound must be positive");
    let byte_len = (bound.significant_bits() as usize).div_ceil(8) + 8;
    let mut buf = vec![0u8; byte_len];
    rng.fill_bytes(&mut buf);
    let raw = Integer::from_digits(&buf, Order::MsfBe);
    mod_euc(&raw, bound)
}

/// Uniformly sample an integer in `[1, bound)` that is coprime to `modulus`.
///
/// Mirrors `original_source/backend/src/voting.py`'s `r` sampling loop:
/// draw, check `gcd == 1`, retry. For an RSA-like modulus the expected
/// number of iterations is ~1.
pub fn random_coprime(modulus: &Integer, rng: &mut (impl CryptoRng + RngCore)) -> Integer {
    loop {
        let candidate = random_below(modulus, rng);
        if candidate == 0 {
            continue;
        }
        if candidate.clone().gcd(modulus) == 1 {
            return candidate;
        }
    }
}

/// Sample a random prime of exactly `bits` bits using an injected CSPRNG.
///
/// Draws candidates with the top and bottom bit forced to 1 (fixes the
/// bit length and ensures oddness) and retries until
/// [`Integer::is_probably_prime`] accepts it with 40 Miller-Rabin rounds,
/// the same round count `rug`'s own `Integer::random_prime` historically
/// documented as "beyond reasonable doubt" for cryptographic use.
pub fn random_prime(bits: u32, rng: &mut (impl CryptoRng + RngCore)) -> Integer {
    assert!(bits >= 2, "prime must be at least 2 bits wide");
    let bound = Integer::from(1) << bits;
    loop {
        let mut candidate = random_below(&bound, rng);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if !matches!(candidate.is_probably_prime(40), rug::integer::IsPrime::No) {
            return candidate;
        }
    }
}

/// Hash a domain tag together with a sequence of big integers into a
/// single integer challenge, as required by the Fiat-Shamir step in
/// component C. No modular reduction is applied to the result: the
/// protocol relies on integer (non-modular) challenge-splitting.
pub fn hash_to_integer(domain: &str, nums: &[&Integer]) -> Integer {
    use sha2::Digest;
    let mut hasher = sha2::Sha256::new();
    hasher.update(domain.as_bytes());
    for n in nums {
        hasher.update(b"|");
        hasher.update(n.to_string().as_bytes());
    }
    let digest = hasher.finalize();
    Integer::from_digits(&digest, Order::MsfBe)
}
