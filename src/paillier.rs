//! Paillier-style additively-homomorphic keypair (component B).
//!
//! `g` is pinned to `n + 1`: the protocol never needs a general `g`, and
//! this simplification means the public key is fully determined by `n`
//! (spec.md §4.B). `PrivateKey` is `Zeroize`d on drop and is never
//! serialized directly — it is only ever handled inside the ceremony
//! (component L) and tally (component H) scopes, wrapped by the hybrid
//! seal (component E).

use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::bigint;
use crate::error::ZkError;

/// Public key: modulus `n` and the derived generator `g = n + 1`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// the composite modulus `n = p*q`, as a decimal string on the wire
    #[serde(with = "crate::bigint_serde")]
    pub n: Integer,
}

impl PublicKey {
    /// `n^2`.
    pub fn n_squared(&self) -> Integer {
        Integer::from(&self.n * &self.n)
    }

    /// `g = n + 1`.
    pub fn g(&self) -> Integer {
        Integer::from(&self.n + 1)
    }

    /// Encrypt a bit `m` under explicit randomness `r`.
    ///
    /// Precondition: `m` is 0 or 1, `r` is coprime to `n`. With `g = n+1`,
    /// `(1+n)^m = 1 + m*n mod n^2` for `m` in `{0,1}`, so
    /// `c = (1 + m*n) * r^n mod n^2`.
    pub fn encrypt(&self, m: u8, r: &Integer) -> Result<Integer, ZkError> {
        if m > 1 {
            return Err(ZkError::InvalidVote);
        }
        let ns = self.n_squared();
        let one_plus_mn = Integer::from(1) + Integer::from(m) * &self.n;
        let r_to_n = bigint::mod_pow(r, &self.n, &ns);
        Ok(bigint::mod_euc(&(one_plus_mn * r_to_n), &ns))
    }

    /// Homomorphic addition: `E(m1) * E(m2) mod n^2` decrypts to `m1 + m2 mod n`.
    pub fn homomorphic_add(&self, c1: &Integer, c2: &Integer) -> Integer {
        let ns = self.n_squared();
        bigint::mod_euc(&(c1 * c2), &ns)
    }

    /// Reject a ciphertext outside `[1, n^2)` or not coprime to `n`, per
    /// the ZKP's edge-case rules (spec.md §4.C).
    pub fn check_ciphertext(&self, c: &Integer) -> Result<(), ZkError> {
        let ns = self.n_squared();
        if *c < 1 || *c >= ns {
            return Err(ZkError::InvalidCiphertext);
        }
        if c.clone().gcd(&self.n) != 1 {
            return Err(ZkError::InvalidCiphertext);
        }
        Ok(())
    }
}

/// Private key: the two prime factors of `n`. Exists in memory only
/// during keygen and during tally reconstruction; zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    p: String,
    q: String,
}

/// Serializable form of [`PrivateKey`], used only inside the sealed blob
/// (component E) — never written to the ledger or logs.
#[derive(Serialize, Deserialize, Zeroize)]
pub struct SerializedPrivateKey {
    p: String,
    q: String,
}

impl PrivateKey {
    fn p(&self) -> Integer {
        self.p.parse().expect("PrivateKey invariant: p is decimal")
    }

    fn q(&self) -> Integer {
        self.q.parse().expect("PrivateKey invariant: q is decimal")
    }

    /// `lambda(n) = lcm(p-1, q-1)`, the Carmichael function of `n`.
    fn lambda(&self) -> Integer {
        let p1 = self.p() - 1;
        let q1 = self.q() - 1;
        p1.clone().lcm(&q1)
    }

    /// Paillier's L-function: `L(x) = (x - 1) / n`.
    fn l_function(x: &Integer, n: &Integer) -> Integer {
        Integer::from(x - 1) / n
    }

    /// Decrypt a ciphertext, returning the plaintext in `[0, n)`.
    pub fn decrypt(&self, pk: &PublicKey, c: &Integer) -> Result<Integer, ZkError> {
        pk.check_ciphertext(c)?;
        let ns = pk.n_squared();
        let lambda = self.lambda();
        let mu = bigint::mod_inverse(&lambda, &pk.n).expect("lambda invertible mod n by construction");
        let x = bigint::mod_pow(c, &lambda, &ns);
        let l = Self::l_function(&x, &pk.n);
        Ok(bigint::mod_euc(&(l * mu), &pk.n))
    }

    /// Serialize to the plaintext JSON form sealed inside the AEAD blob
    /// (component E). Never call this on data that will be persisted
    /// outside a sealed blob.
    pub fn to_serialized(&self) -> SerializedPrivateKey {
        SerializedPrivateKey {
            p: self.p.clone(),
            q: self.q.clone(),
        }
    }

    /// Rebuild from the sealed form, re-deriving `n` to check it matches
    /// the published public key.
    pub fn from_serialized(s: &SerializedPrivateKey, pk: &PublicKey) -> Result<Self, ZkError> {
        let p: Integer = s
            .p
            .parse()
            .map_err(|_| ZkError::MalformedPrivateKey("p is not a decimal integer".into()))?;
        let q: Integer = s
            .q
            .parse()
            .map_err(|_| ZkError::MalformedPrivateKey("q is not a decimal integer".into()))?;
        if Integer::from(&p * &q) != pk.n {
            return Err(ZkError::InvalidCiphertext);
        }
        Ok(PrivateKey {
            p: s.p.clone(),
            q: s.q.clone(),
        })
    }
}

/// Generate a Paillier keypair with an `n` of `bits` bits: two random
/// `bits/2`-bit primes `p != q`.
pub fn generate(bits: u32, rng: &mut (impl CryptoRng + RngCore)) -> (PublicKey, PrivateKey) {
    assert!(bits >= 16 && bits % 2 == 0, "bits must be even and at least 16");
    let half = bits / 2;
    let p = bigint::random_prime(half, rng);
    let q = loop {
        let candidate = bigint::random_prime(half, rng);
        if candidate != p {
            break candidate;
        }
    };
    let n = Integer::from(&p * &q);
    (
        PublicKey { n },
        PrivateKey {
            p: p.to_string(),
            q: q.to_string(),
        },
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::OsRng;

    fn small_keypair() -> (PublicKey, PrivateKey) {
        let mut rng = OsRng;
        generate(64, &mut rng)
    }

    #[test]
    fn encrypt_decrypt_round_trip_for_both_bits() {
        let (pk, sk) = small_keypair();
        let mut rng = OsRng;
        for m in [0u8, 1u8] {
            let r = bigint::random_coprime(&pk.n, &mut rng);
            let c = pk.encrypt(m, &r).unwrap();
            let decrypted = sk.decrypt(&pk, &c).unwrap();
            assert_eq!(decrypted, Integer::from(m));
        }
    }

    #[test]
    fn homomorphism_sums_bits() {
        let (pk, sk) = small_keypair();
        let mut rng = OsRng;
        let votes = [1u8, 1, 0, 1, 0];
        let mut acc: Option<Integer> = None;
        for v in votes {
            let r = bigint::random_coprime(&pk.n, &mut rng);
            let c = pk.encrypt(v, &r).unwrap();
            acc = Some(match acc {
                None => c,
                Some(prev) => pk.homomorphic_add(&prev, &c),
            });
        }
        let sum = sk.decrypt(&pk, &acc.unwrap()).unwrap();
        assert_eq!(sum, Integer::from(votes.iter().map(|&v| v as u32).sum::<u32>()));
    }

    #[test]
    fn invalid_vote_rejected() {
        let (pk, _sk) = small_keypair();
        let r = Integer::from(3);
        assert!(matches!(pk.encrypt(2, &r), Err(ZkError::InvalidVote)));
    }

    #[test]
    fn serialized_private_key_round_trips() {
        let (pk, sk) = small_keypair();
        let serialized = sk.to_serialized();
        let restored = PrivateKey::from_serialized(&serialized, &pk).unwrap();
        let mut rng = OsRng;
        let r = bigint::random_coprime(&pk.n, &mut rng);
        let c = pk.encrypt(1, &r).unwrap();
        assert_eq!(restored.decrypt(&pk, &c).unwrap(), Integer::from(1));
    }
}
