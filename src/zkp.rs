//! Disjunctive Σ-protocol (Fiat-Shamir OR-proof) that a Paillier
//! ciphertext encrypts 0 or 1 (component C).
//!
//! Statement: "I know `m ∈ {0,1}` and `r ∈ Z*_n` such that
//! `c ≡ (1+mn)·r^n (mod n^2)`." Soundness rests on the challenge
//! binding both `a0` and `a1` together with `n`, `g`, and `c` — any
//! implementation that hashes fewer inputs breaks the protocol
//! (spec.md §4.C).

use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::bigint;
use crate::error::ZkError;
use crate::paillier::PublicKey;

const DOMAIN: &str = "evoting-core/or-proof/v1";

/// The non-interactive OR-proof: commitments `a`, challenge split `e`,
/// and responses `z`, one component per branch (`0` then `1`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotProof {
    /// commitments mod n^2, one per branch
    #[serde(with = "crate::ser::int_pair")]
    pub a: (Integer, Integer),
    /// challenge scalars (integer, not modular, arithmetic)
    #[serde(with = "crate::ser::int_pair")]
    pub e: (Integer, Integer),
    /// responses mod n
    #[serde(with = "crate::ser::int_pair")]
    pub z: (Integer, Integer),
}

/// Randomness used by the prover, held only for the span of proof
/// construction. Zeroized on drop; never part of [`BallotProof`].
#[derive(Zeroize)]
struct ProverState {
    w: Integer,
}

/// Produce a proof that `c = pk.encrypt(vote, r)` encrypts `vote`
/// (0 or 1), given the same `r` used to encrypt.
pub fn prove(
    pk: &PublicKey,
    c: &Integer,
    vote: u8,
    r: &Integer,
    rng: &mut (impl CryptoRng + RngCore),
) -> Result<BallotProof, ZkError> {
    if vote > 1 {
        return Err(ZkError::InvalidVote);
    }
    let n = &pk.n;
    let ns = pk.n_squared();
    let g = pk.g();
    let real_branch = vote as usize;
    let fake_branch = 1 - real_branch;

    let mut e = [Integer::from(0), Integer::from(0)];
    let mut z = [Integer::from(0), Integer::from(0)];
    let mut a = [Integer::from(0), Integer::from(0)];

    // 1. Simulate the fake branch: pick e_fake, z_fake, reconstruct a_fake.
    e[fake_branch] = bigint::random_below(n, rng);
    z[fake_branch] = bigint::random_below(n, rng);
    let inv_c = bigint::mod_inverse(c, &ns).ok_or(ZkError::InvalidCiphertext)?;
    a[fake_branch] = if fake_branch == 0 {
        // statement: c = r^n, so a0 = z0^n * c^-e0
        let term = bigint::mod_pow(&inv_c, &e[fake_branch], &ns);
        bigint::mod_euc(&(bigint::mod_pow(&z[fake_branch], n, &ns) * term), &ns)
    } else {
        // statement: c/g = r^n, so a1 = z1^n * (c/g)^-e1 = z1^n * (c^-1 * g)^e1
        let inv_g = bigint::mod_inverse(&g, &ns).ok_or(ZkError::InvalidCiphertext)?;
        let val = bigint::mod_euc(&(&inv_c * &inv_g), &ns);
        let term = bigint::mod_pow(&val, &e[fake_branch], &ns);
        bigint::mod_euc(&(bigint::mod_pow(&z[fake_branch], n, &ns) * term), &ns)
    };

    // 2. Commit to the real branch.
    let state = ProverState {
        w: bigint::random_coprime(n, rng),
    };
    a[real_branch] = bigint::mod_pow(&state.w, n, &ns);

    // 3. Fiat-Shamir challenge over n, g, c, a0, a1.
    let total_e = bigint::hash_to_integer(DOMAIN, &[n, &g, c, &a[0], &a[1]]);

    // 4. Integer (non-modular) split: e_real = E - e_fake.
    e[real_branch] = Integer::from(&total_e - &e[fake_branch]);

    // 5. Real-branch response: z_real = w * r^e_real mod n.
    z[real_branch] = bigint::mod_euc(&(&state.w * bigint::mod_pow(r, &e[real_branch], n)), n);

    Ok(BallotProof {
        a: (a[0].clone(), a[1].clone()),
        e: (e[0].clone(), e[1].clone()),
        z: (z[0].clone(), z[1].clone()),
    })
}

/// Verify a [`BallotProof`] against ciphertext `c` under `pk`.
pub fn verify(pk: &PublicKey, c: &Integer, proof: &BallotProof) -> Result<(), ZkError> {
    pk.check_ciphertext(c)?;
    let n = &pk.n;
    let ns = pk.n_squared();
    let g = pk.g();

    let (a0, a1) = &proof.a;
    let (e0, e1) = &proof.e;
    let (z0, z1) = &proof.z;

    if *z0 < 0 || *z0 >= *n || *z1 < 0 || *z1 >= *n {
        return Err(ZkError::ComponentOutOfRange);
    }
    if *a0 < 0 || *a0 >= ns || *a1 < 0 || *a1 >= ns {
        return Err(ZkError::ComponentOutOfRange);
    }

    let expected_total_e = bigint::hash_to_integer(DOMAIN, &[n, &g, c, a0, a1]);
    if Integer::from(e0 + e1) != expected_total_e {
        return Err(ZkError::InvalidProof);
    }

    // Branch 0: z0^n =? a0 * c^e0 (mod n^2)
    let lhs0 = bigint::mod_pow(z0, n, &ns);
    let rhs0 = bigint::mod_euc(&(a0 * bigint::mod_pow(c, e0, &ns)), &ns);
    if lhs0 != rhs0 {
        return Err(ZkError::InvalidProof);
    }

    // Branch 1: z1^n =? a1 * (c * g^-1)^e1 (mod n^2)
    let inv_g = bigint::mod_inverse(&g, &ns).ok_or(ZkError::InvalidCiphertext)?;
    let val = bigint::mod_euc(&(c * &inv_g), &ns);
    let lhs1 = bigint::mod_pow(z1, n, &ns);
    let rhs1 = bigint::mod_euc(&(a1 * bigint::mod_pow(&val, e1, &ns)), &ns);
    if lhs1 != rhs1 {
        return Err(ZkError::InvalidProof);
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::paillier;
    use rand::rngs::OsRng;

    fn small_keypair() -> (PublicKey, crate::paillier::PrivateKey) {
        paillier::generate(64, &mut OsRng)
    }

    #[test]
    fn honest_proof_verifies_for_both_bits() {
        let (pk, _sk) = small_keypair();
        let mut rng = OsRng;
        for vote in [0u8, 1u8] {
            let r = bigint::random_coprime(&pk.n, &mut rng);
            let c = pk.encrypt(vote, &r).unwrap();
            let proof = prove(&pk, &c, vote, &r, &mut rng).unwrap();
            assert!(verify(&pk, &c, &proof).is_ok());
        }
    }

    #[test]
    fn forged_vote_two_is_rejected() {
        let (pk, _sk) = small_keypair();
        let mut rng = OsRng;
        let r = bigint::random_coprime(&pk.n, &mut rng);
        let ns = pk.n_squared();
        let g = pk.g();
        // c = (1+n)^2 * r^n mod n^2, i.e. "encrypts 2"
        let g_squared = bigint::mod_euc(&(Integer::from(&g * &g)), &ns);
        let r_to_n = bigint::mod_pow(&r, &pk.n, &ns);
        let c = bigint::mod_euc(&(g_squared * r_to_n), &ns);
        // an honest-looking proof attempt claiming vote=0 with this r must fail
        let forged = prove(&pk, &c, 0, &r, &mut rng).unwrap();
        assert!(verify(&pk, &c, &forged).is_err());
    }

    #[test]
    fn tampered_ciphertext_is_rejected() {
        let (pk, _sk) = small_keypair();
        let mut rng = OsRng;
        let r = bigint::random_coprime(&pk.n, &mut rng);
        let c = pk.encrypt(0, &r).unwrap();
        let proof = prove(&pk, &c, 0, &r, &mut rng).unwrap();
        let tampered = Integer::from(&c + 1);
        assert!(verify(&pk, &tampered, &proof).is_err());
    }

    #[test]
    fn random_forgeries_never_verify() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha20Rng;

        let (pk, _sk) = small_keypair();
        let mut rng = ChaCha20Rng::seed_from_u64(0xF0783_u64);
        let ns = pk.n_squared();
        let mut accepted = 0;
        for _ in 0..1000 {
            let c = bigint::random_below(&ns, &mut rng);
            if c == 0 {
                continue;
            }
            let a = (
                bigint::random_below(&ns, &mut rng),
                bigint::random_below(&ns, &mut rng),
            );
            let e = (
                bigint::random_below(&pk.n, &mut rng),
                bigint::random_below(&pk.n, &mut rng),
            );
            let z = (
                bigint::random_below(&pk.n, &mut rng),
                bigint::random_below(&pk.n, &mut rng),
            );
            let proof = BallotProof { a, e, z };
            if verify(&pk, &c, &proof).is_ok() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 0);
    }
}
