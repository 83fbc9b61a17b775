//! Shamir secret sharing over a fixed large prime field (component D).
//!
//! Fixed prime `P = 2^2203 - 1`, a Mersenne prime comfortably larger
//! than any secret this crate shares (spec.md §4.D). This is the *only*
//! prime used anywhere in the tree: the ad hoc `token_hex(32) mod prime`
//! scheme in `original_source/backend/scripts/key_ceremony.py` is biased
//! (modulo reduction of a uniform 256-bit value is not uniform mod a
//! ~2203-bit prime) and is not reproduced here — see Design Notes.

use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::bigint;
use crate::error::ShareError;

/// `2^2203 - 1`.
pub fn prime() -> Integer {
    (Integer::from(1) << 2203u32) - 1
}

/// One share `(x, y)` of a split secret. `x` identifies the holder;
/// `y` is the polynomial evaluated at `x`, reduced mod [`prime`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Zeroize)]
pub struct Share {
    /// share holder identity, 1-indexed
    pub id: u32,
    /// `f(id) mod P`, as a decimal string on the wire
    #[serde(with = "crate::bigint_serde")]
    pub value: Integer,
}

/// Split `secret` into `n_shares` shares, any `threshold` of which
/// reconstruct it via Lagrange interpolation at `x = 0`.
pub fn split(
    secret: &Integer,
    threshold: usize,
    n_shares: usize,
    rng: &mut (impl CryptoRng + RngCore),
) -> Result<Vec<Share>, ShareError> {
    if threshold == 0 || n_shares == 0 {
        return Err(ShareError::DegenerateParameters);
    }
    if threshold > n_shares {
        return Err(ShareError::ThresholdExceedsShares {
            threshold,
            n_shares,
        });
    }
    let p = prime();
    let mut coeffs = Vec::with_capacity(threshold);
    coeffs.push(bigint::mod_euc(secret, &p));
    for _ in 1..threshold {
        coeffs.push(bigint::random_below(&p, rng));
    }

    Ok((1..=n_shares as u32)
        .map(|x| Share {
            id: x,
            value: eval_poly(&coeffs, &Integer::from(x), &p),
        })
        .collect())
}

/// Horner's method: evaluate `coeffs` (lowest degree first) at `x` mod `p`.
fn eval_poly(coeffs: &[Integer], x: &Integer, p: &Integer) -> Integer {
    let mut result = Integer::from(0);
    for coeff in coeffs.iter().rev() {
        result = bigint::mod_euc(&(result * x + coeff), p);
    }
    result
}

/// Reconstruct the secret from any `threshold`-or-more-sized slice of
/// shares using Lagrange interpolation at `x = 0`. Rejects duplicate
/// indices and too-few shares up front.
pub fn recover(shares: &[Share], threshold: usize) -> Result<Integer, ShareError> {
    if shares.len() < threshold {
        return Err(ShareError::InsufficientShares {
            supplied: shares.len(),
            required: threshold,
        });
    }
    let mut seen = std::collections::HashSet::new();
    for s in shares {
        if !seen.insert(s.id) {
            return Err(ShareError::DuplicateIndex(s.id));
        }
    }

    let p = prime();
    let mut sum = Integer::from(0);
    for (j, sj) in shares.iter().enumerate() {
        let xj = Integer::from(sj.id);
        let mut numerator = Integer::from(1);
        let mut denominator = Integer::from(1);
        for (m, sm) in shares.iter().enumerate() {
            if m == j {
                continue;
            }
            let xm = Integer::from(sm.id);
            numerator = bigint::mod_euc(&(numerator * Integer::from(-&xm)), &p);
            denominator = bigint::mod_euc(&(denominator * (Integer::from(&xj - &xm))), &p);
        }
        let inv_denominator = bigint::mod_inverse(&denominator, &p)
            .expect("denominator is nonzero mod P for distinct x-coordinates");
        let lagrange_coeff = bigint::mod_euc(&(numerator * inv_denominator), &p);
        let term = bigint::mod_euc(&(Integer::from(&sj.value) * lagrange_coeff), &p);
        sum = bigint::mod_euc(&(sum + term), &p);
    }
    Ok(sum)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn round_trip_with_exact_threshold() {
        let mut rng = OsRng;
        let secret = Integer::from(424242u64);
        let shares = split(&secret, 3, 5, &mut rng).unwrap();
        let recovered = recover(&shares[0..3], 3).unwrap();
        assert_eq!(recovered, secret);
    }

    #[test]
    fn round_trip_with_any_subset_of_exact_size() {
        let mut rng = OsRng;
        let secret = Integer::from(9_000_000_001u64);
        let shares = split(&secret, 3, 5, &mut rng).unwrap();
        let subset = vec![shares[0].clone(), shares[2].clone(), shares[4].clone()];
        assert_eq!(recover(&subset, 3).unwrap(), secret);
    }

    #[test]
    fn threshold_minus_one_shares_rejected() {
        let mut rng = OsRng;
        let secret = Integer::from(7u64);
        let shares = split(&secret, 3, 5, &mut rng).unwrap();
        let err = recover(&shares[0..2], 3).unwrap_err();
        assert!(matches!(err, ShareError::InsufficientShares { .. }));
    }

    #[test]
    fn duplicate_index_rejected() {
        let mut rng = OsRng;
        let secret = Integer::from(7u64);
        let shares = split(&secret, 2, 3, &mut rng).unwrap();
        let dup = vec![shares[0].clone(), shares[0].clone()];
        assert!(matches!(
            recover(&dup, 2),
            Err(ShareError::DuplicateIndex(_))
        ));
    }

    #[test]
    fn threshold_exceeding_shares_rejected_at_split() {
        let mut rng = OsRng;
        let secret = Integer::from(1u64);
        assert!(matches!(
            split(&secret, 4, 3, &mut rng),
            Err(ShareError::ThresholdExceedsShares { .. })
        ));
    }

    #[test]
    fn below_threshold_is_independent_of_secret() {
        // t=3: any 2 shares should not determine the secret. Complete the
        // missing third coordinate with 100 independently sampled random
        // values and check the recovered secrets spread out rather than
        // collapsing onto the true secret.
        let mut rng = OsRng;
        let secret = Integer::from(555u64);
        let shares = split(&secret, 3, 5, &mut rng).unwrap();
        let partial = &shares[0..2];
        let p = prime();

        let mut recovered_values = std::collections::HashSet::new();
        let mut matches_secret = 0;
        for _ in 0..100 {
            let forged = Share {
                id: 99,
                value: bigint::random_below(&p, &mut rng),
            };
            let mut attempt = partial.to_vec();
            attempt.push(forged);
            let recovered = recover(&attempt, 3).unwrap();
            if recovered == secret {
                matches_secret += 1;
            }
            recovered_values.insert(recovered);
        }

        assert!(
            recovered_values.len() > 50,
            "recovered secrets should spread across many distinct values, got {}",
            recovered_values.len()
        );
        assert!(
            matches_secret <= 1,
            "a random completion should essentially never recover the true secret, matched {matches_secret} times"
        );
    }
}
