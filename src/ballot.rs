//! Ballot data model and factory (component I, spec.md §3).
//!
//! A ballot is immutable once constructed. The randomness `r` used to
//! encrypt the vote is held only for the span of `create_ballot` and is
//! zeroized before returning — only `ciphertext` and `proof` persist.

use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::bigint;
use crate::error::ZkError;
use crate::paillier::PublicKey;
use crate::zkp::{self, BallotProof};

/// An immutable, submitted ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// UUID v4 identifying this ballot
    pub ballot_id: Uuid,
    /// seconds since epoch; monotone per originating kiosk
    pub timestamp: f64,
    /// opaque kiosk identifier, not used for any authentication decision here
    pub kiosk_id: String,
    /// the Paillier ciphertext, decimal-string on the wire
    #[serde(with = "crate::bigint_serde")]
    pub ciphertext: Integer,
    /// fixed-point encoding exponent; pinned to 0 by this protocol
    pub exponent: u8,
    /// the OR-proof that `ciphertext` encrypts 0 or 1
    pub proof: BallotProof,
}

impl Ballot {
    /// Verify this ballot's invariants that aren't delegated to the ZKP
    /// verifier: the exponent is pinned to 0 (spec.md's Open Question —
    /// kept as a field for forward compatibility with fixed-point
    /// encodings, but checked here rather than trusted).
    pub fn check_exponent(&self) -> Result<(), ZkError> {
        if self.exponent != 0 {
            return Err(ZkError::InvalidCiphertext);
        }
        Ok(())
    }
}

/// Randomness held only for the span of ballot construction. Zeroized
/// on drop; never part of [`Ballot`].
#[derive(Zeroize)]
struct BallotRandomness {
    r: Integer,
}

/// Encrypt `vote` (0 or 1), prove it, and assemble a [`Ballot`].
///
/// Samples `r` until it is coprime to `n` (expected ~1 iteration), then
/// uses the *same* `r` for both the encryption and the proof, as the
/// statement requires.
pub fn create_ballot(
    pk: &PublicKey,
    vote: u8,
    kiosk_id: impl Into<String>,
    timestamp: f64,
    rng: &mut (impl CryptoRng + RngCore),
) -> Result<Ballot, ZkError> {
    if vote > 1 {
        return Err(ZkError::InvalidVote);
    }
    let randomness = BallotRandomness {
        r: bigint::random_coprime(&pk.n, rng),
    };
    let ciphertext = pk.encrypt(vote, &randomness.r)?;
    let proof = zkp::prove(pk, &ciphertext, vote, &randomness.r, rng)?;

    Ok(Ballot {
        ballot_id: Uuid::new_v4(),
        timestamp,
        kiosk_id: kiosk_id.into(),
        ciphertext,
        exponent: 0,
        proof,
    })
}

/// Canonical serialization used for hashing (Merkle leaves, hash-chain
/// links): JSON with sorted keys, UTF-8, no extraneous whitespace.
/// Routed through `serde_json::Value`, whose map type is a `BTreeMap`
/// by default, so keys come out sorted regardless of field declaration
/// order — any deviation here changes every hash downstream.
pub fn canonical_json<T: Serialize>(value: &T) -> Vec<u8> {
    let as_value = serde_json::to_value(value).expect("in-memory types are always serializable");
    serde_json::to_vec(&as_value).expect("serde_json::Value always serializes")
}
