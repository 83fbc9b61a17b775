//! Election key ceremony (component L), composing keygen (B), the
//! hybrid seal (E), and SSS (D) into the single `keygen(bits)` entry
//! point of spec.md §6.
//!
//! Grounded on `original_source/backend/scripts/key_ceremony.py` /
//! `keygen.py`'s `generate_keypair`: the trustee-directory layout and
//! "simulated USB" distribution those scripts perform stay a
//! collaborator concern per spec.md's Non-goals; this module only does
//! the cryptographic part.

use rand_core::{CryptoRng, RngCore};

use crate::error::CeremonyError;
use crate::hybrid::{self, EncryptedKeyBlob};
use crate::paillier::{self, PublicKey};
use crate::shamir::Share;

/// Generate a Paillier keypair of `bits` bits, seal the private key
/// under a `threshold`-of-`n_shares` Shamir split, and return
/// `(PublicKey, EncryptedKeyBlob, Shares)` per spec.md §6's
/// `keygen(bits) -> (PublicKey, SealedPrivateKey, Shares[n])`.
pub fn run_keygen(
    bits: u32,
    threshold: usize,
    n_shares: usize,
    rng: &mut (impl CryptoRng + RngCore),
) -> Result<(PublicKey, EncryptedKeyBlob, Vec<Share>), CeremonyError> {
    tracing::info!(bits, threshold, n_shares, "starting key ceremony");
    let (pk, sk) = paillier::generate(bits, rng);

    let serialized = sk.to_serialized();
    let payload = serde_json::to_vec(&serialized).expect("private key struct always serializes");
    let (blob, shares) = hybrid::seal(&payload, threshold, n_shares, rng)?;

    tracing::info!(n_shares = shares.len(), "key ceremony complete, private key sealed");
    Ok((pk, blob, shares))
}
