//! Homomorphic aggregation and threshold decryption (component H,
//! spec.md §4.H), plus the orchestration convenience that composes it
//! end to end the way `original_source/backend/src/tally.py`'s
//! `reveal_result_with_shares` does, but as a pure function over
//! caller-supplied data rather than reading files from disk.

use rug::Integer;
use zeroize::Zeroize;

use crate::board::LedgerEntry;
use crate::error::TallyError;
use crate::hybrid::{self, EncryptedKeyBlob};
use crate::paillier::{PrivateKey, PublicKey, SerializedPrivateKey};
use crate::shamir::Share;

/// Result of a successful tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TallyResult {
    /// count of 1-votes
    pub yes: u64,
    /// count of 0-votes
    pub no: u64,
    /// total ballots tallied
    pub total: u64,
}

/// Homomorphically sum every ballot's ciphertext on the ledger.
/// `None` if the ledger is empty.
pub fn aggregate(pk: &PublicKey, entries: &[LedgerEntry]) -> Option<Integer> {
    entries
        .iter()
        .map(|e| e.ballot.ciphertext.clone())
        .reduce(|acc, c| pk.homomorphic_add(&acc, &c))
}

/// Reconstruct the Paillier private key from a threshold of `shares`
/// and the sealed blob produced at keygen.
pub fn reconstruct_private_key(
    pk: &PublicKey,
    blob: &EncryptedKeyBlob,
    shares: &[Share],
    threshold: usize,
) -> Result<PrivateKey, TallyError> {
    let mut payload = hybrid::recover_and_open(blob, shares, threshold)?;
    let serialized: SerializedPrivateKey = serde_json::from_slice(&payload)
        .map_err(|e| TallyError::SealedKeyTampered(crate::error::SealError::MalformedPayload(e.to_string())))?;
    payload.zeroize();
    PrivateKey::from_serialized(&serialized, pk)
        .map_err(|_| TallyError::SealedKeyTampered(crate::error::SealError::Tampered))
}

/// Run the full tally: aggregate, reconstruct, decrypt, and report
/// `(yes, no, total)`. Zeroizes the reconstructed private key and
/// decrypted sum's scratch state before returning.
pub fn run_tally(
    entries: &[LedgerEntry],
    pk: &PublicKey,
    blob: &EncryptedKeyBlob,
    shares: &[Share],
    threshold: usize,
) -> Result<TallyResult, TallyError> {
    let total = entries.len() as u64;
    let encrypted_sum = aggregate(pk, entries).ok_or(TallyError::EmptyLedger)?;

    let private_key = reconstruct_private_key(pk, blob, shares, threshold)?;
    // The product of admitted ciphertexts (each already verified to lie
    // in Z*_(n^2) at publish time) is itself a unit mod n^2, so this
    // can only fail if the reconstructed key doesn't match `pk` at all —
    // which `reconstruct_private_key` already checked.
    let decrypted = private_key
        .decrypt(pk, &encrypted_sum)
        .expect("aggregate of admitted ciphertexts is always decryptable under the matching key");
    drop(private_key);

    let yes: u64 = decrypted
        .to_string()
        .parse()
        .expect("decrypted sum fits in u64 for any realistic ballot count");

    if yes > total {
        tracing::error!(decrypted = yes, total, "tally integrity fault");
        return Err(TallyError::CorruptTally {
            decrypted: yes,
            total,
        });
    }

    tracing::info!(yes, no = total - yes, total, "tally complete");
    Ok(TallyResult {
        yes,
        no: total - yes,
        total,
    })
}
