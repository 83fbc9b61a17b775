//! Error kinds surfaced by the core, grouped by subsystem (§7).
//!
//! Every fallible public operation returns one of these narrow enums
//! rather than a single crate-wide error; callers that need the union
//! can rely on the `#[from]` conversions into [`EvotingError`].

use thiserror::Error;

/// Errors from ballot construction (component I) and ZK verification (component C).
#[derive(Debug, Error)]
pub enum ZkError {
    /// `v` passed to `create_ballot` was not 0 or 1.
    #[error("vote must be 0 or 1")]
    InvalidVote,
    /// A ciphertext component proof referenced was outside `[1, n^2)` or not coprime to `n`.
    #[error("ciphertext outside Z*_(n^2)")]
    InvalidCiphertext,
    /// Proof verification returned false.
    #[error("zero-knowledge proof failed to verify")]
    InvalidProof,
    /// A proof component was out of its declared range during parsing/verification.
    #[error("proof component out of range")]
    ComponentOutOfRange,
    /// The randomness source could not be used (propagated from the CSPRNG).
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
    /// A sealed private key's `p`/`q` fields did not parse as the expected
    /// decimal big integers.
    #[error("malformed private key: {0}")]
    MalformedPrivateKey(String),
}

/// Errors from the bulletin board (component G).
#[derive(Debug, Error)]
pub enum BoardError {
    /// The ballot's proof did not verify against its ciphertext; ledger unchanged.
    #[error("invalid proof: {0}")]
    InvalidProof(#[from] ZkError),
    /// `publish` was attempted while the caller-supplied poll state is CLOSED.
    #[error("poll is closed")]
    Closed,
    /// The requested ledger index does not exist.
    #[error("no entry at index {0}")]
    IndexOutOfRange(usize),
}

/// Errors from Shamir secret sharing (component D).
#[derive(Debug, Error)]
pub enum ShareError {
    /// Threshold exceeds the number of shares requested.
    #[error("threshold {threshold} exceeds share count {n_shares}")]
    ThresholdExceedsShares {
        /// requested threshold
        threshold: usize,
        /// requested share count
        n_shares: usize,
    },
    /// Threshold or share count was zero.
    #[error("threshold and share count must be at least 1")]
    DegenerateParameters,
    /// Fewer than the threshold of distinct shares were supplied.
    #[error("{supplied} shares supplied, need at least {required}")]
    InsufficientShares {
        /// shares actually supplied
        supplied: usize,
        /// threshold required
        required: usize,
    },
    /// Two supplied shares carried the same x-coordinate.
    #[error("duplicate share index {0}")]
    DuplicateIndex(u32),
}

/// Errors from the hybrid AEAD+SSS key seal (component E).
#[derive(Debug, Error)]
pub enum SealError {
    /// Reconstructing the symmetric key from shares failed.
    #[error("share reconstruction failed: {0}")]
    Share(#[from] ShareError),
    /// AEAD authentication failed: the sealed blob was tampered with, or the
    /// reconstructed key was wrong.
    #[error("sealed key blob failed authentication")]
    Tampered,
    /// The serialized payload inside the blob failed to deserialize.
    #[error("sealed payload was not valid: {0}")]
    MalformedPayload(String),
}

/// Errors from tallying (component H).
#[derive(Debug, Error)]
pub enum TallyError {
    /// Fewer than `t` valid shares were supplied.
    #[error("insufficient shares for reconstruction: {0}")]
    InsufficientShares(#[from] ShareError),
    /// The sealed private key blob failed to reconstruct.
    #[error("sealed key could not be recovered: {0}")]
    SealedKeyTampered(#[from] SealError),
    /// Decrypted sum exceeded the number of ballots cast: an invalid ballot
    /// slipped past verification somewhere upstream. A hard integrity fault.
    #[error("decrypted tally {decrypted} exceeds ballot count {total}")]
    CorruptTally {
        /// the value decrypt() returned
        decrypted: u64,
        /// the number of ballots on the ledger
        total: u64,
    },
    /// There were no ballots to tally.
    #[error("ledger is empty")]
    EmptyLedger,
}

/// Errors from the election-parameter ceremony (component L).
#[derive(Debug, Error)]
pub enum CeremonyError {
    /// Propagated share-splitting error.
    #[error(transparent)]
    Share(#[from] ShareError),
    /// The randomness source could not be used during keygen.
    #[error("randomness source unavailable: {0}")]
    RandomnessUnavailable(String),
}

/// Errors from `ElectionConfig::validate`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Threshold exceeds share count.
    #[error("threshold {threshold} exceeds share count {num_shares}")]
    ThresholdExceedsShares {
        /// configured threshold
        threshold: usize,
        /// configured share count
        num_shares: usize,
    },
    /// Threshold was zero.
    #[error("threshold must be at least 1")]
    ZeroThreshold,
    /// Key bit length was too small to be meaningful.
    #[error("key_bits must be at least {min}, got {got}")]
    KeyTooSmall {
        /// minimum accepted bit length
        min: usize,
        /// configured bit length
        got: usize,
    },
}

/// Umbrella error for callers that don't want to match on subsystem.
#[derive(Debug, Error)]
pub enum EvotingError {
    /// see [`ZkError`]
    #[error(transparent)]
    Zk(#[from] ZkError),
    /// see [`BoardError`]
    #[error(transparent)]
    Board(#[from] BoardError),
    /// see [`ShareError`]
    #[error(transparent)]
    Share(#[from] ShareError),
    /// see [`SealError`]
    #[error(transparent)]
    Seal(#[from] SealError),
    /// see [`TallyError`]
    #[error(transparent)]
    Tally(#[from] TallyError),
    /// see [`CeremonyError`]
    #[error(transparent)]
    Ceremony(#[from] CeremonyError),
    /// see [`ConfigError`]
    #[error(transparent)]
    Config(#[from] ConfigError),
}
