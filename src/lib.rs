//! Cryptographic core of an end-to-end verifiable yes/no referendum.
//!
//! A voter's choice is encrypted under an additively-homomorphic
//! Paillier keypair, accompanied by a non-interactive zero-knowledge
//! proof that the ciphertext encrypts 0 or 1, and submitted to an
//! append-only, hash-chained, Merkle-indexed bulletin board. At close
//! of polls, a threshold of trustees reconstruct the decryption
//! capability and reveal the homomorphic sum of accepted ciphertexts.
//!
//! This crate is the cryptographic pipeline only: voter authentication,
//! HTTP delivery, persistent storage, and UI rendering are collaborator
//! concerns that call into the functions below.
//!
//! ## Example
//!
//! ```
//! use evoting_core::{ballot, board, ceremony, tally};
//! use rand::rngs::OsRng;
//!
//! let mut rng = OsRng;
//! let (pk, sealed_key, shares) = ceremony::run_keygen(512, 3, 5, &mut rng).unwrap();
//! let bb = board::BulletinBoard::new(pk.clone());
//!
//! for vote in [1u8, 1, 0, 1, 0] {
//!     let b = ballot::create_ballot(&pk, vote, "kiosk-1", 0.0, &mut rng).unwrap();
//!     bb.publish(b, board::PollState::Open).unwrap();
//! }
//!
//! let entries = bb.get_all_entries();
//! let chosen_shares = vec![shares[0].clone(), shares[2].clone(), shares[4].clone()];
//! let result = tally::run_tally(&entries, &pk, &sealed_key, &chosen_shares, 3).unwrap();
//! assert_eq!((result.yes, result.no, result.total), (3, 2, 5));
//! ```

pub mod ballot;
pub mod bigint;
mod bigint_serde;
pub mod board;
pub mod ceremony;
pub mod config;
pub mod error;
pub mod hybrid;
pub mod merkle;
pub mod paillier;
mod ser;
pub mod shamir;
pub mod tally;
pub mod zkp;

pub use ballot::{create_ballot, Ballot};
pub use board::{verify_merkle_proof, BulletinBoard, LedgerEntry, PollState};
pub use ceremony::run_keygen as keygen;
pub use error::EvotingError;
pub use merkle::Proof as MerkleProof;
pub use paillier::PublicKey;
pub use tally::{run_tally as tally, TallyResult};
