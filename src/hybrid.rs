//! Hybrid split: AEAD-seal a serialized secret under a fresh symmetric
//! key, then Shamir-split the key (component E).
//!
//! SSS over a ~2203-bit field is expensive per byte; sharing only the
//! symmetric key lets the payload itself be arbitrarily large (spec.md
//! §4.E). Grounded on `chacha20poly1305`'s `AeadInPlace`/`KeyInit`
//! pattern as used in the pack (e.g. the ChaCha20Poly1305 note-sealing
//! code in the broader example corpus).

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand_core::{CryptoRng, RngCore};
use rug::Integer;
use rug::integer::Order;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{SealError, ShareError};
use crate::shamir::{self, Share};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 24;

/// An AEAD-sealed secret plus the nonce it was sealed with. Opaque to
/// holders of the shares; only reconstructible with a threshold of them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EncryptedKeyBlob {
    nonce: [u8; NONCE_LEN],
    ciphertext: Vec<u8>,
}

/// Generate a fresh symmetric key, AEAD-seal `payload` under it, and
/// Shamir-split the key into `n_shares` shares requiring `threshold` to
/// recover.
pub fn seal(
    payload: &[u8],
    threshold: usize,
    n_shares: usize,
    rng: &mut (impl CryptoRng + RngCore),
) -> Result<(EncryptedKeyBlob, Vec<Share>), ShareError> {
    let mut key_bytes = [0u8; KEY_LEN];
    rng.fill_bytes(&mut key_bytes);
    let mut nonce_bytes = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut nonce_bytes);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key_bytes));
    let ciphertext = cipher
        .encrypt(XNonce::from_slice(&nonce_bytes), payload)
        .expect("encryption under a freshly generated key cannot fail");

    let key_int = Integer::from_digits(&key_bytes, Order::MsfBe);
    let shares = shamir::split(&key_int, threshold, n_shares, rng)?;

    key_bytes.zeroize();
    Ok((
        EncryptedKeyBlob {
            nonce: nonce_bytes,
            ciphertext,
        },
        shares,
    ))
}

/// Reconstruct the symmetric key from `shares` and decrypt `blob`.
///
/// The reconstructed integer's byte width may be shorter than
/// [`KEY_LEN`] because of leading zero bytes in the original key; this
/// function always left-pads to [`KEY_LEN`] rather than re-deriving the
/// width from the integer's bit length (spec.md §4.E).
pub fn recover_and_open(
    blob: &EncryptedKeyBlob,
    shares: &[Share],
    threshold: usize,
) -> Result<Vec<u8>, SealError> {
    let key_int = shamir::recover(shares, threshold)?;
    let mut key_bytes = [0u8; KEY_LEN];
    let digits = key_int.to_digits::<u8>(Order::MsfBe);
    if digits.len() > KEY_LEN {
        return Err(SealError::MalformedPayload(
            "reconstructed key wider than expected key length".into(),
        ));
    }
    let pad = KEY_LEN - digits.len();
    key_bytes[pad..].copy_from_slice(&digits);

    let cipher = XChaCha20Poly1305::new(Key::from_slice(&key_bytes));
    let result = cipher
        .decrypt(XNonce::from_slice(&blob.nonce), blob.ciphertext.as_ref())
        .map_err(|_| SealError::Tampered);

    key_bytes.zeroize();
    result
}
