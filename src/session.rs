//! # Secure session establishment
//!
//! The handshake follows the `Noise_KK1_25519_AESGCM_SHA256` profile of the
//! chip. Host and chip exchange ephemeral X25519 keys, compute three shared
//! secrets binding the ephemerals to the long-term pairing keys, and chain
//! them through HKDF-SHA-256 into the two session keys:
//!
//! - `dh1 = X25519(EHPriv, ETPub)` seeds the chain,
//! - `dh2 = X25519(SHiPriv, ETPub)` proves the host pairing key,
//! - `dh3 = X25519(EHPriv, STPub)` proves the chip static key,
//! - the final step yields `K_cmd` and `K_res`.
//!
//! The chip confirms key agreement with a GCM tag over the running transcript
//! hash under `K_cmd`. Only after that tag verifies are the keys installed
//! and the nonce counters reset.
//!
//! ## Available Methods
//!
//! - [`session_start`](crate::Tropic01::session_start) - Run the handshake against a pairing-key slot
//! - [`session_abort`](crate::Tropic01::session_abort) - Drop the session on both sides

use aes_gcm::{AeadInPlace, Aes256Gcm, Key, KeyInit, Nonce, Tag};
use embedded_hal::digital::OutputPin;
use embedded_hal_async::spi::SpiBus;
use hkdf::Hkdf;
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use x25519_dalek::{X25519_BASEPOINT_BYTES, x25519};
use zeroize::Zeroizing;

pub use super::cmd::cmd_session::*;
use super::l3::SecureSession;
use super::{IntPin, Tropic01, Tropic01Error};

/// Domain separator of the handshake, hashed into the transcript and used as
/// the initial KDF chaining value
const PROTOCOL_NAME: &[u8; 29] = b"Noise_KK1_25519_AESGCM_SHA256";

/// One transcript step: `h = SHA-256(h ‖ field)`
fn hash_fold(h: &[u8; 32], field: &[u8]) -> [u8; 32] {
    Sha256::new().chain_update(h).chain_update(field).finalize().into()
}

/// One KDF step: extract with the chaining value, expand two 32-byte outputs
fn hkdf_two(
    ck: &[u8; 32],
    input: &[u8; 32],
) -> Result<(Zeroizing<[u8; 32]>, Zeroizing<[u8; 32]>), Tropic01Error> {
    let mut okm = Zeroizing::new([0u8; 64]);
    Hkdf::<Sha256>::new(Some(ck), input)
        .expand(&[], &mut okm[..])
        .map_err(|_| Tropic01Error::Crypto)?;
    let mut out1 = Zeroizing::new([0u8; 32]);
    let mut out2 = Zeroizing::new([0u8; 32]);
    out1.copy_from_slice(&okm[..32]);
    out2.copy_from_slice(&okm[32..]);
    Ok((out1, out2))
}

impl<O, SPI, I> Tropic01<O, SPI, I>
where
    O: OutputPin,
    SPI: SpiBus<u8>,
    I: IntPin,
{
    /// Establish a secure session against a pairing-key slot
    ///
    /// `stpub` is the chip static X25519 public key extracted from the device
    /// certificate, `shipriv`/`shipub` the host pairing keypair registered in
    /// `pkey_slot`. The ephemeral key is drawn from `rng` and wiped on every
    /// exit path. A session that was still open is superseded.
    pub async fn session_start<R>(
        &mut self,
        rng: &mut R,
        stpub: &[u8; 32],
        pkey_slot: PairingKeySlot,
        shipriv: &[u8; 32],
        shipub: &[u8; 32],
    ) -> Result<(), Tropic01Error>
    where
        R: RngCore + CryptoRng,
    {
        self.session = None;

        let mut ehpriv = Zeroizing::new([0u8; 32]);
        rng.fill_bytes(&mut ehpriv[..]);
        let ehpub = x25519(*ehpriv, X25519_BASEPOINT_BYTES);

        self.l2
            .set_request(HANDSHAKE_REQ_ID, &handshake_req(&ehpub, pkey_slot));
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != HANDSHAKE_RSP_LEN {
            return Err(Tropic01Error::RespLen);
        }
        let body = self.l2.body();
        let mut etpub = [0u8; 32];
        etpub.copy_from_slice(&body[..32]);
        let mut t_auth = [0u8; 16];
        t_auth.copy_from_slice(&body[32..48]);

        // Transcript hash over every field both sides observe, in wire order
        let name_hash: [u8; 32] = Sha256::digest(PROTOCOL_NAME).into();
        let mut h = hash_fold(&name_hash, shipub);
        h = hash_fold(&h, stpub);
        h = hash_fold(&h, &ehpub);
        h = hash_fold(&h, &[pkey_slot.index()]);
        h = hash_fold(&h, &etpub);

        // Triangle DH chained through the KDF
        let dh1 = Zeroizing::new(x25519(*ehpriv, etpub));
        let (ck, _) = hkdf_two(&name_hash, &dh1)?;
        let dh2 = Zeroizing::new(x25519(*shipriv, etpub));
        let (ck, _) = hkdf_two(&ck, &dh2)?;
        let dh3 = Zeroizing::new(x25519(*ehpriv, *stpub));
        let (k_cmd, k_res) = hkdf_two(&ck, &dh3)?;

        // Key confirmation: the chip tag authenticates the transcript under
        // K_cmd with a zero IV and no plaintext
        let enc = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&k_cmd[..]));
        enc.decrypt_in_place_detached(
            Nonce::from_slice(&[0u8; 12]),
            &h,
            &mut [],
            Tag::from_slice(&t_auth),
        )
        .map_err(|_| Tropic01Error::Handshake)?;

        let dec = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&k_res[..]));
        self.session = Some(SecureSession::new(enc, dec));
        Ok(())
    }

    /// Abort the secure session on both sides
    ///
    /// The host state is wiped first, then the chip is told: even when the
    /// request fails the local session is gone.
    pub async fn session_abort(&mut self) -> Result<(), Tropic01Error> {
        self.session = None;

        self.l2.set_request(ENCRYPTED_SESSION_ABT_REQ_ID, &[]);
        self.l2_send().await?;
        self.l2_receive().await?;
        if self.l2.rsp_len() != 0 {
            return Err(Tropic01Error::RespLen);
        }
        Ok(())
    }
}
