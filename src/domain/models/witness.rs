//! Witness Parsing and Verification
//!
//! A Megachain block carries a binary witness blob holding the validator
//! signatures over its rid. Layout, all integers big-endian unsigned:
//!
//! ```text
//! offset 0:  u32 signature count
//! repeated:  u32 pubkey length | pubkey bytes | u32 signature length | signature bytes
//! ```
//!
//! Parsing and verification are pure functions of the witness bytes and the
//! rid; identical inputs always yield the identical outcome.

use secp256k1::ecdsa::Signature;
use secp256k1::{Message, PublicKey, Secp256k1};

use crate::domain::models::block::BLOCK_RID_LEN;

/// Compressed secp256k1 public key length
pub const WITNESS_PUB_KEY_LEN: usize = 33;

/// Compact ECDSA signature length
pub const WITNESS_SIGNATURE_LEN: usize = 64;

/// A single public key registered as a block witness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Witness {
    pub public_key: Vec<u8>,
}

/// One `(public key, signature)` pair parsed out of a witness blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntry {
    pub public_key: Vec<u8>,
    pub signature: Vec<u8>,
}

fn read_u32(buf: &[u8], offset: &mut usize) -> Option<u32> {
    let end = offset.checked_add(4)?;
    let bytes: [u8; 4] = buf.get(*offset..end)?.try_into().ok()?;
    *offset = end;
    Some(u32::from_be_bytes(bytes))
}

fn read_bytes<'a>(buf: &'a [u8], offset: &mut usize, len: usize) -> Option<&'a [u8]> {
    let end = offset.checked_add(len)?;
    let bytes = buf.get(*offset..end)?;
    *offset = end;
    Some(bytes)
}

/// Parse the signature entries out of a witness blob.
///
/// Returns `None` when any read would run past the end of the blob; a
/// truncated witness is a format failure, never a panic.
#[must_use]
pub fn parse_witness_entries(witness: &[u8]) -> Option<Vec<SignatureEntry>> {
    let mut offset = 0usize;
    let count = read_u32(witness, &mut offset)?;

    let mut entries = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        let pub_key_len = read_u32(witness, &mut offset)? as usize;
        let public_key = read_bytes(witness, &mut offset, pub_key_len)?.to_vec();

        let signature_len = read_u32(witness, &mut offset)? as usize;
        let signature = read_bytes(witness, &mut offset, signature_len)?.to_vec();

        entries.push(SignatureEntry {
            public_key,
            signature,
        });
    }

    Some(entries)
}

/// Verify a block's witness blob against its rid.
///
/// The rid is the signed digest itself; it is not re-hashed. Entries are
/// checked in parse order and the first failed verification makes the whole
/// witness invalid. Entries whose key or signature is not the expected fixed
/// size are skipped and the remaining entries still decide the outcome.
#[must_use]
pub fn verify_block_witness(rid: &[u8], witness: &[u8]) -> bool {
    if witness.is_empty() {
        tracing::debug!("Block has no witness data");
        return false;
    }

    if rid.len() != BLOCK_RID_LEN {
        tracing::debug!(rid_len = rid.len(), "Block rid must be 32 bytes");
        return false;
    }

    let Some(entries) = parse_witness_entries(witness) else {
        tracing::debug!("Witness blob is truncated or malformed");
        return false;
    };

    if entries.is_empty() {
        tracing::debug!("Witness carries no signatures");
        return false;
    }

    let mut digest = [0u8; BLOCK_RID_LEN];
    digest.copy_from_slice(rid);
    let message = Message::from_digest(digest);
    let secp = Secp256k1::verification_only();

    for entry in &entries {
        if entry.public_key.len() != WITNESS_PUB_KEY_LEN {
            tracing::debug!(
                pub_key_len = entry.public_key.len(),
                "Skipping witness entry with unexpected public key size"
            );
            continue;
        }
        if entry.signature.len() != WITNESS_SIGNATURE_LEN {
            tracing::debug!(
                signature_len = entry.signature.len(),
                "Skipping witness entry with unexpected signature size"
            );
            continue;
        }

        let Ok(public_key) = PublicKey::from_slice(&entry.public_key) else {
            return false;
        };
        let Ok(signature) = Signature::from_compact(&entry.signature) else {
            return false;
        };

        if secp.verify_ecdsa(&message, &signature, &public_key).is_err() {
            tracing::debug!("Invalid witness signature");
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use secp256k1::SecretKey;

    fn encode_witness(entries: &[(&[u8], &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
        for (pub_key, signature) in entries {
            out.extend_from_slice(&(pub_key.len() as u32).to_be_bytes());
            out.extend_from_slice(pub_key);
            out.extend_from_slice(&(signature.len() as u32).to_be_bytes());
            out.extend_from_slice(signature);
        }
        out
    }

    fn signed_entry(rid: &[u8; 32], seed: u8) -> (Vec<u8>, Vec<u8>) {
        let secp = Secp256k1::new();
        let secret = SecretKey::from_slice(&[seed; 32]).unwrap();
        let public_key = PublicKey::from_secret_key(&secp, &secret);
        let message = Message::from_digest(*rid);
        let signature = secp.sign_ecdsa(&message, &secret);
        (
            public_key.serialize().to_vec(),
            signature.serialize_compact().to_vec(),
        )
    }

    #[test]
    fn parses_a_single_entry() {
        let witness = encode_witness(&[(&[0x02; 33], &[0xab; 64])]);
        let entries = parse_witness_entries(&witness).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].public_key, vec![0x02; 33]);
        assert_eq!(entries[0].signature, vec![0xab; 64]);
    }

    #[test]
    fn truncated_blob_yields_none_at_every_cut() {
        let witness = encode_witness(&[(&[0x02; 33], &[0xab; 64])]);
        for cut in 0..witness.len() {
            assert!(
                parse_witness_entries(&witness[..cut]).is_none(),
                "cut at {cut} should fail"
            );
        }
    }

    #[test]
    fn declared_length_past_end_yields_none() {
        let mut witness = Vec::new();
        witness.extend_from_slice(&1u32.to_be_bytes());
        // Claims a 4 GiB public key; must not attempt the read.
        witness.extend_from_slice(&u32::MAX.to_be_bytes());
        assert!(parse_witness_entries(&witness).is_none());
    }

    #[test]
    fn empty_witness_is_invalid() {
        assert!(!verify_block_witness(&[0u8; 32], &[]));
    }

    #[test]
    fn zero_signature_count_is_invalid() {
        let witness = encode_witness(&[]);
        assert!(!verify_block_witness(&[0u8; 32], &witness));
    }

    #[test]
    fn wrong_rid_length_is_invalid() {
        let rid = [7u8; 32];
        let (pub_key, signature) = signed_entry(&rid, 0x11);
        let witness = encode_witness(&[(&pub_key, &signature)]);
        assert!(!verify_block_witness(&rid[..31], &witness));
        assert!(!verify_block_witness(&[7u8; 33], &witness));
    }

    #[test]
    fn valid_signature_over_rid_verifies() {
        let rid = [7u8; 32];
        let (pub_key, signature) = signed_entry(&rid, 0x11);
        let witness = encode_witness(&[(&pub_key, &signature)]);
        assert!(verify_block_witness(&rid, &witness));
    }

    #[test]
    fn every_single_bit_flip_in_signature_invalidates() {
        let rid = [7u8; 32];
        let (pub_key, signature) = signed_entry(&rid, 0x11);

        for byte in 0..signature.len() {
            let mut tampered = signature.clone();
            tampered[byte] ^= 0x01;
            let witness = encode_witness(&[(&pub_key, &tampered)]);
            assert!(
                !verify_block_witness(&rid, &witness),
                "flip in byte {byte} should invalidate"
            );
        }
    }

    #[test]
    fn multiple_valid_signers_verify() {
        let rid = [9u8; 32];
        let a = signed_entry(&rid, 0x21);
        let b = signed_entry(&rid, 0x22);
        let c = signed_entry(&rid, 0x23);
        let witness = encode_witness(&[(&a.0, &a.1), (&b.0, &b.1), (&c.0, &c.1)]);
        assert!(verify_block_witness(&rid, &witness));
    }

    #[test]
    fn one_bad_entry_invalidates_the_rest() {
        let rid = [9u8; 32];
        let good = signed_entry(&rid, 0x21);
        let other_rid = [1u8; 32];
        // Correctly sized but signed over the wrong digest.
        let bad = signed_entry(&other_rid, 0x22);
        let witness = encode_witness(&[(&good.0, &good.1), (&bad.0, &bad.1)]);
        assert!(!verify_block_witness(&rid, &witness));
    }

    #[test]
    fn mis_sized_entries_are_skipped_not_failed() {
        let rid = [5u8; 32];
        let good = signed_entry(&rid, 0x31);
        let witness = encode_witness(&[
            (&[0x02; 20], &[0xaa; 64]), // short key, skipped
            (&good.0, &[0xaa; 10]),     // short signature, skipped
            (&good.0, &good.1),
        ]);
        assert!(verify_block_witness(&rid, &witness));
    }

    #[test]
    fn verification_is_repeatable() {
        let rid = [7u8; 32];
        let (pub_key, signature) = signed_entry(&rid, 0x11);
        let witness = encode_witness(&[(&pub_key, &signature)]);
        let first = verify_block_witness(&rid, &witness);
        for _ in 0..10 {
            assert_eq!(verify_block_witness(&rid, &witness), first);
        }
    }
}
