//! BIP340-style tagged hashes used by BIP352.
//!
//! `hash_tag(x) = SHA256(SHA256(tag) || SHA256(tag) || x)`

use bitcoin::OutPoint;
use bitcoin::secp256k1::{constants::CURVE_ORDER, PublicKey};
use bitcoin_hashes::{sha256, Hash, HashEngine};

pub const BIP0352_INPUTS_TAG: &[u8] = b"BIP0352/Inputs";
pub const BIP0352_SHARED_SECRET_TAG: &[u8] = b"BIP0352/SharedSecret";
pub use sp_address::BIP0352_LABEL_TAG;

/// Length of a serialized outpoint, `txid || ser32le(vout)`.
pub const OUTPOINT_LENGTH: usize = 36;

/// Hash `payload` (given as consecutive chunks) under `tag`.
pub fn tagged_hash(tag: &[u8], payload: &[&[u8]]) -> [u8; 32] {
    let tag_hash = sha256::Hash::hash(tag);

    let mut engine = sha256::Hash::engine();
    engine.input(tag_hash.as_byte_array());
    engine.input(tag_hash.as_byte_array());
    for chunk in payload {
        engine.input(chunk);
    }

    sha256::Hash::from_engine(engine).to_byte_array()
}

/// `hash_BIP0352/Inputs(outpoint_L || ser33(A))`
pub fn inputs_hash(smallest_outpoint: &[u8; OUTPOINT_LENGTH], A_sum: &PublicKey) -> [u8; 32] {
    tagged_hash(
        BIP0352_INPUTS_TAG,
        &[smallest_outpoint.as_slice(), A_sum.serialize().as_slice()],
    )
}

/// `hash_BIP0352/SharedSecret(ser33(S) || ser32(k))`
pub fn shared_secret_hash(ecdh_shared_secret: &PublicKey, k: u32) -> [u8; 32] {
    tagged_hash(
        BIP0352_SHARED_SECRET_TAG,
        &[ecdh_shared_secret.serialize().as_slice(), k.to_be_bytes().as_slice()],
    )
}

/// Serialize an outpoint the way it appears on the wire.
pub fn serialize_outpoint(outpoint: &OutPoint) -> [u8; OUTPOINT_LENGTH] {
    let mut res = [0u8; OUTPOINT_LENGTH];
    res[..32].copy_from_slice(outpoint.txid.as_raw_hash().as_byte_array());
    res[32..].copy_from_slice(&outpoint.vout.to_le_bytes());
    res
}

/// Reduce a big-endian 256-bit integer modulo the curve order.
///
/// Any 256-bit value is below `2n`, so at most one subtraction is needed.
pub fn reduce_mod_n(bytes: [u8; 32]) -> [u8; 32] {
    if bytes < CURVE_ORDER {
        return bytes;
    }

    let mut res = [0u8; 32];
    let mut borrow = 0i16;
    for i in (0..32).rev() {
        let mut diff = bytes[i] as i16 - CURVE_ORDER[i] as i16 - borrow;
        borrow = if diff < 0 {
            diff += 256;
            1
        } else {
            0
        };
        res[i] = diff as u8;
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::{hashes::Hash as _, Txid};
    use std::str::FromStr;

    #[test]
    fn tagged_hash_chunks_are_concatenated() {
        let whole = tagged_hash(BIP0352_INPUTS_TAG, &[b"abcdef".as_slice()]);
        let split = tagged_hash(
            BIP0352_INPUTS_TAG,
            &[b"ab".as_slice(), b"".as_slice(), b"cdef".as_slice()],
        );

        assert_eq!(whole, split);
    }

    #[test]
    fn tags_separate_domains() {
        let data = [7u8; 37];
        let payload = [data.as_slice()];

        assert_ne!(
            tagged_hash(BIP0352_INPUTS_TAG, &payload),
            tagged_hash(BIP0352_SHARED_SECRET_TAG, &payload)
        );
    }

    #[test]
    fn tagged_hash_of_empty_payload() {
        // sha256(sha256("BIP0352/Inputs") || sha256("BIP0352/Inputs"))
        let tag = sha256::Hash::hash(BIP0352_INPUTS_TAG);
        let mut data = tag.to_byte_array().to_vec();
        data.extend_from_slice(tag.as_byte_array());

        assert_eq!(
            tagged_hash(BIP0352_INPUTS_TAG, &[]),
            sha256::Hash::hash(&data).to_byte_array()
        );
    }

    #[test]
    fn outpoint_serialization_uses_wire_order() {
        let txid =
            Txid::from_str("f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16")
                .unwrap();
        let ser = serialize_outpoint(&OutPoint { txid, vout: 256 });

        // txids are displayed byte-reversed
        assert_eq!(ser[0], 0x16);
        assert_eq!(ser[31], 0xf4);
        assert_eq!(&ser[32..], &[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(&ser[..32], txid.to_byte_array().as_slice());
    }

    #[test]
    fn reduce_below_order_is_identity() {
        let mut bytes = CURVE_ORDER;
        bytes[31] -= 1;

        assert_eq!(reduce_mod_n(bytes), bytes);
        assert_eq!(reduce_mod_n([0u8; 32]), [0u8; 32]);
    }

    #[test]
    fn reduce_at_and_above_order() {
        assert_eq!(reduce_mod_n(CURVE_ORDER), [0u8; 32]);

        // 2^256 - 1 - n = 0x14551231950b75fc4402da1732fc9bebe
        let reduced = reduce_mod_n([0xff; 32]);
        let mut expected = [0u8; 32];
        expected[15..].copy_from_slice(
            &hex::decode("014551231950b75fc4402da1732fc9bebe").unwrap(),
        );
        assert_eq!(reduced, expected);
    }
}
