//! ECDH shared secrets between the sender and each distinct scan key.

use std::collections::HashMap;

use bitcoin::secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Signing, Verification};

use crate::error::{Error, Result};
use crate::protocol::utils::hash::{inputs_hash, reduce_mod_n, OUTPOINT_LENGTH};
use crate::recipient::Recipient;

/// Recipients sharing the scan key `scan_key`, in the order they were given.
#[derive(Debug)]
pub struct RecipientGroup<'a, R> {
    pub scan_key: PublicKey,
    pub recipients: Vec<&'a R>,
}

/// Group recipients by scan key.
///
/// Groups are ordered by the first occurrence of their scan key.
pub fn group_by_scan_key<R: Recipient>(recipients: &[R]) -> Vec<RecipientGroup<'_, R>> {
    let mut positions: HashMap<PublicKey, usize> = HashMap::new();
    let mut groups: Vec<RecipientGroup<'_, R>> = Vec::new();

    for recipient in recipients {
        let scan_key = recipient.scan_key();

        if let Some(&pos) = positions.get(&scan_key) {
            groups[pos].recipients.push(recipient);
        } else {
            positions.insert(scan_key, groups.len());
            groups.push(RecipientGroup {
                scan_key,
                recipients: vec![recipient],
            });
        }
    }

    groups
}

/// Compute `input_hash·a`, the part of the shared secret that is the same for every recipient.
///
/// `a_sum` is the sum of the input private keys and `smallest_outpoint` is `outpoint_L`.
pub fn calculate_partial_secret<C: Signing>(
    secp: &Secp256k1<C>,
    a_sum: &SecretKey,
    smallest_outpoint: &[u8; OUTPOINT_LENGTH],
) -> Result<SecretKey> {
    let A_sum = a_sum.public_key(secp);

    let input_hash = reduce_mod_n(inputs_hash(smallest_outpoint, &A_sum));
    let input_hash = Scalar::from_be_bytes(input_hash)
        .map_err(|_| Error::Secp256k1(bitcoin::secp256k1::Error::InvalidTweak))?;

    Ok(a_sum.mul_tweak(&input_hash)?)
}

/// `S = input_hash·a·B_scan`
pub fn calculate_ecdh_shared_secret<C: Verification>(
    secp: &Secp256k1<C>,
    B_scan: &PublicKey,
    partial_secret: &SecretKey,
) -> Result<PublicKey> {
    Ok(B_scan.mul_tweak(secp, &Scalar::from(*partial_secret))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::utils::hash::serialize_outpoint;
    use bitcoin::{OutPoint, Txid};
    use sp_address::{Network, SilentPaymentAddress};
    use std::str::FromStr;

    const SCAN_PK: &str = "0220bcfac5b99e04ad1a06ddfb016ee13582609d60b6291e98d01a9bc9a16c96d4";

    fn key(n: u8) -> SecretKey {
        let mut bytes = [0u8; 32];
        bytes[31] = n;
        SecretKey::from_slice(&bytes).unwrap()
    }

    fn address(scan: u8, spend: u8) -> SilentPaymentAddress {
        let secp = Secp256k1::new();
        SilentPaymentAddress::new(
            key(scan).public_key(&secp),
            key(spend).public_key(&secp),
            Network::Regtest,
            0,
        )
        .unwrap()
    }

    #[test]
    fn groups_keep_first_occurrence_order() {
        let recipients = vec![
            address(1, 10),
            address(2, 20),
            address(1, 11),
            address(3, 30),
            address(2, 21),
            address(1, 12),
        ];

        let groups = group_by_scan_key(&recipients);

        assert_eq!(groups.len(), 3);
        let secp = Secp256k1::new();
        assert_eq!(groups[0].scan_key, key(1).public_key(&secp));
        assert_eq!(groups[1].scan_key, key(2).public_key(&secp));
        assert_eq!(groups[2].scan_key, key(3).public_key(&secp));

        let members: Vec<Vec<&SilentPaymentAddress>> =
            groups.iter().map(|g| g.recipients.clone()).collect();
        assert_eq!(
            members,
            vec![
                vec![&recipients[0], &recipients[2], &recipients[5]],
                vec![&recipients[1], &recipients[4]],
                vec![&recipients[3]],
            ]
        );
    }

    #[test]
    fn no_recipients_no_groups() {
        let recipients: Vec<SilentPaymentAddress> = vec![];
        assert!(group_by_scan_key(&recipients).is_empty());
    }

    #[test]
    fn shared_secret_for_two_input_send() {
        let secp = Secp256k1::new();
        let a_sum =
            SecretKey::from_str("7ed265a6dac7aba8508a32d6d6b84c7f1dbd0a0941dd01088d69e8d556345f86")
                .unwrap();
        let outpoint = OutPoint {
            txid: Txid::from_str(
                "f4184fc596403b9d638783cf57adfe4c75c605f6356fbc91338530e9831e9e16",
            )
            .unwrap(),
            vout: 0,
        };

        let partial_secret =
            calculate_partial_secret(&secp, &a_sum, &serialize_outpoint(&outpoint)).unwrap();
        assert_eq!(
            partial_secret,
            SecretKey::from_str("17a380ffb85f8f84931584f2886a889c8678c9964ed2fe3ea11917454cc78fad")
                .unwrap()
        );

        let B_scan = PublicKey::from_str(SCAN_PK).unwrap();
        let shared_secret = calculate_ecdh_shared_secret(&secp, &B_scan, &partial_secret).unwrap();
        assert_eq!(
            shared_secret.to_string(),
            "028158aff7d61ea66b2fa7f555bc3c5937d1debbde16423d630f9aa7943e14d80d"
        );
    }

    #[test]
    fn receiver_derives_the_same_secret() {
        let secp = Secp256k1::new();
        let a_sum = key(42);
        let b_scan = key(99);
        let outpoint = [3u8; OUTPOINT_LENGTH];

        let partial_secret = calculate_partial_secret(&secp, &a_sum, &outpoint).unwrap();
        let sender_side =
            calculate_ecdh_shared_secret(&secp, &b_scan.public_key(&secp), &partial_secret)
                .unwrap();

        // receiver: b_scan·input_hash·A
        let input_hash = reduce_mod_n(inputs_hash(&outpoint, &a_sum.public_key(&secp)));
        let tweak_data = a_sum
            .public_key(&secp)
            .mul_tweak(&secp, &Scalar::from_be_bytes(input_hash).unwrap())
            .unwrap();
        let receiver_side = tweak_data.mul_tweak(&secp, &Scalar::from(b_scan)).unwrap();

        assert_eq!(sender_side, receiver_side);
    }
}
