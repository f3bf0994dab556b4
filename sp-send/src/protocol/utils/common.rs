use bitcoin::secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Verification};

use crate::error::{Error, Result};

/// Interpret a tagged hash digest as a non-zero scalar below the curve order.
///
/// This is how `t_k` is read from `hash_BIP0352/SharedSecret(ser33(S) || ser32(k))`.
pub(crate) fn tweak_from_digest(digest: [u8; 32]) -> Result<SecretKey> {
    if digest == [0u8; 32] {
        return Err(Error::TaggedHashZero);
    }

    SecretKey::from_slice(&digest).map_err(|_| Error::TaggedHashOverflow)
}

/// `P_k = B_m + t_k·G`
pub(crate) fn calculate_P_k<C: Verification>(
    secp: &Secp256k1<C>,
    B_m: &PublicKey,
    t_k: &SecretKey,
) -> Result<PublicKey> {
    let P_k = B_m.add_exp_tweak(secp, &Scalar::from(*t_k))?;

    Ok(P_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::utils::hash::shared_secret_hash;
    use bitcoin::secp256k1::constants::CURVE_ORDER;
    use std::str::FromStr;

    const SHARED_SECRET: &str =
        "028158aff7d61ea66b2fa7f555bc3c5937d1debbde16423d630f9aa7943e14d80d";

    #[test]
    fn zero_digest_is_rejected() {
        assert!(matches!(
            tweak_from_digest([0u8; 32]),
            Err(Error::TaggedHashZero)
        ));
    }

    #[test]
    fn digest_at_or_above_order_is_rejected() {
        assert!(matches!(
            tweak_from_digest(CURVE_ORDER),
            Err(Error::TaggedHashOverflow)
        ));
        assert!(matches!(
            tweak_from_digest([0xff; 32]),
            Err(Error::TaggedHashOverflow)
        ));

        let mut below = CURVE_ORDER;
        below[31] -= 1;
        assert!(tweak_from_digest(below).is_ok());
    }

    #[test]
    fn t_0_from_shared_secret() {
        let S = PublicKey::from_str(SHARED_SECRET).unwrap();

        let t_0 = tweak_from_digest(shared_secret_hash(&S, 0)).unwrap();

        assert_eq!(
            t_0.display_secret().to_string(),
            "f438b40179a3c4262de12986c0e6cce0634007cdc79c1dcd3e20b9ebc2e7eef6"
        );
        assert_ne!(t_0, tweak_from_digest(shared_secret_hash(&S, 1)).unwrap());
    }

    #[test]
    fn output_key_for_first_recipient() {
        let secp = Secp256k1::verification_only();
        let S = PublicKey::from_str(SHARED_SECRET).unwrap();
        let B_spend = PublicKey::from_str(
            "025cc9856d6f8375350e123978daac200c260cb5b5ae83106cab90484dcd8fcf36",
        )
        .unwrap();

        let t_0 = tweak_from_digest(shared_secret_hash(&S, 0)).unwrap();
        let P_0 = calculate_P_k(&secp, &B_spend, &t_0).unwrap();

        assert_eq!(
            P_0.x_only_public_key().0.to_string(),
            "3e9fce73d4e77a4809908e3c3a2e54ee147b9312dc5044a193d1fc85de46e3c1"
        );
    }
}
