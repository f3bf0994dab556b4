//! Summing the private keys of the inputs.
//!
//! `a = a_1 + a_2 + ... + a_n`, where taproot keys are first tweaked (BIP86, no script path)
//! and negated when the tweaked key has an odd y-coordinate.

use bitcoin::key::TapTweak;
use bitcoin::secp256k1::{Keypair, Parity, Scalar, Secp256k1, SecretKey, Signing, Verification};

use crate::error::{Error, Result};
use crate::protocol::input::{ScriptKind, SpendableInput};

/// The private key an input contributes to the sum.
pub fn effective_private_key<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    private_key: &SecretKey,
    kind: ScriptKind,
) -> SecretKey {
    match kind {
        ScriptKind::WitnessV1Taproot => {
            #[allow(deprecated)]
            let tweaked = Keypair::from_secret_key(secp, private_key)
                .tap_tweak(secp, None)
                .to_inner();

            let (_, parity) = tweaked.x_only_public_key();
            match parity {
                Parity::Odd => tweaked.secret_key().negate(),
                Parity::Even => tweaked.secret_key(),
            }
        }
        ScriptKind::PubKeyHash
        | ScriptKind::WitnessV0PubKeyHash
        | ScriptKind::ScriptHash
        | ScriptKind::WitnessV0ScriptHash
        | ScriptKind::Other => *private_key,
    }
}

/// Add two scalars mod n, with `None` standing for zero.
fn add_private_keys(acc: Option<SecretKey>, key: SecretKey) -> Option<SecretKey> {
    match acc {
        None => Some(key),
        // only fails when the sum is zero
        Some(acc) => acc.add_tweak(&Scalar::from(key)).ok(),
    }
}

/// Sum the effective private keys of all inputs.
///
/// `kinds` holds the script kind of each input, as returned by the input validation.
pub fn aggregate_private_keys<C: Signing + Verification>(
    secp: &Secp256k1<C>,
    inputs: &[SpendableInput],
    kinds: &[ScriptKind],
) -> Result<SecretKey> {
    inputs
        .iter()
        .zip(kinds)
        .map(|(input, kind)| effective_private_key(secp, &input.private_key, *kind))
        .fold(None, add_private_keys)
        .ok_or(Error::DegenerateKeySum)
}
