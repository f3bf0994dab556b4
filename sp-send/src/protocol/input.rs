//! Inputs of a silent payment transaction and their script classification.
//!
//! Only inputs whose public key can be recovered by a scanning receiver may be spent in a
//! transaction that pays to silent payment addresses: P2PKH, P2WPKH and P2TR key path spends,
//! plus P2SH, which is assumed to wrap a P2WPKH.

use std::fmt;

use bitcoin::{script, secp256k1::SecretKey, OutPoint, Script, TxOut};

use crate::error::{Error, Result};

/// A UTXO that should be spent in order to pay to one or multiple silent payment addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpendableInput {
    /// The previous output being spent
    pub outpoint: OutPoint,
    /// The UTXO being spent (value + script)
    pub witness_utxo: TxOut,
    /// Private key controlling the UTXO
    pub private_key: SecretKey,
}

impl SpendableInput {
    pub fn new(outpoint: OutPoint, witness_utxo: TxOut, private_key: SecretKey) -> Self {
        Self {
            outpoint,
            witness_utxo,
            private_key,
        }
    }
}

/// Script classes relevant for silent payment sending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    PubKeyHash,
    WitnessV0PubKeyHash,
    WitnessV1Taproot,
    ScriptHash,
    WitnessV0ScriptHash,
    Other,
}

/// How an input script may take part in a silent payment transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputCompatibility {
    /// The input public key is directly available to the receiver.
    Compatible,
    /// P2SH, accepted as a nested P2WPKH without looking at the redeem script.
    NestedWitness,
    Incompatible,
}

impl InputCompatibility {
    pub fn is_compatible(self) -> bool {
        !matches!(self, InputCompatibility::Incompatible)
    }
}

impl ScriptKind {
    /// Classify an output script.
    ///
    /// Fails if the script is not a valid sequence of instructions.
    pub fn classify(script_pubkey: &Script) -> std::result::Result<Self, script::Error> {
        for instruction in script_pubkey.instructions() {
            instruction?;
        }

        let kind = if script_pubkey.is_p2pkh() {
            ScriptKind::PubKeyHash
        } else if script_pubkey.is_p2wpkh() {
            ScriptKind::WitnessV0PubKeyHash
        } else if script_pubkey.is_p2tr() {
            ScriptKind::WitnessV1Taproot
        } else if script_pubkey.is_p2sh() {
            ScriptKind::ScriptHash
        } else if script_pubkey.is_p2wsh() {
            ScriptKind::WitnessV0ScriptHash
        } else {
            ScriptKind::Other
        };

        Ok(kind)
    }

    pub fn compatibility(self) -> InputCompatibility {
        match self {
            ScriptKind::PubKeyHash
            | ScriptKind::WitnessV0PubKeyHash
            | ScriptKind::WitnessV1Taproot => InputCompatibility::Compatible,
            ScriptKind::ScriptHash => InputCompatibility::NestedWitness,
            ScriptKind::WitnessV0ScriptHash | ScriptKind::Other => {
                InputCompatibility::Incompatible
            }
        }
    }
}

impl fmt::Display for ScriptKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScriptKind::PubKeyHash => "pubkeyhash",
            ScriptKind::WitnessV0PubKeyHash => "witness_v0_keyhash",
            ScriptKind::WitnessV1Taproot => "witness_v1_taproot",
            ScriptKind::ScriptHash => "scripthash",
            ScriptKind::WitnessV0ScriptHash => "witness_v0_scripthash",
            ScriptKind::Other => "nonstandard",
        };
        f.write_str(name)
    }
}

/// Check whether a script can be spent in a silent payment transaction.
pub fn input_compatible(
    script_pubkey: &Script,
) -> std::result::Result<(InputCompatibility, ScriptKind), script::Error> {
    let kind = ScriptKind::classify(script_pubkey)?;

    Ok((kind.compatibility(), kind))
}

/// Classify every input, failing on the first one that can't be used.
pub(crate) fn validate_inputs(inputs: &[SpendableInput]) -> Result<Vec<ScriptKind>> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            let (compatibility, kind) = input_compatible(&input.witness_utxo.script_pubkey)
                .map_err(|source| Error::ScriptParseFailure { index, source })?;

            if !compatibility.is_compatible() {
                return Err(Error::IncompatibleScript { index, kind });
            }

            Ok(kind)
        })
        .collect()
}
