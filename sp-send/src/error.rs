use thiserror::Error;

use crate::protocol::input::ScriptKind;

#[derive(Debug, Error)]
pub enum Error {
    // Inputs
    #[error("no inputs provided")]
    NoInputs,
    #[error("unable to parse script of input {index}: {source}")]
    ScriptParseFailure {
        index: usize,
        #[source]
        source: bitcoin::script::Error,
    },
    #[error("input {index} ({kind}) is not compatible with silent payment transactions")]
    IncompatibleScript { index: usize, kind: ScriptKind },

    // Key aggregation
    #[error("sum of input keys is zero")]
    DegenerateKeySum,

    // Output derivation
    #[error("tagged hash overflow")]
    TaggedHashOverflow,
    #[error("tagged hash is zero")]
    TaggedHashZero,

    // Configuration
    #[error("invalid sender configuration: {0}")]
    Config(#[from] serde_json::Error),

    // Wrapped external errors
    #[error(transparent)]
    Secp256k1(#[from] bitcoin::secp256k1::Error),
    #[error(transparent)]
    Address(#[from] sp_address::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
