//! Construction of BIP352 silent payment outputs.
//!
//! Given the inputs of a transaction together with their private keys, and a list of silent
//! payment recipients, [`create_outputs`] derives one taproot output key per recipient. Only the
//! recipient, scanning with their scan key, can recognize these outputs.
//!
//! Recipients are anything implementing [`Recipient`], which includes
//! [`SilentPaymentAddress`](sp_address::SilentPaymentAddress).
//!
//! ## Feature Flags
//!
//! - **`parallel`** (default) - derive the outputs of each scan key on the rayon thread pool
//!   (not available on WASM)

pub mod config;
pub mod error;
pub mod protocol;
mod recipient;

pub use bitcoin;
pub use bitcoin::secp256k1;
pub use sp_address;

pub use config::{InvalidTweakPolicy, SenderConfig};
pub use error::{Error, Result};
pub use protocol::input::{input_compatible, InputCompatibility, ScriptKind, SpendableInput};
pub use protocol::sending::{create_outputs, OutputWithAddress, Sender};
pub use recipient::Recipient;
