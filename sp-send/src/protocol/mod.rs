//! BIP352 Silent Payments sending protocol.
//!
//! Output construction follows [BIP352](https://github.com/bitcoin/bips/blob/master/bip-0352.mediawiki)
//! as a single pass over the inputs and recipients of one transaction.
//!
//! ## Module Organization
//!
//! - [`input`] - Spendable inputs and classification of their scripts
//! - [`aggregate`] - Sum of the input private keys, with the taproot parity correction
//! - [`outpoint`] - Selection of the smallest outpoint
//! - [`shared_secret`] - Grouping of recipients by scan key and ECDH shared secrets
//! - [`sending`] - Output key generation, the [`Sender`](sending::Sender) entry point
//! - [`utils`] - Tagged hashes and low-level helpers
//!
//! ## Example
//!
//! ```ignore
//! use sp_send::{create_outputs, SpendableInput};
//! use sp_send::sp_address::SilentPaymentAddress;
//!
//! let recipient = SilentPaymentAddress::try_from("sp1q...")?;
//! let outputs = create_outputs(&inputs, &[recipient])?;
//! for output in outputs {
//!     println!("{} -> {}", output.address, output.script_pubkey());
//! }
//! ```
#![allow(non_snake_case)]
pub mod aggregate;
pub mod input;
pub mod outpoint;
pub mod sending;
pub mod shared_secret;
pub mod utils;
