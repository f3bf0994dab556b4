//! Silent payment output generation for sending.
//!
//! [`Sender::create_outputs`] runs the whole BIP352 sending pipeline for one transaction:
//!
//! 1. classify the scripts of the inputs being spent and reject the ones a receiver can't scan,
//! 2. sum the private keys of the inputs into `a`,
//! 3. find the smallest outpoint and compute the partial secret `input_hash·a`,
//! 4. derive one ECDH shared secret per distinct scan key,
//! 5. derive an output key `P_k = B_m + t_k·G` for every recipient.
//!
//! The outputs are returned grouped by scan key (in order of first occurrence), and in the
//! order the recipients were given within a group.

use bitcoin::key::TweakedPublicKey;
use bitcoin::secp256k1::{All, PublicKey, Secp256k1, SecretKey, XOnlyPublicKey};
use bitcoin::ScriptBuf;

use crate::config::{InvalidTweakPolicy, SenderConfig};
use crate::error::{Error, Result};
use crate::protocol::aggregate::aggregate_private_keys;
use crate::protocol::input::{validate_inputs, SpendableInput};
use crate::protocol::outpoint::smallest_outpoint;
use crate::protocol::shared_secret::{
    calculate_ecdh_shared_secret, calculate_partial_secret, group_by_scan_key, RecipientGroup,
};
use crate::protocol::utils::common::{calculate_P_k, tweak_from_digest};
use crate::protocol::utils::hash::shared_secret_hash;
use crate::recipient::Recipient;

/// Produces the digest `t_k` is read from, given `S` and `k`.
type TweakDigestFn = fn(&PublicKey, u32) -> [u8; 32];

/// An output key together with the recipient it pays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputWithAddress<R> {
    pub address: R,
    pub output_key: PublicKey,
}

impl<R> OutputWithAddress<R> {
    /// The key committed to in the taproot output.
    pub fn x_only_public_key(&self) -> XOnlyPublicKey {
        self.output_key.x_only_public_key().0
    }

    /// The P2TR script paying to the output key.
    pub fn script_pubkey(&self) -> ScriptBuf {
        // P_k is the final output key, no further taproot tweak applies
        let output_key = TweakedPublicKey::dangerous_assume_tweaked(self.x_only_public_key());

        ScriptBuf::new_p2tr_tweaked(output_key)
    }
}

pub struct Sender {
    secp: Secp256k1<All>,
    config: SenderConfig,
    tweak_digest: TweakDigestFn,
}

impl Default for Sender {
    fn default() -> Self {
        Self::new(SenderConfig::default())
    }
}

impl Sender {
    pub fn new(config: SenderConfig) -> Self {
        Self {
            secp: Secp256k1::new(),
            config,
            tweak_digest: shared_secret_hash,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_tweak_digest(mut self, tweak_digest: TweakDigestFn) -> Self {
        self.tweak_digest = tweak_digest;
        self
    }

    pub fn config(&self) -> &SenderConfig {
        &self.config
    }

    /// Create the output keys paying `recipients` from a transaction spending `inputs`.
    ///
    /// This should only be called once per transaction, and with every input the transaction
    /// spends. Calling it again for the same inputs and recipients returns the same keys, so
    /// paying the same recipient in several transactions requires different inputs.
    ///
    /// # Errors
    ///
    /// * [`Error::NoInputs`] if `inputs` is empty.
    /// * [`Error::ScriptParseFailure`] / [`Error::IncompatibleScript`] for the first input that
    ///   can't be spent in a silent payment transaction.
    /// * [`Error::DegenerateKeySum`] if the input keys sum to zero.
    /// * [`Error::TaggedHashOverflow`] / [`Error::TaggedHashZero`] if `t_k` is invalid and the
    ///   policy is [`InvalidTweakPolicy::Abort`].
    pub fn create_outputs<R>(
        &self,
        inputs: &[SpendableInput],
        recipients: &[R],
    ) -> Result<Vec<OutputWithAddress<R>>>
    where
        R: Recipient + Clone + Send + Sync,
    {
        if inputs.is_empty() {
            return Err(Error::NoInputs);
        }

        let kinds = validate_inputs(inputs)?;
        let a_sum = aggregate_private_keys(&self.secp, inputs, &kinds)?;

        let outpoint_L = smallest_outpoint(inputs).ok_or(Error::NoInputs)?;
        let partial_secret = calculate_partial_secret(&self.secp, &a_sum, &outpoint_L)?;

        let groups = group_by_scan_key(recipients);
        log::debug!(
            "creating {} outputs for {} scan keys from {} inputs",
            recipients.len(),
            groups.len(),
            inputs.len()
        );

        // Use parallel iteration for the ECDH of each group
        #[cfg(all(not(target_arch = "wasm32"), feature = "parallel"))]
        let outputs: Result<Vec<Vec<OutputWithAddress<R>>>> = if self.config.parallel {
            use rayon::prelude::*;
            groups
                .par_iter()
                .map(|group| self.derive_group_outputs(group, &partial_secret))
                .collect()
        } else {
            groups
                .iter()
                .map(|group| self.derive_group_outputs(group, &partial_secret))
                .collect()
        };

        // Sequential fallback (WASM or no parallel feature)
        #[cfg(not(all(not(target_arch = "wasm32"), feature = "parallel")))]
        let outputs: Result<Vec<Vec<OutputWithAddress<R>>>> = groups
            .iter()
            .map(|group| self.derive_group_outputs(group, &partial_secret))
            .collect();

        Ok(outputs?.into_iter().flatten().collect())
    }

    fn derive_group_outputs<R: Recipient + Clone>(
        &self,
        group: &RecipientGroup<'_, R>,
        partial_secret: &SecretKey,
    ) -> Result<Vec<OutputWithAddress<R>>> {
        let ecdh_shared_secret =
            calculate_ecdh_shared_secret(&self.secp, &group.scan_key, partial_secret)?;

        let mut outputs = Vec::with_capacity(group.recipients.len());
        let mut k = 0u32;

        for recipient in &group.recipients {
            let B_m = recipient.tweaked_spend_key()?;
            let t_k = self.next_valid_tweak(&ecdh_shared_secret, &mut k)?;
            let P_k = calculate_P_k(&self.secp, &B_m, &t_k)?;

            outputs.push(OutputWithAddress {
                address: (*recipient).clone(),
                output_key: P_k,
            });
            k += 1;
        }

        Ok(outputs)
    }

    /// `t_k` for the current `k`, advancing `k` past invalid tweaks under
    /// [`InvalidTweakPolicy::SkipIndex`].
    fn next_valid_tweak(&self, ecdh_shared_secret: &PublicKey, k: &mut u32) -> Result<SecretKey> {
        loop {
            let err = match tweak_from_digest((self.tweak_digest)(ecdh_shared_secret, *k)) {
                Ok(t_k) => return Ok(t_k),
                Err(e) => e,
            };

            match self.config.invalid_tweak {
                InvalidTweakPolicy::Abort => return Err(err),
                InvalidTweakPolicy::SkipIndex => {
                    log::warn!("{} at k = {}, skipping to the next index", err, k);
                    *k = k.checked_add(1).ok_or(err)?;
                }
            }
        }
    }
}

/// Create the output keys paying `recipients` with the default [`SenderConfig`].
///
/// See [`Sender::create_outputs`].
pub fn create_outputs<R>(
    inputs: &[SpendableInput],
    recipients: &[R],
) -> Result<Vec<OutputWithAddress<R>>>
where
    R: Recipient + Clone + Send + Sync,
{
    Sender::default().create_outputs(inputs, recipients)
}
