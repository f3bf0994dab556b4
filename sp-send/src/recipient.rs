use bitcoin::secp256k1::PublicKey;
use sp_address::SilentPaymentAddress;

use crate::error::Result;

/// A silent payment recipient as seen by the sender.
///
/// Recipients sharing a scan key are paid from a single ECDH shared secret.
pub trait Recipient {
    /// The scan public key `B_scan`.
    fn scan_key(&self) -> PublicKey;

    /// The spend public key with the label tweak applied, `B_m`.
    fn tweaked_spend_key(&self) -> Result<PublicKey>;
}

impl Recipient for SilentPaymentAddress {
    fn scan_key(&self) -> PublicKey {
        self.get_scan_key()
    }

    fn tweaked_spend_key(&self) -> Result<PublicKey> {
        // the encoded spend key of a labelled address is already B_m
        Ok(self.get_spend_key())
    }
}

impl<R: Recipient + ?Sized> Recipient for &R {
    fn scan_key(&self) -> PublicKey {
        (**self).scan_key()
    }

    fn tweaked_spend_key(&self) -> Result<PublicKey> {
        (**self).tweaked_spend_key()
    }
}
