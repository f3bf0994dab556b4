use bech32::{
    primitives::{
        decode::{CheckedHrpstring, CheckedHrpstringError},
        iter::{ByteIterExt, Fe32IterExt},
    },
    Bech32m, Fe32, Hrp,
};
use bitcoin_hashes::{sha256, Hash, HashEngine};
use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey};
use std::convert::TryFrom;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of the address payload: `ser33(B_scan) || ser33(B_m)`.
const ADDRESS_DATA_LENGTH: usize = 66;
const HRP_MAINNET: Hrp = Hrp::parse_unchecked("sp");
const HRP_TESTNET: Hrp = Hrp::parse_unchecked("tsp");
const HRP_REGTEST: Hrp = Hrp::parse_unchecked("sprt");

/// Tag of the BIP352 label hash.
pub const BIP0352_LABEL_TAG: &[u8] = b"BIP0352/Label";

/// Error types for silent payment address operations.
#[derive(Debug)]
pub enum Error {
    InvalidNetwork(String),
    InvalidAddress(String),
    UnsupportedVersion(u8),
    InvalidLabel(u32),
    Bech32Decode(CheckedHrpstringError),
    Secp256k1(secp256k1::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidNetwork(n) => write!(f, "Invalid network: {}", n),
            Error::InvalidAddress(msg) => write!(f, "Invalid address: {}", msg),
            Error::UnsupportedVersion(v) => write!(f, "Unsupported version: {}", v),
            Error::InvalidLabel(m) => write!(f, "Label {} produced an invalid tweak", m),
            Error::Bech32Decode(e) => write!(f, "Bech32 decode error: {}", e),
            Error::Secp256k1(e) => write!(f, "Secp256k1 error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<CheckedHrpstringError> for Error {
    fn from(e: CheckedHrpstringError) -> Self {
        Error::Bech32Decode(e)
    }
}

impl From<secp256k1::Error> for Error {
    fn from(e: secp256k1::Error) -> Self {
        Error::Secp256k1(e)
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The network format used for this silent payment address.
///
/// There are three network types: Mainnet (`sp1..`), Testnet (`tsp1..`), and Regtest (`sprt1..`).
/// Signet uses the same network type as Testnet.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    fn hrp(self) -> Hrp {
        match self {
            Network::Mainnet => HRP_MAINNET,
            Network::Testnet => HRP_TESTNET,
            Network::Regtest => HRP_REGTEST,
        }
    }
}

impl From<Network> for &str {
    fn from(value: Network) -> Self {
        match value {
            Network::Mainnet => "bitcoin", // we use the same string as rust-bitcoin for compatibility
            Network::Regtest => "regtest",
            Network::Testnet => "testnet",
        }
    }
}

impl TryFrom<&str> for Network {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let res = match value {
            "bitcoin" | "main" => Self::Mainnet, // We also take the core style argument
            "regtest" => Self::Regtest,
            "testnet" | "signet" | "test" => Self::Testnet, // core arg
            _ => return Err(Error::InvalidNetwork(value.to_string())),
        };
        Ok(res)
    }
}

/// A BIP352 label.
///
/// The label tweak is `hash_BIP0352/Label(ser256(b_scan) || ser32(m))`. Label `m = 0` is
/// reserved for change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Label {
    m: u32,
    tweak: Scalar,
}

impl Label {
    pub fn new(scan_sk: &SecretKey, m: u32) -> Result<Self> {
        let tag = sha256::Hash::hash(BIP0352_LABEL_TAG);

        let mut engine = sha256::Hash::engine();
        engine.input(tag.as_byte_array());
        engine.input(tag.as_byte_array());
        engine.input(&scan_sk.secret_bytes());
        engine.input(&m.to_be_bytes());
        let hash = sha256::Hash::from_engine(engine);

        let tweak = Scalar::from_be_bytes(hash.to_byte_array()).map_err(|_| Error::InvalidLabel(m))?;

        Ok(Label { m, tweak })
    }

    /// The label index.
    pub fn m(&self) -> u32 {
        self.m
    }

    pub fn as_scalar(&self) -> Scalar {
        self.tweak
    }
}

/// A silent payment address struct that can be used to deserialize a silent payment address string.
///
/// `m_pubkey` is the spend key as published in the address, `B_m = B_spend + label·G` for a
/// labelled address and `B_spend` otherwise.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct SilentPaymentAddress {
    version: u8,
    scan_pubkey: PublicKey,
    m_pubkey: PublicKey,
    network: Network,
}

#[cfg(feature = "serde")]
impl Serialize for SilentPaymentAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded: String = (*self).into();
        serializer.serialize_str(&encoded)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SilentPaymentAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let addr_str: String = Deserialize::deserialize(deserializer)?;

        SilentPaymentAddress::try_from(addr_str.as_str()).map_err(serde::de::Error::custom)
    }
}

impl SilentPaymentAddress {
    pub fn new(
        scan_pubkey: PublicKey,
        m_pubkey: PublicKey,
        network: Network,
        version: u8,
    ) -> Result<Self> {
        if version != 0 {
            return Err(Error::UnsupportedVersion(version));
        }

        Ok(SilentPaymentAddress {
            scan_pubkey,
            m_pubkey,
            network,
            version,
        })
    }

    /// Derive the labelled address `(B_scan, B_spend + label·G)`.
    ///
    /// The label is applied to the spend key of `self`, so it must be called on the unlabelled
    /// address.
    pub fn add_label(&self, label: &Label) -> Result<Self> {
        let secp = Secp256k1::verification_only();
        let m_pubkey = self.m_pubkey.add_exp_tweak(&secp, &label.as_scalar())?;

        Ok(SilentPaymentAddress { m_pubkey, ..*self })
    }

    /// Get the scan public key.
    pub fn get_scan_key(&self) -> PublicKey {
        self.scan_pubkey
    }

    /// Get the spend public key, with the label tweak already applied.
    pub fn get_spend_key(&self) -> PublicKey {
        self.m_pubkey
    }

    /// Get the network.
    pub fn get_network(&self) -> Network {
        self.network
    }

    /// Get the version byte.
    pub fn get_version(&self) -> u8 {
        self.version
    }
}

impl fmt::Display for SilentPaymentAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", <SilentPaymentAddress as Into<String>>::into(*self))
    }
}

impl TryFrom<&str> for SilentPaymentAddress {
    type Error = Error;

    fn try_from(addr: &str) -> Result<Self> {
        let checked = CheckedHrpstring::new::<Bech32m>(addr)?;
        let hrp = checked.hrp();

        let network = if hrp == HRP_MAINNET {
            Network::Mainnet
        } else if hrp == HRP_TESTNET {
            Network::Testnet
        } else if hrp == HRP_REGTEST {
            Network::Regtest
        } else {
            return Err(Error::InvalidAddress(format!(
                "Wrong prefix, expected \"sp\", \"tsp\", or \"sprt\", got \"{}\"",
                hrp
            )));
        };

        let mut payload = checked.fe32_iter::<&mut dyn Iterator<Item = u8>>();
        let version = payload
            .next()
            .ok_or_else(|| Error::InvalidAddress("Missing version".to_string()))?
            .to_u8();

        let data: Vec<u8> = payload.fes_to_bytes().collect();

        if data.len() != ADDRESS_DATA_LENGTH {
            return Err(Error::InvalidAddress(format!(
                "Wrong address length, expected {}, got {}",
                ADDRESS_DATA_LENGTH,
                data.len()
            )));
        }

        let scan_pubkey = PublicKey::from_slice(&data[..33])?;
        let m_pubkey = PublicKey::from_slice(&data[33..])?;

        SilentPaymentAddress::new(scan_pubkey, m_pubkey, network, version)
    }
}

impl TryFrom<String> for SilentPaymentAddress {
    type Error = Error;

    fn try_from(addr: String) -> Result<Self> {
        addr.as_str().try_into()
    }
}

impl From<SilentPaymentAddress> for String {
    fn from(val: SilentPaymentAddress) -> Self {
        let hrp = val.network.hrp();
        let data = [val.scan_pubkey.serialize(), val.m_pubkey.serialize()].concat();

        // only version 0 addresses can be constructed
        data.iter()
            .copied()
            .bytes_to_fes()
            .with_checksum::<Bech32m>(&hrp)
            .with_witness_version(Fe32::Q)
            .chars()
            .collect()
    }
}
