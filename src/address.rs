use crate::error::AddressError;
use crate::utils::{bytes_to_hex_str, contains_non_hex_chars, hex_str_to_bytes};
use bech32::{self, FromBase32, ToBase32, Variant};
use ripemd::Ripemd160;
use serde::de::Error as DeError;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use sha2::{Digest, Sha256};
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::str::FromStr;

/// The bech32 prefix used when an address is serialized without any other
/// context
pub const DEFAULT_PREFIX: &str = "cosmos";

/// A 20 byte account address, either derived from a public key or from the
/// name of a module account
#[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Hash)]
pub struct Address([u8; 20]);

impl Address {
    pub fn from_bytes(bytes: [u8; 20]) -> Address {
        Address(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Address, AddressError> {
        if bytes.len() != 20 {
            return Err(AddressError::BytesDecodeErrorWrongLength);
        }
        let mut addr = [0u8; 20];
        addr.copy_from_slice(bytes);
        Ok(Address(addr))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The address of a module account, the first 20 bytes of the sha256
    /// hash of the module name. This is what the sdk auth module uses
    /// for accounts such as `fee_collector`
    pub fn for_module(name: &str) -> Address {
        let hash = Sha256::digest(name.as_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[..20]);
        Address(bytes)
    }

    /// The address of a compressed secp256k1 public key
    pub fn from_secp256k1_pubkey(pubkey: &[u8]) -> Address {
        let sha256 = Sha256::digest(pubkey);
        let ripemd160 = Ripemd160::digest(sha256);
        let mut bytes: [u8; 20] = Default::default();
        bytes.copy_from_slice(&ripemd160[..]);
        Address(bytes)
    }

    /// Obtain a bech32 encoded address with a given prefix.
    ///
    /// * `hrp` - A prefix for bech32 encoding. The convention for addresses
    /// in Cosmos is `cosmos`.
    pub fn to_bech32<T: Into<String>>(&self, hrp: T) -> Result<String, AddressError> {
        let hrp: String = hrp.into();
        let bech32 = bech32::encode(&hrp, self.0.to_base32(), Variant::Bech32)?;
        Ok(bech32)
    }

    /// Parse a bech32 encoded address, the prefix is not checked
    ///
    /// * `s` - A bech32 encoded address
    pub fn from_bech32(s: &str) -> Result<Address, AddressError> {
        let (_hrp, data, _variant) = bech32::decode(s)?;
        let vec: Vec<u8> = FromBase32::from_base32(&data)?;
        Address::from_slice(&vec)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts either a bech32 address or a plain (optionally 0x prefixed)
    /// hex string of the 20 address bytes
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        if trimmed.len() == 40 && !contains_non_hex_chars(trimmed) {
            let bytes = hex_str_to_bytes(trimmed)?;
            Address::from_slice(&bytes).map_err(|_| AddressError::HexDecodeErrorWrongLength)
        } else {
            Address::from_bech32(s)
        }
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Serialize address as a string with a default prefix for addresses
        let s = self
            .to_bech32(DEFAULT_PREFIX)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bytes_to_hex_str(&self.0))
    }
}
