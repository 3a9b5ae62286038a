//! Account addresses with bech32 encoding (`terra1…`).
//!
//! Bech32 (BIP-173) is implemented here directly: 5-bit regrouping, the
//! BCH checksum over the expanded human-readable part, and the 32-character
//! alphabet. Module accounts have no key pair; their address is the first 20
//! bytes of `sha256(module_name)`.

use crate::error::TypesError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Human-readable part for account and contract addresses.
pub const ACCOUNT_HRP: &str = "terra";

/// Bech32 data alphabet.
const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Reverse lookup table: ASCII byte → 5-bit value (0xFF = invalid).
const CHARSET_REV: [u8; 128] = {
    let mut table = [0xFFu8; 128];
    let mut i = 0;
    while i < 32 {
        table[CHARSET[i] as usize] = i as u8;
        i += 1;
    }
    table
};

const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];

const CHECKSUM_LEN: usize = 6;
const MAX_BECH32_LEN: usize = 90;

/// Account addresses are 20 bytes; wasm contract addresses are 32.
const VALID_ADDRESS_LENS: [usize; 2] = [20, 32];

fn polymod(values: impl IntoIterator<Item = u8>) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(hrp.len() * 2 + 1);
    out.extend(hrp.bytes().map(|b| b >> 5));
    out.push(0);
    out.extend(hrp.bytes().map(|b| b & 0x1f));
    out
}

/// Regroup a bit stream from `from`-bit words into `to`-bit words.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value = (1u32 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        let v = u32::from(value);
        if v >> from != 0 {
            return None;
        }
        acc = (acc << from) | v;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return None;
    }
    Some(out)
}

/// Encode `payload` as bech32 under `hrp`.
pub fn bech32_encode(hrp: &str, payload: &[u8]) -> String {
    // 8 → 5 bit regrouping with padding cannot fail.
    let data = convert_bits(payload, 8, 5, true).unwrap_or_default();
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let pm = polymod(values) ^ 1;

    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    out.push_str(hrp);
    out.push('1');
    for d in &data {
        out.push(CHARSET[*d as usize] as char);
    }
    for i in 0..CHECKSUM_LEN {
        let d = (pm >> (5 * (5 - i))) & 0x1f;
        out.push(CHARSET[d as usize] as char);
    }
    out
}

/// Decode a bech32 string into its human-readable part and payload bytes.
pub fn bech32_decode(s: &str) -> Result<(String, Vec<u8>), TypesError> {
    let invalid = |reason: &str| TypesError::InvalidAddress(format!("{s}: {reason}"));

    if s.len() > MAX_BECH32_LEN {
        return Err(invalid("too long"));
    }
    let has_lower = s.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = s.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(invalid("mixed case"));
    }
    let lower = s.to_ascii_lowercase();
    let sep = lower.rfind('1').ok_or_else(|| invalid("missing separator"))?;
    let (hrp, data_part) = (&lower[..sep], &lower[sep + 1..]);
    if hrp.is_empty() || data_part.len() < CHECKSUM_LEN {
        return Err(invalid("too short"));
    }
    if !hrp.bytes().all(|b| (33..=126).contains(&b)) {
        return Err(invalid("bad prefix character"));
    }

    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.bytes() {
        let v = if c < 128 { CHARSET_REV[c as usize] } else { 0xFF };
        if v == 0xFF {
            return Err(invalid("bad data character"));
        }
        data.push(v);
    }

    let mut values = hrp_expand(hrp);
    values.extend_from_slice(&data);
    if polymod(values) != 1 {
        return Err(invalid("checksum mismatch"));
    }
    data.truncate(data.len() - CHECKSUM_LEN);
    let payload = convert_bits(&data, 5, 8, false).ok_or_else(|| invalid("bad padding"))?;
    Ok((hrp.to_string(), payload))
}

/// An account, contract or module address.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccAddress(Vec<u8>);

impl AccAddress {
    /// Wrap raw address bytes (20 for accounts, 32 for contracts).
    pub fn new(bytes: Vec<u8>) -> Result<Self, TypesError> {
        if !VALID_ADDRESS_LENS.contains(&bytes.len()) {
            return Err(TypesError::InvalidAddress(format!(
                "address must be 20 or 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self(bytes))
    }

    /// Deterministic address of a key-less module account.
    pub fn module(name: &str) -> Self {
        let digest = Sha256::digest(name.as_bytes());
        Self(digest[..20].to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_bech32(&self, hrp: &str) -> String {
        bech32_encode(hrp, &self.0)
    }

    /// Decode a bech32 address, requiring the given prefix.
    pub fn from_bech32(s: &str, expected_hrp: &str) -> Result<Self, TypesError> {
        let (hrp, bytes) = bech32_decode(s)?;
        if hrp != expected_hrp {
            return Err(TypesError::InvalidAddress(format!(
                "{s}: expected prefix {expected_hrp}, got {hrp}"
            )));
        }
        Self::new(bytes)
    }
}

impl fmt::Display for AccAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bech32(ACCOUNT_HRP))
    }
}

impl FromStr for AccAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_bech32(s, ACCOUNT_HRP)
    }
}

impl Serialize for AccAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AccAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bip173_vectors_decode() {
        for valid in [
            "A12UEL5L",
            "a12uel5l",
            "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw",
            "split1checkupstagehandshakeupstreamerranterredcaperred2y9e3w",
        ] {
            assert!(bech32_decode(valid).is_ok(), "{valid} should decode");
        }
    }

    #[test]
    fn bip173_invalid_vectors_fail() {
        for invalid in [
            "pzry9x0s0muk",
            "1pzry9x0s0muk",
            "x1b4n0q5v",
            "li1dgmt3",
            "A1G7SGD8",
            "a12UEL5L",
        ] {
            assert!(bech32_decode(invalid).is_err(), "{invalid} should fail");
        }
    }

    #[test]
    fn address_round_trip() {
        let addr = AccAddress::new(vec![7u8; 20]).unwrap();
        let encoded = addr.to_string();
        assert!(encoded.starts_with("terra1"));
        assert_eq!(encoded.parse::<AccAddress>().unwrap(), addr);
    }

    #[test]
    fn contract_addresses_are_32_bytes() {
        let contract = AccAddress::new(vec![9u8; 32]).unwrap();
        assert_eq!(contract.to_string().parse::<AccAddress>().unwrap(), contract);
        assert!(AccAddress::new(vec![1u8; 19]).is_err());
    }

    #[test]
    fn wrong_prefix_is_invalid() {
        let addr = AccAddress::new(vec![3u8; 20]).unwrap();
        let cosmos = addr.to_bech32("cosmos");
        assert!(matches!(
            cosmos.parse::<AccAddress>(),
            Err(TypesError::InvalidAddress(_))
        ));
        assert_eq!(AccAddress::from_bech32(&cosmos, "cosmos").unwrap(), addr);
    }

    #[test]
    fn flipped_character_breaks_checksum() {
        let mut s = AccAddress::new(vec![5u8; 20]).unwrap().to_string().into_bytes();
        let last = s.len() - 1;
        s[last] = if s[last] == b'q' { b'p' } else { b'q' };
        let s = String::from_utf8(s).unwrap();
        assert!(s.parse::<AccAddress>().is_err());
    }

    #[test]
    fn module_address_is_deterministic() {
        assert_eq!(AccAddress::module("burn"), AccAddress::module("burn"));
        assert_ne!(AccAddress::module("burn"), AccAddress::module("oracle"));
        assert_eq!(AccAddress::module("fee_collector").as_bytes().len(), 20);
    }
}
