//! Prefix values: parsing, canonicalisation, and bit access.
//!
//! A [`Prefix`] is an immutable (family, network address, prefixlen) triple
//! in canonical form: every bit above `prefixlen` is forced to zero before
//! storage, so two prefixes compare equal iff they cover the same set of
//! addresses at the same specificity.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use crate::error::{RadixError, Result};

/// Address family of a [`Prefix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    /// IPv4, 32-bit addresses.
    V4,
    /// IPv6, 128-bit addresses.
    V6,
}

impl Family {
    /// Maximum valid prefix length for this family (32 or 128).
    pub fn max_len(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// An immutable, canonical IP prefix: family, masked network address, and
/// prefix length.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    family: Family,
    /// Address bits, right-padded into a u128 so both families share one
    /// bit-indexing scheme: bit `i` (0-indexed from the MSB) lives at
    /// `127 - i` regardless of family.
    addr: u128,
    prefixlen: u8,
}

impl Prefix {
    /// Build a canonical prefix from a left-aligned u128 address (as
    /// produced by [`v4_to_bits`] or `u128::from(Ipv6Addr)`) and prefix
    /// length, masking off any bits beyond `prefixlen`.
    ///
    /// Fails if `prefixlen` exceeds the family's maximum.
    fn from_aligned_bits(family: Family, addr: u128, prefixlen: u8) -> Result<Self> {
        if prefixlen > family.max_len() {
            return Err(RadixError::InvalidArgument(format!(
                "prefixlen {} exceeds maximum {} for {}",
                prefixlen,
                family.max_len(),
                family
            )));
        }
        Ok(Self {
            family,
            addr: mask(addr, prefixlen),
            prefixlen,
        })
    }

    /// Build a canonical IPv4 prefix.
    pub fn new_v4(addr: Ipv4Addr, prefixlen: u8) -> Result<Self> {
        Self::from_aligned_bits(Family::V4, v4_to_bits(addr), prefixlen)
    }

    /// Build a canonical IPv6 prefix.
    pub fn new_v6(addr: Ipv6Addr, prefixlen: u8) -> Result<Self> {
        Self::from_aligned_bits(Family::V6, u128::from(addr), prefixlen)
    }

    /// Parse a textual prefix: `"A.B.C.D"`, `"A.B.C.D/len"`, standard
    /// colon-hex IPv6, or IPv6 with `/len`. A missing `/len` defaults to the
    /// family's maximum (a host address).
    pub fn parse(text: &str) -> Result<Self> {
        let (addr_part, len_part) = match text.split_once('/') {
            Some((a, l)) => (a, Some(l)),
            None => (text, None),
        };

        if let Ok(v4) = Ipv4Addr::from_str(addr_part) {
            let prefixlen = match len_part {
                Some(l) => parse_len(l, 32)?,
                None => 32,
            };
            return Self::new_v4(v4, prefixlen);
        }

        if let Ok(v6) = Ipv6Addr::from_str(addr_part) {
            let prefixlen = match len_part {
                Some(l) => parse_len(l, 128)?,
                None => 128,
            };
            return Self::new_v6(v6, prefixlen);
        }

        Err(RadixError::InvalidArgument(format!(
            "not a valid IPv4 or IPv6 address: {}",
            text
        )))
    }

    /// Parse a network string with a separately supplied prefix length,
    /// e.g. the `add(network, masklen)` calling convention.
    pub fn parse_with_len(network: &str, masklen: u8) -> Result<Self> {
        // Reject an embedded "/len" here: the two calling conventions are
        // mutually exclusive.
        if network.contains('/') {
            return Err(RadixError::InvalidArgument(format!(
                "network {} already contains a prefix length", network
            )));
        }
        if let Ok(v4) = Ipv4Addr::from_str(network) {
            return Self::new_v4(v4, masklen);
        }
        if let Ok(v6) = Ipv6Addr::from_str(network) {
            return Self::new_v6(v6, masklen);
        }
        Err(RadixError::InvalidArgument(format!(
            "not a valid IPv4 or IPv6 address: {}",
            network
        )))
    }

    /// Address family.
    pub fn family(&self) -> Family {
        self.family
    }

    /// Prefix length.
    pub fn prefixlen(&self) -> u8 {
        self.prefixlen
    }

    /// Bit `i`, counted from the most significant bit, 0-indexed. `i` must
    /// be less than the family's maximum length.
    pub fn bit(&self, i: u8) -> bool {
        debug_assert!(i < self.family.max_len());
        (self.addr >> (127 - i)) & 1 == 1
    }

    /// Raw masked address, as a u128 (IPv4 addresses occupy the high 32
    /// bits, matching the bit-indexing scheme used by [`Prefix::bit`]).
    pub(crate) fn addr_bits(&self) -> u128 {
        self.addr
    }

    /// The network address, without `/prefixlen`, as canonical text.
    pub fn network(&self) -> String {
        match self.family {
            Family::V4 => Ipv4Addr::from((self.addr >> 96) as u32).to_string(),
            Family::V6 => Ipv6Addr::from(self.addr).to_string(),
        }
    }

    /// Canonical textual form, always including `/prefixlen`.
    pub fn canonical(&self) -> String {
        format!("{}/{}", self.network(), self.prefixlen)
    }

    /// Whether `self` is a prefix of (covers) `other`: same family, no more
    /// specific, and `other`'s address agrees with `self`'s in the first
    /// `self.prefixlen()` bits. Used by longest-prefix-match search.
    pub(crate) fn covers(&self, other: &Prefix) -> bool {
        self.family == other.family
            && self.prefixlen <= other.prefixlen
            && mask(other.addr, self.prefixlen) == self.addr
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

impl fmt::Debug for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Prefix({})", self.canonical())
    }
}

impl FromStr for Prefix {
    type Err = RadixError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_len(text: &str, max: u8) -> Result<u8> {
    let len: u8 = text
        .parse()
        .map_err(|_| RadixError::InvalidArgument(format!("invalid prefix length: {}", text)))?;
    if len > max {
        return Err(RadixError::InvalidArgument(format!(
            "prefixlen {} exceeds maximum {}",
            len, max
        )));
    }
    Ok(len)
}

/// Mask off bits beyond `prefixlen`. `addr` is in the left-aligned u128
/// representation used by [`Prefix`].
fn mask(addr: u128, prefixlen: u8) -> u128 {
    if prefixlen == 0 {
        0
    } else if prefixlen >= 128 {
        addr
    } else {
        let keep = u128::MAX << (128 - prefixlen as u32);
        addr & keep
    }
}

// IPv4 addresses are stored left-aligned (high 32 bits of the u128) so
// `bit()`/`mask()` share one implementation across families.
pub(crate) fn v4_to_bits(addr: Ipv4Addr) -> u128 {
    (u32::from(addr) as u128) << 96
}
