//! Network address model
//!
//! This module provides the canonical, family-agnostic representation of a
//! network prefix used by the prefix trie. Both address families implement the
//! [`NetworkAddress`] capability trait:
//!
//! - [`Ipv4Network`]: 32-bit networks stored in a `u32`
//! - [`Ipv6Network`]: 128-bit networks stored as two `u64` halves
//! - [`IpNetwork`]: a closed enum over the two, with family auto-detection
//!
//! Every constructor masks host bits before storing, so `10.10.33.4/19` is
//! held (and rendered) as `10.10.32.0/19`.
//!
//! # Example
//!
//! ```rust
//! use asnlookup::address::{Ipv4Network, NetworkAddress};
//!
//! let net = Ipv4Network::new("10.10.33.4/19", Some(64500)).unwrap();
//! assert_eq!(net.canonical_string(), "10.10.32.0");
//! assert_eq!(net.prefix_len(), 19);
//! assert!(!net.bit_at(1));
//! ```

mod error;
mod ipv4;
mod ipv6;

pub use error::AddressError;
pub use ipv4::Ipv4Network;
pub use ipv6::Ipv6Network;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

/// Autonomous system number attached to a prefix
///
/// Unsigned, so negative owners in a table are rejected.
pub type Asn = u32;

// =============================================================================
// Family
// =============================================================================

/// The two address families the trie understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

impl AddressFamily {
    /// Number of bits in an address of this family
    pub fn bit_width(&self) -> u8 {
        match self {
            AddressFamily::Ipv4 => Ipv4Network::BIT_WIDTH,
            AddressFamily::Ipv6 => Ipv6Network::BIT_WIDTH,
        }
    }

    /// Guess the family of an address string.
    ///
    /// Anything containing a colon is treated as IPv6; everything else as IPv4.
    /// The guess is only a routing decision, the family's parser still decides
    /// whether the text is valid.
    pub fn detect(input: &str) -> AddressFamily {
        if input.contains(':') {
            AddressFamily::Ipv6
        } else {
            AddressFamily::Ipv4
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

// =============================================================================
// Capability trait
// =============================================================================

/// Capabilities the prefix trie needs from an address.
///
/// Implementations must keep every bit past `prefix_len()` cleared.
pub trait NetworkAddress {
    /// The `n`-th most significant bit, 1-indexed.
    ///
    /// `n` must be within `1..=bit_width()`.
    fn bit_at(&self, n: u8) -> bool;

    /// Number of leading network bits
    fn prefix_len(&self) -> u8;

    /// Total number of bits in the address (32 or 128)
    fn bit_width(&self) -> u8;

    /// Owning ASN, `None` for pure lookup keys
    fn owner(&self) -> Option<Asn>;

    /// Canonical textual form of the masked address, without the prefix length
    fn canonical_string(&self) -> String;

    /// Address family of this network
    fn family(&self) -> AddressFamily;
}

// =============================================================================
// Closed enum over both families
// =============================================================================

/// Either an IPv4 or an IPv6 network
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IpNetwork {
    V4(Ipv4Network),
    V6(Ipv6Network),
}

impl IpNetwork {
    /// Parse an `address/len` string of either family.
    pub fn parse(cidr: &str, owner: Option<Asn>) -> Result<IpNetwork, AddressError> {
        match AddressFamily::detect(cidr) {
            AddressFamily::Ipv4 => Ipv4Network::new(cidr, owner).map(IpNetwork::V4),
            AddressFamily::Ipv6 => Ipv6Network::new(cidr, owner).map(IpNetwork::V6),
        }
    }

    /// Build a host route (/32 or /128) without owner, used as a lookup key.
    pub fn host(addr: &str) -> Result<IpNetwork, AddressError> {
        match AddressFamily::detect(addr) {
            AddressFamily::Ipv4 => Ipv4Network::host(addr).map(IpNetwork::V4),
            AddressFamily::Ipv6 => Ipv6Network::host(addr).map(IpNetwork::V6),
        }
    }
}

impl NetworkAddress for IpNetwork {
    fn bit_at(&self, n: u8) -> bool {
        match self {
            IpNetwork::V4(net) => net.bit_at(n),
            IpNetwork::V6(net) => net.bit_at(n),
        }
    }

    fn prefix_len(&self) -> u8 {
        match self {
            IpNetwork::V4(net) => net.prefix_len(),
            IpNetwork::V6(net) => net.prefix_len(),
        }
    }

    fn bit_width(&self) -> u8 {
        match self {
            IpNetwork::V4(net) => net.bit_width(),
            IpNetwork::V6(net) => net.bit_width(),
        }
    }

    fn owner(&self) -> Option<Asn> {
        match self {
            IpNetwork::V4(net) => net.owner(),
            IpNetwork::V6(net) => net.owner(),
        }
    }

    fn canonical_string(&self) -> String {
        match self {
            IpNetwork::V4(net) => net.canonical_string(),
            IpNetwork::V6(net) => net.canonical_string(),
        }
    }

    fn family(&self) -> AddressFamily {
        match self {
            IpNetwork::V4(_) => AddressFamily::Ipv4,
            IpNetwork::V6(_) => AddressFamily::Ipv6,
        }
    }
}

impl fmt::Display for IpNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpNetwork::V4(net) => net.fmt(f),
            IpNetwork::V6(net) => net.fmt(f),
        }
    }
}

impl FromStr for IpNetwork {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpNetwork::parse(s, None)
    }
}

// =============================================================================
// Shared parsing helpers
// =============================================================================

/// Split `address/len` into its two halves.
fn split_cidr(family: AddressFamily, input: &str) -> Result<(&str, &str), AddressError> {
    match input.split_once('/') {
        Some((addr, len)) if !len.contains('/') => Ok((addr, len)),
        _ => Err(AddressError::MalformedAddress {
            family,
            input: input.to_string(),
        }),
    }
}

/// Parse and range-check a prefix length for the given family.
///
/// Integers too large for an `i64` are out of range, reported with the length
/// saturated to `i64::MAX` (or `i64::MIN`).
fn parse_prefix_len(family: AddressFamily, input: &str) -> Result<u8, AddressError> {
    let length: i64 = match input.trim().parse::<i64>() {
        Ok(length) => length,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => {
                return Err(AddressError::MalformedPrefixLength {
                    family,
                    input: input.to_string(),
                })
            }
        },
    };

    if length < 1 || length > i64::from(family.bit_width()) {
        return Err(AddressError::PrefixLengthOutOfRange { family, length });
    }

    u8::try_from(length).map_err(|_| AddressError::PrefixLengthOutOfRange { family, length })
}

/// `count` ones followed by zeros, left-aligned in a `u64` (`count` in `0..=64`)
fn leading_ones_u64(count: u8) -> u64 {
    u64::MAX.checked_shl(64 - u32::from(count)).unwrap_or(0)
}
