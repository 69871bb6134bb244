//! IPv4 networks

use super::{parse_prefix_len, split_cidr, AddressError, AddressFamily, Asn, NetworkAddress};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// A canonicalized IPv4 network with an optional owner ASN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ipv4Network {
    bits: u32,
    prefix_len: u8,
    owner: Option<Asn>,
}

impl Ipv4Network {
    /// Number of bits in an IPv4 address
    pub const BIT_WIDTH: u8 = 32;

    /// Parse `a.b.c.d/len` and mask off the host bits.
    ///
    /// The leading octet must be nonzero both in the input and after masking,
    /// so `0.x.y.z` and `1.2.3.4/7` are rejected as malformed.
    pub fn new(cidr: &str, owner: Option<Asn>) -> Result<Ipv4Network, AddressError> {
        let family = AddressFamily::Ipv4;
        let malformed = || AddressError::MalformedAddress {
            family,
            input: cidr.to_string(),
        };
        let (addr, len) = split_cidr(family, cidr)?;
        let bits = parse_octets(addr).ok_or_else(malformed)?;
        let prefix_len = parse_prefix_len(family, len)?;

        let bits = bits & mask_for(prefix_len);
        if bits >> 24 == 0 {
            return Err(malformed());
        }

        Ok(Ipv4Network {
            bits,
            prefix_len,
            owner,
        })
    }

    /// Host route (`/32`) without owner, for use as a lookup target
    pub fn host(addr: &str) -> Result<Ipv4Network, AddressError> {
        Ipv4Network::new(&format!("{}/{}", addr, Self::BIT_WIDTH), None)
    }

    /// Masked address bits
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Netmask for this prefix length
    pub fn mask(&self) -> u32 {
        mask_for(self.prefix_len)
    }

    /// Masked address as a std address
    pub fn addr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.bits)
    }

    /// Copy of this network with a different owner
    pub fn with_owner(&self, owner: Option<Asn>) -> Ipv4Network {
        Ipv4Network {
            owner,
            ..self.clone()
        }
    }
}

fn mask_for(prefix_len: u8) -> u32 {
    u32::MAX
        .checked_shl(u32::from(Ipv4Network::BIT_WIDTH - prefix_len))
        .unwrap_or(0)
}

/// Four dot-separated decimal octets, first one nonzero.
fn parse_octets(addr: &str) -> Option<u32> {
    let octets: Vec<&str> = addr.split('.').collect();
    if octets.len() != 4 {
        return None;
    }

    let mut bits = 0u32;
    for (idx, octet) in octets.iter().enumerate() {
        if octet.is_empty() || !octet.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let value: u32 = octet.parse().ok()?;
        if value > 255 || (idx == 0 && value == 0) {
            return None;
        }
        bits = (bits << 8) | value;
    }
    Some(bits)
}

impl NetworkAddress for Ipv4Network {
    fn bit_at(&self, n: u8) -> bool {
        debug_assert!((1..=Self::BIT_WIDTH).contains(&n), "bit {} out of range", n);
        (self.bits >> (Self::BIT_WIDTH - n)) & 1 == 1
    }

    fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    fn bit_width(&self) -> u8 {
        Self::BIT_WIDTH
    }

    fn owner(&self) -> Option<Asn> {
        self.owner
    }

    fn canonical_string(&self) -> String {
        self.addr().to_string()
    }

    fn family(&self) -> AddressFamily {
        AddressFamily::Ipv4
    }
}

impl fmt::Display for Ipv4Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr(), self.prefix_len)
    }
}

impl FromStr for Ipv4Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv4Network::new(s, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_masks_host_bits() {
        let net = Ipv4Network::new("10.10.33.4/19", Some(64500)).unwrap();
        assert_eq!(net.canonical_string(), "10.10.32.0");
        assert_eq!(net.to_string(), "10.10.32.0/19");
        assert_eq!(net.prefix_len(), 19);
        assert_eq!(net.owner(), Some(64500));
        assert_eq!(net.mask(), 0xffff_e000);

        let net = Ipv4Network::new("192.168.1.1/24", Some(351)).unwrap();
        assert_eq!(net.canonical_string(), "192.168.1.0");

        let net = Ipv4Network::new("192.168.1.0/20", Some(600)).unwrap();
        assert_eq!(net.canonical_string(), "192.168.0.0");
    }

    #[test]
    fn test_full_and_single_bit_prefix() {
        let net = Ipv4Network::new("8.8.8.8/32", None).unwrap();
        assert_eq!(net.canonical_string(), "8.8.8.8");
        assert_eq!(net.mask(), u32::MAX);

        let net = Ipv4Network::new("200.1.2.3/1", None).unwrap();
        assert_eq!(net.canonical_string(), "128.0.0.0");
        assert_eq!(net.mask(), 0x8000_0000);
    }

    #[test]
    fn test_masked_to_zero_first_octet() {
        // the stored first octet would be 0, which could never parse back
        assert_eq!(
            Ipv4Network::new("1.2.3.4/7", Some(1)),
            Err(AddressError::MalformedAddress {
                family: AddressFamily::Ipv4,
                input: "1.2.3.4/7".to_string(),
            })
        );
        assert!(Ipv4Network::new("127.0.0.1/1", None).is_err());

        let net = Ipv4Network::new("1.2.3.4/8", Some(1)).unwrap();
        assert_eq!(net.to_string(), "1.0.0.0/8");
        let reparsed = Ipv4Network::new(&net.to_string(), Some(1));
        assert_eq!(reparsed, Ok(net));
    }

    #[test]
    fn test_canonicalization_idempotent() {
        let first = Ipv4Network::new("172.16.254.77/12", Some(1)).unwrap();
        let second = Ipv4Network::new(&first.to_string(), Some(1)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.bits(), second.bits());
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_round_trip() {
        for cidr in ["1.0.0.0/8", "192.168.0.0/16", "100.64.0.0/10", "8.8.8.8/32"] {
            let net: Ipv4Network = cidr.parse().unwrap();
            assert_eq!(net.to_string(), cidr);
        }
    }

    #[test]
    fn test_bit_at() {
        let net = Ipv4Network::host("192.168.1.5").unwrap();
        // 192 = 1100_0000
        assert!(net.bit_at(1));
        assert!(net.bit_at(2));
        assert!(!net.bit_at(3));
        assert!(!net.bit_at(8));
        // 5 = 0000_0101
        assert!(net.bit_at(30));
        assert!(!net.bit_at(31));
        assert!(net.bit_at(32));
    }

    #[test]
    fn test_malformed_address() {
        for cidr in [
            "10.0.0/8",
            "10.0.0.0.0/8",
            "10.0.0.256/8",
            "10.0.-1.0/8",
            "10.0.a.0/8",
            "10..0.0/8",
            "0.1.2.3/8",
            "/8",
            "10.0.0.0",
        ] {
            assert!(
                matches!(
                    Ipv4Network::new(cidr, None),
                    Err(AddressError::MalformedAddress {
                        family: AddressFamily::Ipv4,
                        ..
                    })
                ),
                "{} should be malformed",
                cidr
            );
        }
    }

    #[test]
    fn test_malformed_prefix_length() {
        assert!(matches!(
            Ipv4Network::new("10.0.0.0/x", None),
            Err(AddressError::MalformedPrefixLength { .. })
        ));
        assert!(matches!(
            Ipv4Network::new("10.0.0.0/", None),
            Err(AddressError::MalformedPrefixLength { .. })
        ));
    }

    #[test]
    fn test_prefix_length_out_of_range() {
        assert_eq!(
            Ipv4Network::new("10.0.0.0/33", None),
            Err(AddressError::PrefixLengthOutOfRange {
                family: AddressFamily::Ipv4,
                length: 33
            })
        );
        assert!(matches!(
            Ipv4Network::new("10.0.0.0/0", None),
            Err(AddressError::PrefixLengthOutOfRange { length: 0, .. })
        ));
    }

    #[test]
    fn test_with_owner() {
        let key = Ipv4Network::host("1.1.1.1").unwrap();
        let owned = key.with_owner(Some(13335));
        assert_eq!(owned.owner(), Some(13335));
        assert_eq!(owned.bits(), key.bits());
    }
}
