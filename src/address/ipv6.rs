//! IPv6 networks
//!
//! Addresses are held as two `u64` halves (`hi` covers bits 1-64, `lo` bits
//! 65-128) and rendered fully expanded, e.g.
//! `2001:0db8:0000:000b:0000:0000:0000:0000`.

use super::{
    leading_ones_u64, parse_prefix_len, split_cidr, AddressError, AddressFamily, Asn,
    NetworkAddress,
};
use std::fmt;
use std::str::FromStr;

const HEXTETS: usize = 8;

/// A canonicalized IPv6 network with an optional owner ASN
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ipv6Network {
    hi: u64,
    lo: u64,
    prefix_len: u8,
    owner: Option<Asn>,
}

impl Ipv6Network {
    /// Number of bits in an IPv6 address
    pub const BIT_WIDTH: u8 = 128;

    /// Parse `addr/len` (with at most one `::`) and mask off the host bits.
    pub fn new(cidr: &str, owner: Option<Asn>) -> Result<Ipv6Network, AddressError> {
        let family = AddressFamily::Ipv6;
        let (addr, len) = split_cidr(family, cidr)?;
        let hextets = parse_hextets(addr).ok_or_else(|| AddressError::MalformedAddress {
            family,
            input: cidr.to_string(),
        })?;
        let prefix_len = parse_prefix_len(family, len)?;

        let (hi, lo) = join_halves(&hextets);
        let (mask_hi, mask_lo) = mask_for(prefix_len);

        Ok(Ipv6Network {
            hi: hi & mask_hi,
            lo: lo & mask_lo,
            prefix_len,
            owner,
        })
    }

    /// Host route (`/128`) without owner, for use as a lookup target
    pub fn host(addr: &str) -> Result<Ipv6Network, AddressError> {
        Ipv6Network::new(&format!("{}/{}", addr, Self::BIT_WIDTH), None)
    }

    /// Masked address bits as `(high, low)` halves
    pub fn bits(&self) -> (u64, u64) {
        (self.hi, self.lo)
    }

    /// Netmask for this prefix length as `(high, low)` halves
    pub fn mask(&self) -> (u64, u64) {
        mask_for(self.prefix_len)
    }

    /// The eight 16-bit groups of the masked address
    pub fn hextets(&self) -> [u16; HEXTETS] {
        let mut groups = [0u16; HEXTETS];
        for (idx, group) in groups.iter_mut().enumerate() {
            let half = if idx < 4 { self.hi } else { self.lo };
            let shift = 48 - 16 * (idx % 4);
            *group = ((half >> shift) & 0xffff) as u16;
        }
        groups
    }

    /// Copy of this network with a different owner
    pub fn with_owner(&self, owner: Option<Asn>) -> Ipv6Network {
        Ipv6Network {
            owner,
            ..self.clone()
        }
    }
}

/// Split a prefix length across the two halves.
///
/// The high half gets `min(len, 64)` leading ones, the low half whatever is
/// left over, so the halves never overlap.
fn mask_for(prefix_len: u8) -> (u64, u64) {
    (
        leading_ones_u64(prefix_len.min(64)),
        leading_ones_u64(prefix_len.saturating_sub(64)),
    )
}

fn join_halves(hextets: &[u16; HEXTETS]) -> (u64, u64) {
    let fold = |groups: &[u16]| {
        groups
            .iter()
            .fold(0u64, |acc, group| (acc << 16) | u64::from(*group))
    };
    (fold(&hextets[..4]), fold(&hextets[4..]))
}

/// Expand an address with at most one `::` into eight groups.
fn parse_hextets(addr: &str) -> Option<[u16; HEXTETS]> {
    let mut hextets = [0u16; HEXTETS];

    match addr.split_once("::") {
        Some((head, tail)) => {
            if tail.contains("::") {
                return None;
            }
            let head = parse_groups(head)?;
            let tail = parse_groups(tail)?;
            // the zero run must cover at least one group
            if head.len() + tail.len() > HEXTETS - 1 {
                return None;
            }
            hextets[..head.len()].copy_from_slice(&head);
            hextets[HEXTETS - tail.len()..].copy_from_slice(&tail);
        }
        None => {
            let groups = parse_groups(addr)?;
            if groups.len() != HEXTETS {
                return None;
            }
            hextets.copy_from_slice(&groups);
        }
    }

    Some(hextets)
}

/// Colon-separated groups on one side of `::`; an empty side has no groups.
fn parse_groups(part: &str) -> Option<Vec<u16>> {
    if part.is_empty() {
        return Some(Vec::new());
    }
    part.split(':').map(parse_hextet).collect()
}

fn parse_hextet(group: &str) -> Option<u16> {
    if group.is_empty() || group.len() > 4 || !group.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(group, 16).ok()
}

impl NetworkAddress for Ipv6Network {
    fn bit_at(&self, n: u8) -> bool {
        debug_assert!((1..=Self::BIT_WIDTH).contains(&n), "bit {} out of range", n);
        if n <= 64 {
            (self.hi >> (64 - n)) & 1 == 1
        } else {
            (self.lo >> (128 - n)) & 1 == 1
        }
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
        self.hextets()
            .iter()
            .map(|group| format!("{:04x}", group))
            .collect::<Vec<_>>()
            .join(":")
    }

    fn family(&self) -> AddressFamily {
        AddressFamily::Ipv6
    }
}

impl fmt::Display for Ipv6Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.canonical_string(), self.prefix_len)
    }
}

impl FromStr for Ipv6Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv6Network::new(s, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_compressed() {
        let net = Ipv6Network::new("2001:db8:0:b::1A:1c/64", Some(451)).unwrap();
        assert_eq!(
            net.canonical_string(),
            "2001:0db8:0000:000b:0000:0000:0000:0000"
        );
        assert_eq!(net.prefix_len(), 64);
        assert_eq!(net.owner(), Some(451));
    }

    #[test]
    fn test_new_uncompressed_keeps_all_bits() {
        let net = Ipv6Network::new("2001:DB8:0:b:0:0:1a:1c/128", None).unwrap();
        assert_eq!(
            net.canonical_string(),
            "2001:0db8:0000:000b:0000:0000:001a:001c"
        );
        assert_eq!(net.bits(), (0x2001_0db8_0000_000b, 0x0000_0000_001a_001c));
    }

    #[test]
    fn test_compression_positions() {
        let net = Ipv6Network::host("::").unwrap();
        assert_eq!(net.bits(), (0, 0));

        let net = Ipv6Network::host("::1").unwrap();
        assert_eq!(net.bits(), (0, 1));

        let net = Ipv6Network::host("fe80::").unwrap();
        assert_eq!(net.bits(), (0xfe80_0000_0000_0000, 0));

        let net = Ipv6Network::host("1:2:3:4:5:6::8").unwrap();
        assert_eq!(net.hextets(), [1, 2, 3, 4, 5, 6, 0, 8]);
    }

    #[test]
    fn test_mask_boundaries() {
        let (hi, lo) = mask_for(64);
        assert_eq!(hi, u64::MAX);
        assert_eq!(lo, 0);

        let (hi, lo) = mask_for(65);
        assert_eq!(hi, u64::MAX);
        assert_eq!(lo, 0x8000_0000_0000_0000);

        let (hi, lo) = mask_for(63);
        assert_eq!(hi, 0xffff_ffff_ffff_fffe);
        assert_eq!(lo, 0);

        let (hi, lo) = mask_for(1);
        assert_eq!(hi, 0x8000_0000_0000_0000);
        assert_eq!(lo, 0);

        let (hi, lo) = mask_for(128);
        assert_eq!(hi, u64::MAX);
        assert_eq!(lo, u64::MAX);
    }

    #[test]
    fn test_mask_halves_match_full_mask() {
        for len in 1..=128u8 {
            let (hi, lo) = mask_for(len);
            let combined = (u128::from(hi) << 64) | u128::from(lo);
            let expected = u128::MAX << (128 - u32::from(len));
            assert_eq!(combined, expected, "mask mismatch for /{}", len);
            assert_eq!(combined.count_ones(), u32::from(len));
        }
    }

    #[test]
    fn test_masking_across_boundary() {
        let all = "ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff";

        let net = Ipv6Network::new(&format!("{}/64", all), None).unwrap();
        assert_eq!(net.bits(), (u64::MAX, 0));

        let net = Ipv6Network::new(&format!("{}/65", all), None).unwrap();
        assert_eq!(net.bits(), (u64::MAX, 0x8000_0000_0000_0000));
        assert_eq!(
            net.canonical_string(),
            "ffff:ffff:ffff:ffff:8000:0000:0000:0000"
        );

        let net = Ipv6Network::new(&format!("{}/67", all), None).unwrap();
        assert_eq!(net.bits().1, 0xe000_0000_0000_0000);
    }

    #[test]
    fn test_bit_at_halves() {
        // only bit 64 set
        let net = Ipv6Network::host("0:0:0:1::").unwrap();
        assert!(net.bit_at(64));
        assert!(!net.bit_at(63));
        assert!(!net.bit_at(65));

        // only bit 65 set
        let net = Ipv6Network::host("::8000:0:0:0").unwrap();
        assert!(net.bit_at(65));
        assert!(!net.bit_at(64));
        assert!(!net.bit_at(66));

        let net = Ipv6Network::host("8000::1").unwrap();
        assert!(net.bit_at(1));
        assert!(net.bit_at(128));
    }

    #[test]
    fn test_canonicalization_idempotent() {
        let first = Ipv6Network::new("2604:a880:2:d0::2249:2001/77", Some(455)).unwrap();
        let second = Ipv6Network::new(&first.to_string(), Some(455)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_round_trip() {
        for cidr in [
            "2001:0db8:0000:000b:0000:0000:0000:0000/64",
            "fe80:0000:0000:0000:0000:0000:0000:0000/10",
            "0000:0000:0000:0000:0000:0000:0000:0001/128",
        ] {
            let net: Ipv6Network = cidr.parse().unwrap();
            assert_eq!(net.to_string(), cidr);
        }
    }

    #[test]
    fn test_malformed_address() {
        for cidr in [
            "2001:db8::1::2/64",
            "2001:db8:::1/64",
            "1:2:3:4:5:6:7/64",
            "1:2:3:4:5:6:7:8:9/64",
            "1:2:3:4::5:6:7:8/64",
            "2001:db8:0:g::/64",
            "2001:db80a::/64",
            "2001:db8::1:/64",
            ":2001:db8::/64",
            "/64",
            "2001:db8::",
        ] {
            assert!(
                matches!(
                    Ipv6Network::new(cidr, None),
                    Err(AddressError::MalformedAddress {
                        family: AddressFamily::Ipv6,
                        ..
                    })
                ),
                "{} should be malformed",
                cidr
            );
        }
    }

    #[test]
    fn test_prefix_length_errors() {
        assert_eq!(
            Ipv6Network::new("2001:db8::/129", None),
            Err(AddressError::PrefixLengthOutOfRange {
                family: AddressFamily::Ipv6,
                length: 129
            })
        );
        assert!(matches!(
            Ipv6Network::new("2001:db8::/0", None),
            Err(AddressError::PrefixLengthOutOfRange { length: 0, .. })
        ));
        assert!(matches!(
            Ipv6Network::new("2001:db8::/sixty", None),
            Err(AddressError::MalformedPrefixLength {
                family: AddressFamily::Ipv6,
                ..
            })
        ));
    }
}
