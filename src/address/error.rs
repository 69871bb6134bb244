//! Errors raised while constructing network addresses

use super::AddressFamily;

/// Errors that can occur when building an [`Ipv4Network`](super::Ipv4Network)
/// or [`Ipv6Network`](super::Ipv6Network) from text, or when mixing families.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The address part (or the overall `address/len` shape) is not valid for the family
    MalformedAddress {
        family: AddressFamily,
        input: String,
    },
    /// The prefix length is not an integer
    MalformedPrefixLength {
        family: AddressFamily,
        input: String,
    },
    /// The prefix length is an integer outside `1..=bit_width`
    PrefixLengthOutOfRange { family: AddressFamily, length: i64 },
    /// A network of one family was handed to a table of the other
    AddressFamilyMismatch {
        expected: AddressFamily,
        found: AddressFamily,
    },
}

impl AddressError {
    /// The address family the error refers to.
    ///
    /// For a mismatch this is the family the caller expected.
    pub fn family(&self) -> AddressFamily {
        match self {
            AddressError::MalformedAddress { family, .. }
            | AddressError::MalformedPrefixLength { family, .. }
            | AddressError::PrefixLengthOutOfRange { family, .. } => *family,
            AddressError::AddressFamilyMismatch { expected, .. } => *expected,
        }
    }
}

impl std::fmt::Display for AddressError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressError::MalformedAddress { family, input } => {
                write!(f, "Invalid {} address: {}", family, input)
            }
            AddressError::MalformedPrefixLength { family, input } => {
                write!(f, "Invalid {} prefix length: {}", family, input)
            }
            AddressError::PrefixLengthOutOfRange { family, length } => write!(
                f,
                "{} prefix length {} out of range (1-{})",
                family,
                length,
                family.bit_width()
            ),
            AddressError::AddressFamilyMismatch { expected, found } => {
                write!(f, "Address family mismatch: expected {}, got {}", expected, found)
            }
        }
    }
}

impl std::error::Error for AddressError {}
