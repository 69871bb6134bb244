#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! asnlookup - longest-prefix-match lookups of IP addresses to origin ASNs
//!
//! Given a table of `<CIDR> <ASN>` records and a target address, asnlookup
//! returns every table prefix that covers the target, most specific first.
//! It can be used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | (none) | Address model, prefix trie, table line parsing, config | `serde`, `config` |
//! | `lens` | Table loading from files/URLs, lookup lens, output formats | `oneio`, `tabled` |
//! | `cli` | The `asnlookup` binary | All above + `clap`, `tracing-subscriber` |
//!
//! ```toml
//! # Core data structures only
//! asnlookup = { version = "0.1", default-features = false }
//!
//! # Loading and formatting without the CLI
//! asnlookup = { version = "0.1", default-features = false, features = ["lens"] }
//! ```
//!
//! # Architecture
//!
//! - **[`address`]**: IPv4/IPv6 networks with canonical (host bits cleared) storage
//! - **[`trie`]**: binary prefix trie generic over [`address::NetworkAddress`]
//! - **[`datasets`]**: the `<CIDR> <ASN>` table format and its reader
//! - **`lens`**: the lookup lens combining the above (requires `lens`)
//! - **[`config`]**: table location from file and environment
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use asnlookup::lens::lookup::AsnLookupLens;
//! use asnlookup::{AsnLookupConfig, OutputFormat};
//!
//! let config = AsnLookupConfig::new(&None)?;
//! let lens = AsnLookupLens::new();
//! let result = lens.lookup_in(config.table_location(), "8.8.8.8")?;
//! println!("{}", lens.format_results(&result, OutputFormat::Plain));
//! ```

pub mod address;
pub mod config;
pub mod datasets;
pub mod trie;

// Lens module - feature gated
#[cfg(feature = "lens")]
pub mod lens;

pub use address::{
    AddressError, AddressFamily, Asn, IpNetwork, Ipv4Network, Ipv6Network, NetworkAddress,
};
pub use config::AsnLookupConfig;
pub use trie::{PrefixTable, PrefixTrie, TableEntry};

#[cfg(feature = "lens")]
pub use lens::lookup::{AsnLookupLens, LoadStats, LookupArgs, LookupResult};
#[cfg(feature = "lens")]
pub use lens::utils::OutputFormat;
