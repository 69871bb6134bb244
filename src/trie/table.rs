//! A prefix trie of either address family

use super::{PrefixTrie, TableEntry};
use crate::address::{
    AddressError, AddressFamily, IpNetwork, Ipv4Network, Ipv6Network, NetworkAddress,
};

/// One [`PrefixTrie`] for a single address family.
///
/// Inserting or querying with a network of the other family is rejected with
/// [`AddressError::AddressFamilyMismatch`].
#[derive(Debug)]
pub enum PrefixTable {
    V4(PrefixTrie<Ipv4Network>),
    V6(PrefixTrie<Ipv6Network>),
}

impl PrefixTable {
    /// Empty table for `family`
    pub fn new(family: AddressFamily) -> Self {
        match family {
            AddressFamily::Ipv4 => PrefixTable::V4(PrefixTrie::new()),
            AddressFamily::Ipv6 => PrefixTable::V6(PrefixTrie::new()),
        }
    }

    pub fn family(&self) -> AddressFamily {
        match self {
            PrefixTable::V4(_) => AddressFamily::Ipv4,
            PrefixTable::V6(_) => AddressFamily::Ipv6,
        }
    }

    pub fn insert(&mut self, network: &IpNetwork) -> Result<(), AddressError> {
        match (self, network) {
            (PrefixTable::V4(trie), IpNetwork::V4(net)) => trie.insert(net),
            (PrefixTable::V6(trie), IpNetwork::V6(net)) => trie.insert(net),
            (table, net) => return Err(mismatch(table.family(), net)),
        }
        Ok(())
    }

    /// Covering prefixes of `target`, most specific first
    pub fn find(&self, target: &IpNetwork) -> Result<Vec<TableEntry>, AddressError> {
        match (self, target) {
            (PrefixTable::V4(trie), IpNetwork::V4(net)) => Ok(trie.find(net)),
            (PrefixTable::V6(trie), IpNetwork::V6(net)) => Ok(trie.find(net)),
            (table, net) => Err(mismatch(table.family(), net)),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            PrefixTable::V4(trie) => trie.len(),
            PrefixTable::V6(trie) => trie.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_count(&self) -> usize {
        match self {
            PrefixTable::V4(trie) => trie.node_count(),
            PrefixTable::V6(trie) => trie.node_count(),
        }
    }

    pub fn dump(&self) -> String {
        match self {
            PrefixTable::V4(trie) => trie.dump(),
            PrefixTable::V6(trie) => trie.dump(),
        }
    }
}

fn mismatch(expected: AddressFamily, found: &IpNetwork) -> AddressError {
    AddressError::AddressFamilyMismatch {
        expected,
        found: found.family(),
    }
}
