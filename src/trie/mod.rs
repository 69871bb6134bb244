//! Binary prefix trie for longest-prefix-match lookups
//!
//! The trie is keyed on address bits, most significant first. Inserting a
//! network walks `prefix_len` bits from the root, creating nodes as needed, and
//! attaches a [`TableEntry`] to the node it lands on. A lookup walks the
//! target's full bit width and collects every entry on the path, so the result
//! contains *all* covering prefixes, most specific first.
//!
//! [`PrefixTrie`] is generic over [`NetworkAddress`], so the same code serves
//! IPv4 and IPv6; [`PrefixTable`] wraps one trie of either family.
//!
//! # Example
//!
//! ```rust
//! use asnlookup::address::Ipv4Network;
//! use asnlookup::trie::PrefixTrie;
//!
//! let mut trie = PrefixTrie::new();
//! trie.insert(&Ipv4Network::new("192.168.0.0/16", Some(355)).unwrap());
//! trie.insert(&Ipv4Network::new("192.168.1.0/24", Some(351)).unwrap());
//!
//! let target = Ipv4Network::host("192.168.1.5").unwrap();
//! let matches = trie.find(&target);
//! assert_eq!(matches[0].prefix_len, 24);
//! assert_eq!(matches[1].prefix_len, 16);
//! ```

mod table;

pub use table::PrefixTable;

use crate::address::{Asn, NetworkAddress};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use std::marker::PhantomData;

// =============================================================================
// Types
// =============================================================================

/// A prefix stored in the trie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Canonical address of the prefix (host bits cleared)
    pub prefix: String,
    /// Prefix length
    pub prefix_len: u8,
    /// Owning ASN
    pub asn: Option<Asn>,
}

impl TableEntry {
    fn from_address<A: NetworkAddress>(address: &A) -> Self {
        TableEntry {
            prefix: address.canonical_string(),
            prefix_len: address.prefix_len(),
            asn: address.owner(),
        }
    }
}

impl fmt::Display for TableEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.asn {
            Some(asn) => write!(f, "{}/{} {}", self.prefix, self.prefix_len, asn),
            None => write!(f, "{}/{} -", self.prefix, self.prefix_len),
        }
    }
}

#[derive(Debug, Default)]
struct TrieNode {
    /// Index 0 follows a 0 bit, index 1 a 1 bit
    children: [Option<Box<TrieNode>>; 2],
    entries: Vec<TableEntry>,
}

/// Append-only binary trie over the bits of one address family
pub struct PrefixTrie<A> {
    root: TrieNode,
    entry_count: usize,
    node_count: usize,
    _family: PhantomData<fn(&A)>,
}

// =============================================================================
// Trie
// =============================================================================

impl<A: NetworkAddress> PrefixTrie<A> {
    /// Create an empty trie holding only the root node
    pub fn new() -> Self {
        PrefixTrie {
            root: TrieNode::default(),
            entry_count: 0,
            node_count: 1,
            _family: PhantomData,
        }
    }

    /// Insert a network.
    ///
    /// Identical prefixes are not merged: inserting the same network twice
    /// stores two entries, and both come back from [`find`](Self::find).
    pub fn insert(&mut self, address: &A) {
        let mut node = &mut self.root;
        for n in 1..=address.prefix_len() {
            let slot = &mut node.children[usize::from(address.bit_at(n))];
            if slot.is_none() {
                self.node_count += 1;
            }
            node = slot.get_or_insert_with(Box::default).as_mut();
        }
        node.entries.push(TableEntry::from_address(address));
        self.entry_count += 1;
    }

    /// All stored prefixes covering `target`, most specific first.
    ///
    /// Entries with equal prefix length keep their insertion order. An empty
    /// vector means no prefix covers the target.
    pub fn find(&self, target: &A) -> Vec<TableEntry> {
        let mut matches = Vec::new();
        let mut node = &self.root;
        for n in 1..=target.bit_width() {
            match &node.children[usize::from(target.bit_at(n))] {
                Some(child) => {
                    matches.extend(child.entries.iter().cloned());
                    node = child;
                }
                // nothing was ever inserted below this branch
                None => break,
            }
        }

        // stable sort, so equal lengths stay in insertion order
        matches.sort_by(|a, b| b.prefix_len.cmp(&a.prefix_len));
        matches
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entry_count
    }

    /// True if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    /// Number of allocated nodes, root included
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Render the node tree with attached entries, for debugging.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        dump_node(&self.root, "root", 0, &mut out);
        out
    }
}

impl<A: NetworkAddress> Default for PrefixTrie<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for PrefixTrie<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixTrie")
            .field("entries", &self.entry_count)
            .field("nodes", &self.node_count)
            .finish()
    }
}

fn dump_node(node: &TrieNode, label: &str, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{}{}", indent, label);
    for entry in &node.entries {
        let _ = writeln!(out, "{}  {}", indent, entry);
    }
    for (child, label) in node.children.iter().zip(["left", "right"]) {
        if let Some(child) = child {
            dump_node(child, label, depth + 1, out);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
