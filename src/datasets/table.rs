//! Prefix-to-ASN table source
//!
//! The table is plain text, one `<CIDR> <ASN>` record per line, for example:
//!
//! ```text
//! # prefix        origin
//! 1.1.1.0/24      13335
//! 2001:db8::/32   64496
//! ```
//!
//! Lines containing `#` are comments. Anything that does not split into
//! exactly two whitespace-separated fields, or whose ASN is not an unsigned
//! 32-bit integer, is skipped rather than treated as an error.

use crate::address::Asn;
use serde::{Deserialize, Serialize};

/// Table published by the NLNOG RING looking glass
pub const DEFAULT_TABLE_URL: &str = "http://lg01.infra.ring.nlnog.net/table.txt";

/// One `<CIDR> <ASN>` line, not yet validated as an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub prefix: String,
    pub asn: Asn,
}

/// How a single table line was classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLine {
    Record(TableRecord),
    Comment,
    Malformed,
}

/// Classify one line of the table.
pub fn classify_line(line: &str) -> TableLine {
    if line.contains('#') {
        return TableLine::Comment;
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [prefix, asn] = fields.as_slice() else {
        return TableLine::Malformed;
    };

    match asn.parse::<Asn>() {
        Ok(asn) => TableLine::Record(TableRecord {
            prefix: prefix.to_string(),
            asn,
        }),
        Err(_) => TableLine::Malformed,
    }
}

/// Parse one line, returning `None` for comments and malformed lines.
pub fn parse_record(line: &str) -> Option<TableRecord> {
    match classify_line(line) {
        TableLine::Record(record) => Some(record),
        TableLine::Comment | TableLine::Malformed => None,
    }
}

/// Read every line of the table at `location`.
///
/// `location` can be a local path or an `http(s)://` URL; compressed files are
/// decompressed based on their extension.
#[cfg(feature = "lens")]
pub fn read_table(location: &str) -> anyhow::Result<Vec<String>> {
    use anyhow::anyhow;
    use tracing::info;

    info!("reading prefix table from {}", location);
    let lines = oneio::read_lines(location)
        .map_err(|e| anyhow!("unable to open table {}: {}", location, e))?;

    lines
        .collect::<Result<Vec<String>, _>>()
        .map_err(|e| anyhow!("unable to read table {}: {}", location, e))
}
