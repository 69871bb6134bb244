//! Longest-prefix-match lookup lens
//!
//! `AsnLookupLens` turns table lines into a per-family `PrefixTable`, runs a
//! single target against it and formats the matches.
//!
//! # Example
//!
//! ```rust,ignore
//! use asnlookup::lens::lookup::AsnLookupLens;
//! use asnlookup::lens::utils::OutputFormat;
//!
//! let lens = AsnLookupLens::new();
//! let result = lens.lookup_in("table.txt", "2001:db8::1")?;
//! println!("{}", lens.format_results(&result, OutputFormat::Table));
//! ```

use crate::address::{AddressFamily, IpNetwork, NetworkAddress};
use crate::datasets::{classify_line, read_table, TableLine};
use crate::trie::{PrefixTable, TableEntry};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tracing::{debug, info};

use super::utils::OutputFormat;

// =============================================================================
// Types
// =============================================================================

/// Counters collected while building a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadStats {
    /// Lines read from the source
    pub total_lines: usize,
    /// Prefixes inserted into the trie
    pub inserted: usize,
    pub skipped_comments: usize,
    /// Bad field count, bad ASN, or a prefix that failed to parse
    pub skipped_malformed: usize,
    /// Valid-looking records of the family not being built
    pub skipped_other_family: usize,
}

/// Outcome of one lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupResult {
    /// Canonical form of the queried network
    pub target: String,
    pub family: AddressFamily,
    /// Covering prefixes, most specific first
    pub matches: Vec<TableEntry>,
    pub stats: LoadStats,
}

#[derive(Tabled)]
struct LookupRow {
    #[tabled(rename = "Prefix")]
    prefix: String,
    #[tabled(rename = "ASN")]
    asn: String,
}

impl From<&TableEntry> for LookupRow {
    fn from(entry: &TableEntry) -> Self {
        LookupRow {
            prefix: format!("{}/{}", entry.prefix, entry.prefix_len),
            asn: entry
                .asn
                .map(|asn| asn.to_string())
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

// =============================================================================
// Args
// =============================================================================

/// Arguments for a lookup
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct LookupArgs {
    /// Address to look up, either a bare address or `address/len`
    #[cfg_attr(feature = "cli", clap(value_name = "TARGET"))]
    pub target: String,

    /// Table location (file path or URL), overrides the configured one
    #[cfg_attr(feature = "cli", clap(short, long, value_name = "LOCATION"))]
    #[serde(default)]
    pub table: Option<String>,
}

impl LookupArgs {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            table: None,
        }
    }

    /// Read the table from `location` instead of the configured source
    pub fn with_table(mut self, location: impl Into<String>) -> Self {
        self.table = Some(location.into());
        self
    }

    /// The table location to use, falling back to `default_location`
    pub fn table_location<'a>(&'a self, default_location: &'a str) -> &'a str {
        self.table.as_deref().unwrap_or(default_location)
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Lens for longest-prefix-match lookups against a prefix-to-ASN table
#[derive(Debug, Default)]
pub struct AsnLookupLens;

impl AsnLookupLens {
    pub fn new() -> Self {
        Self
    }

    /// Parse a lookup target.
    ///
    /// A bare address becomes a host route (/32 or /128); `address/len` is
    /// parsed as a network and canonicalized.
    pub fn parse_target(&self, target: &str) -> Result<IpNetwork> {
        let parsed = if target.contains('/') {
            IpNetwork::parse(target, None)
        } else {
            IpNetwork::host(target)
        };
        parsed.map_err(|e| anyhow!("invalid target {}: {}", target, e))
    }

    /// Build the trie for `family` from table lines.
    ///
    /// Comments, malformed lines and records of the other family are skipped
    /// and counted.
    pub fn build_table<I, S>(&self, family: AddressFamily, lines: I) -> (PrefixTable, LoadStats)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = PrefixTable::new(family);
        let mut stats = LoadStats::default();

        for line in lines {
            let line = line.as_ref();
            stats.total_lines += 1;

            let record = match classify_line(line) {
                TableLine::Record(record) => record,
                TableLine::Comment => {
                    stats.skipped_comments += 1;
                    continue;
                }
                TableLine::Malformed => {
                    debug!("skipping malformed table line: {:?}", line);
                    stats.skipped_malformed += 1;
                    continue;
                }
            };

            if AddressFamily::detect(&record.prefix) != family {
                stats.skipped_other_family += 1;
                continue;
            }

            let inserted = IpNetwork::parse(&record.prefix, Some(record.asn))
                .and_then(|network| table.insert(&network));
            match inserted {
                Ok(()) => stats.inserted += 1,
                Err(e) => {
                    debug!("skipping table record {:?}: {}", line, e);
                    stats.skipped_malformed += 1;
                }
            }
        }

        info!(
            "built {} table: {} lines, {} inserted, {} comments, {} malformed, {} other family",
            family,
            stats.total_lines,
            stats.inserted,
            stats.skipped_comments,
            stats.skipped_malformed,
            stats.skipped_other_family
        );

        (table, stats)
    }

    /// Read the table at `location` and build the trie for `family`.
    pub fn load_table(
        &self,
        family: AddressFamily,
        location: &str,
    ) -> Result<(PrefixTable, LoadStats)> {
        let lines = read_table(location)?;
        Ok(self.build_table(family, lines))
    }

    /// All prefixes in `table` covering `target`, most specific first.
    pub fn lookup(&self, table: &PrefixTable, target: &IpNetwork) -> Result<Vec<TableEntry>> {
        table
            .find(target)
            .map_err(|e| anyhow!("lookup of {} failed: {}", target, e))
    }

    /// Parse `target`, load the table of its family from `location` and
    /// look it up.
    pub fn lookup_in(&self, location: &str, target: &str) -> Result<LookupResult> {
        let network = self.parse_target(target)?;
        let (table, stats) = self.load_table(network.family(), location)?;
        let matches = self.lookup(&table, &network)?;

        Ok(LookupResult {
            target: network.to_string(),
            family: network.family(),
            matches,
            stats,
        })
    }

    // =========================================================================
    // Output formatting
    // =========================================================================

    /// Format a lookup result for display.
    ///
    /// Non-JSON formats render nothing when there are no matches.
    pub fn format_results(&self, result: &LookupResult, format: OutputFormat) -> String {
        if result.matches.is_empty() && !format.is_json() {
            return String::new();
        }

        match format {
            OutputFormat::Plain => result
                .matches
                .iter()
                .map(|entry| entry.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Table | OutputFormat::Markdown => {
                use tabled::settings::Style;
                use tabled::Table;

                let rows: Vec<LookupRow> = result.matches.iter().map(LookupRow::from).collect();
                let mut table = Table::new(rows);
                if format == OutputFormat::Markdown {
                    table.with(Style::markdown());
                } else {
                    table.with(Style::rounded());
                }
                table.to_string()
            }
            OutputFormat::Json => serde_json::to_string(result).unwrap_or_default(),
            OutputFormat::JsonPretty => serde_json::to_string_pretty(result).unwrap_or_default(),
            OutputFormat::JsonLine => result
                .matches
                .iter()
                .map(|entry| serde_json::to_string(entry).unwrap_or_default())
                .collect::<Vec<_>>()
                .join("\n"),
            OutputFormat::Psv => {
                let mut lines = vec!["prefix|asn".to_string()];
                lines.extend(result.matches.iter().map(|entry| {
                    let row = LookupRow::from(entry);
                    format!("{}|{}", row.prefix, row.asn)
                }));
                lines.join("\n")
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
