//! Lens module
//!
//! Lenses combine the core data structures with loading and output formatting
//! so the same logic can back the CLI or another front end.
//!
//! Each lens module exports:
//! - A **Lens struct** (e.g. `AsnLookupLens`) - the entry point for all operations
//! - **Args structs** - input arguments for lens methods
//! - **Output types** - return types ready for formatting
//!
//! ```rust,ignore
//! use asnlookup::lens::lookup::AsnLookupLens;
//! use asnlookup::lens::utils::OutputFormat;
//!
//! let lens = AsnLookupLens::new();
//! let result = lens.lookup_in("table.txt", "8.8.8.8")?;
//! println!("{}", lens.format_results(&result, OutputFormat::Plain));
//! ```

pub mod utils;

// AsnLookupLens - longest-prefix-match lookups against a prefix table
pub mod lookup;
