use asnlookup::lens::lookup::{AsnLookupLens, LookupArgs, LookupResult};
use asnlookup::lens::utils::OutputFormat;
use asnlookup::{AsnLookupConfig, NetworkAddress};
use clap::Args;

/// Arguments for the Lookup command
#[derive(Args)]
pub struct LookupCmdArgs {
    #[clap(flatten)]
    pub lookup: LookupArgs,

    /// Print the trie built from the table to stderr before the results
    #[clap(long)]
    pub dump_trie: bool,
}

pub fn run(config: &AsnLookupConfig, args: LookupCmdArgs, output_format: OutputFormat) {
    let LookupCmdArgs { lookup, dump_trie } = args;
    let location = lookup.table_location(config.table_location());
    let lens = AsnLookupLens::new();

    let result = if dump_trie {
        lookup_with_dump(&lens, location, &lookup.target)
    } else {
        lens.lookup_in(location, &lookup.target)
    };

    let result = match result {
        Ok(r) => r,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    let output = lens.format_results(&result, output_format);
    if !output.is_empty() {
        println!("{}", output);
    }
}

fn lookup_with_dump(
    lens: &AsnLookupLens,
    location: &str,
    target: &str,
) -> anyhow::Result<LookupResult> {
    let network = lens.parse_target(target)?;
    let (table, stats) = lens.load_table(network.family(), location)?;
    eprint!("{}", table.dump());

    Ok(LookupResult {
        target: network.to_string(),
        family: network.family(),
        matches: lens.lookup(&table, &network)?,
        stats,
    })
}
