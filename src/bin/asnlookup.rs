use asnlookup::lens::utils::OutputFormat;
use asnlookup::AsnLookupConfig;
use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;

use commands::config::ConfigArgs;
use commands::lookup::LookupCmdArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.asnlookup.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long, global = true)]
    debug: bool,

    /// Output format: plain, table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every table prefix covering an address, most specific first.
    Lookup(LookupCmdArgs),

    /// Show the resolved configuration.
    Config(ConfigArgs),
}

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(Level::DEBUG)
            .init();
    }

    let config = match AsnLookupConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Lookup(args) => commands::lookup::run(&config, args, cli.format),
        Commands::Config(args) => {
            commands::config::run(&config, cli.config.as_deref(), args, cli.format)
        }
    }
}
