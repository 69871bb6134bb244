use asnlookup::lens::utils::OutputFormat;
use asnlookup::AsnLookupConfig;
use clap::Args;
use serde::Serialize;
use std::path::Path;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {}

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: Option<String>,
    table_url: &'a str,
    table_file: Option<&'a str>,
    table_location: &'a str,
}

/// `config_path` is the `--config` value the configuration was loaded with.
pub fn run(
    config: &AsnLookupConfig,
    config_path: Option<&str>,
    _args: ConfigArgs,
    output_format: OutputFormat,
) {
    let config_file = AsnLookupConfig::resolve_config_file(config_path.map(Path::new))
        .map(|p| p.to_string_lossy().to_string());

    if output_format.is_json() {
        let info = ConfigInfo {
            config_file,
            table_url: &config.table_url,
            table_file: config.table_file.as_deref(),
            table_location: config.table_location(),
        };
        let output = match output_format {
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&info),
            _ => serde_json::to_string(&info),
        };
        match output {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("ERROR: failed to serialize configuration: {}", e),
        }
        return;
    }

    println!(
        "Config File:        {}",
        config_file.as_deref().unwrap_or("(none)")
    );
    println!("{}", config.summary());
}
