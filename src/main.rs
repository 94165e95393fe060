use anyhow::{Context, Result};
use binlist_lookup::config::config::{Config, OutputFormat};
use binlist_lookup::utils::logging;
use binlist_lookup::{BinLookupClient, LookupError};
use clap::Parser;
use crossterm::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;

mod table_display;

use table_display::display_record;

/// Look up card issuer details for a BIN/IIN prefix on binlist.net
#[derive(Debug, Parser)]
#[command(name = "binlookup", version, about)]
struct Cli {
    /// BIN/IIN prefix to look up (sent as given)
    #[arg(required_unless_present = "generate_config")]
    bin: Option<String>,

    /// Print the raw JSON body returned by the service
    #[arg(long, conflicts_with = "json")]
    raw: bool,

    /// Print the mapped record as JSON
    #[arg(long)]
    json: bool,

    /// Proxy URL used for both http and https
    #[arg(long)]
    proxy: Option<String>,

    /// Override the lookup endpoint
    #[arg(long)]
    base_url: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write a commented default config file and exit
    #[arg(long)]
    generate_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn generate_config(path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => Config::get_config_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating config directory {}", parent.display()))?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .with_context(|| format!("Error writing config file {}", path.display()))?;

    println!("Configuration file created at: {}", path.display());
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    if cli.generate_config {
        return generate_config(cli.config);
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(base_url) = cli.base_url {
        config.client.base_url = base_url;
    }

    let format = if cli.raw {
        OutputFormat::Raw
    } else if cli.json {
        OutputFormat::Json
    } else {
        config.display.format
    };

    let bin = cli.bin.context("No BIN given")?;
    let client = BinLookupClient::from_config(&config.client)?;
    let proxy = cli.proxy.as_deref();

    tracing::info!(target: "cli", "Looking up BIN {} via {}", bin, client.base_url());

    match format {
        OutputFormat::Raw => {
            let body = client.fetch_raw(&bin, proxy)?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Json => {
            let record = client.fetch(&bin, proxy)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        OutputFormat::Table => {
            let record = client.fetch(&bin, proxy)?;
            display_record(&bin, &record, config.display.use_glyphs);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let log_path = logging::init_tracing(cli.verbose);
    if cli.verbose {
        if let Some(path) = &log_path {
            eprintln!("Debug logs will be written to: {}", path.display());
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format!("Error: {:#}", e).red());
            match e.downcast_ref::<LookupError>() {
                Some(err) if err.is_rate_limited() => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bin_required_unless_generating_config() {
        assert!(Cli::try_parse_from(["binlookup"]).is_err());
        assert!(Cli::try_parse_from(["binlookup", "--generate-config"]).is_ok());

        let cli = Cli::try_parse_from(["binlookup", "45717360", "--proxy", "http://p:3128"]).unwrap();
        assert_eq!(cli.bin.as_deref(), Some("45717360"));
        assert_eq!(cli.proxy.as_deref(), Some("http://p:3128"));
    }

    #[test]
    fn test_raw_and_json_conflict() {
        assert!(Cli::try_parse_from(["binlookup", "4571", "--raw", "--json"]).is_err());
    }
}
