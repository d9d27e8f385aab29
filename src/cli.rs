// src/cli.rs
use crate::core::config_manager::parse_site_list;
use crate::core::AppConfig;
use crate::formatter::render;
use crate::job_search::{self, JobListing};
use crate::web::ChatService;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::info;

const CSV_HEADERS: [&str; 12] = [
    "id",
    "site",
    "job_url",
    "title",
    "company",
    "location",
    "date_posted",
    "job_type",
    "min_amount",
    "max_amount",
    "currency",
    "description",
];

#[derive(Parser)]
#[command(name = "jobchat")]
#[command(about = "Job board search behind a chat-completion endpoint")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// YAML configuration file (defaults to ./config.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve {
        #[arg(long)]
        address: Option<IpAddr>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run a single search and print the results
    Search {
        query: String,
        /// Comma separated job sites, e.g. indeed,linkedin
        #[arg(long)]
        sites: Option<String>,
        /// Listings kept per site
        #[arg(long)]
        results: Option<usize>,
        #[arg(long)]
        hours_old: Option<u32>,
        #[arg(long)]
        country: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Csv,
}

/// Apply `serve` flags on top of the loaded configuration.
pub fn apply_serve_overrides(
    config: &mut AppConfig,
    address: Option<IpAddr>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(address) = address {
        config.server.address = address;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.validate()
}

pub async fn handle_search_command(mut config: AppConfig, command: Command) -> Result<()> {
    let Command::Search {
        query,
        sites,
        results,
        hours_old,
        country,
        format,
    } = command
    else {
        anyhow::bail!("Not a search command");
    };

    if let Some(sites) = sites {
        config.search.sites = parse_site_list(&sites)?;
    }
    if let Some(results) = results {
        config.search.results_wanted = results;
    }
    if let Some(hours_old) = hours_old {
        config.search.hours_old = hours_old;
    }
    if let Some(country) = country {
        config.search.country = country.parse()?;
    }
    config.validate()?;

    let term = query.trim().to_string();
    if term.is_empty() {
        anyhow::bail!("Search query must not be empty");
    }

    let search = job_search::from_settings(&config.search)?;
    let service = ChatService::new(search, config.search);
    let search_query = service.search_query(term);

    info!(
        "Searching {:?} for '{}'",
        search_query.sites, search_query.term
    );
    let listings = service.run_search(&search_query).await?;
    info!("Found {} listings", listings.len());

    let stdout = std::io::stdout();
    match format {
        OutputFormat::Text => {
            let mut out = stdout.lock();
            writeln!(out, "{}", render(&listings)).context("Failed to write results")?;
        }
        OutputFormat::Csv => write_csv(stdout.lock(), &listings)?,
    }

    Ok(())
}

/// Write listings as CSV with a header row, even when there are no listings.
pub fn write_csv<W: Write>(writer: W, listings: &[JobListing]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer
        .write_record(CSV_HEADERS)
        .context("Failed to write CSV header")?;
    for listing in listings {
        csv_writer
            .serialize(listing)
            .context("Failed to write CSV row")?;
    }
    csv_writer.flush().context("Failed to flush CSV output")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv() {
        let listings = vec![JobListing {
            id: Some("in-1".to_string()),
            site: Some("indeed".to_string()),
            title: Some("Rust, Senior".to_string()),
            min_amount: Some(100000.0),
            description: Some("line one\nline two".to_string()),
            ..JobListing::default()
        }];

        let mut buffer = Vec::new();
        write_csv(&mut buffer, &listings).unwrap();
        let output = String::from_utf8(buffer).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), CSV_HEADERS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "in-1");
        assert_eq!(&rows[0][3], "Rust, Senior");
        assert_eq!(&rows[0][4], "");
        assert_eq!(&rows[0][8], "100000.0");
        assert_eq!(&rows[0][11], "line one\nline two");
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &[]).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap().lines().count(), 1);
    }

    #[test]
    fn test_parse_search_args() {
        let cli = Cli::try_parse_from([
            "jobchat",
            "search",
            "rust developer",
            "--sites",
            "linkedin",
            "--format",
            "csv",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Search {
                query,
                sites,
                format,
                ..
            }) => {
                assert_eq!(query, "rust developer");
                assert_eq!(sites.as_deref(), Some("linkedin"));
                assert_eq!(format, OutputFormat::Csv);
            }
            _ => panic!("expected search command"),
        }
    }

    #[test]
    fn test_serve_overrides() {
        let mut config = AppConfig::default();
        apply_serve_overrides(&mut config, None, Some(8081)).unwrap();
        assert_eq!(config.server.port, 8081);
    }
}
