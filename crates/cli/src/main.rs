mod echo;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use sitesift_core::{
    ContentSelector, DEFAULT_CONCURRENCY, DEFAULT_EXPORT_FILENAME, DEFAULT_TIMEOUT_SECS, ExtractionRunner, RunConfig,
    UrlSource,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::echo::{print_banner, print_error, print_info, print_preview, print_step, print_success, print_summary, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Rows echoed to stderr in verbose mode.
const PREVIEW_ROWS: usize = 10;

/// Output format for the result table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: csv, json", s)),
        }
    }
}

impl OutputFormat {
    fn default_path(self) -> PathBuf {
        match self {
            Self::Csv => PathBuf::from(DEFAULT_EXPORT_FILENAME),
            Self::Json => Path::new(DEFAULT_EXPORT_FILENAME).with_extension("json"),
        }
    }
}

/// Fetch pages listed in a sitemap, CSV file or URL list and export the
/// content matched by a CSS selector
#[derive(Parser, Debug)]
#[command(name = "sitesift")]
#[command(version)]
#[command(about = "Extract CSS-selected content from lists of web pages", long_about = None)]
struct Args {
    /// Page URLs to process
    #[arg(value_name = "URL", conflicts_with_all = ["sitemap", "csv", "urls"])]
    url: Vec<String>,

    /// Read page URLs from this sitemap
    #[arg(long, value_name = "URL", conflicts_with_all = ["csv", "urls"])]
    sitemap: Option<String>,

    /// Read page URLs from the "URL" column of a CSV file
    #[arg(long, value_name = "FILE", conflicts_with = "urls")]
    csv: Option<PathBuf>,

    /// Read page URLs, one per line, from a file or "-" for stdin
    #[arg(long, value_name = "FILE")]
    urls: Option<String>,

    /// CSS selector applied to every page
    #[arg(short, long, value_name = "CSS", required_unless_present_any = ["list_urls", "completions"])]
    selector: Option<String>,

    /// Print the resolved URLs and exit without fetching pages
    #[arg(long)]
    list_urls: bool,

    /// Output file, or "-" for stdout (default: extracted_content.csv / .json)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (csv, json)
    #[arg(short, long, default_value = "csv", value_name = "FORMAT")]
    format: OutputFormat,

    /// Number of pages fetched at the same time
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_name = "NUM")]
    concurrency: usize,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn source(&self) -> anyhow::Result<Option<UrlSource>> {
        if let Some(sitemap) = &self.sitemap {
            return Ok(Some(UrlSource::Sitemap(sitemap.clone())));
        }
        if let Some(path) = &self.csv {
            return Ok(Some(UrlSource::CsvFile(path.clone())));
        }
        if let Some(path) = &self.urls {
            let source =
                UrlSource::manual_from_path(path).with_context(|| format!("Failed to read URL list: {}", path))?;
            return Ok(Some(source));
        }
        if !self.url.is_empty() {
            return Ok(Some(UrlSource::Manual(self.url.join("\n"))));
        }
        Ok(None)
    }

    fn run_config(&self) -> RunConfig {
        let builder = RunConfig::builder().concurrency(self.concurrency).timeout(self.timeout);
        match &self.user_agent {
            Some(ua) => builder.user_agent(ua.clone()).build(),
            None => builder.build(),
        }
    }
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "warn,sitesift_core=debug,sitesift=debug" } else { "warn" }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn write_output(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(data).context("Failed to write to stdout")?;
        stdout.flush().context("Failed to write to stdout")?;
    } else {
        fs::write(path, data).with_context(|| format!("Failed to write to file: {}", path.display()))?;
        print_success(&format!("Output written to {}", path.display().bright_white()));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "sitesift", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let Some(source) = args.source()? else {
        bail!("No URL source given: pass URLs, --sitemap, --csv or --urls");
    };

    let selector = match &args.selector {
        Some(s) if !args.list_urls => Some(ContentSelector::parse(s).context("Failed to compile selector")?),
        _ => None,
    };

    let config = args.run_config();
    debug!(concurrency = config.concurrency, timeout = config.fetch.timeout, "run configuration");
    let runner = ExtractionRunner::new(config).context("Failed to build HTTP client")?;

    if args.verbose {
        print_step(1, 3, &format!("Loading URLs from {}", source.label()));
    }

    let urls = match source.resolve(runner.client(), &runner.config().fetch).await {
        Ok(urls) => urls,
        Err(e) if matches!(source, UrlSource::Sitemap(_)) => {
            print_error(&format!("Error fetching sitemap: {}", e));
            Vec::new()
        }
        Err(e) => return Err(e).with_context(|| format!("Failed to load URLs from {}", source.label())),
    };

    print_info(&format!("Loaded {} URLs from {}.", urls.len(), source.label()));

    if args.list_urls {
        let mut stdout = io::stdout().lock();
        for url in &urls {
            writeln!(stdout, "{}", url).context("Failed to write to stdout")?;
        }
        return Ok(());
    }

    let Some(selector) = selector else {
        bail!("A selector is required to extract content");
    };

    if urls.is_empty() {
        print_warning("No URLs to process");
        return Ok(());
    }

    if args.verbose {
        print_step(
            2,
            3,
            &format!(
                "Extracting {} from {} pages with {} workers",
                selector.as_str().bright_white(),
                urls.len(),
                runner.config().concurrency
            ),
        );
    }

    let started = Instant::now();
    let table = runner.run_with(&urls, &selector).await;
    let elapsed = started.elapsed();

    if args.verbose {
        print_preview(&table, PREVIEW_ROWS);
    }

    print_summary(&table.counts(), elapsed);

    if args.verbose {
        print_step(3, 3, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    let data = match args.format {
        OutputFormat::Csv => table.to_csv().context("Failed to encode CSV")?,
        OutputFormat::Json => {
            let mut json = table.to_json(true).context("Failed to encode JSON")?;
            json.push('\n');
            json.into_bytes()
        }
    };

    let path = args.output.clone().unwrap_or_else(|| args.format.default_path());
    write_output(&path, &data)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("CSV".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(OutputFormat::Csv.default_path(), PathBuf::from("extracted_content.csv"));
        assert_eq!(OutputFormat::Json.default_path(), PathBuf::from("extracted_content.json"));
    }

    #[test]
    fn test_default_filter_shows_warnings() {
        assert_eq!(default_filter(false), "warn");
        assert!(default_filter(true).contains("sitesift_core=debug"));
    }

    #[test]
    fn test_args_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_positional_urls_become_manual_source() {
        let args = Args::parse_from(["sitesift", "-s", "h1", "https://a.test/1", "https://a.test/2"]);
        let source = args.source().unwrap().unwrap();
        assert_eq!(source, UrlSource::Manual("https://a.test/1\nhttps://a.test/2".to_string()));
    }

    #[test]
    fn test_run_config_from_args() {
        let args = Args::parse_from(["sitesift", "-s", "h1", "--concurrency", "2", "--timeout", "4", "https://a.test"]);
        let config = args.run_config();
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.fetch.timeout, 4);
    }

    #[test]
    fn test_sources_conflict() {
        let result = Args::try_parse_from(["sitesift", "-s", "h1", "--sitemap", "https://a.test/s.xml", "--csv", "x.csv"]);
        assert!(result.is_err());
    }
}
