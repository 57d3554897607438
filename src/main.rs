use car_extract::{
    CsvExtractor, Extractor, JsonExtractor, Loader, NdjsonWriter, Record, SourceFormat,
    XmlExtractor, detect_format,
};
use clap::{Parser, builder::styling};
use eyre::{Context, Result};
use owo_colors::OwoColorize;
use std::path::PathBuf;

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Car Extract: pull car listings out of CSV, JSON and XML files as NDJSON
#[derive(Parser)]
#[command(name = "carx", version, styles = STYLES)]
struct Cli {
    /// A source file, or a directory of source files
    path: PathBuf,

    /// Source format; inferred from the file extension when omitted
    #[arg(short, long, value_enum)]
    format: Option<SourceFormat>,

    /// Write NDJSON records to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// The dotenv file to source settings from
    #[arg(short, long, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match dotenvy::from_filename(&cli.env) {
        Err(e) if !e.not_found() => {
            return Err(e).with_context(|| format!("Failed to load {}", cli.env));
        }
        _ => {}
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let format = detect_format(&cli.path, cli.format)?;
    log::info!(
        "Extracting {} records from {}",
        format.cyan(),
        cli.path.display().bright_black()
    );

    let loader = match &cli.output {
        Some(path) => NdjsonWriter::new(path),
        None => NdjsonWriter::stdout(),
    };

    let count = match format {
        SourceFormat::Csv => extract_and_load(CsvExtractor::new(&cli.path), &loader).await?,
        SourceFormat::Json => extract_and_load(JsonExtractor::new(&cli.path), &loader).await?,
        SourceFormat::Xml => extract_and_load(XmlExtractor::new(&cli.path), &loader).await?,
    };

    match &cli.output {
        Some(output) => log::info!(
            "Wrote {} records to {}",
            count,
            output.display().bright_black()
        ),
        None => log::info!("Wrote {} records", count),
    }

    Ok(())
}

async fn extract_and_load<E, L>(extractor: E, loader: &L) -> Result<usize>
where
    E: Extractor<Item = Record>,
    L: Loader<Item = Record>,
{
    let records = extractor.extract().await?;
    if records.is_empty() {
        log::warn!("No records extracted");
    }
    loader.load(records).await
}
