//! Process command - extract data from a single LV file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;
use tracing::{debug, info};

use lvx_core::lv::rules::format_german_decimal;
use lvx_core::{extract_document, Extraction, MetadataField};

use super::config::load_config;
use super::read_pages;

/// Tolerance for total = quantity × unit price checks.
const PRICE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output of the whole extraction
    Json,
    /// CSV output of the position table
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading pages...");
    pb.set_position(10);
    let pages = read_pages(&args.input)?;

    pb.set_message("Extracting LV data...");
    pb.set_position(50);
    let extraction = extract_document(&pages, &config)?;

    pb.finish_and_clear();

    if args.validate {
        let issues = validate(&extraction);
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_extraction(&extraction, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Problems a reviewer should look at: missing key fields and positions
/// whose total does not match quantity × unit price.
pub fn validate(extraction: &Extraction) -> Vec<String> {
    let mut issues: Vec<String> = [
        MetadataField::ProjectName,
        MetadataField::IssueDate,
        MetadataField::Client,
    ]
    .into_iter()
    .filter(|field| !extraction.metadata.is_found(*field))
    .map(|field| format!("Missing {}", field.label()))
    .collect();

    if extraction.positions.is_empty() {
        issues.push("No positions found".to_string());
    }

    issues.extend(extraction.positions.validate(PRICE_TOLERANCE));
    issues
}

pub fn format_extraction(extraction: &Extraction, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(extraction)?),
        OutputFormat::Csv => format_csv(extraction),
        OutputFormat::Text => Ok(format_text(extraction)),
    }
}

fn format_csv(extraction: &Extraction) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "position_number",
        "level",
        "description",
        "quantity",
        "unit",
        "unit_price",
        "total_price",
        "page",
    ])?;

    let number = |value: Option<Decimal>| value.map(|v| v.to_string()).unwrap_or_default();

    for position in &extraction.positions {
        wtr.write_record([
            position.position_number.clone(),
            position.level.to_string(),
            position.description.clone(),
            number(position.quantity),
            position.unit.clone().unwrap_or_default(),
            number(position.unit_price),
            number(position.total_price),
            position.page.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(extraction: &Extraction) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Project: {}\n",
        extraction.metadata.project_name().unwrap_or("-")
    ));
    if let Some(lv) = &extraction.header.lv {
        output.push_str(&format!("LV: {}\n", lv));
    }
    if let Some(company) = &extraction.header.company {
        output.push_str(&format!("Company: {}\n", company));
    }
    output.push_str(&format!("Pages: {}\n", extraction.page_count));
    output.push('\n');

    output.push_str("Metadata:\n");
    for (field, value) in extraction.metadata.iter() {
        if let Some(value) = value {
            output.push_str(&format!("  {}: {}\n", field.label(), value));
        }
    }
    output.push('\n');

    output.push_str(&format!("Positions: {}\n", extraction.positions.len()));
    for position in &extraction.positions {
        let indent = "  ".repeat(position.level as usize);
        output.push_str(&format!(
            "{}{} {}",
            indent, position.position_number, position.description
        ));
        if let (Some(quantity), Some(unit)) = (position.quantity, &position.unit) {
            output.push_str(&format!(" [{} {}]", quantity, unit));
        }
        if let Some(total) = position.total_price {
            output.push_str(&format!(" = {}", format_german_decimal(total)));
        }
        output.push('\n');
    }
    output.push('\n');

    match extraction.positions.total_price() {
        Some(total) => output.push_str(&format!("Total: {}\n", format_german_decimal(total))),
        None => output.push_str("Total: out of range\n"),
    }

    if !extraction.warnings.is_empty() {
        output.push_str(&format!("Warnings: {}\n", extraction.warnings.len()));
    }

    output
}
