mod clean;
mod config;
mod output;
mod parser;
mod pdf;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::Config;
use crate::parser::patterns::PatternSet;

#[derive(Parser)]
#[command(name = "probex", about = "Extract numbered problems and explanations from workbook PDFs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract problems from a PDF into a CSV file
    Extract {
        /// The input PDF file
        pdf: PathBuf,
        /// The output CSV file (".csv" appended when missing)
        output: PathBuf,
        /// Pattern configuration file
        #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Fail on text the patterns cannot place instead of skipping it
        #[arg(long)]
        strict: bool,
        /// Max pages to process (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the first extracted records as JSON
    Preview {
        /// The input PDF file
        pdf: PathBuf,
        /// Pattern configuration file
        #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Fail on text the patterns cannot place instead of skipping it
        #[arg(long)]
        strict: bool,
        /// Max records to print
        #[arg(short = 'n', long, default_value = "5")]
        limit: usize,
    },
    /// Validate a pattern configuration file
    CheckConfig {
        /// Pattern configuration file
        #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract { pdf, output, config, strict, limit } => {
            extract(&pdf, &output, &config, strict, limit)
        }
        Commands::Preview { pdf, config, strict, limit } => preview(&pdf, &config, strict, limit),
        Commands::CheckConfig { config } => check_config(&config),
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn load_patterns(path: &Path, strict: bool) -> Result<PatternSet> {
    let mut config = Config::load(path)?;
    config.strict |= strict;
    PatternSet::compile(&config)
}

fn extract(
    pdf_path: &Path,
    output_path: &Path,
    config_path: &Path,
    strict: bool,
    limit: Option<usize>,
) -> Result<()> {
    let patterns = load_patterns(config_path, strict)?;

    println!("Step 1/3: Extracting text from {}...", pdf_path.display());
    let pages = pdf::extract_pages(pdf_path)?;
    if pages.iter().all(|page| page.trim().is_empty()) {
        println!("No text could be extracted from the PDF.");
        return Ok(());
    }
    let total = limit.map_or(pages.len(), |n| n.min(pages.len()));

    println!("Step 2/3: Analyzing {} pages...", total);
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} pages")?
            .progress_chars("=> "),
    );
    let cleaned = pages
        .into_iter()
        .take(total)
        .map(|page| clean::prepare_page(&page));
    let records = parser::extract_problems(&patterns, pb.wrap_iter(cleaned));

    println!("Step 3/3: Writing {}...", output_path.display());
    let (written_path, stats) = output::write_csv(output_path, records)?;
    pb.finish_and_clear();

    println!(
        "Saved {} problems ({} with sub-items) to {}.",
        stats.records,
        stats.with_items,
        written_path.display()
    );
    Ok(())
}

fn preview(pdf_path: &Path, config_path: &Path, strict: bool, limit: usize) -> Result<()> {
    let patterns = load_patterns(config_path, strict)?;
    let pages = pdf::extract_pages(pdf_path)?;
    let cleaned = pages.into_iter().map(|page| clean::prepare_page(&page));

    let mut shown = 0usize;
    for record in parser::extract_problems(&patterns, cleaned).take(limit) {
        println!("{}", serde_json::to_string_pretty(&record?)?);
        shown += 1;
    }
    if shown == 0 {
        println!("No problems matched. Check the pattern configuration.");
    }
    Ok(())
}

fn check_config(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)?;
    PatternSet::compile(&config)?;
    println!("OK: {} is valid.", config_path.display());
    Ok(())
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
