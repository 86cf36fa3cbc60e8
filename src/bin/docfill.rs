//! Ask for invoice details, fill a `.docx` template, and write the result.

use anyhow::{Context, Result, bail};
use clap::Parser;
use docfill::billing::{FieldsConfig, StdioPrompter, generate_invoice, write_sample_config};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "docfill", version, about = "Ask, fill, and export .docx invoices from a template")]
struct Args {
    /// Path to the .docx template with placeholders
    #[arg(long)]
    template: Option<PathBuf>,

    /// Path to the field configuration
    #[arg(long, default_value = "fields.json")]
    config: PathBuf,

    /// Output .docx path; built from the answers when omitted
    #[arg(long)]
    out: Option<PathBuf>,

    /// Write a sample field configuration to this path and exit
    #[arg(long, value_name = "PATH")]
    write_sample_config: Option<PathBuf>,

    /// Log more (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::builder()
        .filter_level(level)
        .parse_default_env()
        .init();

    if let Some(path) = &args.write_sample_config {
        write_sample_config(path)
            .with_context(|| format!("failed to write sample config to {}", path.display()))?;
        println!("Wrote sample config to {}", path.display());
        return Ok(());
    }

    let Some(template) = &args.template else {
        bail!("--template is required unless using --write-sample-config");
    };

    let config = FieldsConfig::load(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;
    let today = chrono::Local::now().date_naive();

    let invoice = generate_invoice(
        template,
        &config,
        args.out.as_deref(),
        &mut StdioPrompter::stdio(),
        today,
    )
    .with_context(|| format!("failed to fill {}", template.display()))?;

    println!("\nDone. Wrote: {}", invoice.path.display());
    Ok(())
}
