use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use docx_shrink::constants::DEFAULT_OUTPUT_PATH;
use docx_shrink::{SearchOrder, ShrinkOptions, ShrinkOutcome};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "docx-shrink",
    about = "Shrink a Word document until it fits in a number of pages",
    version
)]
struct Cli {
    /// Input .docx file
    input: PathBuf,

    /// Page count to reach
    target_pages: usize,

    /// Output .docx file (also used for intermediate attempts)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Options file (JSON); flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Highest column count to try
    #[arg(long)]
    max_columns: Option<u8>,

    /// Which axis the outer search loop runs over
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    /// Office executable used to render PDFs
    #[arg(long)]
    converter: Option<PathBuf>,

    /// Render timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrderArg {
    LevelMajor,
    ColumnMajor,
}

impl From<OrderArg> for SearchOrder {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::LevelMajor => Self::LevelMajor,
            OrderArg::ColumnMajor => Self::ColumnMajor,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Missing arguments only print usage
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.kind() == ErrorKind::MissingRequiredArgument => {
            err.print()?;
            return Ok(());
        }
        Err(err) => err.exit(),
    };

    let mut options = match &cli.config {
        Some(path) => ShrinkOptions::load(path)
            .await
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => ShrinkOptions::default(),
    };
    if let Some(max_columns) = cli.max_columns {
        options.max_columns = max_columns;
    }
    if let Some(order) = cli.order {
        options.order = order.into();
    }
    if let Some(converter) = cli.converter {
        options.render.converter = converter;
    }
    if let Some(timeout) = cli.timeout {
        options.render.timeout_secs = timeout;
    }

    let report = docx_shrink::shrink_to_pages(
        &cli.input,
        cli.target_pages,
        &cli.output,
        &options,
        |attempt| println!("Trying {}: {} pages", attempt.strategy, attempt.pages),
    )
    .await
    .with_context(|| format!("Failed to shrink {}", cli.input.display()))?;

    match report.outcome {
        ShrinkOutcome::Success { pages, strategy } => {
            println!(
                "Shrunk to {} pages ({}) → {}",
                pages,
                strategy,
                cli.output.display()
            );
        }
        ShrinkOutcome::Exhausted => {
            println!(
                "Could not reach {} pages after {} strategies",
                cli.target_pages,
                report.attempts.len()
            );
            if let Some(pages) = report.last_pages() {
                println!("  Last attempt: {} pages → {}", pages, cli.output.display());
            }
        }
    }

    Ok(())
}
