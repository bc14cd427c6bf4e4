use clap::Parser;
use engagement_heatmap::{ChartStyle, HeatmapBuilder, DEFAULT_OUTPUT, DEFAULT_SEED};
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a correlation heatmap of synthetic customer-engagement metrics", long_about = None)]
struct Cli {
    /// Path of the PNG to write (overwritten if it exists)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Seed for the synthetic table
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Path to a JSON chart style; omitted fields keep their defaults
    #[arg(long)]
    style: Option<PathBuf>,

    /// Print the correlation matrix as a table
    #[arg(long)]
    summary: bool,

    /// Path to export the correlation matrix as JSON
    #[arg(long)]
    output_json: Option<PathBuf>,

    /// Path to export the correlation matrix as Markdown
    #[arg(long)]
    output_markdown: Option<PathBuf>,

    /// Path to export the synthetic table as CSV
    #[arg(long)]
    output_csv: Option<PathBuf>,
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut builder = HeatmapBuilder::new().seed(cli.seed).output(&cli.output);
    if let Some(path) = &cli.style {
        builder = builder.style(ChartStyle::from_json_file(path)?);
    }
    let report = builder.run()?;

    if cli.summary {
        report.matrix().summary();
    }
    if let Some(path) = cli.output_json {
        std::fs::write(path, report.matrix().to_json()?)?;
    }
    if let Some(path) = cli.output_markdown {
        std::fs::write(path, report.matrix().to_markdown())?;
    }
    if let Some(path) = cli.output_csv {
        report.write_table_csv(path)?;
    }

    println!("{}", report.confirmation());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
