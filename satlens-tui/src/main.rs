mod tui;

use std::io;
use std::path::{Path, PathBuf};

use arrow::util::pretty::pretty_format_batches;
use clap::{Parser, Subcommand};
use log::warn;
use satlens_common::Config;
use satlens_core::{
    apply_all, read_table, satisfaction_stats, split_outcomes, Renderer, ReportOptions,
    TextRenderer,
};
use tui::chart::TerminalRenderer;
use tui::theme::Theme;

fn parse_bins(s: &str) -> Result<usize, String> { // validate bin count at CLI parse time
    let v: usize = s.parse().map_err(|_| format!("not an integer: {s}"))?;
    if v > 0 { Ok(v) } else { Err("bins must be at least 1".into()) }
}

#[derive(Parser)]
#[command(name = "satlens", version, about = "Customer satisfaction feature explorer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a feature's distribution across satisfied and unsatisfied customers
    Report {
        features: PathBuf,
        #[arg(long)]
        key: String,
        /// Outcome table; split from the features file when omitted
        #[arg(long)]
        outcomes: Option<PathBuf>,
        /// Condition such as "var15 > 30"; repeat to narrow further
        #[arg(long = "filter")]
        filters: Vec<String>,
        #[arg(long, value_parser = parse_bins)]
        bins: Option<usize>,
        /// Print bars to stdout instead of opening the terminal chart
        #[arg(long)]
        text: bool,
    },
    /// Print the rows matching every condition
    Filter {
        path: PathBuf,
        #[arg(required = true)]
        conditions: Vec<String>,
    },
    /// List column names and types
    Columns { path: PathBuf },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_else(|e| {
        warn!("config not loaded ({e}), using defaults");
        Config::default()
    });
    match cli.command {
        Commands::Report { features, key, outcomes, filters, bins, text } => {
            run_report(&features, outcomes.as_deref(), &key, &filters, bins, text, &config)?
        }
        Commands::Filter { path, conditions } => run_filter(&path, &conditions, &config)?,
        Commands::Columns { path } => run_columns(&path)?,
    }
    Ok(())
}

fn run_report(
    features_path: &Path,
    outcomes_path: Option<&Path>,
    key: &str,
    filters: &[String],
    bins: Option<usize>,
    text: bool,
    config: &Config,
) -> anyhow::Result<()> {
    let mut opts = ReportOptions::from(config.report.clone());
    if let Some(b) = bins {
        opts.bins = b;
    }
    let table = read_table(features_path)?;
    let (features, outcomes) = match outcomes_path {
        Some(p) => (table, read_table(p)?),
        None => split_outcomes(&table, &opts.outcome_column)?,
    };
    let mut renderer: Box<dyn Renderer> = if text {
        Box::new(TextRenderer::new(io::stdout()))
    } else {
        Box::new(TerminalRenderer::new(Theme::from_name(&config.display.theme)))
    };
    let figure = satisfaction_stats(&features, &outcomes, key, filters, &opts, renderer.as_mut())?;
    if !text {
        println!("{}", figure.title);
        println!("{:<16} {}", "bins:", figure.bin_count);
        println!("{:<16} {:?}", "series sizes:", figure.series_totals);
    }
    Ok(())
}

fn run_filter(path: &Path, conditions: &[String], config: &Config) -> anyhow::Result<()> {
    let table = read_table(path)?;
    let matched = apply_all(&table, conditions)?;
    let shown = matched.num_rows().min(config.display.max_rows_preview);
    println!("{}", pretty_format_batches(&[matched.slice(0, shown)])?);
    println!("{:<16} {} of {}", "matched:", matched.num_rows(), table.num_rows());
    if shown < matched.num_rows() {
        println!("{:<16} first {shown} rows (display.max_rows_preview)", "showing:");
    }
    Ok(())
}

fn run_columns(path: &Path) -> anyhow::Result<()> {
    let table = read_table(path)?;
    for field in table.schema().fields() {
        println!("{:<32} {}", field.name(), field.data_type());
    }
    println!("{:<32} {}", "rows:", table.num_rows());
    Ok(())
}
