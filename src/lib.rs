pub mod aggregate;
pub mod chart;
pub mod cli;
pub mod derive;
pub mod error;
pub mod frame;
pub mod io_utils;
pub mod join;
pub mod loader;
pub mod pipeline;
pub mod recommend;
pub mod reconcile;
pub mod report;
pub mod table;

use std::{env, io::Write, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{AnalysisArgs, ChartFormat, Cli, Commands},
    loader::SourceKind,
    pipeline::Analysis,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("pizza_sales", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Report(args) => handle_report(&args),
        Commands::Charts(args) => handle_charts(&args),
        Commands::Summary(args) => handle_summary(&args),
        Commands::Columns(args) => handle_columns(&args),
    }
}

fn analyze(args: &AnalysisArgs) -> Result<Analysis> {
    let paths = args.input.source_paths();
    let options = args.pipeline_options()?;
    debug!("Source paths: {paths:?}");
    pipeline::run(&paths, &options).with_context(|| {
        format!("Analyzing pizza sales from {:?}", args.input.data_dir)
    })
}

fn handle_report(args: &cli::ReportArgs) -> Result<()> {
    let analysis = analyze(&args.analysis)?;
    let text = report::render_report(&analysis.summary, &analysis.recommendations);
    let mut out = io_utils::open_output(args.output.as_deref())?;
    out.write_all(text.as_bytes()).context("Writing report")?;
    out.flush().context("Flushing report")?;
    Ok(())
}

fn handle_charts(args: &cli::ChartsArgs) -> Result<()> {
    let analysis = analyze(&args.analysis)?;
    let charts = chart::build_charts(&analysis.summary);
    let value = match args.format {
        ChartFormat::Descriptor => serde_json::to_value(&charts)?,
        ChartFormat::Chartjs => serde_json::Value::Array(
            charts.iter().map(chart::ChartDescriptor::to_chartjs).collect(),
        ),
    };
    let mut out = io_utils::open_output(args.output.as_deref())?;
    serde_json::to_writer_pretty(&mut out, &value).context("Writing chart JSON")?;
    writeln!(out)?;
    out.flush().context("Flushing chart JSON")?;
    info!("Wrote {} chart descriptor(s)", charts.len());
    Ok(())
}

fn handle_summary(args: &cli::SummaryArgs) -> Result<()> {
    let analysis = analyze(&args.analysis)?;
    let value = serde_json::json!({
        "summary": analysis.summary,
        "recommendations": analysis.recommendations,
        "advisories": analysis.recommendations.advisories(),
        "fill": analysis.derivation.fill,
    });
    let mut out = io_utils::open_output(args.output.as_deref())?;
    serde_json::to_writer_pretty(&mut out, &value).context("Writing summary JSON")?;
    writeln!(out)?;
    out.flush().context("Flushing summary JSON")?;
    Ok(())
}

fn handle_columns(args: &cli::InputArgs) -> Result<()> {
    let paths = args.source_paths();
    let options = args.load_options()?;
    let sources = loader::load_sources(&paths, &options)
        .with_context(|| format!("Loading sources from {:?}", args.data_dir))?;
    let mut out = io_utils::open_output(None)?;
    for kind in SourceKind::ALL {
        writeln!(
            out,
            "Columns in {kind}: {}",
            sources.get(kind).headers().join(", ")
        )?;
    }
    let joined = join::join_sources(&sources);
    writeln!(out, "Columns in joined table: {}", joined.headers().join(", "))?;
    let (reconciled, _) = reconcile::SchemaReconciler::default()
        .reconcile(&joined)
        .context("Reconciling joined schema")?;
    writeln!(
        out,
        "Columns after reconciliation: {}",
        reconciled.headers().join(", ")
    )?;
    Ok(())
}
