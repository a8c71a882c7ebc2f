use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{
    aggregate::DEFAULT_TOP_N,
    derive::DateErrorPolicy,
    io_utils,
    loader::{LoadOptions, SourcePaths},
    pipeline::PipelineOptions,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Analyze pizza sales CSV datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print total revenue, per-aggregate listings, and recommendations
    Report(ReportArgs),
    /// Emit chart descriptors for top sellers, hours, categories, and days as JSON
    Charts(ChartsArgs),
    /// Emit all aggregates and recommendations as JSON
    Summary(SummaryArgs),
    /// List the columns of each source and of the reconciled joined table
    Columns(InputArgs),
}

#[derive(Debug, Args)]
pub struct InputArgs {
    /// Directory holding pizzas.csv, pizza_types.csv, orders.csv, and order_details.csv
    #[arg(short = 'd', long = "data-dir", default_value = ".")]
    pub data_dir: PathBuf,
    /// Pizza catalog file (overrides --data-dir)
    #[arg(long)]
    pub pizzas: Option<PathBuf>,
    /// Pizza type catalog file (overrides --data-dir)
    #[arg(long = "pizza-types")]
    pub pizza_types: Option<PathBuf>,
    /// Orders file (overrides --data-dir)
    #[arg(long)]
    pub orders: Option<PathBuf>,
    /// Order line items file (overrides --data-dir)
    #[arg(long = "order-details")]
    pub order_details: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to latin1)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

impl InputArgs {
    pub fn source_paths(&self) -> SourcePaths {
        let defaults = SourcePaths::in_dir(&self.data_dir);
        SourcePaths {
            pizzas: self.pizzas.clone().unwrap_or(defaults.pizzas),
            pizza_types: self.pizza_types.clone().unwrap_or(defaults.pizza_types),
            orders: self.orders.clone().unwrap_or(defaults.orders),
            order_details: self.order_details.clone().unwrap_or(defaults.order_details),
        }
    }

    pub fn load_options(&self) -> Result<LoadOptions> {
        Ok(LoadOptions {
            delimiter: self.delimiter,
            encoding: io_utils::resolve_encoding(self.input_encoding.as_deref())?,
        })
    }
}

#[derive(Debug, Args)]
pub struct AnalysisArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Number of top-selling pizza types to list
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,
    /// Log and skip orders with unparsable date/time instead of aborting
    #[arg(long = "skip-bad-dates")]
    pub skip_bad_dates: bool,
}

impl AnalysisArgs {
    pub fn pipeline_options(&self) -> Result<PipelineOptions> {
        Ok(PipelineOptions {
            load: self.input.load_options()?,
            top_n: self.top,
            date_policy: if self.skip_bad_dates {
                DateErrorPolicy::Skip
            } else {
                DateErrorPolicy::Abort
            },
            ..PipelineOptions::default()
        })
    }
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum ChartFormat {
    /// Renderer-neutral descriptors
    #[default]
    Descriptor,
    /// Chart.js configuration objects
    Chartjs,
}

#[derive(Debug, Args)]
pub struct ChartsArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
    /// Shape of the emitted chart JSON
    #[arg(long, value_enum, default_value = "descriptor")]
    pub format: ChartFormat,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub analysis: AnalysisArgs,
    /// Output file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
