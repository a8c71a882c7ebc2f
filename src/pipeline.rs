//! End-to-end analysis: load → join → reconcile → derive → aggregate →
//! recommend. Each stage consumes only the previous stage's output.

use log::info;

use crate::{
    aggregate::{self, DEFAULT_TOP_N, SalesSummary},
    derive::{DateErrorPolicy, Derivation, derive_records},
    error::PipelineResult,
    frame::Frame,
    join::join_sources,
    loader::{LoadOptions, SourcePaths, Sources, load_sources},
    recommend::{Recommendations, TOP_SELLER_PICKS},
    reconcile::{Reconciliation, SchemaReconciler},
};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub load: LoadOptions,
    pub top_n: usize,
    pub date_policy: DateErrorPolicy,
    pub reconciler: SchemaReconciler,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            load: LoadOptions::default(),
            top_n: DEFAULT_TOP_N,
            date_policy: DateErrorPolicy::default(),
            reconciler: SchemaReconciler::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub joined: Frame,
    pub reconciliation: Reconciliation,
    pub derivation: Derivation,
    pub summary: SalesSummary,
    pub recommendations: Recommendations,
}

pub fn run(paths: &SourcePaths, options: &PipelineOptions) -> PipelineResult<Analysis> {
    let sources = load_sources(paths, &options.load)?;
    analyze(&sources, options)
}

pub fn analyze(sources: &Sources, options: &PipelineOptions) -> PipelineResult<Analysis> {
    let joined = join_sources(sources);
    let (joined, reconciliation) = options.reconciler.reconcile(&joined)?;
    let derivation = derive_records(&joined, options.date_policy)?;
    let records = &derivation.records;

    let summary = SalesSummary::compute(records, options.top_n);
    let picks = aggregate::top_sellers(records, TOP_SELLER_PICKS.max(options.top_n));
    let recommendations = Recommendations::from_aggregates(
        &picks,
        &summary.orders_by_hour,
        &summary.sales_by_category,
        &summary.orders_by_day,
    );
    info!(
        "Analyzed {} line item(s) across {} order(s); revenue {:.2}",
        summary.line_items, summary.distinct_orders, summary.total_revenue
    );

    Ok(Analysis {
        joined,
        reconciliation,
        derivation,
        summary,
        recommendations,
    })
}
