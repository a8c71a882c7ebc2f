//! Sales aggregates over derived line items.
//!
//! Every function here is pure and independent of input row order except
//! where ties are broken by first-encountered group key. Null group keys land
//! in the [`UNKNOWN_LABEL`] bucket.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use crate::derive::{CANONICAL_DAYS, SalesRecord, day_name};

pub const UNKNOWN_LABEL: &str = "unknown";
pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSeller {
    pub pizza_type_id: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySales {
    pub category: String,
    pub total_sales: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayOrders {
    pub day: &'static str,
    pub orders: usize,
}

/// Sum of line totals; `0.0` (never `-0.0`) for an empty batch.
pub fn total_revenue(records: &[SalesRecord]) -> f64 {
    records.iter().fold(0.0, |acc, r| acc + r.total_price)
}

/// Pizza types ranked by quantity sold, at most `n` entries.
pub fn top_sellers(records: &[SalesRecord], n: usize) -> Vec<TopSeller> {
    let mut ranked = ranked_sums(records, |r| r.pizza_type_id.as_deref(), |r| r.quantity);
    ranked.truncate(n);
    ranked
        .into_iter()
        .map(|(pizza_type_id, quantity)| TopSeller {
            pizza_type_id,
            quantity,
        })
        .collect()
}

/// Distinct order count per hour of day; hours without orders are absent.
pub fn orders_by_hour(records: &[SalesRecord]) -> BTreeMap<u32, usize> {
    let mut orders: BTreeMap<u32, BTreeSet<&str>> = BTreeMap::new();
    for record in records {
        if let (Some(hour), Some(order_id)) = (record.hour, record.order_id.as_deref()) {
            orders.entry(hour).or_default().insert(order_id);
        }
    }
    orders
        .into_iter()
        .map(|(hour, ids)| (hour, ids.len()))
        .collect()
}

pub fn sales_by_category(records: &[SalesRecord]) -> Vec<CategorySales> {
    ranked_sums(records, |r| r.category.as_deref(), |r| r.total_price)
        .into_iter()
        .map(|(category, total_sales)| CategorySales {
            category,
            total_sales,
        })
        .collect()
}

/// Distinct order count for each day, always seven entries Monday→Sunday.
pub fn orders_by_day(records: &[SalesRecord]) -> Vec<DayOrders> {
    let mut orders: HashMap<chrono::Weekday, BTreeSet<&str>> = HashMap::new();
    for record in records {
        if let (Some(day), Some(order_id)) = (record.weekday, record.order_id.as_deref()) {
            orders.entry(day).or_default().insert(order_id);
        }
    }
    CANONICAL_DAYS
        .iter()
        .map(|day| DayOrders {
            day: day_name(*day),
            orders: orders.get(day).map_or(0, BTreeSet::len),
        })
        .collect()
}

pub fn distinct_orders(records: &[SalesRecord]) -> usize {
    records
        .iter()
        .filter_map(|r| r.order_id.as_deref())
        .collect::<BTreeSet<_>>()
        .len()
}

/// Sums `value` per group in first-encountered order, then sorts descending.
/// The sort is stable, so equal sums keep their encounter order.
fn ranked_sums<K, V>(records: &[SalesRecord], key: K, value: V) -> Vec<(String, f64)>
where
    K: Fn(&SalesRecord) -> Option<&str>,
    V: Fn(&SalesRecord) -> f64,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, f64)> = Vec::new();
    for record in records {
        let label = key(record).unwrap_or(UNKNOWN_LABEL);
        let slot = *positions.entry(label).or_insert_with(|| {
            groups.push((label.to_string(), 0.0));
            groups.len() - 1
        });
        groups[slot].1 += value(record);
    }
    groups.sort_by(|a, b| b.1.total_cmp(&a.1));
    groups
}

/// All five aggregates, computed once per run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesSummary {
    pub line_items: usize,
    pub distinct_orders: usize,
    pub total_revenue: f64,
    pub top_sellers: Vec<TopSeller>,
    pub orders_by_hour: BTreeMap<u32, usize>,
    pub sales_by_category: Vec<CategorySales>,
    pub orders_by_day: Vec<DayOrders>,
}

impl SalesSummary {
    pub fn compute(records: &[SalesRecord], top_n: usize) -> Self {
        Self {
            line_items: records.len(),
            distinct_orders: distinct_orders(records),
            total_revenue: total_revenue(records),
            top_sellers: top_sellers(records, top_n),
            orders_by_hour: orders_by_hour(records),
            sales_by_category: sales_by_category(records),
            orders_by_day: orders_by_day(records),
        }
    }
}
