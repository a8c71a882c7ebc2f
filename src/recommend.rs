//! Threshold-based business recommendations derived from the aggregates.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::Serialize;

use crate::aggregate::{CategorySales, DayOrders, TopSeller};

/// Hours whose order count reaches this share of the busiest hour are "peak".
pub const PEAK_HOUR_THRESHOLD: f64 = 0.8;
pub const TOP_SELLER_PICKS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakWindow {
    pub start: u32,
    pub end: u32,
    pub hours: Vec<u32>,
    /// False when the selected hours leave a gap between `start` and `end`.
    pub contiguous: bool,
}

impl PeakWindow {
    pub fn label(&self) -> String {
        format!("{:02}:00-{:02}:59", self.start, self.end)
    }
}

pub fn peak_hour_window(orders_by_hour: &BTreeMap<u32, usize>) -> Option<PeakWindow> {
    let max = orders_by_hour.values().copied().max().filter(|max| *max > 0)?;
    let threshold = max as f64 * PEAK_HOUR_THRESHOLD;
    let hours = orders_by_hour
        .iter()
        .filter(|(_, count)| **count as f64 >= threshold)
        .map(|(hour, _)| *hour)
        .collect::<Vec<_>>();
    let start = *hours.first()?;
    let end = *hours.last()?;
    let contiguous = hours.iter().tuple_windows().all(|(a, b)| *b == a + 1);
    Some(PeakWindow {
        start,
        end,
        hours,
        contiguous,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendations {
    pub peak_hours: Option<PeakWindow>,
    pub top_sellers: Vec<TopSeller>,
    pub top_category: Option<CategorySales>,
    pub peak_day: Option<DayOrders>,
}

impl Recommendations {
    pub fn from_aggregates(
        top_sellers: &[TopSeller],
        orders_by_hour: &BTreeMap<u32, usize>,
        sales_by_category: &[CategorySales],
        orders_by_day: &[DayOrders],
    ) -> Self {
        let top_category = sales_by_category
            .iter()
            .fold(None::<&CategorySales>, |best, item| match best {
                Some(current) if current.total_sales >= item.total_sales => Some(current),
                _ => Some(item),
            })
            .cloned();
        let peak_day = orders_by_day
            .iter()
            .filter(|day| day.orders > 0)
            .fold(None::<&DayOrders>, |best, item| match best {
                Some(current) if current.orders >= item.orders => Some(current),
                _ => Some(item),
            })
            .cloned();
        Self {
            peak_hours: peak_hour_window(orders_by_hour),
            top_sellers: top_sellers.iter().take(TOP_SELLER_PICKS).cloned().collect(),
            top_category,
            peak_day,
        }
    }

    /// Advisory sentences, one per available insight.
    pub fn advisories(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.top_sellers.is_empty() {
            let names = self
                .top_sellers
                .iter()
                .map(|seller| seller.pizza_type_id.as_str())
                .join(", ");
            lines.push(format!(
                "Focus marketing on the top sellers ({names}) to maximize sales."
            ));
        }
        if let Some(window) = &self.peak_hours {
            let mut line = format!(
                "Target promotions during peak hours {} when order volume is highest.",
                window.label()
            );
            if !window.contiguous {
                line.push_str(&format!(
                    " Note: peak hours are not contiguous ({}).",
                    window.hours.iter().join(", ")
                ));
            }
            lines.push(line);
        }
        if let Some(category) = &self.top_category {
            lines.push(format!(
                "Prioritize the {} category, the top earner at ${:.2} in sales.",
                category.category, category.total_sales
            ));
        }
        if let Some(day) = &self.peak_day {
            lines.push(format!(
                "Schedule extra staff on {}, the busiest day with {} order(s).",
                day.day, day.orders
            ));
        }
        lines.push(
            "Consider analyzing underperforming pizza types for potential menu adjustments."
                .to_string(),
        );
        lines
    }
}
