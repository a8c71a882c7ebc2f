//! Chart descriptors for an external renderer.
//!
//! A [`ChartDescriptor`] is a renderer-neutral description of one aggregate.
//! [`ChartDescriptor::to_chartjs`] shapes it into a Chart.js configuration
//! object for callers that feed Chart.js directly.

use serde::Serialize;
use serde_json::{Value, json};

use crate::aggregate::SalesSummary;

pub const BAR_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];
pub const LINE_COLOR: &str = "#ff7f0e";
pub const LINE_FILL: &str = "rgba(255, 127, 14, 0.2)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub title: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub x_axis_title: String,
    pub y_axis_title: String,
}

fn bar_colors(count: usize) -> Vec<String> {
    BAR_PALETTE
        .iter()
        .cycle()
        .take(count)
        .map(|c| c.to_string())
        .collect()
}

fn bar_chart(title: &str, x: &str, y: &str, labels: Vec<String>, values: Vec<f64>) -> ChartDescriptor {
    let colors = bar_colors(values.len());
    ChartDescriptor {
        kind: ChartKind::Bar,
        title: title.to_string(),
        labels,
        series: vec![Series {
            name: y.to_string(),
            values,
            colors,
        }],
        x_axis_title: x.to_string(),
        y_axis_title: y.to_string(),
    }
}

pub fn top_sellers_chart(summary: &SalesSummary) -> ChartDescriptor {
    let (labels, values) = summary
        .top_sellers
        .iter()
        .map(|s| (s.pizza_type_id.clone(), s.quantity))
        .unzip();
    bar_chart(
        &format!("Top {} Pizza Types by Quantity Sold", summary.top_sellers.len()),
        "Pizza Type",
        "Quantity Sold",
        labels,
        values,
    )
}

pub fn orders_by_hour_chart(summary: &SalesSummary) -> ChartDescriptor {
    let (labels, values) = summary
        .orders_by_hour
        .iter()
        .map(|(hour, count)| (hour.to_string(), *count as f64))
        .unzip();
    ChartDescriptor {
        kind: ChartKind::Line,
        title: "Orders by Hour of Day".to_string(),
        labels,
        series: vec![Series {
            name: "Number of Orders".to_string(),
            values,
            colors: vec![LINE_COLOR.to_string()],
        }],
        x_axis_title: "Hour".to_string(),
        y_axis_title: "Number of Orders".to_string(),
    }
}

pub fn sales_by_category_chart(summary: &SalesSummary) -> ChartDescriptor {
    let (labels, values) = summary
        .sales_by_category
        .iter()
        .map(|c| (c.category.clone(), round_cents(c.total_sales)))
        .unzip();
    bar_chart("Sales by Pizza Category", "Category", "Total Sales ($)", labels, values)
}

pub fn orders_by_day_chart(summary: &SalesSummary) -> ChartDescriptor {
    let (labels, values) = summary
        .orders_by_day
        .iter()
        .map(|d| (d.day.to_string(), d.orders as f64))
        .unzip();
    bar_chart("Orders by Day of Week", "Day", "Number of Orders", labels, values)
}

/// One descriptor per aggregate, in report order.
pub fn build_charts(summary: &SalesSummary) -> Vec<ChartDescriptor> {
    vec![
        top_sellers_chart(summary),
        orders_by_hour_chart(summary),
        sales_by_category_chart(summary),
        orders_by_day_chart(summary),
    ]
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl ChartDescriptor {
    pub fn to_chartjs(&self) -> Value {
        let datasets = self
            .series
            .iter()
            .map(|series| match self.kind {
                ChartKind::Bar => json!({
                    "label": series.name,
                    "data": series.values,
                    "backgroundColor": series.colors,
                    "borderColor": series.colors,
                    "borderWidth": 1,
                }),
                ChartKind::Line => json!({
                    "label": series.name,
                    "data": series.values,
                    "backgroundColor": LINE_FILL,
                    "borderColor": series.colors.first().map(String::as_str).unwrap_or(LINE_COLOR),
                    "borderWidth": 2,
                    "fill": true,
                    "tension": 0.1,
                }),
            })
            .collect::<Vec<_>>();
        json!({
            "type": self.kind,
            "data": {
                "labels": self.labels,
                "datasets": datasets,
            },
            "options": {
                "scales": {
                    "y": {
                        "beginAtZero": true,
                        "title": { "display": true, "text": self.y_axis_title },
                    },
                    "x": {
                        "title": { "display": true, "text": self.x_axis_title },
                    },
                },
                "plugins": {
                    "title": { "display": true, "text": self.title },
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{DayOrders, TopSeller};
    use std::collections::BTreeMap;

    fn summary() -> SalesSummary {
        SalesSummary {
            line_items: 3,
            distinct_orders: 2,
            total_revenue: 40.0,
            top_sellers: vec![
                TopSeller {
                    pizza_type_id: "bbq_ckn".into(),
                    quantity: 3.0,
                },
                TopSeller {
                    pizza_type_id: "hawaiian".into(),
                    quantity: 1.0,
                },
            ],
            orders_by_hour: BTreeMap::from([(12, 2), (18, 1)]),
            sales_by_category: Vec::new(),
            orders_by_day: vec![DayOrders {
                day: "Monday",
                orders: 2,
            }],
        }
    }

    #[test]
    fn bar_descriptor_colors_each_bar() {
        let chart = top_sellers_chart(&summary());
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.title, "Top 2 Pizza Types by Quantity Sold");
        assert_eq!(chart.labels, ["bbq_ckn", "hawaiian"]);
        assert_eq!(chart.series[0].colors, ["#1f77b4", "#ff7f0e"]);
    }

    #[test]
    fn descriptor_serializes_type_field() {
        let value = serde_json::to_value(orders_by_hour_chart(&summary())).unwrap();
        assert_eq!(value["type"], "line");
        assert_eq!(value["labels"], json!(["12", "18"]));
        assert_eq!(value["series"][0]["values"], json!([2.0, 1.0]));
    }

    #[test]
    fn chartjs_shape_matches_line_layout() {
        let value = orders_by_hour_chart(&summary()).to_chartjs();
        assert_eq!(value["type"], "line");
        assert_eq!(value["data"]["datasets"][0]["borderColor"], LINE_COLOR);
        assert_eq!(value["data"]["datasets"][0]["fill"], true);
        assert_eq!(value["options"]["scales"]["x"]["title"]["text"], "Hour");
        assert_eq!(
            value["options"]["plugins"]["title"]["text"],
            "Orders by Hour of Day"
        );
    }

    #[test]
    fn build_charts_emits_one_per_aggregate() {
        let charts = build_charts(&summary());
        assert_eq!(charts.len(), 4);
        assert_eq!(charts[3].labels, ["Monday"]);
    }
}
