//! Plain-text sales report.

use std::fmt::Write as _;

use crate::{
    aggregate::SalesSummary,
    recommend::Recommendations,
    table::{Align, TextTable},
};

pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub fn format_currency(value: f64) -> String {
    format!("${value:.2}")
}

pub fn top_sellers_table(summary: &SalesSummary) -> TextTable {
    let mut table = TextTable::new(&[("pizza_type_id", Align::Left), ("quantity", Align::Right)]);
    for seller in &summary.top_sellers {
        table.push(vec![
            seller.pizza_type_id.clone(),
            format_quantity(seller.quantity),
        ]);
    }
    table
}

pub fn orders_by_hour_table(summary: &SalesSummary) -> TextTable {
    let mut table = TextTable::new(&[("hour", Align::Right), ("orders", Align::Right)]);
    for (hour, orders) in &summary.orders_by_hour {
        table.push(vec![hour.to_string(), orders.to_string()]);
    }
    table
}

pub fn sales_by_category_table(summary: &SalesSummary) -> TextTable {
    let mut table = TextTable::new(&[("category", Align::Left), ("total_sales", Align::Right)]);
    for category in &summary.sales_by_category {
        table.push(vec![
            category.category.clone(),
            format!("{:.2}", category.total_sales),
        ]);
    }
    table
}

pub fn orders_by_day_table(summary: &SalesSummary) -> TextTable {
    let mut table = TextTable::new(&[("day", Align::Left), ("orders", Align::Right)]);
    for day in &summary.orders_by_day {
        table.push(vec![day.day.to_string(), day.orders.to_string()]);
    }
    table
}

pub fn render_report(summary: &SalesSummary, recommendations: &Recommendations) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Total Revenue: {}", format_currency(summary.total_revenue));
    let _ = writeln!(
        out,
        "Line Items: {}  Orders: {}",
        summary.line_items, summary.distinct_orders
    );

    let sections = [
        (
            format!("Top {} Pizza Types by Quantity Sold", summary.top_sellers.len()),
            top_sellers_table(summary),
        ),
        ("Orders by Hour of Day".to_string(), orders_by_hour_table(summary)),
        ("Sales by Category".to_string(), sales_by_category_table(summary)),
        ("Orders by Day of Week".to_string(), orders_by_day_table(summary)),
    ];
    for (title, table) in sections {
        let _ = writeln!(out, "\n{title}:");
        out.push_str(&table.render());
    }

    let _ = writeln!(out, "\nBusiness Recommendations:");
    for (idx, line) in recommendations.advisories().iter().enumerate() {
        let _ = writeln!(out, "{}. {line}", idx + 1);
    }
    out
}
