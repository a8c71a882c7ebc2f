//! Derivation stage: typed line-item records from the reconciled frame.
//!
//! Turns textual cells into [`SalesRecord`]s, combining each order's date
//! and time into one timestamp, applying the missing-value fill policy, and
//! computing `total_price`. The fill values are computed once over the whole
//! frame before any line total is produced.

use anyhow::{Result, anyhow};
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use log::{info, warn};
use serde::Serialize;

use crate::{
    error::{PipelineError, PipelineResult},
    frame::Frame,
    join::{ORDER_ID, PIZZA_ID, PIZZA_TYPE_ID},
    reconcile::{CATEGORY_COLUMN, PRICE_COLUMN, normalize_key},
};

pub const QUANTITY_COLUMN: &str = "quantity";
pub const ORDER_DETAILS_ID_COLUMN: &str = "order_details_id";
pub const DATE_COLUMN: &str = "date";
pub const TIME_COLUMN: &str = "time";
pub const NAME_COLUMN: &str = "name";
pub const SIZE_COLUMN: &str = "size";

pub const DEFAULT_QUANTITY: f64 = 1.0;

/// Monday through Sunday.
pub const CANONICAL_DAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// How an unparsable order date/time is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateErrorPolicy {
    /// Fail the run with [`PipelineError::DateParse`].
    #[default]
    Abort,
    /// Log the record and leave its timestamp unknown.
    Skip,
}

/// One order line item after joins, reconciliation, and derivation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesRecord {
    pub order_details_id: Option<String>,
    pub order_id: Option<String>,
    pub pizza_id: Option<String>,
    pub pizza_type_id: Option<String>,
    pub name: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub quantity: f64,
    pub price: f64,
    pub quantity_filled: bool,
    pub price_filled: bool,
    pub timestamp: Option<NaiveDateTime>,
    pub hour: Option<u32>,
    #[serde(serialize_with = "serialize_weekday")]
    pub weekday: Option<Weekday>,
    pub total_price: f64,
}

impl SalesRecord {
    pub fn day_name(&self) -> Option<&'static str> {
        self.weekday.map(day_name)
    }
}

fn serialize_weekday<S>(value: &Option<Weekday>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match value {
        Some(day) => serializer.serialize_some(day_name(*day)),
        None => serializer.serialize_none(),
    }
}

/// Fill values applied by the derivation stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillValues {
    pub quantity: f64,
    /// Median of the known prices; `None` when no row carries a price.
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub records: Vec<SalesRecord>,
    pub fill: FillValues,
    pub quantities_filled: usize,
    pub prices_filled: usize,
    pub skipped_timestamps: usize,
}

struct Columns {
    order_details_id: Option<usize>,
    order_id: Option<usize>,
    pizza_id: Option<usize>,
    pizza_type_id: Option<usize>,
    name: Option<usize>,
    size: Option<usize>,
    category: Option<usize>,
    quantity: Option<usize>,
    price: Option<usize>,
    date: Option<usize>,
    time: Option<usize>,
}

impl Columns {
    fn locate(frame: &Frame) -> Self {
        Self {
            order_details_id: frame.column_index(ORDER_DETAILS_ID_COLUMN),
            order_id: frame.column_index(ORDER_ID),
            pizza_id: frame.column_index(PIZZA_ID),
            pizza_type_id: frame.column_index(PIZZA_TYPE_ID),
            name: frame.column_index(NAME_COLUMN),
            size: frame.column_index(SIZE_COLUMN),
            category: frame.column_index(CATEGORY_COLUMN),
            quantity: frame.column_index(QUANTITY_COLUMN),
            price: frame.column_index(PRICE_COLUMN),
            date: frame.column_index(DATE_COLUMN),
            time: frame.column_index(TIME_COLUMN),
        }
    }
}

pub fn derive_records(frame: &Frame, policy: DateErrorPolicy) -> PipelineResult<Derivation> {
    let columns = Columns::locate(frame);
    let text = |row: usize, column: Option<usize>| -> Option<String> {
        column
            .and_then(|idx| frame.cell(row, idx))
            .map(|s| s.trim().to_string())
    };

    let quantities = numeric_column(frame, columns.quantity, QUANTITY_COLUMN);
    let prices = numeric_column(frame, columns.price, PRICE_COLUMN);
    let fill = FillValues {
        quantity: DEFAULT_QUANTITY,
        price: median(&prices.iter().flatten().copied().collect::<Vec<_>>()),
    };
    if fill.price.is_none() && prices.iter().any(Option::is_none) {
        warn!("No known prices to derive a median from; missing prices count as 0");
    }

    let mut derivation = Derivation {
        records: Vec::with_capacity(frame.len()),
        fill,
        quantities_filled: 0,
        prices_filled: 0,
        skipped_timestamps: 0,
    };

    for row in 0..frame.len() {
        let order_id = normalize_key(text(row, columns.order_id).as_deref());
        let timestamp = match (text(row, columns.date), text(row, columns.time)) {
            (Some(date), Some(time)) => match combine_date_time(&date, &time) {
                Ok(ts) => Some(ts),
                Err(err) => {
                    let failure = PipelineError::DateParse {
                        row: row + 1,
                        order_id: order_id.clone().unwrap_or_default(),
                        date,
                        time,
                    };
                    match policy {
                        DateErrorPolicy::Abort => return Err(failure),
                        DateErrorPolicy::Skip => {
                            warn!("{failure}: {err}; timestamp left unknown");
                            derivation.skipped_timestamps += 1;
                            None
                        }
                    }
                }
            },
            _ => None,
        };

        let quantity_filled = quantities[row].is_none();
        let price_filled = prices[row].is_none();
        let quantity = quantities[row].unwrap_or(fill.quantity);
        let price = prices[row].unwrap_or_else(|| fill.price.unwrap_or(0.0));
        derivation.quantities_filled += usize::from(quantity_filled);
        derivation.prices_filled += usize::from(price_filled);

        derivation.records.push(SalesRecord {
            order_details_id: text(row, columns.order_details_id),
            order_id,
            pizza_id: text(row, columns.pizza_id),
            pizza_type_id: text(row, columns.pizza_type_id),
            name: text(row, columns.name),
            size: text(row, columns.size),
            category: text(row, columns.category),
            quantity,
            price,
            quantity_filled,
            price_filled,
            hour: timestamp.map(|ts| ts.hour()),
            weekday: timestamp.map(|ts| ts.weekday()),
            timestamp,
            total_price: quantity * price,
        });
    }

    if derivation.quantities_filled > 0 || derivation.prices_filled > 0 {
        info!(
            "Filled {} missing quantity value(s) with {} and {} missing price(s) with median {}",
            derivation.quantities_filled,
            fill.quantity,
            derivation.prices_filled,
            fill.price.unwrap_or(0.0)
        );
    }
    Ok(derivation)
}

/// Parses one numeric column; blank or non-numeric cells become `None`.
fn numeric_column(frame: &Frame, column: Option<usize>, name: &str) -> Vec<Option<f64>> {
    (0..frame.len())
        .map(|row| {
            let raw = column.and_then(|idx| frame.cell(row, idx))?;
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Some(value),
                _ => {
                    warn!("Row {}: '{raw}' in '{name}' is not numeric; treated as missing", row + 1);
                    None
                }
            }
        })
        .collect()
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Slashed dates are always month-first; there is no day-first slash form,
/// so one file can never mix the two readings.
pub fn parse_naive_date(value: &str) -> Result<NaiveDate> {
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%m-%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as date"))
}

pub fn parse_naive_time(value: &str) -> Result<NaiveTime> {
    // Point-of-sale exports sometimes carry fractional seconds on order times.
    const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M", "%H:%M:%S%.f"];
    for fmt in TIME_FORMATS {
        if let Ok(parsed) = NaiveTime::parse_from_str(value, fmt) {
            return Ok(parsed);
        }
    }
    Err(anyhow!("Failed to parse '{value}' as time"))
}

pub fn combine_date_time(date: &str, time: &str) -> Result<NaiveDateTime> {
    Ok(parse_naive_date(date.trim())?.and_time(parse_naive_time(time.trim())?))
}
