//! Schema reconciliation for the joined frame.
//!
//! Sources in the wild name their price column `unit_price`, `Price ($)` and
//! so on, and a joined frame may carry two suffixed `category` columns. The
//! policies here resolve both against the full joined schema, so they must run
//! after the last join.

use log::info;

use crate::{
    error::{PipelineError, PipelineResult},
    frame::Frame,
    join::{LEFT_SUFFIX, RIGHT_SUFFIX},
};

pub const PRICE_COLUMN: &str = "price";
pub const CATEGORY_COLUMN: &str = "category";

/// Canonical form of a join key cell.
///
/// Keys are trimmed and integer-valued numerics are rendered without a
/// fractional part so `"7"`, `" 7 "` and `"7.0"` all agree. Blank keys are
/// null and never match.
pub fn normalize_key(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(int) = trimmed.parse::<i64>() {
        return Some(int.to_string());
    }
    if let Ok(float) = trimmed.parse::<f64>()
        && float.is_finite()
        && float.fract() == 0.0
        && float.abs() < i64::MAX as f64
    {
        return Some((float as i64).to_string());
    }
    Some(trimmed.to_string())
}

/// Locates the authoritative price column.
///
/// An exact `price` header wins. Otherwise the first header, in column
/// order, containing `needle` case-insensitively is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceColumnPolicy {
    pub canonical: String,
    pub needle: String,
}

impl Default for PriceColumnPolicy {
    fn default() -> Self {
        Self {
            canonical: PRICE_COLUMN.to_string(),
            needle: PRICE_COLUMN.to_string(),
        }
    }
}

impl PriceColumnPolicy {
    /// Returns the header that should be exposed as the canonical price column.
    pub fn resolve<'a>(&self, headers: &'a [String]) -> PipelineResult<&'a str> {
        if let Some(exact) = headers.iter().find(|h| **h == self.canonical) {
            return Ok(exact);
        }
        let needle = self.needle.to_lowercase();
        headers
            .iter()
            .find(|h| h.to_lowercase().contains(&needle))
            .map(String::as_str)
            .ok_or_else(|| PipelineError::SchemaResolution {
                columns: headers.to_vec(),
            })
    }
}

/// Collapses `category_x` / `category_y` into one `category` column, keeping
/// the right-hand (pizza type catalog) side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryPolicy {
    pub canonical: String,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self {
            canonical: CATEGORY_COLUMN.to_string(),
        }
    }
}

impl CategoryPolicy {
    fn suffixed(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.canonical)
    }

    /// `(kept, dropped)` header names when the frame carries an ambiguous pair.
    pub fn resolve(&self, headers: &[String]) -> Option<(String, Option<String>)> {
        if headers.iter().any(|h| *h == self.canonical) {
            return None;
        }
        let left = self.suffixed(LEFT_SUFFIX);
        let right = self.suffixed(RIGHT_SUFFIX);
        let has_left = headers.contains(&left);
        let has_right = headers.contains(&right);
        match (has_left, has_right) {
            (_, true) => Some((right, has_left.then_some(left))),
            (true, false) => Some((left, None)),
            (false, false) => None,
        }
    }
}

/// What reconciliation changed in the joined schema.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reconciliation {
    pub price_renamed_from: Option<String>,
    pub category_renamed_from: Option<String>,
    pub category_dropped: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaReconciler {
    pub price: PriceColumnPolicy,
    pub category: CategoryPolicy,
}

impl SchemaReconciler {
    pub fn reconcile(&self, joined: &Frame) -> PipelineResult<(Frame, Reconciliation)> {
        let mut outcome = Reconciliation::default();

        let price_source = self.price.resolve(joined.headers())?.to_string();
        let mut frame = if price_source != self.price.canonical {
            info!(
                "Renamed column '{}' to '{}'",
                price_source, self.price.canonical
            );
            outcome.price_renamed_from = Some(price_source.clone());
            joined.rename_column(&price_source, &self.price.canonical)
        } else {
            joined.clone()
        };

        if let Some((kept, dropped)) = self.category.resolve(frame.headers()) {
            if let Some(dropped) = dropped {
                frame = frame.drop_column(&dropped);
                outcome.category_dropped = Some(dropped);
            }
            info!("Using '{}' as '{}'", kept, self.category.canonical);
            frame = frame.rename_column(&kept, &self.category.canonical);
            outcome.category_renamed_from = Some(kept);
        }

        Ok((frame, outcome))
    }
}
