use std::collections::{HashMap, HashSet};

use log::{info, warn};

use crate::{
    frame::Frame,
    loader::Sources,
    reconcile::normalize_key,
};

pub const LEFT_SUFFIX: &str = "_x";
pub const RIGHT_SUFFIX: &str = "_y";

pub const PIZZA_ID: &str = "pizza_id";
pub const ORDER_ID: &str = "order_id";
pub const PIZZA_TYPE_ID: &str = "pizza_type_id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JoinStats {
    pub rows: usize,
    pub matched: usize,
    pub unmatched: usize,
    pub duplicate_right_keys: usize,
}

/// Left-joins `right` onto `left` on the shared column `key`.
///
/// Every left row appears exactly once in the output, so the row count never
/// changes. Only the first right row per key is used. The right key column is
/// not repeated; other colliding column names get `_x`/`_y` suffixes.
pub fn left_join(left: &Frame, right: &Frame, key: &str) -> (Frame, JoinStats) {
    let left_key = left.column_index(key);
    let right_key = right.column_index(key);
    if left_key.is_none() || right_key.is_none() {
        warn!("Join column '{key}' missing on one side; right columns will be null");
    }

    let (lookup, duplicate_right_keys) = build_right_lookup(right, right_key);
    let (headers, right_columns) = build_output_headers(left.headers(), right.headers(), right_key);

    let mut stats = JoinStats {
        duplicate_right_keys,
        ..JoinStats::default()
    };
    let mut rows = Vec::with_capacity(left.len());
    for left_row in left.rows() {
        let key_value = left_key.and_then(|idx| normalize_key(left_row[idx].as_deref()));
        let matched = key_value
            .as_ref()
            .and_then(|k| lookup.get(k))
            .map(|&row_idx| &right.rows()[row_idx]);
        let mut combined = left_row.clone();
        match matched {
            Some(right_row) => {
                stats.matched += 1;
                combined.extend(right_columns.iter().map(|idx| right_row[*idx].clone()));
            }
            None => {
                stats.unmatched += 1;
                combined.extend(right_columns.iter().map(|_| None));
            }
        }
        rows.push(combined);
    }
    stats.rows = rows.len();
    (Frame::new(headers, rows), stats)
}

fn build_right_lookup(right: &Frame, key_index: Option<usize>) -> (HashMap<String, usize>, usize) {
    let mut map = HashMap::new();
    let mut duplicates = 0usize;
    let Some(key_index) = key_index else {
        return (map, duplicates);
    };
    for (row_idx, row) in right.rows().iter().enumerate() {
        let Some(key) = normalize_key(row[key_index].as_deref()) else {
            continue;
        };
        if map.contains_key(&key) {
            duplicates += 1;
            continue;
        }
        map.insert(key, row_idx);
    }
    (map, duplicates)
}

fn build_output_headers(
    left_headers: &[String],
    right_headers: &[String],
    right_key_index: Option<usize>,
) -> (Vec<String>, Vec<usize>) {
    let right_columns = (0..right_headers.len())
        .filter(|idx| Some(*idx) != right_key_index)
        .collect::<Vec<_>>();
    let right_names: HashSet<&str> = right_columns
        .iter()
        .map(|idx| right_headers[*idx].as_str())
        .collect();
    let left_names: HashSet<&str> = left_headers.iter().map(String::as_str).collect();

    let mut headers = left_headers
        .iter()
        .map(|name| {
            if right_names.contains(name.as_str()) {
                format!("{name}{LEFT_SUFFIX}")
            } else {
                name.clone()
            }
        })
        .collect::<Vec<_>>();
    headers.extend(right_columns.iter().map(|idx| {
        let name = &right_headers[*idx];
        if left_names.contains(name.as_str()) {
            format!("{name}{RIGHT_SUFFIX}")
        } else {
            name.clone()
        }
    }));

    (headers, right_columns)
}

/// Runs the three line-item joins: pizzas, then orders, then pizza types.
pub fn join_sources(sources: &Sources) -> Frame {
    let steps: [(&str, &Frame, &str); 3] = [
        ("pizza catalog", &sources.pizzas, PIZZA_ID),
        ("orders", &sources.orders, ORDER_ID),
        ("pizza type catalog", &sources.pizza_types, PIZZA_TYPE_ID),
    ];
    let mut joined = sources.order_details.clone();
    for (label, right, key) in steps {
        let (next, stats) = left_join(&joined, right, key);
        if stats.duplicate_right_keys > 0 {
            warn!(
                "{} duplicate '{key}' value(s) in {label}; first occurrence used",
                stats.duplicate_right_keys
            );
        }
        info!(
            "Joined {label} on '{key}': {} row(s), {} matched, {} unmatched",
            stats.rows, stats.matched, stats.unmatched
        );
        joined = next;
    }
    joined
}
