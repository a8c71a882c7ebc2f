//! Loading of the four pizza sales sources into [`Frame`]s.
//!
//! Every source keeps its row order and all of its columns verbatim. Blank
//! cells load as nulls so the fill policy and the joiner can tell "missing"
//! apart from "present".

use std::{
    fmt,
    path::{Path, PathBuf},
};

use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    error::{PipelineError, PipelineResult},
    frame::{Frame, non_empty},
    io_utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Pizzas,
    PizzaTypes,
    Orders,
    OrderDetails,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Pizzas,
        SourceKind::PizzaTypes,
        SourceKind::Orders,
        SourceKind::OrderDetails,
    ];

    pub fn default_file_name(self) -> &'static str {
        match self {
            SourceKind::Pizzas => "pizzas.csv",
            SourceKind::PizzaTypes => "pizza_types.csv",
            SourceKind::Orders => "orders.csv",
            SourceKind::OrderDetails => "order_details.csv",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceKind::Pizzas => "pizza catalog",
            SourceKind::PizzaTypes => "pizza type catalog",
            SourceKind::Orders => "orders",
            SourceKind::OrderDetails => "order details",
        };
        f.write_str(label)
    }
}

/// File locations of the four sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePaths {
    pub pizzas: PathBuf,
    pub pizza_types: PathBuf,
    pub orders: PathBuf,
    pub order_details: PathBuf,
}

impl SourcePaths {
    /// Conventional file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            pizzas: dir.join(SourceKind::Pizzas.default_file_name()),
            pizza_types: dir.join(SourceKind::PizzaTypes.default_file_name()),
            orders: dir.join(SourceKind::Orders.default_file_name()),
            order_details: dir.join(SourceKind::OrderDetails.default_file_name()),
        }
    }

    pub fn path(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Pizzas => &self.pizzas,
            SourceKind::PizzaTypes => &self.pizza_types,
            SourceKind::Orders => &self.orders,
            SourceKind::OrderDetails => &self.order_details,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: encoding_rs::WINDOWS_1252,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub pizzas: Frame,
    pub pizza_types: Frame,
    pub orders: Frame,
    pub order_details: Frame,
}

impl Sources {
    pub fn get(&self, kind: SourceKind) -> &Frame {
        match kind {
            SourceKind::Pizzas => &self.pizzas,
            SourceKind::PizzaTypes => &self.pizza_types,
            SourceKind::Orders => &self.orders,
            SourceKind::OrderDetails => &self.order_details,
        }
    }
}

pub fn load_sources(paths: &SourcePaths, options: &LoadOptions) -> PipelineResult<Sources> {
    Ok(Sources {
        pizzas: load_source(SourceKind::Pizzas, &paths.pizzas, options)?,
        pizza_types: load_source(SourceKind::PizzaTypes, &paths.pizza_types, options)?,
        orders: load_source(SourceKind::Orders, &paths.orders, options)?,
        order_details: load_source(SourceKind::OrderDetails, &paths.order_details, options)?,
    })
}

pub fn load_source(kind: SourceKind, path: &Path, options: &LoadOptions) -> PipelineResult<Frame> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)
        .map_err(|err| PipelineError::source_read(kind, path, err))?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding)
        .map_err(|err| PipelineError::source_read(kind, path, err))?;
    if headers.iter().all(|h| h.is_empty()) {
        return Err(PipelineError::source_read(
            kind,
            path,
            "source has no header row",
        ));
    }
    debug!("Columns in {kind}: {headers:?}");

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|err| {
            PipelineError::source_read(kind, path, format!("row {}: {err}", row_idx + 2))
        })?;
        let decoded = io_utils::decode_record(&record, options.encoding).map_err(|err| {
            PipelineError::source_read(kind, path, format!("row {}: {err}", row_idx + 2))
        })?;
        rows.push(decoded.iter().map(|cell| non_empty(cell)).collect());
    }

    info!("Loaded {} row(s) from {kind} {:?}", rows.len(), path);
    Ok(Frame::new(headers, rows))
}
