//! Tracking batch: order list in, one status per row out, in input order.

use std::io::Write;

use serde::Serialize;

use expedicao_io::csv::Table;
use expedicao_io::headers;
use expedicao_io::{ExportError, InputError};

use crate::client::StatusLookup;
use crate::status::TrackingStatus;

/// Canonical key of the order-id column.
pub const ORDER_KEY: &str = "pedido";
/// Canonical key of the tracking-code column.
pub const CODE_KEY: &str = "envio codigo";

pub const RESULT_FILENAME: &str = "status_rastreamento.csv";
pub const RESULT_HEADER: [&str; 3] = ["Pedido", "Código", "Status"];

/// One order to look up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingOrder {
    pub order_id: String,
    /// Trimmed; may be empty.
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackingResult {
    #[serde(rename = "Pedido")]
    pub order_id: String,
    #[serde(rename = "Código")]
    pub code: String,
    #[serde(rename = "Status")]
    pub status: TrackingStatus,
}

/// Normalize headers, require the order and code columns, extract the orders.
///
/// Runs before any network traffic: a missing column fails the whole batch.
pub fn prepare(mut table: Table) -> Result<Vec<TrackingOrder>, InputError> {
    headers::normalize(&mut table);
    table.require_columns(&[(ORDER_KEY, "Pedido"), (CODE_KEY, "Envio codigo")])?;

    Ok(table
        .rows()
        .map(|row| TrackingOrder {
            order_id: row.cell(ORDER_KEY).to_string(),
            code: row.cell(CODE_KEY).trim().to_string(),
        })
        .collect())
}

/// Look up every order in sequence. Rows without a code are answered locally.
///
/// `on_result` sees each result as soon as it is known (1-based index, total).
pub fn run(
    orders: &[TrackingOrder],
    lookup: &mut impl StatusLookup,
    mut on_result: impl FnMut(usize, usize, &TrackingResult),
) -> Vec<TrackingResult> {
    let total = orders.len();
    let mut results = Vec::with_capacity(total);

    for (idx, order) in orders.iter().enumerate() {
        let status = if order.code.is_empty() {
            TrackingStatus::EmptyCode
        } else {
            lookup.lookup(&order.code)
        };

        let result = TrackingResult {
            order_id: order.order_id.clone(),
            code: order.code.clone(),
            status,
        };
        on_result(idx + 1, total, &result);
        results.push(result);
    }

    results
}

/// UTF-8 CSV with header `Pedido,Código,Status`.
pub fn write_results(results: &[TrackingResult], writer: impl Write) -> Result<(), ExportError> {
    expedicao_io::csv::export(results, &RESULT_HEADER, writer)
}
