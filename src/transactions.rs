// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::currencies::CurrencyConverter;
use crate::date_ranges::ReportWindow;
use crate::db::Tables;
use crate::error::Result;
use chrono::NaiveDateTime;
use sqlx::sqlite::{Sqlite, SqlitePool};
use sqlx::QueryBuilder;
use tracing::debug;

pub const COMPLETED_STATUS: &str = "completed";

/// `created_at` is stored as text in this format, so bounds compare lexically.
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, sqlx::FromRow)]
struct CompletedAmount {
    amount: f64,
    currency_code: String,
}

/// Sum of all completed transactions in `window`, converted to the default currency.
///
/// Both window bounds are inclusive; an unbounded window applies no date filter.
/// With `payment_method` set, only that method's transactions are counted.
pub async fn sum_completed_amount(
    pool: &SqlitePool,
    tables: &Tables,
    converter: &CurrencyConverter,
    window: &ReportWindow,
    payment_method: Option<&str>,
) -> Result<f64> {
    let mut query = QueryBuilder::<Sqlite>::new(format!(
        r#"
        SELECT COALESCE(CAST(transaction_amount AS REAL), 0.0) AS amount,
               COALESCE(transaction_currency, '') AS currency_code
        FROM "{}"
        WHERE transaction_status = "#,
        tables.transaction
    ));
    query.push_bind(COMPLETED_STATUS);

    if let Some(method) = payment_method {
        query.push(" AND payment_method_id = ").push_bind(method);
    }
    if let Some(start) = window.start {
        query.push(" AND created_at >= ").push_bind(sql_timestamp(start));
    }
    if let Some(end) = window.end {
        query.push(" AND created_at <= ").push_bind(sql_timestamp(end));
    }

    let rows = query
        .build_query_as::<CompletedAmount>()
        .fetch_all(pool)
        .await?;

    let total = rows
        .iter()
        .map(|row| converter.convert(row.amount, &row.currency_code))
        .sum();

    debug!(
        "Summed {} completed transactions (method: {:?}): {}",
        rows.len(),
        payment_method,
        total
    );

    Ok(total)
}

fn sql_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(CREATED_AT_FORMAT).to_string()
}
