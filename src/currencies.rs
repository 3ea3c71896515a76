// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::db::Tables;
use crate::error::Result;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;
use tracing::warn;

/// Stored rate per currency code. Each rate is expressed against one common
/// reference unit, so any two rows give a cross rate.
pub type RateTable = HashMap<String, f64>;

/// Get the exchange rate table from the host's currency table
pub async fn get_rate_table(pool: &SqlitePool, tables: &Tables) -> Result<RateTable> {
    let records = sqlx::query_as::<_, (String, Option<f64>)>(&format!(
        r#"
        SELECT currency_code, CAST(currency_rate AS REAL)
        FROM "{}"
        ORDER BY rowid
        "#,
        tables.currency
    ))
    .fetch_all(pool)
    .await?;

    let mut rate_table = RateTable::new();
    for (code, rate) in records {
        match rate {
            // First row wins, as a single-row lookup by code would return it
            Some(rate) => {
                rate_table.entry(code).or_insert(rate);
            }
            None => warn!("Currency {} has no rate, ignoring it", code),
        }
    }

    Ok(rate_table)
}

/// Converts amounts into the default currency.
#[derive(Debug, Clone)]
pub struct CurrencyConverter {
    default_currency: String,
    rates: RateTable,
}

impl CurrencyConverter {
    pub fn new(default_currency: impl Into<String>, rates: RateTable) -> Self {
        Self {
            default_currency: default_currency.into(),
            rates,
        }
    }

    pub fn default_currency(&self) -> &str {
        &self.default_currency
    }

    /// Convert `amount` in `currency_code` to the default currency as
    /// `(amount / source_rate) * default_rate`.
    ///
    /// Fails open: when either rate is missing (or the source rate is not
    /// positive) the amount is returned unconverted, so unknown currencies are
    /// counted at face value rather than dropped from revenue totals.
    pub fn convert(&self, amount: f64, currency_code: &str) -> f64 {
        if currency_code == self.default_currency {
            return amount;
        }

        let Some(&default_rate) = self.rates.get(&self.default_currency) else {
            warn!(
                "No exchange rate for default currency {}, counting {} {} unconverted",
                self.default_currency, amount, currency_code
            );
            return amount;
        };

        let source_rate = match self.rates.get(currency_code) {
            Some(&rate) if rate > 0.0 => rate,
            _ => {
                warn!(
                    "No usable exchange rate for {}, counting {} unconverted",
                    currency_code, amount
                );
                return amount;
            }
        };

        (amount / source_rate) * default_rate
    }
}
