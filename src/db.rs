// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::config::Settings;
use crate::error::{AnalyticsError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// Host table names, resolved against the host's table prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub transaction: String,
    pub currency: String,
    pub plugins: String,
    pub settings: String,
}

impl Tables {
    /// The prefix is spliced into SQL as part of an identifier, so it is restricted
    /// to `[A-Za-z0-9_]`.
    pub fn with_prefix(prefix: &str) -> Result<Self> {
        if !prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(AnalyticsError::InvalidTablePrefix(prefix.to_string()));
        }

        Ok(Self {
            transaction: format!("{}transaction", prefix),
            currency: format!("{}currency", prefix),
            plugins: format!("{}plugins", prefix),
            settings: format!("{}settings", prefix),
        })
    }
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            transaction: "transaction".to_string(),
            currency: "currency".to_string(),
            plugins: "plugins".to_string(),
            settings: "settings".to_string(),
        }
    }
}

/// Opens the host database read-only.
pub async fn connect_read_only(db_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_url)?.read_only(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Reads the host's currency settings from the first row of its settings table.
pub async fn fetch_host_settings(pool: &SqlitePool, tables: &Tables) -> Result<Settings> {
    let record = sqlx::query_as::<_, (Option<String>, Option<String>)>(&format!(
        r#"
        SELECT currency_symbol, default_currency
        FROM "{}"
        ORDER BY rowid
        LIMIT 1
        "#,
        tables.settings
    ))
    .fetch_optional(pool)
    .await?;

    Ok(match record {
        Some((symbol, code)) => Settings::from_host(symbol, code),
        None => Settings::default(),
    })
}

#[cfg(test)]
pub async fn create_test_pool() -> anyhow::Result<SqlitePool> {
    // A single connection that never expires keeps the in-memory database alive
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

/// Row writers for seeding test databases. The analytics code itself never writes.
#[cfg(test)]
pub mod fixtures {
    use anyhow::Result;
    use sqlx::sqlite::SqlitePool;

    pub async fn insert_transaction(
        pool: &SqlitePool,
        amount: f64,
        currency: &str,
        status: &str,
        payment_method_id: &str,
        created_at: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO "transaction" (
                transaction_amount, transaction_currency, transaction_status,
                payment_method_id, created_at
            )
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(amount.to_string())
        .bind(currency)
        .bind(status)
        .bind(payment_method_id)
        .bind(created_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn insert_currency_rate(pool: &SqlitePool, code: &str, rate: f64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO currency (currency_code, currency_rate)
            VALUES (?, ?)
            "#,
        )
        .bind(code)
        .bind(rate.to_string())
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn insert_plugin(
        pool: &SqlitePool,
        slug: &str,
        name: &str,
        plugin_dir: &str,
        status: &str,
        plugin_array: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO plugins (plugin_slug, plugin_name, plugin_dir, status, plugin_array)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(slug)
        .bind(name)
        .bind(plugin_dir)
        .bind(status)
        .bind(plugin_array)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// An active payment gateway in the given category.
    pub async fn insert_gateway(pool: &SqlitePool, slug: &str, name: &str, category: &str) -> Result<()> {
        let plugin_array = serde_json::json!({ "category": category }).to_string();
        insert_plugin(pool, slug, name, "payment-gateway", "active", &plugin_array).await
    }

    pub async fn insert_settings(
        pool: &SqlitePool,
        currency_symbol: Option<&str>,
        default_currency: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO settings (currency_symbol, default_currency)
            VALUES (?, ?)
            "#,
        )
        .bind(currency_symbol)
        .bind(default_currency)
        .execute(pool)
        .await?;

        Ok(())
    }
}
