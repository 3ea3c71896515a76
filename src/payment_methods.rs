// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::db::Tables;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePool;
use tracing::warn;

const GATEWAY_PLUGIN_DIR: &str = "payment-gateway";
const ACTIVE_STATUS: &str = "active";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentCategory {
    #[serde(rename = "Mobile Banking")]
    MobileBanking,
    IBanking,
    International,
}

impl PaymentCategory {
    pub const ALL: [PaymentCategory; 3] = [
        PaymentCategory::MobileBanking,
        PaymentCategory::IBanking,
        PaymentCategory::International,
    ];

    /// The category value stored in a gateway plugin's metadata.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentCategory::MobileBanking => "Mobile Banking",
            PaymentCategory::IBanking => "IBanking",
            PaymentCategory::International => "International",
        }
    }

    pub fn title(self) -> String {
        format!("{} Payment Statistics", self.as_str())
    }

    pub fn empty_message(self) -> String {
        let name = match self {
            PaymentCategory::MobileBanking => "mobile banking",
            PaymentCategory::IBanking => "IBanking",
            PaymentCategory::International => "international",
        };
        format!("No active {} payment methods found.", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMethod {
    pub slug: String,
    pub display_name: String,
    pub category: PaymentCategory,
    pub active: bool,
}

#[derive(Debug, sqlx::FromRow)]
struct GatewayRow {
    plugin_slug: String,
    plugin_name: String,
    plugin_array: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GatewayMeta {
    category: Option<String>,
}

/// Active payment gateways of one category, in catalog order.
pub async fn list_active_methods(
    pool: &SqlitePool,
    tables: &Tables,
    category: PaymentCategory,
) -> Result<Vec<PaymentMethod>> {
    let rows = sqlx::query_as::<_, GatewayRow>(&format!(
        r#"
        SELECT plugin_slug, plugin_name, plugin_array
        FROM "{}"
        WHERE status = ? AND plugin_dir = ?
        ORDER BY rowid
        "#,
        tables.plugins
    ))
    .bind(ACTIVE_STATUS)
    .bind(GATEWAY_PLUGIN_DIR)
    .fetch_all(pool)
    .await?;

    let methods = rows
        .into_iter()
        .filter(|row| gateway_category(row).as_deref() == Some(category.as_str()))
        .map(|row| PaymentMethod {
            slug: row.plugin_slug,
            display_name: row.plugin_name,
            category,
            active: true,
        })
        .collect();

    Ok(methods)
}

fn gateway_category(row: &GatewayRow) -> Option<String> {
    let raw = row.plugin_array.as_deref()?;
    match serde_json::from_str::<GatewayMeta>(raw) {
        Ok(meta) => meta.category,
        Err(e) => {
            warn!("Skipping gateway {}: unreadable plugin metadata: {}", row.plugin_slug, e);
            None
        }
    }
}
