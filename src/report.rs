// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::config::Settings;
use crate::currencies::{get_rate_table, CurrencyConverter};
use crate::date_ranges::{build_windows, Period, ReportWindow};
use crate::db::{fetch_host_settings, Tables};
use crate::error::{AnalyticsError, Result};
use crate::format::AmountFormatter;
use crate::payment_methods::{list_active_methods, PaymentCategory};
use crate::transactions::sum_completed_amount;
use chrono::NaiveDateTime;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct WindowTotal {
    pub period: Period,
    pub label: &'static str,
    pub amount: f64,
    pub formatted: String,
}

impl WindowTotal {
    fn new(period: Period, amount: f64, formatter: &AmountFormatter) -> Self {
        Self {
            period,
            label: period.label(),
            amount,
            formatted: formatter.format(amount),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MethodTotals {
    pub slug: String,
    pub display_name: String,
    pub totals: Vec<WindowTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySection {
    pub category: PaymentCategory,
    pub title: String,
    pub methods: Vec<MethodTotals>,
    /// Set when the category has no active payment methods.
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsReport {
    pub generated_at: NaiveDateTime,
    pub settings: Settings,
    pub all_payments: Vec<WindowTotal>,
    pub categories: Vec<CategorySection>,
    /// The first data-access failure, if any. Affected totals read as zero.
    pub diagnostic: Option<String>,
}

impl AnalyticsReport {
    /// The degraded report shown when the database cannot be opened at all:
    /// zero totals for every window and a single `Connection failed` diagnostic.
    pub fn connection_failed(settings: Option<Settings>, now: NaiveDateTime, error: &str) -> Self {
        let settings = settings.unwrap_or_default();
        let formatter = AmountFormatter::new(&settings);
        let all_payments = build_windows(now)
            .into_iter()
            .map(|(period, _)| WindowTotal::new(period, 0.0, &formatter))
            .collect();

        Self {
            generated_at: now,
            settings,
            all_payments,
            categories: Vec::new(),
            diagnostic: Some(format!("Connection failed: {}", error)),
        }
    }
}

/// Collapses data-access failures into one user-facing message.
#[derive(Debug, Default)]
struct Diagnostics {
    first: Option<String>,
    suppressed: usize,
}

impl Diagnostics {
    fn recover<T>(&mut self, result: Result<T>, context: &str) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.record(context, &e);
                None
            }
        }
    }

    fn record(&mut self, context: &str, error: &AnalyticsError) {
        warn!("Failed to load {}: {}", context, error);
        if self.first.is_none() {
            self.first = Some(format!("Failed to load {}: {}", context, error));
        } else {
            self.suppressed += 1;
        }
    }

    fn merge(&mut self, other: Diagnostics) {
        let Some(first) = other.first else {
            return;
        };
        if self.first.is_none() {
            self.first = Some(first);
            self.suppressed += other.suppressed;
        } else {
            self.suppressed += other.suppressed + 1;
        }
    }
}

/// Build the dashboard report for the reference instant `now`.
///
/// Never fails: a section whose queries fail keeps zero totals (or no methods)
/// and the first failure is reported once in `diagnostic`. `settings` pins
/// the currency settings instead of reading the host's settings row.
pub async fn build_report(
    pool: &sqlx::SqlitePool,
    tables: &Tables,
    settings: Option<Settings>,
    now: NaiveDateTime,
) -> AnalyticsReport {
    let mut diagnostics = Diagnostics::default();

    let settings = match settings {
        Some(settings) => settings,
        None => diagnostics
            .recover(fetch_host_settings(pool, tables).await, "host settings")
            .unwrap_or_default(),
    };
    let rates = diagnostics
        .recover(get_rate_table(pool, tables).await, "exchange rates")
        .unwrap_or_default();
    let converter = CurrencyConverter::new(settings.default_currency.clone(), rates);
    let formatter = AmountFormatter::new(&settings);
    let windows = build_windows(now);

    let mut all_payments = Vec::with_capacity(windows.len());
    for (period, window) in &windows {
        let amount = diagnostics
            .recover(
                sum_completed_amount(pool, tables, &converter, window, None).await,
                "payment totals",
            )
            .unwrap_or(0.0);
        all_payments.push(WindowTotal::new(*period, amount, &formatter));
    }

    let sections = join_all(PaymentCategory::ALL.iter().map(|&category| {
        build_category_section(pool, tables, &converter, &formatter, &windows, category)
    }))
    .await;

    let mut categories = Vec::with_capacity(sections.len());
    for (section, section_diagnostics) in sections {
        categories.push(section);
        diagnostics.merge(section_diagnostics);
    }

    if diagnostics.suppressed > 0 {
        info!("{} further data-access failures were suppressed", diagnostics.suppressed);
    }

    AnalyticsReport {
        generated_at: now,
        settings,
        all_payments,
        categories,
        diagnostic: diagnostics.first,
    }
}

async fn build_category_section(
    pool: &sqlx::SqlitePool,
    tables: &Tables,
    converter: &CurrencyConverter,
    formatter: &AmountFormatter,
    windows: &[(Period, ReportWindow)],
    category: PaymentCategory,
) -> (CategorySection, Diagnostics) {
    let mut diagnostics = Diagnostics::default();
    let mut section = CategorySection {
        category,
        title: category.title(),
        methods: Vec::new(),
        empty_message: None,
    };

    let context = format!("{} payment methods", category.as_str());
    let Some(methods) = diagnostics.recover(list_active_methods(pool, tables, category).await, &context) else {
        return (section, diagnostics);
    };
    if methods.is_empty() {
        section.empty_message = Some(category.empty_message());
        return (section, diagnostics);
    }

    for method in methods {
        let mut totals = Vec::new();
        for (period, window) in windows.iter().filter(|(p, _)| p.is_bounded()) {
            let amount = diagnostics
                .recover(
                    sum_completed_amount(pool, tables, converter, window, Some(&method.slug)).await,
                    &format!("{} totals", method.display_name),
                )
                .unwrap_or(0.0);
            totals.push(WindowTotal::new(*period, amount, formatter));
        }
        section.methods.push(MethodTotals {
            slug: method.slug,
            display_name: method.display_name,
            totals,
        });
    }

    (section, diagnostics)
}
