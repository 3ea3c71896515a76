// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Completed-payment analytics over a host payment panel's database: totals
//! per reporting window and per payment method, normalized to the panel's
//! default currency.

pub mod config;
pub mod currencies;
pub mod date_ranges;
pub mod db;
pub mod error;
pub mod export;
pub mod format;
pub mod payment_methods;
pub mod report;
pub mod transactions;

pub use config::{Config, Settings};
pub use currencies::{CurrencyConverter, RateTable};
pub use date_ranges::{build_windows, Period, ReportWindow};
pub use db::Tables;
pub use error::{AnalyticsError, Result};
pub use format::AmountFormatter;
pub use payment_methods::{list_active_methods, PaymentCategory, PaymentMethod};
pub use report::{build_report, AnalyticsReport};
pub use transactions::sum_completed_amount;
