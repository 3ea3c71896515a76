// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::config::Settings;

/// One crore. Totals at or above this are abbreviated.
pub const CRORE: f64 = 10_000_000.0;

#[derive(Debug, Clone)]
pub struct AmountFormatter {
    symbol: String,
    code: String,
}

impl AmountFormatter {
    pub fn new(settings: &Settings) -> Self {
        Self {
            symbol: settings.currency_symbol.clone(),
            code: settings.default_currency.clone(),
        }
    }

    /// `"<symbol> <number> <code>"`, e.g. `৳ 1,234.56 BDT` or `৳ 1.50 Cr BDT`.
    pub fn format(&self, amount: f64) -> String {
        let number = if amount >= CRORE {
            format!("{} Cr", group_thousands(amount / CRORE))
        } else {
            group_thousands(amount)
        };
        format!("{} {} {}", self.symbol, number, self.code)
    }
}

/// Round to cents, halves away from zero.
///
/// The scaled value is first cut to 15 significant digits so binary near-ties
/// such as `1.005` round up as written.
fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    let scaled: f64 = format!("{:.14e}", scaled).parse().unwrap_or(scaled);
    scaled.round() / 100.0
}

/// Two decimals with comma thousands separators.
fn group_thousands(value: f64) -> String {
    let fixed = format!("{:.2}", round_cents(value));
    let (negative, digits) = match fixed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, fixed.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // "-0.00" after rounding reads as zero
    let is_zero = whole.bytes().all(|b| b == b'0') && fraction.bytes().all(|b| b == b'0');
    if negative && !is_zero {
        format!("-{}.{}", grouped, fraction)
    } else {
        format!("{}.{}", grouped, fraction)
    }
}
