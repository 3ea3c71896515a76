// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use crate::report::{AnalyticsReport, WindowTotal};
use anyhow::{Context, Result};
use csv::Writer;
use std::io;
use std::path::Path;

const ALL_PAYMENTS_SECTION: &str = "All Payments";

/// Export the report to a CSV file, one row per total
pub fn export_report_csv(report: &AnalyticsReport, path: &Path) -> Result<()> {
    let writer = Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {}", path.display()))?;
    write_report_csv(report, writer)?;
    Ok(())
}

pub fn write_report_csv<W: io::Write>(report: &AnalyticsReport, mut writer: Writer<W>) -> Result<()> {
    // Write headers
    writer.write_record(["Section", "Method", "Window", "Amount", "Formatted"])?;

    for total in &report.all_payments {
        write_total(&mut writer, ALL_PAYMENTS_SECTION, "", total)?;
    }

    for section in &report.categories {
        for method in &section.methods {
            for total in &method.totals {
                write_total(&mut writer, section.category.as_str(), &method.display_name, total)?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}

fn write_total<W: io::Write>(
    writer: &mut Writer<W>,
    section: &str,
    method: &str,
    total: &WindowTotal,
) -> Result<()> {
    let amount = format!("{:.2}", total.amount);
    writer.write_record([
        section,
        method,
        total.label,
        amount.as_str(),
        total.formatted.as_str(),
    ])?;
    Ok(())
}
