// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use payment_analytics::{config, date_ranges, db, export, report, AnalyticsReport, Tables};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Completed-payment analytics for a payment panel database")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true, default_value = "analytics.toml")]
    config: PathBuf,

    /// Database URL, overrides the config file and DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    /// Reference time (YYYY-MM-DD or YYYY-MM-DD HH:MM:SS), defaults to now
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<NaiveDateTime>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the analytics report
    Report {
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Export the analytics report to CSV
    Export {
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_now(input: &str) -> std::result::Result<NaiveDateTime, String> {
    date_ranges::parse_reference_time(input)
        .ok_or_else(|| format!("Invalid time {:?}. Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS", input))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = config::load_config_or_default(&cli.config)?;
    let db_url = match cli.database_url {
        Some(url) => url,
        None => config.database_url()?,
    };
    let tables = Tables::with_prefix(&config.table_prefix)?;
    let now = cli.now.unwrap_or_else(|| Local::now().naive_local());

    let report = match db::connect_read_only(&db_url).await {
        Ok(pool) => {
            let report = report::build_report(&pool, &tables, config.settings_override(), now).await;
            pool.close().await;
            report
        }
        Err(e) => {
            tracing::error!("Could not open {}: {}", db_url, e);
            AnalyticsReport::connection_failed(config.settings_override(), now, &e.to_string())
        }
    };

    match cli.command {
        Commands::Report { format: OutputFormat::Text } => print_report(&report),
        Commands::Report { format: OutputFormat::Json } => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Export { output } => {
            export::export_report_csv(&report, &output)?;
            println!("✅ CSV file created at: {}", output.display());
        }
    }

    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    if let Some(diagnostic) = &report.diagnostic {
        println!("⚠️  {}", diagnostic);
        println!();
    }

    println!("All Payments Statistics ({})", report.generated_at.format("%Y-%m-%d %H:%M"));
    for total in &report.all_payments {
        println!("  {:<12} {}", total.label, total.formatted);
    }

    for section in &report.categories {
        println!();
        println!("{}", section.title);
        if let Some(message) = &section.empty_message {
            println!("  {}", message);
            continue;
        }
        for method in &section.methods {
            println!("  {}", method.display_name);
            for total in &method.totals {
                println!("    {:<12} {}", total.label, total.formatted);
            }
        }
    }
}
