use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

mod ingest;
mod insights;
mod metrics;
mod models;
mod normalize;
mod report;

use models::{AgentPair, DuoInsights, MetricsReport, Scope, SpeedVerdict};

#[derive(Parser)]
#[command(name = "support-duo-metrics")]
#[command(
    about = "Volume and response-time comparison for the two tracked support agents",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print metrics and insights to stdout
    Metrics {
        /// CSV export to analyze; defaults to the largest CSV in the current directory
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Restrict the analysis to a single day (DD/MM/YYYY)
        #[arg(long, value_parser = parse_scope_date)]
        date: Option<NaiveDate>,
        /// Emit the full metrics structure as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown report
    Report {
        /// CSV export to analyze; defaults to the largest CSV in the current directory
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Restrict the analysis to a single day (DD/MM/YYYY)
        #[arg(long, value_parser = parse_scope_date)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn parse_scope_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%d/%m/%Y")
        .map_err(|_| format!("expected a DD/MM/YYYY date, got {raw:?}"))
}

enum Analysis {
    NoTrackedRows,
    EmptyScope,
    Ready(Box<MetricsReport>, DuoInsights),
}

fn analyze(path: &Path, date: Option<NaiveDate>, pair: &AgentPair) -> anyhow::Result<Analysis> {
    let rows = ingest::load_rows(path)?;
    let records = normalize::normalize_rows(&rows, pair);
    if records.is_empty() {
        return Ok(Analysis::NoTrackedRows);
    }

    let scope = date.map_or(Scope::Full, Scope::Day);
    match metrics::compute_metrics(&records, scope, pair) {
        None => Ok(Analysis::EmptyScope),
        Some(metrics) => {
            let insights = insights::compare_agents(&metrics.first, &metrics.second);
            Ok(Analysis::Ready(Box::new(metrics), insights))
        }
    }
}

fn resolve_export(csv: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    if let Some(path) = csv {
        return Ok(path);
    }
    ingest::find_export_file(Path::new("."))?
        .context("no CSV export found in the current directory; pass --csv")
}

fn print_summary(metrics: &MetricsReport, insights: &DuoInsights) {
    println!(
        "Analyzed {} conversations over {} day(s) ({:.1}/day).",
        metrics.total_conversations, metrics.period_days, metrics.daily_average
    );
    for aggregate in [&metrics.first, &metrics.second] {
        match aggregate.mean_wait_minutes {
            Some(mean) => println!(
                "- {}: {} conversations, {:.1}/day, mean wait {:.1} min",
                aggregate.label, aggregate.total, aggregate.daily_average, mean
            ),
            None => println!(
                "- {}: {} conversations, {:.1}/day, no measured waits",
                aggregate.label, aggregate.total, aggregate.daily_average
            ),
        }
    }
    match insights.volume_leader {
        Some(leader) => println!(
            "Highest volume: {} ({:.1}% gap).",
            metrics.agent(leader).label,
            insights.volume_gap_percent
        ),
        None => println!("Volume: tied at {} conversations each.", metrics.first.total),
    }
    match insights.speed {
        SpeedVerdict::NoData => println!("Response time: no measured waits for either agent."),
        SpeedVerdict::ByDefault(winner) => println!(
            "Fastest response: {} (only agent with measured waits).",
            metrics.agent(winner).label
        ),
        SpeedVerdict::Measured(winner) => println!(
            "Fastest response: {} ({:.1} min gap).",
            metrics.agent(winner).label,
            insights.wait_gap_minutes.unwrap_or_default()
        ),
    }
    println!("Recommendations:");
    for recommendation in &insights.recommendations {
        println!("- {recommendation}");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let pair = AgentPair::tracked();

    match cli.command {
        Commands::Metrics { csv, date, json } => {
            let path = resolve_export(csv)?;
            match analyze(&path, date, &pair)? {
                Analysis::NoTrackedRows => {
                    println!(
                        "No conversations assigned to {} or {} in {}.",
                        pair.first,
                        pair.second,
                        path.display()
                    );
                }
                Analysis::EmptyScope => {
                    println!("No conversations recorded for the selected day.");
                }
                Analysis::Ready(metrics, insights) => {
                    if json {
                        let payload =
                            serde_json::json!({ "metrics": metrics, "insights": insights });
                        println!("{}", serde_json::to_string_pretty(&payload)?);
                    } else {
                        print_summary(&metrics, &insights);
                    }
                }
            }
        }
        Commands::Report { csv, date, out } => {
            let path = resolve_export(csv)?;
            match analyze(&path, date, &pair)? {
                Analysis::NoTrackedRows => {
                    println!(
                        "No conversations assigned to {} or {} in {}.",
                        pair.first,
                        pair.second,
                        path.display()
                    );
                }
                Analysis::EmptyScope => {
                    println!("No conversations recorded for the selected day.");
                }
                Analysis::Ready(metrics, insights) => {
                    let rendered = report::build_report(&metrics, &insights);
                    std::fs::write(&out, rendered)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Report written to {}.", out.display());
                }
            }
        }
    }

    Ok(())
}
