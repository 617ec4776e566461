mod entries;
mod logging;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use milktrack_core::{
    parse_day, parse_month, Clock, DateKey, FileStore, FixedClock, MilkTracker, SystemClock,
};

use crate::entries::{format_liters, format_money, render_entries};

#[derive(Parser)]
#[command(name = "milktrack")]
#[command(about = "Track daily milk deliveries and the monthly bill", long_about = None)]
struct Cli {
    /// Directory holding the data store (default: ~/.milktrack)
    #[arg(long, global = true, env = "MILKTRACK_HOME")]
    data_dir: Option<PathBuf>,

    /// Do not backfill missed days before running the command
    #[arg(long, global = true)]
    no_reconcile: bool,

    /// Override today's date (YYYY-MM-DD)
    #[arg(long, global = true, hide = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Record liters for a day (usage: record yesterday 1.5)
    Record {
        /// today, yesterday, -Nd or YYYY-MM-DD
        #[arg(allow_hyphen_values = true)]
        day: String,
        #[arg(allow_negative_numbers = true)]
        liters: f64,
    },
    /// Show the liters recorded for a day (0 when nothing is recorded)
    Show {
        /// today, yesterday, -Nd or YYYY-MM-DD
        #[arg(allow_hyphen_values = true)]
        day: String,
    },
    /// Backfill missed days with the default quantity
    Reconcile,
    /// Monthly totals and bill (month: this, last, next or YYYY-MM)
    Summary {
        month: Option<String>,
    },
    /// List the entries of a month
    Entries {
        month: Option<String>,
    },
    /// Show or change the default liters and price per liter
    Settings {
        #[arg(long, allow_negative_numbers = true)]
        default_liters: Option<f64>,
        /// Non-numeric input counts as 0
        #[arg(long, allow_negative_numbers = true)]
        price: Option<String>,
    },
}

/// Price field semantics: anything that is not a number means zero.
fn parse_price_input(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(price) if !price.is_nan() => price,
        _ => 0.0,
    }
}

/// Persistence failures are reported once and do not abort the command.
fn report_save(result: milktrack_core::Result<()>) -> Result<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_persistence() => {
            eprintln!("Warning: unable to save data: {}", err);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn resolve_clock(override_date: Option<&str>) -> Result<Box<dyn Clock>> {
    match override_date {
        Some(raw) => Ok(Box::new(FixedClock(raw.parse::<DateKey>()?.date()))),
        None => Ok(Box::new(SystemClock)),
    }
}

fn print_summary(tracker: &MilkTracker<FileStore>, year: i32, month: u32) {
    let summary = tracker.summary(year, month);
    let title = NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{:04}-{:02}", year, month));

    println!("{}", title);
    println!("  Total:         {}", format_liters(summary.total_liters));
    println!("  Days recorded: {}", summary.days_recorded);
    println!("  Average/day:   {}", format_liters(summary.average_liters));
    println!("  Total bill:    {}", format_money(summary.total_bill));
}

fn main() -> Result<()> {
    logging::init_tracing();

    let cli = Cli::parse();
    let clock = resolve_clock(cli.today.as_deref())?;
    let today = clock.today();
    let store = FileStore::new(cli.data_dir).context("could not open data directory")?;
    let mut tracker = MilkTracker::open(store);

    // the explicit command reports its own result
    let explicit_reconcile = matches!(cli.command, Some(Commands::Reconcile));
    if !cli.no_reconcile && !explicit_reconcile {
        report_save(tracker.reconcile(clock.as_ref()).map(|_| ()))?;
    }

    match cli.command {
        Some(Commands::Record { day, liters }) => {
            let date = parse_day(&day, today)?;
            report_save(tracker.record(date, liters))?;
            println!("Recorded {} for {}", format_liters(liters), date);
        }
        Some(Commands::Show { day }) => {
            let date = parse_day(&day, today)?;
            let liters = tracker.entry_or_zero(date).liters();
            println!("{}: {}", date, format_liters(liters));
        }
        Some(Commands::Reconcile) => {
            let report = match tracker.reconcile(clock.as_ref()) {
                Ok(report) => report,
                Err(err) => {
                    report_save(Err(err))?;
                    return Ok(());
                }
            };
            match report.horizon {
                None => println!("Nothing to reconcile: no entries recorded yet."),
                Some(horizon) if report.filled.is_empty() => {
                    println!("Up to date through {}.", horizon)
                }
                Some(horizon) => {
                    println!(
                        "Filled {} day(s) with {} through {}:",
                        report.filled.len(),
                        format_liters(tracker.settings().default_quantity().liters()),
                        horizon
                    );
                    for day in &report.filled {
                        println!("  {}", day);
                    }
                }
            }
        }
        Some(Commands::Summary { month }) => {
            let (year, month) = parse_month(month.as_deref().unwrap_or("this"), today)?;
            print_summary(&tracker, year, month);
        }
        Some(Commands::Entries { month }) => {
            let (year, month) = parse_month(month.as_deref().unwrap_or("this"), today)?;
            let entries = tracker.month_entries(year, month);
            if entries.is_empty() {
                println!("No entries for {:04}-{:02}.", year, month);
            } else {
                println!("{}", render_entries(&entries));
            }
        }
        Some(Commands::Settings { default_liters, price }) => {
            if let Some(liters) = default_liters {
                report_save(tracker.set_default_quantity(liters))?;
            }
            if let Some(raw) = price {
                report_save(tracker.set_unit_price(parse_price_input(&raw)))?;
            }
            let settings = tracker.settings();
            println!(
                "Default liters:  {}",
                format_liters(settings.default_quantity().liters())
            );
            println!("Price per liter: {}", format_money(settings.unit_price()));
        }
        None => {
            print_summary(&tracker, today.year(), today.month());
        }
    }
    Ok(())
}
