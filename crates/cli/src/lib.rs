pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use quotedesk_core::pricing::aggregate::DateRange;
use quotedesk_core::PrintLayout;

#[derive(Debug, Parser)]
#[command(
    name = "quotedesk",
    about = "Quotedesk operator CLI",
    long_about = "Price quotations, spell amounts in Indian words, match stock against pending \
                  orders and inspect stored quotations.",
    after_help = "Examples:\n  quotedesk seed\n  quotedesk totals quote.json --layout discounted\n  \
                  quotedesk words 18266.50\n  quotedesk dashboard --range month"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Apply pending store migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog, customers and quotations")]
    Seed,
    #[command(about = "Price every line of a quotation document and total it for printing")]
    Totals {
        #[arg(help = "Path to a quotation JSON document")]
        quotation: PathBuf,
        #[arg(long, help = "Print layout: standard, discounted or with-airfreight")]
        layout: Option<PrintLayout>,
    },
    #[command(about = "Resolve the price band of a product in force on a date")]
    Price {
        #[arg(help = "Path to a product JSON document")]
        product: PathBuf,
        #[arg(long, help = "Document date (YYYY-MM-DD)")]
        date: NaiveDate,
    },
    #[command(about = "Spell an amount in Indian-English words")]
    Words {
        #[arg(allow_hyphen_values = true, help = "Amount in rupees")]
        amount: String,
        #[arg(long, help = "Largest integer amount spelled before giving up")]
        ceiling: Option<u64>,
    },
    #[command(about = "Match stock lines against pending orders and report free stock")]
    Stock {
        #[arg(help = "Path to a JSON array of stock lines")]
        stock: PathBuf,
        #[arg(help = "Path to a JSON array of pending order lines")]
        orders: PathBuf,
        #[arg(long, help = "Reference date (YYYY-MM-DD), defaults to today")]
        today: Option<NaiveDate>,
        #[arg(long, help = "Days ahead that count as near-term demand")]
        horizon_days: Option<u64>,
    },
    #[command(about = "Summarize stored quotations by status, customer and sales person")]
    Dashboard {
        #[arg(long, default_value = "all", help = "Window: all, week, month or year")]
        range: DateRange,
        #[arg(long, help = "Reference date (YYYY-MM-DD), defaults to today")]
        today: Option<NaiveDate>,
    },
    #[command(about = "List created and follow-up reminders for one calendar month")]
    Calendar {
        #[arg(long)]
        year: i32,
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Totals { quotation, layout } => commands::totals::run(&quotation, layout),
        Command::Price { product, date } => commands::price::run(&product, date),
        Command::Words { amount, ceiling } => commands::words::run(&amount, ceiling),
        Command::Stock { stock, orders, today, horizon_days } => {
            commands::stock::run(&stock, &orders, today, horizon_days)
        }
        Command::Dashboard { range, today } => commands::dashboard::run(range, today),
        Command::Calendar { year, month } => commands::calendar::run(year, month),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
