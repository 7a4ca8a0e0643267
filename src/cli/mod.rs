mod session;

pub use session::*;

use std::fs::File;
use std::io::{BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Config;
use crate::domain::ExpenseId;

/// roomledger - Shared Household Expense Ledger
#[derive(Parser)]
#[command(name = "roomledger")]
#[command(about = "Track shared roommate expenses, deposits and balances for one session")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML) with the roster and currency symbol
    #[arg(short, long, env = "ROOMLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Run session commands from a file instead of reading standard input
    #[arg(short, long)]
    pub script: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line typed into a session.
#[derive(Parser)]
#[command(name = "roomledger", no_binary_name = true, disable_version_flag = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a shared expense
    Expense {
        /// Amount spent (e.g., "150" or "12.50")
        #[arg(allow_negative_numbers = true)]
        amount: Option<String>,

        /// What the money was spent on
        description: Vec<String>,

        /// Roommate who paid
        #[arg(short, long)]
        payer: Option<String>,

        /// Roommates sharing the cost, comma-separated (defaults to everyone)
        #[arg(short, long, value_delimiter = ',')]
        involved: Vec<String>,

        /// Category: Tea, Breakfast, Lunch, Dinner, Other (defaults to Other)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Change the description, amount or category of an expense
    Edit {
        /// Expense ID
        id: ExpenseId,

        /// Field to change, e.g. amount=120 (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: ExpenseId,
    },

    /// Add money to the shared pool for a roommate
    Deposit {
        /// Roommate making the deposit
        participant: String,

        /// Amount deposited (e.g., "500")
        #[arg(allow_negative_numbers = true)]
        amount: String,
    },

    /// Show balance for a roommate or everyone
    Balance {
        /// Roommate name (omit for everyone)
        participant: Option<String>,
    },

    /// Show totals and every roommate's position
    Dashboard,

    /// List recorded expenses
    History {
        /// Only expenses a roommate shares in or paid for
        #[arg(short, long)]
        participant: Option<String>,
    },

    /// Show everything recorded for one roommate
    Show {
        /// Roommate name
        participant: String,
    },

    /// Spending breakdown by category
    Report,

    /// Export data to CSV or JSON
    Export {
        /// What to export
        #[arg(value_enum)]
        export_type: ExportType,

        /// Output file (printed if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the roommates on the roster
    Roster,

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportType {
    /// Expenses as CSV
    Expenses,
    /// Per-roommate balances as CSV
    Balances,
    /// Full ledger as JSON
    Snapshot,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let mut session = Session::new(&config);

        let stdout = std::io::stdout();
        let mut out = stdout.lock();

        match &self.script {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open script: {}", path.display()))?;
                session
                    .run_script(BufReader::new(file), &mut out)
                    .with_context(|| format!("Script {} failed", path.display()))
            }
            None => {
                let stdin = std::io::stdin();
                let prompt = stdin.is_terminal();
                session.run_interactive(stdin.lock(), &mut out, prompt)
            }
        }
    }
}
