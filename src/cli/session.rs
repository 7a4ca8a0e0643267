use std::fs::File;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;

use crate::application::LedgerService;
use crate::config::Config;
use crate::domain::{Amount, Expense, ExpensePatch, expenses_for, format_money};
use crate::io::Exporter;

use super::{Commands, ExportType, SessionLine};

/// Whether the session keeps reading commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One process lifetime of the ledger: owns the service and renders results.
pub struct Session {
    service: LedgerService,
    currency: String,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            service: LedgerService::from_config(config),
            currency: config.currency_symbol.clone(),
        }
    }

    pub fn service(&self) -> &LedgerService {
        &self.service
    }

    /// Read commands until end of input or `quit`. Errors are printed and
    /// the session carries on.
    pub fn run_interactive<R: BufRead, W: Write>(
        &mut self,
        input: R,
        out: &mut W,
        prompt: bool,
    ) -> Result<()> {
        if prompt {
            writeln!(
                out,
                "roomledger: {} roommates ({}). Type 'help' for commands.",
                self.service.roster().len(),
                self.service.roster().names()
            )?;
        }

        let mut lines = input.lines();
        loop {
            if prompt {
                write!(out, "> ")?;
                out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read input")?;

            match self.execute_line(&line, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => writeln!(out, "error: {:#}", e)?,
            }
        }
        Ok(())
    }

    /// Run every line of a script; the first failing line aborts.
    pub fn run_script<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for (index, line) in input.lines().enumerate() {
            let line = line.context("Failed to read script")?;
            let flow = self
                .execute_line(&line, out)
                .with_context(|| format!("line {}: {}", index + 1, line.trim()))?;
            if flow == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Parse and run a single line. Blank lines and `#` comments do nothing.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let words = split_line(line)?;
        let parsed = match SessionLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    write!(out, "{}", e.render())?;
                    return Ok(Flow::Continue);
                }
                _ => {
                    let rendered = e.render().to_string();
                    let first = rendered.lines().next().unwrap_or_default();
                    return Err(anyhow!("{}", first.trim_start_matches("error: ")));
                }
            },
        };

        self.run_command(parsed.command, out)
    }

    pub fn run_command<W: Write>(&mut self, command: Commands, out: &mut W) -> Result<Flow> {
        match command {
            Commands::Expense {
                amount,
                description,
                payer,
                involved,
                category,
            } => {
                let involved = if involved.is_empty() {
                    self.service
                        .roster()
                        .members()
                        .iter()
                        .map(|p| p.name().to_string())
                        .collect()
                } else {
                    involved
                };

                let expense = self.service.add_expense(
                    &description.join(" "),
                    amount.as_deref().unwrap_or_default(),
                    payer.as_deref().unwrap_or_default(),
                    &involved,
                    category.as_deref(),
                )?;

                writeln!(
                    out,
                    "Recorded expense #{}: {} {} ({}), paid by {}",
                    expense.id,
                    self.money(expense.amount),
                    expense.description,
                    expense.category,
                    expense.payer
                )?;
                writeln!(
                    out,
                    "  Split among {} ({} each)",
                    join_names(&expense),
                    self.money(expense.share())
                )?;
            }

            Commands::Edit { id, set } => {
                let patch = parse_patch(&set)?;
                match self.service.edit_expense(id, patch)? {
                    Some(expense) => writeln!(
                        out,
                        "Updated expense #{}: {} {} ({})",
                        expense.id,
                        self.money(expense.amount),
                        expense.description,
                        expense.category
                    )?,
                    None => writeln!(out, "No expense #{}; nothing changed", id)?,
                }
            }

            Commands::Delete { id } => match self.service.delete_expense(id) {
                Some(expense) => writeln!(
                    out,
                    "Deleted expense #{}: {} {}",
                    expense.id,
                    self.money(expense.amount),
                    expense.description
                )?,
                None => writeln!(out, "No expense #{}; nothing deleted", id)?,
            },

            Commands::Deposit {
                participant,
                amount,
            } => {
                let deposit = self.service.add_deposit(&participant, &amount)?;
                let total = self
                    .service
                    .deposits()
                    .get(&deposit.participant)
                    .copied()
                    .unwrap_or(0.0);
                writeln!(
                    out,
                    "Deposited {} for {} (total {})",
                    self.money(deposit.amount),
                    deposit.participant,
                    self.money(total)
                )?;
            }

            Commands::Balance { participant } => self.print_balance(participant.as_deref(), out)?,

            Commands::Dashboard => self.print_dashboard(out)?,

            Commands::History { participant } => self.print_history(participant.as_deref(), out)?,

            Commands::Show { participant } => self.print_person(&participant, out)?,

            Commands::Report => self.print_category_report(out)?,

            Commands::Export {
                export_type,
                output,
            } => self.export(export_type, output.as_deref(), out)?,

            Commands::Roster => {
                for participant in self.service.roster().members() {
                    writeln!(out, "{}", participant)?;
                }
            }

            Commands::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn money(&self, amount: Amount) -> String {
        format_money(&self.currency, amount)
    }

    fn print_balance<W: Write>(&self, participant: Option<&str>, out: &mut W) -> Result<()> {
        match participant {
            Some(name) => {
                let participant = self.service.participant(name)?;
                writeln!(
                    out,
                    "{}: {}",
                    participant,
                    self.money(self.service.balance(participant))
                )?;
            }
            None => {
                let balances = self.service.balances();
                writeln!(out, "{:<16} {:>14}", "ROOMMATE", "BALANCE")?;
                writeln!(out, "{}", "-".repeat(31))?;
                for participant in self.service.roster().members() {
                    let balance = balances.get(participant).copied().unwrap_or(0.0);
                    writeln!(
                        out,
                        "{:<16} {:>14}",
                        truncate(participant.name(), 16),
                        self.money(balance)
                    )?;
                }
            }
        }
        Ok(())
    }

    fn print_dashboard<W: Write>(&self, out: &mut W) -> Result<()> {
        let dashboard = self.service.dashboard();

        writeln!(
            out,
            "Total expenses: {:>14}",
            self.money(dashboard.total_expenses)
        )?;
        writeln!(
            out,
            "Total deposits: {:>14}",
            self.money(dashboard.total_deposits)
        )?;
        writeln!(
            out,
            "Remaining pool: {:>14}",
            self.money(dashboard.remaining_pool)
        )?;
        writeln!(out)?;

        writeln!(
            out,
            "{:<16} {:>14} {:>14} {:>14}",
            "ROOMMATE", "DEPOSITED", "SPENT", "BALANCE"
        )?;
        writeln!(out, "{}", "-".repeat(61))?;
        for row in &dashboard.rows {
            writeln!(
                out,
                "{:<16} {:>14} {:>14} {:>14}",
                truncate(row.participant.name(), 16),
                self.money(row.deposited),
                self.money(row.spent),
                self.money(row.balance)
            )?;
        }
        Ok(())
    }

    fn print_history<W: Write>(&self, participant: Option<&str>, out: &mut W) -> Result<()> {
        let expenses: Vec<&Expense> = match participant {
            Some(name) => {
                let participant = self.service.participant(name)?;
                expenses_for(participant, self.service.expenses())
            }
            None => self.service.expenses().iter().collect(),
        };

        if expenses.is_empty() {
            writeln!(out, "No expenses recorded yet.")?;
            return Ok(());
        }
        write_expense_table(out, &expenses, &self.currency)
    }

    fn print_person<W: Write>(&self, name: &str, out: &mut W) -> Result<()> {
        let detail = self.service.person_detail(name)?;

        writeln!(out, "{}", detail.participant)?;
        writeln!(out, "  Deposited: {:>14}", self.money(detail.deposited))?;
        writeln!(out, "  Spent:     {:>14}", self.money(detail.spent))?;
        writeln!(out, "  Balance:   {:>14}", self.money(detail.balance))?;
        writeln!(out)?;

        writeln!(out, "Expenses involving {}:", detail.participant)?;
        if detail.expenses.is_empty() {
            writeln!(out, "  No expenses yet")?;
        } else {
            let expenses: Vec<&Expense> = detail.expenses.iter().collect();
            write_expense_table(out, &expenses, &self.currency)?;
        }
        writeln!(out)?;

        writeln!(out, "Deposits made by {}:", detail.participant)?;
        if detail.deposits.is_empty() {
            writeln!(out, "  No deposits yet")?;
        } else {
            for deposit in &detail.deposits {
                writeln!(
                    out,
                    "  {:<20} {:>14}",
                    deposit.recorded_at.format("%Y-%m-%d %H:%M"),
                    self.money(deposit.amount)
                )?;
            }
        }
        Ok(())
    }

    fn print_category_report<W: Write>(&self, out: &mut W) -> Result<()> {
        let report = self.service.category_report();
        if report.categories.is_empty() {
            writeln!(out, "No expenses recorded yet.")?;
            return Ok(());
        }

        writeln!(
            out,
            "{:<12} {:>6} {:>14} {:>14} {:>7}",
            "CATEGORY", "COUNT", "TOTAL", "AVERAGE", "SHARE"
        )?;
        writeln!(out, "{}", "-".repeat(57))?;
        for summary in &report.categories {
            writeln!(
                out,
                "{:<12} {:>6} {:>14} {:>14} {:>6.1}%",
                summary.category.as_str(),
                summary.count,
                self.money(summary.total),
                self.money(summary.average),
                summary.percentage
            )?;
        }
        writeln!(out, "{}", "-".repeat(57))?;
        writeln!(out, "{:<12} {:>6} {:>14}", "Total", "", self.money(report.total))?;
        Ok(())
    }

    fn export<W: Write>(
        &self,
        export_type: ExportType,
        output: Option<&Path>,
        out: &mut W,
    ) -> Result<()> {
        let exporter = Exporter::new(&self.service);

        let Some(path) = output else {
            match export_type {
                ExportType::Expenses => exporter.export_expenses_csv(&mut *out)?,
                ExportType::Balances => exporter.export_balances_csv(&mut *out)?,
                ExportType::Snapshot => {
                    exporter.export_snapshot_json(&mut *out)?;
                    0
                }
            };
            return Ok(());
        };

        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;

        match export_type {
            ExportType::Expenses => {
                let count = exporter.export_expenses_csv(file)?;
                writeln!(out, "Exported {} expenses to {}", count, path.display())?;
            }
            ExportType::Balances => {
                let count = exporter.export_balances_csv(file)?;
                writeln!(out, "Exported {} balances to {}", count, path.display())?;
            }
            ExportType::Snapshot => {
                let snapshot = exporter.export_snapshot_json(file)?;
                writeln!(
                    out,
                    "Exported snapshot to {}: {} expenses, {} deposits",
                    path.display(),
                    snapshot.expenses.len(),
                    snapshot.deposit_events.len()
                )?;
            }
        }
        debug!(path = %path.display(), ?export_type, "Export written");
        Ok(())
    }
}

/// Split a line into shell-style words. A word starting with `#` begins a comment.
fn split_line(line: &str) -> Result<Vec<String>> {
    shlex::split(line).ok_or_else(|| anyhow!("unbalanced quotes or trailing backslash"))
}

/// Build a patch from `field=value` assignments.
fn parse_patch(assignments: &[String]) -> Result<ExpensePatch> {
    let mut patch = ExpensePatch::new();
    for assignment in assignments {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| anyhow!("expected FIELD=VALUE, got '{}'", assignment))?;
        patch
            .set(field, value)
            .map_err(crate::application::AppError::from)?;
    }
    Ok(patch)
}

fn write_expense_table<W: Write>(out: &mut W, expenses: &[&Expense], currency: &str) -> Result<()> {
    writeln!(
        out,
        "{:<5} {:<12} {:<10} {:>12} {:<12} DESCRIPTION",
        "ID", "DATE", "CATEGORY", "AMOUNT", "PAID BY"
    )?;
    writeln!(out, "{}", "-".repeat(75))?;

    for expense in expenses {
        writeln!(
            out,
            "{:<5} {:<12} {:<10} {:>12} {:<12} {}",
            expense.id,
            expense.date.format("%Y-%m-%d"),
            expense.category.as_str(),
            format_money(currency, expense.amount),
            truncate(expense.payer.name(), 12),
            truncate(&expense.description, 30)
        )?;
        writeln!(out, "{:<5} split among: {}", "", join_names(expense))?;
    }
    Ok(())
}

fn join_names(expense: &Expense) -> String {
    expense
        .involved
        .iter()
        .map(|p| p.name())
        .collect::<Vec<_>>()
        .join(", ")
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
