use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::application::{Dashboard, LedgerService};
use crate::domain::{Amount, DepositEvent, Expense, Roster, format_amount};

pub const SNAPSHOT_VERSION: &str = "1";

/// Point-in-time copy of the ledger for JSON export.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub roster: Roster,
    pub expenses: Vec<Expense>,
    pub deposit_events: Vec<DepositEvent>,
    /// Keyed by name so the output order is stable
    pub deposits: BTreeMap<String, Amount>,
    pub dashboard: Dashboard,
}

/// Exporter for converting ledger data to CSV or JSON
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export expenses to CSV, one row per expense in recorded order
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "date",
            "description",
            "category",
            "amount",
            "payer",
            "involved",
        ])?;

        let mut count = 0;
        for expense in self.service.expenses() {
            let involved = expense
                .involved
                .iter()
                .map(|p| p.name())
                .collect::<Vec<_>>()
                .join(";");

            csv_writer.write_record([
                expense.id.to_string(),
                expense.date.to_rfc3339(),
                expense.description.clone(),
                expense.category.to_string(),
                format_amount(expense.amount),
                expense.payer.to_string(),
                involved,
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export per-roommate balances to CSV, in roster order
    pub fn export_balances_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let dashboard = self.service.dashboard();
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["participant", "deposited", "spent", "balance"])?;

        for row in &dashboard.rows {
            csv_writer.write_record([
                row.participant.to_string(),
                format_amount(row.deposited),
                format_amount(row.spent),
                format_amount(row.balance),
            ])?;
        }

        csv_writer.flush()?;
        Ok(dashboard.rows.len())
    }

    /// Build a snapshot of the whole ledger
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            exported_at: Utc::now(),
            roster: self.service.roster().clone(),
            expenses: self.service.expenses().to_vec(),
            deposit_events: self.service.deposit_events().to_vec(),
            deposits: self
                .service
                .deposits()
                .into_iter()
                .map(|(participant, amount)| (participant.name().to_string(), amount))
                .collect(),
            dashboard: self.service.dashboard(),
        }
    }

    /// Export the full snapshot as pretty-printed JSON
    pub fn export_snapshot_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = self.snapshot();
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }
}
