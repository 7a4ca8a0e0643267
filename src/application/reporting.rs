use serde::Serialize;

use crate::domain::{
    Amount, Category, DepositEvent, Expense, Participant, category_totals, deposited_by,
    expenses_for,
};

use super::{AppError, LedgerService};

/// Household overview: totals plus one row per roommate.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_expenses: Amount,
    pub total_deposits: Amount,
    pub remaining_pool: Amount,
    pub rows: Vec<BalanceRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceRow {
    pub participant: Participant,
    pub deposited: Amount,
    /// Sum of this roommate's shares
    pub spent: Amount,
    pub balance: Amount,
}

/// Everything recorded for one roommate.
#[derive(Debug, Clone, Serialize)]
pub struct PersonDetail {
    pub participant: Participant,
    pub deposited: Amount,
    pub spent: Amount,
    pub balance: Amount,
    /// Expenses they share in or paid for
    pub expenses: Vec<Expense>,
    pub deposits: Vec<DepositEvent>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub categories: Vec<CategorySummary>,
    pub total: Amount,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
    pub total: Amount,
    pub average: Amount,
    pub percentage: f64,
}

impl LedgerService {
    /// Totals and per-roommate balances, in roster order.
    pub fn dashboard(&self) -> Dashboard {
        let deposits = self.deposits();
        let balances = self.balances();

        let rows = self
            .roster()
            .members()
            .iter()
            .map(|participant| BalanceRow {
                participant: participant.clone(),
                deposited: deposited_by(participant, &deposits),
                spent: self.spent_by(participant),
                balance: balances.get(participant).copied().unwrap_or(0.0),
            })
            .collect();

        Dashboard {
            total_expenses: self.total_expenses(),
            total_deposits: self.total_deposits(),
            remaining_pool: self.remaining_pool(),
            rows,
        }
    }

    /// Detail view for a single roommate, looked up by name.
    pub fn person_detail(&self, name: &str) -> Result<PersonDetail, AppError> {
        let participant = self.participant(name)?.clone();

        let expenses = expenses_for(&participant, self.expenses())
            .into_iter()
            .cloned()
            .collect();
        let deposits = self
            .deposit_events()
            .iter()
            .filter(|d| d.participant == participant)
            .cloned()
            .collect();

        Ok(PersonDetail {
            deposited: deposited_by(&participant, &self.deposits()),
            spent: self.spent_by(&participant),
            balance: self.balance(&participant),
            expenses,
            deposits,
            participant,
        })
    }

    /// Spending per category.
    pub fn category_report(&self) -> CategoryReport {
        let total = self.total_expenses();

        let categories = category_totals(self.expenses())
            .into_iter()
            .map(|(category, count, sum)| CategorySummary {
                category,
                count,
                total: sum,
                average: sum / count as Amount,
                percentage: if total > 0.0 { sum / total * 100.0 } else { 0.0 },
            })
            .collect();

        CategoryReport { categories, total }
    }
}
