use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{
    Amount, Balances, Category, DepositEvent, DepositLedger, Expense, ExpenseId, ExpensePatch,
    HALF_CENT, Participant, Roster, compute_balances, deposited_by, parse_amount,
    parse_positive_amount,
    person_expense_total, pool_remainder, total_deposits, total_expenses,
};
use crate::storage::Store;

use super::AppError;

/// Application service providing high-level operations for the ledger.
/// This is the primary interface for any client (CLI, tests, a future UI).
///
/// Every mutation validates its raw inputs first and either applies in full
/// or leaves the ledger untouched.
pub struct LedgerService {
    roster: Roster,
    store: Store,
    allow_negative_deposits: bool,
}

impl LedgerService {
    /// Create an empty ledger for the given roster.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            store: Store::new(),
            allow_negative_deposits: false,
        }
    }

    /// Create an empty ledger from loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.roster.clone()).with_negative_deposits(config.allow_negative_deposits)
    }

    /// Accept negative deposits as correction entries.
    pub fn with_negative_deposits(mut self, allow: bool) -> Self {
        self.allow_negative_deposits = allow;
        self
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Resolve a roommate name against the roster.
    pub fn participant(&self, name: &str) -> Result<&Participant, AppError> {
        self.roster
            .find(name)
            .ok_or_else(|| AppError::UnknownParticipant {
                name: name.trim().to_string(),
                roster: self.roster.names(),
            })
    }

    // ========================
    // Expense operations
    // ========================

    /// Record a new expense.
    ///
    /// `involved` lists the roommates sharing the cost; repeated names count
    /// once. A missing category means "Other".
    pub fn add_expense<S: AsRef<str>>(
        &mut self,
        description: &str,
        amount: &str,
        payer: &str,
        involved: &[S],
        category: Option<&str>,
    ) -> Result<Expense, AppError> {
        let mut expense = self
            .validate_expense(description, amount, payer, involved, category)
            .inspect_err(|e| warn!("Rejected expense: {}", e))?;

        self.store.save_expense(&mut expense);
        info!(
            id = expense.id,
            amount = expense.amount,
            payer = %expense.payer,
            involved = expense.involved.len(),
            "Recorded expense"
        );
        Ok(expense)
    }

    fn validate_expense<S: AsRef<str>>(
        &self,
        description: &str,
        amount: &str,
        payer: &str,
        involved: &[S],
        category: Option<&str>,
    ) -> Result<Expense, AppError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(AppError::MissingField("description"));
        }
        if amount.trim().is_empty() {
            return Err(AppError::MissingField("amount"));
        }
        if payer.trim().is_empty() {
            return Err(AppError::MissingField("payer"));
        }
        if involved.iter().all(|name| name.as_ref().trim().is_empty()) {
            return Err(AppError::NoParticipants);
        }

        let amount = parse_positive_amount(amount)?;
        let payer = self.participant(payer)?.clone();
        let involved = involved
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !name.trim().is_empty())
            .map(|name| self.participant(name).cloned())
            .collect::<Result<Vec<_>, _>>()?;

        let category = match category.map(str::trim).filter(|c| !c.is_empty()) {
            Some(name) => Category::from_str(name).ok_or_else(|| AppError::UnknownCategory {
                name: name.to_string(),
                valid: Category::names(),
            })?,
            None => Category::default(),
        };

        Ok(Expense::new(description, amount, payer, involved, chrono::Utc::now())
            .with_category(category))
    }

    /// Change the description, amount or category of an expense.
    ///
    /// Returns `Ok(None)` without changing anything when the id is unknown.
    pub fn edit_expense(
        &mut self,
        id: ExpenseId,
        patch: ExpensePatch,
    ) -> Result<Option<Expense>, AppError> {
        patch
            .validate()
            .inspect_err(|e| warn!(id, "Rejected edit: {}", e))?;

        match self.store.update_expense(id, &patch) {
            Some(expense) => {
                info!(id, "Edited expense");
                Ok(Some(expense.clone()))
            }
            None => {
                debug!(id, "Edit ignored, no such expense");
                Ok(None)
            }
        }
    }

    /// Remove an expense. Returns `None` when the id is unknown.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        let deleted = self.store.delete_expense(id);
        match &deleted {
            Some(_) => info!(id, "Deleted expense"),
            None => debug!(id, "Delete ignored, no such expense"),
        }
        deleted
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.store.get_expense(id)
    }

    /// All expenses in the order they were recorded.
    pub fn expenses(&self) -> &[Expense] {
        self.store.list_expenses()
    }

    // ========================
    // Deposit operations
    // ========================

    /// Add money to a roommate's running deposit total.
    pub fn add_deposit(&mut self, participant: &str, amount: &str) -> Result<DepositEvent, AppError> {
        let mut deposit = self
            .validate_deposit(participant, amount)
            .inspect_err(|e| warn!("Rejected deposit: {}", e))?;

        self.store.save_deposit(&mut deposit);
        info!(
            participant = %deposit.participant,
            amount = deposit.amount,
            "Recorded deposit"
        );
        Ok(deposit)
    }

    fn validate_deposit(&self, participant: &str, amount: &str) -> Result<DepositEvent, AppError> {
        if participant.trim().is_empty() {
            return Err(AppError::MissingField("participant"));
        }
        let participant = self.participant(participant)?.clone();

        let amount = if self.allow_negative_deposits {
            parse_amount(amount)?
        } else {
            parse_positive_amount(amount)?
        };

        if amount == 0.0 {
            return Err(AppError::NegativeDeposit(amount));
        }
        if amount < 0.0 {
            let resulting = deposited_by(&participant, &self.deposits()) + amount;
            // Float noise from fractional corrections must not block a return to zero
            if resulting < -HALF_CENT {
                return Err(AppError::DepositBelowZero {
                    participant: participant.to_string(),
                    resulting,
                });
            }
        }

        Ok(DepositEvent::new(participant, amount, chrono::Utc::now()))
    }

    /// Cumulative deposit per roommate.
    pub fn deposits(&self) -> DepositLedger {
        self.store.cumulative_deposits()
    }

    /// Individual deposit events in the order they were recorded.
    pub fn deposit_events(&self) -> &[DepositEvent] {
        self.store.list_deposits()
    }

    // ========================
    // Balance operations
    // ========================

    /// Balance for every roommate on the roster.
    pub fn balances(&self) -> Balances {
        compute_balances(self.roster.members(), self.expenses(), &self.deposits())
    }

    pub fn balance(&self, participant: &Participant) -> Amount {
        self.balances().get(participant).copied().unwrap_or(0.0)
    }

    pub fn total_expenses(&self) -> Amount {
        total_expenses(self.expenses())
    }

    pub fn total_deposits(&self) -> Amount {
        total_deposits(&self.deposits())
    }

    /// Deposits minus expenses.
    pub fn remaining_pool(&self) -> Amount {
        pool_remainder(self.expenses(), &self.deposits())
    }

    /// A roommate's summed shares of the expenses they are part of.
    pub fn spent_by(&self, participant: &Participant) -> Amount {
        person_expense_total(participant, self.expenses())
    }
}
