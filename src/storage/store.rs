use crate::domain::{
    DepositEvent, DepositLedger, Expense, ExpenseId, ExpensePatch, cumulative_deposits,
};

/// In-memory container for expenses and deposits.
///
/// The store trusts its inputs: validation happens in the service before
/// anything reaches it. Data lives only as long as the process.
#[derive(Debug)]
pub struct Store {
    expenses: Vec<Expense>,
    deposits: Vec<DepositEvent>,
    next_expense_id: ExpenseId,
    next_deposit_sequence: u64,
}

impl Store {
    pub fn new() -> Self {
        Self {
            expenses: Vec::new(),
            deposits: Vec::new(),
            next_expense_id: 1,
            next_deposit_sequence: 1,
        }
    }

    // ========================
    // Expense operations
    // ========================

    /// Append an expense, assigning it the next id.
    pub fn save_expense(&mut self, expense: &mut Expense) {
        expense.id = self.next_expense_id;
        self.next_expense_id += 1;
        self.expenses.push(expense.clone());
    }

    pub fn get_expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    /// Apply a patch to the expense with the given id.
    /// Returns the updated expense, or `None` when no such expense exists.
    pub fn update_expense(&mut self, id: ExpenseId, patch: &ExpensePatch) -> Option<&Expense> {
        let expense = self.expenses.iter_mut().find(|e| e.id == id)?;
        expense.apply(patch);
        Some(&*expense)
    }

    /// Remove the expense with the given id, returning it if it existed.
    pub fn delete_expense(&mut self, id: ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        Some(self.expenses.remove(index))
    }

    /// All expenses in insertion order.
    pub fn list_expenses(&self) -> &[Expense] {
        &self.expenses
    }

    // ========================
    // Deposit operations
    // ========================

    /// Append a deposit event, assigning it the next sequence number.
    pub fn save_deposit(&mut self, deposit: &mut DepositEvent) {
        deposit.sequence = self.next_deposit_sequence;
        self.next_deposit_sequence += 1;
        self.deposits.push(deposit.clone());
    }

    /// All deposit events in insertion order.
    pub fn list_deposits(&self) -> &[DepositEvent] {
        &self.deposits
    }

    /// Running deposit total per participant.
    pub fn cumulative_deposits(&self) -> DepositLedger {
        cumulative_deposits(&self.deposits)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{Category, Participant, Roster};

    fn alice() -> Participant {
        Roster::new(["Alice"]).unwrap().find("alice").unwrap().clone()
    }

    fn expense(amount: f64) -> Expense {
        Expense::new("test", amount, alice(), vec![alice()], Utc::now())
    }

    #[test]
    fn test_ids_are_sequential_and_not_reused() {
        let mut store = Store::new();

        let mut first = expense(10.0);
        let mut second = expense(20.0);
        store.save_expense(&mut first);
        store.save_expense(&mut second);
        assert_eq!((first.id, second.id), (1, 2));

        store.delete_expense(second.id);
        let mut third = expense(30.0);
        store.save_expense(&mut third);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut store = Store::new();
        for amount in [5.0, 1.0, 3.0] {
            store.save_expense(&mut expense(amount));
        }

        let amounts: Vec<f64> = store.list_expenses().iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![5.0, 1.0, 3.0]);
    }

    #[test]
    fn test_update_and_delete_missing_are_none() {
        let mut store = Store::new();
        let patch = ExpensePatch::new().with_category(Category::Tea);

        assert!(store.update_expense(42, &patch).is_none());
        assert!(store.delete_expense(42).is_none());
    }

    #[test]
    fn test_update_expense() {
        let mut store = Store::new();
        let mut e = expense(10.0);
        store.save_expense(&mut e);

        let updated = store
            .update_expense(e.id, &ExpensePatch::new().with_description("Chai"))
            .unwrap();
        assert_eq!(updated.description, "Chai");
        assert_eq!(store.get_expense(e.id).unwrap().description, "Chai");
    }

    #[test]
    fn test_deposits_accumulate() {
        let mut store = Store::new();
        store.save_deposit(&mut DepositEvent::new(alice(), 50.0, Utc::now()));
        store.save_deposit(&mut DepositEvent::new(alice(), 50.0, Utc::now()));

        assert_eq!(store.list_deposits().len(), 2);
        assert_eq!(store.list_deposits()[1].sequence, 2);
        assert_eq!(store.cumulative_deposits()[&alice()], 100.0);
    }
}
