use std::collections::HashMap;

use super::{Amount, Category, DepositLedger, Expense, Participant, deposited_by};

/// Net position per participant: deposited minus share of expenses.
pub type Balances = HashMap<Participant, Amount>;

/// Sum of all expense amounts.
pub fn total_expenses(expenses: &[Expense]) -> Amount {
    expenses.iter().map(|e| e.amount).sum()
}

/// Sum of all cumulative deposits.
pub fn total_deposits(deposits: &DepositLedger) -> Amount {
    deposits.values().sum()
}

/// What is left in the shared pool: deposits minus expenses.
pub fn pool_remainder(expenses: &[Expense], deposits: &DepositLedger) -> Amount {
    total_deposits(deposits) - total_expenses(expenses)
}

/// Compute balances for every participant.
/// Balance = cumulative deposit - sum of shares of expenses they are involved in.
///
/// Every participant gets an entry, including those with no activity.
pub fn compute_balances(
    participants: &[Participant],
    expenses: &[Expense],
    deposits: &DepositLedger,
) -> Balances {
    let mut balances: Balances = participants
        .iter()
        .map(|p| (p.clone(), deposited_by(p, deposits)))
        .collect();

    for expense in expenses {
        let share = expense.share();
        for participant in &expense.involved {
            *balances.entry(participant.clone()).or_insert(0.0) -= share;
        }
    }

    balances
}

/// Sum of one participant's shares across the expenses they are involved in.
pub fn person_expense_total(participant: &Participant, expenses: &[Expense]) -> Amount {
    expenses
        .iter()
        .filter(|e| e.involves(participant))
        .map(|e| e.share())
        .sum()
}

/// Expenses a participant shares in or paid for, in recorded order.
pub fn expenses_for<'a>(participant: &Participant, expenses: &'a [Expense]) -> Vec<&'a Expense> {
    expenses.iter().filter(|e| e.concerns(participant)).collect()
}

/// Count and total per category, in category declaration order.
/// Categories without expenses are left out.
pub fn category_totals(expenses: &[Expense]) -> Vec<(Category, usize, Amount)> {
    Category::ALL
        .iter()
        .filter_map(|category| {
            let (count, total) = expenses
                .iter()
                .filter(|e| e.category == *category)
                .fold((0, 0.0), |(count, total), e| (count + 1, total + e.amount));
            (count > 0).then_some((*category, count, total))
        })
        .collect()
}
