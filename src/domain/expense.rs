use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Amount, Category, Participant, ParseAmountError, parse_positive_amount};

pub type ExpenseId = u64;

/// A shared spend: one roommate fronted `amount`, and it is split evenly
/// across everyone in `involved`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expense {
    /// Monotonically increasing, never reused within a ledger
    pub id: ExpenseId,
    pub description: String,
    /// Always positive
    pub amount: Amount,
    /// Who paid
    pub payer: Participant,
    /// Who shares the cost; non-empty, no duplicates, entry order kept
    pub involved: Vec<Participant>,
    pub category: Category,
    /// When the expense was recorded
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Create a new expense. The id must be assigned by the store.
    pub fn new(
        description: impl Into<String>,
        amount: Amount,
        payer: Participant,
        involved: Vec<Participant>,
        date: DateTime<Utc>,
    ) -> Self {
        assert!(
            amount.is_finite() && amount > 0.0,
            "Expense amount must be positive"
        );

        let mut unique: Vec<Participant> = Vec::with_capacity(involved.len());
        for participant in involved {
            if !unique.contains(&participant) {
                unique.push(participant);
            }
        }
        assert!(!unique.is_empty(), "Expense must involve someone");

        Self {
            id: 0, // Will be set by the store
            description: description.into(),
            amount,
            payer,
            involved: unique,
            category: Category::default(),
            date,
        }
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Each involved roommate's even share of the amount.
    pub fn share(&self) -> Amount {
        self.amount / self.involved.len() as Amount
    }

    pub fn involves(&self, participant: &Participant) -> bool {
        self.involved.contains(participant)
    }

    /// Involved in the split or fronted the money.
    pub fn concerns(&self, participant: &Participant) -> bool {
        self.payer == *participant || self.involves(participant)
    }

    /// Apply a patch in place. Only description, amount and category change.
    pub fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
    }
}

/// Partial update of an expense. Payer, participants and date are fixed
/// once an expense exists, so they have no slot here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub description: Option<String>,
    pub amount: Option<Amount>,
    pub category: Option<Category>,
}

impl ExpensePatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_amount(mut self, amount: Amount) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.amount.is_none() && self.category.is_none()
    }

    /// Set one field from user text, validating the value.
    /// Example: ("amount", "12.50"), ("category", "lunch")
    pub fn set(&mut self, field: &str, value: &str) -> Result<(), PatchError> {
        match field.trim().to_lowercase().as_str() {
            "description" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(PatchError::BlankDescription);
                }
                self.description = Some(value.to_string());
            }
            "amount" => {
                let amount = parse_positive_amount(value).map_err(PatchError::InvalidAmount)?;
                self.amount = Some(amount);
            }
            "category" => {
                let category = Category::from_str(value)
                    .ok_or_else(|| PatchError::UnknownCategory(value.trim().to_string()))?;
                self.category = Some(category);
            }
            "id" | "payer" | "involved" | "date" => {
                return Err(PatchError::ImmutableField(field.trim().to_lowercase()));
            }
            _ => return Err(PatchError::UnknownField(field.trim().to_string())),
        }
        Ok(())
    }

    /// Check a patch built through the `with_*` methods.
    pub fn validate(&self) -> Result<(), PatchError> {
        if self.is_empty() {
            return Err(PatchError::Empty);
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                return Err(PatchError::BlankDescription);
            }
        }
        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(PatchError::InvalidAmount(ParseAmountError::NotPositive(
                    amount.to_string(),
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    Empty,
    BlankDescription,
    InvalidAmount(ParseAmountError),
    UnknownCategory(String),
    ImmutableField(String),
    UnknownField(String),
}

impl std::fmt::Display for PatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatchError::Empty => write!(f, "nothing to change"),
            PatchError::BlankDescription => write!(f, "description cannot be blank"),
            PatchError::InvalidAmount(e) => write!(f, "invalid amount: {}", e),
            PatchError::UnknownCategory(name) => write!(
                f,
                "unknown category '{}' (valid: {})",
                name,
                Category::names()
            ),
            PatchError::ImmutableField(field) => {
                write!(f, "'{}' cannot be changed after an expense is recorded", field)
            }
            PatchError::UnknownField(field) => write!(
                f,
                "unknown field '{}' (editable: description, amount, category)",
                field
            ),
        }
    }
}

impl std::error::Error for PatchError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Roster;

    fn roster() -> Roster {
        Roster::new(["A", "B", "C"]).unwrap()
    }

    fn p(roster: &Roster, name: &str) -> Participant {
        roster.find(name).unwrap().clone()
    }

    #[test]
    fn test_create_expense() {
        let r = roster();
        let expense = Expense::new(
            "Groceries",
            90.0,
            p(&r, "A"),
            vec![p(&r, "A"), p(&r, "B"), p(&r, "C")],
            Utc::now(),
        )
        .with_category(Category::Dinner);

        assert_eq!(expense.description, "Groceries");
        assert_eq!(expense.category, Category::Dinner);
        assert_eq!(expense.share(), 30.0);
        assert!(expense.involves(&p(&r, "B")));
    }

    #[test]
    fn test_involved_is_deduplicated_in_order() {
        let r = roster();
        let expense = Expense::new(
            "Tea",
            10.0,
            p(&r, "A"),
            vec![p(&r, "B"), p(&r, "A"), p(&r, "B")],
            Utc::now(),
        );
        assert_eq!(expense.involved, vec![p(&r, "B"), p(&r, "A")]);
        assert_eq!(expense.share(), 5.0);
    }

    #[test]
    fn test_payer_outside_split_still_concerns() {
        let r = roster();
        let expense = Expense::new("Rent", 100.0, p(&r, "C"), vec![p(&r, "A")], Utc::now());
        assert!(!expense.involves(&p(&r, "C")));
        assert!(expense.concerns(&p(&r, "C")));
        assert!(!expense.concerns(&p(&r, "B")));
    }

    #[test]
    #[should_panic(expected = "Expense amount must be positive")]
    fn test_expense_requires_positive_amount() {
        let r = roster();
        Expense::new("Nothing", 0.0, p(&r, "A"), vec![p(&r, "A")], Utc::now());
    }

    #[test]
    #[should_panic(expected = "Expense must involve someone")]
    fn test_expense_requires_participants() {
        let r = roster();
        Expense::new("Nobody", 5.0, p(&r, "A"), vec![], Utc::now());
    }

    #[test]
    fn test_apply_patch_touches_only_given_fields() {
        let r = roster();
        let mut expense = Expense::new("Lunch", 60.0, p(&r, "A"), vec![p(&r, "A")], Utc::now());
        let before = expense.clone();

        expense.apply(&ExpensePatch::new().with_amount(75.0));

        assert_eq!(expense.amount, 75.0);
        assert_eq!(expense.description, before.description);
        assert_eq!(expense.payer, before.payer);
        assert_eq!(expense.date, before.date);
    }

    #[test]
    fn test_patch_set_fields() {
        let mut patch = ExpensePatch::new();
        patch.set("description", " Dinner out ").unwrap();
        patch.set("AMOUNT", "42.5").unwrap();
        patch.set("category", "dinner").unwrap();

        assert_eq!(patch.description.as_deref(), Some("Dinner out"));
        assert_eq!(patch.amount, Some(42.5));
        assert_eq!(patch.category, Some(Category::Dinner));
    }

    #[test]
    fn test_patch_rejects_immutable_fields() {
        let mut patch = ExpensePatch::new();
        for field in ["payer", "involved", "date", "id"] {
            assert_eq!(
                patch.set(field, "x"),
                Err(PatchError::ImmutableField(field.to_string()))
            );
        }
        assert!(patch.is_empty());
    }

    #[test]
    fn test_patch_rejects_bad_values() {
        let mut patch = ExpensePatch::new();
        assert!(matches!(
            patch.set("amount", "-3"),
            Err(PatchError::InvalidAmount(_))
        ));
        assert!(matches!(
            patch.set("category", "snacks"),
            Err(PatchError::UnknownCategory(_))
        ));
        assert_eq!(
            patch.set("description", "   "),
            Err(PatchError::BlankDescription)
        );
        assert!(matches!(
            patch.set("colour", "red"),
            Err(PatchError::UnknownField(_))
        ));
    }

    #[test]
    fn test_validate_patch() {
        assert_eq!(ExpensePatch::new().validate(), Err(PatchError::Empty));
        assert!(ExpensePatch::new().with_amount(0.0).validate().is_err());
        assert!(ExpensePatch::new().with_description(" ").validate().is_err());
        assert!(ExpensePatch::new().with_category(Category::Tea).validate().is_ok());
    }
}
