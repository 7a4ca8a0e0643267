mod common;

use common::{household, member};
use roomledger::application::AppError;
use roomledger::domain::{Category, ExpensePatch, ParseAmountError, PatchError};

#[test]
fn test_add_expense_records_all_fields() {
    let mut service = household();

    let expense = service
        .add_expense("  Pizza night ", "120.50", "b", &["A", "b"], Some("dinner"))
        .unwrap();

    assert_eq!(expense.id, 1);
    assert_eq!(expense.description, "Pizza night");
    assert_eq!(expense.amount, 120.5);
    assert_eq!(expense.payer, member(&service, "B"));
    assert_eq!(
        expense.involved,
        vec![member(&service, "A"), member(&service, "B")]
    );
    assert_eq!(expense.category, Category::Dinner);
    assert_eq!(service.expense(1), Some(&expense));
}

#[test]
fn test_expenses_keep_insertion_order() {
    let mut service = household();
    for description in ["first", "second", "third"] {
        service
            .add_expense(description, "10", "A", &["A"], None)
            .unwrap();
    }

    let descriptions: Vec<&str> = service
        .expenses()
        .iter()
        .map(|e| e.description.as_str())
        .collect();
    assert_eq!(descriptions, vec!["first", "second", "third"]);
}

#[test]
fn test_invalid_amounts_are_rejected_without_mutation() {
    let mut service = household();

    for amount in ["abc", "0", "-20", "inf", "NaN", "1.2.3"] {
        let result = service.add_expense("Tea", amount, "A", &["A"], None);
        assert!(
            matches!(result, Err(AppError::InvalidAmount(_))),
            "amount {amount:?} should be rejected"
        );
    }
    assert!(service.expenses().is_empty());
}

#[test]
fn test_unknown_names_are_rejected() {
    let mut service = household();

    assert!(matches!(
        service.add_expense("Tea", "10", "Zed", &["A"], None),
        Err(AppError::UnknownParticipant { .. })
    ));
    assert!(matches!(
        service.add_expense("Tea", "10", "A", &["A", "Zed"], None),
        Err(AppError::UnknownParticipant { .. })
    ));
    assert!(matches!(
        service.add_expense("Tea", "10", "A", &["A"], Some("Snacks")),
        Err(AppError::UnknownCategory { .. })
    ));
    assert!(matches!(
        service.add_expense("Tea", "10", "A", &["", " "], None),
        Err(AppError::NoParticipants)
    ));
    assert!(service.expenses().is_empty());
}

#[test]
fn test_validation_message_is_human_readable() {
    let mut service = household();
    let err = service
        .add_expense("Tea", "ten", "A", &["A"], None)
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid amount: 'ten' is not a number");

    let err = service
        .add_expense("Tea", "10", "Zed", &["A"], None)
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown roommate 'Zed' (roster: A, B, C)");
}

#[test]
fn test_edit_changes_only_mutable_fields() {
    let mut service = household();
    let original = service
        .add_expense("Lunch", "90", "A", &["A", "B", "C"], Some("Lunch"))
        .unwrap();

    let updated = service
        .edit_expense(
            original.id,
            ExpensePatch::new()
                .with_description("Late lunch")
                .with_amount(120.0)
                .with_category(Category::Dinner),
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.description, "Late lunch");
    assert_eq!(updated.amount, 120.0);
    assert_eq!(updated.category, Category::Dinner);
    assert_eq!(updated.payer, original.payer);
    assert_eq!(updated.involved, original.involved);
    assert_eq!(updated.date, original.date);
    assert_eq!(service.expense(original.id), Some(&updated));
}

#[test]
fn test_edit_unknown_id_is_a_no_op() {
    let mut service = household();
    service.add_expense("Tea", "10", "A", &["A"], None).unwrap();
    let before = service.expenses().to_vec();

    let result = service
        .edit_expense(99, ExpensePatch::new().with_amount(5.0))
        .unwrap();

    assert!(result.is_none());
    assert_eq!(service.expenses(), before.as_slice());
}

#[test]
fn test_invalid_edit_is_rejected() {
    let mut service = household();
    let expense = service.add_expense("Tea", "10", "A", &["A"], None).unwrap();

    assert!(matches!(
        service.edit_expense(expense.id, ExpensePatch::new()),
        Err(AppError::InvalidPatch(PatchError::Empty))
    ));
    assert!(matches!(
        service.edit_expense(expense.id, ExpensePatch::new().with_amount(-1.0)),
        Err(AppError::InvalidPatch(PatchError::InvalidAmount(_)))
    ));
    assert_eq!(service.expense(expense.id).unwrap().amount, 10.0);
}

#[test]
fn test_patch_refuses_immutable_fields() {
    let mut patch = ExpensePatch::new();
    let err = patch.set("payer", "B").unwrap_err();
    assert_eq!(err, PatchError::ImmutableField("payer".into()));
    assert_eq!(
        err.to_string(),
        "'payer' cannot be changed after an expense is recorded"
    );
}

#[test]
fn test_delete_expense() {
    let mut service = household();
    let first = service.add_expense("One", "10", "A", &["A"], None).unwrap();
    let second = service.add_expense("Two", "20", "B", &["B"], None).unwrap();

    let deleted = service.delete_expense(first.id).unwrap();
    assert_eq!(deleted.description, "One");
    assert_eq!(service.expenses(), &[second]);

    // Deleting again is a silent no-op
    assert!(service.delete_expense(first.id).is_none());
    assert_eq!(service.expenses().len(), 1);
}

#[test]
fn test_ids_are_not_reused_after_delete() {
    let mut service = household();
    let first = service.add_expense("One", "10", "A", &["A"], None).unwrap();
    service.delete_expense(first.id);

    let next = service.add_expense("Two", "10", "A", &["A"], None).unwrap();
    assert_eq!(next.id, 2);
}

#[test]
fn test_deposits_accumulate_per_participant() {
    let mut service = household();
    service.add_deposit("A", "50").unwrap();
    service.add_deposit("a", "50").unwrap();

    let deposits = service.deposits();
    assert_eq!(deposits.len(), 1);
    assert_eq!(deposits[&member(&service, "A")], 100.0);
    assert_eq!(service.deposit_events().len(), 2);
    assert_eq!(service.total_deposits(), 100.0);
}

#[test]
fn test_deposit_validation() {
    let mut service = household();

    assert!(matches!(
        service.add_deposit("", "10"),
        Err(AppError::MissingField("participant"))
    ));
    assert!(matches!(
        service.add_deposit("Zed", "10"),
        Err(AppError::UnknownParticipant { .. })
    ));
    assert!(matches!(
        service.add_deposit("A", ""),
        Err(AppError::InvalidAmount(ParseAmountError::Missing))
    ));
    assert!(matches!(
        service.add_deposit("A", "-10"),
        Err(AppError::InvalidAmount(ParseAmountError::NotPositive(_)))
    ));
    assert!(service.deposits().is_empty());
}

#[test]
fn test_deleting_expense_leaves_deposits_alone() {
    let mut service = household();
    service.add_deposit("B", "40").unwrap();
    let expense = service.add_expense("Tea", "12", "B", &["B"], None).unwrap();

    service.delete_expense(expense.id);

    assert_eq!(service.total_deposits(), 40.0);
}

#[test]
fn test_corrections_stop_exactly_at_zero() {
    let mut service = household().with_negative_deposits(true);
    service.add_deposit("C", "0.3").unwrap();
    service.add_deposit("C", "-0.1").unwrap();
    service.add_deposit("C", "-0.2").unwrap();
    assert!(service.total_deposits().abs() < 1e-9);

    assert!(matches!(
        service.add_deposit("C", "-0.01"),
        Err(AppError::DepositBelowZero { .. })
    ));
    assert_eq!(service.deposit_events().len(), 3);
}
