//! Month bucketing for the dashboard's current-month and previous-months
//! views.

use crate::core::aggregator;
use crate::models::{ExpenseRecord, MemberBalance, User};
use chrono::Datelike;

/// Expenses whose payment date falls in the given calendar month (UTC).
pub fn expenses_in_month(
    expenses: &[ExpenseRecord],
    year: i32,
    month: u32,
) -> Vec<ExpenseRecord> {
    expenses
        .iter()
        .filter(|e| e.payment_date.year() == year && e.payment_date.month() == month)
        .cloned()
        .collect()
}

/// Per-member totals restricted to one calendar month.
pub fn monthly_totals(
    participants: &[User],
    expenses: &[ExpenseRecord],
    year: i32,
    month: u32,
) -> Vec<MemberBalance> {
    let bucket = expenses_in_month(expenses, year, month);
    aggregator::compute_totals(participants, &bucket)
}
