//! Rule-based spending suggestions.
//!
//! Pure derivations over a user's recent transactions, budgets and goals that
//! produce the messages served by the notification routes. Like the analytics
//! core this module never touches the database, so the same inputs always
//! yield the same suggestions.

use std::cmp::Ordering;

use time::Weekday;

use crate::{
    analytics::{budget_usage, category_spend, percentage_of},
    models::{Budget, Goal, GoalStatus, NotificationKind, Transaction, TransactionType},
};

/// The savings rate (percent of income) considered healthy.
const GOOD_SAVINGS_RATE: f64 = 20.0;

/// Below this savings rate the user gets a warning.
const LOW_SAVINGS_RATE: f64 = 10.0;

/// Categories where heavy spending is usually discretionary.
const DISCRETIONARY_CATEGORIES: &[&str] = &["Food", "Entertainment", "Shopping", "Transportation"];

/// A message produced by the suggestion rules, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Suggestion {
    /// The human-readable message.
    pub message: String,
    /// The flavor the notification should carry.
    pub kind: NotificationKind,
}

impl Suggestion {
    fn new(message: String, kind: NotificationKind) -> Self {
        Self { message, kind }
    }
}

/// Derive spending suggestions from a user's recent activity.
///
/// `transactions` should cover the recent window the advice is about (the
/// routes pass the last 30 days). Rules that lack the data they need simply
/// produce nothing, so an empty input yields no suggestions.
pub fn suggest(
    transactions: &[Transaction],
    budgets: &[Budget],
    goals: &[Goal],
) -> Vec<Suggestion> {
    let total_income: f64 = total_of(transactions, TransactionType::Income);
    let total_expense: f64 = total_of(transactions, TransactionType::Expense);
    let savings_rate = percentage_of(total_income - total_expense, total_income);

    let mut suggestions = Vec::new();

    if total_income > 0.0 {
        if savings_rate >= GOOD_SAVINGS_RATE {
            suggestions.push(Suggestion::new(
                format!(
                    "Your savings rate is good! You're saving {savings_rate:.1}% of your income."
                ),
                NotificationKind::Success,
            ));
        } else if savings_rate < LOW_SAVINGS_RATE {
            suggestions.push(Suggestion::new(
                format!(
                    "Try to save at least 20% of your income. Currently you're saving {savings_rate:.1}%."
                ),
                NotificationKind::Warning,
            ));
        }
    }

    if let Some(suggestion) = heavy_category_suggestion(transactions, total_expense) {
        suggestions.push(suggestion);
    }

    if let Some(suggestion) = weekend_spending_suggestion(transactions, total_expense) {
        suggestions.push(suggestion);
    }

    if let Some(suggestion) = goal_progress_suggestion(goals, savings_rate) {
        suggestions.push(suggestion);
    }

    for usage in budget_usage(budgets, transactions) {
        if usage.amount > 0.0 && usage.used > usage.amount {
            let excess = percentage_of(usage.used - usage.amount, usage.amount);
            if excess > 10.0 {
                suggestions.push(Suggestion::new(
                    format!(
                        "You've exceeded your budget for {} by {excess:.1}%.",
                        usage.category
                    ),
                    NotificationKind::Warning,
                ));
            }
        }
    }

    suggestions
}

fn total_of(transactions: &[Transaction], kind: TransactionType) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Flag the largest expense category when it dominates the total.
fn heavy_category_suggestion(
    transactions: &[Transaction],
    total_expense: f64,
) -> Option<Suggestion> {
    if total_expense <= 0.0 {
        return None;
    }

    let top = category_spend(transactions, TransactionType::Expense)
        .into_iter()
        .max_by(|a, b| a.total.partial_cmp(&b.total).unwrap_or(Ordering::Equal))?;
    let share = percentage_of(top.total, total_expense);

    if share > 40.0 && DISCRETIONARY_CATEGORIES.contains(&top.category.as_str()) {
        Some(Suggestion::new(
            format!(
                "You are spending too much on {}. Consider reducing expenses in this category.",
                top.category
            ),
            NotificationKind::Warning,
        ))
    } else if share > 30.0 && total_expense > 10_000.0 {
        Some(Suggestion::new(
            format!(
                "Your spending on {} is high ({share:.1}% of total expenses).",
                top.category
            ),
            NotificationKind::Tip,
        ))
    } else {
        None
    }
}

/// Flag weekend spending that clearly outpaces weekday spending.
fn weekend_spending_suggestion(
    transactions: &[Transaction],
    total_expense: f64,
) -> Option<Suggestion> {
    let mut weekend_total = 0.0;
    let mut weekend_count = 0u32;
    let mut weekday_total = 0.0;
    let mut weekday_count = 0u32;

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
    {
        match transaction.transaction_date.weekday() {
            Weekday::Saturday | Weekday::Sunday => {
                weekend_total += transaction.amount;
                weekend_count += 1;
            }
            _ => {
                weekday_total += transaction.amount;
                weekday_count += 1;
            }
        }
    }

    if weekend_count == 0 || weekday_count == 0 {
        return None;
    }

    let weekend_average = weekend_total / f64::from(weekend_count);
    let weekday_average = weekday_total / f64::from(weekday_count);

    if weekday_average > 0.0
        && weekend_average / weekday_average > 1.5
        && weekend_total > 0.3 * total_expense
    {
        Some(Suggestion::new(
            "Reduce weekend spending. Your weekend expenses are significantly higher than weekdays."
                .to_string(),
            NotificationKind::Tip,
        ))
    } else {
        None
    }
}

/// Nudge towards active goals when there is room to save more.
fn goal_progress_suggestion(goals: &[Goal], savings_rate: f64) -> Option<Suggestion> {
    let active: Vec<&Goal> = goals
        .iter()
        .filter(|goal| goal.status == GoalStatus::Active)
        .collect();

    if active.is_empty() {
        return None;
    }

    let target: f64 = active.iter().map(|goal| goal.target_amount).sum();
    let saved: f64 = active.iter().map(|goal| goal.saved_amount).sum();
    let progress = percentage_of(saved, target);

    if progress < 50.0 && savings_rate > 15.0 {
        Some(Suggestion::new(
            "You have active goals. Consider allocating more savings towards them.".to_string(),
            NotificationKind::Info,
        ))
    } else {
        None
    }
}
