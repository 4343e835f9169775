//! The analytics aggregation core.
//!
//! Pure, synchronous derivations over in-memory transaction and budget lists:
//! spend by category, percentage shares, budget utilization and chart-ready
//! top-N series. Nothing in here touches the database or mutates its inputs,
//! so calling any function twice on the same data gives the same result.

use std::{cmp::Ordering, collections::HashMap};

use serde::Serialize;

use crate::models::{Budget, Transaction, TransactionType};

/// The display label substituted for an empty or missing category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// The fraction of a budget at which the near-limit warning kicks in.
const NEAR_LIMIT_RATIO: f64 = 0.9;

/// How many entries the top-categories chart shows.
pub const TOP_CATEGORY_COUNT: usize = 6;

/// The canonical grouping key for a category label.
///
/// Every aggregation entry point goes through this function so that
/// transactions, budgets and display labels always agree on what counts as
/// the same category: matching is trimmed and case-insensitive, and an empty
/// label maps to the key for [UNCATEGORIZED].
pub fn canonical_category(label: &str) -> String {
    display_category(label).to_lowercase()
}

/// The label shown to users for a raw category string.
///
/// Trims surrounding whitespace and substitutes [UNCATEGORIZED] for empty
/// labels; otherwise the original casing is preserved.
pub fn display_category(label: &str) -> &str {
    let trimmed = label.trim();

    if trimmed.is_empty() { UNCATEGORIZED } else { trimmed }
}

/// Coerce a JSON value into a transaction amount.
///
/// Malformed input never raises at the aggregation boundary: non-numeric and
/// missing amounts become 0 so that display always renders. Each coercion is
/// logged so bad upstream data is visible and distinguishable from a true
/// zero.
pub fn coerce_amount(value: &serde_json::Value) -> f64 {
    match value {
        serde_json::Value::Number(number) => number.as_f64().unwrap_or_else(|| {
            tracing::warn!("coerced out-of-range amount {number} to 0");
            0.0
        }),
        serde_json::Value::String(text) => text.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("coerced non-numeric amount {text:?} to 0");
            0.0
        }),
        other => {
            tracing::warn!("coerced non-numeric amount {other} to 0");
            0.0
        }
    }
}

/// The total amount spent or earned in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The display label, taken from the first transaction seen for the
    /// category.
    pub category: String,
    /// The sum of the matching transaction amounts.
    pub total: f64,
}

/// Group the transactions of one type by category and sum their amounts.
///
/// Categories are matched via [canonical_category] while the display label of
/// the first occurrence is preserved. The output order is the order in which
/// each category was first seen; sorting for display is the caller's job.
/// An empty transaction list yields an empty vector.
pub fn category_spend(transactions: &[Transaction], kind: TransactionType) -> Vec<CategoryTotal> {
    accumulate(transactions, kind)
        .into_iter()
        .map(|entry| CategoryTotal {
            category: entry.label,
            total: entry.total,
        })
        .collect()
}

/// The share of `whole` that `part` represents, as a percentage rounded to
/// one decimal place.
///
/// Returns 0 when `whole` is zero or negative. A zero total is a legitimate
/// and common state (no expenses yet), not an error.
pub fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 {
        return 0.0;
    }

    (part / whole * 1000.0).round() / 10.0
}

/// The share of `whole` that `part` represents, rounded to the nearest whole
/// percent and clamped to `[0, 100]`.
///
/// This is the progress-bar variant of [percentage_of]: a bar cannot exceed
/// 100% of its track, so overflow is clamped rather than reported. Returns 0
/// when `whole` is zero or negative.
pub fn bar_width(part: f64, whole: f64) -> u8 {
    if whole <= 0.0 {
        return 0;
    }

    (part / whole * 100.0).round().clamp(0.0, 100.0) as u8
}

/// A budget paired with the amount actually spent against it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetUsage {
    /// The ID of the budget.
    pub id: i64,
    /// The budget's category label.
    pub category: String,
    /// The cap.
    pub amount: f64,
    /// The expense total for the matching category. 0 when no transaction
    /// matches.
    pub used: f64,
    /// `used` as a share of `amount`, clamped to `[0, 100]` for rendering.
    pub percentage: u8,
    /// Whether spending has reached 90% of the cap.
    pub near_limit: bool,
}

/// Pair each budget with the expense total for its category.
///
/// Categories are matched case-insensitively via [canonical_category].
/// The output order is the input budget order; no implicit resort.
pub fn budget_usage(budgets: &[Budget], transactions: &[Transaction]) -> Vec<BudgetUsage> {
    let spend_by_category: HashMap<String, f64> =
        category_spend(transactions, TransactionType::Expense)
            .into_iter()
            .map(|entry| (canonical_category(&entry.category), entry.total))
            .collect();

    budgets
        .iter()
        .map(|budget| {
            let used = spend_by_category
                .get(&canonical_category(&budget.category))
                .copied()
                .unwrap_or(0.0);

            BudgetUsage {
                id: budget.id,
                category: budget.category.clone(),
                amount: budget.amount,
                used,
                percentage: bar_width(used, budget.amount),
                near_limit: budget.amount > 0.0 && used / budget.amount >= NEAR_LIMIT_RATIO,
            }
        })
        .collect()
}

/// A derived aggregate for one category within a transaction type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The display label, taken from the first transaction seen for the
    /// category.
    pub category: String,
    /// The transaction type the summary covers.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// The sum of the matching transaction amounts.
    pub total_amount: f64,
    /// The number of matching transactions.
    pub count: u64,
    /// The category's share of its type's total, rounded to one decimal.
    pub percentage: f64,
}

/// The income/expense totals over a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// The sum of all income amounts.
    pub total_income: f64,
    /// The sum of all expense amounts.
    pub total_expense: f64,
    /// The number of transactions considered, of either type.
    pub total_transactions: u64,
}

/// The full analytics payload: totals plus per-category summaries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsSummary {
    /// The income/expense totals.
    pub totals: Totals,
    /// Expense category summaries sorted by total descending, followed by
    /// income category summaries sorted likewise.
    pub categories: Vec<CategorySummary>,
}

/// Derive the analytics summary for a list of transactions.
///
/// Expense categories come first, sorted by total amount descending, then
/// income categories, likewise sorted. Ties keep the order in which the
/// categories first appeared in the input (stable sort), so repeated calls on
/// the same data never visibly swap rows.
pub fn summarize(transactions: &[Transaction]) -> AnalyticsSummary {
    let total_income: f64 = transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Income)
        .map(|transaction| transaction.amount)
        .sum();
    let total_expense: f64 = transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionType::Expense)
        .map(|transaction| transaction.amount)
        .sum();

    let mut categories =
        summarize_type(transactions, TransactionType::Expense, total_expense);
    categories.extend(summarize_type(
        transactions,
        TransactionType::Income,
        total_income,
    ));

    AnalyticsSummary {
        totals: Totals {
            total_income,
            total_expense,
            total_transactions: transactions.len() as u64,
        },
        categories,
    }
}

fn summarize_type(
    transactions: &[Transaction],
    kind: TransactionType,
    type_total: f64,
) -> Vec<CategorySummary> {
    let mut summaries: Vec<CategorySummary> = accumulate(transactions, kind)
        .into_iter()
        .map(|entry| CategorySummary {
            category: entry.label,
            kind,
            total_amount: entry.total,
            count: entry.count,
            percentage: percentage_of(entry.total, type_total),
        })
        .collect();

    sort_by_total_descending(&mut summaries);

    summaries
}

/// The `n` largest category summaries by total amount.
///
/// The sort is stable: two categories with equal totals keep their relative
/// input order across repeated calls. Returns fewer than `n` entries when the
/// input is smaller, and an empty vector for empty input.
pub fn top_categories(summaries: &[CategorySummary], n: usize) -> Vec<CategorySummary> {
    let mut top = summaries.to_vec();
    sort_by_total_descending(&mut top);
    top.truncate(n);

    top
}

fn sort_by_total_descending(summaries: &mut [CategorySummary]) {
    // Vec::sort_by is stable, which keeps ties in input order.
    summaries.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(Ordering::Equal)
    });
}

struct CategoryEntry {
    label: String,
    total: f64,
    count: u64,
}

/// Group transactions of `kind` by canonical category, preserving the display
/// label of the first occurrence and the order of first appearance.
fn accumulate(transactions: &[Transaction], kind: TransactionType) -> Vec<CategoryEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<CategoryEntry> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.kind == kind)
    {
        let key = canonical_category(&transaction.category);

        match index.get(&key) {
            Some(&position) => {
                entries[position].total += transaction.amount;
                entries[position].count += 1;
            }
            None => {
                index.insert(key, entries.len());
                entries.push(CategoryEntry {
                    label: display_category(&transaction.category).to_string(),
                    total: transaction.amount,
                    count: 1,
                });
            }
        }
    }

    entries
}
