//! Core category domain types.

use serde::{Deserialize, Serialize};

use crate::{database_id::CategoryId, expense::Expense, stats::MonthlyStats};

/// A named grouping of expenses, e.g. 'Groceries' or 'Rent'.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// The ID of the category.
    pub id: CategoryId,
    /// The display name of the category.
    pub name: String,
    /// Free text describing what belongs in the category.
    pub description: String,
    /// The sum of the category's expenses per month.
    ///
    /// This is a cache maintained alongside the expense table and is never
    /// written directly by clients.
    pub monthly_stats: MonthlyStats,
}

/// A category together with its expenses and their total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetails {
    /// The category itself.
    #[serde(flatten)]
    pub category: Category,
    /// The sum of the amounts of `expenses`.
    pub total_amount: f64,
    /// Every expense in the category.
    pub expenses: Vec<Expense>,
}

impl CategoryDetails {
    /// Attach `expenses` to `category` and total their amounts.
    pub fn new(category: Category, expenses: Vec<Expense>) -> Self {
        let total_amount = expenses.iter().map(|expense| expense.amount).sum();

        Self {
            category,
            total_amount,
            expenses,
        }
    }
}

/// The request body for creating or updating a category.
///
/// Any `monthlyStats` sent by the client is ignored.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryForm {
    /// The display name of the category.
    pub name: String,
    /// Free text describing the category.
    #[serde(default)]
    pub description: Option<String>,
}
