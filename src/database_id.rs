//! Database ID type definitions.

/// Database identifier for a category.
pub type CategoryId = i64;

/// Database identifier for an expense.
pub type ExpenseId = i64;
