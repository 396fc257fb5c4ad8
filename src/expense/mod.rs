//! Expense management.
//!
//! This module contains everything related to expenses:
//! - The `Expense` model and `NewExpense` builder
//! - Database functions that write expenses together with their category's monthly stats
//! - Route handlers for the expense API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod state;

pub use core::{
    Expense, NewExpense, create_expense, create_expense_table, delete_expense, get_all_expenses,
    get_expense, get_expenses_by_category, update_expense,
};
pub use create_endpoint::{ExpenseForm, create_expense_endpoint};
pub use delete_endpoint::delete_expense_endpoint;
pub use edit_endpoint::update_expense_endpoint;
pub use list_endpoint::{get_expense_endpoint, get_expenses_endpoint};
pub use state::ExpenseState;

#[cfg(test)]
pub use core::count_expenses;
