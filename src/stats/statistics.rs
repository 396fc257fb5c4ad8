//! Aggregate statistics over every expense, for the statistics endpoint.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json,
    extract::{FromRef, State},
};
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    category::get_all_categories,
    database_id::CategoryId,
    db::lock_connection,
    expense::{Expense, get_all_expenses},
    response::ApiResponse,
    stats::{MonthKey, MonthlyStats},
};

/// The state needed to compute statistics.
#[derive(Debug, Clone)]
pub struct StatisticsState {
    /// The database connection for reading expenses and categories.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for StatisticsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Spending totals for a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    /// The category's ID.
    pub id: CategoryId,
    /// The category's name.
    pub name: String,
    /// The sum of every expense in the category.
    pub total_amount: f64,
    /// The category's cached per-month totals.
    pub monthly_stats: MonthlyStats,
}

/// Spending totals across all categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of every expense.
    pub total_amount: f64,
    /// The sum of the expenses dated in the current month.
    pub current_month_amount: f64,
    /// Per category totals, ordered by category ID.
    pub category_stats: Vec<CategoryStat>,
    /// The sum of every expense per month, across all categories.
    pub monthly_totals: MonthlyStats,
}

/// Compute the statistics report, treating the month containing `today` as
/// the current month.
pub fn get_statistics(today: Date, connection: &Connection) -> Result<Statistics, Error> {
    let expenses = get_all_expenses(connection)?;
    let categories = get_all_categories(connection)?;

    let current_month = MonthKey::from_date(today);
    let monthly_totals = aggregate_by_month(&expenses);
    let category_totals = aggregate_by_category(&expenses);

    let category_stats = categories
        .into_iter()
        .map(|category| CategoryStat {
            id: category.id,
            name: category.name,
            total_amount: category_totals.get(&category.id).copied().unwrap_or(0.0),
            monthly_stats: category.monthly_stats,
        })
        .collect();

    Ok(Statistics {
        total_amount: expenses.iter().map(|expense| expense.amount).sum(),
        current_month_amount: monthly_totals.get(current_month.as_str()).unwrap_or(0.0),
        category_stats,
        monthly_totals,
    })
}

fn aggregate_by_month(expenses: &[Expense]) -> MonthlyStats {
    let mut totals = MonthlyStats::new();

    for expense in expenses {
        totals.add(MonthKey::from_date(expense.date.date()), expense.amount);
    }

    totals
}

fn aggregate_by_category(expenses: &[Expense]) -> HashMap<CategoryId, f64> {
    let mut totals = HashMap::new();

    for expense in expenses {
        *totals.entry(expense.category_id).or_insert(0.0) += expense.amount;
    }

    totals
}

/// A route handler for the spending statistics of every category.
pub async fn get_statistics_endpoint(
    State(state): State<StatisticsState>,
) -> Result<Json<ApiResponse<Statistics>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    let statistics = get_statistics(OffsetDateTime::now_utc().date(), &connection)
        .inspect_err(|error| tracing::error!("could not compute statistics: {error}"))?;

    Ok(Json(ApiResponse::success(statistics)))
}
