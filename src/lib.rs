//! Expense Tracker is a REST backend for recording expenses grouped into
//! categories.
//!
//! Every category caches the sum of its expenses per calendar month. The cache
//! is kept up to date in the same database transaction as the expense that
//! changed it, so readers never see an expense without its contribution to the
//! monthly totals, or the other way around.

#![warn(missing_docs)]

use std::{io, net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod category;
mod database_id;
mod db;
mod endpoints;
mod error;
mod expense;
mod logging;
mod response;
mod routing;
mod stats;

pub use app_state::AppState;
pub use category::{Category, create_category};
pub use database_id::{CategoryId, ExpenseId};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{Expense, NewExpense, create_expense};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use response::{ApiResponse, ResponseStatus};
pub use routing::{build_app, build_router, serve_static_files};
pub use stats::{MonthKey, MonthlyStats, rebuild_monthly_stats};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = wait_for_signal(signal::ctrl_c(), "Ctrl+C");

    #[cfg(unix)]
    let terminate = wait_for_signal(
        async {
            signal::unix::signal(signal::unix::SignalKind::terminate())?
                .recv()
                .await;
            Ok::<(), io::Error>(())
        },
        "terminate",
    );

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// Wait for `signal` to arrive.
///
/// If the signal handler could not be installed, the error is logged and this
/// never resolves, so the server keeps running.
async fn wait_for_signal(signal: impl Future<Output = io::Result<()>>, name: &str) {
    if let Err(error) = signal.await {
        tracing::error!("failed to install {name} handler: {error}");
        std::future::pending::<()>().await;
    }
}
