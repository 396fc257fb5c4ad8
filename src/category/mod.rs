//! Categories group expenses and cache their monthly totals.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;
mod state;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_all_categories, get_category,
    get_category_details, get_all_category_details, update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryDetails, CategoryForm};
pub use edit::update_category_endpoint;
pub use list::{get_categories_endpoint, get_category_endpoint};
pub use state::CategoryState;
