//! BudgetBuddy core: a durable expense/budget store, live queries over it,
//! and the summary figures and alerts derived from each snapshot.
//!
//! ```no_run
//! use budgetbuddy::{Config, Money, StoreCell};
//!
//! # fn main() -> budgetbuddy::Result<()> {
//! let cell = StoreCell::new(Config::from_env()?);
//! let store = cell.get()?;
//! let live = store.subscribe_expenses()?;
//! store.add_expense("Coffee", Money::parse("3.20")?, budgetbuddy::today())?;
//! let _initial = live.recv();
//! let _after_insert = live.recv();
//! # Ok(())
//! # }
//! ```

pub mod config;
mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod store;
pub mod summary;

pub use config::Config;
pub use db::Order;
pub use error::{Result, StoreError};
pub use models::{format_date, parse_user_date, today, Budget, Expense, Money};
pub use store::{Snapshot, Store, StoreCell, Subscription};
pub use summary::{Alert, AlertKind, AlertThresholds, Summary};
