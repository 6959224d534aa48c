//! Thread-safe expense/budget store with live queries.
//!
//! All reads and writes serialise on one lock around the SQLite connection.
//! After a write commits, the affected query is re-read under the same lock
//! and queued to every subscriber, so subscribers see changes in commit
//! order and a slow subscriber never holds up a writer.

mod cell;
mod live;

use chrono::NaiveDate;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::Config;
use crate::db::{Database, Order};
use crate::error::Result;
use crate::models::{Budget, Expense, Money};
use crate::summary::{Alert, AlertThresholds, Summary};

pub use cell::StoreCell;
pub use live::{Snapshot, Subscription};

pub struct Store {
    db: Mutex<Database>,
    expenses: Arc<live::Registry<Expense>>,
    budgets: Arc<live::Registry<Budget>>,
    thresholds: AlertThresholds,
}

impl Store {
    /// Open (creating if needed) the database at `config.db_path`.
    pub fn open(config: &Config) -> Result<Self> {
        if let Some(dir) = config.db_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let db = Database::open(&config.db_path, config.allow_destructive_rebuild)?;
        Ok(Self::from_database(db, config.thresholds))
    }

    pub fn open_in_memory(config: &Config) -> Result<Self> {
        let db = Database::open_in_memory(config.allow_destructive_rebuild)?;
        Ok(Self::from_database(db, config.thresholds))
    }

    fn from_database(db: Database, thresholds: AlertThresholds) -> Self {
        if db.was_rebuilt() {
            info!("store opened on a rebuilt database");
        }
        Self {
            db: Mutex::new(db),
            expenses: live::Registry::new("expenses"),
            budgets: live::Registry::new("budgets"),
            thresholds,
        }
    }

    pub fn thresholds(&self) -> AlertThresholds {
        self.thresholds
    }

    /// Whether opening discarded an incompatible database.
    pub fn was_rebuilt(&self) -> bool {
        self.db.lock().was_rebuilt()
    }

    // ── Writes ────────────────────────────────────────────────

    pub fn add_expense(&self, name: impl Into<String>, amount: Money, date: NaiveDate) -> Result<i64> {
        self.insert_expense(&Expense::new(name.into(), amount, date))
    }

    pub fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        let db = self.db.lock();
        let id = db.insert_expense(expense)?;
        publish_expenses(&db, &self.expenses);
        Ok(id)
    }

    /// Returns whether a row was removed. Deleting a missing id is not an error.
    pub fn delete_expense(&self, id: i64) -> Result<bool> {
        let db = self.db.lock();
        let removed = db.delete_expense(id)?;
        if removed {
            publish_expenses(&db, &self.expenses);
        }
        Ok(removed)
    }

    pub fn add_budget(&self, amount: Money, date: NaiveDate) -> Result<i64> {
        self.insert_budget(&Budget::new(amount, date))
    }

    pub fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        let db = self.db.lock();
        let id = db.insert_budget(budget)?;
        publish_budgets(&db, &self.budgets);
        Ok(id)
    }

    pub fn delete_budget(&self, id: i64) -> Result<bool> {
        let db = self.db.lock();
        let removed = db.delete_budget(id)?;
        if removed {
            publish_budgets(&db, &self.budgets);
        }
        Ok(removed)
    }

    // ── Reads ─────────────────────────────────────────────────

    pub fn list_expenses(&self, order: Order) -> Result<Vec<Expense>> {
        self.db.lock().list_expenses(order)
    }

    /// Newest first.
    pub fn list_budgets(&self) -> Result<Vec<Budget>> {
        self.db.lock().list_budgets()
    }

    pub fn current_budget(&self) -> Result<Option<Budget>> {
        Ok(self.list_budgets()?.into_iter().next())
    }

    pub fn expense_count(&self) -> Result<i64> {
        self.db.lock().expense_count()
    }

    /// Summary over one consistent view of both tables.
    pub fn summary(&self, today: NaiveDate) -> Result<Summary> {
        let (expenses, budgets) = {
            let db = self.db.lock();
            (db.list_expenses(Order::Ascending)?, db.list_budgets()?)
        };
        Ok(Summary::compute(&expenses, &budgets, today))
    }

    pub fn alerts(&self, today: NaiveDate) -> Result<Vec<Alert>> {
        Ok(self.summary(today)?.alerts(&self.thresholds))
    }

    // ── Live queries ──────────────────────────────────────────

    /// Expenses oldest first, redelivered after every change.
    pub fn subscribe_expenses(&self) -> Result<Subscription<Expense>> {
        let db = self.db.lock();
        let initial = db.list_expenses(Order::Ascending)?;
        Ok(self.expenses.subscribe(initial))
    }

    /// Budgets newest first, redelivered after every change.
    pub fn subscribe_budgets(&self) -> Result<Subscription<Budget>> {
        let db = self.db.lock();
        let initial = db.list_budgets()?;
        Ok(self.budgets.subscribe(initial))
    }

    pub fn subscriber_count(&self) -> usize {
        self.expenses.len() + self.budgets.len()
    }
}

// The write has committed by the time these run, so a failed re-read is
// logged rather than reported as a failed write.

fn publish_expenses(db: &Database, registry: &live::Registry<Expense>) {
    if registry.is_empty() {
        return;
    }
    match db.list_expenses(Order::Ascending) {
        Ok(snapshot) => registry.publish(snapshot),
        Err(e) => error!(error = %e, "could not refresh expense subscribers"),
    }
}

fn publish_budgets(db: &Database, registry: &live::Registry<Budget>) {
    if registry.is_empty() {
        return;
    }
    match db.list_budgets() {
        Ok(snapshot) => registry.publish(snapshot),
        Err(e) => error!(error = %e, "could not refresh budget subscribers"),
    }
}
