mod schema;

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, error, info};

use crate::error::{Result, StoreError};
use crate::models::*;

/// Row order for expense listings. Ids grow with insertion, so ascending id
/// is insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    fn sql(self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

/// Synchronous SQLite access. Not shareable across threads on its own;
/// `Store` puts it behind a lock.
pub(crate) struct Database {
    conn: Connection,
    rebuilt: bool,
}

impl Database {
    pub(crate) fn open(path: &Path, allow_rebuild: bool) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        info!(path = %path.display(), "opened expense database");
        Self::init(conn, allow_rebuild)
    }

    pub(crate) fn open_in_memory(allow_rebuild: bool) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, allow_rebuild)
    }

    fn init(conn: Connection, allow_rebuild: bool) -> Result<Self> {
        let mut db = Self {
            conn,
            rebuilt: false,
        };
        db.migrate(allow_rebuild)?;
        Ok(db)
    }

    /// Whether opening discarded an incompatible database.
    pub(crate) fn was_rebuilt(&self) -> bool {
        self.rebuilt
    }

    pub(crate) fn schema_version(&self) -> Result<i32> {
        Ok(self
            .conn
            .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                row.get(0)
            })?)
    }

    fn migrate(&mut self, allow_rebuild: bool) -> Result<()> {
        let has_version_table: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
            [],
            |row| row.get(0),
        )?;

        if !has_version_table {
            // Fresh database, or one that predates versioning. IF NOT EXISTS
            // keeps any expenses already present.
            let legacy = self.legacy_expenses()?;
            let tx = self.conn.transaction()?;
            if let Some(amount_in_pounds) = legacy {
                tx.execute_batch(&schema::legacy_expenses_upgrade(amount_in_pounds))?;
                info!(amount_in_pounds, "converted unversioned expenses table");
            }
            tx.execute_batch(schema::SCHEMA)?;
            tx.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![schema::CURRENT_VERSION],
            )?;
            tx.commit()?;
        } else {
            let current: i32 = self
                .conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                })
                .optional()?
                .unwrap_or(0);

            if current > schema::CURRENT_VERSION {
                return self.rebuild(allow_rebuild, current, "database is from a newer version");
            }

            if current < schema::CURRENT_VERSION {
                let tx = self.conn.transaction()?;
                for &(from_version, sql) in schema::MIGRATIONS {
                    if current <= from_version {
                        info!(from_version, "applying schema migration");
                        tx.execute_batch(sql)?;
                    }
                }
                tx.execute("DELETE FROM schema_version", [])?;
                tx.execute(
                    "INSERT INTO schema_version (version) VALUES (?1)",
                    params![schema::CURRENT_VERSION],
                )?;
                tx.commit()?;
            }
        }

        if !self.columns_match()? {
            let found = self.schema_version().unwrap_or(0);
            return self.rebuild(allow_rebuild, found, "tables do not have the expected columns");
        }
        Ok(())
    }

    /// (name, declared type) for each column of `table`; empty if it is missing.
    fn table_columns(&self, table: &str) -> Result<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(&format!("PRAGMA table_info({table})"))?;
        let columns = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(1)?, row.get::<_, String>(2)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(columns)
    }

    /// An unversioned `expenses` table with the right columns but other
    /// declared types needs rewriting. `Some(true)` when its amounts are
    /// fractional pounds rather than pence.
    fn legacy_expenses(&self) -> Result<Option<bool>> {
        let columns = self.table_columns("expenses")?;
        let Some(&(_, expected)) = schema::EXPECTED_COLUMNS
            .iter()
            .find(|(table, _)| *table == "expenses")
        else {
            return Ok(None);
        };
        let declared = |name: &str| {
            columns
                .iter()
                .find(|(have, _)| have == name)
                .map(|(_, ty)| ty.as_str())
        };
        if expected.iter().any(|(name, _)| declared(*name).is_none()) {
            // Missing table, or too different to convert: left to the column check
            return Ok(None);
        }
        let matches = expected
            .iter()
            .all(|(name, ty)| declared(*name).is_some_and(|have| have.eq_ignore_ascii_case(ty)));
        if matches {
            return Ok(None);
        }
        let amount_in_pounds =
            declared("amount").is_some_and(|ty| !ty.eq_ignore_ascii_case("INTEGER"));
        Ok(Some(amount_in_pounds))
    }

    fn columns_match(&self) -> Result<bool> {
        for &(table, expected) in schema::EXPECTED_COLUMNS {
            let columns = self.table_columns(table)?;
            let present = expected.iter().all(|(name, ty)| {
                columns
                    .iter()
                    .any(|(have, have_ty)| have == name && have_ty.eq_ignore_ascii_case(ty))
            });
            if !present {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Drop everything and start over. Always logged: the caller's data is gone.
    fn rebuild(&mut self, allow_rebuild: bool, found: i32, reason: &str) -> Result<()> {
        if !allow_rebuild {
            return Err(StoreError::SchemaMismatch {
                found,
                supported: schema::CURRENT_VERSION,
            });
        }
        let expenses_lost = self.count_rows("expenses");
        let budgets_lost = self.count_rows("budgets");
        error!(
            found,
            supported = schema::CURRENT_VERSION,
            expenses_lost,
            budgets_lost,
            reason,
            "DATA LOSS: incompatible database schema, dropping and recreating all tables"
        );

        let tx = self.conn.transaction()?;
        tx.execute_batch(schema::DROP_ALL)?;
        tx.execute_batch(schema::SCHEMA)?;
        tx.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            params![schema::CURRENT_VERSION],
        )?;
        tx.commit()?;
        self.rebuilt = true;
        Ok(())
    }

    fn count_rows(&self, table: &str) -> i64 {
        self.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap_or(0)
    }

    // ── Expenses ──────────────────────────────────────────────

    pub(crate) fn insert_expense(&self, expense: &Expense) -> Result<i64> {
        ensure_non_negative(expense.amount)?;
        self.conn.execute(
            "INSERT INTO expenses (name, amount, date) VALUES (?1, ?2, ?3)",
            params![
                expense.name,
                expense.amount.minor(),
                format_date(expense.date),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, amount = %expense.amount, "inserted expense");
        Ok(id)
    }

    /// Returns whether a row was removed.
    pub(crate) fn delete_expense(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?1", params![id])?;
        debug!(id, removed, "delete expense");
        Ok(removed > 0)
    }

    pub(crate) fn list_expenses(&self, order: Order) -> Result<Vec<Expense>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, amount, date FROM expenses ORDER BY id {}",
            order.sql()
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;
        rows.map(|row| -> Result<Expense> {
            let (id, name, amount, date) = row?;
            Ok(Expense {
                id: Some(id),
                name,
                amount: Money::from_minor(amount),
                date: decode_date("expenses", id, &date)?,
            })
        })
        .collect()
    }

    pub(crate) fn expense_count(&self) -> Result<i64> {
        Ok(self
            .conn
            .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))?)
    }

    // ── Budgets ───────────────────────────────────────────────

    pub(crate) fn insert_budget(&self, budget: &Budget) -> Result<i64> {
        ensure_non_negative(budget.amount)?;
        self.conn.execute(
            "INSERT INTO budgets (amount, date) VALUES (?1, ?2)",
            params![budget.amount.minor(), format_date(budget.date)],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, amount = %budget.amount, "inserted budget");
        Ok(id)
    }

    pub(crate) fn delete_budget(&self, id: i64) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM budgets WHERE id = ?1", params![id])?;
        debug!(id, removed, "delete budget");
        Ok(removed > 0)
    }

    /// Newest first: element 0 is the budget in force.
    pub(crate) fn list_budgets(&self) -> Result<Vec<Budget>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, amount, date FROM budgets ORDER BY id DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;
        rows.map(|row| -> Result<Budget> {
            let (id, amount, date) = row?;
            Ok(Budget {
                id: Some(id),
                amount: Money::from_minor(amount),
                date: decode_date("budgets", id, &date)?,
            })
        })
        .collect()
    }
}

fn ensure_non_negative(amount: Money) -> Result<()> {
    if amount.is_negative() {
        return Err(StoreError::validation(format!(
            "amount must not be negative: {amount}"
        )));
    }
    Ok(())
}

fn decode_date(table: &'static str, id: i64, raw: &str) -> Result<chrono::NaiveDate> {
    parse_stored_date(raw).ok_or_else(|| StoreError::CorruptRow {
        table,
        id,
        detail: format!("unrecognised date '{raw}'"),
    })
}

#[cfg(test)]
mod tests;
