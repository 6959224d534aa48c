#![allow(clippy::unwrap_used)]

use super::*;
use chrono::NaiveDate;
use rust_decimal_macros::dec;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn expense(name: &str, minor: i64, d: u32) -> Expense {
    Expense::new(name.into(), Money::from_minor(minor), day(d))
}

fn mem() -> Database {
    Database::open_in_memory(true).unwrap()
}

// ── Schema ────────────────────────────────────────────────────

#[test]
fn test_fresh_database_is_current_version() {
    let db = mem();
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
    assert!(!db.was_rebuilt());
    assert!(db.list_expenses(Order::Ascending).unwrap().is_empty());
    assert!(db.list_budgets().unwrap().is_empty());
}

fn write_v1_database(path: &Path) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE schema_version (version INTEGER NOT NULL);
         INSERT INTO schema_version (version) VALUES (1);
         CREATE TABLE expenses (
             id      INTEGER PRIMARY KEY AUTOINCREMENT,
             name    TEXT NOT NULL,
             amount  INTEGER NOT NULL,
             date    TEXT NOT NULL
         );
         INSERT INTO expenses (name, amount, date) VALUES ('Rent', 90000, '2024-01-01');
         INSERT INTO expenses (name, amount, date) VALUES ('Bus', 250, '1704110400000');",
    )
    .unwrap();
}

#[test]
fn test_migration_adds_budgets_without_losing_expenses() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");
    write_v1_database(&path);

    let db = Database::open(&path, true).unwrap();
    assert!(!db.was_rebuilt());
    assert_eq!(db.schema_version().unwrap(), 2);

    let expenses = db.list_expenses(Order::Ascending).unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].name, "Rent");
    assert_eq!(expenses[0].amount.to_decimal(), dec!(900.00));
    // Legacy epoch-millisecond date decoded to its UTC day
    assert_eq!(expenses[1].date, day(1));

    let id = db
        .insert_budget(&Budget::new(Money::from_minor(100_000), day(2)))
        .unwrap();
    assert!(id > 0);
    assert_eq!(db.list_budgets().unwrap().len(), 1);
}

#[test]
fn test_migration_is_stable_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reopen.db");
    {
        let db = Database::open(&path, true).unwrap();
        db.insert_expense(&expense("Tea", 300, 3)).unwrap();
    }
    let db = Database::open(&path, true).unwrap();
    assert!(!db.was_rebuilt());
    assert_eq!(db.expense_count().unwrap(), 1);
}

#[test]
fn test_newer_schema_rebuilds_when_allowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    write_v1_database(&path);
    Connection::open(&path)
        .unwrap()
        .execute("UPDATE schema_version SET version = 99", [])
        .unwrap();

    let db = Database::open(&path, true).unwrap();
    assert!(db.was_rebuilt());
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);
    assert_eq!(db.expense_count().unwrap(), 0);
}

#[test]
fn test_newer_schema_errors_when_rebuild_disallowed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");
    write_v1_database(&path);
    Connection::open(&path)
        .unwrap()
        .execute("UPDATE schema_version SET version = 99", [])
        .unwrap();

    match Database::open(&path, false) {
        Err(StoreError::SchemaMismatch { found, supported }) => {
            assert_eq!(found, 99);
            assert_eq!(supported, schema::CURRENT_VERSION);
        }
        other => panic!("expected schema mismatch, got {:?}", other.map(|_| ())),
    }
    // Nothing was dropped
    let conn = Connection::open(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_unexpected_columns_trigger_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE expenses (id INTEGER PRIMARY KEY, title TEXT, cost REAL);
             INSERT INTO expenses (title, cost) VALUES ('x', 1.5);",
        )
        .unwrap();

    let db = Database::open(&path, true).unwrap();
    assert!(db.was_rebuilt());
    db.insert_expense(&expense("Fresh", 100, 1)).unwrap();
    assert_eq!(db.expense_count().unwrap(), 1);
}

#[test]
fn test_unversioned_pound_amounts_converted_to_pence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE expenses (
                 id      INTEGER PRIMARY KEY AUTOINCREMENT,
                 name    TEXT NOT NULL,
                 amount  REAL NOT NULL,
                 date    INTEGER NOT NULL
             );
             INSERT INTO expenses (name, amount, date) VALUES ('Lunch', 12.5, 1704110400000);
             INSERT INTO expenses (name, amount, date) VALUES ('Fare', 2.75, '2024-01-02');
             INSERT INTO expenses (name, amount, date) VALUES ('Refund', -4.0, '2024-01-03');",
        )
        .unwrap();

    let db = Database::open(&path, false).unwrap();
    assert!(!db.was_rebuilt());
    assert_eq!(db.schema_version().unwrap(), schema::CURRENT_VERSION);

    let expenses = db.list_expenses(Order::Ascending).unwrap();
    let amounts: Vec<i64> = expenses.iter().map(|e| e.amount.minor()).collect();
    assert_eq!(amounts, [1250, 275, 0]);
    assert_eq!(expenses[0].name, "Lunch");
    assert_eq!(expenses[0].date, day(1));
    assert_eq!(expenses[1].date, day(2));

    let id = db.insert_expense(&expense("Tea", 300, 4)).unwrap();
    assert!(id > expenses[2].id.unwrap());
    assert_eq!(db.list_expenses(Order::Descending).unwrap()[0].amount.minor(), 300);

    drop(db);
    let db = Database::open(&path, false).unwrap();
    assert!(!db.was_rebuilt());
    assert_eq!(db.expense_count().unwrap(), 4);
}

#[test]
fn test_versioned_table_with_wrong_amount_type_rebuilds() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("real.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE schema_version (version INTEGER NOT NULL);
             INSERT INTO schema_version (version) VALUES (2);
             CREATE TABLE expenses (
                 id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL,
                 amount REAL NOT NULL, date TEXT NOT NULL
             );
             CREATE TABLE budgets (
                 id INTEGER PRIMARY KEY AUTOINCREMENT, amount INTEGER NOT NULL, date TEXT NOT NULL
             );
             INSERT INTO expenses (name, amount, date) VALUES ('Lunch', 12.5, '2024-01-01');",
        )
        .unwrap();

    let err = Database::open(&path, false).err().unwrap();
    assert!(matches!(err, StoreError::SchemaMismatch { .. }));

    let db = Database::open(&path, true).unwrap();
    assert!(db.was_rebuilt());
    assert!(db.list_expenses(Order::Ascending).unwrap().is_empty());
}

// ── Expenses ──────────────────────────────────────────────────

#[test]
fn test_expense_insert_and_list() {
    let db = mem();
    let id = db.insert_expense(&expense("Coffee", 325, 10)).unwrap();
    let all = db.list_expenses(Order::Ascending).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].id, Some(id));
    assert_eq!(all[0].name, "Coffee");
    assert_eq!(all[0].amount, Money::from_minor(325));
    assert_eq!(all[0].date, day(10));
}

#[test]
fn test_expense_ids_strictly_increase() {
    let db = mem();
    let mut last = 0;
    for i in 0..20 {
        let id = db.insert_expense(&expense("x", i, 1)).unwrap();
        assert!(id > last);
        last = id;
    }
}

#[test]
fn test_expense_ids_never_reused_after_delete() {
    let db = mem();
    let a = db.insert_expense(&expense("a", 1, 1)).unwrap();
    let b = db.insert_expense(&expense("b", 1, 1)).unwrap();
    assert!(db.delete_expense(b).unwrap());
    let c = db.insert_expense(&expense("c", 1, 1)).unwrap();
    assert!(c > b);
    assert!(b > a);
}

#[test]
fn test_expense_list_order() {
    let db = mem();
    for name in ["first", "second", "third"] {
        db.insert_expense(&expense(name, 100, 1)).unwrap();
    }
    let asc: Vec<String> = db
        .list_expenses(Order::Ascending)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(asc, ["first", "second", "third"]);

    let desc: Vec<String> = db
        .list_expenses(Order::Descending)
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(desc, ["third", "second", "first"]);
}

#[test]
fn test_delete_missing_expense_is_noop() {
    let db = mem();
    db.insert_expense(&expense("keep", 100, 1)).unwrap();
    assert!(!db.delete_expense(9999).unwrap());
    assert!(!db.delete_expense(9999).unwrap());
    assert_eq!(db.expense_count().unwrap(), 1);
}

#[test]
fn test_negative_amount_rejected() {
    let db = mem();
    let err = db.insert_expense(&expense("bad", -1, 1)).unwrap_err();
    assert!(err.is_validation());
    assert_eq!(db.expense_count().unwrap(), 0);

    let err = db
        .insert_budget(&Budget::new(Money::from_minor(-500), day(1)))
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_empty_name_is_stored() {
    let db = mem();
    db.insert_expense(&expense("", 100, 1)).unwrap();
    let all = db.list_expenses(Order::Ascending).unwrap();
    assert_eq!(all[0].name, "");
    assert_eq!(all[0].label(), "unnamed");
}

#[test]
fn test_corrupt_date_surfaces_error() {
    let db = mem();
    db.conn
        .execute(
            "INSERT INTO expenses (name, amount, date) VALUES ('Old', 100, 'Monday, Jan 1')",
            [],
        )
        .unwrap();
    match db.list_expenses(Order::Ascending) {
        Err(StoreError::CorruptRow { table, .. }) => assert_eq!(table, "expenses"),
        other => panic!("expected corrupt row, got {:?}", other.map(|v| v.len())),
    }
}

// ── Budgets ───────────────────────────────────────────────────

#[test]
fn test_budgets_listed_newest_first() {
    let db = mem();
    // Later date inserted first: insertion order, not date, decides
    let older = db
        .insert_budget(&Budget::new(Money::from_minor(50_000), day(20)))
        .unwrap();
    let newer = db
        .insert_budget(&Budget::new(Money::from_minor(30_000), day(5)))
        .unwrap();

    let budgets = db.list_budgets().unwrap();
    assert_eq!(budgets.len(), 2);
    assert_eq!(budgets[0].id, Some(newer));
    assert_eq!(budgets[1].id, Some(older));
}

#[test]
fn test_budget_delete_idempotent() {
    let db = mem();
    let id = db
        .insert_budget(&Budget::new(Money::from_minor(100), day(1)))
        .unwrap();
    assert!(db.delete_budget(id).unwrap());
    assert!(!db.delete_budget(id).unwrap());
    assert!(db.list_budgets().unwrap().is_empty());
}
