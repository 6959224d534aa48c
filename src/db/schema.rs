/// Full schema for a fresh database.
pub(crate) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL,
    amount  INTEGER NOT NULL,
    date    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS budgets (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    amount  INTEGER NOT NULL,
    date    TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 2;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[(
    1,
    "CREATE TABLE IF NOT EXISTS budgets (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        amount  INTEGER NOT NULL,
        date    TEXT NOT NULL
    );",
)];

/// Columns (name, declared type) each table must carry, checked after migrating.
pub(crate) const EXPECTED_COLUMNS: &[(&str, &[(&str, &str)])] = &[
    (
        "expenses",
        &[("id", "INTEGER"), ("name", "TEXT"), ("amount", "INTEGER"), ("date", "TEXT")],
    ),
    ("budgets", &[("id", "INTEGER"), ("amount", "INTEGER"), ("date", "TEXT")]),
];

/// Rewrite an unversioned `expenses` table into the current layout.
/// Amounts stored as fractional pounds become whole pence, negatives become
/// zero, and numeric dates become text for the date decoder.
pub(crate) fn legacy_expenses_upgrade(amount_in_pounds: bool) -> String {
    let amount = if amount_in_pounds {
        "CAST(ROUND(MAX(COALESCE(amount, 0), 0) * 100) AS INTEGER)"
    } else {
        "MAX(COALESCE(amount, 0), 0)"
    };
    format!(
        "ALTER TABLE expenses RENAME TO expenses_legacy;
         CREATE TABLE expenses (
             id      INTEGER PRIMARY KEY AUTOINCREMENT,
             name    TEXT NOT NULL,
             amount  INTEGER NOT NULL,
             date    TEXT NOT NULL
         );
         INSERT INTO expenses (id, name, amount, date)
             SELECT id, COALESCE(name, ''), {amount}, CAST(date AS TEXT)
             FROM expenses_legacy ORDER BY id;
         DROP TABLE expenses_legacy;"
    )
}

pub(crate) const DROP_ALL: &str = r#"
DROP TABLE IF EXISTS expenses;
DROP TABLE IF EXISTS budgets;
DROP TABLE IF EXISTS schema_version;
"#;
