//! CSV export of expenses.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::db::Order;
use crate::error::Result;
use crate::models::{format_date, Expense};
use crate::store::Store;

pub fn write_expenses_csv<W: Write>(writer: W, expenses: &[Expense]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "name", "amount", "date"])?;
    for e in expenses {
        wtr.write_record([
            e.id.map(|id| id.to_string()).unwrap_or_default(),
            e.name.clone(),
            e.amount.to_decimal().to_string(),
            format_date(e.date),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every expense, oldest first, to `path`. Returns the row count.
pub fn export_expenses_to_path(store: &Store, path: &Path) -> Result<usize> {
    let expenses = store.list_expenses(Order::Ascending)?;
    let file = File::create(path)?;
    write_expenses_csv(file, &expenses)?;
    Ok(expenses.len())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::Config;
    use crate::models::Money;
    use chrono::NaiveDate;

    #[test]
    fn test_csv_layout() {
        let expenses = vec![
            Expense {
                id: Some(1),
                name: "Fish, chips".into(),
                amount: Money::from_minor(1250),
                date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            },
            Expense {
                id: Some(2),
                name: "Bus".into(),
                amount: Money::from_minor(5),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            },
        ];
        let mut out = Vec::new();
        write_expenses_csv(&mut out, &expenses).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "id,name,amount,date\n1,\"Fish, chips\",12.50,2024-02-29\n2,Bus,0.05,2024-03-01\n"
        );
    }

    #[test]
    fn test_export_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_in_memory(&Config::new(dir.path().join("unused.db"))).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        store.add_expense("A", Money::from_minor(100), date).unwrap();
        store.add_expense("B", Money::from_minor(200), date).unwrap();

        let path = dir.path().join("out.csv");
        assert_eq!(export_expenses_to_path(&store, &path).unwrap(), 2);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(1).unwrap().starts_with("1,A,1.00,"));
    }
}
