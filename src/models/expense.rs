use chrono::NaiveDate;

use super::Money;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// Assigned by the store on insert.
    pub id: Option<i64>,
    pub name: String,
    pub amount: Money,
    pub date: NaiveDate,
}

impl Expense {
    pub fn new(name: String, amount: Money, date: NaiveDate) -> Self {
        Self {
            id: None,
            name,
            amount,
            date,
        }
    }

    /// Display label; blank names read as "unnamed".
    pub fn label(&self) -> &str {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            "unnamed"
        } else {
            trimmed
        }
    }
}

impl std::fmt::Display for Expense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.label(), self.amount)
    }
}
