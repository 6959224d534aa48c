use chrono::NaiveDate;

use super::Money;

/// A spending ceiling. Only the most recently inserted budget is in force.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Budget {
    pub id: Option<i64>,
    pub amount: Money,
    /// Day the budget was set
    pub date: NaiveDate,
}

impl Budget {
    pub fn new(amount: Money, date: NaiveDate) -> Self {
        Self {
            id: None,
            amount,
            date,
        }
    }
}
