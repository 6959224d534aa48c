mod budget;
mod date;
mod expense;
mod money;

pub use budget::Budget;
pub use date::{format_date, parse_stored_date, parse_user_date, today, DATE_FORMAT};
pub use expense::Expense;
pub use money::Money;
