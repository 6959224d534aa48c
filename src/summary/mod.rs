//! Derived figures over a snapshot of expenses and budgets.
//!
//! Everything here is a pure function of its inputs. Nothing is cached
//! between calls; each new snapshot is summarised from scratch.

mod alerts;

use chrono::NaiveDate;

use crate::models::{Budget, Expense, Money};

pub use alerts::{evaluate, Alert, AlertKind, AlertThresholds};

/// Sum of every expense. Negative amounts that slipped into storage count as zero.
pub fn total_expenses(expenses: &[Expense]) -> Money {
    expenses.iter().map(|e| e.amount.clamp_non_negative()).sum()
}

/// The budget in force: the most recently inserted one.
///
/// `budgets` must be newest first, the order `Store::list_budgets` returns.
pub fn current_budget(budgets: &[Budget]) -> Option<&Budget> {
    budgets.first()
}

pub fn current_budget_amount(budgets: &[Budget]) -> Money {
    current_budget(budgets)
        .map(|b| b.amount.clamp_non_negative())
        .unwrap_or(Money::ZERO)
}

/// Negative when overspent.
pub fn remaining_budget(budget: Money, total: Money) -> Money {
    budget - total
}

/// Fraction of the budget used, clamped to `0.0..=1.0`. A zero budget gives `0.0`.
pub fn budget_progress(total: Money, budget: Money) -> f64 {
    total
        .ratio(budget)
        .map(|r| r.clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

pub fn todays_total(expenses: &[Expense], today: NaiveDate) -> Money {
    expenses
        .iter()
        .filter(|e| e.date == today)
        .map(|e| e.amount.clamp_non_negative())
        .sum()
}

/// Last expense in insertion order. `expenses` must be oldest first.
pub fn most_recent(expenses: &[Expense]) -> Option<&Expense> {
    expenses.last()
}

/// Largest expense; on a tie the earliest one wins.
pub fn highest(expenses: &[Expense]) -> Option<&Expense> {
    let mut best: Option<&Expense> = None;
    for e in expenses {
        if best.map_or(true, |b| e.amount.clamp_non_negative() > b.amount.clamp_non_negative()) {
            best = Some(e);
        }
    }
    best
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub today: NaiveDate,
    pub expense_count: usize,
    pub total_expenses: Money,
    pub current_budget: Money,
    pub remaining_budget: Money,
    pub budget_progress: f64,
    pub todays_total: Money,
    pub most_recent: Option<Expense>,
    pub highest: Option<Expense>,
}

impl Summary {
    /// `expenses` oldest first, `budgets` newest first.
    pub fn compute(expenses: &[Expense], budgets: &[Budget], today: NaiveDate) -> Self {
        let total = total_expenses(expenses);
        let budget = current_budget_amount(budgets);
        Self {
            today,
            expense_count: expenses.len(),
            total_expenses: total,
            current_budget: budget,
            remaining_budget: remaining_budget(budget, total),
            budget_progress: budget_progress(total, budget),
            todays_total: todays_total(expenses, today),
            most_recent: most_recent(expenses).cloned(),
            highest: highest(expenses).cloned(),
        }
    }

    pub fn alerts(&self, thresholds: &AlertThresholds) -> Vec<Alert> {
        evaluate(self, thresholds)
    }
}
