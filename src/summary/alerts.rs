use std::fmt;

use super::Summary;
use crate::models::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertThresholds {
    /// Spending on a single day above this raises `DailyOverspend`
    pub daily_limit: Money,
    /// Remaining budget below this raises `LowRemainingBudget`
    pub low_remaining: Money,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            daily_limit: Money::from_minor(15_000),
            low_remaining: Money::from_minor(1_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    DailyOverspend,
    LowRemainingBudget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    DailyOverspend { spent: Money, limit: Money },
    LowRemainingBudget { remaining: Money, floor: Money },
}

impl Alert {
    pub fn kind(&self) -> AlertKind {
        match self {
            Self::DailyOverspend { .. } => AlertKind::DailyOverspend,
            Self::LowRemainingBudget { .. } => AlertKind::LowRemainingBudget,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::DailyOverspend { .. } => "Daily Expense Alert",
            Self::LowRemainingBudget { .. } => "Remaining Budget Warning",
        }
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DailyOverspend { limit, .. } => {
                write!(f, "Your daily expenses have exceeded {limit}!")
            }
            Self::LowRemainingBudget { floor, .. } => {
                write!(f, "Your remaining budget is below {floor}!")
            }
        }
    }
}

/// Alerts raised by one summary. Holds no memory of earlier calls, so the
/// same summary always yields the same alerts.
pub fn evaluate(summary: &Summary, thresholds: &AlertThresholds) -> Vec<Alert> {
    let mut alerts = Vec::new();
    if summary.todays_total > thresholds.daily_limit {
        alerts.push(Alert::DailyOverspend {
            spent: summary.todays_total,
            limit: thresholds.daily_limit,
        });
    }
    if summary.remaining_budget < thresholds.low_remaining {
        alerts.push(Alert::LowRemainingBudget {
            remaining: summary.remaining_budget,
            floor: thresholds.low_remaining,
        });
    }
    alerts
}
