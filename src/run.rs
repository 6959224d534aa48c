mod cli;
mod shell;

use budgetbuddy::{Alert, Budget, Expense, Summary};

pub(crate) use cli::{as_cli, as_summary};

pub(crate) fn print_summary(summary: &Summary, alerts: &[Alert]) {
    let recent = summary
        .most_recent
        .as_ref()
        .map(Expense::to_string)
        .unwrap_or_else(|| "No recent expenses".into());
    let highest = summary
        .highest
        .as_ref()
        .map(Expense::to_string)
        .unwrap_or_else(|| "No data".into());

    println!("BudgetBuddy: {}", summary.today.format("%A, %b %-d"));
    println!("{}", "─".repeat(40));
    println!("  Total Budget:     {}", summary.current_budget);
    println!("  Total Expenses:   {}", summary.total_expenses);
    println!("  Remaining:        {}", summary.remaining_budget);
    println!(
        "  Progress:         {} {:>3.0}%",
        progress_bar(summary.budget_progress, 20),
        summary.budget_progress * 100.0
    );
    println!("  Spent Today:      {}", summary.todays_total);
    println!("  Recent:           {recent}");
    println!("  Highest:          {highest}");
    println!("  Expenses:         {}", summary.expense_count);

    for alert in alerts {
        print_alert(alert);
    }
}

pub(crate) fn print_alert(alert: &Alert) {
    println!();
    println!("  ! {}: {alert}", alert.title());
}

pub(crate) fn print_expenses(expenses: &[Expense]) {
    if expenses.is_empty() {
        println!("No expenses");
        return;
    }
    println!("{:<6} {:<24} {:>12} Date", "ID", "Name", "Amount");
    println!("{}", "─".repeat(55));
    for e in expenses {
        println!(
            "{:<6} {:<24} {:>12} {}",
            e.id.unwrap_or(0),
            e.label(),
            e.amount.to_string(),
            budgetbuddy::format_date(e.date),
        );
    }
}

pub(crate) fn print_budgets(budgets: &[Budget]) {
    if budgets.is_empty() {
        println!("No budgets");
        return;
    }
    println!("{:<6} {:>12} {:<12}", "ID", "Amount", "Set On");
    println!("{}", "─".repeat(40));
    for (i, b) in budgets.iter().enumerate() {
        let marker = if i == 0 { "  (current)" } else { "" };
        println!(
            "{:<6} {:>12} {}{marker}",
            b.id.unwrap_or(0),
            b.amount.to_string(),
            budgetbuddy::format_date(b.date),
        );
    }
}

fn progress_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}
