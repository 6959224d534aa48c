use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use budgetbuddy::{config::shellexpand, export, Money, Order, Store};

pub(crate) fn as_cli(args: &[String], store: &Store) -> Result<()> {
    match args[1].as_str() {
        "shell" => super::shell::as_shell(store),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("budgetbuddy {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        _ => execute(&args[1..], store),
    }
}

/// Today's summary and alerts, shown when no command is given.
pub(crate) fn as_summary(store: &Store) -> Result<()> {
    cmd_summary(&[], store)
}

/// Run one command. Shared by the argument interface and the shell.
pub(crate) fn execute(args: &[String], store: &Store) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(());
    };
    match command.as_str() {
        "add" | "a" => cmd_add(rest, store),
        "budget" | "b" => cmd_budget(rest, store),
        "delete" | "rm" => cmd_delete(rest, store, false),
        "delete-budget" => cmd_delete(rest, store, true),
        "list" | "ls" => cmd_list(rest, store),
        "budgets" => {
            super::print_budgets(&store.list_budgets()?);
            Ok(())
        }
        "summary" | "s" => cmd_summary(rest, store),
        "export" => cmd_export(rest, store),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

pub(crate) fn print_usage() {
    println!("BudgetBuddy: expense and budget tracker");
    println!();
    println!("Usage: budgetbuddy [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Print today's summary");
    println!("  add <name> <amount> [date]    Record an expense (date: YYYY-MM-DD, default today)");
    println!("  budget <amount> [date]        Set a new budget (replaces the current one)");
    println!("  delete <id>                   Delete an expense");
    println!("  delete-budget <id>            Delete a budget");
    println!("  list [--desc]                 List expenses (oldest first)");
    println!("  budgets                       List budgets (newest first)");
    println!("  summary [date]                Totals, remaining budget and alerts");
    println!("  export [path]                 Export expenses to CSV");
    println!("  shell                         Interactive session with a live summary");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn cmd_add(args: &[String], store: &Store) -> Result<()> {
    let (name, amount) = match args {
        [name, amount, ..] => (name, amount),
        _ => anyhow::bail!("Usage: budgetbuddy add <name> <amount> [YYYY-MM-DD]"),
    };
    let amount = Money::parse(amount)?;
    let date = date_arg(args.get(2))?;
    let id = store.add_expense(name.as_str(), amount, date)?;
    println!("Added expense #{id}: {name} {amount}");
    Ok(())
}

fn cmd_budget(args: &[String], store: &Store) -> Result<()> {
    let Some(amount) = args.first() else {
        anyhow::bail!("Usage: budgetbuddy budget <amount> [YYYY-MM-DD]");
    };
    let amount = Money::parse(amount)?;
    let date = date_arg(args.get(1))?;
    let id = store.add_budget(amount, date)?;
    println!("Budget #{id} set to {amount}");
    Ok(())
}

fn cmd_delete(args: &[String], store: &Store, budget: bool) -> Result<()> {
    let what = if budget { "budget" } else { "expense" };
    let id: i64 = args
        .first()
        .and_then(|a| a.parse().ok())
        .with_context(|| format!("Usage: budgetbuddy delete{} <id>", if budget { "-budget" } else { "" }))?;
    let removed = if budget {
        store.delete_budget(id)?
    } else {
        store.delete_expense(id)?
    };
    if removed {
        println!("Deleted {what} #{id}");
    } else {
        println!("No {what} #{id}");
    }
    Ok(())
}

fn cmd_list(args: &[String], store: &Store) -> Result<()> {
    let order = if args.iter().any(|a| a == "--desc") {
        Order::Descending
    } else {
        Order::Ascending
    };
    super::print_expenses(&store.list_expenses(order)?);
    Ok(())
}

fn cmd_summary(args: &[String], store: &Store) -> Result<()> {
    let today = date_arg(args.first().filter(|a| !a.starts_with('-')))?;
    let summary = store.summary(today)?;
    let alerts = summary.alerts(&store.thresholds());
    super::print_summary(&summary, &alerts);
    Ok(())
}

fn cmd_export(args: &[String], store: &Store) -> Result<()> {
    let path = args
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| PathBuf::from(shellexpand(a)))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(format!("{home}/budgetbuddy-expenses.csv"))
        });
    let count = export::export_expenses_to_path(store, &path)
        .with_context(|| format!("Failed to export to {}", path.display()))?;
    if count == 0 {
        println!("No expenses to export");
    } else {
        println!("Exported {count} expenses to {}", path.display());
    }
    Ok(())
}

fn date_arg(arg: Option<&String>) -> Result<NaiveDate> {
    match arg {
        None => Ok(budgetbuddy::today()),
        Some(raw) => budgetbuddy::parse_user_date(raw)
            .with_context(|| format!("Invalid date '{raw}', expected YYYY-MM-DD")),
    }
}
