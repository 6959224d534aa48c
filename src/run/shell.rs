use anyhow::Result;
use crossbeam_channel::{select, unbounded, Receiver};
use std::collections::HashSet;
use std::io::{self, BufRead, Write};
use std::thread;

use budgetbuddy::{today, AlertKind, AlertThresholds, Store, Subscription};
use budgetbuddy::{Budget, Expense, Summary};

/// Interactive session: commands are read on this thread while a background
/// thread follows the live queries and reprints the summary on every change.
pub(crate) fn as_shell(store: &Store) -> Result<()> {
    let expenses = store.subscribe_expenses()?;
    let budgets = store.subscribe_budgets()?;
    let thresholds = store.thresholds();

    println!("BudgetBuddy shell. Type 'help' for commands, 'quit' to leave.");

    let (stop_tx, stop_rx) = unbounded::<()>();

    thread::scope(|s| {
        s.spawn(move || follow(expenses, budgets, thresholds, stop_rx));

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            let _ = io::stdout().flush();
            let Some(Ok(line)) = lines.next() else { break };
            let args = split_line(&line);
            match args.first().map(String::as_str) {
                None => continue,
                Some("quit" | "exit" | "q") => break,
                Some("help") => super::cli::print_usage(),
                Some(_) => {
                    if let Err(e) = super::cli::execute(&args, store) {
                        eprintln!("Error: {e:#}");
                    }
                }
            }
        }
        drop(stop_tx);
        Ok(())
    })
}

fn follow(
    expenses: Subscription<Expense>,
    budgets: Subscription<Budget>,
    thresholds: AlertThresholds,
    stop: Receiver<()>,
) {
    let (Some(mut latest_expenses), Some(mut latest_budgets)) = (expenses.recv(), budgets.recv())
    else {
        return;
    };
    let mut shown: HashSet<AlertKind> = HashSet::new();

    loop {
        let summary = Summary::compute(&latest_expenses, &latest_budgets, today());
        let alerts = summary.alerts(&thresholds);
        let current: HashSet<AlertKind> = alerts.iter().map(|a| a.kind()).collect();
        // An alert is shown once, then again only after it has cleared.
        let fresh: Vec<_> = alerts
            .into_iter()
            .filter(|a| !shown.contains(&a.kind()))
            .collect();
        shown = current;

        println!();
        super::print_summary(&summary, &fresh);
        print!("> ");
        let _ = io::stdout().flush();

        select! {
            recv(expenses.receiver()) -> msg => match msg {
                Ok(snapshot) => latest_expenses = snapshot,
                Err(_) => return,
            },
            recv(budgets.receiver()) -> msg => match msg {
                Ok(snapshot) => latest_budgets = snapshot,
                Err(_) => return,
            },
            recv(stop) -> _ => return,
        }
    }
}

/// Whitespace-separated words; double quotes group words with spaces.
pub(crate) fn split_line(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut has_word = false;
    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                has_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if has_word {
                    words.push(std::mem::take(&mut current));
                    has_word = false;
                }
            }
            c => {
                current.push(c);
                has_word = true;
            }
        }
    }
    if has_word {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::split_line;

    #[test]
    fn test_split_line_quotes() {
        assert_eq!(
            split_line(r#"add "Fish and chips" 12.50"#),
            ["add", "Fish and chips", "12.50"]
        );
        assert_eq!(split_line("  list   --desc "), ["list", "--desc"]);
        assert_eq!(split_line(r#"add "" 1"#), ["add", "", "1"]);
        assert!(split_line("   ").is_empty());
    }
}
