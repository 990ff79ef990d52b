use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::db::{get_connection, load_history};
use crate::error::Result;
use crate::fmt::money;
use crate::settings::load_settings;

pub fn run(limit: usize) -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();
    if !db_path.exists() {
        println!("Database not found. Run `pesa init` or `pesa import` first.");
        return Ok(());
    }
    let conn = get_connection(&db_path)?;
    let history = load_history(&conn)?;

    let total_income: f64 = history.income.iter().sum();
    let total_expenses: f64 = history.expenses.iter().sum();
    println!("{}  {}", "Total income:  ".green().bold(), money(total_income));
    println!("{}  {}", "Total expenses:".red().bold(), money(total_expenses));
    println!("{}  {}", "Net balance:   ".bold(), money(total_income - total_expenses));
    println!();

    if history.dates.is_empty() {
        println!("No transactions stored.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Date", "Category", "Income", "Expense", "Details"]);
    let start = history.dates.len().saturating_sub(limit);
    for i in (start..history.dates.len()).rev() {
        table.add_row(vec![
            Cell::new(&history.dates[i]),
            Cell::new(&history.types[i]),
            Cell::new(money(history.income[i])),
            Cell::new(money(history.expenses[i])),
            Cell::new(&history.details[i]),
        ]);
    }
    println!("{table}");
    Ok(())
}
