use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::models::Series;
use crate::pipeline::process;
use crate::reader::read_file;
use crate::settings::load_settings;

fn print_series(title: &str, series: &Series) {
    println!("{}", title.bold());
    if series.is_empty() {
        println!("  (no data)");
        println!();
        return;
    }
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    for (label, value) in series.labels.iter().zip(&series.data) {
        table.add_row(vec![Cell::new(label), Cell::new(money(*value))]);
    }
    println!("{table}");
    println!();
}

pub fn run(file: &str, json: bool) -> Result<()> {
    let settings = load_settings();
    let table = read_file(Path::new(file))?;
    let processed = process(&table, &settings.pipeline());

    if json {
        println!("{}", serde_json::to_string_pretty(&processed.charts)?);
        return Ok(());
    }

    println!(
        "{} transactions, {} rows skipped",
        processed.transactions.len(),
        processed.dropped
    );
    println!();
    let charts = &processed.charts;
    print_series("Monthly spending", &charts.monthly_spending);
    print_series("Top spending categories", &charts.category);
    print_series("Average spend by weekday", &charts.daily_trend);
    print_series("Money in", &charts.money_in);
    print_series("Money out", &charts.money_out);
    Ok(())
}
