use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::categorizer::{Category, EXPENSE_SLOTS, INCOME_SLOTS};
use crate::models::{ChartData, Series, Transaction};

const TOP_CATEGORIES: usize = 10;

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn outflows(txns: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    txns.iter().filter(|t| t.amount < 0.0)
}

fn inflows(txns: &[Transaction]) -> impl Iterator<Item = &Transaction> {
    txns.iter().filter(|t| t.amount > 0.0)
}

/// Spending per calendar month, oldest first, labelled `Jan 2024`.
pub fn monthly_spending(txns: &[Transaction]) -> Series {
    let mut by_month: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for t in outflows(txns) {
        *by_month
            .entry((t.timestamp.year(), t.timestamp.month()))
            .or_default() += t.amount.abs();
    }
    Series::from_pairs(by_month.into_iter().filter_map(|((y, m), total)| {
        let first = NaiveDate::from_ymd_opt(y, m, 1)?;
        Some((first.format("%b %Y").to_string(), total))
    }))
}

/// The ten biggest spending categories, largest first.
pub fn top_categories(txns: &[Transaction]) -> Series {
    let mut by_label: BTreeMap<&str, f64> = BTreeMap::new();
    for t in outflows(txns) {
        *by_label.entry(t.category.label()).or_default() += t.amount.abs();
    }
    ranked(by_label, TOP_CATEGORIES)
}

/// Largest totals first, at most `limit` of them.
fn ranked(by_label: BTreeMap<&str, f64>, limit: usize) -> Series {
    let mut totals: Vec<(&str, f64)> = by_label.into_iter().collect();
    // Stable sort keeps alphabetical order among equal totals.
    totals.sort_by(|a, b| b.1.total_cmp(&a.1));
    totals.truncate(limit);
    Series::from_pairs(totals)
}

/// Average spend per weekday, always Mon..Sun.
pub fn daily_trend(txns: &[Transaction]) -> Series {
    let mut sums = [0.0f64; 7];
    let mut counts = [0usize; 7];
    for t in outflows(txns) {
        let idx = t.timestamp.weekday().num_days_from_monday() as usize;
        sums[idx] += t.amount.abs();
        counts[idx] += 1;
    }
    Series::from_pairs(WEEK.iter().enumerate().map(|(i, day)| {
        let mean = if counts[i] == 0 { 0.0 } else { sums[i] / counts[i] as f64 };
        (day.to_string(), mean)
    }))
}

fn slotted(totals: &BTreeMap<Category, f64>, slots: &[Category]) -> Series {
    Series::from_pairs(
        slots
            .iter()
            .map(|c| (c.label(), totals.get(c).copied().unwrap_or(0.0))),
    )
}

pub fn money_in(txns: &[Transaction]) -> Series {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for t in inflows(txns) {
        *totals.entry(t.category).or_default() += t.amount;
    }
    slotted(&totals, &INCOME_SLOTS)
}

pub fn money_out(txns: &[Transaction]) -> Series {
    let mut totals: BTreeMap<Category, f64> = BTreeMap::new();
    for t in outflows(txns) {
        *totals.entry(t.category).or_default() += t.amount.abs();
    }
    slotted(&totals, &EXPENSE_SLOTS)
}

pub fn summarize(txns: &[Transaction]) -> ChartData {
    ChartData {
        monthly_spending: monthly_spending(txns),
        category: top_categories(txns),
        daily_trend: daily_trend(txns),
        money_in: money_in(txns),
        money_out: money_out(txns),
    }
}
