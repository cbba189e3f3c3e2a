//! Finance metrics
//!
//! Headline totals, a trailing monthly series and an expense breakdown by
//! category, computed from invoices and expenses. The computation is a pure
//! function of its inputs; "now" is always passed in as `today`.
//!
//! Two scopes are involved. The headline totals and category breakdown cover
//! the window `[start, end]`. The monthly series always covers `months`
//! calendar months ending with the month that contains `end`, and each month
//! is evaluated against the full collections. With the default window both
//! scopes describe the same months, so the series sums to the totals.

use chrono::NaiveDate;
use serde::Serialize;
use std::io::Write;

use crate::error::{JayloyError, JayloyResult};
use crate::export::escape_csv;
use crate::models::{Expense, Invoice, Money};
use crate::storage::Storage;

use super::period::{DateRange, Month};
use super::palette_color;

/// Months in the trailing series when none is given
pub const DEFAULT_MONTHS: u32 = 6;

/// Longest monthly series a window can request
pub const MAX_MONTHS: u32 = 1200;

/// Reporting window; unset bounds are derived from `months` and `today`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsWindow {
    pub months: u32,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl Default for MetricsWindow {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS,
            start: None,
            end: None,
        }
    }
}

impl MetricsWindow {
    /// The trailing `months` calendar months up to the current one
    pub fn trailing(months: u32) -> Self {
        Self {
            months,
            ..Self::default()
        }
    }

    /// Totals over an explicit range; the series keeps the default length
    pub fn between(range: DateRange) -> Self {
        Self {
            months: DEFAULT_MONTHS,
            start: Some(range.start),
            end: Some(range.end),
        }
    }

    /// Series length, clamped to `1..=MAX_MONTHS`
    pub fn series_len(&self) -> u32 {
        self.months.clamp(1, MAX_MONTHS)
    }

    /// Concrete window bounds for a reference date
    ///
    /// `end` defaults to the last day of the current month and `start` to the
    /// first day of the month `months - 1` months before `end`.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let end = self
            .end
            .unwrap_or_else(|| Month::containing(today).last_day());
        let start = self.start.unwrap_or_else(|| {
            Month::containing(end)
                .minus(self.series_len() - 1)
                .first_day()
        });
        DateRange::new(start, end)
    }
}

/// One entry of the monthly series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyData {
    /// `MMM yyyy`, e.g. `Mar 2025`
    pub month: String,
    pub revenue: Money,
    pub expenses: Money,
    pub profit: Money,
}

/// Summed expenses for one category label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryData {
    pub name: String,
    pub value: Money,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinanceMetrics {
    pub period: DateRange,
    pub total_revenue: Money,
    pub total_expenses: Money,
    pub net_profit: Money,
    /// Net profit as a percentage of revenue; 0 when there is no revenue
    pub profit_margin: f64,
    pub outstanding_invoices: usize,
    pub outstanding_amount: Money,
    /// Oldest month first
    pub monthly_data: Vec<MonthlyData>,
    /// First-seen order
    pub expense_categories: Vec<CategoryData>,
}

/// Compute the metrics for a window relative to `today`
pub fn compute_metrics(
    invoices: &[Invoice],
    expenses: &[Expense],
    window: &MetricsWindow,
    today: NaiveDate,
) -> FinanceMetrics {
    let period = window.resolve(today);

    let in_window_invoices: Vec<&Invoice> = invoices
        .iter()
        .filter(|i| period.contains(i.issue_date))
        .collect();
    let in_window_expenses: Vec<&Expense> = expenses
        .iter()
        .filter(|e| period.contains(e.date) && e.is_expense())
        .collect();

    let total_revenue: Money = in_window_invoices
        .iter()
        .filter(|i| i.is_paid())
        .map(|i| i.total)
        .sum();
    let total_expenses: Money = in_window_expenses.iter().map(|e| e.amount).sum();
    let net_profit = total_revenue - total_expenses;

    let outstanding: Vec<&&Invoice> = in_window_invoices
        .iter()
        .filter(|i| i.is_outstanding())
        .collect();

    FinanceMetrics {
        period,
        total_revenue,
        total_expenses,
        net_profit,
        profit_margin: profit_margin(net_profit, total_revenue),
        outstanding_invoices: outstanding.len(),
        outstanding_amount: outstanding.iter().map(|i| i.total).sum(),
        monthly_data: monthly_series(invoices, expenses, Month::containing(period.end), window.series_len()),
        expense_categories: category_breakdown(&in_window_expenses),
    }
}

fn profit_margin(net_profit: Money, revenue: Money) -> f64 {
    if revenue.is_positive() {
        (net_profit.cents() as f64 * 100.0) / revenue.cents() as f64
    } else {
        0.0
    }
}

fn monthly_series(
    invoices: &[Invoice],
    expenses: &[Expense],
    last: Month,
    months: u32,
) -> Vec<MonthlyData> {
    (0..months)
        .rev()
        .map(|offset| {
            let month = last.minus(offset);
            let revenue: Money = invoices
                .iter()
                .filter(|i| i.is_paid() && month.contains(i.issue_date))
                .map(|i| i.total)
                .sum();
            let spent: Money = expenses
                .iter()
                .filter(|e| e.is_expense() && month.contains(e.date))
                .map(|e| e.amount)
                .sum();
            MonthlyData {
                month: month.label(),
                revenue,
                expenses: spent,
                profit: revenue - spent,
            }
        })
        .collect()
}

fn category_breakdown(expenses: &[&Expense]) -> Vec<CategoryData> {
    let mut categories: Vec<CategoryData> = Vec::new();
    for expense in expenses {
        match categories.iter_mut().find(|c| c.name == expense.category) {
            Some(existing) => existing.value += expense.amount,
            None => {
                let color = palette_color(categories.len());
                categories.push(CategoryData {
                    name: expense.category.clone(),
                    value: expense.amount,
                    color,
                });
            }
        }
    }
    categories
}

impl FinanceMetrics {
    /// Compute the metrics over everything in storage
    pub fn generate(
        storage: &Storage,
        window: &MetricsWindow,
        today: NaiveDate,
    ) -> JayloyResult<Self> {
        let invoices = storage.invoices.get_all()?;
        let expenses = storage.expenses.get_all()?;
        Ok(compute_metrics(&invoices, &expenses, window, today))
    }

    /// Sum of the monthly series revenue
    pub fn series_revenue(&self) -> Money {
        self.monthly_data.iter().map(|m| m.revenue).sum()
    }

    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("Financial Summary: {}\n", self.period));
        output.push_str(&"=".repeat(60));
        output.push('\n');
        output.push_str(&format!("{:<30} {:>14}\n", "Revenue", self.total_revenue));
        output.push_str(&format!("{:<30} {:>14}\n", "Expenses", self.total_expenses));
        output.push_str(&format!("{:<30} {:>14}\n", "Net Profit", self.net_profit));
        output.push_str(&format!("{:<30} {:>13.1}%\n", "Profit Margin", self.profit_margin));
        output.push_str(&format!(
            "{:<30} {:>14}\n",
            format!("Outstanding ({} invoices)", self.outstanding_invoices),
            self.outstanding_amount
        ));

        output.push_str(&format!(
            "\n{:<12} {:>14} {:>14} {:>14}\n",
            "Month", "Revenue", "Expenses", "Profit"
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');
        for month in &self.monthly_data {
            output.push_str(&format!(
                "{:<12} {:>14} {:>14} {:>14}\n",
                month.month, month.revenue, month.expenses, month.profit
            ));
        }

        if !self.expense_categories.is_empty() {
            output.push_str("\nExpenses by Category\n");
            output.push_str(&"-".repeat(60));
            output.push('\n');
            for category in &self.expense_categories {
                let share = if self.total_expenses.is_zero() {
                    0.0
                } else {
                    category.value.cents() as f64 * 100.0 / self.total_expenses.cents() as f64
                };
                output.push_str(&format!(
                    "{:<30} {:>14} {:>6.1}%\n",
                    category.name, category.value, share
                ));
            }
        }

        output
    }

    /// Profit and loss statement followed by the monthly breakdown
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> JayloyResult<()> {
        let io = |e: std::io::Error| JayloyError::Export(e.to_string());

        writeln!(writer, "Section,Line,Amount").map_err(io)?;
        writeln!(writer, "Income,Revenue,{:.2}", self.total_revenue.to_decimal()).map_err(io)?;
        for category in &self.expense_categories {
            writeln!(
                writer,
                "Expenses,{},{:.2}",
                escape_csv(&category.name),
                category.value.to_decimal()
            )
            .map_err(io)?;
        }
        writeln!(writer, "Expenses,Total Expenses,{:.2}", self.total_expenses.to_decimal())
            .map_err(io)?;
        writeln!(writer, "Result,Net Profit,{:.2}", self.net_profit.to_decimal()).map_err(io)?;
        writeln!(writer, "Result,Profit Margin %,{:.2}", self.profit_margin).map_err(io)?;

        writeln!(writer).map_err(io)?;
        writeln!(writer, "Month,Revenue,Expenses,Profit").map_err(io)?;
        for month in &self.monthly_data {
            writeln!(
                writer,
                "{},{:.2},{:.2},{:.2}",
                month.month,
                month.revenue.to_decimal(),
                month.expenses.to_decimal(),
                month.profit.to_decimal()
            )
            .map_err(io)?;
        }

        Ok(())
    }
}
