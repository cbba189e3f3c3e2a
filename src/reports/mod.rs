//! Reports module for Jayloy
//!
//! Financial summary and monthly series, VAT, inventory, payroll and balance
//! sheet reports. Each report is generated from storage for an explicit
//! reference date and can be rendered for the terminal or written as CSV.

pub mod balance_sheet;
pub mod finance;
pub mod inventory;
pub mod payroll;
pub mod period;
pub mod vat;

pub use balance_sheet::{BalanceSheet, BalanceSheetLine};
pub use finance::{
    compute_metrics, CategoryData, FinanceMetrics, MetricsWindow, MonthlyData, MAX_MONTHS,
};
pub use inventory::{InventoryReport, ProductValue};
pub use payroll::PayrollReport;
pub use period::{DateRange, Month, PeriodParseError, ReportPeriod};
pub use vat::VatSummary;

/// Chart colors assigned to categories in first-seen order
pub const PALETTE: [&str; 9] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#6366F1", "#F472B6",
    "#FBBF24",
];

/// Color for the category at `index`, cycling through the palette
pub fn palette_color(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_cycles() {
        assert_eq!(palette_color(0), "#3B82F6");
        assert_eq!(palette_color(8), "#FBBF24");
        assert_eq!(palette_color(9), "#3B82F6");
        assert_eq!(palette_color(20), "#F59E0B");
    }
}
