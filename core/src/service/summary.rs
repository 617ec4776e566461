use crate::model::{DateKey, Ledger, MonthlySummary, Quantity};

/// Entries falling in `(year, month)`, sorted by day. `month` is 1-based.
pub fn month_entries(ledger: &Ledger, year: i32, month: u32) -> Vec<(DateKey, Quantity)> {
    let mut entries = ledger.all_entries();
    entries.retain(|(date, _)| date.in_month(year, month));
    entries.sort_by_key(|(date, _)| *date);
    entries
}

/// Totals for one month. Values are summed in calendar order without rounding.
pub fn summarize(year: i32, month: u32, ledger: &Ledger, unit_price: f64) -> MonthlySummary {
    let entries = month_entries(ledger, year, month);
    if entries.is_empty() {
        return MonthlySummary::empty(year, month);
    }

    let total_liters: f64 = entries.iter().map(|(_, q)| q.liters()).sum();
    let days_recorded = entries.len();

    MonthlySummary {
        year,
        month,
        total_liters,
        days_recorded,
        average_liters: total_liters / days_recorded as f64,
        total_bill: total_liters * unit_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger(entries: &[(&str, f64)]) -> Ledger {
        let mut ledger = Ledger::new();
        for (date, liters) in entries {
            ledger.set(date.parse().unwrap(), *liters).unwrap();
        }
        ledger
    }

    #[test]
    fn test_february_example() {
        let ledger = ledger(&[("2024-02-01", 2.0), ("2024-02-15", 1.5)]);
        let summary = summarize(2024, 2, &ledger, 50.0);
        assert_eq!(summary.total_liters, 3.5);
        assert_eq!(summary.days_recorded, 2);
        assert_eq!(summary.average_liters, 1.75);
        assert_eq!(summary.total_bill, 175.0);
    }

    #[test]
    fn test_empty_month_is_all_zero() {
        let ledger = ledger(&[("2024-02-01", 2.0)]);
        let summary = summarize(2024, 3, &ledger, 80.0);
        assert_eq!(summary, MonthlySummary::empty(2024, 3));
        assert_eq!(summary.total_bill, 0.0);
        assert_eq!(summary.average_liters, 0.0);
    }

    #[test]
    fn test_neighbouring_months_do_not_leak() {
        let ledger = ledger(&[
            ("2024-01-31", 9.0),
            ("2024-02-01", 1.0),
            ("2024-02-29", 2.0),
            ("2024-03-01", 9.0),
            ("2023-02-10", 9.0),
        ]);
        let summary = summarize(2024, 2, &ledger, 1.0);
        assert_eq!(summary.total_liters, 3.0);
        assert_eq!(summary.days_recorded, 2);
    }

    #[test]
    fn test_total_is_exact_sum_without_rounding() {
        let ledger = ledger(&[("2024-04-01", 0.1), ("2024-04-02", 0.2), ("2024-04-03", 0.05)]);
        let summary = summarize(2024, 4, &ledger, 3.0);
        assert_eq!(summary.total_liters, 0.1 + 0.2 + 0.05);
        assert_eq!(summary.total_bill, (0.1 + 0.2 + 0.05) * 3.0);
    }

    #[test]
    fn test_zero_quantities_count_as_recorded_days() {
        let ledger = ledger(&[("2024-04-01", 0.0), ("2024-04-02", 2.0)]);
        let summary = summarize(2024, 4, &ledger, 10.0);
        assert_eq!(summary.days_recorded, 2);
        assert_eq!(summary.average_liters, 1.0);
    }

    #[test]
    fn test_month_entries_sorted() {
        let ledger = ledger(&[("2024-04-09", 1.0), ("2024-04-02", 2.0), ("2024-05-01", 3.0)]);
        let days: Vec<String> = month_entries(&ledger, 2024, 4)
            .into_iter()
            .map(|(d, _)| d.to_string())
            .collect();
        assert_eq!(days, vec!["2024-04-02", "2024-04-09"]);
    }
}
