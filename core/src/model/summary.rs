/// Billing figures for one calendar month. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlySummary {
    pub year: i32,
    /// 1-based month.
    pub month: u32,
    pub total_liters: f64,
    pub days_recorded: usize,
    pub average_liters: f64,
    pub total_bill: f64,
}

impl MonthlySummary {
    pub fn empty(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            ..Default::default()
        }
    }
}
