use milktrack_core::{DateKey, Quantity};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct EntryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    weekday: String,
    #[tabled(rename = "Liters")]
    liters: String,
}

pub fn render_entries(entries: &[(DateKey, Quantity)]) -> String {
    let rows: Vec<EntryRow> = entries
        .iter()
        .map(|(date, quantity)| EntryRow {
            date: date.to_string(),
            weekday: date.date().format("%a").to_string(),
            liters: format_liters(quantity.liters()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

pub fn format_liters(liters: f64) -> String {
    format!("{:.1} L", liters)
}

pub fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}
