use super::{load_widget, ui};
use crate::core::config::AppConfig;
use crate::core::convert::format_amount;
use crate::core::provider::RateProvider;
use crate::core::rates::RateTable;
use anyhow::{Result, anyhow};
use comfy_table::Cell;
use std::sync::Arc;

/// Builds the table of available currencies and their rates against the base.
pub fn rates_table(table: &RateTable, precision: usize) -> String {
    let mut output = ui::new_styled_table();
    output.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Per 1 {}", table.base())),
    ]);

    for code in table.codes() {
        let rate = table.rate(code).map_or("N/A".to_string(), |r| format_amount(r, precision));
        output.add_row(vec![Cell::new(code), ui::number_cell(rate)]);
    }

    let title = match table.date() {
        Some(date) => format!("Exchange rates ({} base, {})", table.base(), date),
        None => format!("Exchange rates ({} base)", table.base()),
    };
    format!(
        "{}\n\n{}",
        ui::style_text(&title, ui::StyleType::Title),
        output
    )
}

pub async fn run(provider: Arc<dyn RateProvider>, config: &AppConfig) -> Result<()> {
    let widget = load_widget(provider, config).await?;
    let table = widget
        .state()
        .rate_table()
        .ok_or_else(|| anyhow!("Exchange rates are not available"))?;
    println!("{}", rates_table(table, config.precision));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RateQuote;
    use chrono::NaiveDate;

    #[test]
    fn test_rates_table_lists_codes_in_order() {
        let table = RateTable::from_quote(RateQuote {
            base: Some("EUR".to_string()),
            rates: Some(vec![("USD".to_string(), 1.1), ("GBP".to_string(), 0.9)]),
            date: NaiveDate::from_ymd_opt(2020, 5, 29),
        })
        .unwrap();

        let text = console::strip_ansi_codes(&rates_table(&table, 2)).to_string();
        assert!(text.starts_with("Exchange rates (EUR base, 2020-05-29)"));
        assert!(text.contains("Per 1 EUR"));
        assert!(text.contains("1.10"));
        assert!(text.contains("0.90"));

        assert!(text.contains("1.00"));
        let usd = text.find("USD").unwrap();
        let gbp = text.find("GBP").unwrap();
        assert!(usd < gbp);
    }
}
