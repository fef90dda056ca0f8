//! Text rendering of a converter snapshot.

use super::ui::{self, StyleType};
use crate::core::convert::format_amount;
use crate::widget::{Readiness, ViewSnapshot};

/// Renders the converter as shown in the terminal.
///
/// `show_result` is false when the view waits for an explicit convert before
/// revealing the converted amount.
pub fn render(view: &ViewSnapshot, precision: usize, show_result: bool) -> String {
    match view.readiness {
        Readiness::Pending => {
            return ui::style_text("Loading exchange rates...", StyleType::Subtle);
        }
        Readiness::Failed => {
            let reason = view.error.as_deref().unwrap_or("unknown error");
            return ui::style_text(
                &format!("Exchange rates unavailable: {reason}"),
                StyleType::Error,
            );
        }
        Readiness::Ready => {}
    }

    let from = view.from.as_deref().unwrap_or("-");
    let to = view.to.as_deref().unwrap_or("-");

    let mut output = format!(
        "{} {}  {} {}  {} {}\n",
        ui::style_text("Amount:", StyleType::Label),
        view.amount,
        ui::style_text("From:", StyleType::Label),
        from,
        ui::style_text("To:", StyleType::Label),
        to,
    );

    if !show_result {
        output.push_str(&ui::style_text(
            "\nType 'convert' to see the result",
            StyleType::Subtle,
        ));
        return output;
    }

    match view.result {
        Some(result) => {
            output.push_str(&format!("\n{} {} =\n", view.amount, from));
            output.push_str(&format!(
                "{} {}\n",
                ui::style_text(&format_amount(result, precision), StyleType::Result),
                to
            ));
        }
        None => output.push_str(&ui::style_text(
            &format!("\nNo exchange rate for {from} to {to}"),
            StyleType::Error,
        )),
    }

    if let Some(unit) = view.unit_rates {
        output.push_str(&format!(
            "\n1 {to} = {} {from}\n1 {from} = {} {to}",
            format_amount(unit.to_in_from, precision),
            format_amount(unit.from_in_to, precision),
        ));
    }

    output.trim_end().to_string()
}
