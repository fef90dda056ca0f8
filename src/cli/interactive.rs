use super::{ui, view, widget_options};
use crate::core::config::{AppConfig, ViewMode};
use crate::core::provider::RateProvider;
use crate::widget::{Intent, Readiness, Widget};
use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "Commands:
  amount <N>    set the amount to convert
  from <CODE>   convert from currency CODE
  to <CODE>     convert to currency CODE
  swap          swap the two currencies
  convert       convert with the current values
  list          show available currencies
  help          show this help
  quit          leave";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Intent),
    List,
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let arg = parts.next();
    if parts.next().is_some() {
        return Err(format!("Too many arguments: {}", line.trim()));
    }

    let command = match (word.to_lowercase().as_str(), arg) {
        ("amount", Some(value)) => {
            let amount = value
                .parse::<f64>()
                .map_err(|_| format!("Invalid amount: {value}"))?;
            if !amount.is_finite() {
                return Err(format!("Invalid amount: {value}"));
            }
            Command::Intent(Intent::SetAmount(amount))
        }
        ("from", Some(code)) => Command::Intent(Intent::SetFrom(code.to_uppercase())),
        ("to", Some(code)) => Command::Intent(Intent::SetTo(code.to_uppercase())),
        ("swap", None) => Command::Intent(Intent::Swap),
        ("convert", None) => Command::Intent(Intent::Submit),
        ("list", None) => Command::List,
        ("help" | "?", None) => Command::Help,
        ("quit" | "exit" | "q", None) => Command::Quit,
        ("amount" | "from" | "to", None) => return Err(format!("Missing value for '{word}'")),
        _ => return Err(format!("Unknown command: {}", line.trim())),
    };
    Ok(Some(command))
}

/// Outcome of one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Print(String),
    Idle,
    Quit,
}

/// One interactive converter and whether its current fields were confirmed
/// with `convert`.
pub struct Session {
    widget: Widget,
    precision: usize,
    view: ViewMode,
    submitted: bool,
}

impl Session {
    pub fn new(widget: Widget, config: &AppConfig) -> Self {
        Self {
            widget,
            precision: config.precision,
            view: config.view,
            submitted: false,
        }
    }

    pub fn widget(&self) -> &Widget {
        &self.widget
    }

    pub fn render(&self) -> String {
        let show_result = self.view == ViewMode::Live || self.submitted;
        view::render(&self.widget.snapshot(), self.precision, show_result)
    }

    /// Waits for the rate fetch to settle and renders the updated view.
    pub async fn rates_settled(&mut self) -> String {
        self.widget.ready().await;
        self.render()
    }

    pub fn step(&mut self, line: &str) -> Step {
        let command = match parse_command(line) {
            Ok(None) => return Step::Idle,
            Ok(Some(command)) => command,
            Err(message) => return Step::Print(ui::style_text(&message, ui::StyleType::Error)),
        };

        match command {
            Command::Quit => Step::Quit,
            Command::Help => Step::Print(HELP.to_string()),
            Command::List => {
                let codes = self.widget.state().codes();
                if codes.is_empty() {
                    Step::Print(ui::style_text("No currencies loaded", ui::StyleType::Subtle))
                } else {
                    Step::Print(codes.join(" "))
                }
            }
            Command::Intent(intent) => {
                let is_submit = intent == Intent::Submit;
                match self.widget.dispatch(intent) {
                    Ok(()) => {
                        // Any edit invalidates an earlier confirmation
                        self.submitted = is_submit;
                        Step::Print(self.render())
                    }
                    Err(e) => {
                        self.submitted = false;
                        Step::Print(format!(
                            "{}\n{}",
                            ui::style_text(&e.to_string(), ui::StyleType::Error),
                            self.render()
                        ))
                    }
                }
            }
        }
    }
}

enum Event {
    RatesSettled(String),
    Line(Option<String>),
}

/// Runs the converter against stdin until `quit` or end of input.
pub async fn run(provider: Arc<dyn RateProvider>, config: &AppConfig) -> Result<()> {
    let widget = Widget::mount(provider, widget_options(config));
    let mut session = Session::new(widget, config);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    println!("{}\n", session.render());

    loop {
        let pending = session.widget().readiness() == Readiness::Pending;
        let event = tokio::select! {
            view = session.rates_settled(), if pending => Event::RatesSettled(view),
            line = lines.next_line() => Event::Line(line?),
        };

        let line = match event {
            Event::RatesSettled(view) => {
                println!("{view}\n");
                continue;
            }
            Event::Line(None) => break,
            Event::Line(Some(line)) => line,
        };

        match session.step(&line) {
            Step::Print(output) => println!("{output}\n"),
            Step::Idle => {}
            Step::Quit => break,
        }
    }

    debug!("Interactive session finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bootstrap::tests::StaticProvider;
    use std::time::Duration;

    fn config(view: ViewMode) -> AppConfig {
        AppConfig {
            view,
            ..AppConfig::default()
        }
    }

    async fn ready_session(view: ViewMode) -> Session {
        let provider = Arc::new(StaticProvider::ok("EUR", &[("USD", 1.1), ("GBP", 0.9)]));
        let config = config(view);
        let mut session = Session::new(Widget::mount(provider, widget_options(&config)), &config);
        session.rates_settled().await;
        session
    }

    fn printed(step: Step) -> String {
        match step {
            Step::Print(text) => console::strip_ansi_codes(&text).to_string(),
            other => panic!("expected output, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_intents() {
        assert_eq!(
            parse_command("amount 12.5"),
            Ok(Some(Command::Intent(Intent::SetAmount(12.5))))
        );
        assert_eq!(
            parse_command("  from usd "),
            Ok(Some(Command::Intent(Intent::SetFrom("USD".to_string()))))
        );
        assert_eq!(
            parse_command("TO gbp"),
            Ok(Some(Command::Intent(Intent::SetTo("GBP".to_string()))))
        );
        assert_eq!(
            parse_command("swap"),
            Ok(Some(Command::Intent(Intent::Swap)))
        );
        assert_eq!(
            parse_command("convert"),
            Ok(Some(Command::Intent(Intent::Submit)))
        );
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_command(""), Ok(None));
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(parse_command("list"), Ok(Some(Command::List)));
        assert_eq!(parse_command("?"), Ok(Some(Command::Help)));
        assert_eq!(parse_command("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            parse_command("amount abc"),
            Err("Invalid amount: abc".to_string())
        );
        assert_eq!(
            parse_command("amount inf"),
            Err("Invalid amount: inf".to_string())
        );
        assert_eq!(
            parse_command("from"),
            Err("Missing value for 'from'".to_string())
        );
        assert_eq!(
            parse_command("swap now"),
            Err("Unknown command: swap now".to_string())
        );
        assert_eq!(
            parse_command("to usd eur"),
            Err("Too many arguments: to usd eur".to_string())
        );
    }

    #[tokio::test]
    async fn test_on_submit_shows_result_only_after_convert() {
        let mut session = ready_session(ViewMode::OnSubmit).await;

        let text = printed(session.step("amount 100"));
        assert!(text.contains("Type 'convert'"));
        assert!(!text.contains("110"));

        let text = printed(session.step("convert"));
        assert!(text.contains("100 EUR ="));
        assert!(text.contains("110.00000 USD"));

        // Editing again hides the result until the next convert
        let text = printed(session.step("amount 200"));
        assert!(!text.contains("220"));
        assert!(text.contains("Type 'convert'"));

        let text = printed(session.step("convert"));
        assert!(text.contains("220.00000 USD"));
    }

    #[tokio::test]
    async fn test_live_view_always_shows_result() {
        let mut session = ready_session(ViewMode::Live).await;

        let text = printed(session.step("amount 100"));
        assert!(text.contains("110.00000 USD"));

        let text = printed(session.step("to gbp"));
        assert!(text.contains("90.00000 GBP"));

        let text = printed(session.step("swap"));
        assert!(text.contains("100 GBP ="));
    }

    #[tokio::test]
    async fn test_failed_edit_hides_stale_result() {
        let mut session = ready_session(ViewMode::OnSubmit).await;
        session.step("amount 100");
        session.step("convert");

        let text = printed(session.step("from xyz"));
        assert!(text.contains("XYZ"));
        assert!(!text.contains("100 XYZ ="));
        assert!(!text.contains("110"));

        // A convert that fails does not count as confirmed either
        let text = printed(session.step("convert"));
        assert!(!text.contains("110"));

        let text = printed(session.step("from eur"));
        assert!(!text.contains("110"));
        let text = printed(session.step("convert"));
        assert!(text.contains("110.00000 USD"));
    }

    #[tokio::test]
    async fn test_session_commands() {
        let mut session = ready_session(ViewMode::Live).await;
        assert_eq!(session.step("   "), Step::Idle);
        assert_eq!(session.step("quit"), Step::Quit);
        assert_eq!(printed(session.step("list")), "EUR USD GBP");
        assert_eq!(printed(session.step("help")), HELP);
        assert_eq!(
            printed(session.step("amount abc")),
            "Invalid amount: abc"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_view_updates_when_rates_arrive() {
        let provider = Arc::new(
            StaticProvider::ok("EUR", &[("USD", 1.1), ("GBP", 0.9)])
                .delayed(Duration::from_secs(2)),
        );
        let config = config(ViewMode::Live);
        let mut session = Session::new(Widget::mount(provider, widget_options(&config)), &config);

        let text = printed(session.step("amount 100"));
        assert!(text.contains("Loading exchange rates"));
        assert_eq!(printed(session.step("list")), "No currencies loaded");

        let text = console::strip_ansi_codes(&session.rates_settled().await).to_string();
        assert!(text.contains("100 EUR ="));
        assert!(text.contains("110.00000 USD"));
    }
}
