use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxw::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for fxw::AppCommand {
    fn from(cmd: Commands) -> fxw::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => fxw::AppCommand::Convert { amount, from, to },
            Commands::Currencies => fxw::AppCommand::Currencies,
            Commands::Interactive => fxw::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert
        amount: f64,
        /// Currency code to convert from
        from: String,
        /// Currency code to convert to
        to: String,
    },
    /// List available currencies and their rates
    Currencies,
    /// Run the converter interactively
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fxw::cli::setup::setup(),
        Some(cmd) => fxw::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
