pub mod calc;
pub mod menu;
pub mod output;
pub mod status;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use calc::{process_calc_command, CalcCommand};
use clap::{Parser, Subcommand};
use menu::Menu;
use output::{factors_json, render_factors, OutputStyle};
use status::{StatusFlash, DEFAULT_STATUS_LIFETIME};
use tokio::io::{self, BufReader};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    ledger::EmissionLedger,
    utils::{
        clock::DefaultClock,
        dir::create_application_default_path,
        logging::{enable_logging, CLI_PREFIX},
        percentage::Percentage,
    },
};

#[derive(Parser, Debug)]
#[command(name = "carbon-tracker", version, long_about = None)]
#[command(about = "Application for tracking the carbon footprint of everyday activities", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(long = "log", global = true, help = "Log level. Falls back to RUST_LOG, then to info")]
    log: Option<LevelFilter>,
    #[arg(long = "log-console", global = true, help = "Mirror logs to stdout. For debugging purposes")]
    log_console: bool,
    #[arg(
        long,
        global = true,
        help = "Application directory used for logs. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long = "no-color", global = true, help = "Disable colored output")]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Interactive menu for recording activities. Used when no command is given")]
    Menu {
        #[arg(short = 'p', long = "percentage", help = "Hide breakdown entries below the specified share of the total", default_value_t = Percentage::ZERO)]
        min_percentage: Percentage,
    },
    #[command(about = "Calculate emissions for activities given as arguments")]
    Calc {
        #[command(flatten)]
        command: CalcCommand,
    },
    #[command(about = "List the emission factors")]
    Factors {
        #[arg(long, help = "Print the factors as JSON")]
        json: bool,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args.dir.map_or_else(create_application_default_path, Ok)?;
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), args.log, args.log_console)?;

    let style = OutputStyle {
        color: !args.no_color,
    };

    match args.commands.unwrap_or(Commands::Menu {
        min_percentage: Percentage::ZERO,
    }) {
        Commands::Menu { min_percentage } => run_menu(style, min_percentage).await,
        Commands::Calc { command } => process_calc_command(command, style),
        Commands::Factors { json } => {
            if json {
                println!("{}", factors_json()?);
            } else {
                println!("{}", render_factors(style));
            }
            Ok(())
        }
    }
}

/// The session owns the ledger; the menu only borrows it.
async fn run_menu(style: OutputStyle, min_percentage: Percentage) -> Result<()> {
    let mut ledger = EmissionLedger::new();
    info!("Starting interactive session");

    let status = StatusFlash::new(Arc::new(DefaultClock), DEFAULT_STATUS_LIFETIME);
    Menu::new(
        &mut ledger,
        BufReader::new(io::stdin()),
        io::stdout(),
        status,
        style,
        min_percentage,
    )
    .run()
    .await?;

    info!(
        "Session finished with {} activities, {} kg total",
        ledger.len(),
        ledger.total_emissions()
    );
    Ok(())
}
