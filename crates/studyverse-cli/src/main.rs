use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config_watch;
mod render;

#[derive(Parser)]
#[command(name = "studyverse", version, about = "Studyverse study planner CLI")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Timetable management
    Timetable {
        #[command(subcommand)]
        action: commands::timetable::TimetableAction,
    },
    /// Edit slots of the active timetable
    Slot {
        #[command(subcommand)]
        action: commands::slot::SlotAction,
    },
    /// Show what is scheduled right now
    Now(commands::now::NowArgs),
    /// Live view: clock, current activity and change notifications
    Watch,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Light/dark theme
    Theme {
        #[command(subcommand)]
        action: commands::theme::ThemeAction,
    },
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Timetable { action } => commands::timetable::run(action),
        Commands::Slot { action } => commands::slot::run(action),
        Commands::Now(args) => commands::now::run(args),
        Commands::Watch => commands::watch::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Theme { action } => commands::theme::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
