use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod duration;

#[derive(Parser)]
#[command(name = "timerdeck", version, about = "Timerdeck CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the current state of every timer as JSON
    Status,
    /// Countdown settings
    Countdown {
        #[command(subcommand)]
        action: commands::settings::CountdownAction,
    },
    /// Pomodoro settings
    Pomodoro {
        #[command(subcommand)]
        action: commands::settings::PomodoroAction,
    },
    /// Event countdown target
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Branding shown next to the timers
    Branding {
        #[command(subcommand)]
        action: commands::branding::BrandingAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Interactive session driving all timers from stdin
    Session,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("TIMERDECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Status => commands::status::run(),
        Commands::Countdown { action } => commands::settings::run_countdown(action),
        Commands::Pomodoro { action } => commands::settings::run_pomodoro(action),
        Commands::Event { action } => commands::event::run(action),
        Commands::Branding { action } => commands::branding::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Session => commands::session::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
