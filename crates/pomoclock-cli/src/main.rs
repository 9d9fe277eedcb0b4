use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomoclock", version, about = "Pomodoro countdown widget")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive widget in this terminal
    Run {
        /// Emit one JSON event per line instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run whole work/break cycles without waiting and print a summary
    Simulate(commands::simulate::SimulateArgs),
    /// Print the widget's initial state as JSON
    Status,
    /// Format a number of seconds as MM:SS
    Format {
        seconds: u64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { json } => commands::run::run(json),
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Status => commands::status::run(),
        Commands::Format { seconds } => {
            println!("{}", pomoclock_core::format_duration(seconds));
            Ok(())
        }
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
