use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "actinurse", version, about = "ActiNurse reminder tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reminder management
    Reminder {
        #[command(subcommand)]
        action: commands::reminder::ReminderAction,
    },
    /// Notification panel
    Notification {
        #[command(subcommand)]
        action: commands::notification::NotificationAction,
    },
    /// Dashboard counts
    Summary,
    /// Run the notification sweeps until interrupted
    Watch,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env("ACTINURSE_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(match cli.command {
        Commands::Watch => "info",
        _ => "warn",
    });

    let result = match cli.command {
        Commands::Reminder { action } => commands::reminder::run(action),
        Commands::Notification { action } => commands::notification::run(action),
        Commands::Summary => commands::summary::run(),
        Commands::Watch => commands::watch::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            commands::completions::run(shell, &mut Cli::command())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
