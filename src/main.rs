use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use parent_rota::config::{load_run_inputs, DEFAULT_CONFIG_FILE};
use parent_rota::display::{print_schedule, write_schedule_to_file};
use parent_rota::schedule::schedule;
use parent_rota::web::{start_server, AppState};

#[derive(Parser)]
#[command(name = "parent-rota")]
#[command(about = "Assign parents to open weekdays by quota and preference")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the JSON config
    #[arg(long, short, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the schedule and print it (default).
    Run {
        /// Also write the schedule lines to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the schedule page and JSON API.
    Web {
        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,

        /// Password for roster uploads
        #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123", hide_env_values = true)]
        admin_password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let inputs = load_run_inputs(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    info!(
        parents = inputs.parents.len(),
        start = %inputs.start,
        end = %inputs.end,
        closed = inputs.closed_days.len(),
        "inputs ready"
    );

    match cli.command.unwrap_or(Commands::Run { output: None }) {
        Commands::Run { output } => {
            let run = schedule(
                inputs.parents,
                inputs.start,
                inputs.end,
                inputs.rules.as_ref(),
                Some(&inputs.closed_days),
            );
            print_schedule(&run);

            if let Some(path) = output {
                write_schedule_to_file(&run, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                info!(path = %path.display(), "schedule saved");
            }
        }
        Commands::Web { port, admin_password } => {
            info!(port, "starting web server, open http://localhost:{}", port);
            start_server(port, AppState::new(inputs, admin_password)).await?;
        }
    }

    Ok(())
}
