pub mod client;
pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "directory")]
#[command(about = "Employee directory CLI - database administration and API client")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "DIRECTORY_SERVER",
        default_value = "http://127.0.0.1:8080",
        help = "Base URL of a running directory server"
    )]
    pub server: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply database migrations (uses DATABASE_URL)")]
    Migrate,

    #[command(about = "Insert the demo director/leader/employee chain into an empty database")]
    Seed,

    #[command(about = "Authenticate against the server and store the token")]
    Login {
        #[arg(help = "Employee email")]
        email: String,
        #[arg(long, env = "DIRECTORY_PASSWORD", hide_env_values = true, help = "Password")]
        password: String,
    },

    #[command(about = "Forget the stored token")]
    Logout,

    #[command(about = "Employee operations against the server")]
    Employees {
        #[command(subcommand)]
        cmd: commands::employees::EmployeeCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::database::migrate(output_format).await,
        Commands::Seed => commands::database::seed(output_format).await,
        Commands::Login { email, password } => {
            commands::auth::login(&cli.server, &email, &password, output_format).await
        }
        Commands::Logout => commands::auth::logout(output_format),
        Commands::Employees { cmd } => commands::employees::handle(cmd, &cli.server, output_format).await,
    }
}
