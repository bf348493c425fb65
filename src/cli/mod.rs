pub mod client;
pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use client::ApiClient;

#[derive(Parser)]
#[command(name = "coursectl")]
#[command(about = "coursectl - Command-line client for the Course API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, env = "COURSE_API_URL", default_value = "http://localhost:3000", help = "Base URL of the Course API")]
    pub url: String,

    #[arg(long, global = true, env = "COURSE_API_TOKEN", hide_env_values = true, help = "Bearer token from `coursectl login`")]
    pub token: Option<String>,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Log in and print a bearer token")]
    Login {
        #[arg(help = "Account email")]
        email: String,
        #[arg(long, env = "COURSE_API_PASSWORD", hide_env_values = true, help = "Account password")]
        password: String,
    },

    #[command(about = "Show the account behind the current token")]
    Whoami,

    #[command(about = "List and reorder course modules")]
    Modules {
        #[command(subcommand)]
        cmd: commands::modules::ModuleCommands,
    },

    #[command(about = "List and reorder module content")]
    Content {
        #[command(subcommand)]
        cmd: commands::content::ContentCommands,
    },

    #[command(about = "Record an evaluation score for an enrollment")]
    Grade {
        #[arg(help = "Enrollment id")]
        enrollment_id: i64,
        #[arg(help = "Score between 0 and 100")]
        score: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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
    let client = ApiClient::new(&cli.url, cli.token.clone())?;

    match cli.command {
        Commands::Login { email, password } => commands::auth::login(&client, &email, &password, output_format).await,
        Commands::Whoami => commands::auth::whoami(&client, output_format).await,
        Commands::Modules { cmd } => commands::modules::handle(&client, cmd, output_format).await,
        Commands::Content { cmd } => commands::content::handle(&client, cmd, output_format).await,
        Commands::Grade { enrollment_id, score } => {
            commands::grade::handle(&client, enrollment_id, score, output_format).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use commands::modules::ModuleCommands;

    #[test]
    fn parses_module_swap_with_global_flags() {
        let cli = Cli::try_parse_from([
            "coursectl", "--url", "http://api.test", "--token", "abc", "--json", "modules", "swap", "7", "1", "2",
        ])
        .unwrap();

        assert_eq!(cli.url, "http://api.test");
        assert_eq!(cli.token.as_deref(), Some("abc"));
        assert_eq!(OutputFormat::from_cli(&cli), OutputFormat::Json);
        assert!(matches!(
            cli.command,
            Commands::Modules { cmd: ModuleCommands::Swap { course_id: 7, num1: 1, num2: 2 } }
        ));
    }

    #[test]
    fn grade_requires_score() {
        assert!(Cli::try_parse_from(["coursectl", "grade", "3"]).is_err());
    }
}
