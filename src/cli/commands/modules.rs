use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::{collection, module_lines, output_empty_collection, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ModuleCommands {
    #[command(about = "List a course's modules in order")]
    List {
        #[arg(help = "Course id")]
        course_id: i64,
    },

    #[command(about = "Swap the positions of two modules")]
    Swap {
        #[arg(help = "Course id")]
        course_id: i64,
        #[arg(help = "First module number")]
        num1: i64,
        #[arg(help = "Second module number")]
        num2: i64,
    },
}

pub async fn handle(client: &ApiClient, cmd: ModuleCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = match cmd {
        ModuleCommands::List { course_id } => {
            client.get(&format!("/instructor/courses/{}/modules", course_id)).await?
        }
        ModuleCommands::Swap { course_id, num1, num2 } => {
            client
                .post(
                    &format!("/instructor/courses/{}/modules/swap", course_id),
                    &json!({ "num1": num1, "num2": num2 }),
                )
                .await?
        }
    };

    if collection(&body, "modules").is_empty() {
        return output_empty_collection(output_format, "modules", "No modules");
    }
    output_value(output_format, &body, module_lines)
}
