use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::{collection, content_lines, output_empty_collection, output_value};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ContentCommands {
    #[command(about = "List a module's content in order")]
    List {
        #[arg(help = "Course id")]
        course_id: i64,
        #[arg(help = "Module number")]
        module: i64,
    },

    #[command(about = "Swap the positions of two content items")]
    Swap {
        #[arg(help = "Course id")]
        course_id: i64,
        #[arg(help = "Module number")]
        module: i64,
        #[arg(help = "First content id")]
        content_id1: i64,
        #[arg(help = "Second content id")]
        content_id2: i64,
    },
}

pub async fn handle(client: &ApiClient, cmd: ContentCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = match cmd {
        ContentCommands::List { course_id, module } => {
            client
                .get(&format!("/instructor/courses/{}/modules/{}/content", course_id, module))
                .await?
        }
        ContentCommands::Swap { course_id, module, content_id1, content_id2 } => {
            client
                .post(
                    &format!("/instructor/courses/{}/modules/{}/content/swap", course_id, module),
                    &json!({ "contentId1": content_id1, "contentId2": content_id2 }),
                )
                .await?
        }
    };

    if collection(&body, "content").is_empty() {
        return output_empty_collection(output_format, "content", "No content");
    }
    output_value(output_format, &body, content_lines)
}
