use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

pub async fn handle(client: &ApiClient, enrollment_id: i64, score: i64, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = client
        .put(
            &format!("/instructor/enrollments/{}/grade", enrollment_id),
            &json!({ "evaluation_score": score }),
        )
        .await?;

    output_success(
        output_format,
        &format!("Enrollment {} graded {}", enrollment_id, body["evaluation_score"]),
        Some(body),
    )
}
