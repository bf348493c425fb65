use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::utils::{output_success, output_value};
use crate::cli::OutputFormat;

pub async fn login(client: &ApiClient, email: &str, password: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = client
        .post("/auth/login", &json!({ "email": email, "password": password }))
        .await?;

    output_value(output_format, &body, |b| {
        vec![
            format!("Logged in as {} ({})", b["user"]["email"].as_str().unwrap_or_default(), b["user"]["role"].as_str().unwrap_or_default()),
            format!("Token expires in {}s", b["expires_in"]),
            String::new(),
            format!("export COURSE_API_TOKEN={}", b["token"].as_str().unwrap_or_default()),
        ]
    })
}

pub async fn whoami(client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    let body = client.get("/api/auth/whoami").await?;

    match output_format {
        OutputFormat::Json => output_value(output_format, &body, |_| Vec::new()),
        OutputFormat::Text => output_success(
            output_format,
            &format!(
                "{} <{}> user {} role {}",
                body["name"].as_str().unwrap_or_default(),
                body["email"].as_str().unwrap_or_default(),
                body["user_id"],
                body["role"].as_str().unwrap_or_default()
            ),
            None,
        ),
    }
}
