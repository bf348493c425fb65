use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(map)) = (data, response.as_object_mut()) {
                map.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a raw API body as JSON, or hand it to `render` for text
pub fn output_value(
    output_format: OutputFormat,
    body: &Value,
    render: impl Fn(&Value) -> Vec<String>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(body)?),
        OutputFormat::Text => {
            for line in render(body) {
                println!("{}", line);
            }
        }
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Items of a `{ "<key>": [...] }` response body
pub fn collection<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// One line per module: `  1. Intro (2 weeks)`
pub fn module_lines(body: &Value) -> Vec<String> {
    collection(body, "modules")
        .iter()
        .map(|m| {
            format!(
                "{:>3}. {} ({} weeks)",
                m["module_number"].as_i64().unwrap_or_default(),
                m["name"].as_str().unwrap_or_default(),
                m["duration_weeks"].as_i64().unwrap_or_default()
            )
        })
        .collect()
}

/// One line per content item: `  3. [Video] Welcome <url>`
pub fn content_lines(body: &Value) -> Vec<String> {
    collection(body, "content")
        .iter()
        .map(|c| {
            let mut line = format!(
                "{:>3}. [{}] {}",
                c["content_id"].as_i64().unwrap_or_default(),
                c["content_type"].as_str().unwrap_or_default(),
                c["title"].as_str().unwrap_or_default()
            );
            if let Some(url) = c["url"].as_str() {
                line.push_str(&format!(" <{}>", url));
            }
            line
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_lines_follow_module_order() {
        let body = json!({ "modules": [
            { "course_id": 1, "module_number": 1, "name": "Advanced", "duration_weeks": 4 },
            { "course_id": 1, "module_number": 2, "name": "Intro", "duration_weeks": 2 },
        ]});
        assert_eq!(module_lines(&body), vec!["  1. Advanced (4 weeks)", "  2. Intro (2 weeks)"]);
    }

    #[test]
    fn content_lines_include_url_when_present() {
        let body = json!({ "content": [
            { "content_id": 3, "content_type": "Video", "title": "Welcome", "url": "https://cdn.test/w" },
            { "content_id": 4, "content_type": "Note", "title": "Notes", "url": null },
        ]});
        assert_eq!(
            content_lines(&body),
            vec!["  3. [Video] Welcome <https://cdn.test/w>", "  4. [Note] Notes"]
        );
    }

    #[test]
    fn missing_collection_is_empty() {
        assert!(collection(&json!({}), "modules").is_empty());
    }
}
