use axum::{extract::rejection::JsonRejection, Json};
use std::collections::HashMap;

use crate::error::ApiError;
use crate::services::validate::parse_key;

/// Positive integer path parameter by route name
pub fn path_key(params: &HashMap<String, String>, name: &str, field: &'static str) -> Result<i32, ApiError> {
    let raw = params
        .get(name)
        .ok_or_else(|| ApiError::validation_error(format!("Missing path parameter '{}'", name), None))?;
    Ok(parse_key(field, raw)?)
}

/// Unwrap a JSON body, turning extractor rejections into `ApiError::InvalidJson`
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(body) = payload?;
    Ok(body)
}
