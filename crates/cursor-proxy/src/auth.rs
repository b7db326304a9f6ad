//! Shared-secret authentication.
//!
//! A single static token (`API_TOKEN`) guards all endpoints. With no token
//! configured the proxy is open. The `Authorization` header is compared
//! against the configured value as-is.

use actix_web::{HttpRequest, HttpResponse};
use serde_json::json;

/// Check the request against the configured token.
///
/// `Err` carries the ready-made 401 response.
pub fn check(req: &HttpRequest, expected: Option<&str>) -> Result<(), HttpResponse> {
    let Some(expected) = expected else {
        return Ok(());
    };

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    match header {
        None => Err(HttpResponse::Unauthorized().json(json!({"error": "Missing API key"}))),
        Some(value) if value != expected => {
            Err(HttpResponse::Unauthorized().json(json!({"error": "Invalid API key"})))
        }
        Some(_) => Ok(()),
    }
}
