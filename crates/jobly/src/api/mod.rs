//! Framework-agnostic request handlers.
//!
//! Handlers take already-parsed inputs (actor, path id, body, query pairs) and
//! always produce an [`ApiResponse`]; errors are rendered, never propagated.
//! Wiring them to an HTTP router is left to the embedding application.

pub mod jobs;

use crate::error::{JoblyError, JoblyResult};
use serde_json::Value;

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn created(body: Value) -> Self {
        Self { status: 201, body }
    }

    pub fn from_error(err: &JoblyError) -> Self {
        let status = err.status_code();
        if status >= 500 {
            tracing::error!(error = %err, "request failed");
        } else {
            tracing::debug!(status, error = %err, "request rejected");
        }
        Self {
            status,
            body: err.to_json(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub(crate) fn respond(result: JoblyResult<ApiResponse>) -> ApiResponse {
    result.unwrap_or_else(|err| ApiResponse::from_error(&err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn errors_render_as_json() {
        let res = respond(Err(JoblyError::not_found("No job: 9")));
        assert_eq!(res.status, 404);
        assert!(!res.is_success());
        assert_eq!(
            res.body,
            json!({"error": {"message": "No job: 9", "status": 404}})
        );
    }

    #[test]
    fn success_passes_through() {
        let res = respond(Ok(ApiResponse::created(json!({"job": {}}))));
        assert_eq!(res.status, 201);
        assert!(res.is_success());
    }
}
