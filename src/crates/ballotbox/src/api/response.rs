//! API response helpers
//!
//! Consistent JSON envelopes, redirects and file downloads.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Redirect},
    Json,
};
use serde::{Deserialize, Serialize};

/// Generic success response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    /// Create a new success response
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Create a 200 OK JSON response
pub fn ok<T: Serialize>(data: T) -> impl IntoResponse {
    (StatusCode::OK, Json(SuccessResponse::new(data)))
}

/// Create a 303 See Other redirect
pub fn see_other(location: &str) -> Redirect {
    Redirect::to(location)
}

/// Create a file download response
pub fn attachment(
    file_name: &str,
    content_type: &'static str,
    body: Vec<u8>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let resp = SuccessResponse::new("data");
        assert!(resp.success);
        assert_eq!(resp.data, "data");
    }

    #[test]
    fn test_see_other_status() {
        let response = see_other("/admin").into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/admin");
    }

    #[test]
    fn test_attachment_headers() {
        let response = attachment("tokens.zip", "application/zip", vec![1, 2, 3]).into_response();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"tokens.zip\""
        );
    }
}
