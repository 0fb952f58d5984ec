//! HTTP rendering of [`AppError`]
//!
//! Errors leave the server as RFC 7807 problem details. Failed settlements
//! carry the transaction receipt under `details`.

use super::app_error::AppError;

impl AppError {
    /// Problem-details body
    pub fn to_problem_json(&self) -> serde_json::Value {
        let mut body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });
        if let (Some(details), Some(map)) = (self.details(), body.as_object_mut()) {
            map.insert("details".to_string(), details.clone());
        }
        body
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self.to_problem_json())).into_response()
    }
}
