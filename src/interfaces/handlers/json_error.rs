use actix_web::{http::StatusCode, HttpResponse};

pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details
    }))
}

/// 401 for API callers, pointing at the login screen.
pub fn login_required(login_path: &str) -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({
        "error": "Authentication required",
        "redirect_to": login_path
    }))
}
