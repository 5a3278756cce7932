use actix_web::{web, HttpRequest, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::notification::{Notification, NotificationKind},
    handlers::messages::check_rate_limit,
    use_cases::extractors::{admin_claims, AuthClaims},
    AppState,
};

/// `POST /api/send-email`. Public for form notifications, which count
/// against the submission limit; `reply` needs an admin session.
#[instrument(skip(req, claims, state, notification), fields(kind = ?notification.kind))]
pub async fn send_email(
    req: HttpRequest,
    claims: Option<AuthClaims>,
    state: web::Data<AppState>,
    notification: web::Json<Notification>,
) -> Result<impl Responder, actix_web::Error> {
    if notification.kind == NotificationKind::Reply {
        admin_claims(claims.as_ref().map(|c| &c.0))?;
    } else {
        check_rate_limit(&req, &state)?;
    }

    state.notifier.send(&notification).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}
