use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method, StatusCode},
    web, Error, HttpMessage, HttpResponse,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{borrow::Cow, rc::Rc};

use crate::{
    auth::jwt::JwtService,
    entities::token::Claims,
    errors::AuthError,
    handlers::json_error::{json_error, login_required},
    AppState,
};

const PROTECTED_PREFIXES: [&str; 4] = [
    "/api/admin",
    "/api/auth/session",
    "/api/auth/logout",
    "/api/debug-projects",
];
const ADMIN_PREFIXES: [&str; 2] = ["/api/admin", "/api/debug-projects"];

/// Session resolution for one request. Starts in `Checking` and moves to
/// `Resolved` exactly once.
#[derive(Debug, Clone)]
pub enum GateState {
    Checking,
    Resolved(Option<Claims>),
}

/// What the gate does with a resolved request.
#[derive(Debug)]
pub enum GateDecision {
    Proceed(Option<Claims>),
    LoginRequired,
    Forbidden,
}

impl GateState {
    /// Decodes the bearer token, if any. A resolved gate stays as it is.
    pub fn resolve(self, token: Option<&str>, jwt: &JwtService) -> GateState {
        match self {
            GateState::Checking => {
                let claims = token.and_then(|t| match jwt.decode_jwt(t) {
                    Ok(decoded) => Some(decoded.claims),
                    Err(e) => {
                        tracing::debug!(error = %e, "Ignoring invalid access token");
                        None
                    }
                });
                GateState::Resolved(claims)
            }
            resolved => resolved,
        }
    }

    pub fn decide(self, path: &str) -> GateDecision {
        let claims = match self {
            GateState::Resolved(claims) => claims,
            GateState::Checking => None,
        };

        if !is_protected(path) {
            return GateDecision::Proceed(claims);
        }
        match claims {
            None => GateDecision::LoginRequired,
            Some(claims) if requires_admin(path) && !claims.admin => GateDecision::Forbidden,
            Some(claims) => GateDecision::Proceed(Some(claims)),
        }
    }
}

/// The path the router will match: percent escapes decoded, so `/api/%61dmin`
/// is gated like `/api/admin`.
pub fn gate_path(raw: &str) -> Cow<'_, str> {
    urlencoding::decode(raw).unwrap_or(Cow::Borrowed(raw))
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    path == prefix || path.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('/'))
}

pub fn is_protected(path: &str) -> bool {
    PROTECTED_PREFIXES.iter().any(|prefix| matches_prefix(path, prefix))
}

pub fn requires_admin(path: &str) -> bool {
    ADMIN_PREFIXES.iter().any(|prefix| matches_prefix(path, prefix))
}

pub struct AuthGate;

impl<S, B> Transform<S, ServiceRequest> for AuthGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthGateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthGateService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthGateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthGateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if req.method() == Method::OPTIONS {
                return service.call(req).await.map(ServiceResponse::map_into_left_body);
            }

            let state = req.app_data::<web::Data<AppState>>()
                .cloned()
                .ok_or_else(|| {
                    tracing::error!("AppState missing in middleware");
                    AuthError::MissingJwtService
                })?;

            let token = extract_token(&req);
            let gate = GateState::Checking.resolve(token.as_deref(), &state.auth_handler.token_service);

            let path = gate_path(req.path()).into_owned();
            match gate.decide(&path) {
                GateDecision::Proceed(claims) => {
                    if let Some(claims) = claims {
                        req.extensions_mut().insert(claims);
                    }
                    service.call(req).await.map(ServiceResponse::map_into_left_body)
                }
                GateDecision::LoginRequired => {
                    tracing::warn!(path = %path, "Unauthenticated request to protected route");
                    let response = redirect_to_login(&req, &state.config.login_path);
                    Ok(req.into_response(response).map_into_right_body())
                }
                GateDecision::Forbidden => {
                    tracing::warn!(path = %path, "Admin access required");
                    let response = json_error(StatusCode::FORBIDDEN, "Forbidden", "Admin access required");
                    Ok(req.into_response(response).map_into_right_body())
                }
            }
        })
    }
}

/// Browsers get a 303 to the login screen, API clients a 401 naming it.
fn redirect_to_login(req: &ServiceRequest, login_path: &str) -> HttpResponse {
    if accepts_html(req) {
        HttpResponse::SeeOther()
            .insert_header((header::LOCATION, login_path))
            .finish()
    } else {
        login_required(login_path)
    }
}

fn accepts_html(req: &ServiceRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{token::TokenType, user::User};
    use crate::settings::AppConfig;
    use chrono::Utc;

    fn jwt() -> JwtService {
        JwtService::new(&AppConfig {
            jwt_secret: "k".repeat(64),
            refresh_token_secret: "r".repeat(64),
            ..AppConfig::default()
        })
    }

    fn token(admin: bool) -> String {
        let user = User {
            id: uuid::Uuid::new_v4(),
            email: "admin@example.com".into(),
            password_hash: String::new(),
            is_admin: admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        jwt().create_jwt(&user).unwrap()
    }

    #[test]
    fn prefix_matching_respects_segments() {
        assert!(is_protected("/api/admin"));
        assert!(is_protected("/api/admin/scrolls"));
        assert!(!is_protected("/api/administrator"));
        assert!(!is_protected("/api/public/scrolls"));
        assert!(requires_admin("/api/debug-projects"));
        assert!(!requires_admin("/api/auth/session"));
    }

    #[test]
    fn encoded_paths_are_gated_after_decoding() {
        assert_eq!(gate_path("/api/%61dmin/scrolls"), "/api/admin/scrolls");
        assert!(is_protected(&gate_path("/api/%61dmin/scrolls")));
        assert!(requires_admin(&gate_path("/api/debug%2Dprojects")));
        assert_eq!(gate_path("/api/public/scrolls"), "/api/public/scrolls");
    }

    #[test]
    fn resolves_once() {
        let jwt = jwt();
        let resolved = GateState::Checking.resolve(Some(&token(true)), &jwt);
        let again = resolved.clone().resolve(None, &jwt);
        match again {
            GateState::Resolved(Some(claims)) => assert_eq!(claims.token_type, TokenType::Access),
            other => panic!("gate re-resolved: {:?}", other),
        }
    }

    #[test]
    fn missing_or_bad_token_requires_login_on_protected_routes() {
        let jwt = jwt();
        let gate = GateState::Checking.resolve(Some("garbage"), &jwt);
        assert!(matches!(gate.decide("/api/admin/scrolls"), GateDecision::LoginRequired));

        let gate = GateState::Checking.resolve(None, &jwt);
        assert!(matches!(gate.decide("/api/public/scrolls"), GateDecision::Proceed(None)));
    }

    #[test]
    fn non_admin_is_forbidden_on_admin_routes_only() {
        let jwt = jwt();
        let token = token(false);
        let gate = GateState::Checking.resolve(Some(&token), &jwt);
        assert!(matches!(gate.decide("/api/admin/messages"), GateDecision::Forbidden));

        let gate = GateState::Checking.resolve(Some(&token), &jwt);
        assert!(matches!(gate.decide("/api/auth/session"), GateDecision::Proceed(Some(_))));
    }
}
