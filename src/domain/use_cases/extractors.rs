use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use crate::{entities::token::Claims, errors::AuthError};

/// Claims attached by the auth gate. Returns 401 when the request carried
/// no valid access token.
#[derive(Debug)]
pub struct AuthClaims(pub Claims);

impl FromRequest for AuthClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        match req.extensions().get::<Claims>() {
            Some(claims) => ready(Ok(AuthClaims(claims.clone()))),
            None => ready(Err(AuthError::MissingCredentials.into())),
        }
    }
}

/// Admin-only variant: 401 without claims, 403 without the admin flag.
#[derive(Debug)]
pub struct AdminClaims(pub Claims);

impl FromRequest for AdminClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(admin_claims(req.extensions().get::<Claims>()).map(AdminClaims).map_err(Into::into))
    }
}

pub fn admin_claims(claims: Option<&Claims>) -> Result<Claims, AuthError> {
    match claims {
        Some(claims) if claims.admin => Ok(claims.clone()),
        Some(_) => Err(AuthError::Forbidden("Admin access required".into())),
        None => Err(AuthError::MissingCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::token::TokenType;
    use actix_web::{test::TestRequest, ResponseError};

    fn claims(admin: bool) -> Claims {
        Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            email: "admin@example.com".into(),
            admin,
            token_type: TokenType::Access,
            exp: usize::MAX,
            iat: 0,
        }
    }

    #[test]
    fn admin_flag_is_required() {
        assert!(admin_claims(Some(&claims(true))).is_ok());
        let forbidden = admin_claims(Some(&claims(false))).unwrap_err();
        assert_eq!(forbidden.status_code(), actix_web::http::StatusCode::FORBIDDEN);
        let missing = admin_claims(None).unwrap_err();
        assert_eq!(missing.status_code(), actix_web::http::StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn extracts_attached_claims() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(claims(false));
        let extracted = AuthClaims::extract(&req).await.unwrap();
        assert!(!extracted.0.admin);
    }
}
