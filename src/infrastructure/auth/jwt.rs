use jsonwebtoken::{crypto, encode, Header, decode, Validation, TokenData, Algorithm};
use chrono::{Utc, Duration};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::entities::token::{Claims, RefreshClaims, ResetClaims, TokenType};
use crate::entities::user::User;
use crate::settings::{AppConfig, JwtKeys};
use crate::errors::AuthError;

const JWT_ALGORITHM: Algorithm = Algorithm::HS512;
const FINGERPRINT_LENGTH: usize = 22;

#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    access_expiration: Duration,
    refresh_expiration: Duration,
    reset_expiration: Duration,
}

impl JwtService {
    pub fn new(config: &AppConfig) -> Self {
        JwtService {
            keys: JwtKeys::from(config),
            access_expiration: Duration::minutes(config.jwt_expiration_minutes),
            refresh_expiration: Duration::days(config.refresh_token_exp_days),
            reset_expiration: Duration::hours(1),
        }
    }

    pub fn create_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            admin: user.is_admin,
            token_type: TokenType::Access,
            exp: (now + self.access_expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    pub fn create_refresh_jwt(&self, user_id: &Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            token_type: TokenType::Refresh,
            exp: (now + self.refresh_expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.refresh_encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// One-hour token bound to the user's current password hash.
    pub fn create_reset_jwt(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = ResetClaims {
            sub: user.id.to_string(),
            fp: self.password_fingerprint(&user.password_hash)?,
            token_type: TokenType::PasswordReset,
            exp: (now + self.reset_expiration).timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.keys.refresh_encoding)
            .map_err(|_| AuthError::TokenCreation)
    }

    /// Keyed digest of the password hash; reveals nothing about the hash
    /// itself but changes whenever the password does.
    pub fn password_fingerprint(&self, password_hash: &str) -> Result<String, AuthError> {
        let mut digest = crypto::sign(password_hash.as_bytes(), &self.keys.refresh_encoding, Algorithm::HS256)
            .map_err(|_| AuthError::TokenCreation)?;
        digest.truncate(FINGERPRINT_LENGTH);
        Ok(digest)
    }

    pub fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError> {
        let data = decode_with::<Claims>(token, &self.keys.decoding)?;
        expect_type(data.claims.token_type, TokenType::Access)?;
        Ok(data)
    }

    pub fn decode_refresh_jwt(&self, token: &str) -> Result<TokenData<RefreshClaims>, AuthError> {
        let data = decode_with::<RefreshClaims>(token, &self.keys.refresh_decoding)?;
        expect_type(data.claims.token_type, TokenType::Refresh)?;
        Ok(data)
    }

    pub fn decode_reset_jwt(&self, token: &str) -> Result<TokenData<ResetClaims>, AuthError> {
        let data = decode_with::<ResetClaims>(token, &self.keys.refresh_decoding)?;
        expect_type(data.claims.token_type, TokenType::PasswordReset)?;
        Ok(data)
    }
}

fn decode_with<T: DeserializeOwned>(
    token: &str,
    key: &jsonwebtoken::DecodingKey,
) -> Result<TokenData<T>, AuthError> {
    let mut validation = Validation::new(JWT_ALGORITHM);
    validation.validate_exp = true;
    validation.leeway = 0;

    decode::<T>(token, key, &validation).map_err(AuthError::from)
}

fn expect_type(actual: TokenType, expected: TokenType) -> Result<(), AuthError> {
    if actual == expected {
        Ok(())
    } else {
        Err(AuthError::InvalidToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        let config = AppConfig {
            jwt_secret: "access-secret-access-secret-access-secret".into(),
            refresh_token_secret: "refresh-secret-refresh-secret-refresh-secret".into(),
            ..AppConfig::default()
        };
        JwtService::new(&config)
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            password_hash: "$argon2id$v=19$m=15000,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNoaGFzaA".into(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn access_token_carries_admin_claim() {
        let service = service();
        let user = user();
        let token = service.create_jwt(&user).unwrap();
        let claims = service.decode_jwt(&token).unwrap().claims;
        assert_eq!(claims.sub, user.id.to_string());
        assert!(claims.admin);
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let service = service();
        let token = service.create_refresh_jwt(&Uuid::new_v4()).unwrap();
        assert!(service.decode_jwt(&token).is_err());
        assert!(service.decode_refresh_jwt(&token).is_ok());
    }

    #[test]
    fn reset_token_is_not_a_refresh_token() {
        let service = service();
        let token = service.create_reset_jwt(&user()).unwrap();
        assert!(matches!(service.decode_refresh_jwt(&token), Err(AuthError::InvalidToken)));

        let claims = service.decode_reset_jwt(&token).unwrap().claims;
        assert_eq!(claims.fp, service.password_fingerprint(&user().password_hash).unwrap());
    }

    #[test]
    fn fingerprint_does_not_expose_the_hash() {
        let service = service();
        let hash = user().password_hash;
        let fp = service.password_fingerprint(&hash).unwrap();

        assert_eq!(fp.len(), FINGERPRINT_LENGTH);
        let tail = &hash[hash.len() - 8..];
        assert!(!fp.contains(tail));

        let token = service.create_reset_jwt(&user()).unwrap();
        let payload = token.split('.').nth(1).unwrap();
        assert!(!payload.contains(tail));
    }

    #[test]
    fn fingerprint_depends_on_hash_and_secret() {
        let service = service();
        assert_ne!(
            service.password_fingerprint("hash-one").unwrap(),
            service.password_fingerprint("hash-two").unwrap()
        );

        let other = JwtService::new(&AppConfig {
            jwt_secret: "access-secret-access-secret-access-secret".into(),
            refresh_token_secret: "another-refresh-secret-another-refresh-secret".into(),
            ..AppConfig::default()
        });
        assert_ne!(
            service.password_fingerprint("hash-one").unwrap(),
            other.password_fingerprint("hash-one").unwrap()
        );
    }
}
