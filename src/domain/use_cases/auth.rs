use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::auth::jwt::JwtService;
use crate::auth::password::{hash_password, verify_against_decoy, verify_password};
use crate::entities::token::{AuthResponse, Claims};
use crate::entities::user::{
    LoginUser, PasswordResetConfirm, PasswordResetRequest, PasswordUpdate, PublicUser,
    SessionResponse, User, UserInsert,
};
use crate::errors::{AppError, AuthError};
use crate::repositories::user::UserRepository;
use crate::use_cases::notifications::NotificationSender;

const RESET_PATH: &str = "/admin/update-password";

pub struct AuthHandler {
    pub user_repo: Arc<dyn UserRepository>,
    pub token_service: JwtService,
    pub notifier: NotificationSender,
    pub site_url: String,
}

impl AuthHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_service: JwtService,
        notifier: NotificationSender,
        site_url: String,
    ) -> Self {
        AuthHandler {
            user_repo,
            token_service,
            notifier,
            site_url,
        }
    }

    /// Logs in a user by validating credentials and generating JWTs.
    /// Never reveals whether the email or the password was wrong.
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        let found = self.user_repo.get_user_by_email(request.email.trim())
            .await
            .map_err(|_| AuthError::WrongCredentials)?;

        // Unknown addresses pay the same argon2 cost as a wrong password.
        let Some(user) = found else {
            verify_against_decoy(&request.password);
            return Err(AuthError::WrongCredentials);
        };

        let is_password_valid = verify_password(&request.password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            tracing::warn!(user_id = %user.id, "Rejected login attempt");
            return Err(AuthError::WrongCredentials);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let access_token = self.token_service.create_jwt(user)
            .map_err(|e| {
                tracing::warn!("Failed to create JWT: {}", e);
                AuthError::TokenCreation
            })?;

        let refresh_token = self.token_service.create_refresh_jwt(&user.id)
            .map_err(|e| {
                tracing::warn!("Failed to create refresh JWT: {}", e);
                AuthError::TokenCreation
            })?;
        Ok(AuthResponse::new(access_token, refresh_token))
    }

    /// Refreshes the access token using the refresh token
    pub async fn refresh_token(&self, token: &str) -> Result<AuthResponse, AuthError> {
        let decoded = self.token_service.decode_refresh_jwt(token)?;
        let user = self.user_for_subject(&decoded.claims.sub).await?;
        self.create_auth_response(&user)
    }

    /// Resolves the session behind already-validated access claims.
    pub async fn session(&self, claims: &Claims) -> Result<SessionResponse, AuthError> {
        let user = self.user_for_subject(&claims.sub).await?;
        Ok(SessionResponse {
            authenticated: true,
            user: PublicUser::from(user),
        })
    }

    pub async fn account(&self, claims: &Claims) -> Result<PublicUser, AuthError> {
        self.user_for_subject(&claims.sub).await.map(PublicUser::from)
    }

    /// Starts the reset flow. Always succeeds from the caller's point of
    /// view; unknown addresses and mail failures are only logged.
    pub async fn request_password_reset(&self, request: PasswordResetRequest) -> Result<(), AppError> {
        request.validate()?;

        let user = match self.user_repo.get_user_by_email(request.email.trim()).await? {
            Some(user) => user,
            None => {
                tracing::info!("Password reset requested for unknown address");
                return Ok(());
            }
        };

        let token = self.token_service.create_reset_jwt(&user)?;
        let link = format!(
            "{}{}?token={}",
            self.site_url.trim_end_matches('/'),
            RESET_PATH,
            urlencoding::encode(&token)
        );

        if let Err(e) = self.notifier.send_password_reset(&user.email, &link).await {
            tracing::warn!(user_id = %user.id, error = %e, "Password reset email not sent");
        }
        Ok(())
    }

    /// Completes the reset flow. The token is single-use: once the password
    /// changes its fingerprint no longer matches.
    pub async fn confirm_password_reset(&self, request: PasswordResetConfirm) -> Result<(), AppError> {
        let decoded = self.token_service.decode_reset_jwt(&request.token)?;
        let user = self.user_for_subject(&decoded.claims.sub).await?;

        if decoded.claims.fp != self.token_service.password_fingerprint(&user.password_hash)? {
            tracing::warn!(user_id = %user.id, "Reset token already used");
            return Err(AuthError::InvalidToken.into());
        }

        self.store_password(&user.id, &request.update).await?;
        tracing::info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }

    pub async fn update_password(&self, claims: &Claims, update: PasswordUpdate) -> Result<(), AppError> {
        let user = self.user_for_subject(&claims.sub).await?;
        self.store_password(&user.id, &update).await?;
        tracing::info!(user_id = %user.id, "Password updated");
        Ok(())
    }

    /// Creates the first admin account when the users table is empty.
    /// Returns whether an account was created.
    pub async fn bootstrap_admin(&self, email: &str, password: &str) -> Result<bool, AppError> {
        if self.user_repo.count_users().await? > 0 {
            return Ok(false);
        }

        PasswordUpdate {
            password: password.to_string(),
            confirm_password: password.to_string(),
        }
        .validate()?;

        let insert = UserInsert {
            email: email.trim().to_lowercase(),
            password_hash: hash_password(password)?,
            is_admin: true,
        };
        let id = self.user_repo.create_user(&insert).await?;
        tracing::info!(user_id = %id, "Bootstrap admin account created");
        Ok(true)
    }

    async fn store_password(&self, user_id: &Uuid, update: &PasswordUpdate) -> Result<(), AppError> {
        update.validate()?;
        let hash = hash_password(&update.password)?;
        self.user_repo.update_password(user_id, &hash).await
    }

    async fn user_for_subject(&self, sub: &str) -> Result<User, AuthError> {
        let user_id = Uuid::parse_str(sub).map_err(|_| AuthError::InvalidUserId)?;

        self.user_repo.get_user_by_id(&user_id)
            .await
            .map_err(|_| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::notification::MailIdentity;
    use crate::repositories::mailer::MockMailer;
    use crate::repositories::user::MockUserRepository;
    use crate::settings::AppConfig;
    use chrono::Utc;

    const PASSWORD: &str = "violet-harbor-lantern";

    fn config() -> AppConfig {
        AppConfig {
            jwt_secret: "a".repeat(64),
            refresh_token_secret: "b".repeat(64),
            ..AppConfig::default()
        }
    }

    fn user() -> User {
        User {
            id: Uuid::new_v4(),
            email: "admin@example.com".into(),
            password_hash: hash_password(PASSWORD).unwrap(),
            is_admin: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn handler(repo: MockUserRepository, mailer: MockMailer) -> AuthHandler {
        let notifier = NotificationSender::new(
            Arc::new(mailer),
            MailIdentity { account: Some("owner@example.com".into()), display_name: "Admin".into() },
        );
        AuthHandler::new(Arc::new(repo), JwtService::new(&config()), notifier, "https://site.test/".into())
    }

    #[actix_rt::test]
    async fn login_issues_tokens_for_valid_credentials() {
        let stored = user();
        let mut repo = MockUserRepository::new();
        let returned = stored.clone();
        repo.expect_get_user_by_email().returning(move |_| Ok(Some(returned.clone())));

        let handler = handler(repo, MockMailer::new());
        let response = handler
            .login(LoginUser { email: stored.email.clone(), password: PASSWORD.into() })
            .await
            .unwrap();

        let claims = handler.token_service.decode_jwt(&response.access_token).unwrap().claims;
        assert_eq!(claims.sub, stored.id.to_string());
        assert!(claims.admin);
    }

    #[actix_rt::test]
    async fn login_hides_which_part_failed() {
        let stored = user();
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email()
            .withf(|email| email == "admin@example.com")
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_get_user_by_email().returning(|_| Ok(None));

        let handler = handler(repo, MockMailer::new());
        let wrong_password = handler
            .login(LoginUser { email: "admin@example.com".into(), password: "not-it-at-all".into() })
            .await
            .unwrap_err();
        let unknown_user = handler
            .login(LoginUser { email: "ghost@example.com".into(), password: PASSWORD.into() })
            .await
            .unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[actix_rt::test]
    async fn reset_for_unknown_address_is_silent() {
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));
        let mut mailer = MockMailer::new();
        mailer.expect_send().never();

        let handler = handler(repo, mailer);
        let result = handler
            .request_password_reset(PasswordResetRequest { email: "ghost@example.com".into() })
            .await;
        assert!(result.is_ok());
    }

    #[actix_rt::test]
    async fn reset_email_links_to_update_page() {
        let stored = user();
        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_email().returning(move |_| Ok(Some(stored.clone())));
        let mut mailer = MockMailer::new();
        mailer.expect_is_configured().return_const(true);
        mailer
            .expect_send()
            .withf(|email| email.html.contains("https://site.test/admin/update-password?token="))
            .times(1)
            .returning(|_| Ok(()));

        let handler = handler(repo, mailer);
        handler
            .request_password_reset(PasswordResetRequest { email: "admin@example.com".into() })
            .await
            .unwrap();
    }

    #[actix_rt::test]
    async fn reset_token_is_single_use() {
        let stored = user();
        let token = JwtService::new(&config()).create_reset_jwt(&stored).unwrap();

        let mut changed = stored.clone();
        changed.password_hash = hash_password("another-quiet-meadow").unwrap();

        let mut repo = MockUserRepository::new();
        repo.expect_get_user_by_id().returning(move |_| Ok(Some(changed.clone())));
        repo.expect_update_password().never();

        let handler = handler(repo, MockMailer::new());
        let err = handler
            .confirm_password_reset(PasswordResetConfirm {
                token,
                update: PasswordUpdate {
                    password: "fresh-copper-window".into(),
                    confirm_password: "fresh-copper-window".into(),
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UnauthorizedAccess));
    }

    #[actix_rt::test]
    async fn bootstrap_only_runs_on_empty_table() {
        let mut repo = MockUserRepository::new();
        repo.expect_count_users().returning(|| Ok(1));
        repo.expect_create_user().never();

        let handler = handler(repo, MockMailer::new());
        assert!(!handler.bootstrap_admin("admin@example.com", PASSWORD).await.unwrap());
    }

    #[actix_rt::test]
    async fn bootstrap_rejects_weak_passwords() {
        let mut repo = MockUserRepository::new();
        repo.expect_count_users().returning(|| Ok(0));
        repo.expect_create_user().never();

        let handler = handler(repo, MockMailer::new());
        let err = handler.bootstrap_admin("admin@example.com", "password").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[actix_rt::test]
    async fn bootstrap_creates_admin_with_strong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_count_users().returning(|| Ok(0));
        repo.expect_create_user()
            .withf(|insert| insert.is_admin && insert.email == "admin@example.com")
            .times(1)
            .returning(|_| Ok(Uuid::new_v4()));

        let handler = handler(repo, MockMailer::new());
        assert!(handler.bootstrap_admin(" Admin@Example.com ", PASSWORD).await.unwrap());
    }
}
