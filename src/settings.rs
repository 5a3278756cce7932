use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration_minutes: i64,

    #[serde(default)]
    pub refresh_token_secret: String,

    #[serde(default = "default_refresh_expiration")]
    pub refresh_token_exp_days: i64,

    #[serde(default)]
    pub storage_url: String,

    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,

    #[serde(default)]
    pub storage_service_key: String,

    #[serde(default = "default_storage_timeout")]
    pub storage_timeout_secs: u64,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub email_user: Option<String>,

    #[serde(default)]
    pub email_pass: Option<String>,

    #[serde(default = "default_sender_name")]
    pub mail_sender_name: String,

    #[serde(default)]
    pub admin_email_label: Option<String>,

    #[serde(default = "default_site_url")]
    pub site_url: String,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    #[serde(default = "default_contact_rate_limit")]
    pub contact_rate_limit_per_hour: u64,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default)]
    pub admin_bootstrap_email: Option<String>,

    #[serde(default)]
    pub admin_bootstrap_password: Option<String>,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Codex-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_jwt_expiration() -> i64 {
    15
}
fn default_refresh_expiration() -> i64 {
    7
}
fn default_storage_bucket() -> String {
    "media".to_string()
}
fn default_storage_timeout() -> u64 {
    30
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}
fn default_smtp_port() -> u16 {
    465
}
fn default_sender_name() -> String {
    "Portfolio Admin".to_string()
}
fn default_site_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_login_path() -> String {
    "/admin".to_string()
}
fn default_contact_rate_limit() -> u64 {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            name: default_name(),
            port: default_port(),
            host: default_host(),
            worker_count: default_worker_count(),
            database_url: String::new(),
            cors_allowed_origins: default_cors_origins(),
            jwt_secret: String::new(),
            jwt_expiration_minutes: default_jwt_expiration(),
            refresh_token_secret: String::new(),
            refresh_token_exp_days: default_refresh_expiration(),
            storage_url: String::new(),
            storage_bucket: default_storage_bucket(),
            storage_service_key: String::new(),
            storage_timeout_secs: default_storage_timeout(),
            max_upload_bytes: default_max_upload_bytes(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            email_user: None,
            email_pass: None,
            mail_sender_name: default_sender_name(),
            admin_email_label: None,
            site_url: default_site_url(),
            login_path: default_login_path(),
            contact_rate_limit_per_hour: default_contact_rate_limit(),
            trust_x_forwarded_for: false,
            admin_bootstrap_email: None,
            admin_bootstrap_password: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        // Secrets may come from the plain process environment
        config.database_url = fill_or_env(config.database_url, "APP_DATABASE_URL")?;
        config.jwt_secret = fill_or_env(config.jwt_secret, "APP_JWT_SECRET")?;
        config.refresh_token_secret = fill_or_env(config.refresh_token_secret, "APP_REFRESH_TOKEN_SECRET")?;

        config.email_user = config.email_user.or_else(|| non_empty_env("EMAIL_USER"));
        config.email_pass = config.email_pass.or_else(|| non_empty_env("EMAIL_PASS"));
        config.admin_email_label = config.admin_email_label.or_else(|| non_empty_env("ADMIN_EMAIL"));

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.jwt_secret.len() < 32 {
            errors.push("JWT_SECRET must be at least 32 characters");
        }
        if self.refresh_token_secret.len() < 32 {
            errors.push("REFRESH_TOKEN_SECRET must be at least 32 characters");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.storage_url.trim().is_empty() {
            errors.push("STORAGE_URL cannot be empty");
        }
        if !self.login_path.starts_with('/') {
            errors.push("LOGIN_PATH must start with '/'");
        }
        if self.max_upload_bytes == 0 {
            errors.push("MAX_UPLOAD_BYTES must be greater than zero");
        }
        if self.contact_rate_limit_per_hour == 0 {
            errors.push("CONTACT_RATE_LIMIT_PER_HOUR must be at least 1");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Relay credentials, present only when both halves are configured.
    pub fn mail_credentials(&self) -> Option<(String, Zeroizing<String>)> {
        match (&self.email_user, &self.email_pass) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.is_empty() => {
                Some((user.clone(), Zeroizing::new(pass.clone())))
            }
            _ => None,
        }
    }
}

fn fill_or_env(current: String, env_key: &str) -> Result<String, ConfigError> {
    if current.trim().is_empty() {
        env::var(env_key).map_err(|_| ConfigError::Message(format!("{env_key} must be set")))
    } else {
        Ok(current)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

fn redact_presence(value: &Option<String>) -> &'static str {
    match value {
        Some(v) if !v.is_empty() => "[SET]",
        _ => "[MISSING]",
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.redact())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("jwt_secret", &self.jwt_secret.redact())
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .field("refresh_token_secret", &self.refresh_token_secret.redact())
            .field("refresh_token_exp_days", &self.refresh_token_exp_days)
            .field("storage_url", &self.storage_url)
            .field("storage_bucket", &self.storage_bucket)
            .field("storage_service_key", &self.storage_service_key.redact())
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("email_user", &redact_presence(&self.email_user))
            .field("email_pass", &redact_presence(&self.email_pass))
            .field("site_url", &self.site_url)
            .field("login_path", &self.login_path)
            .field("contact_rate_limit_per_hour", &self.contact_rate_limit_per_hour)
            .field("admin_bootstrap_password", &redact_presence(&self.admin_bootstrap_password))
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub refresh_encoding: EncodingKey,
    pub refresh_decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let jwt_secret = Zeroizing::new(config.jwt_secret.clone());
        let refresh_secret = Zeroizing::new(config.refresh_token_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(jwt_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .field("refresh_encoding", &"[REDACTED]")
            .field("refresh_decoding", &"[REDACTED]")
            .finish()
    }
}
