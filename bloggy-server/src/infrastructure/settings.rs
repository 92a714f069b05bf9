use anyhow::{Context, Result, anyhow};

#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub(crate) database_url: String,
    pub(crate) jwt_secret: String,
    pub(crate) jwt_ttl_seconds: i64,
    pub(crate) email_token_secret: String,
    pub(crate) email_token_ttl_seconds: i64,
    pub(crate) http_addr: String,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) log_level: String,
    pub(crate) http_request_body_limit_bytes: usize,
    pub(crate) http_concurrency_limit: usize,
    pub(crate) upload_dir: String,
    pub(crate) upload_max_bytes: usize,
    pub(crate) smtp: SmtpSettings,
    pub(crate) verification_base_url: String,
}

#[derive(Debug, Clone)]
pub(crate) struct SmtpSettings {
    pub(crate) host: String,
    pub(crate) port: u16,
    pub(crate) username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) from: String,
}

impl Settings {
    pub(crate) fn from_env() -> Result<Self> {
        let database_url = get_required("DATABASE_URL").context("DATABASE_URL is required")?;
        let jwt_secret = get_required("JWT_SECRET").context("JWT_SECRET is required")?;
        let email_token_secret =
            get_required("EMAIL_TOKEN_SECRET").context("EMAIL_TOKEN_SECRET is required")?;
        let jwt_ttl_seconds = parse_i64_env("JWT_TTL_SECONDS", 3600)?;
        let email_token_ttl_seconds = parse_i64_env("EMAIL_TOKEN_TTL_SECONDS", 3600)?;

        if jwt_secret.chars().count() < 32 {
            return Err(anyhow!("JWT_SECRET must be at least 32 characters"));
        }
        if email_token_secret.chars().count() < 32 {
            return Err(anyhow!("EMAIL_TOKEN_SECRET must be at least 32 characters"));
        }
        // A verification token must never be able to pass as a session token.
        if email_token_secret == jwt_secret {
            return Err(anyhow!("EMAIL_TOKEN_SECRET must differ from JWT_SECRET"));
        }

        let http_addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_origins = parse_cors_origins(
            std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:8000,http://127.0.0.1:8000".to_string()),
        );
        let log_level = std::env::var("LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| "info".to_string());
        let http_request_body_limit_bytes =
            parse_usize_env("HTTP_REQUEST_BODY_LIMIT_BYTES", 2 * 1024 * 1024)?;
        let http_concurrency_limit = parse_usize_env("HTTP_CONCURRENCY_LIMIT", 256)?;
        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());
        let upload_max_bytes = parse_usize_env("UPLOAD_MAX_BYTES", 1024 * 1024)?;

        let smtp = SmtpSettings {
            host: std::env::var("SMTP_HOST").unwrap_or_default(),
            port: parse_u16_env("SMTP_PORT", 587)?,
            username: optional("SMTP_USERNAME"),
            password: optional("SMTP_PASSWORD"),
            from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "Bloggy <no-reply@bloggy.local>".to_string()),
        };
        let verification_base_url = std::env::var("VERIFICATION_BASE_URL")
            .unwrap_or_else(|_| format!("http://{http_addr}/api/auth/verify"));

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_ttl_seconds,
            email_token_secret,
            email_token_ttl_seconds,
            http_addr,
            cors_origins,
            log_level,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            upload_dir,
            upload_max_bytes,
            smtp,
            verification_base_url,
        })
    }
}

fn get_required(key: &str) -> Result<String> {
    let value = std::env::var(key)?;
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(anyhow!("{key} must not be empty"));
    }
    Ok(value)
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn parse_cors_origins(raw: String) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_usize_env(key: &str, default: usize) -> Result<usize> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<usize>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value == 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

fn parse_u16_env(key: &str, default: u16) -> Result<u16> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<u16>()
        .with_context(|| format!("Failed to parse {key}, expecting a port number"))
}

fn parse_i64_env(key: &str, default: i64) -> Result<i64> {
    let value = std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<i64>()
        .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?;

    if value <= 0 {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}
