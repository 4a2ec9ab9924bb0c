//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::auth::{CookiePolicy, SameSite};
use crate::db::Database;
use axum::http::HeaderValue;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use url::Url;

const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Environment variable holding the token signing secret.
pub const JWT_SECRET_ENV: &str = "ACCESS_TOKEN_SECRET";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "bistro", about = "Restaurant ordering API")]
pub struct Args {
    /// Path prefix for every route ("" serves from the root)
    #[arg(short, long, env = "API_BASE", default_value = "/api/v1", value_parser = validate_base_path)]
    pub base: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, env = "DATABASE_PATH", default_value = "bistro.db")]
    pub database: String,

    /// Origin of the web client allowed to make credentialed requests
    #[arg(long, env = "ALLOWED_ORIGIN", default_value = "http://localhost:5173")]
    pub allowed_origin: String,

    /// Set the Secure flag on the session cookie (requires HTTPS)
    #[arg(long, env = "SECURE_COOKIES")]
    pub secure_cookies: bool,

    /// SameSite policy of the session cookie
    #[arg(long, env = "COOKIE_SAME_SITE", value_enum, default_value = "strict")]
    pub same_site: SameSite,

    /// Session token lifetime in seconds
    #[arg(long, env = "TOKEN_TTL_SECS", default_value = "3600", value_parser = clap::value_parser!(u64).range(1..))]
    pub token_ttl_secs: u64,

    /// Path to file containing the token secret. Prefer the ACCESS_TOKEN_SECRET env var instead
    #[arg(long)]
    pub jwt_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn validate_base_path(s: &str) -> Result<String, String> {
    if s.is_empty() || s == "/" {
        return Ok(String::new());
    }

    if !s.starts_with('/') {
        return Err(format!("Base path must start with '/': {}", s));
    }

    if s.ends_with('/') {
        return Err(format!("Base path must not end with '/': {}", s));
    }

    if s.chars().any(|c| !c.is_ascii() || c.is_whitespace()) {
        return Err(format!("Base path contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

/// Initialize logging based on the specified format.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging(format: &LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

/// Load the token secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_jwt_secret(jwt_secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var(JWT_SECRET_ENV) {
        // Clear the environment variable to prevent leaking
        // SAFETY: Runtime worker threads exist, but no task has been spawned
        // yet and nothing else reads or writes the environment concurrently.
        unsafe { std::env::remove_var(JWT_SECRET_ENV) };
        secret
    } else if let Some(path) = jwt_secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read JWT secret file");
                return None;
            }
        }
    } else {
        error!(
            "JWT secret is required. Set {} environment variable (recommended) or use --jwt-secret-file",
            JWT_SECRET_ENV
        );
        return None;
    };

    if secret.len() < MIN_JWT_SECRET_LENGTH {
        error!(
            "JWT secret is shorter than {} characters. Use a longer secret",
            MIN_JWT_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Parse the allowed CORS origin into a header value.
/// Returns None and logs an error if validation fails.
pub fn validate_allowed_origin(origin: &str) -> Option<HeaderValue> {
    let url = match Url::parse(origin) {
        Ok(url) => url,
        Err(e) => {
            error!(origin = %origin, error = %e, "Invalid allowed-origin URL");
            return None;
        }
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        error!(origin = %origin, "allowed-origin must use http or https");
        return None;
    }

    // Browsers send the bare origin, without path or trailing slash
    match HeaderValue::from_str(&url.origin().ascii_serialization()) {
        Ok(value) => Some(value),
        Err(e) => {
            error!(origin = %origin, error = %e, "allowed-origin is not a valid header value");
            None
        }
    }
}

/// Build the cookie policy, rejecting combinations browsers refuse.
pub fn build_cookie_policy(secure: bool, same_site: SameSite) -> Option<CookiePolicy> {
    if same_site == SameSite::None && !secure {
        error!("SameSite=None cookies require --secure-cookies");
        return None;
    }

    Some(CookiePolicy { secure, same_site })
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    base: String,
    db: Database,
    jwt_secret: String,
    token_ttl: u64,
    cookies: CookiePolicy,
    allowed_origin: HeaderValue,
) -> ServerConfig {
    ServerConfig {
        base,
        db,
        jwt_secret: jwt_secret.into_bytes(),
        token_ttl,
        cookies,
        allowed_origin,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}
