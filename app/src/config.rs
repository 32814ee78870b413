// app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration as StdDuration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentProvider {
  Stripe,
  /// In-process processor whose intents succeed immediately. Local use only.
  Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
  pub cloud_name: String,
  pub api_key: String,
  pub api_secret: String,
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,
  pub run_migrations: bool,

  pub seed_db: bool,
  pub seed_admin_email: String,
  pub seed_admin_password: Option<String>,

  pub jwt_secret: String,
  pub jwt_ttl: chrono::Duration,

  pub payment_provider: PaymentProvider,
  pub stripe_secret_key: Option<String>,
  pub stripe_api_base: String,
  pub currency: String,
  pub verify_payments: bool,

  /// `None` disables `/upload`.
  pub cloudinary: Option<CloudinaryConfig>,
  pub cloudinary_folder: String,

  pub allowed_origins: Vec<String>,
  pub http_timeout: StdDuration,
  pub log_format: LogFormat,
}

impl std::fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("database_url", &"[REDACTED]")
      .field("database_max_connections", &self.database_max_connections)
      .field("run_migrations", &self.run_migrations)
      .field("seed_db", &self.seed_db)
      .field("seed_admin_email", &self.seed_admin_email)
      .field("jwt_ttl", &self.jwt_ttl)
      .field("payment_provider", &self.payment_provider)
      .field("stripe_api_base", &self.stripe_api_base)
      .field("currency", &self.currency)
      .field("verify_payments", &self.verify_payments)
      .field("uploads_enabled", &self.cloudinary.is_some())
      .field("cloudinary_folder", &self.cloudinary_folder)
      .field("allowed_origins", &self.allowed_origins)
      .field("http_timeout", &self.http_timeout)
      .field("log_format", &self.log_format)
      .finish_non_exhaustive()
  }
}

/// Parses `7d`, `12h`, `30m`, `45s` or a bare number of seconds.
pub fn parse_duration(raw: &str) -> Option<chrono::Duration> {
  let raw = raw.trim();
  let (digits, unit) = match raw.char_indices().last()? {
    (idx, c) if c.is_ascii_alphabetic() => (&raw[..idx], c.to_ascii_lowercase()),
    _ => (raw, 's'),
  };
  let n: i64 = digits.trim().parse().ok().filter(|n| *n > 0)?;
  match unit {
    's' => chrono::Duration::try_seconds(n),
    'm' => chrono::Duration::try_minutes(n),
    'h' => chrono::Duration::try_hours(n),
    'd' => chrono::Duration::try_days(n),
    _ => None,
  }
}

fn parse_bool(var_name: &str, raw: &str) -> Result<bool> {
  match raw.trim().to_ascii_lowercase().as_str() {
    "true" | "1" | "yes" => Ok(true),
    "false" | "0" | "no" => Ok(false),
    other => Err(AppError::Config(format!("Invalid {} value: '{}'", var_name, other))),
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    let config = Self::from_lookup(|name| env::var(name).ok())?;
    tracing::info!(config = ?config, "Application configuration loaded successfully.");
    Ok(config)
  }

  /// Builds the config from any variable source. Blank values count as unset.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
    let require = |name: &str| get(name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", name)));
    let get_bool = |name: &str, default: bool| get(name).map_or(Ok(default), |v| parse_bool(name, &v));

    let server_host = get("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
    let server_port = get("SERVER_PORT")
      .unwrap_or_else(|| "3500".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = require("DATABASE_URL")?;
    let database_max_connections = get("DATABASE_MAX_CONNECTIONS")
      .unwrap_or_else(|| "10".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;
    let run_migrations = get_bool("RUN_MIGRATIONS", true)?;

    let seed_db = get_bool("SEED_DB", false)?;
    let seed_admin_email = get("SEED_ADMIN_EMAIL")
      .unwrap_or_else(|| "admin@example.com".to_string())
      .to_lowercase();
    let seed_admin_password = get("SEED_ADMIN_PASSWORD");
    if seed_db && seed_admin_password.is_none() {
      return Err(AppError::Config(
        "SEED_ADMIN_PASSWORD must be set when SEED_DB=true".to_string(),
      ));
    }

    let jwt_secret = require("JWT_SECRET")?;
    let jwt_expires_in = get("JWT_EXPIRES_IN").unwrap_or_else(|| "7d".to_string());
    let jwt_ttl = parse_duration(&jwt_expires_in)
      .ok_or_else(|| AppError::Config(format!("Invalid JWT_EXPIRES_IN: '{}'", jwt_expires_in)))?;

    let payment_provider = match get("PAYMENT_PROVIDER").as_deref().map(str::to_ascii_lowercase).as_deref() {
      None | Some("stripe") => PaymentProvider::Stripe,
      Some("mock") => PaymentProvider::Mock,
      Some(other) => return Err(AppError::Config(format!("Unknown PAYMENT_PROVIDER: '{}'", other))),
    };
    let stripe_secret_key = get("STRIPE_SECRET_KEY");
    if payment_provider == PaymentProvider::Stripe && stripe_secret_key.is_none() {
      return Err(AppError::Config(
        "STRIPE_SECRET_KEY must be set when PAYMENT_PROVIDER=stripe".to_string(),
      ));
    }
    let stripe_api_base = get("STRIPE_API_BASE")
      .unwrap_or_else(|| "https://api.stripe.com".to_string())
      .trim_end_matches('/')
      .to_string();
    let currency = get("CURRENCY").unwrap_or_else(|| "usd".to_string()).to_lowercase();
    let verify_payments = get_bool("VERIFY_PAYMENTS", false)?;

    let cloudinary = match (
      get("CLOUDINARY_CLOUD_NAME"),
      get("CLOUDINARY_API_KEY"),
      get("CLOUDINARY_API_SECRET"),
    ) {
      (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
        cloud_name,
        api_key,
        api_secret,
      }),
      _ => None,
    };
    let cloudinary_folder = get("CLOUDINARY_FOLDER").unwrap_or_else(|| "capstone".to_string());

    let allowed_origins = get("ALLOWED_ORIGINS")
      .unwrap_or_else(|| "http://localhost:5173,http://127.0.0.1:5173".to_string())
      .split(',')
      .map(|o| o.trim().trim_end_matches('/').to_string())
      .filter(|o| !o.is_empty())
      .collect();
    let http_timeout = get("HTTP_TIMEOUT_SECS")
      .unwrap_or_else(|| "30".to_string())
      .parse::<u64>()
      .map(StdDuration::from_secs)
      .map_err(|e| AppError::Config(format!("Invalid HTTP_TIMEOUT_SECS: {}", e)))?;
    let log_format = match get("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
      Some("json") => LogFormat::Json,
      _ => LogFormat::Pretty,
    };

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      run_migrations,
      seed_db,
      seed_admin_email,
      seed_admin_password,
      jwt_secret,
      jwt_ttl,
      payment_provider,
      stripe_secret_key,
      stripe_api_base,
      currency,
      verify_payments,
      cloudinary,
      cloudinary_folder,
      allowed_origins,
      http_timeout,
      log_format,
    })
  }
}
