use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use anyhow::{Context, Result};
use zeroize::Zeroizing;

/// The application's configuration.
#[derive(Clone)]
pub struct Config {
    /// The address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// The directory holding the site's JSON data files.
    pub data_dir: PathBuf,
    /// The directory the public site is served from.
    pub public_dir: PathBuf,
    /// The lifetime of the admin cookies in days.
    pub session_duration_days: i64,
    /// How long an admin session may sit idle before it expires, in minutes.
    pub idle_timeout_minutes: i64,
    /// Whether cookies carry the `Secure` attribute.
    pub secure_cookies: bool,
    /// The key used to sign the admin session cookies.
    pub session_secret: Zeroizing<Vec<u8>>,
}

impl Config {
    /// Creates a new `Config` from environment variables.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Config`.
    pub fn from_env() -> Result<Self> {
        let session_secret = decode_session_secret(Zeroizing::new(
            env::var("ADMIN_SESSION_SECRET")
                .context("ADMIN_SESSION_SECRET must be set (generate with: openssl rand -hex 32)")?,
        ))?;

        let session_duration_days: i64 = env::var("SESSION_DURATION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .context("Invalid SESSION_DURATION_DAYS")?;
        if session_duration_days <= 0 {
            anyhow::bail!("SESSION_DURATION_DAYS must be positive");
        }

        let idle_timeout_minutes: i64 = env::var("ADMIN_IDLE_TIMEOUT_MINUTES")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("Invalid ADMIN_IDLE_TIMEOUT_MINUTES")?;
        if idle_timeout_minutes <= 0 {
            anyhow::bail!("ADMIN_IDLE_TIMEOUT_MINUTES must be positive");
        }

        let is_production = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string()) == "production";

        Ok(Self {
            bind_addr: env::var("BIND_ADDR")
                .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
                .parse()
                .context("Invalid BIND_ADDR")?,
            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "data".to_string())
                .into(),
            public_dir: env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "public".to_string())
                .into(),
            session_duration_days,
            idle_timeout_minutes,
            secure_cookies: is_production,
            session_secret,
        })
    }
}

/// Decodes the hex session secret into its 32 key bytes.
///
/// Both the hex text and the decoded bytes are zeroized when dropped, on
/// success and on every error path.
fn decode_session_secret(secret_hex: Zeroizing<String>) -> Result<Zeroizing<Vec<u8>>> {
    let secret_bytes = Zeroizing::new(
        hex::decode(secret_hex.trim())
            .map_err(|_| anyhow::anyhow!("ADMIN_SESSION_SECRET must be valid hexadecimal"))?,
    );

    if secret_bytes.len() != 32 {
        anyhow::bail!("ADMIN_SESSION_SECRET must be exactly 32 bytes (64 hex characters)");
    }

    Ok(secret_bytes)
}
