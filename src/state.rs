use chrono::Duration;

use crate::config::Config;
use crate::crypto::signing::SessionSigner;
use crate::error::Result;
use crate::repositories::data_file::DataStore;
use crate::session::codec::CookieCodec;
use crate::session::validator::SessionValidator;

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// Encodes and decodes the admin session cookies.
    pub codec: CookieCodec,
    /// Classifies admin sessions.
    pub validator: SessionValidator,
    /// The JSON data-file store.
    pub data: DataStore,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `AppState`.
    pub fn new(config: &Config) -> Result<Self> {
        let signer = SessionSigner::new(config.session_secret.as_slice())?;
        tracing::info!("✅ Session signer initialized");

        let codec = CookieCodec::new(
            signer.clone(),
            config.session_duration_days,
            config.secure_cookies,
        );
        let validator = SessionValidator::new(
            signer,
            Duration::minutes(config.idle_timeout_minutes),
            Duration::days(config.session_duration_days),
        );
        tracing::info!(
            "✅ Admin sessions: idle timeout {} min, cookie lifetime {} days",
            config.idle_timeout_minutes,
            config.session_duration_days
        );

        let data = DataStore::new(config.data_dir.clone());
        tracing::info!("✅ Data store at {}", config.data_dir.display());

        Ok(AppState {
            config: config.clone(),
            codec,
            validator,
            data,
        })
    }
}
