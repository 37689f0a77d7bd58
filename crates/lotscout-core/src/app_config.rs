//! Runtime configuration, loaded from environment variables with
//! defaults suitable for interactive use.

use crate::CoreError;

const DEFAULT_TIMEOUT_SECS: u64 = 12;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
/// Occurrences of a price value in the fallback text path needed before
/// its confidence is raised from Low to Medium. Heuristic, not derived
/// from measured accuracy data; kept configurable for that reason.
const DEFAULT_PRICE_FREQ_THRESHOLD: u32 = 2;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Hard bound on the listing-page fetch, in seconds.
    pub request_timeout_secs: u64,
    /// Browser-like user agent sent with every fetch.
    pub user_agent: String,
    /// See [`DEFAULT_PRICE_FREQ_THRESHOLD`].
    pub fallback_price_freq_threshold: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fallback_price_freq_threshold: DEFAULT_PRICE_FREQ_THRESHOLD,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// Recognized variables: `LOTSCOUT_TIMEOUT_SECS`,
    /// `LOTSCOUT_USER_AGENT`, `LOTSCOUT_PRICE_FREQ_THRESHOLD`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] when a set variable fails to
    /// parse.
    pub fn from_env() -> Result<Self, CoreError> {
        let mut config = AppConfig::default();

        if let Ok(raw) = std::env::var("LOTSCOUT_TIMEOUT_SECS") {
            config.request_timeout_secs =
                raw.parse().map_err(|_| CoreError::InvalidConfig {
                    var: "LOTSCOUT_TIMEOUT_SECS".into(),
                    reason: format!("not a valid integer: {raw:?}"),
                })?;
        }
        if let Ok(raw) = std::env::var("LOTSCOUT_USER_AGENT") {
            if !raw.trim().is_empty() {
                config.user_agent = raw;
            }
        }
        if let Ok(raw) = std::env::var("LOTSCOUT_PRICE_FREQ_THRESHOLD") {
            config.fallback_price_freq_threshold =
                raw.parse().map_err(|_| CoreError::InvalidConfig {
                    var: "LOTSCOUT_PRICE_FREQ_THRESHOLD".into(),
                    reason: format!("not a valid integer: {raw:?}"),
                })?;
        }

        Ok(config)
    }
}
