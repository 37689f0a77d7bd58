//! Network fetch and outcome classification for listing pages.
//!
//! The gateway never propagates an error past its boundary: every fetch
//! resolves to a [`FetchOutcome`] which the pipeline folds into
//! diagnostics. Classification order is fixed: transport failure, then
//! non-2xx status, then bot-block signature scan, then success.

use std::time::Duration;

use lotscout_core::types::ErrorType;

/// Outcome of one listing-page fetch.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Success {
        body: String,
        status: u16,
        final_url: String,
        content_type: Option<String>,
        content_length: u64,
    },
    /// Transport succeeded (2xx) but the body is a bot challenge, not
    /// listing content. The real status is preserved.
    Blocked {
        reason: String,
        status: u16,
        final_url: String,
    },
    HttpError {
        status: u16,
        final_url: String,
    },
    /// Network-level failure; no HTTP status was received.
    Failed {
        error_type: ErrorType,
        message: String,
    },
}

/// HTTP client for listing pages: browser-like headers, hard timeout,
/// redirect follow with final-URL capture.
pub struct FetchGateway {
    client: reqwest::Client,
    user_agent: String,
}

impl FetchGateway {
    /// Creates a gateway with the given timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the underlying client cannot be
    /// constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }

    /// Fetches a listing page and classifies the outcome. Infallible by
    /// contract; all failures map to [`FetchOutcome`] variants.
    pub async fn fetch(&self, url: &str) -> FetchOutcome {
        let request = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(reqwest::header::REFERER, "https://www.google.com/")
            .header(reqwest::header::CACHE_CONTROL, "no-cache");

        let response = match request.send().await {
            Ok(resp) => resp,
            Err(err) => {
                let error_type = if err.is_timeout() {
                    ErrorType::Timeout
                } else {
                    ErrorType::Unknown
                };
                tracing::debug!(url, error = %err, "listing fetch failed at transport");
                return FetchOutcome::Failed {
                    error_type,
                    message: err.to_string(),
                };
            }
        };

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        if !response.status().is_success() {
            tracing::debug!(url, status, "listing fetch returned non-2xx");
            return FetchOutcome::HttpError { status, final_url };
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                return FetchOutcome::Failed {
                    error_type: ErrorType::Unknown,
                    message: format!("failed reading response body: {err}"),
                };
            }
        };

        if let Some(reason) = detect_bot_block(&body) {
            tracing::warn!(url, status, reason, "listing page is a bot challenge");
            return FetchOutcome::Blocked {
                reason: reason.to_string(),
                status,
                final_url,
            };
        }

        let content_length = body.len() as u64;
        FetchOutcome::Success {
            body,
            status,
            final_url,
            content_type,
            content_length,
        }
    }
}

/// Scans a 2xx body for known bot-challenge and edge-protection markers.
/// Returns the matched marker description, or `None` for real content.
#[must_use]
pub fn detect_bot_block(body: &str) -> Option<&'static str> {
    let lowered = body.to_ascii_lowercase();

    if lowered.contains("attention required! | cloudflare")
        || lowered.contains("/cdn-cgi/challenge-platform/")
        || lowered.contains("cf-chl-")
    {
        return Some("cloudflare challenge");
    }
    // "Just a moment..." alone appears in legitimate loading screens; only
    // treat it as a block together with a cookie gate.
    if lowered.contains("just a moment...") && lowered.contains("please enable cookies") {
        return Some("cloudflare challenge");
    }
    if lowered.contains("px-captcha") || lowered.contains("perimeterx") {
        return Some("perimeterx challenge");
    }
    if lowered.contains("datadome") && lowered.contains("captcha") {
        return Some("datadome challenge");
    }
    if lowered.contains("request unsuccessful. incapsula") {
        return Some("imperva/incapsula challenge");
    }
    if lowered.contains("verify you are a human")
        || lowered.contains("are you a robot")
        || lowered.contains("pardon our interruption")
    {
        return Some("human verification page");
    }
    if lowered.contains("g-recaptcha") && lowered.contains("unusual traffic") {
        return Some("recaptcha interstitial");
    }
    None
}

#[cfg(test)]
#[path = "fetch_test.rs"]
mod tests;
