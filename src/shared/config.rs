//! Application configuration. API credentials, paths, analysis and output settings.

use crate::adapters::output::OutputFormat;
use crate::domain::DEFAULT_TIMEZONE;
use crate::usecases::analyzer_service::DEFAULT_WINDOW_DAYS;
use crate::usecases::history_service::DEFAULT_PAGE_SIZE;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub api_id: Option<i32>,
    pub api_hash: Option<String>,
    /// Phone number for login. Prompted for when unset. Read from TG_DIGEST_PHONE_NUMBER.
    #[serde(default)]
    pub phone_number: Option<String>,
    pub session_path: Option<String>,

    /// Optional delay in ms between history page requests (rate limiting). Read from EXPORT_DELAY_MS.
    #[serde(default)]
    pub export_delay_ms: Option<u64>,

    /// Messages per history request (default 100). Read from TG_DIGEST_PAGE_SIZE.
    #[serde(default)]
    pub page_size: Option<i32>,

    // ─────────────────────────────────────────────────────────────────────────
    // Analysis Configuration
    // ─────────────────────────────────────────────────────────────────────────
    /// Complete days to look back (default 7). Read from TG_DIGEST_WINDOW_DAYS.
    #[serde(default)]
    pub window_days: Option<u32>,

    /// Timezone label reported in results (default "Asia/Tashkent"). Read from TG_DIGEST_TIMEZONE.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Output format: json, markdown or csv (default json). Read from TG_DIGEST_OUTPUT_FORMAT.
    #[serde(default)]
    pub output_format: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TG_DIGEST"));
        if let Ok(path) = std::env::var("TG_DIGEST_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // EXPORT_DELAY_MS is read directly (no TG_DIGEST_ prefix) so .env can use EXPORT_DELAY_MS=500
        if let Ok(s) = std::env::var("EXPORT_DELAY_MS") {
            if let Ok(ms) = s.parse::<u64>() {
                cfg.export_delay_ms = Some(ms);
            }
        }
        Ok(cfg)
    }

    /// Returns the API id from config or TG_DIGEST_API_ID env. 0 when unset or invalid.
    pub fn api_id_or_default(&self) -> i32 {
        self.api_id
            .or_else(|| {
                std::env::var("TG_DIGEST_API_ID")
                    .ok()
                    .and_then(|s| s.parse().ok())
            })
            .unwrap_or(0)
    }

    /// Returns the API hash from config or TG_DIGEST_API_HASH env. Empty when unset.
    pub fn api_hash_or_default(&self) -> String {
        self.api_hash
            .clone()
            .or_else(|| std::env::var("TG_DIGEST_API_HASH").ok())
            .unwrap_or_default()
    }

    /// Returns session file path. Defaults to "./session.db".
    pub fn session_path_or_default(&self) -> String {
        self.session_path
            .clone()
            .unwrap_or_else(|| "./session.db".to_string())
    }

    /// Returns the page delay in milliseconds. Defaults to 0 (no delay).
    pub fn export_delay_ms_or_default(&self) -> u64 {
        self.export_delay_ms.unwrap_or(0)
    }

    /// Returns messages per history page. Defaults to 100; non-positive values fall back to the default.
    pub fn page_size_or_default(&self) -> i32 {
        self.page_size
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Returns the analysis window in days. Defaults to 7.
    pub fn window_days_or_default(&self) -> u32 {
        self.window_days.unwrap_or(DEFAULT_WINDOW_DAYS)
    }

    /// Returns the reported timezone label. Defaults to "Asia/Tashkent".
    pub fn timezone_or_default(&self) -> String {
        self.timezone
            .clone()
            .filter(|tz| !tz.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TIMEZONE.to_string())
    }

    /// Returns the output format. Unknown values fall back to JSON.
    pub fn output_format_or_default(&self) -> OutputFormat {
        self.output_format
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }
}
