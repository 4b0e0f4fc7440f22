use std::time::Duration;

use shopfeed_core::AppConfig;

use crate::api::{DEFAULT_API_TIMEOUT_SECS, DEFAULT_RESULT_LIMIT, LAZADA_PAGE_DELAY, SHOPEE_PAGE_DELAY};
use crate::fetch::RenderSettings;
use crate::pacing::Pacing;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(1500);
pub const DEFAULT_PAGE_DELAY_JITTER: Duration = Duration::from_millis(500);

/// Engine settings: timeouts, render waits and pacing per strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Timeout for static HTML fetches.
    pub request_timeout_secs: u64,
    /// Timeout for API and embedded-JSON fetches.
    pub api_timeout_secs: u64,
    pub render: RenderSettings,
    /// Delay between HTML pages.
    pub page_pacing: Pacing,
    pub shopee_pacing: Pacing,
    pub lazada_pacing: Pacing,
    /// Upper bound on records returned by an API attempt.
    pub api_result_limit: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
            render: RenderSettings::default(),
            page_pacing: Pacing::new(DEFAULT_PAGE_DELAY, DEFAULT_PAGE_DELAY_JITTER),
            shopee_pacing: Pacing::fixed(SHOPEE_PAGE_DELAY),
            lazada_pacing: Pacing::fixed(LAZADA_PAGE_DELAY),
            api_result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

impl ScraperConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            request_timeout_secs: config.request_timeout_secs,
            api_timeout_secs: config.api_timeout_secs,
            render: RenderSettings {
                wait_timeout: Duration::from_secs(config.render_wait_secs),
                settle: Duration::from_millis(config.render_settle_ms),
                ..RenderSettings::default()
            },
            page_pacing: Pacing::new(
                Duration::from_millis(config.page_delay_ms),
                Duration::from_millis(config.page_delay_jitter_ms),
            ),
            api_result_limit: config.api_result_limit,
            ..Self::default()
        }
    }

    /// Same settings with every delay removed.
    #[must_use]
    pub fn without_delays(self) -> Self {
        Self {
            render: RenderSettings {
                settle: Duration::ZERO,
                ..self.render
            },
            page_pacing: Pacing::NONE,
            shopee_pacing: Pacing::NONE,
            lazada_pacing: Pacing::NONE,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use shopfeed_core::Environment;

    use super::*;

    fn app_config() -> AppConfig {
        AppConfig {
            env: Environment::Test,
            log_level: "debug".to_owned(),
            api_base_url: "http://localhost:3000".to_owned(),
            request_timeout_secs: 20,
            api_timeout_secs: 9,
            render_wait_secs: 4,
            render_settle_ms: 750,
            page_delay_ms: 300,
            page_delay_jitter_ms: 0,
            api_result_limit: 120,
            import_batch_size: 50,
            import_timeout_secs: 60,
        }
    }

    #[test]
    fn maps_app_config() {
        let config = ScraperConfig::from_app_config(&app_config());
        assert_eq!(config.request_timeout_secs, 20);
        assert_eq!(config.api_timeout_secs, 9);
        assert_eq!(config.render.wait_timeout, Duration::from_secs(4));
        assert_eq!(config.render.settle, Duration::from_millis(750));
        assert_eq!(config.render.max_scrolls, 5);
        assert_eq!(config.page_pacing, Pacing::fixed(Duration::from_millis(300)));
        assert_eq!(config.api_result_limit, 120);
        assert_eq!(config.shopee_pacing, Pacing::fixed(SHOPEE_PAGE_DELAY));
    }

    #[test]
    fn defaults() {
        let config = ScraperConfig::default();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.api_timeout_secs, 15);
        assert_eq!(config.api_result_limit, 60);
        assert_eq!(config.lazada_pacing.base(), Duration::from_millis(1500));
    }

    #[test]
    fn without_delays_keeps_timeouts() {
        let config = ScraperConfig::default().without_delays();
        assert_eq!(config.page_pacing, Pacing::NONE);
        assert_eq!(config.render.settle, Duration::ZERO);
        assert_eq!(config.request_timeout_secs, 30);
    }
}
