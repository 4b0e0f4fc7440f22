//! Chromium-backed [`BrowserSession`].
//!
//! Built only with the `browser` feature. Without it, launching reports
//! [`ScraperError::BrowserUnavailable`] and the router falls back to the
//! static fetcher.

#[cfg(feature = "browser")]
pub use enabled::ChromiumSession;

#[cfg(not(feature = "browser"))]
pub use disabled::ChromiumSession;

#[cfg(feature = "browser")]
mod enabled {
    use std::time::Duration;

    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
    use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
    use chromiumoxide::Page;
    use futures::StreamExt;
    use tokio::task::JoinHandle;

    use crate::error::ScraperError;
    use crate::fetch::rendered::{BrowserSession, LaunchOptions};

    const HIDE_WEBDRIVER_SCRIPT: &str =
        "Object.defineProperty(navigator, 'webdriver', {get: () => undefined});";

    const POLL_INTERVAL: Duration = Duration::from_millis(250);

    /// Headless Chromium with automation markers suppressed.
    pub struct ChromiumSession {
        browser: Browser,
        page: Page,
        handler: JoinHandle<()>,
        url: String,
    }

    impl ChromiumSession {
        fn failed(&self, e: impl std::fmt::Display) -> ScraperError {
            ScraperError::Browser {
                url: self.url.clone(),
                reason: e.to_string(),
            }
        }
    }

    fn unavailable(e: impl std::fmt::Display) -> ScraperError {
        ScraperError::BrowserUnavailable {
            reason: e.to_string(),
        }
    }

    #[async_trait]
    impl BrowserSession for ChromiumSession {
        async fn launch(options: &LaunchOptions) -> Result<Self, ScraperError> {
            // The default argument set includes `--enable-automation`.
            let config = BrowserConfig::builder()
                .disable_default_args()
                .window_size(1920, 1080)
                .args([
                    "--no-sandbox",
                    "--disable-dev-shm-usage",
                    "--disable-gpu",
                    "--disable-blink-features=AutomationControlled",
                    "--lang=th-TH",
                ])
                .arg(format!("--user-agent={}", options.user_agent))
                .build()
                .map_err(unavailable)?;

            let (browser, mut handler) = Browser::launch(config).await.map_err(unavailable)?;
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser.new_page("about:blank").await.map_err(unavailable)?;
            page.set_user_agent(
                SetUserAgentOverrideParams::builder()
                    .user_agent(options.user_agent.clone())
                    .accept_language(options.accept_language.clone())
                    .build()
                    .map_err(unavailable)?,
            )
            .await
            .map_err(unavailable)?;
            page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
                HIDE_WEBDRIVER_SCRIPT,
            ))
            .await
            .map_err(unavailable)?;

            Ok(Self {
                browser,
                page,
                handler,
                url: String::new(),
            })
        }

        async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
            self.url = url.to_owned();
            self.page.goto(url).await.map_err(|e| self.failed(e))?;
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, timeout: Duration) -> bool {
            let page = &self.page;
            let poll = async {
                loop {
                    if page.find_element(selector).await.is_ok() {
                        return;
                    }
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            };
            tokio::time::timeout(timeout, poll).await.is_ok()
        }

        async fn scroll_height(&mut self) -> Result<i64, ScraperError> {
            self.page
                .evaluate("document.body.scrollHeight")
                .await
                .map_err(|e| self.failed(e))?
                .into_value::<i64>()
                .map_err(|e| self.failed(e))
        }

        async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
            self.page
                .evaluate("window.scrollTo(0, document.body.scrollHeight)")
                .await
                .map_err(|e| self.failed(e))?;
            Ok(())
        }

        async fn content(&mut self) -> Result<String, ScraperError> {
            self.page.content().await.map_err(|e| self.failed(e))
        }

        async fn close(mut self) {
            if let Err(e) = self.browser.close().await {
                tracing::debug!(error = %e, "browser close failed");
            }
            if let Err(e) = self.browser.wait().await {
                tracing::debug!(error = %e, "browser exit wait failed");
            }
            self.handler.abort();
        }
    }
}

#[cfg(not(feature = "browser"))]
mod disabled {
    use std::convert::Infallible;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::ScraperError;
    use crate::fetch::rendered::{BrowserSession, LaunchOptions};

    /// Placeholder for builds without the `browser` feature; never constructed.
    pub struct ChromiumSession {
        never: Infallible,
    }

    #[async_trait]
    impl BrowserSession for ChromiumSession {
        async fn launch(_options: &LaunchOptions) -> Result<Self, ScraperError> {
            Err(ScraperError::BrowserUnavailable {
                reason: "built without the `browser` feature".to_owned(),
            })
        }

        async fn navigate(&mut self, _url: &str) -> Result<(), ScraperError> {
            match self.never {}
        }

        async fn wait_for(&mut self, _selector: &str, _timeout: Duration) -> bool {
            match self.never {}
        }

        async fn scroll_height(&mut self) -> Result<i64, ScraperError> {
            match self.never {}
        }

        async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
            match self.never {}
        }

        async fn content(&mut self) -> Result<String, ScraperError> {
            match self.never {}
        }

        async fn close(self) {
            match self.never {}
        }
    }

}
