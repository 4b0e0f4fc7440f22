//! Rendered-browser fetching: navigate, wait for content, scroll, settle.
//!
//! The wait/scroll sequence is written against [`BrowserSession`] so the same
//! logic drives a real Chromium session or a scripted stand-in.

use std::time::Duration;

use async_trait::async_trait;

use super::{FetchResult, PageFetcher};
use crate::error::ScraperError;
use crate::template::Template;

/// Wait selectors beyond this many are ignored.
const MAX_WAIT_SELECTORS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Upper bound on waiting for each "wait for" selector.
    pub wait_timeout: Duration,
    /// Delay after loading and scrolling, before the markup is read.
    pub settle: Duration,
    pub max_scrolls: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_secs(10),
            settle: Duration::from_secs(2),
            max_scrolls: 5,
        }
    }
}

/// What a browser session is launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchOptions {
    pub user_agent: String,
    pub accept_language: String,
}

/// One live browser tab.
#[async_trait]
pub trait BrowserSession: Send + Sized {
    /// Starts a browser and opens a tab.
    ///
    /// # Errors
    ///
    /// [`ScraperError::BrowserUnavailable`] when no browser can be started.
    async fn launch(options: &LaunchOptions) -> Result<Self, ScraperError>;

    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError>;

    /// Waits until `selector` matches, returning `false` on timeout or error.
    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> bool;

    /// Current `document.body.scrollHeight`.
    async fn scroll_height(&mut self) -> Result<i64, ScraperError>;

    async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError>;

    /// The current serialized DOM.
    async fn content(&mut self) -> Result<String, ScraperError>;

    /// Shuts the browser down.
    async fn close(self);
}

/// Fetches pages through a browser session acquired on first use.
pub struct RenderedFetcher<S: BrowserSession> {
    session: Option<S>,
    options: LaunchOptions,
    settings: RenderSettings,
    wait_for: Vec<&'static str>,
    infinite_scroll: bool,
    scroll_pause: Duration,
}

impl<S: BrowserSession> RenderedFetcher<S> {
    #[must_use]
    pub fn new(template: &Template, settings: RenderSettings) -> Self {
        Self {
            session: None,
            options: LaunchOptions {
                user_agent: template.user_agent().to_owned(),
                accept_language: template.accept_language().to_owned(),
            },
            settings,
            wait_for: template
                .wait_for
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .take(MAX_WAIT_SELECTORS)
                .collect(),
            infinite_scroll: template.infinite_scroll,
            scroll_pause: template.scroll_pause,
        }
    }

    async fn session(&mut self) -> Result<&mut S, ScraperError> {
        if self.session.is_none() {
            let session = S::launch(&self.options).await?;
            tracing::info!("browser session started");
            self.session = Some(session);
        }
        self.session
            .as_mut()
            .ok_or_else(|| ScraperError::BrowserUnavailable {
                reason: "session was not retained after launch".to_owned(),
            })
    }
}

#[async_trait]
impl<S: BrowserSession> PageFetcher for RenderedFetcher<S> {
    async fn fetch(&mut self, url: &str) -> Result<FetchResult, ScraperError> {
        let wait_timeout = self.settings.wait_timeout;
        let settle = self.settings.settle;
        let max_scrolls = self.settings.max_scrolls;
        let infinite_scroll = self.infinite_scroll;
        let scroll_pause = self.scroll_pause;
        let wait_for = self.wait_for.clone();

        let session = self.session().await?;
        tracing::info!(url, "loading page in browser");
        session.navigate(url).await?;

        for selector in wait_for {
            if session.wait_for(selector, wait_timeout).await {
                tracing::info!(selector, "content appeared");
                break;
            }
            tracing::debug!(selector, "wait selector did not appear");
        }

        if infinite_scroll {
            let mut last_height = session.scroll_height().await?;
            for scrolls in 1..=max_scrolls {
                session.scroll_to_bottom().await?;
                tokio::time::sleep(scroll_pause).await;
                let height = session.scroll_height().await?;
                if height == last_height {
                    break;
                }
                last_height = height;
                tracing::info!(scrolls, height, "scrolled for more results");
            }
        }

        tokio::time::sleep(settle).await;
        let body = session.content().await?;
        Ok(FetchResult {
            url: url.to_owned(),
            body,
        })
    }

    async fn release(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
            tracing::info!("browser session closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::registry;

    #[derive(Default)]
    struct Script {
        launch_fails: bool,
        appearing: Vec<&'static str>,
        heights: VecDeque<i64>,
        calls: Vec<String>,
        launches: u32,
        closes: u32,
    }

    type Shared = Arc<Mutex<Script>>;

    thread_local! {
        static SCRIPT: std::cell::RefCell<Option<Shared>> = const { std::cell::RefCell::new(None) };
    }

    struct FakeSession {
        script: Shared,
    }

    impl FakeSession {
        fn record(&self, call: String) {
            self.script.lock().unwrap().calls.push(call);
        }
    }

    #[async_trait]
    impl BrowserSession for FakeSession {
        async fn launch(_options: &LaunchOptions) -> Result<Self, ScraperError> {
            let script = SCRIPT
                .with(|s| s.borrow().clone())
                .expect("script installed");
            let mut guard = script.lock().unwrap();
            guard.launches += 1;
            if guard.launch_fails {
                return Err(ScraperError::BrowserUnavailable {
                    reason: "no chrome".to_owned(),
                });
            }
            drop(guard);
            Ok(Self { script })
        }

        async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
            self.record(format!("navigate {url}"));
            Ok(())
        }

        async fn wait_for(&mut self, selector: &str, _timeout: Duration) -> bool {
            self.record(format!("wait {selector}"));
            self.script
                .lock()
                .unwrap()
                .appearing
                .iter()
                .any(|s| *s == selector)
        }

        async fn scroll_height(&mut self) -> Result<i64, ScraperError> {
            let mut guard = self.script.lock().unwrap();
            let height = guard.heights.pop_front().unwrap_or(1000);
            guard.calls.push(format!("height {height}"));
            Ok(height)
        }

        async fn scroll_to_bottom(&mut self) -> Result<(), ScraperError> {
            self.record("scroll".to_owned());
            Ok(())
        }

        async fn content(&mut self) -> Result<String, ScraperError> {
            self.record("content".to_owned());
            Ok("<html><body>rendered</body></html>".to_owned())
        }

        async fn close(self) {
            self.script.lock().unwrap().closes += 1;
        }
    }

    fn install(script: Script) -> Shared {
        let shared = Arc::new(Mutex::new(script));
        SCRIPT.with(|s| *s.borrow_mut() = Some(Arc::clone(&shared)));
        shared
    }

    fn instant() -> RenderSettings {
        RenderSettings {
            wait_timeout: Duration::from_millis(10),
            settle: Duration::ZERO,
            max_scrolls: 5,
        }
    }

    fn fetcher(template: &Template) -> RenderedFetcher<FakeSession> {
        let template = Template {
            scroll_pause: Duration::ZERO,
            ..template.clone()
        };
        RenderedFetcher::new(&template, instant())
    }

    fn count(calls: &[String], prefix: &str) -> usize {
        calls.iter().filter(|c| c.starts_with(prefix)).count()
    }

    #[tokio::test(flavor = "current_thread")]
    async fn stops_waiting_at_first_selector_that_appears() {
        let script = install(Script {
            appearing: vec![".col-xs-2-4"],
            ..Script::default()
        });
        let template = Template {
            infinite_scroll: false,
            ..registry::resolve("shopee")
        };
        let mut f = fetcher(&template);

        let page = f.fetch("https://shopee.co.th/search?keyword=pen").await.unwrap();
        assert!(page.body.contains("rendered"));

        let calls = script.lock().unwrap().calls.clone();
        assert_eq!(
            calls,
            [
                "navigate https://shopee.co.th/search?keyword=pen",
                "wait [data-sqe='item']",
                "wait .col-xs-2-4",
                "content",
            ]
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn waits_on_at_most_three_selectors() {
        let script = install(Script::default());
        let template = Template {
            wait_for: &[".a", ".b", ".c", ".d"],
            infinite_scroll: false,
            ..registry::resolve("jib")
        };
        let mut f = fetcher(&template);
        f.fetch("https://www.jib.co.th/web/product").await.unwrap();

        let calls = script.lock().unwrap().calls.clone();
        assert_eq!(count(&calls, "wait"), 3);
        assert!(!calls.iter().any(|c| c == "wait .d"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn scrolling_stops_when_height_is_unchanged() {
        let script = install(Script {
            heights: VecDeque::from([1000, 2000, 3000, 3000]),
            ..Script::default()
        });
        let mut f = fetcher(&registry::resolve("bigc"));
        f.fetch("https://www.bigc.co.th/category/stationery").await.unwrap();

        let calls = script.lock().unwrap().calls.clone();
        assert_eq!(count(&calls, "scroll"), 3);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn scrolling_is_bounded() {
        let script = install(Script {
            heights: (1..=20).map(|n| n * 1000).collect(),
            ..Script::default()
        });
        let mut f = fetcher(&registry::resolve("bigc"));
        f.fetch("https://www.bigc.co.th/category/stationery").await.unwrap();

        let calls = script.lock().unwrap().calls.clone();
        assert_eq!(count(&calls, "scroll"), 5);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn no_scrolling_without_infinite_scroll() {
        let script = install(Script::default());
        let mut f = fetcher(&registry::resolve("banana"));
        f.fetch("https://www.bnn.in.th/th/p/notebook").await.unwrap();

        let calls = script.lock().unwrap().calls.clone();
        assert_eq!(count(&calls, "scroll"), 0);
        assert_eq!(count(&calls, "height"), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn session_is_reused_and_released_once() {
        let script = install(Script::default());
        let mut f = fetcher(&registry::resolve("banana"));
        f.fetch("https://www.bnn.in.th/page/1").await.unwrap();
        f.fetch("https://www.bnn.in.th/page/2").await.unwrap();
        f.release().await;
        f.release().await;

        let guard = script.lock().unwrap();
        assert_eq!(guard.launches, 1);
        assert_eq!(guard.closes, 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn launch_failure_reports_browser_unavailable() {
        install(Script {
            launch_fails: true,
            ..Script::default()
        });
        let mut f = fetcher(&registry::resolve("lotuss"));
        let err = f.fetch("https://www.lotuss.com/th").await.unwrap_err();
        assert!(matches!(err, ScraperError::BrowserUnavailable { .. }));
    }
}
