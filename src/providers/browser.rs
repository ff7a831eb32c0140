//! Headless browser rendering
//!
//! Every render launches its own Chromium with a throwaway profile
//! directory, so sessions share no cookies or cache. Each session runs on
//! its own task and is closed before that task ends, whatever the outcome.
//! A caller that stops waiting (the fetch deadline) does not cut the
//! session short; it still runs to its own timeouts and is closed.

use crate::config::ScraperConfig;
use crate::ProviderError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use rand::seq::IndexedRandom;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout, Instant};
use url::Url;

/// Desktop client identities rotated per session
pub const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_4_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4.1 Safari/605.1.15",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36 Edg/124.0.2478.80",
];

const MARKER_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Picks a client identity for one browser session
pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// What to load and when to consider it ready
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub url: Url,
    /// CSS selector whose presence means results have rendered
    pub marker: &'static str,
    pub user_agent: &'static str,
}

/// Loads a page in an isolated browser session and returns its HTML
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Returns `Ok(None)` when navigation fails or times out, or when the
    /// marker does not appear within the bounded wait. `Err` is reserved for
    /// failures to start a session at all.
    async fn render(&self, request: RenderRequest) -> Result<Option<String>, ProviderError>;
}

/// One isolated browser session
#[async_trait]
pub trait RenderSession: Send {
    async fn load(&mut self, request: &RenderRequest) -> Result<Option<String>, ProviderError>;

    /// Releases the session; called exactly once, after `load` whatever it returned
    async fn close(&mut self);
}

/// Starts fresh [`RenderSession`]s
#[async_trait]
pub trait SessionLauncher: Send + Sync + 'static {
    type Session: RenderSession + 'static;

    async fn launch(&self) -> Result<Self::Session, ProviderError>;
}

/// [`PageRenderer`] running launch, load and close on a task of its own
pub struct SessionRenderer<L> {
    launcher: Arc<L>,
}

/// [`PageRenderer`] driving a local Chromium over the DevTools protocol
pub type ChromeRenderer = SessionRenderer<ChromeLauncher>;

impl ChromeRenderer {
    pub fn new(config: ScraperConfig) -> Self {
        Self::with_launcher(ChromeLauncher { config })
    }
}

impl<L: SessionLauncher> SessionRenderer<L> {
    pub fn with_launcher(launcher: L) -> Self {
        Self {
            launcher: Arc::new(launcher),
        }
    }
}

#[async_trait]
impl<L: SessionLauncher> PageRenderer for SessionRenderer<L> {
    async fn render(&self, request: RenderRequest) -> Result<Option<String>, ProviderError> {
        let launcher = Arc::clone(&self.launcher);

        // Dropping the JoinHandle detaches the task, so close still runs
        let task = tokio::spawn(async move {
            let mut session = launcher.launch().await?;
            let outcome = session.load(&request).await;
            session.close().await;
            outcome
        });

        task.await
            .map_err(|e| ProviderError::Browser(format!("render task: {}", e)))?
    }
}

/// Launches headless Chromium sessions from the scraper settings
pub struct ChromeLauncher {
    config: ScraperConfig,
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self) -> Result<ChromeSession, ProviderError> {
        ChromeSession::launch(&self.config).await
    }
}

/// One launched browser plus the resources that must be released with it
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
    marker_timeout: Duration,
    _profile: TempDir,
}

impl ChromeSession {
    async fn launch(config: &ScraperConfig) -> Result<Self, ProviderError> {
        let profile = tempfile::Builder::new()
            .prefix("roadmap-scout-")
            .tempdir()
            .map_err(|e| ProviderError::Browser(format!("profile directory: {}", e)))?;

        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-setuid-sandbox")
            .user_data_dir(profile.path())
            .request_timeout(config.navigation_timeout());
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.chrome_executable {
            builder = builder.chrome_executable(executable);
        }
        let browser_config = builder.build().map_err(ProviderError::Browser)?;

        let (browser, mut events) = Browser::launch(browser_config)
            .await
            .map_err(|e| ProviderError::Browser(format!("launch: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            handler,
            navigation_timeout: config.navigation_timeout(),
            marker_timeout: config.marker_timeout(),
            _profile: profile,
        })
    }
}

#[async_trait]
impl RenderSession for ChromeSession {
    async fn load(&mut self, request: &RenderRequest) -> Result<Option<String>, ProviderError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProviderError::Browser(format!("new page: {}", e)))?;

        page.set_user_agent(request.user_agent)
            .await
            .map_err(|e| ProviderError::Browser(format!("user agent: {}", e)))?;

        match timeout(self.navigation_timeout, page.goto(request.url.as_str())).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::warn!(url = %request.url, error = %e, "Navigation failed");
                return Ok(None);
            }
            Err(_) => {
                tracing::warn!(url = %request.url, "Navigation timed out");
                return Ok(None);
            }
        }

        let page = &page;
        let marker = request.marker;
        let found = wait_for_marker(
            move || async move { page.find_element(marker).await.is_ok() },
            self.marker_timeout,
        )
        .await;
        if !found {
            tracing::debug!(url = %request.url, marker, "Results marker not found");
            return Ok(None);
        }

        let html = page
            .content()
            .await
            .map_err(|e| ProviderError::Browser(format!("page content: {}", e)))?;

        Ok(Some(html))
    }

    async fn close(&mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "Browser close failed");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "Browser process wait failed");
        }
        self.handler.abort();
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Polls `present` until it reports true or `limit` elapses
async fn wait_for_marker<F, Fut>(mut present: F, limit: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + limit;
    loop {
        if present().await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(MARKER_POLL_INTERVAL).await;
    }
}
