//! Browser control for headless replay.
//!
//! Real browser control via the Chrome `DevTools` Protocol. When compiled
//! with the `browser` feature, chromiumoxide provides full CDP support.
//! Without the feature, a stub implementation keeps the crate compiling so
//! the runner can be exercised against [`crate::mock::MockPage`].

use crate::result::{RepasarError, RepasarResult};

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Run in headless mode
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<String>,
    /// User agent string
    pub user_agent: Option<String>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            chromium_path: None,
            user_agent: None,
            sandbox: true,
        }
    }
}

impl BrowserConfig {
    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<String>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Set user agent
    #[must_use]
    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

// ============================================================================
// Real CDP Implementation (when `browser` feature is enabled)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{BrowserConfig, RepasarError, RepasarResult};
    use crate::driver::PageDriver;
    use crate::locator::Locator;
    use crate::wait::{LoadState, WaitOptions, NETWORK_IDLE_THRESHOLD_MS};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::cdp::browser_protocol::page::{
        CaptureScreenshotFormat, CaptureScreenshotParams,
    };
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use std::path::Path;
    use std::sync::Arc;
    use std::time::{Duration, Instant};
    use tokio::sync::Mutex;

    /// Browser instance with a real CDP connection
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
        inner: Arc<Mutex<CdpBrowser>>,
        #[allow(dead_code)]
        handle: tokio::task::JoinHandle<()>,
    }

    impl Browser {
        /// Launch a new browser instance.
        ///
        /// # Errors
        ///
        /// Returns error if the browser cannot be launched
        pub async fn launch(config: BrowserConfig) -> RepasarResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(config.viewport_width, config.viewport_height);

            if !config.headless {
                builder = builder.with_head();
            }

            if !config.sandbox {
                builder = builder.no_sandbox();
            }

            if let Some(ref path) = config.chromium_path {
                builder = builder.chrome_executable(path);
            }

            let cdp_config = builder
                .build()
                .map_err(|e| RepasarError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(|e| {
                RepasarError::BrowserLaunch {
                    message: e.to_string(),
                }
            })?;

            // Drive CDP messages until the connection drops
            let handle = tokio::spawn(async move {
                while let Some(h) = handler.next().await {
                    if h.is_err() {
                        break;
                    }
                }
            });

            Ok(Self {
                config,
                inner: Arc::new(Mutex::new(browser)),
                handle,
            })
        }

        /// Create a new page.
        ///
        /// # Errors
        ///
        /// Returns error if the page cannot be created
        pub async fn new_page(&self) -> RepasarResult<Page> {
            let browser = self.inner.lock().await;
            let cdp_page =
                browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| RepasarError::Page {
                        message: e.to_string(),
                    })?;

            Ok(Page {
                url: String::from("about:blank"),
                inner: Some(cdp_page),
            })
        }

        /// The browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> RepasarResult<()> {
            let mut browser = self.inner.lock().await;
            browser
                .close()
                .await
                .map_err(|e| RepasarError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            Ok(())
        }
    }

    /// A browser page with a real CDP connection.
    ///
    /// The handle is taken by `close()`; every operation after that fails
    /// with a page error, which also makes double-close visible in tests.
    #[derive(Debug)]
    pub struct Page {
        url: String,
        inner: Option<CdpPage>,
    }

    impl Page {
        /// Current URL (last successful navigation)
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        fn page(&self) -> RepasarResult<&CdpPage> {
            self.inner.as_ref().ok_or_else(|| RepasarError::Page {
                message: "page already closed".to_string(),
            })
        }

        async fn eval_bool(&self, expr: String) -> bool {
            let Ok(page) = self.page() else {
                return false;
            };
            match page.evaluate(expr).await {
                Ok(result) => result.into_value().unwrap_or(false),
                Err(_) => false,
            }
        }

        async fn eval_unit(&self, expr: String, action: &str, locator: &Locator) -> RepasarResult<()> {
            let page = self.page()?;
            let result = page
                .evaluate(expr)
                .await
                .map_err(|e| RepasarError::Interaction {
                    action: action.to_string(),
                    selector: locator.to_string(),
                    message: e.to_string(),
                })?;
            let ok: bool = result.into_value().unwrap_or(false);
            if ok {
                Ok(())
            } else {
                Err(RepasarError::Interaction {
                    action: action.to_string(),
                    selector: locator.to_string(),
                    message: "no element matching selector at index".to_string(),
                })
            }
        }
    }

    #[async_trait]
    impl PageDriver for Page {
        async fn goto(
            &mut self,
            url: &str,
            wait_until: LoadState,
            timeout_ms: u64,
        ) -> RepasarResult<()> {
            let page = self.page()?;
            let load = async {
                page.goto(url).await?;
                page.wait_for_navigation().await?;
                Ok::<(), chromiumoxide::error::CdpError>(())
            };

            match tokio::time::timeout(Duration::from_millis(timeout_ms), load).await {
                Ok(Ok(())) => {
                    if wait_until == LoadState::NetworkIdle {
                        tokio::time::sleep(Duration::from_millis(NETWORK_IDLE_THRESHOLD_MS)).await;
                    }
                    self.url = url.to_string();
                    Ok(())
                }
                Ok(Err(e)) => Err(RepasarError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
                Err(_) => Err(RepasarError::Navigation {
                    url: url.to_string(),
                    message: format!("{} not reached after {timeout_ms}ms", wait_until),
                }),
            }
        }

        async fn wait_for_visible(
            &mut self,
            locator: &Locator,
            timeout_ms: u64,
        ) -> RepasarResult<()> {
            let options = WaitOptions::new().with_timeout(timeout_ms);
            let deadline = Instant::now() + options.timeout();
            loop {
                if self.eval_bool(locator.to_visible_query()).await {
                    return Ok(());
                }
                if Instant::now() >= deadline {
                    return Err(RepasarError::ElementTimeout {
                        selector: locator.to_string(),
                        ms: timeout_ms,
                    });
                }
                tokio::time::sleep(options.poll_interval()).await;
            }
        }

        async fn click(&mut self, locator: &Locator) -> RepasarResult<()> {
            let page = self.page()?;
            let elements = page
                .find_elements(locator.selector())
                .await
                .map_err(|e| RepasarError::Interaction {
                    action: "Click".to_string(),
                    selector: locator.to_string(),
                    message: e.to_string(),
                })?;

            let element = elements
                .into_iter()
                .nth(locator.effective_index())
                .ok_or_else(|| RepasarError::Interaction {
                    action: "Click".to_string(),
                    selector: locator.to_string(),
                    message: "no element matching selector at index".to_string(),
                })?;

            element.click().await.map_err(|e| RepasarError::Interaction {
                action: "Click".to_string(),
                selector: locator.to_string(),
                message: e.to_string(),
            })?;
            Ok(())
        }

        async fn fill(&mut self, locator: &Locator, value: &str) -> RepasarResult<()> {
            // Set the value directly and fire the framework-visible events;
            // an empty value clears the field through the same path.
            let expr = format!(
                "(() => {{ const el = {}; if (!el) return false; \
                 el.focus(); el.value = {:?}; \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true; }})()",
                locator.to_query(),
                value
            );
            self.eval_unit(expr, "Fill", locator).await
        }

        async fn select(&mut self, locator: &Locator, value: &str) -> RepasarResult<()> {
            let expr = format!(
                "(() => {{ const el = {}; if (!el) return false; \
                 el.value = {:?}; \
                 if (el.value !== {:?}) return false; \
                 el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                 return true; }})()",
                locator.to_query(),
                value,
                value
            );
            self.eval_unit(expr, "Select", locator).await
        }

        async fn hover(&mut self, locator: &Locator) -> RepasarResult<()> {
            let expr = format!(
                "(() => {{ const el = {}; if (!el) return false; \
                 el.dispatchEvent(new MouseEvent('mouseover', {{ bubbles: true }})); \
                 el.dispatchEvent(new MouseEvent('mouseenter', {{ bubbles: true }})); \
                 return true; }})()",
                locator.to_query()
            );
            self.eval_unit(expr, "Hover", locator).await
        }

        async fn press(&mut self, key: &str) -> RepasarResult<()> {
            let page = self.page()?;
            let body = page
                .find_element("body")
                .await
                .map_err(|e| RepasarError::Interaction {
                    action: "Press".to_string(),
                    selector: "body".to_string(),
                    message: e.to_string(),
                })?;
            body.press_key(key)
                .await
                .map_err(|e| RepasarError::Interaction {
                    action: "Press".to_string(),
                    selector: "body".to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn scroll_by_viewport(&mut self) -> RepasarResult<()> {
            let page = self.page()?;
            page.evaluate("window.scrollBy(0, window.innerHeight)")
                .await
                .map_err(|e| RepasarError::Interaction {
                    action: "Scroll".to_string(),
                    selector: "window".to_string(),
                    message: e.to_string(),
                })?;
            Ok(())
        }

        async fn screenshot(&mut self, path: &Path) -> RepasarResult<()> {
            let page = self.page()?;
            let params = CaptureScreenshotParams::builder()
                .format(CaptureScreenshotFormat::Png)
                .build();

            let screenshot =
                page.execute(params)
                    .await
                    .map_err(|e| RepasarError::Screenshot {
                        message: e.to_string(),
                    })?;

            use base64::Engine;
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(&screenshot.data)
                .map_err(|e| RepasarError::Screenshot {
                    message: e.to_string(),
                })?;

            tokio::fs::write(path, bytes).await?;
            Ok(())
        }

        async fn sleep(&mut self, ms: u64) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }

        async fn close(&mut self) -> RepasarResult<()> {
            if let Some(page) = self.inner.take() {
                page.close().await.map_err(|e| RepasarError::Page {
                    message: e.to_string(),
                })?;
            }
            Ok(())
        }
    }
}

// ============================================================================
// Stub Implementation (when `browser` feature is NOT enabled)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod stub {
    use super::{BrowserConfig, RepasarError, RepasarResult};
    use crate::driver::PageDriver;
    use crate::locator::Locator;
    use crate::wait::LoadState;
    use async_trait::async_trait;
    use std::path::Path;

    /// Browser instance (stub when the `browser` feature is disabled)
    #[derive(Debug)]
    pub struct Browser {
        config: BrowserConfig,
    }

    impl Browser {
        /// Launch a new browser instance (stub).
        ///
        /// # Errors
        ///
        /// Never fails in stub mode
        pub async fn launch(config: BrowserConfig) -> RepasarResult<Self> {
            Ok(Self { config })
        }

        /// Create a new page.
        ///
        /// # Errors
        ///
        /// Never fails in stub mode
        pub async fn new_page(&self) -> RepasarResult<Page> {
            Ok(Page {
                url: String::from("about:blank"),
            })
        }

        /// The browser configuration
        #[must_use]
        pub const fn config(&self) -> &BrowserConfig {
            &self.config
        }

        /// Close the browser
        pub async fn close(self) -> RepasarResult<()> {
            Ok(())
        }
    }

    /// A browser page (stub when the `browser` feature is disabled).
    ///
    /// Interactions fail: there is no DOM to act on. Use
    /// [`crate::mock::MockPage`] for deterministic tests.
    #[derive(Debug)]
    pub struct Page {
        url: String,
    }

    impl Page {
        /// Current URL (last successful navigation)
        #[must_use]
        pub fn current_url(&self) -> &str {
            &self.url
        }

        fn unavailable(action: &str, locator: &Locator) -> RepasarError {
            RepasarError::Interaction {
                action: action.to_string(),
                selector: locator.to_string(),
                message: "browser feature not enabled".to_string(),
            }
        }
    }

    #[async_trait]
    impl PageDriver for Page {
        async fn goto(
            &mut self,
            url: &str,
            _wait_until: LoadState,
            _timeout_ms: u64,
        ) -> RepasarResult<()> {
            self.url = url.to_string();
            Ok(())
        }

        async fn wait_for_visible(
            &mut self,
            locator: &Locator,
            timeout_ms: u64,
        ) -> RepasarResult<()> {
            Err(RepasarError::ElementTimeout {
                selector: locator.to_string(),
                ms: timeout_ms,
            })
        }

        async fn click(&mut self, locator: &Locator) -> RepasarResult<()> {
            Err(Self::unavailable("Click", locator))
        }

        async fn fill(&mut self, locator: &Locator, _value: &str) -> RepasarResult<()> {
            Err(Self::unavailable("Fill", locator))
        }

        async fn select(&mut self, locator: &Locator, _value: &str) -> RepasarResult<()> {
            Err(Self::unavailable("Select", locator))
        }

        async fn hover(&mut self, locator: &Locator) -> RepasarResult<()> {
            Err(Self::unavailable("Hover", locator))
        }

        async fn press(&mut self, _key: &str) -> RepasarResult<()> {
            Ok(())
        }

        async fn scroll_by_viewport(&mut self) -> RepasarResult<()> {
            Ok(())
        }

        async fn screenshot(&mut self, _path: &Path) -> RepasarResult<()> {
            Ok(())
        }

        async fn sleep(&mut self, _ms: u64) {}

        async fn close(&mut self) -> RepasarResult<()> {
            Ok(())
        }
    }
}

// Re-export based on feature
#[cfg(feature = "browser")]
pub use cdp::{Browser, Page};

#[cfg(not(feature = "browser"))]
pub use stub::{Browser, Page};
