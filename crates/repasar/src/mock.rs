//! Deterministic mock page for runner tests.
//!
//! Replaying a step sequence against a live site is not reproducible, so the
//! runner's behavior is asserted against this scripted handle instead: which
//! selectors are visible, which operations fail, and every call the runner
//! makes, in order.

use crate::driver::PageDriver;
use crate::locator::Locator;
use crate::result::{RepasarError, RepasarResult};
use crate::wait::LoadState;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// A call observed by the mock, in dispatch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `goto(url)`
    Goto(String),
    /// `wait_for_visible(locator)`
    WaitForVisible(String),
    /// `click(locator)`
    Click(String),
    /// `fill(locator, value)`
    Fill(String, String),
    /// `select(locator, value)`
    Select(String, String),
    /// `hover(locator)`
    Hover(String),
    /// `press(key)`
    Press(String),
    /// `scroll_by_viewport()`
    Scroll,
    /// `screenshot(path)`
    Screenshot(PathBuf),
    /// `sleep(ms)`
    Sleep(u64),
    /// `close()`
    Close,
}

/// Scripted page handle. Sleeps are recorded, not performed, so tests are
/// instant and deterministic.
#[derive(Debug, Default)]
pub struct MockPage {
    visible: HashSet<String>,
    goto_fails: bool,
    click_fails: HashSet<String>,
    /// Every call the runner made, in order
    pub calls: Vec<MockCall>,
    /// Current field contents, keyed by selector
    pub fields: HashMap<String, String>,
    close_count: usize,
    url: String,
}

impl MockPage {
    /// Create a mock page with no visible elements.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a selector as visible so the wait gate passes for it.
    #[must_use]
    pub fn with_visible(mut self, selector: impl Into<String>) -> Self {
        self.visible.insert(selector.into());
        self
    }

    /// Make every `goto` call fail.
    #[must_use]
    pub fn with_goto_failure(mut self) -> Self {
        self.goto_fails = true;
        self
    }

    /// Make `click` fail for a specific selector.
    #[must_use]
    pub fn with_click_failure(mut self, selector: impl Into<String>) -> Self {
        self.click_fails.insert(selector.into());
        self
    }

    /// How many times `close` was called.
    #[must_use]
    pub const fn close_count(&self) -> usize {
        self.close_count
    }

    /// The URL of the last successful navigation.
    #[must_use]
    pub fn current_url(&self) -> &str {
        &self.url
    }

    /// Calls of a given discriminant, for order-insensitive assertions.
    #[must_use]
    pub fn count_calls(&self, matches: impl Fn(&MockCall) -> bool) -> usize {
        self.calls.iter().filter(|c| matches(c)).count()
    }
}

#[async_trait]
impl PageDriver for MockPage {
    async fn goto(
        &mut self,
        url: &str,
        _wait_until: LoadState,
        _timeout_ms: u64,
    ) -> RepasarResult<()> {
        self.calls.push(MockCall::Goto(url.to_string()));
        if self.goto_fails {
            return Err(RepasarError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_REFUSED".to_string(),
            });
        }
        self.url = url.to_string();
        Ok(())
    }

    async fn wait_for_visible(&mut self, locator: &Locator, timeout_ms: u64) -> RepasarResult<()> {
        self.calls.push(MockCall::WaitForVisible(locator.to_string()));
        if self.visible.contains(locator.selector()) {
            Ok(())
        } else {
            Err(RepasarError::ElementTimeout {
                selector: locator.to_string(),
                ms: timeout_ms,
            })
        }
    }

    async fn click(&mut self, locator: &Locator) -> RepasarResult<()> {
        self.calls.push(MockCall::Click(locator.to_string()));
        if self.click_fails.contains(locator.selector()) {
            return Err(RepasarError::Interaction {
                action: "Click".to_string(),
                selector: locator.to_string(),
                message: "node detached".to_string(),
            });
        }
        Ok(())
    }

    async fn fill(&mut self, locator: &Locator, value: &str) -> RepasarResult<()> {
        self.calls
            .push(MockCall::Fill(locator.to_string(), value.to_string()));
        self.fields
            .insert(locator.selector().to_string(), value.to_string());
        Ok(())
    }

    async fn select(&mut self, locator: &Locator, value: &str) -> RepasarResult<()> {
        self.calls
            .push(MockCall::Select(locator.to_string(), value.to_string()));
        self.fields
            .insert(locator.selector().to_string(), value.to_string());
        Ok(())
    }

    async fn hover(&mut self, locator: &Locator) -> RepasarResult<()> {
        self.calls.push(MockCall::Hover(locator.to_string()));
        Ok(())
    }

    async fn press(&mut self, key: &str) -> RepasarResult<()> {
        self.calls.push(MockCall::Press(key.to_string()));
        Ok(())
    }

    async fn scroll_by_viewport(&mut self) -> RepasarResult<()> {
        self.calls.push(MockCall::Scroll);
        Ok(())
    }

    async fn screenshot(&mut self, path: &Path) -> RepasarResult<()> {
        self.calls.push(MockCall::Screenshot(path.to_path_buf()));
        Ok(())
    }

    async fn sleep(&mut self, ms: u64) {
        self.calls.push(MockCall::Sleep(ms));
    }

    async fn close(&mut self) -> RepasarResult<()> {
        self.calls.push(MockCall::Close);
        self.close_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_visible_selector_passes_wait_gate() {
        let mut page = MockPage::new().with_visible("#a");
        let loc = Locator::new("#a");
        assert!(page.wait_for_visible(&loc, 500).await.is_ok());
    }

    #[tokio::test]
    async fn test_invisible_selector_times_out() {
        let mut page = MockPage::new();
        let loc = Locator::new("#missing");
        let err = page.wait_for_visible(&loc, 500).await.unwrap_err();
        assert!(matches!(
            err,
            RepasarError::ElementTimeout { ms: 500, .. }
        ));
    }

    #[tokio::test]
    async fn test_calls_recorded_in_order() {
        let mut page = MockPage::new().with_visible("#a");
        let loc = Locator::new("#a");
        page.wait_for_visible(&loc, 500).await.unwrap();
        page.click(&loc).await.unwrap();
        page.sleep(500).await;
        page.close().await.unwrap();

        assert_eq!(
            page.calls,
            vec![
                MockCall::WaitForVisible("#a".to_string()),
                MockCall::Click("#a".to_string()),
                MockCall::Sleep(500),
                MockCall::Close,
            ]
        );
        assert_eq!(page.close_count(), 1);
    }

    #[tokio::test]
    async fn test_fill_updates_field_state() {
        let mut page = MockPage::new();
        page.fill(&Locator::new("#search"), "mouse").await.unwrap();
        assert_eq!(page.fields.get("#search").map(String::as_str), Some("mouse"));
        page.fill(&Locator::new("#search"), "").await.unwrap();
        assert_eq!(page.fields.get("#search").map(String::as_str), Some(""));
    }

    #[tokio::test]
    async fn test_goto_failure() {
        let mut page = MockPage::new().with_goto_failure();
        let err = page
            .goto("http://x", LoadState::Load, 30_000)
            .await
            .unwrap_err();
        assert!(matches!(err, RepasarError::Navigation { .. }));
        assert_eq!(page.current_url(), "");
    }
}
