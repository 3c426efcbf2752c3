//! Page driver seam between the step runner and a live browser.
//!
//! The runner never talks to a browser directly; it drives this trait.
//! The CDP-backed implementation lives in [`crate::browser`] behind the
//! `browser` feature, and [`crate::mock::MockPage`] provides a deterministic
//! implementation for tests. Replaying against a live, stateful site is not
//! idempotent, so deterministic behavior can only be asserted on a mock.

use crate::locator::Locator;
use crate::result::RepasarResult;
use crate::wait::LoadState;
use async_trait::async_trait;
use std::path::Path;

/// A handle to one browser page, scoped to a single run.
///
/// Each method suspends the calling flow of control until completion or
/// timeout; nothing races ahead. The visibility timeout is owned by the
/// driver: `wait_for_visible` returns `ElementTimeout` when the element
/// does not report a visible state in time.
#[async_trait]
pub trait PageDriver: Send {
    /// Request a page load and block until `wait_until` is reached or the
    /// timeout elapses.
    async fn goto(&mut self, url: &str, wait_until: LoadState, timeout_ms: u64)
        -> RepasarResult<()>;

    /// Block until the located element reports a visible state, or fail
    /// with `ElementTimeout`.
    async fn wait_for_visible(&mut self, locator: &Locator, timeout_ms: u64) -> RepasarResult<()>;

    /// Click the located element.
    async fn click(&mut self, locator: &Locator) -> RepasarResult<()>;

    /// Replace the content of the located input field. An empty `value`
    /// clears the field.
    async fn fill(&mut self, locator: &Locator, value: &str) -> RepasarResult<()>;

    /// Choose an option in the located `<select>` element by value.
    async fn select(&mut self, locator: &Locator, value: &str) -> RepasarResult<()>;

    /// Move the pointer over the located element.
    async fn hover(&mut self, locator: &Locator) -> RepasarResult<()>;

    /// Press a key, dispatched to the document body.
    async fn press(&mut self, key: &str) -> RepasarResult<()>;

    /// Scroll down one viewport height.
    async fn scroll_by_viewport(&mut self) -> RepasarResult<()>;

    /// Capture the page as a PNG file at `path`.
    async fn screenshot(&mut self, path: &Path) -> RepasarResult<()>;

    /// Pause for a fixed duration.
    async fn sleep(&mut self, ms: u64);

    /// Release the page. Called exactly once per run, on success and
    /// failure paths alike.
    async fn close(&mut self) -> RepasarResult<()>;
}
