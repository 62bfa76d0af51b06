//! End-to-end smoke verification of a static site through [WebDriver].
//!
//! This crate drives a conforming (typically headless) browser through a fixed
//! sequence of page checks: navigate to a page, read its title and selected
//! DOM fragments, assert that each contains an expected literal substring, and
//! save a screenshot of the page for manual review. The sequence itself lives
//! in [`verify::PAGES`] as plain data — an enumerated table of (selector,
//! expected-substring) pairs per target page — and [`verify::Verifier`] walks
//! it against a live [`Client`].
//!
//! The client layer speaks the [W3C WebDriver protocol][WebDriver] directly
//! over HTTP and covers exactly the operations the verification sequence
//! needs: session setup and teardown, navigation, element lookup by
//! [CSS selector][css] or link text, element text retrieval, script
//! execution, and screenshots. Commands are issued strictly sequentially on a
//! single session; there is no parallelism across pages.
//!
//! A failed check aborts the remaining sequence. The `sitecheck` binary
//! catches the failure at the top level, prints its message, attempts a
//! best-effort diagnostic screenshot, closes the browser session on every
//! exit path, and exits non-zero.
//!
//! ```no_run
//! use sitecheck::{verify::Verifier, Client};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut c = Client::with_capabilities(
//!         "http://localhost:9515",
//!         sitecheck::wd::Capabilities::new(),
//!     )
//!     .await?;
//!
//!     let verifier = Verifier::new("http://localhost:8000", "verification")?;
//!     let outcome = verifier.run(&mut c).await;
//!     if outcome.is_err() {
//!         verifier.capture_failure(&mut c).await;
//!     }
//!     c.close().await?;
//!     outcome?;
//!     Ok(())
//! }
//! ```
//!
//! [WebDriver]: https://www.w3.org/TR/webdriver/
//! [css]: https://developer.mozilla.org/en-US/docs/Web/CSS/CSS_Selectors
#![deny(missing_docs)]
#![warn(missing_debug_implementations, rust_2018_idioms)]

/// Error types.
pub mod error;

/// WebDriver types and wire-level command declarations.
pub mod wd;

/// The session transport: one HTTP connection to a running WebDriver server.
mod session;

/// High-level operations on a live browser session.
mod client;

/// Types used to represent particular elements on a page.
pub mod elements;

/// The page-verification sequence and its runner.
pub mod verify;

pub use crate::elements::Element;
pub use crate::session::Client;
pub use crate::wd::Locator;
