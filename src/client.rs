//! High-level operations on a live WebDriver session.

use crate::elements::{parse_lookup, Element};
use crate::error;
use crate::session::Client;
use crate::wd::{Cmd, Locator};
use base64::Engine as _;
use serde_json::Value as Json;
use std::future::Future;
use std::time::{Duration, Instant};
use url::Url;
use webdriver::command::{GetParameters, JavascriptCommandParameters};

/// How long a wait condition may poll before giving up.
const WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// How often a wait condition is re-evaluated.
const WAIT_INTERVAL: Duration = Duration::from_millis(100);

impl Client {
    /// Navigate directly to the given URL.
    pub async fn goto(&mut self, url: &str) -> Result<(), error::CmdError> {
        let url = url.to_owned();
        let base = self.current_url_().await?;
        let url = base.join(&url)?;
        self.issue(Cmd::Get(GetParameters { url: url.into() }))
            .await?;
        Ok(())
    }

    async fn current_url_(&mut self) -> Result<Url, error::CmdError> {
        let url = self.issue(Cmd::GetCurrentUrl).await?;
        if let Some(url) = url.as_str() {
            let url = if url.is_empty() { "about:blank" } else { url };
            Ok(url.parse()?)
        } else {
            Err(error::CmdError::NotW3C(url))
        }
    }

    /// Retrieve the currently active URL for this session.
    pub async fn current_url(&mut self) -> Result<Url, error::CmdError> {
        self.current_url_().await
    }

    /// Get the title of the current page.
    pub async fn title(&mut self) -> Result<String, error::CmdError> {
        match self.issue(Cmd::GetTitle).await? {
            Json::String(t) => Ok(t),
            v => Err(error::CmdError::NotW3C(v)),
        }
    }

    /// Find an element on the page.
    pub async fn find(&mut self, search: Locator<'_>) -> Result<Element, error::CmdError> {
        let res = self
            .issue(Cmd::FindElement(search.into_parameters()))
            .await?;
        let e = parse_lookup(res)?;
        Ok(Element {
            client: self.clone(),
            element: e,
        })
    }

    /// Execute the given JavaScript `script` in the current browser session.
    ///
    /// `args` is available to the script inside the `arguments` array. To retrieve the value of a
    /// variable, `return` has to be used in the JavaScript code.
    pub async fn execute(
        &mut self,
        script: &str,
        args: Vec<Json>,
    ) -> Result<Json, error::CmdError> {
        let cmd = JavascriptCommandParameters {
            script: script.to_string(),
            args: Some(args),
        };
        self.issue(Cmd::ExecuteScript(cmd)).await
    }

    /// Get a PNG-encoded screenshot of the current page.
    pub async fn screenshot(&mut self) -> Result<Vec<u8>, error::CmdError> {
        let src = self.issue(Cmd::TakeScreenshot).await?;
        if let Some(src) = src.as_str() {
            base64::engine::general_purpose::STANDARD
                .decode(src)
                .map_err(error::CmdError::ImageDecodeError)
        } else {
            Err(error::CmdError::NotW3C(src))
        }
    }

    /// Terminate the WebDriver session.
    ///
    /// This also closes the associated browser window or tab.
    ///
    /// This function is safe to call multiple times; once the session has been
    /// closed, further calls are no-ops.
    pub async fn close(&mut self) -> Result<(), error::CmdError> {
        if self.session.is_none() {
            return Ok(());
        }
        self.issue(Cmd::DeleteSession).await?;
        self.session = None;
        Ok(())
    }

    /// Wait for the given function to return `true` before proceeding.
    ///
    /// The condition is re-evaluated at a fixed interval; if it does not hold before the wait
    /// deadline, [`error::CmdError::WaitTimeout`] is returned.
    pub async fn wait_for<F, FF>(&mut self, mut is_ready: F) -> Result<(), error::CmdError>
    where
        F: FnMut(&mut Client) -> FF,
        FF: Future<Output = Result<bool, error::CmdError>>,
    {
        let deadline = Instant::now() + WAIT_TIMEOUT;
        while !is_ready(self).await? {
            if Instant::now() >= deadline {
                return Err(error::CmdError::WaitTimeout);
            }
            tokio::time::sleep(WAIT_INTERVAL).await;
        }
        Ok(())
    }

    /// Wait for the page to navigate away from `current` and settle.
    ///
    /// "Settled" means the browser reports a different URL than `current` and the new document's
    /// `readyState` is `"complete"`. This is the single blocking wait point after following a
    /// link; direct navigation already blocks until the page load is done through the session's
    /// `normal` page-load strategy.
    pub async fn wait_for_navigation(&mut self, current: Url) -> Result<(), error::CmdError> {
        self.wait_for(move |c| {
            let current = current.clone();
            let mut c = c.clone();
            async move { Ok(c.current_url().await? != current) }
        })
        .await?;

        // the URL flips before the new document finishes loading
        self.wait_for(move |c| {
            let mut c = c.clone();
            async move {
                Ok(c.execute("return document.readyState", vec![]).await?.as_str()
                    == Some("complete"))
            }
        })
        .await
    }
}
