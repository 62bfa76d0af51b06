//! WebDriver types and declarations.

use http::Method;
use url::{ParseError, Url};
use webdriver::capabilities::SpecNewSessionParameters;
use webdriver::command::{GetParameters, JavascriptCommandParameters, LocatorParameters};
use webdriver::common::LocatorStrategy;

/// Dynamic set of [WebDriver capabilities][1].
///
/// [1]: https://www.w3.org/TR/webdriver/#dfn-capability
pub type Capabilities = serde_json::Map<String, serde_json::Value>;

/// An element locator.
///
/// See [the specification][1] for more details.
///
/// [1]: https://www.w3.org/TR/webdriver1/#locator-strategies
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Locator<'a> {
    /// Find an element matching the given [CSS selector][1].
    ///
    /// [1]: https://developer.mozilla.org/en-US/docs/Web/CSS/CSS_Selectors
    Css(&'a str),

    /// Find a link element with the given link text.
    ///
    /// The text matching is exact.
    LinkText(&'a str),
}

impl<'a> Locator<'a> {
    pub(crate) fn into_parameters(self) -> LocatorParameters {
        match self {
            Locator::Css(s) => LocatorParameters {
                using: LocatorStrategy::CSSSelector,
                value: s.to_string(),
            },
            Locator::LinkText(s) => LocatorParameters {
                using: LocatorStrategy::LinkText,
                value: s.to_string(),
            },
        }
    }
}

/// The WebDriver commands the verification sequence issues.
///
/// Each command knows its [endpoint][1] and its HTTP method and request body.
///
/// [1]: https://www.w3.org/TR/webdriver/#list-of-endpoints
#[derive(Debug)]
pub(crate) enum Cmd {
    NewSession(SpecNewSessionParameters),
    DeleteSession,
    Get(GetParameters),
    GetCurrentUrl,
    GetTitle,
    FindElement(LocatorParameters),
    ElementClick(String),
    GetElementText(String),
    ExecuteScript(JavascriptCommandParameters),
    TakeScreenshot,
}

impl Cmd {
    /// Whether this command establishes the session (and thus has no session
    /// id to address yet).
    pub(crate) fn is_new_session(&self) -> bool {
        matches!(self, Cmd::NewSession(..))
    }

    /// The URL to direct this command to.
    pub(crate) fn endpoint(&self, base: &Url, session_id: &str) -> Result<Url, ParseError> {
        match *self {
            Cmd::NewSession(..) => return base.join("session"),
            Cmd::DeleteSession => return base.join(&format!("session/{}", session_id)),
            _ => {}
        }

        let base = base.join(&format!("session/{}/", session_id))?;
        match *self {
            Cmd::NewSession(..) | Cmd::DeleteSession => unreachable!(),
            Cmd::Get(..) | Cmd::GetCurrentUrl => base.join("url"),
            Cmd::GetTitle => base.join("title"),
            Cmd::FindElement(..) => base.join("element"),
            Cmd::ElementClick(ref we) => base.join(&format!("element/{}/click", we)),
            Cmd::GetElementText(ref we) => base.join(&format!("element/{}/text", we)),
            Cmd::ExecuteScript(..) => base.join("execute/sync"),
            Cmd::TakeScreenshot => base.join("screenshot"),
        }
    }

    /// The HTTP method to use, and the request body (if any).
    ///
    /// Most commands are plain GET requests; the rest POST their
    /// JSON-serialized parameters.
    pub(crate) fn method_and_body(&self) -> (Method, Option<String>) {
        match *self {
            Cmd::NewSession(ref conf) => (
                Method::POST,
                Some(format!(
                    r#"{{"capabilities": {}}}"#,
                    serde_json::to_string(conf).unwrap()
                )),
            ),
            Cmd::DeleteSession => (Method::DELETE, None),
            Cmd::Get(ref params) => (Method::POST, Some(serde_json::to_string(params).unwrap())),
            Cmd::FindElement(ref loc) => {
                (Method::POST, Some(serde_json::to_string(loc).unwrap()))
            }
            Cmd::ExecuteScript(ref script) => {
                (Method::POST, Some(serde_json::to_string(script).unwrap()))
            }
            Cmd::ElementClick(..) => (Method::POST, Some("{}".to_string())),
            Cmd::GetCurrentUrl | Cmd::GetTitle | Cmd::GetElementText(..) | Cmd::TakeScreenshot => {
                (Method::GET, None)
            }
        }
    }
}
