use serde::Serialize;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io::Error as IOError;
use url::ParseError;
use webdriver::error as webdriver;

/// An error occurred while attempting to establish a session for a new `Client`.
#[derive(Debug)]
pub enum NewSessionError {
    /// The given WebDriver URL is invalid.
    BadWebdriverUrl(ParseError),
    /// The WebDriver server could not be reached.
    Failed(hyper_util::client::legacy::Error),
    /// The connection to the WebDriver server was lost.
    Lost(IOError),
    /// The server did not give a WebDriver-conforming response.
    NotW3C(serde_json::Value),
    /// The WebDriver server refused to create a new session.
    SessionNotCreated(WebDriver),
}

impl NewSessionError {
    fn description(&self) -> &str {
        match *self {
            NewSessionError::BadWebdriverUrl(..) => "webdriver url is invalid",
            NewSessionError::Failed(..) => "webdriver server did not respond",
            NewSessionError::Lost(..) => "webdriver server disconnected",
            NewSessionError::NotW3C(..) => "webdriver server gave non-conformant response",
            NewSessionError::SessionNotCreated(..) => "webdriver did not create session",
        }
    }
}

impl Error for NewSessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            NewSessionError::BadWebdriverUrl(ref e) => Some(e),
            NewSessionError::Failed(ref e) => Some(e),
            NewSessionError::Lost(ref e) => Some(e),
            NewSessionError::NotW3C(..) => None,
            NewSessionError::SessionNotCreated(ref e) => Some(e),
        }
    }
}

impl fmt::Display for NewSessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.description())?;
        match *self {
            NewSessionError::BadWebdriverUrl(ref e) => write!(f, "{}", e),
            NewSessionError::Failed(ref e) => write!(f, "{}", e),
            NewSessionError::Lost(ref e) => write!(f, "{}", e),
            NewSessionError::NotW3C(ref e) => write!(f, "{:?}", e),
            NewSessionError::SessionNotCreated(ref e) => write!(f, "{}", e),
        }
    }
}

/// An error occurred while executing some browser action.
#[derive(Debug)]
pub enum CmdError {
    /// A standard WebDriver error occurred.
    ///
    /// See [the spec] for details about what each of these errors represent. Note that for
    /// convenience `NoSuchElement` has been extracted into its own top-level variant.
    ///
    /// [the spec]: https://www.w3.org/TR/webdriver/#handling-errors
    Standard(WebDriver),

    /// No element was found matching the given locator.
    ///
    /// This variant lifts the ["no such element"] error variant from `Standard` to simplify
    /// checking for it in user code.
    ///
    /// ["no such element"]: https://www.w3.org/TR/webdriver/#dfn-no-such-element
    NoSuchElement(WebDriver),

    /// A bad URL was encountered during parsing.
    ///
    /// This normally happens if the current URL is requested but the URL in question is invalid
    /// or otherwise malformed.
    BadUrl(ParseError),

    /// A request to the WebDriver server failed.
    Failed(hyper_util::client::legacy::Error),

    /// The WebDriver server's response could not be read.
    Hyper(hyper::Error),

    /// The connection to the WebDriver server was lost.
    Lost(IOError),

    /// The WebDriver server responded with a non-standard, non-JSON reply.
    NotJson(String),

    /// The WebDriver server responded to a command with an invalid JSON response.
    Json(serde_json::Error),

    /// The WebDriver server produced a response that does not conform to the [W3C WebDriver
    /// specification][spec].
    ///
    /// [spec]: https://www.w3.org/TR/webdriver/
    NotW3C(serde_json::Value),

    /// Could not decode a base64 image.
    ImageDecodeError(base64::DecodeError),

    /// Timeout of a wait condition.
    ///
    /// Returned when a page fails to reach a settled state before the wait deadline.
    WaitTimeout,
}

impl CmdError {
    /// Returns true if this error indicates that a matching element was not found.
    pub fn is_miss(&self) -> bool {
        matches!(self, CmdError::NoSuchElement(..))
    }

    fn description(&self) -> &str {
        match *self {
            CmdError::Standard(..) => "webdriver returned error",
            CmdError::NoSuchElement(..) => "no element found matching selector",
            CmdError::BadUrl(..) => "bad url provided",
            CmdError::Failed(..) => "webdriver could not be reached",
            CmdError::Hyper(..) => "webdriver response could not be read",
            CmdError::Lost(..) => "webdriver connection lost",
            CmdError::NotJson(..) => "webdriver returned invalid response",
            CmdError::Json(..) => "webdriver returned incoherent response",
            CmdError::NotW3C(..) => "webdriver returned non-conforming response",
            CmdError::ImageDecodeError(..) => "error decoding image",
            CmdError::WaitTimeout => "timeout waiting on condition",
        }
    }

    pub(crate) fn from_webdriver_error(e: webdriver::WebDriverError) -> Self {
        match e {
            webdriver::WebDriverError {
                error: webdriver::ErrorStatus::NoSuchElement,
                ..
            } => CmdError::NoSuchElement(WebDriver::from_upstream_error(e)),
            _ => CmdError::Standard(WebDriver::from_upstream_error(e)),
        }
    }
}

impl Error for CmdError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            CmdError::Standard(ref e) | CmdError::NoSuchElement(ref e) => Some(e),
            CmdError::BadUrl(ref e) => Some(e),
            CmdError::Failed(ref e) => Some(e),
            CmdError::Hyper(ref e) => Some(e),
            CmdError::Lost(ref e) => Some(e),
            CmdError::Json(ref e) => Some(e),
            CmdError::ImageDecodeError(ref e) => Some(e),
            CmdError::NotJson(_) | CmdError::NotW3C(_) | CmdError::WaitTimeout => None,
        }
    }
}

impl fmt::Display for CmdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.description())?;
        match *self {
            CmdError::Standard(ref e) | CmdError::NoSuchElement(ref e) => write!(f, "{}", e),
            CmdError::BadUrl(ref e) => write!(f, "{}", e),
            CmdError::Failed(ref e) => write!(f, "{}", e),
            CmdError::Hyper(ref e) => write!(f, "{}", e),
            CmdError::Lost(ref e) => write!(f, "{}", e),
            CmdError::NotJson(ref e) => write!(f, "{}", e),
            CmdError::Json(ref e) => write!(f, "{}", e),
            CmdError::NotW3C(ref e) => write!(f, "{:?}", e),
            CmdError::ImageDecodeError(ref e) => write!(f, "{:?}", e),
            CmdError::WaitTimeout => Ok(()),
        }
    }
}

impl From<IOError> for CmdError {
    fn from(e: IOError) -> Self {
        CmdError::Lost(e)
    }
}

impl From<ParseError> for CmdError {
    fn from(e: ParseError) -> Self {
        CmdError::BadUrl(e)
    }
}

impl From<hyper_util::client::legacy::Error> for CmdError {
    fn from(e: hyper_util::client::legacy::Error) -> Self {
        CmdError::Failed(e)
    }
}

impl From<hyper::Error> for CmdError {
    fn from(e: hyper::Error) -> Self {
        CmdError::Hyper(e)
    }
}

impl From<serde_json::Error> for CmdError {
    fn from(e: serde_json::Error) -> Self {
        CmdError::Json(e)
    }
}

/// Error returned by WebDriver.
#[derive(Debug, Serialize)]
pub struct WebDriver {
    /// Code of this error provided by WebDriver.
    ///
    /// Intentionally made private, so library users cannot match on it.
    pub(crate) error: webdriver::ErrorStatus,

    /// Description of this error provided by WebDriver.
    pub message: Cow<'static, str>,

    /// Stacktrace of this error provided by WebDriver.
    pub stacktrace: Cow<'static, str>,
}

impl fmt::Display for WebDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for WebDriver {}

impl WebDriver {
    pub(crate) fn from_upstream_error(e: webdriver::WebDriverError) -> Self {
        Self {
            error: e.error,
            message: e.message,
            stacktrace: e.stack,
        }
    }

    /// Returns [code] of this error provided by WebDriver.
    ///
    /// [code]: https://www.w3.org/TR/webdriver/#dfn-error-code
    pub fn error(&self) -> &'static str {
        self.error.error_code()
    }
}

/// A violated expectation during the page-verification sequence.
///
/// Command failures (navigation, element lookup) are carried through as
/// [`CmdError`]; the remaining variants are assertion failures against the
/// rendered page.
#[derive(Debug)]
pub enum VerifyError {
    /// The browser session failed to execute a command.
    Cmd(CmdError),

    /// A page title did not contain the expected substring.
    Title {
        /// The page whose title was checked.
        page: &'static str,
        /// The substring the title was expected to contain.
        expected: &'static str,
        /// The title the browser actually reported.
        actual: String,
    },

    /// An element's rendered text did not contain the expected substring.
    Text {
        /// The page the element was checked on.
        page: &'static str,
        /// The locator the element was found by.
        selector: String,
        /// The substring the text was expected to contain.
        expected: &'static str,
        /// The text the element actually rendered.
        actual: String,
    },

    /// A screenshot could not be written to disk.
    Screenshot(IOError),

    /// A progress line could not be written to the output sink.
    Progress(IOError),
}

impl Error for VerifyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            VerifyError::Cmd(ref e) => Some(e),
            VerifyError::Screenshot(ref e) | VerifyError::Progress(ref e) => Some(e),
            VerifyError::Title { .. } | VerifyError::Text { .. } => None,
        }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            VerifyError::Cmd(ref e) => write!(f, "{}", e),
            VerifyError::Title {
                page,
                expected,
                ref actual,
            } => write!(
                f,
                "title of {} did not contain {:?} (was {:?})",
                page, expected, actual
            ),
            VerifyError::Text {
                page,
                ref selector,
                expected,
                ref actual,
            } => write!(
                f,
                "text of `{}` on {} did not contain {:?} (was {:?})",
                selector, page, expected, actual
            ),
            VerifyError::Screenshot(ref e) => write!(f, "could not save screenshot: {}", e),
            VerifyError::Progress(ref e) => write!(f, "could not write progress line: {}", e),
        }
    }
}

impl From<CmdError> for VerifyError {
    fn from(e: CmdError) -> Self {
        VerifyError::Cmd(e)
    }
}

impl From<ParseError> for VerifyError {
    fn from(e: ParseError) -> Self {
        VerifyError::Cmd(CmdError::BadUrl(e))
    }
}
