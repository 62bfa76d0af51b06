use crate::error;
use crate::wd::{Capabilities, Cmd};
use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_util::client::legacy::{connect::HttpConnector, Client as HttpClient};
use hyper_util::rt::TokioExecutor;
use serde_json::Value as Json;
use std::io;
use tracing::debug;
use url::Url;
use webdriver::capabilities::SpecNewSessionParameters;
use webdriver::error::{ErrorStatus, WebDriverError};

/// A WebDriver client tied to a single browser session.
///
/// Commands are issued strictly sequentially over one HTTP connection pool:
/// each call suspends until the WebDriver server has answered. There is no
/// multiplexing and no background task; the session is the single shared
/// resource of a run, acquired by [`Client::with_capabilities`] and released
/// by [`Client::close`].
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) http: HttpClient<HttpConnector, Full<Bytes>>,
    pub(crate) wdb: Url,
    pub(crate) session: Option<String>,
}

impl Client {
    /// Create a new `Client` associated with a new WebDriver session on the server at the given
    /// URL.
    ///
    /// The given capabilities will be requested in `alwaysMatch`.
    pub async fn with_capabilities(
        webdriver: &str,
        mut cap: Capabilities,
    ) -> Result<Self, error::NewSessionError> {
        // Where is the WebDriver server?
        let wdb: Url = webdriver
            .parse()
            .map_err(error::NewSessionError::BadWebdriverUrl)?;

        let http = HttpClient::builder(TokioExecutor::new()).build_http();
        let mut c = Client {
            http,
            wdb,
            session: None,
        };

        // https://www.w3.org/TR/webdriver/#capabilities
        //  - we want the browser to wait for the page to load
        cap.insert("pageLoadStrategy".to_string(), Json::from("normal"));

        // make chrome comply with w3c
        cap.entry("goog:chromeOptions".to_string())
            .or_insert_with(|| Json::Object(serde_json::Map::new()))
            .as_object_mut()
            .expect("goog:chromeOptions wasn't a JSON object")
            .insert("w3c".to_string(), Json::from(true));

        let spec = SpecNewSessionParameters {
            alwaysMatch: cap,
            firstMatch: vec![Capabilities::new()],
        };

        match c.issue(Cmd::NewSession(spec)).await {
            Ok(_) if c.session.is_some() => Ok(c),
            Ok(v) => Err(error::NewSessionError::NotW3C(v)),
            Err(e) => Err(Self::map_handshake_error(e)),
        }
    }

    /// Get the session ID assigned by the WebDriver server to this client.
    pub fn session_id(&self) -> Option<&str> {
        self.session.as_deref()
    }

    fn map_handshake_error(e: error::CmdError) -> error::NewSessionError {
        match e {
            error::CmdError::Failed(e) => error::NewSessionError::Failed(e),
            error::CmdError::Lost(e) => error::NewSessionError::Lost(e),
            error::CmdError::Hyper(e) => error::NewSessionError::Lost(io::Error::new(
                io::ErrorKind::ConnectionAborted,
                e,
            )),
            error::CmdError::NotJson(v) => error::NewSessionError::NotW3C(Json::String(v)),
            error::CmdError::NotW3C(v) => error::NewSessionError::NotW3C(v),
            error::CmdError::Standard(e) | error::CmdError::NoSuchElement(e) => {
                error::NewSessionError::SessionNotCreated(e)
            }
            e => error::NewSessionError::NotW3C(Json::String(e.to_string())),
        }
    }

    /// Issue a WebDriver command and read and parse the response.
    ///
    /// Since the command arguments can already be turned directly into JSON, this is mostly a
    /// matter of picking the right URL and method from [the spec], stuffing the JSON-encoded
    /// arguments (if any) into the body, and unwrapping the `value` envelope of the reply.
    ///
    /// [the spec]: https://www.w3.org/TR/webdriver/#list-of-endpoints
    pub(crate) async fn issue(&mut self, cmd: Cmd) -> Result<Json, error::CmdError> {
        let session_id = match self.session {
            Some(ref s) => s.clone(),
            None if cmd.is_new_session() => String::new(),
            None => {
                return Err(error::CmdError::Lost(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "WebDriver session has been closed",
                )))
            }
        };

        let url = cmd.endpoint(&self.wdb, &session_id)?;
        let (method, body) = cmd.method_and_body();
        debug!(%method, url = %url, "issuing webdriver command");

        let mut req = hyper::Request::builder().method(method).uri(url.as_str());
        let req = if let Some(body) = body {
            req = req.header(hyper::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref());
            req = req.header(hyper::header::CONTENT_LENGTH, body.len());
            req.body(Full::new(Bytes::from(body))).unwrap()
        } else {
            req.body(Full::default()).unwrap()
        };

        let res = self.http.request(req).await?;
        let status = res.status();

        // check that the server sent us json
        let ctype = res
            .headers()
            .get(hyper::header::CONTENT_TYPE)
            .and_then(|ctype| ctype.to_str().ok()?.parse::<mime::Mime>().ok());

        let body = res.into_body().collect().await?.to_bytes();
        let body = String::from_utf8_lossy(&body).into_owned();
        debug!(%status, "webdriver response");

        match ctype {
            Some(ref ctype)
                if ctype.type_() == mime::APPLICATION_JSON.type_()
                    && ctype.subtype() == mime::APPLICATION_JSON.subtype() => {}
            _ => return Err(error::CmdError::NotJson(body)),
        }

        // https://www.w3.org/TR/webdriver/#dfn-send-a-response
        // NOTE: the standard specifies that even errors use the "Send a Response" steps
        let mut obj = match serde_json::from_str(&body)? {
            Json::Object(o) => o,
            v => return Err(error::CmdError::NotW3C(v)),
        };
        let value = match obj.remove("value") {
            Some(v) => v,
            None => return Err(error::CmdError::NotW3C(Json::Object(obj))),
        };

        if status.is_success() {
            if cmd.is_new_session() {
                // the new-session payload buries the id we need for every later command
                match value.get("sessionId").and_then(|sid| sid.as_str()) {
                    Some(sid) => self.session = Some(sid.to_string()),
                    None => return Err(error::CmdError::NotW3C(value)),
                }
            }
            return Ok(value);
        }

        // https://www.w3.org/TR/webdriver/#dfn-send-an-error
        // https://www.w3.org/TR/webdriver/#handling-errors
        let body = match value {
            Json::Object(o) => o,
            v => return Err(error::CmdError::NotW3C(v)),
        };
        if !body.contains_key("error")
            || !body.contains_key("message")
            || !body["error"].is_string()
            || !body["message"].is_string()
        {
            return Err(error::CmdError::NotW3C(Json::Object(body)));
        }

        let es = error_status(body["error"].as_str().unwrap());
        let message = body["message"].as_str().unwrap().to_string();
        Err(error::CmdError::from_webdriver_error(WebDriverError::new(
            es, message,
        )))
    }
}

/// Map a W3C [error code] to its status.
///
/// [error code]: https://www.w3.org/TR/webdriver/#dfn-error-code
fn error_status(error: &str) -> ErrorStatus {
    match error {
        "element click intercepted" => ErrorStatus::ElementClickIntercepted,
        "element not interactable" => ErrorStatus::ElementNotInteractable,
        "invalid argument" => ErrorStatus::InvalidArgument,
        "invalid selector" => ErrorStatus::InvalidSelector,
        "invalid session id" => ErrorStatus::InvalidSessionId,
        "javascript error" => ErrorStatus::JavascriptError,
        "no such element" => ErrorStatus::NoSuchElement,
        "no such window" => ErrorStatus::NoSuchWindow,
        "session not created" => ErrorStatus::SessionNotCreated,
        "stale element reference" => ErrorStatus::StaleElementReference,
        "script timeout" => ErrorStatus::ScriptTimeout,
        "timeout" => ErrorStatus::Timeout,
        "unable to capture screen" => ErrorStatus::UnableToCaptureScreen,
        "unknown command" => ErrorStatus::UnknownCommand,
        _ => ErrorStatus::UnknownError,
    }
}
