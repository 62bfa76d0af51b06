#![allow(dead_code)]

//! An in-process stand-in for chromedriver plus a fixture rendering of the
//! marketplace site.
//!
//! The stub speaks just enough of the W3C WebDriver wire protocol for the
//! verification sequence: session setup/teardown, navigation, element lookup
//! by CSS selector or link text, element text, script execution, and
//! screenshots. Instead of serving HTML to a real browser, it resolves
//! lookups against an in-memory table of (selector, rendered text) per page,
//! which lets the tests run without a browser or driver binary.

use base64::Engine as _;
use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde_json::{json, Value as Json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// A 1x1 transparent PNG; what the stub "captures" on every screenshot.
const PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// The rendered state of one fixture page.
#[derive(Clone, Debug)]
pub struct PageFixture {
    pub title: &'static str,
    /// (CSS selector, rendered text) pairs; lookup matches the selector
    /// string exactly, like a first-match query against the fixture "DOM".
    pub texts: Vec<(&'static str, String)>,
    /// (visible link label, target file) pairs.
    pub links: Vec<(&'static str, &'static str)>,
}

/// The whole fixture site, keyed by file name.
#[derive(Clone, Debug)]
pub struct Site {
    pub pages: HashMap<&'static str, PageFixture>,
}

impl Site {
    /// Drop one element from a page, for negative scenarios.
    pub fn without_element(mut self, file: &'static str, selector: &str) -> Self {
        if let Some(page) = self.pages.get_mut(file) {
            page.texts.retain(|(sel, _)| *sel != selector);
        }
        self
    }

    /// Drop a navigation link from a page.
    pub fn without_link(mut self, file: &'static str, label: &str) -> Self {
        if let Some(page) = self.pages.get_mut(file) {
            page.links.retain(|(l, _)| *l != label);
        }
        self
    }

    /// Replace a page's title.
    pub fn with_title(mut self, file: &'static str, title: &'static str) -> Self {
        if let Some(page) = self.pages.get_mut(file) {
            page.title = title;
        }
        self
    }
}

/// The marketplace site as the verification sequence expects to find it.
pub fn marketplace_site() -> Site {
    let mut pages = HashMap::new();
    pages.insert(
        "index.html",
        PageFixture {
            title: "DTECH - Student Marketplace",
            texts: vec![
                ("header h1", "DTECH".to_string()),
                ("header p", "The Student Marketplace".to_string()),
                (
                    "footer",
                    "DTECH empowering the youth through digital innovation\n\
                     © 2026 DTECH. All rights reserved."
                        .to_string(),
                ),
            ],
            links: vec![("About Us", "about.html")],
        },
    );
    pages.insert(
        "about.html",
        PageFixture {
            title: "About DTECH",
            texts: vec![
                (
                    ".section",
                    "DTECH Book Exchange is a student-focused platform for trading \
                     textbooks and study material."
                        .to_string(),
                ),
                (
                    ".ecosystem-highlight",
                    "Proudly part of the PREASX24 ecosystem.".to_string(),
                ),
            ],
            links: vec![],
        },
    );
    pages.insert(
        "services.html",
        PageFixture {
            title: "DTECH Services",
            texts: vec![(
                "footer",
                "DTECH empowering the youth through digital innovation".to_string(),
            )],
            links: vec![],
        },
    );
    Site { pages }
}

#[derive(Debug)]
enum ElementRef {
    Text(String),
    Link { label: String, target: String },
}

#[derive(Debug)]
struct Driver {
    site: Site,
    current: Option<String>,
    elements: HashMap<String, ElementRef>,
    next_id: u64,
}

impl Driver {
    fn current_page(&self) -> Option<&PageFixture> {
        let url = self.current.as_deref()?;
        let file = url.rsplit('/').next()?;
        self.site.pages.get(file)
    }

    fn register(&mut self, element: ElementRef) -> String {
        self.next_id += 1;
        let id = format!("stub-element-{}", self.next_id);
        self.elements.insert(id.clone(), element);
        id
    }
}

/// Start the stub driver on an ephemeral port and return that port.
pub async fn start_driver(site: Site) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let driver = Arc::new(Mutex::new(Driver {
        site,
        current: None,
        elements: HashMap::new(),
        next_id: 0,
    }));

    tokio::spawn(async move {
        loop {
            let (stream, _) = match listener.accept().await {
                Ok(s) => s,
                Err(_) => break,
            };
            let driver = Arc::clone(&driver);
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| handle(Arc::clone(&driver), req));
                let _ = hyper::server::conn::http1::Builder::new()
                    .serve_connection(io, service)
                    .await;
            });
        }
    });

    port
}

async fn handle(
    driver: Arc<Mutex<Driver>>,
    req: Request<Incoming>,
) -> Result<Response<Full<Bytes>>, std::convert::Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let body = req.into_body().collect().await.unwrap().to_bytes();
    let body: Json = if body.is_empty() {
        Json::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Json::Null)
    };

    let (status, value) = route(&driver, &method, &path, &body);
    let reply = serde_json::to_vec(&json!({ "value": value })).unwrap();
    Ok(Response::builder()
        .status(status)
        .header(hyper::header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Full::new(Bytes::from(reply)))
        .unwrap())
}

fn route(driver: &Mutex<Driver>, method: &Method, path: &str, body: &Json) -> (StatusCode, Json) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut state = driver.lock().unwrap();

    match (method, segments.as_slice()) {
        (&Method::POST, ["session"]) => {
            state.current = None;
            state.elements.clear();
            (
                StatusCode::OK,
                json!({ "sessionId": "stub-session", "capabilities": {} }),
            )
        }
        (&Method::DELETE, ["session", _]) => (StatusCode::OK, Json::Null),
        (&Method::POST, ["session", _, "url"]) => match body["url"].as_str() {
            Some(url) => {
                state.current = Some(url.to_string());
                (StatusCode::OK, Json::Null)
            }
            None => error(StatusCode::BAD_REQUEST, "invalid argument", "missing url"),
        },
        (&Method::GET, ["session", _, "url"]) => {
            let url = state.current.clone().unwrap_or_else(|| "about:blank".to_string());
            (StatusCode::OK, Json::String(url))
        }
        (&Method::GET, ["session", _, "title"]) => {
            let title = state.current_page().map(|p| p.title).unwrap_or("");
            (StatusCode::OK, Json::String(title.to_string()))
        }
        (&Method::POST, ["session", _, "element"]) => {
            let (using, value) = match (body["using"].as_str(), body["value"].as_str()) {
                (Some(u), Some(v)) => (u, v.to_string()),
                _ => {
                    return error(
                        StatusCode::BAD_REQUEST,
                        "invalid argument",
                        "malformed locator",
                    )
                }
            };
            let found = match (state.current_page(), using) {
                (Some(page), "css selector") => page
                    .texts
                    .iter()
                    .find(|(sel, _)| *sel == value)
                    .map(|(_, text)| ElementRef::Text(text.clone())),
                (Some(page), "link text") => page
                    .links
                    .iter()
                    .find(|(label, _)| *label == value)
                    .map(|(label, target)| ElementRef::Link {
                        label: label.to_string(),
                        target: target.to_string(),
                    }),
                _ => None,
            };
            match found {
                Some(element) => {
                    let id = state.register(element);
                    (
                        StatusCode::OK,
                        json!({ webdriver::common::ELEMENT_KEY: id }),
                    )
                }
                None => error(
                    StatusCode::NOT_FOUND,
                    "no such element",
                    &format!("no element matching {:?} (using {})", value, using),
                ),
            }
        }
        (&Method::POST, ["session", _, "element", id, "click"]) => {
            let target = match state.elements.get(*id) {
                Some(ElementRef::Link { target, .. }) => Some(target.clone()),
                Some(ElementRef::Text(..)) => None,
                None => {
                    return error(
                        StatusCode::NOT_FOUND,
                        "stale element reference",
                        "element is no longer attached",
                    )
                }
            };
            if let Some(target) = target {
                // resolve the link against the current page's directory
                if let Some(current) = state.current.clone() {
                    let base = current.rsplit_once('/').map(|(b, _)| b).unwrap_or(&current);
                    state.current = Some(format!("{}/{}", base, target));
                }
            }
            (StatusCode::OK, Json::Null)
        }
        (&Method::GET, ["session", _, "element", id, "text"]) => match state.elements.get(*id) {
            Some(ElementRef::Text(text)) => (StatusCode::OK, Json::String(text.clone())),
            Some(ElementRef::Link { label, .. }) => (StatusCode::OK, Json::String(label.clone())),
            None => error(
                StatusCode::NOT_FOUND,
                "stale element reference",
                "element is no longer attached",
            ),
        },
        (&Method::POST, ["session", _, "execute", "sync"]) => {
            match body["script"].as_str() {
                Some(script) if script.contains("readyState") => {
                    (StatusCode::OK, Json::String("complete".to_string()))
                }
                _ => (StatusCode::OK, Json::Null),
            }
        }
        (&Method::GET, ["session", _, "screenshot"]) => (
            StatusCode::OK,
            Json::String(base64::engine::general_purpose::STANDARD.encode(PNG)),
        ),
        _ => error(
            StatusCode::NOT_FOUND,
            "unknown command",
            &format!("{} {} is not part of the stub", method, path),
        ),
    }
}

fn error(status: StatusCode, code: &str, message: &str) -> (StatusCode, Json) {
    (
        status,
        json!({ "error": code, "message": message, "stacktrace": "" }),
    )
}
