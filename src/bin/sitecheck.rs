//! The runnable smoke test.
//!
//! Expects a chromedriver on `localhost:9515` and the static marketplace site
//! already served on `localhost:8000` (the site server is an external
//! collaborator and is not started here). Screenshots land under
//! `verification/`, overwritten on each run.
//!
//! The process exits non-zero when the run failed, after printing the failure,
//! attempting a diagnostic screenshot, and closing the browser session.

use sitecheck::verify::Verifier;
use sitecheck::wd::Capabilities;
use sitecheck::Client;
use std::process;
use tracing_subscriber::EnvFilter;

const WEBDRIVER: &str = "http://localhost:9515";
const SITE: &str = "http://localhost:8000";
const OUT_DIR: &str = "verification";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut caps = Capabilities::new();
    caps.insert(
        "goog:chromeOptions".to_string(),
        serde_json::json!({
            "args": ["--headless", "--disable-gpu", "--no-sandbox", "--disable-dev-shm-usage"],
        }),
    );

    let mut c = match Client::with_capabilities(WEBDRIVER, caps).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to connect to WebDriver: {}", e);
            process::exit(1);
        }
    };

    let verifier = match Verifier::new(SITE, OUT_DIR) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("invalid site url: {}", e);
            let _ = c.close().await;
            process::exit(1);
        }
    };

    let outcome = verifier.run(&mut c).await;
    if let Err(e) = &outcome {
        println!("Error: {}", e);
        verifier.capture_failure(&mut c).await;
    }

    // the browser session is released on every exit path
    if let Err(e) = c.close().await {
        eprintln!("failed to close WebDriver session: {}", e);
    }

    if outcome.is_err() {
        process::exit(1);
    }
}
