//! The page-verification sequence.
//!
//! [`PAGES`] is the whole sequence as plain data: for every target page, how
//! to reach it, what its title must contain, and an enumerated table of
//! (selector, expected-substring) checks against its rendered text.
//! [`Verifier`] walks that table against a live [`Client`], printing a
//! progress line per verified step and saving a screenshot per page.
//!
//! The first violated check aborts the run; the remaining targets are
//! skipped. Callers that want a diagnostic screenshot of the failing page
//! should follow up with [`Verifier::capture_failure`] before tearing the
//! session down.

use crate::error::VerifyError;
use crate::session::Client;
use crate::wd::Locator;
use std::io::{self, Write};
use std::path::PathBuf;
use url::Url;

/// How a target page is reached.
#[derive(Clone, Copy, Debug)]
pub enum Nav {
    /// Navigate directly to the page's URL.
    Direct,
    /// Click the link with the given visible label on the current page, then
    /// wait for the navigation to settle.
    Link(&'static str),
}

/// An expectation against the title of a target page.
#[derive(Clone, Copy, Debug)]
pub struct Title {
    /// Prefix of the progress line reporting the observed title.
    pub label: &'static str,
    /// Substring the title must contain.
    pub expect: &'static str,
    /// Progress line printed once the title has been checked, if any.
    pub verified: Option<&'static str>,
}

/// A single (selector, expected-substring) assertion against rendered page text.
#[derive(Clone, Copy, Debug)]
pub struct Check {
    /// Locator of the element whose text is inspected.
    pub selector: Locator<'static>,
    /// Substring the element's rendered text must contain.
    pub expect: &'static str,
}

/// A group of checks reported by a single progress line.
#[derive(Clone, Copy, Debug)]
pub struct Group {
    /// Progress line printed once every check in the group has passed.
    pub verified: &'static str,
    /// The checks themselves, evaluated in order.
    pub checks: &'static [Check],
}

/// A target page: how to reach it and what must hold on it.
#[derive(Clone, Copy, Debug)]
pub struct Page {
    /// File name of the page, relative to the site base URL.
    pub file: &'static str,
    /// How the page is reached.
    pub nav: Nav,
    /// Title expectation, if any.
    pub title: Option<Title>,
    /// Grouped element checks, evaluated in order.
    pub groups: &'static [Group],
    /// File stem of the page's screenshot.
    pub screenshot: &'static str,
}

/// The footer slogan shared by the home and services pages.
const SLOGAN: &str = "DTECH empowering the youth through digital innovation";

/// The verification sequence, in execution order.
pub const PAGES: &[Page] = &[
    Page {
        file: "index.html",
        nav: Nav::Direct,
        title: Some(Title {
            label: "Page title",
            expect: "DTECH - Student Marketplace",
            verified: Some("Title verified"),
        }),
        groups: &[
            Group {
                verified: "Header verified",
                checks: &[
                    Check {
                        selector: Locator::Css("header h1"),
                        expect: "DTECH",
                    },
                    Check {
                        selector: Locator::Css("header p"),
                        expect: "The Student Marketplace",
                    },
                ],
            },
            Group {
                verified: "Footer verified",
                checks: &[
                    Check {
                        selector: Locator::Css("footer"),
                        expect: SLOGAN,
                    },
                    Check {
                        selector: Locator::Css("footer"),
                        expect: "2026 DTECH",
                    },
                ],
            },
        ],
        screenshot: "index_screenshot",
    },
    Page {
        file: "about.html",
        nav: Nav::Link("About Us"),
        title: Some(Title {
            label: "About Page title",
            expect: "About DTECH",
            verified: None,
        }),
        groups: &[Group {
            verified: "About content verified",
            checks: &[
                Check {
                    selector: Locator::Css(".section"),
                    expect: "DTECH Book Exchange is a student-focused platform",
                },
                Check {
                    selector: Locator::Css(".ecosystem-highlight"),
                    expect: "PREASX24",
                },
            ],
        }],
        screenshot: "about_screenshot",
    },
    Page {
        file: "services.html",
        nav: Nav::Direct,
        title: None,
        groups: &[Group {
            verified: "Services footer verified",
            checks: &[Check {
                selector: Locator::Css("footer"),
                expect: SLOGAN,
            }],
        }],
        screenshot: "services_screenshot",
    },
];

/// Walks [`PAGES`] against a live browser session.
#[derive(Clone, Debug)]
pub struct Verifier {
    base: Url,
    out: PathBuf,
}

impl Verifier {
    /// Create a verifier for the site served at `base`, saving screenshots under `out`.
    pub fn new(base: &str, out: impl Into<PathBuf>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: base.parse()?,
            out: out.into(),
        })
    }

    /// Run the whole verification sequence, reporting progress on stdout.
    ///
    /// Returns on the first violated check or failed command, leaving the
    /// remaining targets unvisited. Screenshot files are overwritten on each
    /// run; paths are deterministic.
    pub async fn run(&self, c: &mut Client) -> Result<(), VerifyError> {
        self.run_to(c, &mut io::stdout()).await
    }

    /// Run the whole verification sequence, reporting progress to `w`.
    ///
    /// One line is written per completed step, in sequence order: a
    /// navigation announcement per page, the observed title, a `… verified`
    /// line per passed title and check group, and a `Screenshot saved: …`
    /// line per captured page. A violated check truncates the stream at the
    /// last step that passed.
    pub async fn run_to<W: Write>(&self, c: &mut Client, w: &mut W) -> Result<(), VerifyError> {
        tokio::fs::create_dir_all(&self.out)
            .await
            .map_err(VerifyError::Screenshot)?;
        for page in PAGES {
            self.verify_page(c, page, w).await?;
        }
        Ok(())
    }

    async fn verify_page<W: Write>(
        &self,
        c: &mut Client,
        page: &Page,
        w: &mut W,
    ) -> Result<(), VerifyError> {
        match page.nav {
            Nav::Direct => {
                let url = self.base.join(page.file)?;
                c.goto(url.as_str()).await?;
                writeln!(w, "Navigated to {}", page.file).map_err(VerifyError::Progress)?;
            }
            Nav::Link(label) => {
                let here = c.current_url().await?;
                c.find(Locator::LinkText(label)).await?.click().await?;
                c.wait_for_navigation(here).await?;
            }
        }

        if let Some(title) = page.title {
            let actual = c.title().await?;
            writeln!(w, "{}: {}", title.label, actual).map_err(VerifyError::Progress)?;
            if !actual.contains(title.expect) {
                return Err(VerifyError::Title {
                    page: page.file,
                    expected: title.expect,
                    actual,
                });
            }
            if let Some(line) = title.verified {
                writeln!(w, "{}", line).map_err(VerifyError::Progress)?;
            }
            // link-reached pages only announce themselves once the title matches
            if let Nav::Link(..) = page.nav {
                writeln!(w, "Navigated to {}", page.file).map_err(VerifyError::Progress)?;
            }
        }

        for group in page.groups {
            for check in group.checks {
                let mut element = c.find(check.selector).await?;
                let actual = element.text().await?;
                if !actual.contains(check.expect) {
                    return Err(VerifyError::Text {
                        page: page.file,
                        selector: selector_text(check.selector),
                        expected: check.expect,
                        actual,
                    });
                }
            }
            writeln!(w, "{}", group.verified).map_err(VerifyError::Progress)?;
        }

        let png = c.screenshot().await?;
        let path = self.screenshot_path(page.screenshot);
        tokio::fs::write(&path, png)
            .await
            .map_err(VerifyError::Screenshot)?;
        writeln!(w, "Screenshot saved: {}", path.display()).map_err(VerifyError::Progress)?;
        Ok(())
    }

    /// Take a best-effort diagnostic screenshot of whatever page the session
    /// is on.
    ///
    /// Meant to be called once, right after [`Verifier::run`] has failed and
    /// before the session is torn down. Failures are swallowed: the page may
    /// be in an unrecoverable state, and the diagnostic must not mask the
    /// original error.
    pub async fn capture_failure(&self, c: &mut Client) {
        if let Ok(png) = c.screenshot().await {
            let _ = tokio::fs::create_dir_all(&self.out).await;
            let _ = tokio::fs::write(self.screenshot_path("error_screenshot"), png).await;
        }
    }

    fn screenshot_path(&self, stem: &str) -> PathBuf {
        self.out.join(format!("{}.png", stem))
    }
}

fn selector_text(l: Locator<'_>) -> String {
    match l {
        Locator::Css(s) => s.to_string(),
        Locator::LinkText(s) => format!("link text {:?}", s),
    }
}
