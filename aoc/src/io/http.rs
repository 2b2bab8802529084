//! HTTP access to the puzzle site.
//!
//! The [`ContentFetcher`] trait decouples the workflows from the transport.
//! Tests use a scripted fetcher that returns canned pages without touching
//! the network. Every call is a single attempt; failures surface as
//! [`HttpFailure`].

use anyhow::{Result, anyhow};
use reqwest::blocking::{Client, Response};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};
use tracing::{debug, instrument};

use crate::core::error::HttpFailure;
use crate::core::problem_parser::SITE_URL;
use crate::core::types::ProblemLevel;
use crate::io::console::{Reporter, emphasize};

const USER_AGENT: &str = concat!("aoc/", env!("CARGO_PKG_VERSION"));

/// Puzzle site operations consumed by the workflows.
pub trait ContentFetcher {
    /// Raw HTML of the problem page.
    fn fetch_problem_page(&self, year: u16, day: u8) -> Result<String>;
    /// Raw puzzle input, untouched.
    fn fetch_problem_input(&self, year: u16, day: u8) -> Result<String>;
    /// Post an answer and return the response HTML.
    fn submit_answer(&self, year: u16, day: u8, level: ProblemLevel, answer: &str)
    -> Result<String>;
}

/// Blocking `reqwest` client carrying the session cookie.
pub struct HttpFetcher {
    client: Client,
    base_url: String,
    reporter: Reporter,
}

impl HttpFetcher {
    pub fn new(session_cookie: &str, reporter: Reporter) -> Result<Self> {
        Self::with_base_url(session_cookie, SITE_URL, reporter)
    }

    pub fn with_base_url(session_cookie: &str, base_url: &str, reporter: Reporter) -> Result<Self> {
        let mut cookie = HeaderValue::from_str(&format!("session={session_cookie}"))
            .map_err(|_| anyhow!("session cookie contains invalid header characters"))?;
        cookie.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, cookie);

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            reporter,
        })
    }

    #[instrument(skip(self))]
    fn get(&self, path: &str) -> Result<String> {
        let url = format!("{}/{path}", self.base_url);
        self.reporter
            .info(&format!("Fetching content from {}...", emphasize(&url)));
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|err| transport_failure(&url, &err))?;
        Ok(read_body(&url, response)?)
    }
}

impl ContentFetcher for HttpFetcher {
    fn fetch_problem_page(&self, year: u16, day: u8) -> Result<String> {
        self.get(&format!("{year}/day/{day}"))
    }

    fn fetch_problem_input(&self, year: u16, day: u8) -> Result<String> {
        self.get(&format!("{year}/day/{day}/input"))
    }

    #[instrument(skip(self, answer))]
    fn submit_answer(
        &self,
        year: u16,
        day: u8,
        level: ProblemLevel,
        answer: &str,
    ) -> Result<String> {
        let level_value = level
            .submit_value()
            .ok_or_else(|| anyhow!("cannot submit an answer for level {level}"))?;
        let url = format!("{}/{year}/day/{day}/answer", self.base_url);
        debug!(%url, level = level_value, "submitting answer");
        let response = self
            .client
            .post(&url)
            .form(&[("level", level_value), ("answer", answer)])
            .send()
            .map_err(|err| transport_failure(&url, &err))?;
        Ok(read_body(&url, response)?)
    }
}

fn transport_failure(url: &str, err: &reqwest::Error) -> HttpFailure {
    HttpFailure {
        url: url.to_string(),
        status: err.status().map(|s| s.as_u16()),
        reason: Some(err.to_string()),
    }
}

fn read_body(url: &str, response: Response) -> Result<String, HttpFailure> {
    let status = response.status();
    if !status.is_success() {
        return Err(HttpFailure {
            url: url.to_string(),
            status: Some(status.as_u16()),
            reason: status.canonical_reason().map(str::to_string),
        });
    }
    response.text().map_err(|err| HttpFailure {
        url: url.to_string(),
        status: Some(status.as_u16()),
        reason: Some(err.to_string()),
    })
}
