//! Blocking HTTP client with transient-error retries for the Bugs! APIs.
//!
//! This module wraps `reqwest::blocking::Client` and adds:
//! * The Android app's `User-Agent` on every request
//! * Connection reuse across calls
//! * Retries with exponential backoff on transient failures
//!
//! # Retries
//!
//! Requests are retried when the vendor answers with one of
//! [`Client::TRANSIENT_STATUS`] or when the connection fails or times out.
//! This includes `POST` requests: every `POST` endpoint of the catalog API
//! is a read-only "invoke" call, so repeating one is harmless.
//!
//! # Example
//!
//! ```rust
//! use bugsdl::{config::Config, http::Client};
//! use reqwest::Method;
//!
//! let client = Client::new(&Config::default())?;
//! let request = client.request(Method::GET, url).build()?;
//! let response = client.execute(request)?;
//! ```

use std::{thread, time::Duration};

use exponential_backoff::Backoff;
use reqwest::{
    blocking::{Request, RequestBuilder, Response},
    Method, StatusCode, Url,
};

use crate::{
    config::Config,
    error::{Error, ErrorKind, Result},
};

/// HTTP client with built-in retries.
pub struct Client {
    inner: reqwest::blocking::Client,
    retry: RetryPolicy,
}

/// Transport-level retry behavior for transient failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub retries: u32,

    /// Sleep before the first retry; doubles on every following one.
    pub backoff: Duration,

    /// Upper bound for a single sleep.
    pub max_backoff: Duration,
}

impl Client {
    /// Status codes that are worth another try.
    pub const TRANSIENT_STATUS: [StatusCode; 5] = [
        StatusCode::TOO_MANY_REQUESTS,
        StatusCode::INTERNAL_SERVER_ERROR,
        StatusCode::BAD_GATEWAY,
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::GATEWAY_TIMEOUT,
    ];

    /// Duration to keep idle connections alive.
    const KEEPALIVE_TIMEOUT: Duration = Duration::from_secs(60);

    /// Creates a new client for the configured user agent and retry policy.
    ///
    /// Connect and read timeouts are left at the transport defaults.
    ///
    /// # Errors
    ///
    /// Returns error if the TLS backend cannot be initialized or the user
    /// agent is not a valid header value.
    pub fn new(config: &Config) -> Result<Self> {
        let inner = reqwest::blocking::Client::builder()
            .tcp_keepalive(Self::KEEPALIVE_TIMEOUT)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner,
            retry: config.retry,
        })
    }

    /// Starts building a request with specified method and URL.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.inner.request(method, url)
    }

    #[must_use]
    pub fn is_transient(status: StatusCode) -> bool {
        Self::TRANSIENT_STATUS.contains(&status)
    }

    /// Executes a request, retrying it on transient failures.
    ///
    /// When all retries are exhausted on a transient status, the last
    /// response is returned so that the caller can report its body.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// * The request body cannot be cloned for a retry
    /// * The connection still fails after the last retry
    pub fn execute(&self, request: Request) -> Result<Response> {
        self.retry.run(
            || {
                let request = request
                    .try_clone()
                    .ok_or_else(|| Error::internal("request body cannot be retried"))?;
                trace!("{} {}", request.method(), request.url().path());
                self.inner.execute(request).map_err(Into::into)
            },
            |result| match result {
                Ok(response) => Self::is_transient(response.status()),
                Err(e) => matches!(e.kind, ErrorKind::Unavailable | ErrorKind::DeadlineExceeded),
            },
        )
    }
}

impl RetryPolicy {
    /// Calls `send` until `should_retry` rejects its result or the retries
    /// run out, sleeping with exponential backoff in between.
    ///
    /// The result of the final attempt is returned as is, whether or not
    /// `should_retry` would have wanted another go.
    pub fn run<T, F, P>(&self, mut send: F, should_retry: P) -> Result<T>
    where
        F: FnMut() -> Result<T>,
        P: Fn(&Result<T>) -> bool,
    {
        for (attempt, duration) in self.delays().into_iter().enumerate() {
            let result = send();
            if !should_retry(&result) {
                return result;
            }

            warn!(
                "transient failure on attempt {}; retrying in {:.1}s",
                attempt + 1,
                duration.as_secs_f32()
            );
            thread::sleep(duration);
        }

        send()
    }

    /// Sleeps before each retry, in order. There are exactly
    /// [`retries`](Self::retries) of them.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        let mut backoff = Backoff::new(
            self.retries.saturating_add(1),
            self.backoff,
            self.max_backoff,
        );
        backoff.set_jitter(0.0);

        // The last attempt comes without a sleep.
        (&backoff)
            .into_iter()
            .flatten()
            .take(self.retries as usize)
            .collect()
    }
}

impl Default for RetryPolicy {
    /// Ten retries on a 0.4 second base that doubles up to two minutes.
    fn default() -> Self {
        Self {
            retries: 10,
            backoff: Duration::from_millis(400),
            max_backoff: Duration::from_secs(120),
        }
    }
}
