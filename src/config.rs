use url::Url;

use crate::{error::Result, http::RetryPolicy};

/// Runtime configuration of the Bugs! module.
///
/// The defaults mirror what the Android app sends. Tests override the base
/// URLs to point at a local mock server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// `User-Agent` of the Android app build we present ourselves as.
    pub user_agent: String,

    /// Base of the account host (`login`, `right`).
    pub auth_url: Url,

    /// Base of the catalog host (`multi/invoke/map`, `track/..`, `search/..`).
    pub api_url: Url,

    /// Requested cover resolution in pixels.
    pub cover_size: u32,

    pub retry: RetryPolicy,
}

impl Config {
    pub const USER_AGENT: &'static str =
        "Mobile|Bugs|5.03.33|Android|12|Pixel 6|Google|market|105033301";

    pub const AUTH_URL: &'static str = "https://secure.bugs.co.kr/api/5/";

    pub const API_URL: &'static str = "https://mapi.bugs.co.kr/music/5/";

    /// Cover resolution used when the host does not ask for one.
    pub const DEFAULT_COVER_SIZE: u32 = 1400;

    /// Creates a configuration that talks to the given hosts instead of the
    /// production ones.
    ///
    /// Both URLs are treated as directories: a missing trailing slash is
    /// added so that endpoint paths are joined below them.
    ///
    /// # Errors
    ///
    /// Will return `Err` if either URL fails to parse.
    pub fn with_hosts(auth_url: &str, api_url: &str) -> Result<Self> {
        Ok(Self {
            auth_url: directory_url(auth_url)?,
            api_url: directory_url(api_url)?,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_cover_size(mut self, cover_size: u32) -> Self {
        self.cover_size = cover_size;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: Self::USER_AGENT.to_owned(),
            auth_url: Url::parse(Self::AUTH_URL).expect("invalid auth url"),
            api_url: Url::parse(Self::API_URL).expect("invalid api url"),
            cover_size: Self::DEFAULT_COVER_SIZE,
            retry: RetryPolicy::default(),
        }
    }
}

fn directory_url(url: &str) -> Result<Url> {
    if url.ends_with('/') {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse(&format!("{url}/"))?)
    }
}
