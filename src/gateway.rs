//! Client for the Bugs! mobile API.
//!
//! Talks to two hosts:
//! * The account host, for login and entitlement
//! * The catalog host, for everything else
//!
//! Every request carries the app's `User-Agent`, a bearer token once logged
//! in, and the session's `device_id` as a query parameter.

use std::time::SystemTime;

use reqwest::{
    blocking::RequestBuilder,
    header::{HeaderValue, AUTHORIZATION},
    Method, StatusCode,
};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::{
    config::Config,
    error::{Error, Result},
    http::Client as HttpClient,
    id::Id,
    protocol::{
        self,
        auth::{self, Account, Login, Right},
        catalog::{Album, Artist, Image, Track, Video},
        invoke::{self, Call},
        lyrics::{self, Lyrics},
        search::{self, Category, Combined, Listing},
        streaming::{self, Stream},
    },
    quality::Bitrate,
    session::{Session, Tokens},
};

pub struct Gateway {
    http_client: HttpClient,
    auth_url: Url,
    api_url: Url,
    session: Session,
}

/// `artist` and `artist_image` blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtistDetail {
    pub artist: Artist,
    pub images: Vec<Image>,
}

/// `album`, `album_artist_role` and `album_image` blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct AlbumDetail {
    pub album: Album,
    /// Credits; their shape varies per album so they are kept as sent.
    pub roles: Vec<Value>,
    pub images: Vec<Image>,
}

/// `track` and `track_artist_role` blocks.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackDetail {
    pub track: Track,
    pub roles: Vec<Value>,
}

impl Gateway {
    const DEVICE_MODEL: &'static str = "android";

    const MULTI_INVOKE: &'static str = "multi/invoke/map";

    /// Listings are requested in one page this large.
    pub const MAX_PAGE_SIZE: u32 = 9999;

    /// Creates a client for the configured hosts, acting as `session`.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the HTTP client cannot be created.
    pub fn new(config: &Config, session: Session) -> Result<Self> {
        Ok(Self {
            http_client: HttpClient::new(config)?,
            auth_url: config.auth_url.clone(),
            api_url: config.api_url.clone(),
            session,
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    /// Adds the headers and parameters every request needs.
    ///
    /// The `device_id` goes last, after any endpoint parameters.
    fn prepare(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let mut request = request.query(&[("device_id", self.session.device_id.as_str())]);
        if let Some(token) = self.session.access_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::invalid_argument(e.to_string()))?;
            value.set_sensitive(true);
            request = request.header(AUTHORIZATION, value);
        }
        Ok(request)
    }

    /// Sends a request and returns status and body.
    fn send(&self, request: RequestBuilder) -> Result<(StatusCode, String)> {
        let request = self.prepare(request)?.build()?;
        let response = self.http_client.execute(request)?;
        let status = response.status();
        let body = response.text()?;
        Ok((status, body))
    }

    /// Logs in with username and password.
    ///
    /// On success the new tokens replace those in the session.
    ///
    /// # Errors
    ///
    /// Will return `Err` if:
    /// - the credentials are rejected (`Unauthenticated`)
    /// - the vendor answers without tokens
    /// - the HTTP request fails
    pub fn authenticate(&mut self, username: &str, password: &str) -> Result<&Tokens> {
        let url = self.auth_url.join("login")?;
        let device_id = self.session.device_id.clone();
        let request = self.http_client.request(Method::POST, url).query(&[
            ("capText", ""),
            ("device_model", Self::DEVICE_MODEL),
            ("key", ""),
            ("passwd", password),
            ("udid", device_id.as_str()),
            ("userid", username),
        ]);

        let (_, body) = self.send(request)?;
        let login: Login = protocol::json(&body, "login")?;
        if login.ret_code == auth::RET_CODE_INVALID_CREDENTIALS {
            return Err(Error::unauthenticated("invalid username or password"));
        }

        let token = login.result.map(|result| result.token).ok_or_else(|| {
            Error::unavailable(login.ret_msg.unwrap_or_else(|| "login failed".to_owned()))
        })?;

        debug!("logged in; token valid for {}s", token.expires_in.as_secs());
        let tokens = self.session.tokens.insert(Tokens {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_at: SystemTime::now() + token.expires_in,
        });

        Ok(&*tokens)
    }

    /// Fetches the account's entitlement.
    ///
    /// # Errors
    ///
    /// Will return `Err` with the vendor's message if it does not report
    /// success, or if the HTTP request fails.
    pub fn account(&self) -> Result<Account> {
        let url = self.auth_url.join("right")?;
        let request = self
            .http_client
            .request(Method::POST, url)
            .query(&[("device_model", Self::DEVICE_MODEL)]);

        let (_, body) = self.send(request)?;
        let right: Right = protocol::json(&body, "right")?;
        if right.ret_code != auth::RET_CODE_OK {
            return Err(Error::unavailable(
                right
                    .ret_msg
                    .unwrap_or_else(|| format!("account check failed ({})", right.ret_code)),
            ));
        }

        Ok(right.result.unwrap_or_default())
    }

    /// Calls a catalog endpoint and parses the JSON response.
    ///
    /// # Errors
    ///
    /// Will return `Err` if:
    /// - `method` is not `GET` or `POST` (`InvalidArgument`)
    /// - the status is not 200, 201 or 202, with the body as message
    /// - the body does not parse as `T`
    pub fn call<T>(
        &self,
        method: Method,
        endpoint: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T>
    where
        T: std::fmt::Debug + for<'de> Deserialize<'de>,
    {
        if method != Method::GET && method != Method::POST {
            return Err(Error::invalid_argument(format!(
                "method {method} must be one of GET, POST"
            )));
        }

        let url = self.api_url.join(endpoint)?;
        let mut request = self.http_client.request(method, url).query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let (status, body) = self.send(request)?;
        if !matches!(status.as_u16(), 200..=202) {
            return Err(Error::unavailable(body));
        }

        protocol::json(&body, endpoint)
    }

    /// Sends a batch of sub-requests in one call.
    ///
    /// # Errors
    ///
    /// Will return `Err` under the same conditions as [`Self::call`].
    pub fn invoke(&self, method: Method, calls: &[Call]) -> Result<invoke::Response> {
        let body = serde_json::to_value(calls)?;
        self.call(method, Self::MULTI_INVOKE, &[], Some(&body))
    }

    pub fn artist(&self, artist_id: Id) -> Result<ArtistDetail> {
        let response = self.invoke(
            Method::POST,
            &[
                Call::new(
                    "artist",
                    json!({ "artist_id": artist_id, "result_type": "DETAIL" }),
                ),
                Call::new("artist_image", json!({ "artist_id": artist_id })),
            ],
        )?;

        Ok(ArtistDetail {
            artist: response.result(0, "artist")?,
            images: response.list(1, "artist_image")?,
        })
    }

    pub fn artist_tracks(&self, artist_id: Id, page: u32, size: u32) -> Result<Vec<Track>> {
        self.invoke(
            Method::POST,
            &[Call::new(
                "artist_track",
                json!({
                    "artist_id": artist_id,
                    "filter": "ALL",
                    "page": page,
                    "result_type": "LIST",
                    "size": size,
                    "sort": "POPULAR",
                }),
            )],
        )?
        .list(0, "artist_track")
    }

    pub fn artist_albums(&self, artist_id: Id, page: u32, size: u32) -> Result<Vec<Album>> {
        self.artist_album_listing("artist_album_filter_release", artist_id, page, size)
    }

    /// Compilations and other albums the artist appears on.
    pub fn artist_compilation_albums(
        &self,
        artist_id: Id,
        page: u32,
        size: u32,
    ) -> Result<Vec<Album>> {
        self.artist_album_listing("artist_album_filter_joincompil", artist_id, page, size)
    }

    fn artist_album_listing(
        &self,
        id: &'static str,
        artist_id: Id,
        page: u32,
        size: u32,
    ) -> Result<Vec<Album>> {
        self.invoke(
            Method::POST,
            &[Call::new(
                id,
                json!({
                    "artist_id": artist_id,
                    "page": page,
                    "result_type": "LIST",
                    "size": size,
                    "sort": "recent",
                }),
            )],
        )?
        .list(0, id)
    }

    pub fn artist_videos(&self, artist_id: Id, page: u32, size: u32) -> Result<Vec<Video>> {
        self.invoke(
            Method::POST,
            &[Call::new(
                "artist_mv",
                json!({
                    // This one wants a comma-separated string of ids.
                    "artist_ids": artist_id.to_string(),
                    "filter": "ALL",
                    "page": page,
                    "result_type": "LIST",
                    "size": size,
                    "sort": "recent",
                }),
            )],
        )?
        .list(0, "artist_mv")
    }

    pub fn album(&self, album_id: Id) -> Result<AlbumDetail> {
        let response = self.invoke(
            Method::POST,
            &[
                Call::new(
                    "album",
                    json!({ "album_id": album_id, "result_type": "DETAIL" }),
                ),
                Call::new("album_artist_role", json!({ "album_id": album_id })),
                Call::new("album_image", json!({ "album_id": album_id })),
            ],
        )?;

        Ok(AlbumDetail {
            album: response.result(0, "album")?,
            roles: response.list(1, "album_artist_role")?,
            images: response.list(2, "album_image")?,
        })
    }

    pub fn album_tracks(&self, album_id: Id) -> Result<Vec<Track>> {
        self.invoke(
            Method::POST,
            &[Call::new(
                "album_track",
                json!({ "album_id": album_id, "result_type": "LIST" }),
            )],
        )?
        .list(0, "album_track")
    }

    pub fn track(&self, track_id: Id) -> Result<TrackDetail> {
        let response = self.invoke(
            Method::POST,
            &[
                Call::new(
                    "track",
                    json!({ "track_id": track_id, "result_type": "DETAIL" }),
                ),
                Call::new("track_artist_role", json!({ "track_id": track_id })),
            ],
        )?;

        Ok(TrackDetail {
            track: response.result(0, "track")?,
            roles: response.list(1, "track_artist_role")?,
        })
    }

    /// Lyrics of a track, if it has any.
    pub fn lyrics(&self, track_id: Id) -> Result<Option<Lyrics>> {
        let response: lyrics::Response =
            self.call(Method::GET, &format!("track/{track_id}/lyrics"), &[], None)?;
        Ok(response.result)
    }

    /// Resolves the stream of a track in the given encoding.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails or the response has no
    /// `result`. A `result` with a state other than `OK` is not an error
    /// here; see [`Stream::is_ok`].
    pub fn stream(&self, track_id: Id, bitrate: Bitrate) -> Result<Stream> {
        let response: streaming::Response = self.call(
            Method::GET,
            &format!("play/track/{track_id}/streaming"),
            &[
                ("bitrate", bitrate.to_string()),
                ("wwan", "N".to_owned()),
                ("overwrite_session", "Y".to_owned()),
            ],
            None,
        )?;

        response
            .result
            .ok_or_else(|| Error::data_loss("streaming: response has no result"))
    }

    /// Searches tracks, albums and artists at once.
    pub fn search(&self, query: &str) -> Result<Combined> {
        // The app sends this batch as a GET with a body.
        self.invoke(
            Method::GET,
            &[Call::new(search::COMBINE, json!({ "query": query }))],
        )?
        .result(0, search::COMBINE)
    }

    /// Searches a single category, one page at a time.
    pub fn search_category<T>(
        &self,
        query: &str,
        category: Category,
        page: u32,
        size: u32,
    ) -> Result<Vec<T>>
    where
        T: std::fmt::Debug + serde::de::DeserializeOwned,
    {
        let listing: Listing<T> = self.call(
            Method::GET,
            &format!("search/{category}"),
            &[
                ("query", query.to_owned()),
                ("page", page.to_string()),
                ("size", size.to_string()),
                ("sort", "exact".to_owned()),
                ("flac_str_only", "N".to_owned()),
            ],
            None,
        )?;

        Ok(listing.list)
    }
}
