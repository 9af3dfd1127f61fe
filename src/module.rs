//! The Bugs! module as seen by the downloader host.
//!
//! [`Bugs`] owns the vendor client and the host's settings store. It keeps the
//! session in sync with the store, enforces the VIP entitlement and maps
//! vendor payloads onto the host's records.
//!
//! # Session lifecycle
//!
//! On construction the session is restored from the settings store:
//! * A device id is created on the very first run and reused afterwards
//! * With a valid access token, the entitlement is checked right away
//! * With an expired one, the refresh path runs
//!
//! The vendor's refresh flow is not implemented. The refresh path only
//! persists the tokens it has, which leaves the session unauthenticated until
//! the next [`Bugs::login`].

use std::collections::HashMap;

use crate::{
    artwork,
    config::Config,
    date,
    error::{Error, Result},
    gateway::Gateway,
    host::{
        AlbumInfo, ArtistInfo, DownloadRequest, DownloadType, ExtraData, LyricsInfo, Module,
        ModuleInformation, ModuleModes, QualityTier, QueryType, SearchResult, Tags,
        TrackDownloadInfo, TrackInfo,
    },
    id::Id,
    lyrics,
    protocol::{
        catalog::{Album, Artist, Track, Video},
        search::Category,
    },
    quality::{self, SAMPLE_RATE},
    session::Session,
    store::Settings,
};

/// Badge on search results that can be downloaded losslessly.
pub const LOSSLESS: &str = "LOSSLESS";

pub struct Bugs<S: Settings> {
    gateway: Gateway,
    settings: S,
    cover_size: u32,
}

impl<S: Settings> Bugs<S> {
    /// Restores the session from `settings` and creates the module.
    ///
    /// # Errors
    ///
    /// Will return `Err` if:
    /// - the settings store cannot persist a new device id
    /// - a restored session belongs to an account without VIP entitlement
    /// - the entitlement check fails
    pub fn new(config: &Config, mut settings: S) -> Result<Self> {
        let session = Session::load(&mut settings)?;
        let gateway = Gateway::new(config, session)?;

        let mut bugs = Self {
            gateway,
            settings,
            cover_size: config.cover_size,
        };

        bugs.bootstrap()?;
        Ok(bugs)
    }

    fn bootstrap(&mut self) -> Result<()> {
        let Some(tokens) = self.gateway.session().tokens.as_ref() else {
            debug!("no session found");
            return Ok(());
        };

        if tokens.is_expired() {
            self.refresh_token()
        } else {
            debug!(
                "restored session valid for {}s",
                tokens.time_to_live().as_secs()
            );
            self.validate_account()
        }
    }

    /// Logs in, checks the entitlement and persists the session.
    ///
    /// Nothing is persisted when the account is not entitled.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the credentials are rejected, the account is not
    /// a VIP account, or the session cannot be persisted.
    pub fn login(&mut self, username: &str, password: &str) -> Result<()> {
        debug!("logging in");
        self.gateway.authenticate(username, password)?;
        self.validate_account()?;
        self.gateway.session().save(&mut self.settings)
    }

    /// Fails unless the account is a VIP account.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the account check fails, or with
    /// `PermissionDenied` for any other membership level.
    pub fn validate_account(&self) -> Result<()> {
        let account = self.gateway.account()?;
        if account.is_vip() {
            Ok(())
        } else {
            debug!("membership level: {}", account.level().unwrap_or("none"));
            Err(Error::permission_denied("VIP account required"))
        }
    }

    /// Persists the current tokens as they are.
    ///
    /// The vendor's refresh flow is unknown; the tokens stay expired.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the session cannot be persisted.
    pub fn refresh_token(&mut self) -> Result<()> {
        warn!("access token expired and cannot be refreshed; log in again");
        self.gateway.session().save(&mut self.settings)
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        self.gateway.session()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.gateway.session().is_authenticated()
    }

    #[must_use]
    pub fn settings(&self) -> &S {
        &self.settings
    }

    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// One page of a single-category search.
    ///
    /// Pages start at 1.
    ///
    /// # Errors
    ///
    /// Will return `Err` with `Unimplemented` for playlists, or if the
    /// request fails.
    pub fn search_page(
        &self,
        query_type: QueryType,
        query: &str,
        page: u32,
        size: u32,
    ) -> Result<Vec<SearchResult>> {
        Ok(match query_type {
            QueryType::Track => self
                .gateway
                .search_category::<Track>(query, Category::Track, page, size)?
                .into_iter()
                .map(track_result)
                .collect(),
            QueryType::Album => self
                .gateway
                .search_category::<Album>(query, Category::Album, page, size)?
                .into_iter()
                .map(album_result)
                .collect(),
            QueryType::Artist => self
                .gateway
                .search_category::<Artist>(query, Category::Artist, page, size)?
                .into_iter()
                .map(artist_result)
                .collect(),
            QueryType::Playlist => return Err(unsupported_query(query_type)),
        })
    }

    /// Music videos of an artist.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the request fails.
    pub fn artist_videos(&self, artist_id: Id) -> Result<Vec<Video>> {
        self.gateway
            .artist_videos(artist_id, 1, Gateway::MAX_PAGE_SIZE)
    }

    fn cover_url(&self, album: &Album) -> Option<String> {
        album
            .image
            .as_ref()
            .filter(|image| !image.path.is_empty())
            .map(|image| artwork::url(&image.path, self.cover_size))
    }
}

impl<S: Settings> Module for Bugs<S> {
    fn information() -> ModuleInformation {
        ModuleInformation {
            service_name: "Bugs",
            modes: ModuleModes {
                download: true,
                covers: true,
                lyrics: true,
                credits: false,
            },
            session_settings: &["username", "password"],
            session_storage_variables: &Session::STORAGE_KEYS,
            netlocation_constant: "bugs",
            test_url: "https://music.bugs.co.kr/track/5311931",
        }
    }

    fn search(
        &mut self,
        query_type: QueryType,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        if query_type == QueryType::Playlist {
            return Err(unsupported_query(query_type));
        }

        let combined = self.gateway.search(query)?;
        let results = match query_type {
            QueryType::Track => combined
                .track
                .list
                .into_iter()
                .take(limit)
                .map(track_result)
                .collect(),
            QueryType::Album => combined
                .album
                .list
                .into_iter()
                .take(limit)
                .map(album_result)
                .collect(),
            QueryType::Artist => combined
                .artist
                .list
                .into_iter()
                .take(limit)
                .map(artist_result)
                .collect(),
            QueryType::Playlist => Vec::new(),
        };

        Ok(results)
    }

    fn get_artist_info(&mut self, artist_id: Id, get_credited_albums: bool) -> Result<ArtistInfo> {
        let detail = self.gateway.artist(artist_id)?;
        let tracks = self
            .gateway
            .artist_tracks(artist_id, 1, Gateway::MAX_PAGE_SIZE)?;
        let mut albums = self
            .gateway
            .artist_albums(artist_id, 1, Gateway::MAX_PAGE_SIZE)?;

        if get_credited_albums {
            albums.extend(self.gateway.artist_compilation_albums(
                artist_id,
                1,
                Gateway::MAX_PAGE_SIZE,
            )?);
        }

        Ok(ArtistInfo {
            name: detail.artist.artist_nm,
            tracks: tracks.iter().map(|track| track.track_id).collect(),
            track_extra: ExtraData {
                tracks: keyed(tracks, |track| track.track_id),
                ..ExtraData::default()
            },
            albums: albums.iter().map(|album| album.album_id).collect(),
            album_extra: ExtraData {
                albums: keyed(albums, |album| album.album_id),
                ..ExtraData::default()
            },
        })
    }

    /// Listings lack most of the album's tags, so the album is always
    /// fetched, even when `extra` has it.
    fn get_album_info(&mut self, album_id: Id, _extra: Option<&ExtraData>) -> Result<AlbumInfo> {
        let album = self.gateway.album(album_id)?.album;
        let tracks = self.gateway.album_tracks(album_id)?;

        let main_artist = album.main_artist();
        let info = AlbumInfo {
            name: album.title.clone(),
            release_year: album.release_ymd().and_then(date::year),
            cover_url: self.cover_url(&album),
            artist: main_artist
                .map(|artist| artist.artist_nm.clone())
                .unwrap_or_default(),
            artist_id: main_artist.map(|artist| artist.artist_id),
            tracks: tracks.iter().map(|track| track.track_id).collect(),
            track_extra: ExtraData {
                tracks: keyed(tracks, |track| track.track_id),
                albums: HashMap::from([(album_id, album)]),
            },
        };

        Ok(info)
    }

    fn get_track_info(
        &mut self,
        track_id: Id,
        quality_tier: QualityTier,
        extra: Option<&ExtraData>,
    ) -> Result<TrackInfo> {
        let track = match extra.and_then(|extra| extra.track(track_id)) {
            Some(track) => track.clone(),
            None => self.gateway.track(track_id)?.track,
        };

        let album_id = track.album.album_id;
        let album = match extra.and_then(|extra| extra.album(album_id)) {
            Some(album) => album.clone(),
            None => self.gateway.album(album_id)?.album,
        };

        let bitrate = quality::resolve(quality_tier, &track.bitrates);
        let error = (!track.is_streamable())
            .then(|| format!("track \"{}\" is not streamable", track.track_title));

        Ok(TrackInfo {
            name: track.track_title.clone(),
            album: album.title.clone(),
            album_id: album.album_id,
            artists: track
                .artists
                .iter()
                .map(|artist| artist.artist_nm.clone())
                .collect(),
            artist_id: track.main_artist().map(|artist| artist.artist_id),
            release_year: album.release_ymd().and_then(date::year),
            bitrate: bitrate.kbps(),
            sample_rate: SAMPLE_RATE,
            bit_depth: bitrate.bit_depth(),
            cover_url: self.cover_url(&album),
            tags: tags(&track, &album),
            codec: bitrate.codec(),
            download: DownloadRequest { track_id, bitrate },
            error,
        })
    }

    fn get_track_download(&mut self, request: DownloadRequest) -> Result<TrackDownloadInfo> {
        let stream = self.gateway.stream(request.track_id, request.bitrate)?;
        if !stream.is_ok() {
            return Err(Error::unavailable(format!(
                "{} is currently not available for track {}, try again later",
                request.bitrate, request.track_id
            )));
        }

        let file_url = stream
            .url
            .ok_or_else(|| Error::data_loss("stream has no url"))?;

        Ok(TrackDownloadInfo {
            download_type: DownloadType::Url,
            file_url,
        })
    }

    fn get_track_lyrics(&mut self, track_id: Id) -> Result<LyricsInfo> {
        let lyrics = self.gateway.lyrics(track_id)?;
        lyrics::convert(lyrics.as_ref())
    }

    fn get_playlist_info(&mut self, _playlist_id: &str) -> Result<()> {
        Err(Error::unimplemented("Bugs! does not support playlists"))
    }
}

fn unsupported_query(query_type: QueryType) -> Error {
    Error::unimplemented(format!("query type {query_type:?} is not supported"))
}

fn keyed<T>(items: Vec<T>, key: impl Fn(&T) -> Id) -> HashMap<Id, T> {
    items.into_iter().map(|item| (key(&item), item)).collect()
}

fn track_result(track: Track) -> SearchResult {
    let additional = track.is_lossless().then(|| vec![LOSSLESS.to_owned()]);

    SearchResult {
        result_id: track.track_id,
        name: track.track_title.clone(),
        artists: Some(
            track
                .artists
                .iter()
                .map(|artist| artist.artist_nm.clone())
                .collect(),
        ),
        year: track.album.release_ymd().and_then(date::year),
        additional,
        extra: ExtraData {
            tracks: HashMap::from([(track.track_id, track)]),
            ..ExtraData::default()
        },
    }
}

fn album_result(album: Album) -> SearchResult {
    SearchResult {
        result_id: album.album_id,
        name: album.title.clone(),
        artists: Some(
            album
                .artists
                .iter()
                .map(|artist| artist.artist_nm.clone())
                .collect(),
        ),
        year: album.release_ymd().and_then(date::year),
        additional: None,
        extra: ExtraData {
            albums: HashMap::from([(album.album_id, album)]),
            ..ExtraData::default()
        },
    }
}

fn artist_result(artist: Artist) -> SearchResult {
    SearchResult {
        result_id: artist.artist_id,
        name: artist.artist_nm,
        artists: None,
        year: None,
        additional: None,
        extra: ExtraData::default(),
    }
}

fn tags(track: &Track, album: &Album) -> Tags {
    let year = album.release_ymd().and_then(date::year);
    let release_date = album
        .release_ymd()
        .and_then(|ymd| match date::normalize(ymd) {
            Ok(date) => Some(date),
            Err(e) => {
                warn!("album {}: {e}", album.album_id);
                None
            }
        });

    let copyright = album.labels.first().map(|label| match &year {
        Some(year) => format!("© {year} {}", label.label_nm),
        None => format!("© {}", label.label_nm),
    });

    let genres: Vec<String> = album
        .genres
        .iter()
        .map(|genre| genre.svc_nm.clone())
        .collect();

    Tags {
        album_artist: album.main_artist().map(|artist| artist.artist_nm.clone()),
        track_number: track.track_no,
        total_tracks: album.track_count,
        disc_number: track.disc_no,
        total_discs: album.disc_count,
        genres: (!genres.is_empty()).then_some(genres),
        release_date,
        copyright,
        replay_gain: track.track_gain,
    }
}
