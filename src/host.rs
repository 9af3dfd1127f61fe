//! Data model shared with the downloader host.
//!
//! The host defines what a module returns: search results, artist, album and
//! track descriptions, lyrics and download descriptors. A module implements
//! [`Module`] to produce them.
//!
//! Records carry an [`ExtraData`] side channel. It holds vendor payloads the
//! module already fetched, so that the host can hand them back on a later
//! call and spare a request. Its entries live only as long as the host keeps
//! the record around.

use std::collections::HashMap;

use url::Url;

use crate::{
    error::Result,
    id::Id,
    protocol::catalog::{Album, Track},
    quality::Bitrate,
};

/// Abstract audio fidelity requested by the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Minimum,
    Low,
    Medium,
    High,
    #[default]
    Lossless,
    Hifi,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Codec {
    Flac,
    Aac,
    Mp3,
}

/// How the host should obtain the audio file.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DownloadType {
    /// Plain HTTP download from [`TrackDownloadInfo::file_url`].
    Url,
}

/// Kind of entity a search or download is about.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryType {
    Track,
    Album,
    Artist,
    Playlist,
}

/// Feature flags a module advertises to the host.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ModuleModes {
    pub download: bool,
    pub covers: bool,
    pub lyrics: bool,
    pub credits: bool,
}

/// Static description of a module.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleInformation {
    pub service_name: &'static str,
    pub modes: ModuleModes,
    /// Settings the user fills in, like credentials.
    pub session_settings: &'static [&'static str],
    /// Keys the module persists through [`Settings`](crate::store::Settings).
    pub session_storage_variables: &'static [&'static str],
    /// Host name fragment that routes URLs to this module.
    pub netlocation_constant: &'static str,
    pub test_url: &'static str,
}

/// Vendor payloads fetched along the way, keyed by their id.
///
/// Tracks and albums are kept apart because their id spaces overlap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtraData {
    pub tracks: HashMap<Id, Track>,
    pub albums: HashMap<Id, Album>,
}

impl ExtraData {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.albums.is_empty()
    }

    #[must_use]
    pub fn track(&self, id: Id) -> Option<&Track> {
        self.tracks.get(&id)
    }

    #[must_use]
    pub fn album(&self, id: Id) -> Option<&Album> {
        self.albums.get(&id)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub result_id: Id,
    pub name: String,
    pub artists: Option<Vec<String>>,
    pub year: Option<String>,
    /// Short badges shown next to the result, like `LOSSLESS`.
    pub additional: Option<Vec<String>>,
    pub extra: ExtraData,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ArtistInfo {
    pub name: String,
    pub tracks: Vec<Id>,
    pub track_extra: ExtraData,
    pub albums: Vec<Id>,
    pub album_extra: ExtraData,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AlbumInfo {
    pub name: String,
    pub release_year: Option<String>,
    pub cover_url: Option<String>,
    pub artist: String,
    pub artist_id: Option<Id>,
    pub tracks: Vec<Id>,
    pub track_extra: ExtraData,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tags {
    pub album_artist: Option<String>,
    pub track_number: Option<u32>,
    pub total_tracks: Option<u32>,
    pub disc_number: Option<u32>,
    pub total_discs: Option<u32>,
    pub genres: Option<Vec<String>>,
    /// `YYYY-MM-DD`
    pub release_date: Option<String>,
    pub copyright: Option<String>,
    pub replay_gain: Option<f64>,
}

/// What [`Module::get_track_download`] needs to fetch a track later.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DownloadRequest {
    pub track_id: Id,
    pub bitrate: Bitrate,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrackInfo {
    pub name: String,
    pub album: String,
    pub album_id: Id,
    pub artists: Vec<String>,
    pub artist_id: Option<Id>,
    pub release_year: Option<String>,
    /// kbps
    pub bitrate: u32,
    /// kHz
    pub sample_rate: f32,
    pub bit_depth: Option<u8>,
    pub cover_url: Option<String>,
    pub tags: Tags,
    pub codec: Codec,
    pub download: DownloadRequest,
    /// Set when the track cannot be downloaded, with the reason why.
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackDownloadInfo {
    pub download_type: DownloadType,
    pub file_url: Url,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LyricsInfo {
    /// Plain text for embedding in tags.
    pub embedded: Option<String>,
    /// LRC-style `[MM:SS.cc]line` text.
    pub synced: Option<String>,
}

/// Operations the host calls on a module.
pub trait Module {
    fn information() -> ModuleInformation
    where
        Self: Sized;

    fn search(
        &mut self,
        query_type: QueryType,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>>;

    fn get_artist_info(
        &mut self,
        artist_id: Id,
        get_credited_albums: bool,
    ) -> Result<ArtistInfo>;

    fn get_album_info(&mut self, album_id: Id, extra: Option<&ExtraData>) -> Result<AlbumInfo>;

    fn get_track_info(
        &mut self,
        track_id: Id,
        quality_tier: QualityTier,
        extra: Option<&ExtraData>,
    ) -> Result<TrackInfo>;

    fn get_track_download(&mut self, request: DownloadRequest) -> Result<TrackDownloadInfo>;

    fn get_track_lyrics(&mut self, track_id: Id) -> Result<LyricsInfo>;

    fn get_playlist_info(&mut self, playlist_id: &str) -> Result<()>;
}
