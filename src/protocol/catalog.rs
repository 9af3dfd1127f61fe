//! Catalog entities: artists, albums, tracks and music videos.
//!
//! # Wire Format
//!
//! Track (as embedded in listings and `track` detail blocks):
//!
//! ```json
//! {
//!     "track_id": 5311931,
//!     "track_title": "Title",
//!     "track_no": 1,
//!     "disc_no": 1,
//!     "track_gain": "-7.2",
//!     "artists": [{ "artist_id": 80049126, "artist_nm": "Artist" }],
//!     "album": { "album_id": 20343816, "title": "Album", "release_ymd": "20230115" },
//!     "rights": {
//!         "streaming": { "service_yn": true },
//!         "download_flac": { "service_flac_yn": true }
//!     },
//!     "bitrates": ["flac", "aac256", "320k", "aac"]
//! }
//! ```
//!
//! Album:
//!
//! ```json
//! {
//!     "album_id": 20343816,
//!     "title": "Album",
//!     "release_ymd": "202301",
//!     "image": { "path": "/203/20343816.jpg" },
//!     "artists": [{ "artist_id": 80049126, "artist_nm": "Artist" }],
//!     "track_count": 10,
//!     "disc_count": 1,
//!     "genres": [{ "svc_nm": "Ballad" }],
//!     "labels": [{ "label_nm": "Label" }]
//! }
//! ```

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnNull, DisplayFromStr, PickFirst, VecSkipError};

use crate::{id::Id, quality::Bitrate};

use super::flag;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Artist {
    pub artist_id: Id,

    #[serde(default)]
    pub artist_nm: String,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Album {
    pub album_id: Id,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub title: String,

    /// `YYYYMMDD` or `YYYYMM`
    #[serde(default)]
    pub release_ymd: Option<String>,

    #[serde(default)]
    pub image: Option<Image>,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub artists: Vec<Artist>,

    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub track_count: Option<u32>,

    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub disc_count: Option<u32>,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub genres: Vec<Genre>,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub labels: Vec<Label>,
}

impl Album {
    /// The release date, unless the vendor left it blank.
    #[must_use]
    pub fn release_ymd(&self) -> Option<&str> {
        self.release_ymd.as_deref().filter(|ymd| !ymd.is_empty())
    }

    #[must_use]
    pub fn main_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }
}

/// Image location relative to the image host.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Image {
    #[serde(default)]
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub svc_nm: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub label_nm: String,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Track {
    pub track_id: Id,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub track_title: String,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub artists: Vec<Artist>,

    pub album: Album,

    #[serde(default)]
    #[serde_as(as = "DefaultOnNull")]
    pub rights: Rights,

    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub track_no: Option<u32>,

    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub disc_no: Option<u32>,

    /// ReplayGain in dB
    #[serde(default)]
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    pub track_gain: Option<f64>,

    /// Encodings on offer. Keys we do not know are dropped.
    #[serde(default)]
    #[serde_as(as = "DefaultOnNull<VecSkipError<_>>")]
    pub bitrates: Vec<Bitrate>,
}

impl Track {
    #[must_use]
    pub fn main_artist(&self) -> Option<&Artist> {
        self.artists.first()
    }

    #[must_use]
    pub fn is_streamable(&self) -> bool {
        self.rights.streaming.service_yn
    }

    #[must_use]
    pub fn is_lossless(&self) -> bool {
        self.rights.download_flac.service_flac_yn
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Rights {
    #[serde(default)]
    pub streaming: Streaming,

    #[serde(default)]
    pub download_flac: DownloadFlac,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Streaming {
    #[serde(default, deserialize_with = "flag")]
    pub service_yn: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DownloadFlac {
    #[serde(default, deserialize_with = "flag")]
    pub service_flac_yn: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Video {
    pub mv_id: Id,

    #[serde(default)]
    pub mv_title: String,
}
