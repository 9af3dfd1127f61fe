#![allow(dead_code)]

use std::time::Duration;

use bugsdl::{config::Config, http::RetryPolicy, session::Session};
use httpmock::MockServer;

pub const DEVICE_ID: &str = "abcdefghijklmnopqrstuvwxyz_0";

/// Configuration pointing both hosts at `server`, with near-instant retries.
pub fn config(server: &MockServer) -> Config {
    Config::with_hosts(&server.url("/api/5/"), &server.url("/music/5/"))
        .expect("mock hosts")
        .with_retry(quick_retries(2))
}

pub fn quick_retries(retries: u32) -> RetryPolicy {
    RetryPolicy {
        retries,
        backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(4),
    }
}

pub fn session() -> Session {
    Session::new(DEVICE_ID)
}

pub fn track(track_id: u64, album_id: u64) -> serde_json::Value {
    serde_json::json!({
        "track_id": track_id,
        "track_title": format!("Track {track_id}"),
        "track_no": 1,
        "disc_no": 1,
        "track_gain": "-7.5",
        "artists": [{"artist_id": 80049126, "artist_nm": "Artist"}],
        "album": {"album_id": album_id, "title": "Album", "release_ymd": "20230115"},
        "rights": {
            "streaming": {"service_yn": true},
            "download_flac": {"service_flac_yn": true}
        },
        "bitrates": ["flac", "aac256", "320k", "aac"]
    })
}

pub fn album(album_id: u64) -> serde_json::Value {
    serde_json::json!({
        "album_id": album_id,
        "title": "Album",
        "release_ymd": "202301",
        "image": {"path": "/203/20343816.jpg"},
        "artists": [{"artist_id": 80049126, "artist_nm": "Artist"}],
        "track_count": 2,
        "disc_count": 1,
        "genres": [{"svc_nm": "Ballad"}],
        "labels": [{"label_nm": "Label"}]
    })
}
