mod common;

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bugsdl::{
    error::ErrorKind,
    gateway::Gateway,
    id::Id,
    protocol::search::Category,
    protocol::catalog::Track,
    quality::Bitrate,
    session::Tokens,
};
use httpmock::Method::{GET, POST, PUT};
use httpmock::MockServer;
use reqwest::Method;
use serde_json::json;

fn gateway(server: &MockServer) -> Gateway {
    Gateway::new(&common::config(server), common::session()).expect("gateway")
}

fn logged_in(server: &MockServer) -> Gateway {
    let mut session = common::session();
    session.tokens = Some(Tokens {
        access_token: "access-token".to_owned(),
        refresh_token: "refresh-token".to_owned(),
        expires_at: SystemTime::now() + Duration::from_secs(3600),
    });
    Gateway::new(&common::config(server), session).expect("gateway")
}

#[test]
fn authenticate_sends_credentials_and_stores_tokens() {
    let server = MockServer::start();
    let login = server.mock(|when, then| {
        when.method(POST)
            .path("/api/5/login")
            .query_param("userid", "user")
            .query_param("passwd", "secret")
            .query_param("udid", common::DEVICE_ID)
            .query_param("device_model", "android")
            .query_param("device_id", common::DEVICE_ID);
        then.status(200).json_body(json!({
            "ret_code": 0,
            "result": {"token": {
                "access_token": "access-token",
                "refresh_token": "refresh-token",
                "expires_in": 3600
            }}
        }));
    });

    let mut gateway = gateway(&server);
    let before = SystemTime::now();
    let tokens = gateway.authenticate("user", "secret").unwrap().clone();

    login.assert();
    assert_eq!(tokens.access_token, "access-token");
    assert_eq!(tokens.refresh_token, "refresh-token");
    assert!(tokens.expires_at >= before + Duration::from_secs(3600));
    assert!(gateway.session().is_authenticated());
}

#[test]
fn authenticate_rejects_bad_credentials() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/5/login");
        then.status(200)
            .json_body(json!({"ret_code": 300, "ret_msg": "invalid password"}));
    });

    let mut gateway = gateway(&server);
    let err = gateway.authenticate("user", "wrong").unwrap_err();

    assert_eq!(err.kind, ErrorKind::Unauthenticated);
    assert!(gateway.session().tokens.is_none());
}

#[test]
fn account_reports_vendor_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/5/right")
            .query_param("device_model", "android");
        then.status(200)
            .json_body(json!({"ret_code": 1, "ret_msg": "session expired"}));
    });

    let err = logged_in(&server).account().unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unavailable);
    assert!(err.to_string().contains("session expired"));
}

#[test]
fn account_returns_membership() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/api/5/right")
            .header("authorization", "Bearer access-token");
        then.status(200).json_body(json!({
            "ret_code": 0,
            "result": {"member_level": {"level": "VIP"}}
        }));
    });

    let account = logged_in(&server).account().unwrap();
    assert!(account.is_vip());
}

#[test]
fn call_rejects_other_methods() {
    let server = MockServer::start();
    let put = server.mock(|when, then| {
        when.method(PUT);
        then.status(200).json_body(json!({}));
    });

    let err = gateway(&server)
        .call::<serde_json::Value>(Method::PUT, "track/1/lyrics", &[], None)
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::InvalidArgument);
    put.assert_hits(0);
}

#[test]
fn call_reports_body_of_failed_requests() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/music/5/track/1/lyrics");
        then.status(404).body("no such track");
    });

    let err = gateway(&server).lyrics(Id(1)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unavailable);
    assert!(err.to_string().contains("no such track"));
}

#[test]
fn call_gives_up_after_retries() {
    let server = MockServer::start();
    let unavailable = server.mock(|when, then| {
        when.method(GET).path("/music/5/track/1/lyrics");
        then.status(503).body("maintenance");
    });

    let err = gateway(&server).lyrics(Id(1)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unavailable);
    assert!(err.to_string().contains("maintenance"));
    unavailable.assert_hits(3);
}

#[test]
fn invoke_post_is_retried() {
    let server = MockServer::start();
    let unavailable = server.mock(|when, then| {
        when.method(POST).path("/music/5/multi/invoke/map");
        then.status(503).body("busy");
    });

    let err = gateway(&server).album_tracks(Id(1)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Unavailable);
    assert!(err.to_string().contains("busy"));
    unavailable.assert_hits(3);
}

#[test]
fn invoke_extracts_album_blocks() {
    let server = MockServer::start();
    let invoke = server.mock(|when, then| {
        when.method(POST)
            .path("/music/5/multi/invoke/map")
            .query_param("device_id", common::DEVICE_ID)
            .json_body(json!([
                {"id": "album", "args": {"album_id": 20343816, "result_type": "DETAIL"}},
                {"id": "album_artist_role", "args": {"album_id": 20343816}},
                {"id": "album_image", "args": {"album_id": 20343816}}
            ]));
        then.status(200).json_body(json!({"list": [
            {"album": {"result": common::album(20_343_816)}},
            {"album_artist_role": {"list": [{"role": "producer"}]}},
            {"album_image": {"list": [{"path": "/203/20343816.jpg"}]}}
        ]}));
    });

    let detail = gateway(&server).album(Id(20_343_816)).unwrap();

    invoke.assert();
    assert_eq!(detail.album.title, "Album");
    assert_eq!(detail.album.release_ymd(), Some("202301"));
    assert_eq!(detail.roles.len(), 1);
    assert_eq!(detail.images[0].path, "/203/20343816.jpg");
}

#[test]
fn invoke_missing_block_is_data_loss() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/music/5/multi/invoke/map");
        then.status(200).json_body(json!({"list": []}));
    });

    let err = gateway(&server).track(Id(1)).unwrap_err();
    assert_eq!(err.kind, ErrorKind::DataLoss);
}

#[test]
fn artist_listings() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST)
            .path("/music/5/multi/invoke/map")
            .body_contains("\"id\":\"artist_track\"")
            .body_contains("\"sort\":\"POPULAR\"");
        then.status(200).json_body(json!({"list": [
            {"artist_track": {"list": [common::track(1, 10), common::track(2, 10)]}}
        ]}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/music/5/multi/invoke/map")
            .body_contains("\"id\":\"artist_album_filter_joincompil\"");
        then.status(200).json_body(json!({"list": [
            {"artist_album_filter_joincompil": {"list": [common::album(11)]}}
        ]}));
    });
    server.mock(|when, then| {
        when.method(POST)
            .path("/music/5/multi/invoke/map")
            .body_contains("\"artist_ids\":\"80049126\"");
        then.status(200).json_body(json!({"list": [
            {"artist_mv": {"list": [{"mv_id": "601", "mv_title": "Video"}]}}
        ]}));
    });

    let gateway = gateway(&server);
    let tracks = gateway.artist_tracks(Id(80_049_126), 1, 9999).unwrap();
    assert_eq!(tracks.len(), 2);

    let albums = gateway
        .artist_compilation_albums(Id(80_049_126), 1, 9999)
        .unwrap();
    assert_eq!(albums[0].album_id, Id(11));

    let videos = gateway.artist_videos(Id(80_049_126), 1, 9999).unwrap();
    assert_eq!(videos[0].mv_id, Id(601));
}

#[test]
fn stream_requests_bitrate() {
    let server = MockServer::start();
    let stream = server.mock(|when, then| {
        when.method(GET)
            .path("/music/5/play/track/5311931/streaming")
            .query_param("bitrate", "320k")
            .query_param("wwan", "N")
            .query_param("overwrite_session", "Y")
            .query_param("device_id", common::DEVICE_ID);
        then.status(200).json_body(json!({
            "result": {"state": "OK", "url": "https://cdn.example/5311931.mp3?sig=abc"}
        }));
    });

    let result = logged_in(&server)
        .stream(Id(5_311_931), Bitrate::Mp3_320)
        .unwrap();

    stream.assert();
    assert!(result.is_ok());
    assert_eq!(
        result.url.unwrap().as_str(),
        "https://cdn.example/5311931.mp3?sig=abc"
    );
}

#[test]
fn combined_search_is_a_get_with_body() {
    let server = MockServer::start();
    let search = server.mock(|when, then| {
        when.method(GET)
            .path("/music/5/multi/invoke/map")
            .body_contains("\"id\":\"get_search_combine\"")
            .body_contains("\"query\":\"IU\"");
        then.status(200).json_body(json!({"list": [
            {"get_search_combine": {"result": {
                "track": {"list": [common::track(1, 10)]},
                "album": {"list": null},
                "artist": {"list": [{"artist_id": 80049126, "artist_nm": "IU"}]}
            }}}
        ]}));
    });

    let combined = gateway(&server).search("IU").unwrap();

    search.assert();
    assert_eq!(combined.track.list.len(), 1);
    assert!(combined.album.list.is_empty());
    assert_eq!(combined.artist.list[0].artist_nm, "IU");
}

#[test]
fn category_search_pages() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/music/5/search/track")
            .query_param("query", "IU")
            .query_param("page", "2")
            .query_param("size", "10")
            .query_param("sort", "exact")
            .query_param("flac_str_only", "N");
        then.status(200)
            .json_body(json!({"list": [common::track(3, 10)]}));
    });

    let tracks: Vec<Track> = gateway(&server)
        .search_category("IU", Category::Track, 2, 10)
        .unwrap();
    assert_eq!(tracks[0].track_id, Id(3));
}

#[test]
fn expired_tokens_are_still_sent() {
    let server = MockServer::start();
    let lyrics = server.mock(|when, then| {
        when.method(GET)
            .path("/music/5/track/1/lyrics")
            .header("authorization", "Bearer stale");
        then.status(200).json_body(json!({"result": null}));
    });

    let mut session = common::session();
    session.tokens = Some(Tokens {
        access_token: "stale".to_owned(),
        refresh_token: "refresh".to_owned(),
        expires_at: UNIX_EPOCH,
    });
    let gateway = Gateway::new(&common::config(&server), session).unwrap();

    assert_eq!(gateway.lyrics(Id(1)).unwrap(), None);
    lyrics.assert();
}
