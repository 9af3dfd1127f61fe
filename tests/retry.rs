mod common;

use std::{
    io::{Read, Write},
    net::TcpListener,
    thread,
};

use bugsdl::{config::Config, gateway::Gateway, id::Id, session::Session};
use serde_json::json;

/// Serves one canned response per connection, in order.
fn serve(responses: Vec<String>) -> (String, thread::JoinHandle<usize>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let address = format!("http://{}", listener.local_addr().expect("address"));

    let handle = thread::spawn(move || {
        let mut served = 0;
        for response in responses {
            let (mut stream, _) = listener.accept().expect("accept");

            let mut request = Vec::new();
            let mut buffer = [0; 1024];
            loop {
                if let Some(end) = header_end(&request) {
                    if request.len() >= end + content_length(&request[..end]) {
                        break;
                    }
                }
                let read = stream.read(&mut buffer).expect("read");
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&buffer[..read]);
            }

            stream.write_all(response.as_bytes()).expect("write");
            served += 1;
        }
        served
    });

    (address, handle)
}

fn header_end(request: &[u8]) -> Option<usize> {
    request
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|position| position + 4)
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse().ok())
                .flatten()
        })
        .unwrap_or(0)
}

fn response(status: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

#[test]
fn get_succeeds_after_transient_failures() {
    let unavailable = response("503 Service Unavailable", "");
    let (address, server) = serve(vec![
        unavailable.clone(),
        unavailable.clone(),
        unavailable,
        response("200 OK", r#"{"result": {"normal": "Hello"}}"#),
    ]);

    let config = Config::with_hosts(&address, &address)
        .unwrap()
        .with_retry(common::quick_retries(10));
    let gateway = Gateway::new(&config, Session::new(common::DEVICE_ID)).unwrap();

    let lyrics = gateway.lyrics(Id(1)).unwrap().unwrap();

    assert_eq!(lyrics.normal.as_deref(), Some("Hello"));
    assert_eq!(server.join().unwrap(), 4);
}

#[test]
fn invoke_post_succeeds_after_transient_failure() {
    let (address, server) = serve(vec![
        response("503 Service Unavailable", ""),
        response("502 Bad Gateway", ""),
        response(
            "200 OK",
            &json!({"list": [{"album_track": {"list": [common::track(7, 1)]}}]}).to_string(),
        ),
    ]);

    let config = Config::with_hosts(&address, &address)
        .unwrap()
        .with_retry(common::quick_retries(10));
    let gateway = Gateway::new(&config, Session::new(common::DEVICE_ID)).unwrap();

    let tracks = gateway.album_tracks(Id(1)).unwrap();

    assert_eq!(tracks[0].track_id, Id(7));
    assert_eq!(server.join().unwrap(), 3);
}
