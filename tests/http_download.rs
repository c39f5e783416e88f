use hlsdl::{config::ClientConfig, fetch::HttpClient, Downloader, Error};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const MASTER: &str = r#"#EXTM3U
#EXT-X-MEDIA:TYPE=VIDEO,GROUP-ID="chunked",NAME="1080p",AUTOSELECT=YES,DEFAULT=YES
#EXT-X-STREAM-INF:BANDWIDTH=6847192,CODECS="avc1.42C028,mp4a.40.2",RESOLUTION=1920x1080,VIDEO="chunked"
chunked/index-dvr.m3u8
#EXT-X-MEDIA:TYPE=VIDEO,GROUP-ID="720p30",NAME="720p"
#EXT-X-STREAM-INF:BANDWIDTH=2303475,CODECS="avc1.4D401F,mp4a.40.2",RESOLUTION=1280x720,VIDEO="720p30"
720p30/index-dvr.m3u8"#;

const MEDIA: &str = "#EXTM3U
#EXT-X-TARGETDURATION:10
#EXT-X-PLAYLIST-TYPE:VOD
#EXT-X-MEDIA-SEQUENCE:0
#EXTINF:10.000,
0.ts
#EXTINF:10.000,
1.ts
#EXTINF:10.000,
2.ts
#EXT-X-ENDLIST";

async fn serve(server: &MockServer, route: &str, body: impl AsRef<[u8]>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.as_ref().to_vec()))
        .mount(server)
        .await;
}

async fn stream_server() -> MockServer {
    let server = MockServer::start().await;
    serve(&server, "/master.m3u8", MASTER).await;
    serve(&server, "/720p30/index-dvr.m3u8", MEDIA).await;
    for i in 0..3 {
        serve(&server, &format!("/720p30/{i}.ts"), vec![b'a' + i as u8; 1024]).await;
    }
    server
}

fn downloader() -> Downloader<HttpClient> {
    Downloader::new(HttpClient::new(&ClientConfig::default()).unwrap())
}

#[tokio::test]
async fn test_download_range_over_http() {
    let server = stream_server().await;
    let url = format!("{}/master.m3u8", server.uri());

    let mut merger = downloader()
        .open(&url, "720p", Duration::from_secs(10), Duration::ZERO)
        .await
        .unwrap();

    let mut out = Vec::new();
    merger.read_to_end(&mut out).await.unwrap();

    assert_eq!(out.len(), 2048);
    assert!(out[..1024].iter().all(|&b| b == b'b'));
    assert!(out[1024..].iter().all(|&b| b == b'c'));
    assert_eq!(merger.processed_segments(), 2);
}

#[tokio::test]
async fn test_qualities_over_http() {
    let server = stream_server().await;
    let url = format!("{}/master.m3u8", server.uri());
    assert_eq!(
        downloader().qualities(&url).await.unwrap(),
        vec!["1080p", "720p"]
    );
}

#[tokio::test]
async fn test_missing_segment_fails_the_merger() {
    let server = MockServer::start().await;
    serve(&server, "/master.m3u8", MASTER).await;
    serve(&server, "/720p30/index-dvr.m3u8", MEDIA).await;
    serve(&server, "/720p30/0.ts", b"first").await;

    let url = format!("{}/master.m3u8", server.uri());
    let mut merger = downloader()
        .open(&url, "720p", Duration::ZERO, Duration::ZERO)
        .await
        .unwrap();

    let mut out = Vec::new();
    let mut buf = [0u8; 64];
    let err = loop {
        match merger.read(&mut buf).await {
            Ok(0) => panic!("merger ended without the missing segment"),
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) => break e,
        }
    };
    assert_eq!(out, b"first");
    match Error::from_io(&err) {
        Some(Error::FetchFailed { url, reason }) => {
            assert!(url.ends_with("/720p30/1.ts"));
            assert!(reason.starts_with("HTTP 404"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(merger.error().is_some());
}

#[tokio::test]
async fn test_configured_headers_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/master.m3u8"))
        .and(header("x-token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_string(MASTER))
        .mount(&server)
        .await;

    let mut config = ClientConfig::default();
    config
        .headers
        .insert("X-Token".to_string(), "secret".to_string());
    let authenticated = Downloader::new(HttpClient::new(&config).unwrap());

    let master = authenticated
        .master(&format!("{}/master.m3u8", server.uri()))
        .await
        .unwrap();
    assert_eq!(master.variants.len(), 2);

    let unauthenticated = downloader()
        .master(&format!("{}/master.m3u8", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(unauthenticated.error_code(), "FETCH_FAILED");
}
