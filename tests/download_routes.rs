mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use common::*;
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header as header_is, method, path, query_param},
};

const SUBJECT: &str = "8906247916759695608";

async fn mount_detail(upstream: &MockServer, detail_path: Option<&str>) {
    let subject = match detail_path {
        Some(p) => json!({ "subjectId": SUBJECT, "title": "Avatar", "detailPath": p }),
        None => json!({ "subjectId": SUBJECT, "title": "Avatar" }),
    };
    Mock::given(method("GET"))
        .and(path(DETAIL))
        .and(query_param("subjectId", SUBJECT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "code": 0, "data": { "subject": subject } })),
        )
        .mount(upstream)
        .await;
}

#[tokio::test]
async fn sources_spoof_player_referer_and_attach_processed_sources() {
    let upstream = MockServer::start().await;
    mount_bootstrap(&upstream).await;
    mount_detail(&upstream, Some("avatar-x1")).await;

    let direct = "https://bcdnw.hakunaymatata.com/v/a.mp4?sign=s&t=1";
    Mock::given(method("GET"))
        .and(path(DOWNLOAD))
        .and(query_param("subjectId", SUBJECT))
        .and(query_param("se", "0"))
        .and(query_param("ep", "0"))
        .and(header_is(
            "referer",
            format!(
                "https://fmoviesunblocked.net/spa/videoPlayPage/movies/avatar-x1?id={}&type=/movie/detail",
                SUBJECT
            )
            .as_str(),
        ))
        .and(header_is("origin", "https://fmoviesunblocked.net"))
        .and(header_is("cf-ipcountry", "US"))
        .and(header_is("cookie", "token=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 0,
            "data": {
                "downloads": [
                    { "id": "d1", "url": direct, "resolution": 1080, "size": "1932735283" },
                    { "id": "d2", "url": "https://valiw.hakunaymatata.com/b.mkv", "resolution": 0, "ext": "mkv" }
                ],
                "captions": [ { "lan": "en" } ]
            }
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (app, _) = gateway_for(&upstream);
    let response = get(&app, &format!("/api/sources/{}", SUBJECT)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_success_envelope(&body);
    assert_eq!(body["data"]["captions"][0]["lan"], "en");

    let sources = body["data"]["processedSources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0]["quality"], "1080p");
    assert_eq!(sources[0]["format"], "mp4");
    assert_eq!(sources[0]["directUrl"], direct);
    assert_eq!(
        sources[0]["proxyUrl"],
        format!(
            "http://gw.test:5000/api/download/{}",
            urlencoding::encode(direct)
        )
    );
    assert_eq!(sources[1]["quality"], "Unknown");
    assert_eq!(sources[1]["format"], "mkv");
}

#[tokio::test]
async fn sources_forward_season_and_episode() {
    let upstream = MockServer::start().await;
    mount_bootstrap(&upstream).await;
    mount_detail(&upstream, Some("show-s1")).await;
    Mock::given(method("GET"))
        .and(path(DOWNLOAD))
        .and(query_param("se", "2"))
        .and(query_param("ep", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "downloads": [] } })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (app, _) = gateway_for(&upstream);
    let response = get(&app, &format!("/api/sources/{}?season=2&episode=5", SUBJECT)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["processedSources"], json!([]));
}

#[tokio::test]
async fn sources_pass_unusual_season_and_episode_through() {
    let upstream = MockServer::start().await;
    mount_bootstrap(&upstream).await;
    mount_detail(&upstream, Some("show-s1")).await;
    Mock::given(method("GET"))
        .and(path(DOWNLOAD))
        .and(query_param("se", "-1"))
        .and(query_param("ep", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "downloads": [] } })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (app, _) = gateway_for(&upstream);
    let response = get(&app, &format!("/api/sources/{}?season=-1&episode=abc", SUBJECT)).await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn sources_without_detail_path_never_reach_download_endpoint() {
    let upstream = MockServer::start().await;
    mount_bootstrap(&upstream).await;
    mount_detail(&upstream, None).await;
    Mock::given(method("GET"))
        .and(path(DOWNLOAD))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .expect(0)
        .mount(&upstream)
        .await;

    let (app, _) = gateway_for(&upstream);
    let response = get(&app, &format!("/api/sources/{}", SUBJECT)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_error_envelope(&body);
    assert_eq!(body["message"], "Failed to fetch streaming sources");
    assert!(body["error"].as_str().unwrap().contains("detailPath"));
}

#[tokio::test]
async fn download_rejects_foreign_origin_without_contacting_it() {
    let upstream = MockServer::start().await;
    let (app, _) = gateway_for(&upstream);

    let evil = urlencoding::encode("https://evil.example/x.mp4").into_owned();
    let response = get(&app, &format!("/api/download/{}", evil)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_error_envelope(&body);
    assert_eq!(body["message"], "Invalid download URL");
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn download_rejects_unparseable_target() {
    let upstream = MockServer::start().await;
    let (app, _) = gateway_for(&upstream);

    let response = get(&app, "/api/download/not-a-url").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_error_envelope(&body_json(response).await);
}

#[tokio::test]
async fn download_streams_allowed_file_as_attachment() {
    let upstream = MockServer::start().await;
    let payload = b"\x00\x00\x00\x18ftypmp42 fake video bytes".to_vec();
    Mock::given(method("GET"))
        .and(path("/files/movie.mp4"))
        .and(query_param("sign", "abc"))
        .and(header_is("referer", "https://fmoviesunblocked.net/"))
        .and(header_is("origin", "https://fmoviesunblocked.net"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "video/mp4")
                .insert_header("accept-ranges", "bytes")
                .set_body_bytes(payload.clone()),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let (app, state) = gateway_for(&upstream);
    let target = format!("{}/files/movie.mp4?sign=abc", upstream.uri());
    let response = get(&app, &format!("/api/download/{}", urlencoding::encode(&target))).await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "video/mp4");
    assert_eq!(headers[header::CONTENT_LENGTH], payload.len().to_string().as_str());
    assert_eq!(headers[header::ACCEPT_RANGES], "bytes");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"movie.mp4\""
    );
    assert_eq!(body_bytes(response).await, payload);

    // the proxy path never touches the catalog session
    assert_eq!(state.moviebox.session().bootstrap_attempts(), 0);
}

#[tokio::test]
async fn download_forwards_range_requests() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/movie.mp4"))
        .and(header_is("range", "bytes=0-3"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("content-type", "video/mp4")
                .insert_header("content-range", "bytes 0-3/100")
                .set_body_bytes(b"abcd".to_vec()),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let (app, _) = gateway_for(&upstream);
    let target = format!("{}/files/movie.mp4", upstream.uri());
    let request = Request::builder()
        .uri(format!("/api/download/{}", urlencoding::encode(&target)))
        .header(header::RANGE, "bytes=0-3")
        .body(Body::empty())
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(response.headers()[header::CONTENT_RANGE], "bytes 0-3/100");
    assert_eq!(body_bytes(response).await, b"abcd");
}

#[tokio::test]
async fn download_upstream_failure_is_reported_before_streaming() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/gone.mp4"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&upstream)
        .await;

    let (app, _) = gateway_for(&upstream);
    let target = format!("{}/files/gone.mp4", upstream.uri());
    let response = get(&app, &format!("/api/download/{}", urlencoding::encode(&target))).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_error_envelope(&body);
    assert_eq!(body["message"], "Failed to download file");
    assert!(body["error"].as_str().unwrap().contains("403"));
}
