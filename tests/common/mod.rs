#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use http_body_util::BodyExt as _;
use moviebox_gateway::{configs::Config, server::AppState, transport::http_server::router};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

pub const BOOTSTRAP: &str = "/wefeed-h5-bff/app/get-latest-app-pkgs";
pub const HOME: &str = "/wefeed-h5-bff/web/home";
pub const TRENDING: &str = "/wefeed-h5-bff/web/subject/trending";
pub const SEARCH: &str = "/wefeed-h5-bff/web/subject/search";
pub const DETAIL: &str = "/wefeed-h5-bff/web/subject/detail";
pub const DOWNLOAD: &str = "/wefeed-h5-bff/web/subject/download";

/// Gateway whose upstream and download allow-list point at `upstream`.
pub fn gateway_for(upstream: &MockServer) -> (Router, Arc<AppState>) {
    let mut config = Config::default();
    config.upstream.base_url = Some(upstream.uri());
    config.download.allowed_origins.push(upstream.uri());

    let state = Arc::new(AppState::new(config).expect("gateway state"));
    (router(state.clone()), state)
}

pub async fn mount_bootstrap(upstream: &MockServer) {
    Mock::given(method("GET"))
        .and(path(BOOTSTRAP))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "token=abc; Path=/")
                .set_body_json(json!({ "code": 0, "data": { "pkgs": [] } })),
        )
        .mount(upstream)
        .await;
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("router response")
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("host", "gw.test:5000")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub fn assert_success_envelope(body: &Value) {
    let obj = body.as_object().expect("object envelope");
    assert_eq!(obj.len(), 2, "unexpected keys in {}", body);
    assert_eq!(obj["status"], "success");
    assert!(obj.contains_key("data"));
}

pub fn assert_error_envelope(body: &Value) {
    let obj = body.as_object().expect("object envelope");
    assert_eq!(obj.len(), 3, "unexpected keys in {}", body);
    assert_eq!(obj["status"], "error");
    assert!(obj["message"].is_string());
    assert!(obj["error"].is_string());
}
