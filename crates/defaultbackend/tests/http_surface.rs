#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::body::Body;
use axum::http::{Request, StatusCode, Version};
use http_body_util::BodyExt;
use tower::ServiceExt;

use defaultbackend::{app_state::AppState, router::build_router};

const NOT_FOUND_BODY: &str = "{\"error\": \"Not found\"}";

async fn body_string(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn unmatched_paths_get_404_with_fixed_body() {
    let app = build_router(AppState::new());

    for path in ["/", "/foo", "/api/v1/things", "/healthz/extra"] {
        let res = app
            .clone()
            .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND, "path {path}");
        assert_eq!(body_string(res).await, NOT_FOUND_BODY, "path {path}");
    }
}

#[tokio::test]
async fn not_found_is_method_agnostic() {
    let app = build_router(AppState::new());

    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/anything")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND, "method {method}");
    }
}

#[tokio::test]
async fn not_found_sets_exact_proxy_shaped_headers() {
    let app = build_router(AppState::new());

    let res = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let expected = [
        ("access-control-allow-credentials", "true"),
        (
            "access-control-allow-headers",
            "Content-Type,Authorization,X-User-Agent",
        ),
        ("access-control-allow-origin", "*"),
        (
            "access-control-expose-headers",
            "Content-Type,Warning,X-Pages,X-ESI-Error-Limit-Remain,X-ESI-Error-Limit-Reset",
        ),
        ("access-control-max-age", "600"),
        ("content-type", "application/json"),
        ("strict-transport-security", "max-age=31536000"),
    ];

    for (name, value) in expected {
        assert_eq!(
            res.headers().get(name).map(|v| v.to_str().unwrap()),
            Some(value),
            "header {name}"
        );
    }
}

#[tokio::test]
async fn not_found_body_is_valid_json() {
    let app = build_router(AppState::new());

    let res = app
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let v: serde_json::Value = serde_json::from_str(&body_string(res).await).unwrap();
    assert_eq!(v["error"], "Not found");
}

#[tokio::test]
async fn requests_are_counted_per_protocol_version() {
    let state = AppState::new();
    let app = build_router(state.clone());

    for _ in 0..3 {
        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .version(Version::HTTP_11)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    assert_eq!(state.metrics().request_count.get("1.1"), 3);
    assert_eq!(state.metrics().request_duration.count("1.1"), 3);
    assert_eq!(state.metrics().request_count.get("2.0"), 0);
}

#[tokio::test]
async fn http2_requests_are_labeled_major_dot_minor() {
    let state = AppState::new();
    let app = build_router(state.clone());

    for _ in 0..3 {
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .version(Version::HTTP_2)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
    }

    // The label is always "major.minor", never a bare major version.
    assert_eq!(state.metrics().request_count.get("2.0"), 3);
    assert_eq!(state.metrics().request_duration.count("2.0"), 3);
    assert_eq!(state.metrics().request_count.get("2"), 0);
}

#[tokio::test]
async fn healthz_is_ok_without_any_prior_requests() {
    let app = build_router(AppState::new());

    let res = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(body_string(res).await, "ok");
}

#[tokio::test]
async fn healthz_has_no_metrics_side_effect() {
    let state = AppState::new();
    let app = build_router(state.clone());

    let res = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(state.metrics().request_count.get("1.1"), 0);
}

#[tokio::test]
async fn metrics_exposition_reflects_recorded_requests() {
    let state = AppState::new();
    let app = build_router(state);

    for _ in 0..3 {
        app.clone()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .version(Version::HTTP_2)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
    }

    let res = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );

    let body = body_string(res).await;
    assert!(body.contains("# TYPE http_requests_total counter"));
    assert!(body.contains("http_requests_total{proto=\"2.0\"} 3"));
    assert!(body.contains("# TYPE http_request_duration_milliseconds histogram"));
    assert!(body.contains("http_request_duration_milliseconds_count{proto=\"2.0\"} 3"));
}

#[tokio::test]
async fn metrics_endpoint_is_read_only() {
    let state = AppState::new();
    let app = build_router(state.clone());

    app.clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(state.metrics().request_count.get("1.1"), 0);
    assert_eq!(state.metrics().request_duration.count("1.1"), 0);
}
