#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use axum::http::{HeaderValue, Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tokengate::config::{AppConfig, HTTPConfig, Secret};
    use tokengate::{create_app, AppState};
    use tower::ServiceExt;

    const SECRET: &str = "s3cr3t";

    fn setup_app() -> Router {
        let config = AppConfig {
            secret: Secret::new(SECRET),
            ..Default::default()
        };
        create_app(AppState::new(config)).unwrap()
    }

    fn verify_request(query: &str) -> axum::http::request::Builder {
        Request::builder().method("POST").uri(format!("/verify{}", query))
    }

    fn json_body(value: Value) -> Body {
        Body::from(value.to_string())
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&body).unwrap();
        (status, body)
    }

    async fn assert_verdict(request: Request<Body>, expected: bool) {
        let (status, body) = send(setup_app(), request).await;
        assert_eq!(body, json!({ "ok": expected }));
        let expected_status = if expected { StatusCode::OK } else { StatusCode::UNAUTHORIZED };
        assert_eq!(status, expected_status);
    }

    #[tokio::test]
    async fn test_token_in_json_body() {
        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .body(json_body(json!({ "secret": SECRET })))
            .unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_token_in_header_with_empty_body() {
        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", SECRET)
            .body(json_body(json!({})))
            .unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_token_in_query() {
        let request = verify_request("?secret=s3cr3t").body(Body::empty()).unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_no_token_anywhere() {
        let request = verify_request("").body(Body::empty()).unwrap();
        assert_verdict(request, false).await;
    }

    #[tokio::test]
    async fn test_wrong_token_in_body() {
        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .body(json_body(json!({ "secret": "wrong" })))
            .unwrap();
        assert_verdict(request, false).await;
    }

    #[tokio::test]
    async fn test_body_takes_precedence_over_header() {
        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", SECRET)
            .body(json_body(json!({ "secret": "wrong" })))
            .unwrap();
        assert_verdict(request, false).await;

        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", "wrong")
            .body(json_body(json!({ "secret": SECRET })))
            .unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_header_takes_precedence_over_query() {
        let request = verify_request("?secret=s3cr3t")
            .header("X-Secret", "wrong")
            .body(Body::empty())
            .unwrap();
        assert_verdict(request, false).await;

        let request = verify_request("?secret=wrong")
            .header("x-secret", SECRET)
            .body(Body::empty())
            .unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_malformed_json_falls_through() {
        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", SECRET)
            .body(Body::from("{\"secret\": "))
            .unwrap();
        assert_verdict(request, true).await;

        let request = verify_request("?secret=s3cr3t")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("not json at all"))
            .unwrap();
        assert_verdict(request, true).await;

        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{oops"))
            .unwrap();
        assert_verdict(request, false).await;
    }

    #[tokio::test]
    async fn test_non_object_json_is_ignored() {
        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", SECRET)
            .body(json_body(json!(["secret", "wrong"])))
            .unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_body_without_json_content_type_is_ignored() {
        let request = verify_request("")
            .header(CONTENT_TYPE, "text/plain")
            .body(json_body(json!({ "secret": SECRET })))
            .unwrap();
        assert_verdict(request, false).await;

        let request = verify_request("")
            .header(CONTENT_TYPE, "application/vnd.api+json")
            .body(json_body(json!({ "secret": SECRET })))
            .unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_empty_values_fall_through() {
        let request = verify_request("?secret=s3cr3t")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", "")
            .body(json_body(json!({ "secret": "" })))
            .unwrap();
        assert_verdict(request, true).await;
    }

    #[tokio::test]
    async fn test_non_string_body_value_never_matches() {
        let request = verify_request("?secret=s3cr3t")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", SECRET)
            .body(json_body(json!({ "secret": 123 })))
            .unwrap();
        assert_verdict(request, false).await;
    }

    #[tokio::test]
    async fn test_no_normalization() {
        let request = verify_request("")
            .header("X-Secret", " s3cr3t ")
            .body(Body::empty())
            .unwrap();
        assert_verdict(request, false).await;

        let request = verify_request("?secret=S3CR3T").body(Body::empty()).unwrap();
        assert_verdict(request, false).await;
    }

    #[tokio::test]
    async fn test_non_ascii_header_is_compared_as_latin1() {
        let config = AppConfig {
            secret: Secret::new("caf\u{e9}"),
            ..Default::default()
        };

        let request = verify_request("")
            .header("X-Secret", HeaderValue::from_bytes(b"caf\xe9").unwrap())
            .body(Body::empty())
            .unwrap();
        let app = create_app(AppState::new(config.clone())).unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));

        let request = verify_request("?secret=caf%C3%A9")
            .header("X-Secret", HeaderValue::from_bytes("caf\u{e9}".as_bytes()).unwrap())
            .body(Body::empty())
            .unwrap();
        let app = create_app(AppState::new(config)).unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "ok": false }));
    }

    #[tokio::test]
    async fn test_oversized_body_falls_through() {
        let config = AppConfig {
            secret: Secret::new(SECRET),
            http: HTTPConfig {
                max_body_size: 16,
                ..Default::default()
            },
            ..Default::default()
        };
        let app = create_app(AppState::new(config)).unwrap();

        let request = verify_request("")
            .header(CONTENT_TYPE, "application/json")
            .header("X-Secret", SECRET)
            .body(json_body(json!({ "secret": "wrong", "padding": "x".repeat(64) })))
            .unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let request = Request::builder().method("POST").uri("/nope").body(Body::empty()).unwrap();
        let (status, body) = send(setup_app(), request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], 404);
        assert_eq!(body["error"], "Not Found");
    }

    #[tokio::test]
    async fn test_wrong_method() {
        let request = Request::builder().method("GET").uri("/verify?secret=s3cr3t").body(Body::empty()).unwrap();
        let (status, body) = send(setup_app(), request).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "code": 405, "error": "Method Not Allowed" }));
    }

    #[tokio::test]
    async fn test_default_secret_is_placeholder() {
        let app = create_app(AppState::new(AppConfig::default())).unwrap();
        let request = verify_request("?secret=changeme").body(Body::empty()).unwrap();
        let (status, body) = send(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }
}
