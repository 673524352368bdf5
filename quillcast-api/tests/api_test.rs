//! Integration tests for the API surface that run without a database:
//! authentication gates, request validation, identifier parsing, and the
//! response envelope shape.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{json_request, multipart_body, response_json, Part, TestContext};
use serde_json::json;
use tower::Service as _;

#[tokio::test]
async fn health_works_without_a_database() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let ctx = TestContext::new();

    for (method, uri) in [
        ("GET", "/payment/payments"),
        ("POST", "/manuscript/create"),
        ("GET", "/users"),
        ("PUT", "/users/update"),
    ] {
        let response = ctx
            .app
            .clone()
            .call(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} must require auth"
        );

        let body = response_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["statusCode"], 401);
    }
}

#[tokio::test]
async fn garbage_bearer_token_is_rejected() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("GET")
                .uri("/payment/payments")
                .header("authorization", "Bearer not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_validates_the_email() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/users/create",
            json!({
                "userName": "Jane Doe",
                "email": "not-an-email",
                "password": "MyP@ssw0rd!"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Request validation failed");
    assert_eq!(body["data"][0]["field"], "email");
}

#[tokio::test]
async fn registration_rejects_weak_passwords() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/users/create",
            json!({
                "userName": "Jane Doe",
                "email": "jane@example.com",
                "password": "alllowercase1!"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["data"][0]["field"], "password");
}

#[tokio::test]
async fn malformed_manuscript_id_is_a_bad_request() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .uri("/manuscript/not-a-uuid")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid manuscript ID format");
}

#[tokio::test]
async fn review_rating_is_bounded() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/review",
            json!({
                "manuscriptId": uuid::Uuid::new_v4(),
                "rating": 9
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["data"][0]["field"], "rating");
}

#[tokio::test]
async fn notifications_require_an_email() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .uri("/notification")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Email query parameter is required");
}

#[tokio::test]
async fn analytics_without_a_document_is_a_bad_request() {
    let ctx = TestContext::new();

    let (content_type, body) = multipart_body(&[Part::Text {
        name: "unused",
        value: "nothing",
    }]);

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("GET")
                .uri("/manuscript/analytics")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["message"], "Document file is required");
}

#[tokio::test]
async fn disallowed_upload_types_are_rejected() {
    let ctx = TestContext::new();

    let (content_type, body) = multipart_body(&[Part::File {
        name: "document",
        file_name: "script.sh",
        content_type: "application/x-sh",
        bytes: b"#!/bin/sh",
    }]);

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .method("GET")
                .uri("/manuscript/analytics")
                .header("content-type", content_type)
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = response_json(response).await;
    assert_eq!(body["message"], "File type not allowed");
}

#[tokio::test]
async fn security_headers_are_applied() {
    let ctx = TestContext::new();

    let response = ctx
        .app
        .clone()
        .call(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert!(headers.get("Strict-Transport-Security").is_none());
}

#[tokio::test]
async fn refresh_rejects_access_tokens() {
    let ctx = TestContext::new();

    // An access token is not a refresh token.
    let response = ctx
        .app
        .clone()
        .call(json_request(
            "POST",
            "/auth/refresh",
            json!({ "refreshToken": ctx.jwt_token }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
