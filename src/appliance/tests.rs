// appliance/tests.rs
// Unit tests for the management API client

#![cfg(test)]

use super::{ApiAuth, ApiResponse, ApplianceClient};
use crate::error::ApiError;
use crate::settings::Settings;
use reqwest::{Method, StatusCode};

fn response(status: StatusCode, body: &str) -> ApiResponse {
    ApiResponse {
        method: Method::POST,
        path: "/pool/dataset/".to_string(),
        status,
        body: body.to_string(),
    }
}

// -------------------------------------------------------------------------
// Status Handling Tests
// -------------------------------------------------------------------------

/// Test: 200 passes through untouched
#[test]
fn test_ensure_ok_accepts_200() {
    let resp = response(StatusCode::OK, "{}").ensure_ok().unwrap();
    assert_eq!(resp.body, "{}");
}

/// Test: anything but 200 carries the body as diagnostic context
#[test]
fn test_ensure_ok_rejects_other_statuses() {
    let err = response(StatusCode::UNPROCESSABLE_ENTITY, r#"{"name": "already exists"}"#)
        .ensure_ok()
        .unwrap_err();

    match err {
        ApiError::UnexpectedStatus {
            method,
            path,
            status,
            body,
        } => {
            assert_eq!(method, "POST");
            assert_eq!(path, "/pool/dataset/");
            assert_eq!(status, 422);
            assert!(body.contains("already exists"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Test: 201 is not success for this API
#[test]
fn test_ensure_ok_rejects_201() {
    assert!(response(StatusCode::CREATED, "1").ensure_ok().is_err());
}

// -------------------------------------------------------------------------
// Decoding Tests
// -------------------------------------------------------------------------

/// Test: bare JSON numbers decode (get_next_uid, user create)
#[test]
fn test_json_scalar() {
    let uid: u32 = response(StatusCode::OK, "3000").json().unwrap();
    assert_eq!(uid, 3000);
}

/// Test: decode failures keep the offending body
#[test]
fn test_json_decode_error() {
    let err = response(StatusCode::OK, "<html>").json::<u32>().unwrap_err();
    assert!(matches!(err, ApiError::Decode { ref body, .. } if body == "<html>"));
}

// -------------------------------------------------------------------------
// Construction Tests
// -------------------------------------------------------------------------

/// Test: basic auth by default, API key when configured
#[test]
fn test_auth_selection() {
    let mut settings = Settings {
        ip: "10.0.0.5".to_string(),
        password: "secret".to_string(),
        ..Settings::default()
    };
    let client = ApplianceClient::new(&settings).unwrap();
    assert!(matches!(client.auth, ApiAuth::Basic { ref user, .. } if user == "root"));
    assert_eq!(client.base_url(), "http://10.0.0.5/api/v2.0");

    settings.api_key = Some("1-abcdef".to_string());
    let client = ApplianceClient::new(&settings).unwrap();
    assert!(matches!(client.auth, ApiAuth::ApiKey(ref key) if key == "1-abcdef"));
}
