//! End-to-end tests against the live mock identity service.
//!
//! # Design
//! Starts the mock server on a random port, then drives every resource
//! family through the real `UreqTransport`. Validates header selection,
//! outcome tagging and payload normalization over actual HTTP.

use fusionauth_core::api::{jwt, login, registrations, reports, users};
use fusionauth_core::{ApiError, Client, HttpMethod, Outcome, QueryParams, Tag};
use serde_json::{json, Value};
use uuid::Uuid;

const API_KEY: &str = "key123";

/// Spawns the mock server on its own runtime and returns its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, API_KEY).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Serves exactly one connection with a canned response, then closes it.
fn start_raw_server(status_line: &str, extra_headers: &[u8], body: Vec<u8>) -> String {
    use std::io::{BufRead, BufReader, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let mut head = format!(
        "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        body.len()
    )
    .into_bytes();
    head.extend_from_slice(extra_headers);
    head.extend_from_slice(b"\r\n");

    std::thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
            line.clear();
        }
        stream.write_all(&head).unwrap();
        stream.write_all(&body).unwrap();
        stream.flush().unwrap();
    });

    format!("http://{addr}")
}

fn parts(outcome: Outcome) -> (Tag, Value, u16) {
    let (tag, payload, raw) = outcome.into_parts();
    (tag, payload, raw.status)
}

#[test]
fn tenant_headers_reach_the_server() {
    let base = start_server();
    let client = Client::new(&base, API_KEY, Some("tenantA")).unwrap();

    let outcome = reports::totals(&client).unwrap();
    assert_eq!(outcome.tag(), Tag::Ok);
    assert_eq!(outcome.payload()["globalCount"], 0);
    assert_eq!(outcome.raw().header("X-FusionAuth-TenantId"), Some("tenantA"));

    let untenanted = Client::new(&base, API_KEY, None).unwrap();
    let outcome = reports::totals(&untenanted).unwrap();
    assert_eq!(outcome.raw().header("X-FusionAuth-TenantId"), None);
}

#[test]
fn wrong_api_key_is_an_error_outcome() {
    let base = start_server();
    let client = Client::new(&base, "wrong", None).unwrap();

    let (tag, payload, status) = parts(reports::totals(&client).unwrap());
    assert_eq!(tag, Tag::Error);
    assert_eq!(payload, json!(""));
    assert_eq!(status, 401);
}

#[test]
fn report_field_errors_are_preserved() {
    let base = start_server();
    let client = Client::new(&base, API_KEY, None).unwrap();

    // Bypass ReportRange to send a request without a window.
    let outcome = client
        .call(
            HttpMethod::Get,
            "/api/report/daily-active-user",
            &QueryParams::new(),
            None,
            &fusionauth_core::Auth::Tenant,
        )
        .unwrap();
    assert_eq!(outcome.tag(), Tag::Error);
    assert_eq!(outcome.status(), 400);
    assert_eq!(outcome.payload()["fieldErrors"]["start"][0]["code"], "[blank]start");
    assert_eq!(outcome.payload()["fieldErrors"]["end"][0]["code"], "[blank]end");

    let outcome = reports::logins(
        &client,
        &reports::ReportRange::new(0, 1_000),
        &reports::LoginReportFilter::default(),
    )
    .unwrap();
    assert_eq!(outcome.tag(), Tag::Ok);
}

#[test]
fn unreachable_server_is_a_network_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = Client::new(&format!("http://{addr}"), API_KEY, None).unwrap();

    let err = reports::totals(&client).unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}

#[test]
fn non_utf8_error_body_is_an_error_outcome() {
    let base = start_raw_server("500 Internal Server Error", b"", vec![0xff, 0xfe, b'o', b'o', b'p', b's']);
    let client = Client::new(&base, API_KEY, None).unwrap();

    let outcome = reports::totals(&client).unwrap();
    assert_eq!(outcome.tag(), Tag::Error);
    assert_eq!(outcome.status(), 500);
    let body = outcome.payload().as_str().unwrap();
    assert!(body.ends_with("oops"), "got {body:?}");
}

#[test]
fn non_utf8_success_body_is_a_decode_error() {
    let base = start_raw_server("200 OK", b"", vec![b'"', 0xff, b'"']);
    let client = Client::new(&base, API_KEY, None).unwrap();

    let err = reports::totals(&client).unwrap_err();
    assert!(matches!(err, ApiError::Decode { status: 200, .. }), "got {err:?}");
    assert!(!err.is_network());
}

#[test]
fn non_utf8_header_values_are_kept() {
    let base = start_raw_server("200 OK", b"x-trace: caf\xe9\r\n", b"{}".to_vec());
    let client = Client::new(&base, API_KEY, None).unwrap();

    let outcome = reports::totals(&client).unwrap();
    assert_eq!(outcome.tag(), Tag::Ok);
    assert_eq!(outcome.raw().header("x-trace"), Some("caf\u{FFFD}"));
}

#[test]
fn large_success_body_is_read_in_full() {
    // Past ureq's default 10 MiB body limit.
    let mut body = b"[".to_vec();
    let item = b"\"xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx\",";
    let count = 12 * 1024 * 1024 / item.len() + 1;
    for _ in 0..count {
        body.extend_from_slice(item);
    }
    body.extend_from_slice(b"0]");
    let base = start_raw_server("200 OK", b"", body);
    let client = Client::new(&base, API_KEY, None).unwrap();

    let outcome = reports::totals(&client).unwrap();
    assert_eq!(outcome.tag(), Tag::Ok);
    assert_eq!(outcome.payload().as_array().unwrap().len(), count + 1);
}

#[test]
fn identity_lifecycle() {
    let base = start_server();
    let app_id = Uuid::from_u128(0xa11);
    let client = Client::new(&base, API_KEY, Some("tenantA"))
        .unwrap()
        .with_application_id(app_id);

    // Step 1: create a user.
    let user_body = json!({"user": {"email": "joe@example.com", "password": "secret123"}});
    let (tag, payload, _) = parts(users::create(&client, None, &user_body).unwrap());
    assert_eq!(tag, Tag::Ok);
    let user_id: Uuid = payload["user"]["id"].as_str().unwrap().parse().unwrap();

    // Step 2: creating it again fails with field errors.
    let (tag, payload, status) = parts(users::create(&client, None, &user_body).unwrap());
    assert_eq!((tag, status), (Tag::Error, 400));
    assert_eq!(payload["fieldErrors"]["user.email"][0]["code"], "[duplicate]user.email");

    // Step 3: lookups.
    let outcome = users::get(&client, user_id).unwrap();
    assert_eq!(outcome.payload()["user"]["email"], "joe@example.com");
    let outcome = users::get_by_email(&client, "joe@example.com").unwrap();
    assert_eq!(outcome.payload()["user"]["id"], user_id.to_string());

    // Step 4: register to the application.
    let outcome = registrations::register(
        &client,
        user_id,
        &json!({"registration": {"applicationId": app_id, "roles": ["user"]}}),
    )
    .unwrap();
    assert!(outcome.is_ok());
    let outcome = registrations::get(&client, user_id, app_id).unwrap();
    assert_eq!(outcome.payload()["registration"]["roles"], json!(["user"]));

    // Step 5: login picks up the client's application id.
    let outcome = login::login(&client, &json!({"loginId": "joe@example.com", "password": "secret123"})).unwrap();
    assert_eq!(outcome.tag(), Tag::Ok);
    assert_eq!(outcome.payload()["registration"]["applicationId"], app_id.to_string());
    let token = outcome.payload()["token"].as_str().unwrap().to_string();
    let refresh_token = outcome.payload()["refreshToken"].as_str().unwrap().to_string();

    // Step 6: bad credentials are a bare 404.
    let (tag, payload, status) =
        parts(login::login(&client, &json!({"loginId": "joe@example.com", "password": "nope"})).unwrap());
    assert_eq!((tag, payload, status), (Tag::Error, json!(""), 404));

    // Step 7: JWT calls use per-call auth; the client keeps its API key.
    let outcome = jwt::validate(&client, &token).unwrap();
    assert_eq!(outcome.payload()["jwt"]["sub"], user_id.to_string());
    let outcome = jwt::issue(&client, &token, &jwt::IssueJwtOptions::default()).unwrap();
    assert_eq!(outcome.payload()["token"], token.as_str());
    let outcome = users::me(&client, &token).unwrap();
    assert_eq!(outcome.payload()["user"]["id"], user_id.to_string());
    assert_eq!(client.default_headers()[0], ("Authorization".to_string(), API_KEY.to_string()));

    let (tag, _, status) = parts(jwt::validate(&client, "garbage").unwrap());
    assert_eq!((tag, status), (Tag::Error, 401));

    // Step 8: refresh.
    let outcome = jwt::refresh(&client, &refresh_token, Some(&token)).unwrap();
    assert_eq!(outcome.payload()["token"], token.as_str());

    // Step 9: bodiless successes normalize to the empty string.
    let outcome = login::update_login_instant(&client, user_id, None).unwrap();
    assert_eq!(parts(outcome), (Tag::Ok, json!(""), 200));
    let outcome = login::logout(
        &client,
        &login::LogoutOptions {
            global: Some(true),
            refresh_token: Some(refresh_token),
        },
    )
    .unwrap();
    assert_eq!(parts(outcome), (Tag::Ok, json!(""), 200));
    let outcome = registrations::delete(&client, user_id, app_id).unwrap();
    assert_eq!(parts(outcome), (Tag::Ok, json!(""), 200));

    // Step 10: deleted registration is a bare 404.
    let outcome = registrations::get(&client, user_id, app_id).unwrap();
    assert_eq!(parts(outcome), (Tag::Error, json!(""), 404));

    // Step 11: delete the user; totals drop back to zero.
    let outcome = users::delete(&client, user_id, &users::DeleteUserOptions { hard_delete: Some(true) }).unwrap();
    assert!(outcome.is_ok());
    let outcome = reports::totals(&client).unwrap();
    assert_eq!(outcome.payload()["globalCount"], 0);
}
