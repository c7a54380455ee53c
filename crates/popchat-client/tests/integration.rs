//! Integration tests for the popchat-client crate.
//!
//! These drive [`ChatController`] over a real [`HttpBackend`] against a
//! `wiremock` server standing in for the chat service.

use std::sync::Arc;

use popchat_client::backend::LoginBody;
use popchat_client::controller::{
    LOGIN_ERROR, LOGIN_REJECTED, LOGIN_SUCCEEDED, SEND_FAILED, SESSION_EXPIRED,
};
use popchat_client::{
    ChatBackend, ChatController, ClientConfig, ClientError, Credentials, HttpBackend,
    LoginOutcome, LoginReply, Sender, SendOutcome, SessionState,
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        welcome_delay_ms: 0,
        ..ClientConfig::default()
    }
}

fn controller_for(server: &MockServer) -> ChatController {
    let config = config_for(server);
    let backend = HttpBackend::new(&config).unwrap();
    ChatController::new(config, Arc::new(backend))
}

async fn mount_login_ok(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "access_token": token})),
        )
        .mount(server)
        .await;
}

fn bodies(c: &ChatController) -> Vec<String> {
    c.transcript()
        .messages()
        .iter()
        .map(|m| m.body.clone())
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════
//  Login
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn login_posts_credentials_and_stores_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({"username": "alice", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "access_token": "abc"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.toggle_popup();
    let outcome = c.submit_login(&Credentials::new("alice", "pw")).await;

    assert_eq!(outcome, LoginOutcome::Succeeded);
    assert_eq!(c.session().token(), Some("abc"));
    assert_eq!(bodies(&c)[0], LOGIN_SUCCEEDED);
    assert_eq!(c.transcript().count(Sender::Bot), 1);
    assert!(!c.view().login_visible);
}

#[tokio::test]
async fn login_with_error_status_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"status": "error"})),
        )
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.toggle_popup();
    let outcome = c.submit_login(&Credentials::new("alice", "nope")).await;

    assert_eq!(outcome, LoginOutcome::Rejected);
    assert_eq!(c.session(), &SessionState::AwaitingLogin);
    assert_eq!(bodies(&c), [LOGIN_REJECTED]);
}

#[tokio::test]
async fn login_with_401_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"status": "success", "access_token": "abc"})),
        )
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    let outcome = c.submit_login(&Credentials::new("alice", "pw")).await;
    assert_eq!(outcome, LoginOutcome::Rejected);
    assert!(c.session().token().is_none());
}

#[tokio::test]
async fn login_with_non_json_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    let outcome = c.submit_login(&Credentials::new("alice", "pw")).await;
    assert_eq!(outcome, LoginOutcome::Failed);
    assert_eq!(bodies(&c), [LOGIN_ERROR]);
}

#[tokio::test]
async fn backend_reports_invalid_json_with_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let backend = HttpBackend::new(&config_for(&server)).unwrap();
    let err = backend.chat("t", "hi").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::InvalidResponse {
            endpoint: "/chat",
            ..
        }
    ));
}

// ═══════════════════════════════════════════════════════════════════════
//  Sending
// ═══════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn chat_sends_bearer_token_and_renders_reply() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "tok-1").await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(header("authorization", "Bearer tok-1"))
        .and(body_json(json!({"message": "What is my balance?"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"reply": "You have **$10**."})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.submit_login(&Credentials::new("alice", "pw")).await;
    let outcome = c.send_message("  What is my balance?  ").await;

    assert_eq!(outcome, Some(SendOutcome::Replied));
    let last = c.transcript().last().unwrap();
    assert_eq!(last.sender, Sender::Bot);
    assert_eq!(last.to_html(), "<p>You have <strong>$10</strong>.</p>");
    assert!(!c.transcript().is_typing());
}

#[tokio::test]
async fn sources_block_survives_the_round_trip() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "t").await;
    let sources = "<div class='sources-section'><ul><li>*FAQ*</li></ul></div>";
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"reply": format!("See *below*{sources}")})),
        )
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.submit_login(&Credentials::new("a", "b")).await;
    c.send_message("sources?").await;

    let html = c.transcript().last().unwrap().to_html();
    assert_eq!(html, format!("<p>See <em>below</em></p>{sources}"));
}

#[tokio::test]
async fn expired_token_gets_generic_failure_line() {
    // A 401 from /chat is not told apart from any other failure, and the
    // stale token is kept.
    let server = MockServer::start().await;
    mount_login_ok(&server, "stale").await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})),
        )
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.submit_login(&Credentials::new("a", "b")).await;
    let outcome = c.send_message("hello").await;

    assert_eq!(outcome, Some(SendOutcome::Failed));
    assert_eq!(
        c.transcript().last().map(|m| m.body.as_str()),
        Some(SEND_FAILED)
    );
    assert_eq!(c.session().token(), Some("stale"));
    assert!(!c.transcript().is_typing());
}

#[tokio::test]
async fn reply_field_is_used_even_on_error_status() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "t").await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"reply": "Sorry, try later"})),
        )
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.submit_login(&Credentials::new("a", "b")).await;
    assert_eq!(c.send_message("hi").await, Some(SendOutcome::Replied));
    assert_eq!(c.transcript().last().unwrap().body, "Sorry, try later");
}

#[tokio::test]
async fn whitespace_send_makes_no_request() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "t").await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.submit_login(&Credentials::new("a", "b")).await;
    let before = c.transcript().len();
    assert_eq!(c.send_message(" \t\n ").await, None);
    assert_eq!(c.transcript().len(), before);
}

#[tokio::test]
async fn send_before_login_reshows_form_without_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "x"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    assert_eq!(c.send_message("hi").await, None);
    assert_eq!(bodies(&c), ["hi", SESSION_EXPIRED]);
    assert!(c.view().login_visible);
}

#[tokio::test]
async fn user_markup_is_stored_raw_and_escaped_on_output() {
    let server = MockServer::start().await;
    mount_login_ok(&server, "t").await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({"message": "<img src=x onerror=alert(1)>"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut c = controller_for(&server);
    c.submit_login(&Credentials::new("a", "b")).await;
    c.send_message("<img src=x onerror=alert(1)>").await;

    let user = c
        .transcript()
        .messages()
        .iter()
        .find(|m| m.sender == Sender::User)
        .unwrap();
    assert_eq!(user.to_html(), "&lt;img src=x onerror=alert(1)&gt;");
}

#[tokio::test]
async fn unreachable_backend_fails_send() {
    let config = ClientConfig {
        base_url: "http://127.0.0.1:1".into(),
        ..ClientConfig::default()
    };
    let backend = HttpBackend::new(&config).unwrap();
    let mut c = ChatController::new(config, Arc::new(backend));
    c.finish_login(Ok(LoginReply {
        http_status: 200,
        body: LoginBody {
            status: Some("success".into()),
            access_token: Some("t".into()),
        },
    }));

    assert_eq!(c.send_message("hi").await, Some(SendOutcome::Failed));
    assert_eq!(
        c.transcript().last().map(|m| m.body.as_str()),
        Some(SEND_FAILED)
    );
}
