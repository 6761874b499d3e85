//! Client, auth store and chat controller against a mocked backend.

use labmentix_gtk::api::models::Sender;
use labmentix_gtk::api::{ApiClient, ApiError};
use labmentix_gtk::auth::AuthStore;
use labmentix_gtk::chat::{ChatController, ChatError, ERROR_REPLY, GREETING};
use labmentix_gtk::forms::{Field, FormState, ValidationRules};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn backend() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::new(&server.uri()).unwrap();
    (server, client)
}

async fn accept_saves(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/savemessage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(server)
        .await;
}

// ============= Chat =============

#[tokio::test]
async fn hello_appends_user_then_assistant() {
    let (server, client) = backend().await;
    accept_saves(&server).await;
    Mock::given(method("POST"))
        .and(path("/callapi"))
        .and(body_json(json!({"mymsg": "hello"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi! How can I help?"})))
        .expect(1)
        .mount(&server)
        .await;

    let chat = ChatController::new(client);
    let reply = chat.submit("hello", Vec::new()).await.unwrap();
    assert_eq!(reply.content, "Hi! How can I help?");

    let messages = chat.snapshot();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0].content, GREETING);
    assert_eq!((messages[1].sender, messages[1].content.as_str()), (Sender::User, "hello"));
    assert_eq!(messages[2].sender, Sender::Assistant);
    assert!(!chat.is_loading());
}

async fn saved_messages(server: &MockServer, count: usize) -> Vec<(String, String)> {
    for _ in 0..100 {
        let saved: Vec<(String, String)> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/savemessage")
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                (body["type"].as_str().unwrap().to_string(), body["content"].as_str().unwrap().to_string())
            })
            .collect();
        if saved.len() >= count {
            return saved;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("expected {count} saved messages");
}

#[tokio::test]
async fn both_sides_of_a_turn_are_saved() {
    let (server, client) = backend().await;
    accept_saves(&server).await;
    Mock::given(method("POST"))
        .and(path("/callapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hi"})))
        .mount(&server)
        .await;

    let chat = ChatController::new(client);
    chat.submit("hello", Vec::new()).await.unwrap();

    let mut saved = saved_messages(&server, 2).await;
    saved.sort();
    assert_eq!(
        saved,
        vec![("assistant".to_string(), "hi".to_string()), ("user".to_string(), "hello".to_string())]
    );
}

#[tokio::test]
async fn backend_error_becomes_apology() {
    let (server, client) = backend().await;
    accept_saves(&server).await;
    Mock::given(method("POST"))
        .and(path("/callapi"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&server)
        .await;

    let chat = ChatController::new(client);
    let reply = chat.submit("are you there?", Vec::new()).await.unwrap();
    assert_eq!(reply.sender, Sender::Assistant);
    assert_eq!(reply.content, ERROR_REPLY);
    assert_eq!(chat.snapshot().len(), 3);
}

#[tokio::test]
async fn blank_input_never_reaches_backend() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callapi"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let chat = ChatController::new(client);
    assert_eq!(chat.submit("   ", Vec::new()).await.unwrap_err(), ChatError::EmptyInput);
    assert_eq!(chat.snapshot().len(), 1);
}

#[tokio::test]
async fn each_submission_adds_exactly_two_messages() {
    let (server, client) = backend().await;
    accept_saves(&server).await;
    Mock::given(method("POST"))
        .and(path("/callapi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "ok"})))
        .expect(3)
        .mount(&server)
        .await;

    let chat = ChatController::new(client);
    for text in ["one", "two", "three"] {
        chat.submit(text, Vec::new()).await.unwrap();
    }
    let senders: Vec<Sender> = chat.snapshot().iter().skip(1).map(|m| m.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::User, Sender::Assistant, Sender::User, Sender::Assistant, Sender::User, Sender::Assistant]
    );
}

#[tokio::test]
async fn save_failures_are_swallowed() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/savemessage"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let chat = ChatController::new(client);
    let greeting = chat.snapshot().remove(0);
    chat.persist(greeting).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["type"], "assistant");
    assert_eq!(body["content"], GREETING);
    assert_eq!(body["files"], json!([]));
    assert!(body["timestamp"].is_string());
}

// ============= Auth =============

#[tokio::test]
async fn sign_in_success_persists_token() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callsignin"))
        .and(body_json(json!({"email": "ada@lab.io", "password": "analytical"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt-123", "msg": "Login successful!"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut store = AuthStore::open(dir.path().join("auth-storage.toml"));
    let outcome = client.sign_in("ada@lab.io", "analytical").await;
    store.record_sign_in(&outcome).unwrap();

    assert!(store.is_authenticated());
    assert_eq!(store.token(), Some("jwt-123"));
    let reopened = AuthStore::open(dir.path().join("auth-storage.toml"));
    assert_eq!(reopened.token(), Some("jwt-123"));
}

#[tokio::test]
async fn sign_in_failure_clears_store() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callsignin"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"msg": "Invalid credentials"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut store = AuthStore::open(dir.path().join("auth-storage.toml"));
    store.set_token(Some("stale".into())).unwrap();
    store.set_authenticated(true).unwrap();

    let outcome = client.sign_in("ada@lab.io", "wrongpass").await;
    match &outcome {
        Err(e @ ApiError::Status { status: 401, .. }) => {
            assert_eq!(e.user_message("fallback"), "Invalid credentials");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    store.record_sign_in(&outcome).unwrap();
    assert!(!store.is_authenticated());
    assert_eq!(store.token(), None);
}

#[tokio::test]
async fn empty_password_blocks_sign_in() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callsignin"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut form = FormState::sign_in(ValidationRules::default());
    form.change(Field::Email, "ada@lab.io");
    if form.validate_all() {
        let _ = client.sign_in(form.value(Field::Email), form.value(Field::Password)).await;
    }
    assert_eq!(form.error(Field::Password), Some("Password is required"));
}

#[tokio::test]
async fn sign_in_without_token_is_a_failure() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callsignin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"msg": "ok"})))
        .mount(&server)
        .await;

    let outcome = client.sign_in("ada@lab.io", "analytical").await;
    assert!(matches!(outcome, Err(ApiError::MissingToken)));
}

#[tokio::test]
async fn sign_up_sends_all_fields() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callsignup"))
        .and(body_json(json!({"name": "Ada", "email": "ada@lab.io", "password": "analytical"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "Account created"})))
        .expect(1)
        .mount(&server)
        .await;

    let reply = client.sign_up("Ada", "ada@lab.io", "analytical").await.unwrap();
    assert_eq!(reply.token, None);
    assert_eq!(reply.message.as_deref(), Some("Account created"));
}

#[tokio::test]
async fn sign_out_accepts_plain_text() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callsignout"))
        .and(header("Authorization", "Bearer jwt-123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Signed out"))
        .mount(&server)
        .await;

    let message = client.sign_out(Some("jwt-123")).await.unwrap();
    assert_eq!(message.as_deref(), Some("Signed out"));
}

#[tokio::test]
async fn sign_out_failure_reports_backend_text() {
    let (server, client) = backend().await;
    Mock::given(method("POST"))
        .and(path("/callsignout"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "Session store down"})))
        .mount(&server)
        .await;

    let err = client.sign_out(None).await.unwrap_err();
    assert_eq!(err.user_message("Sign out failed"), "Session store down");
}

// ============= History =============

#[tokio::test]
async fn history_parses_mixed_ids() {
    let (server, client) = backend().await;
    Mock::given(method("GET"))
        .and(path("/getchathistory"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "a1", "type": "user", "content": "hello", "timestamp": "2024-03-01T10:00:00Z"},
            {"id": 2, "type": "assistant", "content": "hi", "timestamp": "2024-03-01T10:00:02Z"},
            {"type": "user", "content": "no id"}
        ])))
        .mount(&server)
        .await;

    let entries = client.chat_history(None).await.unwrap();
    let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["a1", "2"]);
    assert_eq!(entries[1].kind, Sender::Assistant);
}

#[tokio::test]
async fn history_http_error_surfaces() {
    let (server, client) = backend().await;
    Mock::given(method("GET"))
        .and(path("/getchathistory"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.chat_history(None).await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 503, message: None }));
}
