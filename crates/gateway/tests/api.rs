//! End-to-end tests of the REST surface against a fake session backend.

use std::sync::Arc;

use {
    wagate_bridge::{BridgeState, ConnectionStatus},
    wagate_config::WagateConfig,
    wagate_gateway::{AppState, build_gateway_app},
    wagate_session::{
        MessagingSession,
        testing::FakeSession,
        types::{ChatSummary, ClientInfo},
    },
};

const API_KEY: &str = "test-api-key";

struct TestApp {
    base: String,
    session: Arc<FakeSession>,
    bridge: Arc<BridgeState>,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn() -> Self {
        Self::spawn_with(WagateConfig::default()).await
    }

    async fn spawn_with(config: WagateConfig) -> Self {
        let session = Arc::new(FakeSession::new());
        let bridge = Arc::new(BridgeState::new(None));
        let state = AppState::new(
            Arc::clone(&session) as Arc<dyn MessagingSession>,
            Arc::clone(&bridge),
            API_KEY.to_string(),
            &config,
        );
        let app = build_gateway_app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("bind test listener: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("local addr: {e}"));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base: format!("http://{addr}"),
            session,
            bridge,
            client: reqwest::Client::new(),
        }
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}{path}", self.base))
            .header("x-api-key", API_KEY)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{path}", self.base))
            .header("x-api-key", API_KEY)
    }

    async fn make_ready(&self) {
        self.bridge.set_status(ConnectionStatus::Ready).await;
        self.session.set_info(ClientInfo {
            push_name: "op".into(),
            wid: "4915112345678".into(),
        });
        self.bridge
            .set_client_info(Some(ClientInfo {
                push_name: "op".into(),
                wid: "4915112345678".into(),
            }))
            .await;
    }
}

async fn body_json(resp: reqwest::Response) -> serde_json::Value {
    resp.json().await.unwrap_or(serde_json::Value::Null)
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn protected_routes_reject_missing_or_wrong_key() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(format!("{}/status", app.base))
        .send()
        .await
        .unwrap_or_else(|e| panic!("request: {e}"));
    assert_eq!(resp.status(), 401);

    let resp = app
        .client
        .get(format!("{}/status", app.base))
        .header("x-api-key", "wrong")
        .send()
        .await
        .unwrap_or_else(|e| panic!("request: {e}"));
    assert_eq!(resp.status(), 401);
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::spawn().await;
    let resp = app
        .client
        .get(format!("{}/health", app.base))
        .send()
        .await
        .unwrap_or_else(|e| panic!("request: {e}"));
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["whatsapp"], "INITIALIZING");
}

// ── Status / info ────────────────────────────────────────────────────────────

#[tokio::test]
async fn status_reflects_bridge_state() {
    let app = TestApp::spawn().await;

    let body = body_json(app.get("/status").send().await.unwrap_or_else(|e| panic!("{e}"))).await;
    assert_eq!(body["whatsapp"]["status"], "INITIALIZING");
    assert_eq!(body["webhook"]["configured"], false);

    app.make_ready().await;
    let body = body_json(app.get("/status").send().await.unwrap_or_else(|e| panic!("{e}"))).await;
    assert_eq!(body["whatsapp"]["status"], "READY");
    assert_eq!(body["whatsapp"]["info"]["push_name"], "op");
}

#[tokio::test]
async fn status_webhook_fields_agree() {
    let app = TestApp::spawn().await;

    let body = body_json(app.get("/status").send().await.unwrap_or_else(|e| panic!("{e}"))).await;
    assert_eq!(body["webhook"]["configured"], false);
    assert_eq!(body["webhook"]["url"], serde_json::Value::Null);

    app.bridge
        .set_webhook_url("https://example.test/hook")
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    let body = body_json(app.get("/status").send().await.unwrap_or_else(|e| panic!("{e}"))).await;
    assert_eq!(body["webhook"]["configured"], true);
    assert_eq!(body["webhook"]["url"], "https://example.test/hook");

    app.bridge.clear_webhook_url().await;
    let body = body_json(app.get("/status").send().await.unwrap_or_else(|e| panic!("{e}"))).await;
    assert_eq!(body["webhook"]["configured"], false);
    assert_eq!(body["webhook"]["url"], serde_json::Value::Null);
}

#[tokio::test]
async fn client_info_requires_authentication() {
    let app = TestApp::spawn().await;
    let resp = app.get("/client-info").send().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 404);

    app.make_ready().await;
    let resp = app.get("/client-info").send().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["info"]["wid"], "4915112345678");
}

// ── QR ───────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn qr_code_lifecycle() {
    let app = TestApp::spawn().await;

    // Nothing pending yet.
    let resp = app
        .client
        .get(format!("{}/qr-code", app.base))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 404);

    // QR pending → PNG.
    app.bridge.set_status(ConnectionStatus::QrReceived).await;
    app.bridge.set_qr(Some("2@pairing-data".into())).await;
    let resp = app
        .client
        .get(format!("{}/qr-code", app.base))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("image/png")
    );

    // Authenticated → friendly JSON instead of an image.
    app.make_ready().await;
    let resp = app
        .client
        .get(format!("{}/qr-code", app.base))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");
}

// ── Sending ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn send_message_is_gated_on_readiness() {
    let app = TestApp::spawn().await;
    let resp = app
        .post("/send-message")
        .json(&serde_json::json!({ "number": "123", "message": "hi" }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 409);
    assert!(app.session.sent().is_empty());
}

#[tokio::test]
async fn send_message_normalizes_chat_id() {
    let app = TestApp::spawn().await;
    app.make_ready().await;

    let resp = app
        .post("/send-message")
        .json(&serde_json::json!({ "number": "4915112345678", "message": "hello" }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["status"], "success");

    let sent = app.session.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat.as_str(), "4915112345678@c.us");
    assert_eq!(sent[0].body, "hello");
}

#[tokio::test]
async fn send_message_validates_fields() {
    let app = TestApp::spawn().await;
    app.make_ready().await;

    let resp = app
        .post("/send-message")
        .json(&serde_json::json!({ "number": "123" }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn send_media_accepts_multipart() {
    let app = TestApp::spawn().await;
    app.make_ready().await;

    let form = reqwest::multipart::Form::new()
        .text("number", "123")
        .text("caption", "pic")
        .part(
            "file",
            reqwest::multipart::Part::bytes(vec![0xFFu8; 64])
                .file_name("img.jpg")
                .mime_str("image/jpeg")
                .unwrap_or_else(|e| panic!("{e}")),
        );
    let resp = app
        .post("/send-media")
        .multipart(form)
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);

    let sent = app.session.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].kind, "media");
    assert!(sent[0].body.contains("image/jpeg"));
}

#[tokio::test]
async fn send_location_rejects_bad_coordinates() {
    let app = TestApp::spawn().await;
    app.make_ready().await;

    let resp = app
        .post("/send-location")
        .json(&serde_json::json!({
            "number": "123",
            "latitude": "not-a-number",
            "longitude": 13.4,
        }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 400);

    // Numeric strings are accepted.
    let resp = app
        .post("/send-location")
        .json(&serde_json::json!({
            "number": "123",
            "latitude": "52.52",
            "longitude": 13.4,
        }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn chats_lists_sessions_view() {
    let app = TestApp::spawn().await;
    app.make_ready().await;
    app.session.set_chats(vec![ChatSummary {
        id: "123@c.us".into(),
        name: "Ada".into(),
        is_group: false,
        timestamp: 1_700_000_000,
        unread_count: 2,
    }]);

    let body = body_json(app.get("/chats").send().await.unwrap_or_else(|e| panic!("{e}"))).await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["chats"][0]["name"], "Ada");
}

// ── Bulk ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn send_bulk_reports_per_recipient_outcomes() {
    let mut config = WagateConfig::default();
    config.bulk.delay_min_ms = 0;
    config.bulk.delay_max_ms = 0;
    let app = TestApp::spawn_with(config).await;
    app.make_ready().await;

    let resp = app
        .post("/send-bulk")
        .json(&serde_json::json!({
            "message": "promo",
            "numbers": ["111", "222"],
        }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    let body = body_json(resp).await;
    assert_eq!(body["report"]["sent"], 2);
    assert_eq!(body["report"]["failed"], 0);
    assert_eq!(app.session.sent().len(), 2);
}

#[tokio::test]
async fn send_bulk_without_numbers_needs_recipients_file() {
    let app = TestApp::spawn().await;
    app.make_ready().await;

    let resp = app
        .post("/send-bulk")
        .json(&serde_json::json!({ "message": "promo" }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn delay_settings_validate_window() {
    let dir = tempfile::tempdir().unwrap_or_else(|e| panic!("{e}"));
    wagate_config::set_config_dir(dir.path().to_path_buf());

    let app = TestApp::spawn().await;
    let resp = app
        .post("/settings/delays")
        .json(&serde_json::json!({ "delay_min_ms": 500, "delay_max_ms": 100 }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 400);

    let resp = app
        .post("/settings/delays")
        .json(&serde_json::json!({ "delay_min_ms": 100, "delay_max_ms": 500 }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);

    // Accepted settings are written back to the config file.
    let written = std::fs::read_to_string(dir.path().join("wagate.toml")).unwrap_or_default();
    assert!(written.contains("delay_min_ms = 100"));
    assert!(written.contains("delay_max_ms = 500"));

    wagate_config::clear_config_dir();
}

// ── Webhook admin ────────────────────────────────────────────────────────────

#[tokio::test]
async fn webhook_admin_roundtrip() {
    let app = TestApp::spawn().await;

    let resp = app
        .post("/set-webhook")
        .json(&serde_json::json!({ "url": "notaurl" }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 400);

    let resp = app
        .post("/set-webhook")
        .json(&serde_json::json!({ "url": "https://example.test/hook" }))
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    assert_eq!(
        app.bridge.webhook_url().await.as_deref(),
        Some("https://example.test/hook")
    );

    let resp = app
        .client
        .delete(format!("{}/remove-webhook", app.base))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    assert_eq!(app.bridge.webhook_url().await, None);

    let resp = app
        .client
        .delete(format!("{}/remove-webhook", app.base))
        .header("x-api-key", API_KEY)
        .send()
        .await
        .unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 404);
}

// ── Session management ───────────────────────────────────────────────────────

#[tokio::test]
async fn reconnect_refused_while_connected() {
    let app = TestApp::spawn().await;
    app.make_ready().await;

    let resp = app.post("/reconnect").send().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 400);
    assert_eq!(app.session.initialize_calls(), 0);
}

#[tokio::test]
async fn reconnect_initializes_when_disconnected() {
    let app = TestApp::spawn().await;
    app.bridge.set_status(ConnectionStatus::Disconnected).await;

    let resp = app.post("/reconnect").send().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 202);
    assert_eq!(app.session.initialize_calls(), 1);
    assert_eq!(app.bridge.status().await, ConnectionStatus::Initializing);
}

#[tokio::test]
async fn disconnect_marks_status() {
    let app = TestApp::spawn().await;
    app.make_ready().await;

    let resp = app.post("/disconnect").send().await.unwrap_or_else(|e| panic!("{e}"));
    assert_eq!(resp.status(), 200);
    assert_eq!(app.bridge.status().await, ConnectionStatus::Disconnected);
}
