//! Mock Telegram API server for testing
//!
//! Answers `sendMessage` so admin notifications can be observed without
//! talking to Telegram.

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::{
    matchers::{body_partial_json, method, path_regex},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const TEST_BOT_TOKEN: &str = "12345:test_token";

pub struct TelegramMockServer {
    pub server: MockServer,
}

impl TelegramMockServer {
    pub async fn new() -> Self {
        Self { server: MockServer::start().await }
    }

    /// A bot whose requests go to this server
    pub fn bot(&self) -> Bot {
        let api_url = url::Url::parse(&self.server.uri()).expect("mock server uri");
        Bot::new(TEST_BOT_TOKEN).set_api_url(api_url)
    }

    /// Accept messages to every chat
    pub async fn mock_send_message(&self) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message(1)))
            .mount(&self.server)
            .await;
    }

    /// Reject messages to one chat, as Telegram does for a blocked bot
    pub async fn mock_send_message_failure(&self, chat_id: i64) {
        Mock::given(method("POST"))
            .and(path_regex(r"(?i)/bot[^/]+/sendmessage$"))
            .and(body_partial_json(json!({ "chat_id": chat_id })))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "ok": false,
                "error_code": 403,
                "description": "Forbidden: bot was blocked by the user"
            })))
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    pub async fn sent_messages(&self) -> Vec<Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request: &Request| request.body_json::<Value>().ok())
            .collect()
    }
}

fn sent_message(chat_id: i64) -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 123,
            "from": {
                "id": 12345,
                "is_bot": true,
                "first_name": "TestBot",
                "username": "test_bot"
            },
            "chat": {
                "id": chat_id,
                "first_name": "Admin",
                "type": "private"
            },
            "date": 1640995200,
            "text": "Test message"
        }
    })
}
