//! Common test utilities for paydesk integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use tempfile::TempDir;

use paydesk_service::crypto::hmac_sha256_hex;
use paydesk_service::{create_router, AppState, ServiceConfig};
use paydesk_store::RocksStore;

/// Shared secret used to sign test webhooks.
pub const WEBHOOK_SECRET: &str = "whsec_integration";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for seeding and inspection.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a harness after adjusting the default test configuration.
    pub fn with_config(adjust: impl FnOnce(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            store_uri: temp_dir.path().to_string_lossy().to_string(),
            database_name: "test".into(),
            webhook_secret: WEBHOOK_SECRET.into(),
            ..ServiceConfig::default()
        };
        adjust(&mut config);

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
        }
    }

    /// Hex HMAC-SHA256 of `body` under the test secret.
    pub fn sign(body: &[u8]) -> String {
        hmac_sha256_hex(WEBHOOK_SECRET, body)
    }

    /// Post a correctly signed Razorpay webhook.
    pub async fn post_signed(&self, body: &[u8]) -> TestResponse {
        let signature = Self::sign(body);
        self.post_razorpay(body, Some(&signature)).await
    }

    /// Post a Razorpay webhook with an arbitrary (or no) signature.
    pub async fn post_razorpay(&self, body: &[u8], signature: Option<&str>) -> TestResponse {
        let mut request = self
            .server
            .post("/razorpay-webhook")
            .content_type("application/json")
            .bytes(Bytes::copy_from_slice(body));
        if let Some(signature) = signature {
            request = request.add_header(
                HeaderName::from_static("x-razorpay-signature"),
                HeaderValue::from_str(signature).expect("signature is a valid header value"),
            );
        }
        request.await
    }

    /// Post a Dialogflow fulfillment request for `intent`.
    pub async fn fulfill(&self, intent: &str, parameters: Value) -> TestResponse {
        self.server
            .post("/webhook")
            .json(&json!({
                "responseId": "resp-1",
                "session": "projects/paydesk/agent/sessions/test",
                "queryResult": {
                    "queryText": "test",
                    "intent": {"displayName": intent},
                    "parameters": parameters
                },
                "originalDetectIntentRequest": {"source": "telegram", "payload": {}}
            }))
            .await
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A `payment.captured` event body.
pub fn captured_event(payment_id: &str, email: &str, amount: i64, created_at: i64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "entity": "event",
        "account_id": "acc_test",
        "event": "payment.captured",
        "contains": ["payment"],
        "payload": {
            "payment": {
                "entity": {
                    "id": payment_id,
                    "entity": "payment",
                    "amount": amount,
                    "currency": "INR",
                    "status": "captured",
                    "method": "upi",
                    "email": email,
                    "contact": "+919900000000",
                    "acquirer_data": {"rrn": "412345678901", "transaction_id": null},
                    "notes": {"subject": "Maths", "language": "English", "month": "January"},
                    "created_at": created_at
                }
            }
        },
        "created_at": created_at
    }))
    .expect("event serializes")
}
