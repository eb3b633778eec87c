//! Shared fixtures for integration tests.

use std::path::PathBuf;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::{Value, json};
use tempfile::TempDir;

use agora_client::{AuthPayload, ClientError, Config, Session, Signer, TokenStore};

/// In-process signer that records its calls.
#[derive(Debug, Default)]
pub struct FakeSigner {
    auth_calls: AtomicUsize,
    payment_requests: Mutex<Vec<Value>>,
    payment_header: Mutex<String>,
}

impl FakeSigner {
    pub fn new() -> Self {
        Self {
            auth_calls: AtomicUsize::new(0),
            payment_requests: Mutex::new(Vec::new()),
            payment_header: Mutex::new("x-payment-proof".to_string()),
        }
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn payment_requests(&self) -> Vec<Value> {
        self.payment_requests.lock().expect("lock").clone()
    }
}

impl Signer for FakeSigner {
    async fn auth_payload(&self) -> Result<AuthPayload, ClientError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        Ok(AuthPayload {
            did: "did:key:fake".to_string(),
            timestamp: 1_700_000_000_000,
            nonce: "n0nce".to_string(),
            signature: "sig".to_string(),
        })
    }

    async fn sign_message(&self, message: &str) -> Result<Value, ClientError> {
        Ok(json!({
            "content": [{
                "type": "text",
                "text": format!("{{\"signature\":\"signed:{message}\"}}"),
            }],
        }))
    }

    async fn payment_header(&self, requirement: &Value) -> Result<String, ClientError> {
        self.payment_requests
            .lock()
            .expect("lock")
            .push(requirement.clone());
        Ok(self.payment_header.lock().expect("lock").clone())
    }
}

/// A session wired to a mock server, with its token file in a tempdir.
pub struct Harness {
    pub session: Session<FakeSigner>,
    pub token_file: PathBuf,
    // Held for the lifetime of the harness so the token file survives.
    _dir: TempDir,
}

impl Harness {
    /// Build a harness pointing at `base_url`, optionally pre-seeding the
    /// token file.
    pub fn new(base_url: &str, cached_token: Option<&str>) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let token_file = dir.path().join(".agora-token");
        if let Some(token) = cached_token {
            std::fs::write(&token_file, token).expect("seed token");
        }

        let config = Config::new(base_url, "did:key:fake", "test-key").expect("config");
        let tokens = TokenStore::new(vec![token_file.clone()], token_file.clone());
        let session = Session::with_token_store(config, FakeSigner::new(), tokens);

        Self {
            session,
            token_file,
            _dir: dir,
        }
    }

    pub fn token_on_disk(&self) -> Option<String> {
        std::fs::read_to_string(&self.token_file).ok()
    }
}
