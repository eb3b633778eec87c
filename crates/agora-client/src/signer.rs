//! Signer gateway: delegates private-key operations to an external signing
//! process.
//!
//! The signer executable speaks a tool-invocation protocol over its
//! stdin/stdout: newline-delimited JSON-RPC 2.0 with an `initialize`
//! handshake and `tools/call` requests. Tool results carry a text-encoded
//! JSON payload inside a `content` list. The private key never enters this
//! process's request bodies or logs; it is handed to the signer through its
//! environment.
//!
//! A connection is opened on demand for each logical operation and closed
//! deterministically afterwards. Transient failures are not retried here;
//! they surface directly to the caller.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::ClientError;

/// Default signer executable, resolved from `PATH`.
pub const DEFAULT_SIGNER_PROGRAM: &str = "agora-signer";

/// Signer capability producing an authentication payload.
pub const TOOL_AUTH_PAYLOAD: &str = "generate_auth_payload";
/// Signer capability producing a DID signature over an arbitrary message.
pub const TOOL_DID_SIGNATURE: &str = "create_did_signature";
/// Signer capability producing an x402 payment proof header.
pub const TOOL_X402_PAYMENT: &str = "create_x402_payment";

/// How long to wait for the signer to exit after its stdin is closed.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Authentication payload produced by the signer.
///
/// Created fresh for every authentication attempt, consumed immediately by
/// the verification request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthPayload {
    /// The agent's decentralized identifier.
    pub did: String,
    /// Millisecond timestamp the signature covers.
    pub timestamp: i64,
    /// Random nonce the signature covers.
    pub nonce: String,
    /// Signature over `did:timestamp:nonce`.
    pub signature: String,
}

/// Narrow signing interface.
///
/// The concrete transport (subprocess, in-process library, remote service)
/// is swappable behind this trait; tests inject fakes.
pub trait Signer: Send + Sync {
    /// Produce a fresh authentication payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the signer is unavailable or its result is
    /// malformed.
    fn auth_payload(&self) -> impl Future<Output = Result<AuthPayload, ClientError>> + Send;

    /// Sign an arbitrary message, returning the raw signer result for the
    /// caller to present.
    ///
    /// # Errors
    ///
    /// Returns an error if the signer is unavailable or its response is
    /// malformed.
    fn sign_message(
        &self,
        message: &str,
    ) -> impl Future<Output = Result<Value, ClientError>> + Send;

    /// Produce an `X-PAYMENT` header value for the given x402 payment
    /// requirement.
    ///
    /// # Errors
    ///
    /// Returns an error if the signer is unavailable or reports failure.
    fn payment_header(
        &self,
        requirement: &Value,
    ) -> impl Future<Output = Result<String, ClientError>> + Send;
}

/// Signer backed by a per-operation subprocess.
#[derive(Clone)]
pub struct SubprocessSigner {
    program: PathBuf,
    agent_did: String,
    private_key: String,
}

impl std::fmt::Debug for SubprocessSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubprocessSigner")
            .field("program", &self.program)
            .field("agent_did", &self.agent_did)
            .finish_non_exhaustive()
    }
}

impl SubprocessSigner {
    /// Create a signer from the client configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        let program = config
            .signer_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SIGNER_PROGRAM));
        Self {
            program,
            agent_did: config.agent_did.clone(),
            private_key: config.private_key.clone(),
        }
    }

    /// The executable this signer spawns.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    async fn call(&self, tool: &str, arguments: Value) -> Result<Value, ClientError> {
        let mut conn =
            SignerConnection::connect(&self.program, &self.agent_did, &self.private_key).await?;
        let result = conn.call_tool(tool, arguments).await;
        conn.close().await;
        result
    }
}

impl Signer for SubprocessSigner {
    async fn auth_payload(&self) -> Result<AuthPayload, ClientError> {
        let result = self.call(TOOL_AUTH_PAYLOAD, json!({})).await?;
        let payload: AuthPayloadResult = parse_text_payload(&result)?;
        if !payload.success {
            return Err(ClientError::SignerProtocol(
                payload
                    .error
                    .unwrap_or_else(|| "signer failed to generate auth payload".to_string()),
            ));
        }
        match (payload.did, payload.timestamp, payload.nonce, payload.signature) {
            (Some(did), Some(timestamp), Some(nonce), Some(signature)) => Ok(AuthPayload {
                did,
                timestamp,
                nonce,
                signature,
            }),
            _ => Err(ClientError::SignerProtocol(
                "auth payload missing required fields".to_string(),
            )),
        }
    }

    async fn sign_message(&self, message: &str) -> Result<Value, ClientError> {
        self.call(TOOL_DID_SIGNATURE, json!({ "message": message }))
            .await
    }

    async fn payment_header(&self, requirement: &Value) -> Result<String, ClientError> {
        let result = self
            .call(
                TOOL_X402_PAYMENT,
                json!({ "paymentRequirements": requirement }),
            )
            .await?;
        let payment: PaymentResult = parse_text_payload(&result)?;
        match (payment.success, payment.payment_header) {
            (true, Some(header)) => Ok(header),
            _ => Err(ClientError::SignerProtocol(
                payment
                    .error
                    .unwrap_or_else(|| "signer failed to create payment".to_string()),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AuthPayloadResult {
    #[serde(default)]
    success: bool,
    did: Option<String>,
    timestamp: Option<i64>,
    nonce: Option<String>,
    signature: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResult {
    #[serde(default)]
    success: bool,
    payment_header: Option<String>,
    error: Option<String>,
}

/// Extract and parse the text-encoded JSON payload from a tool result.
///
/// # Errors
///
/// Returns [`ClientError::SignerProtocol`] if the content list is missing,
/// has no text entry, or the text is not valid JSON.
pub fn parse_text_payload<T: serde::de::DeserializeOwned>(
    result: &Value,
) -> Result<T, ClientError> {
    let content = result
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ClientError::SignerProtocol("signer result missing content list".to_string())
        })?;
    let text = content
        .iter()
        .find(|item| item.get("type").and_then(Value::as_str) == Some("text"))
        .and_then(|item| item.get("text"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ClientError::SignerProtocol("signer result missing text content".to_string())
        })?;
    serde_json::from_str(text)
        .map_err(|e| ClientError::SignerProtocol(format!("invalid signer payload: {e}")))
}

/// A live channel to the signer subprocess.
///
/// Must be closed exactly once per connect, even when a call fails; the
/// child is additionally killed on drop as a backstop.
pub struct SignerConnection {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl std::fmt::Debug for SignerConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConnection")
            .field("next_id", &self.next_id)
            .finish_non_exhaustive()
    }
}

impl SignerConnection {
    /// Spawn the signer executable and perform the protocol handshake.
    ///
    /// The DID and private key are passed through the child's environment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SignerUnavailable`] if the subprocess cannot
    /// be started or the handshake does not complete.
    pub async fn connect(
        program: &Path,
        agent_did: &str,
        private_key: &str,
    ) -> Result<Self, ClientError> {
        debug!(program = %program.display(), "spawning signer");
        let mut child = Command::new(program)
            .env("AGENT_DID", agent_did)
            .env("AGENT_PRIVATE_KEY", private_key)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ClientError::SignerUnavailable(format!(
                    "failed to spawn '{}': {e}",
                    program.display()
                ))
            })?;

        let stdin = child.stdin.take().ok_or_else(|| {
            ClientError::SignerUnavailable("signer stdin unavailable".to_string())
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            ClientError::SignerUnavailable("signer stdout unavailable".to_string())
        })?;

        let mut conn = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
        };
        conn.initialize().await?;
        Ok(conn)
    }

    async fn initialize(&mut self) -> Result<(), ClientError> {
        let id = self
            .request(
                "initialize",
                json!({
                    "protocolVersion": "2024-11-05",
                    "clientInfo": {
                        "name": "agora-cli",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                    "capabilities": { "tools": {} },
                }),
            )
            .await?;
        // Handshake failures count as the channel never having been
        // established.
        self.read_response(id).await.map_err(|e| {
            ClientError::SignerUnavailable(format!("signer handshake failed: {e}"))
        })?;
        self.notify("notifications/initialized").await?;
        Ok(())
    }

    /// Invoke a named signer capability and return the raw tool result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::SignerProtocol`] on a malformed response and
    /// [`ClientError::SignerUnavailable`] if the channel breaks.
    pub async fn call_tool(&mut self, name: &str, arguments: Value) -> Result<Value, ClientError> {
        trace!(tool = name, "calling signer tool");
        let id = self
            .request("tools/call", json!({ "name": name, "arguments": arguments }))
            .await?;
        self.read_response(id).await
    }

    async fn request(&mut self, method: &str, params: Value) -> Result<u64, ClientError> {
        let id = self.next_id;
        self.next_id += 1;
        let message = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });
        self.send_line(&message).await?;
        Ok(id)
    }

    async fn notify(&mut self, method: &str) -> Result<(), ClientError> {
        let message = json!({ "jsonrpc": "2.0", "method": method });
        self.send_line(&message).await
    }

    async fn send_line(&mut self, message: &Value) -> Result<(), ClientError> {
        let mut line = message.to_string().into_bytes();
        line.push(b'\n');
        self.stdin.write_all(&line).await.map_err(|e| {
            ClientError::SignerUnavailable(format!("failed to write to signer: {e}"))
        })?;
        self.stdin.flush().await.map_err(|e| {
            ClientError::SignerUnavailable(format!("failed to write to signer: {e}"))
        })
    }

    async fn read_response(&mut self, id: u64) -> Result<Value, ClientError> {
        loop {
            let mut line = String::new();
            let read = self.stdout.read_line(&mut line).await.map_err(|e| {
                ClientError::SignerUnavailable(format!("failed to read from signer: {e}"))
            })?;
            if read == 0 {
                return Err(ClientError::SignerUnavailable(
                    "signer closed the channel".to_string(),
                ));
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let message: Value = serde_json::from_str(line).map_err(|e| {
                ClientError::SignerProtocol(format!("invalid JSON from signer: {e}"))
            })?;
            // Skip server-initiated notifications and unrelated responses.
            if message.get("id").and_then(Value::as_u64) != Some(id) {
                continue;
            }
            if let Some(error) = message.get("error") {
                return Err(ClientError::SignerProtocol(format!(
                    "signer returned error: {error}"
                )));
            }
            return message.get("result").cloned().ok_or_else(|| {
                ClientError::SignerProtocol("signer response missing result".to_string())
            });
        }
    }

    /// Release the channel.
    ///
    /// Closes the child's stdin and reaps it, killing it if it does not
    /// exit promptly.
    pub async fn close(mut self) {
        drop(self.stdin);
        if tokio::time::timeout(CLOSE_TIMEOUT, self.child.wait())
            .await
            .is_err()
        {
            let _ = self.child.kill().await;
        }
    }
}
