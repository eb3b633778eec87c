//! Signer subprocess protocol tests using scripted stdio signers.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

use tempfile::TempDir;

use agora_client::{ClientError, Config, Signer, SubprocessSigner};

/// Write an executable shell script acting as the signer.
fn scripted_signer(dir: &TempDir, script: &str) -> PathBuf {
    let path = dir.path().join("fake-signer");
    std::fs::write(&path, script).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("chmod script");
    path
}

fn signer_for(program: PathBuf) -> SubprocessSigner {
    let config = Config::new("https://example.com", "did:key:z6MkTest", "test-secret")
        .expect("config")
        .with_signer_path(program);
    SubprocessSigner::new(&config)
}

#[tokio::test]
async fn auth_payload_round_trips_through_the_subprocess() {
    let dir = TempDir::new().expect("tempdir");
    // The payload echoes AGENT_DID, proving the identity reaches the
    // child's environment.
    let program = scripted_signer(
        &dir,
        r#"#!/bin/sh
printf '{"jsonrpc":"2.0","id":1,"result":{"protocolVersion":"2024-11-05"}}\n'
printf '{"jsonrpc":"2.0","id":2,"result":{"content":[{"type":"text","text":"{\\"success\\":true,\\"did\\":\\"%s\\",\\"timestamp\\":1700000000000,\\"nonce\\":\\"n1\\",\\"signature\\":\\"sig1\\"}"}]}}\n' "$AGENT_DID"
cat >/dev/null
"#,
    );

    let payload = signer_for(program)
        .auth_payload()
        .await
        .expect("auth payload");

    assert_eq!(payload.did, "did:key:z6MkTest");
    assert_eq!(payload.timestamp, 1_700_000_000_000);
    assert_eq!(payload.nonce, "n1");
    assert_eq!(payload.signature, "sig1");
}

#[tokio::test]
async fn notifications_before_the_response_are_skipped() {
    let dir = TempDir::new().expect("tempdir");
    let program = scripted_signer(
        &dir,
        r#"#!/bin/sh
printf '{"jsonrpc":"2.0","id":1,"result":{}}\n'
printf '{"jsonrpc":"2.0","method":"notifications/message","params":{"level":"info"}}\n'
printf '{"jsonrpc":"2.0","id":2,"result":{"content":[{"type":"text","text":"{\\"success\\":true,\\"paymentHeader\\":\\"proof-123\\"}"}]}}\n'
cat >/dev/null
"#,
    );

    let header = signer_for(program)
        .payment_header(&serde_json::json!({ "network": "solana-devnet" }))
        .await
        .expect("payment header");

    assert_eq!(header, "proof-123");
}

#[tokio::test]
async fn tool_error_response_is_a_protocol_error() {
    let dir = TempDir::new().expect("tempdir");
    let program = scripted_signer(
        &dir,
        r#"#!/bin/sh
printf '{"jsonrpc":"2.0","id":1,"result":{}}\n'
printf '{"jsonrpc":"2.0","id":2,"error":{"code":-32000,"message":"key not loaded"}}\n'
cat >/dev/null
"#,
    );

    let err = signer_for(program)
        .auth_payload()
        .await
        .expect_err("auth should fail");

    match err {
        ClientError::SignerProtocol(message) => assert!(message.contains("key not loaded")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unsuccessful_payload_reports_the_signer_error() {
    let dir = TempDir::new().expect("tempdir");
    let program = scripted_signer(
        &dir,
        r#"#!/bin/sh
printf '{"jsonrpc":"2.0","id":1,"result":{}}\n'
printf '{"jsonrpc":"2.0","id":2,"result":{"content":[{"type":"text","text":"{\\"success\\":false,\\"error\\":\\"no key configured\\"}"}]}}\n'
cat >/dev/null
"#,
    );

    let err = signer_for(program)
        .auth_payload()
        .await
        .expect_err("auth should fail");

    match err {
        ClientError::SignerProtocol(message) => assert!(message.contains("no key configured")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn handshake_failure_means_signer_unavailable() {
    let dir = TempDir::new().expect("tempdir");
    let program = scripted_signer(
        &dir,
        r#"#!/bin/sh
printf '{"jsonrpc":"2.0","id":1,"error":{"code":-32600,"message":"unsupported protocol"}}\n'
cat >/dev/null
"#,
    );

    let err = signer_for(program)
        .auth_payload()
        .await
        .expect_err("handshake should fail");

    assert!(matches!(err, ClientError::SignerUnavailable(_)));
}

#[tokio::test]
async fn early_exit_means_signer_unavailable() {
    let dir = TempDir::new().expect("tempdir");
    let program = scripted_signer(&dir, "#!/bin/sh\nexit 0\n");

    let err = signer_for(program)
        .auth_payload()
        .await
        .expect_err("auth should fail");

    assert!(matches!(err, ClientError::SignerUnavailable(_)));
}
