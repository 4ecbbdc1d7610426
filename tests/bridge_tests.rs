//! Integration tests for the host bridge: dispatch and the serve loop.

use std::io::Cursor;
use std::sync::Arc;

use encrypted_storage::audit::Auditor;
use encrypted_storage::bridge::{Bridge, HostRequest, INVALID_REQUEST, MODULE_NAME};
use encrypted_storage::config::DEFAULT_RESOURCE_NAME;
use encrypted_storage::errors::VaultError;
use encrypted_storage::vault::{Credential, MemoryVault, SecretStore, VaultProvider};
use serde_json::{json, Value};

fn bridge_over(vault: Arc<MemoryVault>) -> Bridge {
    Bridge::new(
        SecretStore::new(vault),
        Auditor::disabled(DEFAULT_RESOURCE_NAME),
    )
}

/// Helper: feed `input` through `serve` and parse every response line.
fn serve(bridge: &Bridge, input: &str) -> Vec<Value> {
    let mut out = Vec::new();
    let answered = bridge.serve(Cursor::new(input), &mut out).unwrap();

    let text = String::from_utf8(out).unwrap();
    let responses: Vec<Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).expect("response should be JSON"))
        .collect();
    assert_eq!(responses.len(), answered);
    responses
}

#[test]
fn serve_runs_full_scenario() {
    let vault = Arc::new(MemoryVault::new());
    let bridge = bridge_over(Arc::clone(&vault));

    let input = r#"
{"id":1,"module":"EncryptedStorage","method":"setItem","args":["token","abc123"]}
{"id":2,"method":"getItem","args":["token"]}
{"id":3,"method":"setItem","args":["token","xyz"]}
{"id":4,"method":"getItem","args":["token"]}
{"id":5,"method":"removeItem","args":["token"]}
{"id":6,"method":"getItem","args":["token"]}
{"id":7,"method":"removeItem","args":["token"]}
{"id":8,"method":"clear","args":[]}
"#;

    let r = serve(&bridge, input);
    assert_eq!(r.len(), 8);
    assert_eq!(r[0], json!({"id": 1, "resolve": "abc123"}));
    assert_eq!(r[1], json!({"id": 2, "resolve": "abc123"}));
    assert_eq!(r[2], json!({"id": 3, "resolve": "xyz"}));
    assert_eq!(r[3], json!({"id": 4, "resolve": "xyz"}));
    assert_eq!(r[4], json!({"id": 5, "resolve": "token"}));
    assert_eq!(r[5], json!({"id": 6, "resolve": null}));
    assert_eq!(r[6], json!({"id": 7, "resolve": "token"}));
    assert_eq!(r[7], json!({"id": 8, "resolve": null}));
    assert!(vault.is_empty());
}

#[test]
fn clear_empties_namespace() {
    let vault = Arc::new(MemoryVault::new());
    let bridge = bridge_over(Arc::clone(&vault));

    let input = r#"{"method":"setItem","args":["a","1"]}
{"method":"setItem","args":["b","2"]}
{"method":"clear"}
{"method":"getItem","args":["a"]}
{"method":"getItem","args":["b"]}
"#;

    let r = serve(&bridge, input);
    assert_eq!(r[2]["resolve"], Value::Null);
    assert_eq!(r[3]["resolve"], Value::Null);
    assert_eq!(r[4]["resolve"], Value::Null);
    assert!(r[2].get("id").is_none());
}

#[test]
fn malformed_line_is_rejected_and_loop_continues() {
    let bridge = bridge_over(Arc::new(MemoryVault::new()));

    let input = "this is not json\n\n{\"id\":\"x\",\"method\":\"getItem\",\"args\":[\"k\"]}\n";
    let r = serve(&bridge, input);

    assert_eq!(r.len(), 2);
    assert_eq!(r[0]["reject"]["code"], INVALID_REQUEST);
    assert!(r[0]["reject"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Malformed request"));
    assert_eq!(r[1], json!({"id": "x", "resolve": null}));
}

#[test]
fn invalid_utf8_line_is_rejected_and_loop_continues() {
    let vault = Arc::new(MemoryVault::new());
    let bridge = bridge_over(Arc::clone(&vault));

    let mut input = b"{\"id\":1,\"method\":\"getItem\",\"args\":[\"".to_vec();
    input.push(0xff);
    input.extend_from_slice(b"\"]}\n{\"id\":2,\"method\":\"setItem\",\"args\":[\"k\",\"v\"]}\n");

    let mut out = Vec::new();
    let answered = bridge.serve(Cursor::new(input), &mut out).unwrap();
    assert_eq!(answered, 2);

    let r: Vec<Value> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(r[0]["reject"]["code"], INVALID_REQUEST);
    assert!(r[0]["reject"]["message"]
        .as_str()
        .unwrap()
        .starts_with("Malformed request"));
    assert_eq!(r[1], json!({"id": 2, "resolve": "v"}));
    assert_eq!(vault.len(), 1);
}

#[test]
fn last_line_without_newline_is_answered() {
    let bridge = bridge_over(Arc::new(MemoryVault::new()));
    let r = serve(&bridge, "{\"id\":1,\"method\":\"getItem\",\"args\":[\"k\"]}");
    assert_eq!(r, vec![json!({"id": 1, "resolve": null})]);
}

#[test]
fn unknown_method_is_rejected() {
    let bridge = bridge_over(Arc::new(MemoryVault::new()));
    let r = serve(&bridge, "{\"id\":1,\"method\":\"multiGet\",\"args\":[]}\n");
    assert_eq!(r[0]["id"], 1);
    assert_eq!(r[0]["reject"]["code"], INVALID_REQUEST);
    assert!(r[0]["reject"]["message"]
        .as_str()
        .unwrap()
        .contains("multiGet"));
}

/// Vault that refuses every write.
struct ReadOnlyVault(MemoryVault);

impl VaultProvider for ReadOnlyVault {
    fn add(&self, _credential: &Credential) -> Result<(), VaultError> {
        Err(VaultError::AccessDenied("read-only".into()))
    }

    fn remove(&self, _credential: &Credential) -> Result<(), VaultError> {
        Err(VaultError::AccessDenied("read-only".into()))
    }

    fn find_all_by_resource(&self, resource: &str) -> Result<Vec<Credential>, VaultError> {
        self.0.find_all_by_resource(resource)
    }

    fn retrieve_password(&self, credential: &mut Credential) -> Result<(), VaultError> {
        self.0.retrieve_password(credential)
    }
}

#[test]
fn vault_failures_become_rejections_with_cause() {
    let inner = MemoryVault::new();
    inner
        .add(&Credential::new(DEFAULT_RESOURCE_NAME, "a", "1"))
        .unwrap();
    let bridge = Bridge::new(
        SecretStore::new(ReadOnlyVault(inner)),
        Auditor::disabled(DEFAULT_RESOURCE_NAME),
    );

    let resp = bridge.handle(HostRequest::new("setItem", vec![json!("k"), json!("v")]));
    let rejection = resp.rejection().unwrap();
    assert_eq!(rejection.code, "STORE_FAILED");
    assert_eq!(rejection.message, "An error occurred while saving k");
    assert!(rejection.cause.as_deref().unwrap().contains("read-only"));

    let resp = bridge.handle(HostRequest::new("removeItem", vec![json!("a")]));
    let rejection = resp.rejection().unwrap();
    assert_eq!(rejection.code, "REMOVE_FAILED");
    assert_eq!(rejection.message, "An error occurred while removing a");

    let resp = bridge.handle(HostRequest::new("clear", vec![]));
    let rejection = resp.rejection().unwrap();
    assert_eq!(rejection.code, "CLEAR_FAILED");
    assert_eq!(rejection.message, "An error occurred while clearing store");

    // Reads still work.
    let resp = bridge.handle(HostRequest::new("getItem", vec![json!("a")]));
    assert_eq!(resp.resolved(), Some(&json!("1")));
}

#[test]
fn module_name_is_fixed() {
    assert_eq!(MODULE_NAME, "EncryptedStorage");
}
