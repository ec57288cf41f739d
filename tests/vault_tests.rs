//! Integration tests for the container store and its sealed file.

use std::fs;

use securebox::access::AccessVerifier;
use securebox::crypto::kdf::{KdfParams, MIN_ITERATIONS};
use securebox::errors::SecureBoxError;
use securebox::vault::{persistence, DuplicatePolicy, VaultContext, VaultPaths};
use tempfile::TempDir;

fn verifier(dir: &TempDir) -> AccessVerifier {
    AccessVerifier::new(
        VaultPaths::new(dir.path().join(".securebox")),
        KdfParams {
            iterations: MIN_ITERATIONS,
        },
    )
}

fn setup(dir: &TempDir) -> VaultContext {
    verifier(dir)
        .initialize("correct-horse", "correct-horse")
        .expect("setup")
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn empty_vault_loads_as_empty_store() {
    let dir = TempDir::new().unwrap();
    let ctx = setup(&dir);
    let store = ctx.load().unwrap();
    assert!(store.is_empty());
    assert!(store.list().is_empty());
}

#[test]
fn first_run_then_login_sees_saved_container() {
    let dir = TempDir::new().unwrap();

    // First run: setup, create, save.
    {
        let ctx = setup(&dir);
        let mut store = ctx.load().unwrap();
        store.create("wifi", "ssid=home;psk=hunter22").unwrap();
        ctx.save(&store).unwrap();
    }

    // The vault file never holds the plaintext.
    let raw = fs::read_to_string(dir.path().join(".securebox/vault.dat")).unwrap();
    assert!(!raw.contains("hunter22"));
    assert!(!raw.contains("wifi"));

    // Second run: login and read it back.
    let ctx = verifier(&dir).unlock("correct-horse").unwrap();
    let store = ctx.load().unwrap();
    assert_eq!(store.list(), vec!["wifi".to_string()]);
    assert_eq!(store.view("wifi").unwrap(), "ssid=home;psk=hunter22");

    // Wrong password never reaches the data.
    assert!(matches!(
        verifier(&dir).unlock("wrong-horse").err().unwrap(),
        SecureBoxError::AccessDenied
    ));
}

#[test]
fn wifi_container_survives_a_fresh_login() {
    let dir = TempDir::new().unwrap();

    // Setup run: only the salt, probe and KDF record are written.
    verifier(&dir)
        .setup("correct-horse", "correct-horse")
        .unwrap();

    // Later run: unlock from the persisted salt, add a container, save.
    {
        let ctx = verifier(&dir).unlock("correct-horse").unwrap();
        let mut store = ctx.load().unwrap();
        store.create("wifi", "ssid=home;pass=abc123").unwrap();
        ctx.save(&store).unwrap();
    }

    // Another run reads it back exactly.
    let ctx = verifier(&dir).unlock("correct-horse").unwrap();
    let store = ctx.load().unwrap();
    assert_eq!(store.view("wifi").unwrap(), "ssid=home;pass=abc123");
}

#[test]
fn create_edit_delete_persist() {
    let dir = TempDir::new().unwrap();
    let ctx = setup(&dir);

    let mut store = ctx.load().unwrap();
    store.create("a", "1").unwrap();
    store.create("b", "2").unwrap();
    ctx.save(&store).unwrap();

    let mut store = ctx.load().unwrap();
    store.edit("a", "one").unwrap();
    store.delete("b").unwrap();
    ctx.save(&store).unwrap();

    let store = ctx.load().unwrap();
    assert_eq!(store.list(), vec!["a".to_string()]);
    assert_eq!(store.view("a").unwrap(), "one");
    assert!(matches!(
        store.view("b"),
        Err(SecureBoxError::ContainerNotFound(_))
    ));
}

#[test]
fn duplicate_policy_follows_the_context() {
    let dir = TempDir::new().unwrap();
    let ctx = setup(&dir);

    let mut store = ctx.load().unwrap();
    store.create("wifi", "old").unwrap();
    assert!(matches!(
        store.create("wifi", "new"),
        Err(SecureBoxError::DuplicateName(_))
    ));
    ctx.save(&store).unwrap();

    let ctx = ctx.with_policy(DuplicatePolicy::Overwrite);
    let mut store = ctx.load().unwrap();
    store.create("wifi", "new").unwrap();
    assert_eq!(store.view("wifi").unwrap(), "new");
}

// ---------------------------------------------------------------------------
// Integrity
// ---------------------------------------------------------------------------

#[test]
fn altered_content_fails_signature_check() {
    let dir = TempDir::new().unwrap();
    let ctx = setup(&dir);

    let mut store = ctx.load().unwrap();
    store.create("wifi", "ssid=home").unwrap();
    store.create("bank", "pin=1234").unwrap();

    // Change content without re-signing, then seal it the normal way.
    store.get_mut("wifi").unwrap().content = "ssid=evil".to_string();
    let sealed = persistence::encode(&store, ctx.key()).unwrap();
    fs::write(ctx.paths().data(), sealed).unwrap();

    let store = ctx.load().unwrap();
    assert!(matches!(
        store.view("wifi"),
        Err(SecureBoxError::IntegrityMismatch(_))
    ));
    assert_eq!(store.view("bank").unwrap(), "pin=1234");
    assert_eq!(store.verify_all(), vec!["wifi".to_string()]);
}

#[test]
fn binary_vault_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let ctx = setup(&dir);
    fs::write(ctx.paths().data(), [0xFF, 0xFE, 0x00, 0x80]).unwrap();

    assert!(matches!(
        ctx.load().err().unwrap(),
        SecureBoxError::VaultLoad(_)
    ));
}

#[test]
fn corrupted_vault_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let ctx = setup(&dir);
    fs::write(ctx.paths().data(), "not-an-envelope").unwrap();

    assert!(matches!(
        ctx.load().err().unwrap(),
        SecureBoxError::VaultLoad(_)
    ));
}
