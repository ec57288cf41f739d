//! Integration tests for the password gate.

use securebox::access::{AccessState, AccessVerifier};
use securebox::crypto::kdf::{KdfParams, MIN_ITERATIONS};
use securebox::errors::SecureBoxError;
use securebox::vault::VaultPaths;
use tempfile::TempDir;

fn verifier(dir: &TempDir) -> AccessVerifier {
    AccessVerifier::new(
        VaultPaths::new(dir.path().join(".securebox")),
        KdfParams {
            iterations: MIN_ITERATIONS,
        },
    )
}

#[test]
fn only_the_setup_password_unlocks() {
    let dir = TempDir::new().unwrap();
    let v = verifier(&dir);
    assert_eq!(v.state(), AccessState::Uninitialized);

    v.setup("correct-horse", "correct-horse").unwrap();
    assert_eq!(v.state(), AccessState::Initialized);

    assert!(v.login("correct-horse").is_ok());
    for wrong in ["Correct-horse", "correct-horse ", "", "x"] {
        assert!(matches!(v.login(wrong), Err(SecureBoxError::AccessDenied)));
    }
}

#[test]
fn fresh_verifier_reads_existing_files() {
    let dir = TempDir::new().unwrap();
    let key = verifier(&dir).setup("correct-horse", "correct-horse").unwrap();

    // A new process would build a new verifier over the same directory.
    let again = verifier(&dir).login("correct-horse").unwrap();
    assert_eq!(key, again);
}

#[test]
fn missing_probe_means_uninitialized() {
    let dir = TempDir::new().unwrap();
    let v = verifier(&dir);
    v.setup("correct-horse", "correct-horse").unwrap();
    std::fs::remove_file(v.paths().probe()).unwrap();

    assert_eq!(v.state(), AccessState::Uninitialized);
    assert!(matches!(
        v.login("correct-horse"),
        Err(SecureBoxError::NotInitialized(_))
    ));
}

#[test]
fn setup_refuses_to_orphan_existing_data() {
    let dir = TempDir::new().unwrap();
    let v = verifier(&dir);
    let ctx = v.initialize("correct-horse", "correct-horse").unwrap();
    let mut store = ctx.load().unwrap();
    store.create("wifi", "ssid=home").unwrap();
    ctx.save(&store).unwrap();

    std::fs::remove_file(v.paths().salt()).unwrap();
    assert!(matches!(
        v.setup("new-password", "new-password"),
        Err(SecureBoxError::AlreadyInitialized(_))
    ));
}

#[test]
fn changed_configuration_does_not_lock_out() {
    let dir = TempDir::new().unwrap();
    let key = verifier(&dir).setup("correct-horse", "correct-horse").unwrap();

    for iterations in [MIN_ITERATIONS + 1, MIN_ITERATIONS * 2] {
        let reconfigured = AccessVerifier::new(
            VaultPaths::new(dir.path().join(".securebox")),
            KdfParams { iterations },
        );
        assert_eq!(reconfigured.login("correct-horse").unwrap(), key);
        assert!(matches!(
            reconfigured.login("wrong-horse"),
            Err(SecureBoxError::AccessDenied)
        ));
    }
}

#[test]
fn binary_probe_file_is_denied_not_io() {
    let dir = TempDir::new().unwrap();
    let v = verifier(&dir);
    v.setup("correct-horse", "correct-horse").unwrap();
    std::fs::write(v.paths().probe(), [0xFF, 0xFE, 0x00, 0x80]).unwrap();

    assert!(matches!(
        v.login("correct-horse"),
        Err(SecureBoxError::AccessDenied)
    ));
}
