use std::fs;

use base64::{engine::general_purpose::STANDARD, Engine};
use rabbit_passhash::batch;
use rabbit_passhash::crypto::salt::FixedSaltSource;
use rabbit_passhash::crypto::{Algorithm, SaltedHasher};
use tempfile::tempdir;

#[test]
fn imports_hashes_and_exports_a_password_list() {
    let dir = tempdir().expect("temp dir");
    let import = dir.path().join("passwords.txt");
    let export = dir.path().join("hashes.json");
    fs::write(&import, "hunter2\n\n  pässwörd  \n").unwrap();

    let cli = vec!["guest".to_string()];
    let passwords = batch::collect_passwords(&cli, Some(&import)).expect("collect should work");
    assert_eq!(passwords, vec!["guest", "hunter2", "pässwörd"]);

    let mut hasher = SaltedHasher::with_salt_source(
        Algorithm::Sha256.primitive(),
        Box::new(FixedSaltSource::new([0u8; 4])),
        4,
    );
    let report = batch::hash_all(&mut hasher, &passwords);
    hasher.release();
    assert!(report.is_complete());

    let rendered = batch::render(&report).expect("render should work");
    batch::export(&rendered, &export).expect("export should work");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&export).unwrap()).unwrap();
    let entries = written.as_object().expect("json object");
    assert_eq!(entries.len(), 3);
    assert_eq!(
        entries["pässwörd"],
        "AAAAACINqH41lcTx0J9GvrtSLdzfhEqLw7MLa5cKP7SfEsnH"
    );
    for value in entries.values() {
        let decoded = STANDARD.decode(value.as_str().unwrap()).unwrap();
        assert_eq!(decoded.len(), 36);
        assert_eq!(&decoded[..4], &[0, 0, 0, 0]);
    }
}

#[test]
fn artifacts_verify_with_a_fresh_hasher() {
    let mut producer = SaltedHasher::for_algorithm(Algorithm::Sha512);
    let report = batch::hash_all(&mut producer, &["alpha".to_string(), "beta".to_string()]);
    drop(producer);

    let checker = SaltedHasher::for_algorithm(Algorithm::Sha512);
    for (password, encoded) in &report.hashes {
        assert!(checker.verify(password, encoded).expect("artifact is well formed"));
    }
    assert!(!checker
        .verify("gamma", &report.hashes["alpha"])
        .expect("artifact is well formed"));
}
