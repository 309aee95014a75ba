//! # Local Volume Walk Tests
//!
//! Walks real directory trees built in a temp dir.
//!
//! These tests verify:
//! - One secret per directory, one key per file, exact byte contents
//! - Hidden entries are never loaded themselves
//! - Kubelet's `..data` symlink layout resolves each key to its secret
//! - Walking into an existing store merges instead of resetting
//! - Read failures abort the walk

use mounted_secrets::{spawn_walk, walk, LoadError, Secrets, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn text<'a>(secrets: &'a Secrets, secret: &str, key: &str) -> Option<&'a str> {
    secrets.value(secret, key).and_then(Value::as_str)
}

/// Lay out a secret the way the kubelet's atomic writer does:
/// `..<timestamp>/<key>`, `..data -> ..<timestamp>`, `<key> -> ..data/<key>`
#[cfg(unix)]
fn write_atomic_secret(root: &Path, secret: &str, timestamp: &str, values: &[(&str, &str)]) {
    use std::os::unix::fs::symlink;

    let secret_dir = root.join(secret);
    let payload_dir = secret_dir.join(timestamp);
    fs::create_dir_all(&payload_dir).unwrap();
    for (key, value) in values {
        fs::write(payload_dir.join(key), value).unwrap();
    }

    let data_link = secret_dir.join("..data");
    if fs::symlink_metadata(&data_link).is_ok() {
        fs::remove_file(&data_link).unwrap();
    }
    symlink(timestamp, &data_link).unwrap();

    for (key, _) in values {
        let key_link = secret_dir.join(key);
        if fs::symlink_metadata(&key_link).is_err() {
            symlink(Path::new("..data").join(key), key_link).unwrap();
        }
    }
}

#[test]
fn test_plain_tree_has_one_secret_per_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "database/username", b"admin");
    write(root, "database/password", b"s3cr3t\n");
    write(root, "tls/tls.crt", &[0x30, 0x82, 0x01, 0x0a]);

    let secrets = walk(root).unwrap();

    assert_eq!(secrets.len(), 2);
    assert_eq!(secrets["database"].len(), 2);
    assert_eq!(text(&secrets, "database", "username"), Some("admin"));
    assert_eq!(text(&secrets, "database", "password"), Some("s3cr3t\n"));
    assert_eq!(
        secrets.value("tls", "tls.crt").map(Value::as_bytes),
        Some(&[0x30, 0x82, 0x01, 0x0a][..])
    );
}

#[test]
fn test_service_with_hidden_data_directory() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "service/port", b"8080");
    write(root, "service/..data/hostname", b"db.local");

    let secrets = walk(root).unwrap();

    assert_eq!(secrets.len(), 1);
    assert_eq!(secrets["service"].len(), 2);
    assert_eq!(text(&secrets, "service", "port"), Some("8080"));
    assert_eq!(text(&secrets, "service", "hostname"), Some("db.local"));
    assert!(!secrets.contains_secret("..data"));
}

#[test]
fn test_empty_directory_is_secret_without_keys() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("empty-secret")).unwrap();

    let secrets = walk(temp_dir.path()).unwrap();

    assert_eq!(secrets.len(), 1);
    assert!(secrets["empty-secret"].is_empty());
}

#[test]
fn test_empty_file_is_empty_value() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "service/optional", b"");

    let secrets = walk(temp_dir.path()).unwrap();

    assert_eq!(secrets.value("service", "optional"), Some(&Value::default()));
}

#[test]
fn test_hidden_files_are_not_keys() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "service/.gitkeep", b"");
    write(root, "service/port", b"8080");

    let secrets = walk(root).unwrap();

    assert!(secrets.value("service", ".gitkeep").is_none());
    assert_eq!(secrets["service"].len(), 1);
}

#[test]
fn test_same_key_in_two_secrets() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "primary/password", b"one");
    write(root, "replica/password", b"two");

    let secrets = walk(root).unwrap();

    assert_eq!(text(&secrets, "primary", "password"), Some("one"));
    assert_eq!(text(&secrets, "replica", "password"), Some("two"));
}

#[test]
fn test_rewalk_overwrites_and_keeps_untouched_entries() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "service/port", b"8080");

    let mut secrets = Secrets::new();
    secrets.insert_value("preloaded", "token", "keep-me");
    secrets.walk(root).unwrap();
    assert_eq!(text(&secrets, "service", "port"), Some("8080"));

    write(root, "service/port", b"9090");
    secrets.walk(root).unwrap();

    assert_eq!(text(&secrets, "service", "port"), Some("9090"));
    assert_eq!(text(&secrets, "preloaded", "token"), Some("keep-me"));
}

#[test]
fn test_walk_summary_counts() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "service/port", b"8080");
    write(root, "service/..data/hostname", b"db.local");
    fs::create_dir(root.join("empty-secret")).unwrap();

    let mut secrets = Secrets::new();
    let summary = secrets.walk(root).unwrap();

    assert_eq!(summary.directories, 2);
    assert_eq!(summary.keys, 2);
    assert_eq!(summary.hidden, 1);
    assert_eq!(summary.unresolved, 0);
}

#[test]
fn test_missing_root_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("not-mounted");

    let err = walk(&missing).unwrap_err();

    assert!(matches!(err, LoadError::Walk { .. }));
    assert_eq!(err.path(), missing.as_path());
}

#[cfg(unix)]
#[test]
fn test_kubelet_atomic_layout() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_atomic_secret(
        root,
        "service",
        "..2024_01_01_00_00_00.000000000",
        &[("hostname", "db.local"), ("port", "8080")],
    );

    let secrets = walk(root).unwrap();

    assert_eq!(secrets.len(), 1);
    assert_eq!(secrets["service"].len(), 2);
    assert_eq!(text(&secrets, "service", "hostname"), Some("db.local"));
    assert_eq!(text(&secrets, "service", "port"), Some("8080"));
}

#[cfg(unix)]
#[test]
fn test_kubelet_update_never_leaks_old_values() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write_atomic_secret(
        root,
        "service",
        "..2024_01_01_00_00_00.000000000",
        &[("password", "old-password")],
    );

    let mut secrets = Secrets::new();
    secrets.walk(root).unwrap();
    assert_eq!(text(&secrets, "service", "password"), Some("old-password"));

    // The kubelet writes a new payload dir, swaps ..data and removes the old one
    fs::remove_dir_all(root.join("service/..2024_01_01_00_00_00.000000000")).unwrap();
    write_atomic_secret(
        root,
        "service",
        "..2024_02_01_00_00_00.000000000",
        &[("password", "new-password")],
    );
    secrets.walk(root).unwrap();

    for (secret, keys) in &secrets {
        for (key, value) in keys {
            assert!(
                !value.to_string_lossy().starts_with("old"),
                "stale value for {secret}/{key}"
            );
        }
    }
    assert_eq!(text(&secrets, "service", "password"), Some("new-password"));
}

#[cfg(unix)]
#[test]
fn test_single_secret_mount_uses_root_name() {
    let temp_dir = TempDir::new().unwrap();
    write_atomic_secret(
        temp_dir.path(),
        "service",
        "..2024_01_01_00_00_00.000000000",
        &[("port", "8080")],
    );

    let secrets = walk(temp_dir.path().join("service")).unwrap();

    assert_eq!(secrets.len(), 1);
    assert_eq!(text(&secrets, "service", "port"), Some("8080"));
}

#[cfg(unix)]
#[test]
fn test_current_directory_mount_uses_its_name() {
    let temp_dir = TempDir::new().unwrap();
    write_atomic_secret(
        temp_dir.path(),
        "service",
        "..2024_01_01_00_00_00.000000000",
        &[("port", "8080")],
    );

    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(temp_dir.path().join("service")).unwrap();
    let result = walk(".");
    std::env::set_current_dir(previous).unwrap();

    let secrets = result.unwrap();
    assert_eq!(secrets.len(), 1);
    assert_eq!(text(&secrets, "service", "port"), Some("8080"));
}

#[cfg(unix)]
#[test]
fn test_unreadable_file_aborts_walk() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "a-service/port", b"8080");
    fs::create_dir(root.join("b-service")).unwrap();
    std::os::unix::fs::symlink("..data/gone", root.join("b-service/broken")).unwrap();
    write(root, "c-service/port", b"9090");

    let mut secrets = Secrets::new();
    let err = secrets.walk(root).unwrap_err();

    assert!(matches!(err, LoadError::Read { .. }));
    assert_eq!(err.path(), root.join("b-service/broken").as_path());
    // Applied before the failure, and nothing after it
    assert_eq!(text(&secrets, "a-service", "port"), Some("8080"));
    assert!(!secrets.contains_secret("c-service"));
}

#[tokio::test]
async fn test_spawn_walk_loads_on_blocking_pool() {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "service/port", b"8080");

    let secrets = spawn_walk(temp_dir.path()).await.unwrap();

    assert_eq!(text(&secrets, "service", "port"), Some("8080"));
}
