// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn store_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("drafts.json")
}

#[test]
fn missing_file_opens_empty() {
    let dir = tempdir().unwrap();
    let kv = FileKv::open(store_path(&dir)).unwrap();
    assert_eq!(kv.get("a").unwrap(), None);
}

#[test]
fn entries_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = store_path(&dir);

    let kv = FileKv::open(&path).unwrap();
    kv.set("a", "1").unwrap();
    kv.set("b", "2").unwrap();
    drop(kv);

    let kv = FileKv::open(&path).unwrap();
    assert_eq!(kv.get("a").unwrap().as_deref(), Some("1"));
    assert_eq!(kv.get("b").unwrap().as_deref(), Some("2"));
}

#[test]
fn remove_survives_reopen() {
    let dir = tempdir().unwrap();
    let path = store_path(&dir);

    let kv = FileKv::open(&path).unwrap();
    kv.set("a", "1").unwrap();
    kv.remove("a").unwrap();
    drop(kv);

    let kv = FileKv::open(&path).unwrap();
    assert_eq!(kv.get("a").unwrap(), None);
}

#[test]
fn creates_missing_parent_directories() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deeper/drafts.json");

    let kv = FileKv::open(&path).unwrap();
    kv.set("a", "1").unwrap();
    assert!(path.exists());
}

#[test]
fn corrupt_file_is_rotated_to_bak_and_treated_as_empty() {
    let dir = tempdir().unwrap();
    let path = store_path(&dir);
    std::fs::write(&path, "{not json").unwrap();

    let kv = FileKv::open(&path).unwrap();
    assert_eq!(kv.get("a").unwrap(), None);
    assert!(path.with_extension("bak").exists());
    assert!(!path.exists());
}

#[test]
fn repeated_corruption_rotates_older_backups() {
    let dir = tempdir().unwrap();
    let path = store_path(&dir);

    for n in 0..4 {
        std::fs::write(&path, format!("corrupt-{n}")).unwrap();
        let _ = FileKv::open(&path).unwrap();
    }

    assert_eq!(
        std::fs::read_to_string(path.with_extension("bak")).unwrap(),
        "corrupt-3"
    );
    assert_eq!(
        std::fs::read_to_string(path.with_extension("bak.2")).unwrap(),
        "corrupt-2"
    );
    assert_eq!(
        std::fs::read_to_string(path.with_extension("bak.3")).unwrap(),
        "corrupt-1"
    );
}

#[test]
fn no_tmp_file_left_behind_after_writes() {
    let dir = tempdir().unwrap();
    let path = store_path(&dir);

    let kv = FileKv::open(&path).unwrap();
    kv.set("a", "1").unwrap();
    assert!(!path.with_extension("tmp").exists());
}
