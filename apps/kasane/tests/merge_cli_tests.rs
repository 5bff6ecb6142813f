//! # CLI Integration Tests
//!
//! End-to-end runs of the merge and check commands over a snapshot tree
//! laid out on disk the way the extraction stage produces it.

use kasane::cli::{cmd_check, cmd_merge};
use std::io::Write;
use std::path::Path;

fn write_file(path: &Path, body: &str) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    let mut file = std::fs::File::create(path).expect("create");
    file.write_all(body.as_bytes()).expect("write");
}

fn song_json(name: &str, level: u16) -> String {
    format!(
        r#"{{
            "1": {{
                "name": "{name}", "artist": "a", "genre": "POPS", "bpm": 150,
                "charts": [{{"designer": "d"}}],
                "chartLevels": [{level}],
                "releaseVersion": 1
            }}
        }}"#
    )
}

/// Two-region snapshot tree with songs and titles.
fn build_tree(dir: &Path) {
    write_file(&dir.join("jp/v1/song.json"), &song_json("Alpha", 100));
    write_file(&dir.join("jp/v2/song.json"), &song_json("Alpha", 105));
    write_file(&dir.join("intl/v2/song.json"), &song_json("Alpha", 105));
    write_file(
        &dir.join("jp/v1/title.json"),
        r#"{"9": {"name": "Champion", "rareType": "Gold"}}"#,
    );
    write_file(
        &dir.join("snapshots.toml"),
        r#"
[[releases]]
region = "JP"
version = 1
path = "jp/v1"

[[releases]]
region = "JP"
version = 2
path = "jp/v2"

[[releases]]
region = "INTL"
version = 2
path = "intl/v2"
"#,
    );
}

#[test]
fn merge_writes_canonical_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    let out = dir.path().join("merged.json");

    cmd_merge(&dir.path().join("snapshots.toml"), &out, false, false).expect("merge");

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("parse");

    // Song 1: one chart, level 100 at v1 and 105 at v2, Jp and Intl info.
    let song = &document["song"]["1"];
    assert_eq!(song["name"], "Alpha");
    assert_eq!(song["levelChangeLog"][0]["1"], 100);
    assert_eq!(song["levelChangeLog"][0]["2"], 105);
    assert!(song["regionalInfo"]["JP"].is_object());
    assert!(song["regionalInfo"]["INTL"].is_object());

    // Title 9 collapses to a single unregionalized value.
    assert_eq!(document["title"]["9"]["unregionalized"]["name"], "Champion");
    // Kinds with no snapshot files still appear, empty.
    assert_eq!(document["frame"], serde_json::json!({}));
}

#[test]
fn merge_output_is_stable_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    let out_a = dir.path().join("a.json");
    let out_b = dir.path().join("b.json");

    cmd_merge(&dir.path().join("snapshots.toml"), &out_a, true, false).expect("merge a");
    cmd_merge(&dir.path().join("snapshots.toml"), &out_b, true, false).expect("merge b");

    let bytes_a = std::fs::read(&out_a).expect("read a");
    let bytes_b = std::fs::read(&out_b).expect("read b");
    assert_eq!(bytes_a, bytes_b);
}

#[test]
fn merge_fails_fast_on_malformed_record_without_keep_going() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    // Chart/level length mismatch in a later release.
    write_file(
        &dir.path().join("jp/v2/song.json"),
        r#"{
            "1": {
                "name": "Alpha", "artist": "a", "genre": "POPS", "bpm": 150,
                "charts": [{"designer": "d"}],
                "chartLevels": [105, 110],
                "releaseVersion": 1
            }
        }"#,
    );
    let out = dir.path().join("merged.json");

    let result = cmd_merge(&dir.path().join("snapshots.toml"), &out, false, false);
    assert!(result.is_err());
    assert!(!out.exists());
}

#[test]
fn keep_going_writes_the_surviving_kinds() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    write_file(
        &dir.path().join("jp/v2/song.json"),
        r#"{
            "1": {
                "name": "Alpha", "artist": "a", "genre": "POPS", "bpm": 150,
                "charts": [{"designer": "d"}],
                "chartLevels": [105, 110],
                "releaseVersion": 1
            }
        }"#,
    );
    let out = dir.path().join("merged.json");

    // The surviving kinds are written, but the run still reports failure
    // so a wrapper script can tell the document is partial.
    let result = cmd_merge(&dir.path().join("snapshots.toml"), &out, false, true);
    assert!(result.is_err());

    let document: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("read")).expect("parse");
    // The failed song kind is omitted; titles survive.
    assert!(document.get("song").is_none());
    assert_eq!(document["title"]["9"]["unregionalized"]["name"], "Champion");
}

#[test]
fn check_passes_on_a_clean_tree() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    cmd_check(&dir.path().join("snapshots.toml")).expect("check");
}

#[test]
fn check_reports_failed_kinds() {
    let dir = tempfile::tempdir().expect("tempdir");
    build_tree(dir.path());
    write_file(
        &dir.path().join("jp/v1/title.json"),
        // A title without a rarity tier is structurally malformed.
        r#"{"9": {"name": "Champion"}}"#,
    );

    assert!(cmd_check(&dir.path().join("snapshots.toml")).is_err());
}
