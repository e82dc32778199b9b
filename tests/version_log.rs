//! Version Log Tests
//!
//! Bounded newest-first history per entity.

use std::sync::Arc;

use gridpress::store::InMemoryObjectStore;
use gridpress::version::VersionLog;
use gridpress::ContentError;
use serde_json::json;
use uuid::Uuid;

fn log(max_versions: usize) -> VersionLog {
    VersionLog::new(Arc::new(InMemoryObjectStore::new()), "page-versions", max_versions)
}

#[test]
fn test_absent_history_is_empty() {
    let versions = log(5);
    assert!(versions.fetch_versions("biz", "home").unwrap().is_empty());
}

#[test]
fn test_seven_appends_keep_newest_five() {
    let versions = log(5);
    for n in 0..7 {
        versions.append_version("biz", "home", json!({"n": n})).unwrap();
    }

    let record = versions.fetch_versions("biz", "home").unwrap();
    assert_eq!(record.len(), 5);
    let kept: Vec<_> = record.versions.iter().map(|v| v.snapshot["n"].clone()).collect();
    assert_eq!(kept, vec![json!(6), json!(5), json!(4), json!(3), json!(2)]);
}

#[test]
fn test_newest_first_by_timestamp() {
    let versions = log(5);
    versions.append_version("biz", "home", json!({"n": 1})).unwrap();
    let record = versions.append_version("biz", "home", json!({"n": 2})).unwrap();

    assert_eq!(record.latest().unwrap().snapshot["n"], 2);
    assert!(record.versions[0].timestamp >= record.versions[1].timestamp);
}

#[test]
fn test_get_version_by_id() {
    let versions = log(5);
    let record = versions.append_version("biz", "home", json!({"n": 1})).unwrap();
    let id = record.versions[0].id;

    let entry = versions.get_version("biz", "home", &id).unwrap();
    assert_eq!(entry.snapshot, json!({"n": 1}));

    let err = versions.get_version("biz", "home", &Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, ContentError::NotFound(_)));
}

#[test]
fn test_histories_are_per_business_unit() {
    let versions = log(5);
    versions.append_version("a", "home", json!({})).unwrap();
    assert!(versions.fetch_versions("b", "home").unwrap().is_empty());

    versions.delete_versions("a", "home").unwrap();
    versions.delete_versions("a", "home").unwrap();
    assert!(versions.fetch_versions("a", "home").unwrap().is_empty());
}
