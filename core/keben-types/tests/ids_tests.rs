use keben_types::{RemoteId, ReportId, SyncStatus};
use proptest::prelude::*;
use std::collections::HashSet;
use std::str::FromStr;

// ── ReportId ──────────────────────────────────────────────────────

#[test]
fn report_id_new_is_unique() {
    let a = ReportId::new();
    let b = ReportId::new();
    assert_ne!(a, b);
}

#[test]
fn report_id_new_is_a_uuid() {
    let id = ReportId::new();
    assert!(id.as_uuid().is_some());
}

#[test]
fn report_ids_sort_by_creation_time() {
    let ids: Vec<ReportId> = (0..50).map(|_| ReportId::new()).collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(ids, sorted);
}

#[test]
fn report_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    let id = ReportId::from_uuid(uuid);
    assert_eq!(id.as_uuid(), Some(uuid));
}

#[test]
fn report_id_accepts_legacy_format() {
    let id = ReportId::parse("report_1718000000000").unwrap();
    assert_eq!(id.as_str(), "report_1718000000000");
    assert!(id.as_uuid().is_none());
}

#[test]
fn report_id_parse_trims() {
    let id = ReportId::from_str("  abc  ").unwrap();
    assert_eq!(id.as_str(), "abc");
}

#[test]
fn report_id_rejects_blank() {
    assert!(ReportId::parse("").is_err());
    assert!(ReportId::parse("   ").is_err());
}

#[test]
fn report_id_display_and_parse() {
    let id = ReportId::new();
    let parsed = ReportId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn report_id_serializes_as_plain_string() {
    let id = ReportId::parse("report_1").unwrap();
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""report_1""#);
    let back: ReportId = serde_json::from_str(r#""report_1""#).unwrap();
    assert_eq!(back, id);
}

#[test]
fn report_id_hash_and_eq() {
    let id = ReportId::new();
    let mut set = HashSet::new();
    set.insert(id.clone());
    set.insert(id);
    assert_eq!(set.len(), 1);
}

// ── RemoteId ──────────────────────────────────────────────────────

#[test]
fn remote_id_from_json_number() {
    let id = RemoteId::from_json(&serde_json::json!(42)).unwrap();
    assert_eq!(id.as_str(), "42");
}

#[test]
fn remote_id_from_json_string() {
    let id = RemoteId::from_json(&serde_json::json!("row-7")).unwrap();
    assert_eq!(id, RemoteId::new("row-7"));
}

#[test]
fn remote_id_from_json_rejects_other_shapes() {
    assert!(RemoteId::from_json(&serde_json::json!(null)).is_none());
    assert!(RemoteId::from_json(&serde_json::json!("")).is_none());
    assert!(RemoteId::from_json(&serde_json::json!({"id": 1})).is_none());
}

// ── SyncStatus ────────────────────────────────────────────────────

#[test]
fn sync_status_defaults_to_pending() {
    assert_eq!(SyncStatus::default(), SyncStatus::Pending);
}

#[test]
fn sync_status_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&SyncStatus::Synced).unwrap(), r#""synced""#);
    let s: SyncStatus = serde_json::from_str(r#""failed""#).unwrap();
    assert_eq!(s, SyncStatus::Failed);
}

#[test]
fn sync_status_needs_sync() {
    assert!(SyncStatus::Pending.needs_sync());
    assert!(SyncStatus::Failed.needs_sync());
    assert!(!SyncStatus::Synced.needs_sync());
}

#[test]
fn sync_status_from_str_unknown() {
    assert!(SyncStatus::from_str("done").is_err());
    assert_eq!(SyncStatus::from_str("synced").unwrap(), SyncStatus::Synced);
}

proptest! {
    #[test]
    fn report_id_parse_roundtrips_any_non_blank(s in "[a-zA-Z0-9_-]{1,40}") {
        let id = ReportId::parse(&s).unwrap();
        prop_assert_eq!(id.to_string(), s);
    }
}
