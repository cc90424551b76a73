use chrono::{TimeZone, Utc};
use keben_model::{
    default_unit, is_known_material, MaterialLine, Materials, Report, ReportDetails, ReportDraft,
    MATERIAL_OPTIONS,
};
use keben_types::{RemoteId, ReportId, SyncStatus};
use pretty_assertions::assert_eq;

fn details(materials: Materials) -> ReportDetails {
    ReportDetails {
        driver_name: "Alice".into(),
        truck_number: "KAA 1".into(),
        from: "Site A".into(),
        to: "Site B".into(),
        materials,
        purchase_cost: 1000.0,
        cess: 50.0,
        allowance: 200.0,
        fuel_per_day: Some(10.0),
        distance: Some(30.0),
        amount_paid: 2000.0,
        trips: None,
        remarks: None,
    }
}

fn report(materials: Materials) -> Report {
    ReportDraft::new(details(materials))
        .into_report(Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap())
}

fn roundtrip(r: &Report) -> Report {
    let json = serde_json::to_string(r).unwrap();
    serde_json::from_str(&json).unwrap()
}

// ── Round trips ──────────────────────────────────────────────────

#[test]
fn roundtrip_zero_materials() {
    let r = report(Materials::lines(vec![]));
    assert_eq!(roundtrip(&r), r);
}

#[test]
fn roundtrip_one_material() {
    let r = report(Materials::lines(vec![MaterialLine::new("Ballast 1/2", 5.0, "tons")]));
    assert_eq!(roundtrip(&r), r);
}

#[test]
fn roundtrip_many_materials() {
    let mut r = report(Materials::lines(vec![
        MaterialLine::new("Ballast 1/2", 5.0, "tons"),
        MaterialLine::new("Machine Blocks 9x9", 250.0, "pieces"),
        MaterialLine::new("Foundation Stones", 12.5, "ft"),
    ]));
    r.sync_status = SyncStatus::Synced;
    r.remote_id = Some(RemoteId::new("17"));
    r.details.trips = Some(3);
    r.details.remarks = Some("gate closed at 5pm".into());
    assert_eq!(roundtrip(&r), r);
}

#[test]
fn roundtrip_legacy_material() {
    let mut r = report(Materials::legacy("Murram"));
    r.sync_status = SyncStatus::Failed;
    assert_eq!(roundtrip(&r), r);
}

#[test]
fn roundtrip_legacy_material_with_amount() {
    let r = report(Materials::Legacy {
        material: "Foundation Stones".into(),
        amount: Some(30.0),
    });
    assert_eq!(roundtrip(&r), r);
}

// ── Stored JSON shape ────────────────────────────────────────────

#[test]
fn stored_json_uses_camel_case() {
    let r = report(Materials::lines(vec![MaterialLine::new("Hardcore", 2.0, "tons")]));
    let json = r.to_json().unwrap();
    assert_eq!(json["driverName"], "Alice");
    assert_eq!(json["truckNumber"], "KAA 1");
    assert_eq!(json["from"], "Site A");
    assert_eq!(json["purchaseCost"], 1000.0);
    assert_eq!(json["fuelPerDay"], 10.0);
    assert_eq!(json["amountPaid"], 2000.0);
    assert_eq!(json["syncStatus"], "pending");
    assert_eq!(json["materials"][0]["name"], "Hardcore");
    assert!(json.get("material").is_none());
    assert!(json.get("remoteId").is_none());
}

#[test]
fn legacy_json_has_single_material_key() {
    let r = report(Materials::legacy("Murram"));
    let json = r.to_json().unwrap();
    assert_eq!(json["material"], "Murram");
    assert!(json.get("materials").is_none());
}

#[test]
fn draft_into_report_starts_pending() {
    let r = report(Materials::legacy("Murram"));
    assert_eq!(r.sync_status, SyncStatus::Pending);
    assert!(r.remote_id.is_none());
    assert!(!r.id.as_str().is_empty());
}

// ── Records written by older app versions ───────────────────────

#[test]
fn reads_legacy_record_with_old_field_names() {
    let json = serde_json::json!({
        "id": "report_1718000000000",
        "driverName": "Bob",
        "truckNumber": "KCD 123R",
        "from": "Quarry",
        "to": "Town",
        "material": "Hardcore",
        "amount": null,
        "trips": null,
        "purchaseCost": 900,
        "cess": 40,
        "allowance": 150,
        "fuel": 12,
        "mileage": 55,
        "amountPaid": 1800,
        "timestamp": "2024-06-10T08:00:00.000Z"
    });
    let r = Report::from_json(json).unwrap();
    assert_eq!(r.id, ReportId::parse("report_1718000000000").unwrap());
    assert_eq!(r.details.materials, Materials::legacy("Hardcore"));
    assert_eq!(r.details.fuel_per_day, Some(12.0));
    assert_eq!(r.details.distance, Some(55.0));
    assert_eq!(r.details.trips, None);
    assert_eq!(r.sync_status, SyncStatus::Pending);
    assert_eq!(r.material_summary(), "Hardcore");
}

#[test]
fn reads_record_with_location_column_names() {
    let json = serde_json::json!({
        "id": "report_1",
        "driverName": "Bob",
        "truckNumber": "KCD 123R",
        "from_location": "Quarry",
        "to_location": "Town",
        "materials": [{"name": "River Sand", "amount": 3, "unit": "tons"}],
        "purchaseCost": 1,
        "cess": 0,
        "allowance": 0,
        "amountPaid": 2,
        "timestamp": "2024-06-10T08:00:00Z"
    });
    let r = Report::from_json(json).unwrap();
    assert_eq!(r.route(), "Quarry → Town");
    assert_eq!(r.material_summary(), "3 tons River Sand");
}

fn record_with(extra: serde_json::Value) -> serde_json::Value {
    let mut json = serde_json::json!({
        "id": "report_1",
        "driverName": "Bob",
        "truckNumber": "KCD 123R",
        "from": "Quarry",
        "to": "Town",
        "material": "Hardcore",
        "purchaseCost": 900,
        "cess": 40,
        "allowance": 150,
        "amountPaid": 1800,
        "timestamp": "2024-06-10T08:00:00Z"
    });
    if let (Some(obj), Some(extra)) = (json.as_object_mut(), extra.as_object()) {
        obj.extend(extra.clone());
    }
    json
}

#[test]
fn reads_record_with_both_distance_spellings() {
    let r = Report::from_json(record_with(serde_json::json!({
        "mileage": 12,
        "distance": 15
    })))
    .unwrap();
    assert_eq!(r.details.distance, Some(15.0));
}

#[test]
fn reads_record_with_both_fuel_spellings() {
    let r = Report::from_json(record_with(serde_json::json!({
        "fuel": 3,
        "fuelPerDay": 4
    })))
    .unwrap();
    assert_eq!(r.details.fuel_per_day, Some(4.0));
}

#[test]
fn old_spelling_fills_in_when_new_one_is_null() {
    let r = Report::from_json(record_with(serde_json::json!({
        "fuel": 3,
        "fuelPerDay": null,
        "mileage": 12,
        "distance": null
    })))
    .unwrap();
    assert_eq!(r.details.fuel_per_day, Some(3.0));
    assert_eq!(r.details.distance, Some(12.0));
}

#[test]
fn coalesced_record_is_written_back_with_current_names() {
    let r = Report::from_json(record_with(serde_json::json!({
        "fuel": 3,
        "mileage": 12,
        "distance": 12
    })))
    .unwrap();
    let json = r.to_json().unwrap();
    assert_eq!(json["fuelPerDay"], serde_json::json!(3.0));
    assert_eq!(json["distance"], serde_json::json!(12.0));
    assert!(json.get("fuel").is_none());
    assert!(json.get("mileage").is_none());
}

#[test]
fn rejects_record_without_materials_of_either_shape() {
    let json = serde_json::json!({
        "id": "report_2",
        "driverName": "Bob",
        "truckNumber": "T",
        "from": "A",
        "to": "B",
        "purchaseCost": 1,
        "cess": 0,
        "allowance": 0,
        "amountPaid": 2,
        "timestamp": "2024-06-10T08:00:00Z"
    });
    assert!(Report::from_json(json).is_err());
}

// ── Summary ──────────────────────────────────────────────────────

#[test]
fn summary_joins_lines() {
    let m = Materials::lines(vec![
        MaterialLine::new("Ballast 1/2", 5.0, "tons"),
        MaterialLine::new("Machine Blocks 6x9", 200.0, "pieces"),
    ]);
    assert_eq!(m.summary(), "5 tons Ballast 1/2, 200 pieces Machine Blocks 6x9");
}

#[test]
fn summary_skips_empty_unit() {
    let m = Materials::lines(vec![MaterialLine::new("Hardcore", 2.5, "")]);
    assert_eq!(m.summary(), "2.5 Hardcore");
}

#[test]
fn summary_of_nothing_is_dash() {
    assert_eq!(Materials::lines(vec![]).summary(), "—");
    assert_eq!(Materials::legacy("").summary(), "—");
}

#[test]
fn legacy_to_lines_is_single_line() {
    let lines = Materials::legacy("Murram").to_lines();
    assert_eq!(lines, vec![MaterialLine::new("Murram", 0.0, "")]);
    assert_eq!(Materials::legacy("Murram").len(), 1);
}

// ── Catalog ──────────────────────────────────────────────────────

#[test]
fn catalog_lists_thirteen_materials() {
    assert_eq!(MATERIAL_OPTIONS.len(), 13);
    assert!(is_known_material("ballast 1/2"));
    assert!(!is_known_material("Gold"));
}

#[test]
fn default_units() {
    assert_eq!(default_unit("Foundation Stones"), "ft");
    assert_eq!(default_unit("Machine Blocks 9x9"), "pieces");
    assert_eq!(default_unit("Quarry Sand"), "tons");
}
