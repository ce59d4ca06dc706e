//! Database tests

use super::*;
use crate::ledger::TripLedger;
use crate::models::{TripInputs, TripMetrics};
use crate::savings::compute_trip_metrics;
use chrono::TimeZone;

fn metrics(cng_price: f64, cost: f64, distance: f64, petrol_price: f64) -> TripMetrics {
    compute_trip_metrics(&TripInputs::new(cng_price, cost, distance, petrol_price)).unwrap()
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert!(db.list_trips().unwrap().is_empty());
    assert_eq!(db.count_trips().unwrap(), 0);
    assert!(!db.is_encrypted());
}

#[test]
fn test_in_memory_db_removed_after_last_clone() {
    let db = Database::in_memory().unwrap();
    db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();

    let dir = std::path::Path::new(db.path())
        .parent()
        .unwrap()
        .to_path_buf();
    assert!(dir.exists());

    let clone = db.clone();
    drop(db);
    assert!(dir.exists(), "clone still holds the directory");
    assert_eq!(clone.count_trips().unwrap(), 1);

    drop(clone);
    assert!(!dir.exists());
}

#[test]
fn test_trips_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('trips')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 14, "trips table should have 14 columns");
}

#[test]
fn test_timestamp_format_roundtrip() {
    let ts = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 15).unwrap();
    let formatted = format_timestamp(&ts);
    assert_eq!(formatted, "2024-05-17T08:30:15.000000Z");
    assert_eq!(parse_timestamp(&formatted).unwrap(), ts);
}

#[test]
fn test_insert_and_get_trip() {
    let db = Database::in_memory().unwrap();
    let m = metrics(75.0, 300.0, 120.0, 95.0);

    let before = Utc::now();
    let id = db.insert_trip(&m).unwrap();
    assert!(id > 0);

    let trip = db.get_trip(id).unwrap().unwrap();
    assert_eq!(trip.id, id);
    assert_eq!(trip.metrics, m);
    // Stored at microsecond precision
    assert!(trip.recorded_at >= before - chrono::Duration::milliseconds(1));
    assert!(trip.recorded_at <= Utc::now());

    assert!(db.get_trip(id + 100).unwrap().is_none());
}

#[test]
fn test_list_orders_by_timestamp_not_insertion() {
    let db = Database::in_memory().unwrap();
    let march = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let january = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let february = Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap();

    let m_id = db.insert_trip_at(&metrics(75.0, 300.0, 120.0, 95.0), march).unwrap();
    let j_id = db.insert_trip_at(&metrics(76.0, 310.0, 125.0, 96.0), january).unwrap();
    let f_id = db.insert_trip_at(&metrics(77.0, 320.0, 130.0, 97.0), february).unwrap();

    let trips = db.list_trips().unwrap();
    let ids: Vec<_> = trips.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![j_id, f_id, m_id]);
    assert!(trips.windows(2).all(|w| w[0].recorded_at <= w[1].recorded_at));
}

#[test]
fn test_equal_timestamps_fall_back_to_id() {
    let db = Database::in_memory().unwrap();
    let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

    let a = db.insert_trip_at(&metrics(75.0, 300.0, 120.0, 95.0), ts).unwrap();
    let b = db.insert_trip_at(&metrics(75.0, 200.0, 100.0, 95.0), ts).unwrap();

    let ids: Vec<_> = db.list_trips().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![a, b]);
}

#[test]
fn test_delete_trips_idempotent() {
    let db = Database::in_memory().unwrap();
    let a = db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();
    let b = db.insert_trip(&metrics(75.0, 200.0, 100.0, 95.0)).unwrap();
    let c = db.insert_trip(&metrics(75.0, 100.0, 60.0, 95.0)).unwrap();

    assert_eq!(db.delete_trips(&[a, c, 4242]).unwrap(), 2);
    let after_first = db.list_trips().unwrap();

    assert_eq!(db.delete_trips(&[a, c, 4242]).unwrap(), 0);
    let after_second = db.list_trips().unwrap();

    assert_eq!(after_first, after_second);
    assert_eq!(after_second.len(), 1);
    assert_eq!(after_second[0].id, b);
}

#[test]
fn test_delete_empty_and_duplicate_ids() {
    let db = Database::in_memory().unwrap();
    let a = db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();

    assert_eq!(db.delete_trips(&[]).unwrap(), 0);
    assert_eq!(db.delete_trips(&[a, a, a]).unwrap(), 1);
    assert_eq!(db.count_trips().unwrap(), 0);
}

#[test]
fn test_ids_not_reused_after_delete() {
    let db = Database::in_memory().unwrap();
    let a = db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();
    db.delete_trips(&[a]).unwrap();

    let b = db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();
    assert!(b > a);
}

#[test]
fn test_partial_delete_keeps_removed_rows() {
    let db = Database::in_memory().unwrap();
    let a = db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();
    let b = db.insert_trip(&metrics(75.0, 200.0, 100.0, 95.0)).unwrap();
    let c = db.insert_trip(&metrics(75.0, 100.0, 60.0, 95.0)).unwrap();

    // Simulate a backend fault on the second row of the batch
    db.conn()
        .unwrap()
        .execute_batch(&format!(
            "CREATE TRIGGER fail_delete BEFORE DELETE ON trips WHEN OLD.id = {}
             BEGIN SELECT RAISE(ABORT, 'simulated storage fault'); END;",
            b
        ))
        .unwrap();

    let result = db.delete_trips(&[a, b, c]);
    match result {
        Err(Error::StorageUnavailable(msg)) => assert!(msg.contains("simulated storage fault")),
        other => panic!("expected StorageUnavailable, got {:?}", other),
    }

    let remaining: Vec<_> = db.list_trips().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(remaining, vec![b, c], "row removed before the fault stays removed");
}

#[test]
fn test_missing_table_reports_storage_unavailable() {
    let db = Database::in_memory().unwrap();
    db.conn().unwrap().execute_batch("DROP TABLE trips;").unwrap();

    assert!(matches!(
        db.list_trips(),
        Err(Error::StorageUnavailable(_))
    ));
    assert!(matches!(
        db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)),
        Err(Error::StorageUnavailable(_))
    ));
}

#[test]
fn test_ledger_trait_roundtrip() {
    let db = Database::in_memory().unwrap();
    let ledger: &dyn TripLedger = &db;

    let m = metrics(75.0, 300.0, 120.0, 95.0);
    let id = ledger.insert(&m).unwrap();

    let trips = ledger.list_all().unwrap();
    let matching: Vec<_> = trips.iter().filter(|t| t.id == id).collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].metrics, m);

    assert_eq!(ledger.delete(&[id]).unwrap(), 1);
    assert!(ledger.list_all().unwrap().is_empty());
}

#[test]
fn test_encrypted_db_requires_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encrypted.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new_with_key(path, Some("test-secret-key")).unwrap();
        assert!(db.is_encrypted());
        db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();
    }

    // Same passphrase reopens
    {
        let db = Database::new_with_key(path, Some("test-secret-key")).unwrap();
        assert_eq!(db.count_trips().unwrap(), 1);
    }

    assert!(
        Database::new_unencrypted(path).is_err(),
        "Should fail to open encrypted db without key"
    );
}

#[test]
fn test_unencrypted_database_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plain.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new_unencrypted(path).unwrap();
        db.insert_trip(&metrics(75.0, 300.0, 120.0, 95.0)).unwrap();
    }

    {
        let db = Database::new_unencrypted(path).unwrap();
        assert!(!db.is_encrypted());
        assert_eq!(db.path(), path);
        assert_eq!(db.list_trips().unwrap().len(), 1);
    }
}
