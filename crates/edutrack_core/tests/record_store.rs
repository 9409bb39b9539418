use edutrack_core::db::{open_db, open_db_in_memory};
use edutrack_core::{
    AttendanceMethod, AttendanceRecord, AttendanceStatus, KeyValueStorage, MemoryStorage,
    RecordStore, SqliteStorage, StorageRecordStore, ATTENDANCE_HISTORY_KEY,
};

fn record(date: &str, time: &str, method: AttendanceMethod) -> AttendanceRecord {
    AttendanceRecord {
        date: date.to_string(),
        time: time.to_string(),
        method: Some(method),
        status: AttendanceStatus::Present,
        student_id: None,
        student_name: None,
    }
}

#[test]
fn read_all_returns_records_in_append_order() {
    let store = StorageRecordStore::new(MemoryStorage::new());
    let appended = vec![
        record("2024-04-29", "9:00:00 AM", AttendanceMethod::QrCode),
        record("2024-04-30", "9:01:00 AM", AttendanceMethod::Proximity),
        record("2024-05-01", "9:02:00 AM", AttendanceMethod::FaceRecognition),
    ];
    for item in &appended {
        store.append(item).unwrap();
    }

    assert_eq!(store.read_all().unwrap(), appended);
    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn tail_returns_last_min_n_len_records_in_order() {
    let store = StorageRecordStore::new(MemoryStorage::new());
    let appended: Vec<_> = (1..=7)
        .map(|day| {
            record(
                &format!("2024-05-{day:02}"),
                "9:00:00 AM",
                AttendanceMethod::QrCode,
            )
        })
        .collect();
    for item in &appended {
        store.append(item).unwrap();
    }

    assert_eq!(store.tail(3).unwrap(), appended[4..].to_vec());
    assert_eq!(store.tail(50).unwrap(), appended);
    assert!(store.tail(0).unwrap().is_empty());
}

#[test]
fn tail_on_empty_store_then_after_one_append() {
    let store = StorageRecordStore::new(MemoryStorage::new());
    assert!(store.tail(5).unwrap().is_empty());

    let only = record("2024-05-01", "9:00:00 AM", AttendanceMethod::QrCode);
    store.append(&only).unwrap();
    assert_eq!(store.tail(5).unwrap(), vec![only]);
}

#[test]
fn find_by_date_returns_first_match_not_latest() {
    let store = StorageRecordStore::new(MemoryStorage::new());
    let qr = record("2024-05-01", "09:00", AttendanceMethod::QrCode);
    let proximity = record("2024-05-01", "09:05", AttendanceMethod::Proximity);
    store.append(&qr).unwrap();
    store.append(&proximity).unwrap();

    let found = store.find_by_date("2024-05-01").unwrap().unwrap();
    assert_eq!(found, qr);
    assert_eq!(found.method, Some(AttendanceMethod::QrCode));
    assert!(store.find_by_date("2024-05-02").unwrap().is_none());
}

#[test]
fn same_day_records_accumulate() {
    let store = StorageRecordStore::new(MemoryStorage::new());
    for _ in 0..3 {
        store
            .append(&record("2024-05-01", "9:00:00 AM", AttendanceMethod::QrCode))
            .unwrap();
    }
    assert_eq!(store.len().unwrap(), 3);
}

#[test]
fn clear_always_yields_empty_sequence() {
    let store = StorageRecordStore::new(MemoryStorage::new());
    store.clear().unwrap();
    assert!(store.read_all().unwrap().is_empty());

    store
        .append(&record("2024-05-01", "9:00:00 AM", AttendanceMethod::QrCode))
        .unwrap();
    store.clear().unwrap();
    assert!(store.read_all().unwrap().is_empty());
    assert!(store.storage().get_item(ATTENDANCE_HISTORY_KEY).unwrap().is_none());
}

#[test]
fn corrupt_content_reads_like_absent_content() {
    let storage = MemoryStorage::new();
    storage
        .set_item(ATTENDANCE_HISTORY_KEY, "{not json at all")
        .unwrap();
    let store = StorageRecordStore::new(&storage);

    assert!(store.read_all().unwrap().is_empty());
    assert!(store.find_by_date("2024-05-01").unwrap().is_none());
    assert!(store.tail(5).unwrap().is_empty());

    let fresh = record("2024-05-01", "9:00:00 AM", AttendanceMethod::Proximity);
    store.append(&fresh).unwrap();
    assert_eq!(store.read_all().unwrap(), vec![fresh]);
}

#[test]
fn unreadable_elements_do_not_hide_or_drop_valid_records() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            ATTENDANCE_HISTORY_KEY,
            r#"[{"date":"2024-05-01","time":"9:00:00 AM","method":"qr_code","status":"present"},{"date":"2024-05-01","time":"9:02:00 AM","method":"nfc","status":"present"}]"#,
        )
        .unwrap();
    let store = StorageRecordStore::new(&storage);

    let qr = store.find_by_date("2024-05-01").unwrap().unwrap();
    assert_eq!(qr.method, Some(AttendanceMethod::QrCode));

    let proximity = record("2024-05-02", "9:00:00 AM", AttendanceMethod::Proximity);
    store.append(&proximity).unwrap();
    assert_eq!(store.read_all().unwrap(), vec![qr, proximity]);

    let raw = storage.get_item(ATTENDANCE_HISTORY_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(3));
    assert_eq!(json[1]["method"], "nfc");
}

#[test]
fn legacy_records_without_method_still_load() {
    let storage = MemoryStorage::new();
    storage
        .set_item(
            ATTENDANCE_HISTORY_KEY,
            r#"[{"date":"2024-05-01","time":"9:00:00 AM","status":"present","studentId":"ST2024001","studentName":"Alex Johnson"}]"#,
        )
        .unwrap();
    let store = StorageRecordStore::new(&storage);

    let records = store.read_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].method, None);
    assert_eq!(records[0].student_id.as_deref(), Some("ST2024001"));
}

#[test]
fn wire_format_matches_history_slot_layout() {
    let storage = MemoryStorage::new();
    let store = StorageRecordStore::new(&storage);
    store
        .append(&record("2024-05-01", "9:00:00 AM", AttendanceMethod::FaceRecognition))
        .unwrap();

    let raw = storage.get_item(ATTENDANCE_HISTORY_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json[0]["date"], "2024-05-01");
    assert_eq!(json[0]["method"], "face_recognition");
    assert_eq!(json[0]["status"], "present");
    assert!(json[0].get("studentId").is_none());
}

#[test]
fn sqlite_store_behaves_like_memory_store() {
    let conn = open_db_in_memory().unwrap();
    let store = StorageRecordStore::new(SqliteStorage::new(&conn));

    let qr = record("2024-05-01", "09:00", AttendanceMethod::QrCode);
    let proximity = record("2024-05-01", "09:05", AttendanceMethod::Proximity);
    store.append(&qr).unwrap();
    store.append(&proximity).unwrap();

    assert_eq!(store.read_all().unwrap(), vec![qr.clone(), proximity.clone()]);
    assert_eq!(store.find_by_date("2024-05-01").unwrap(), Some(qr));
    assert_eq!(store.tail(1).unwrap(), vec![proximity]);

    store.clear().unwrap();
    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn sqlite_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edutrack.db");
    let saved = record("2024-05-01", "9:00:00 AM", AttendanceMethod::QrCode);

    {
        let conn = open_db(&path).unwrap();
        let store = StorageRecordStore::new(SqliteStorage::new(&conn));
        store.append(&saved).unwrap();
    }

    let conn = open_db(&path).unwrap();
    let store = StorageRecordStore::new(SqliteStorage::new(&conn));
    assert_eq!(store.read_all().unwrap(), vec![saved]);
}

#[test]
fn separate_handles_lose_updates_last_writer_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tabs.db");
    let first_tab = open_db(&path).unwrap();
    let second_tab = open_db(&path).unwrap();
    let first = StorageRecordStore::new(SqliteStorage::new(&first_tab));
    let second = StorageRecordStore::new(SqliteStorage::new(&second_tab));

    // Interleaved read-modify-write: both tabs read the empty history first.
    let mut first_view = first.read_all().unwrap();
    let mut second_view = second.read_all().unwrap();
    first_view.push(record("2024-05-01", "9:00:00 AM", AttendanceMethod::QrCode));
    SqliteStorage::new(&first_tab)
        .set_item(ATTENDANCE_HISTORY_KEY, &serde_json::to_string(&first_view).unwrap())
        .unwrap();
    second_view.push(record("2024-05-01", "9:00:01 AM", AttendanceMethod::Proximity));
    SqliteStorage::new(&second_tab)
        .set_item(ATTENDANCE_HISTORY_KEY, &serde_json::to_string(&second_view).unwrap())
        .unwrap();

    let survivors = first.read_all().unwrap();
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].method, Some(AttendanceMethod::Proximity));
}
