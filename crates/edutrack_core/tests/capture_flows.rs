use chrono::{NaiveDate, NaiveDateTime};
use edutrack_core::{
    AttendanceMethod, CaptureError, CaptureSession, CaptureSource, FlowError, FlowState,
    FlowTimings, ManualClock, MemoryStorage, RecordStore, StorageRecordStore,
};
use std::time::Duration;

fn morning() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

fn memory_store() -> StorageRecordStore<MemoryStorage> {
    StorageRecordStore::new(MemoryStorage::new())
}

#[test]
fn qr_scan_writes_one_record_after_scan_delay() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    let mut session = CaptureSession::new(
        AttendanceMethod::QrCode,
        &store,
        clock.clone(),
        FlowTimings::default(),
    );

    assert_eq!(session.scan().unwrap(), FlowState::Scanning);
    clock.advance_ms(2_999);
    assert_eq!(session.poll().unwrap(), None);
    assert!(store.read_all().unwrap().is_empty());

    clock.advance_ms(1);
    let record = session.poll().unwrap().unwrap();
    assert_eq!(session.state(), FlowState::Done);
    assert_eq!(record.date, "2024-05-01");
    assert_eq!(record.time, "9:00:03 AM");
    assert_eq!(record.method, Some(AttendanceMethod::QrCode));
    assert_eq!(store.read_all().unwrap(), vec![record]);

    clock.advance_ms(60_000);
    assert_eq!(session.poll().unwrap(), None);
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn proximity_scan_uses_its_own_delay() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    let mut session = CaptureSession::new(
        AttendanceMethod::Proximity,
        &store,
        clock.clone(),
        FlowTimings::default(),
    );

    session.scan().unwrap();
    assert_eq!(session.next_due(), Some(Duration::from_millis(2_500)));
    clock.advance_ms(1_000);
    assert_eq!(session.until_next_step(), Some(Duration::from_millis(1_500)));
    clock.advance_ms(1_500);
    let record = session.poll().unwrap().unwrap();
    assert_eq!(record.method, Some(AttendanceMethod::Proximity));
    assert_eq!(session.until_next_step(), None);
}

#[test]
fn face_camera_flow_steps_through_every_state() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    let mut session = CaptureSession::new(
        AttendanceMethod::FaceRecognition,
        &store,
        clock.clone(),
        FlowTimings::default(),
    );

    assert_eq!(session.capture(CaptureSource::Camera).unwrap(), FlowState::Camera);
    clock.advance_ms(2_000);
    session.poll().unwrap();
    assert_eq!(session.state(), FlowState::Processing);
    clock.advance_ms(3_000);
    session.poll().unwrap();
    assert_eq!(session.state(), FlowState::Success);
    assert!(store.read_all().unwrap().is_empty());

    clock.advance_ms(2_000);
    let record = session.poll().unwrap().unwrap();
    assert_eq!(record.method, Some(AttendanceMethod::FaceRecognition));
    assert_eq!(record.time, "9:00:07 AM");
}

#[test]
fn one_late_poll_catches_up_on_chained_steps() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    let mut session = CaptureSession::new(
        AttendanceMethod::FaceRecognition,
        &store,
        clock.clone(),
        FlowTimings::default(),
    );

    session.capture(CaptureSource::Upload).unwrap();
    clock.advance_ms(5_999);
    assert_eq!(session.poll().unwrap(), None);
    assert_eq!(session.state(), FlowState::Success);

    clock.advance_ms(1);
    assert!(session.poll().unwrap().is_some());
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn abandoned_flow_never_writes_late() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    let mut session = CaptureSession::new(
        AttendanceMethod::FaceRecognition,
        &store,
        clock.clone(),
        FlowTimings::default(),
    );

    session.capture(CaptureSource::Camera).unwrap();
    clock.advance_ms(2_500);
    session.poll().unwrap();
    assert!(session.abandon());
    assert_eq!(session.next_due(), None);

    clock.advance_ms(60_000);
    assert_eq!(session.poll().unwrap(), None);
    assert_eq!(session.state(), FlowState::Abandoned);
    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn dropping_session_mid_flow_leaves_store_untouched() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    {
        let mut session = CaptureSession::new(
            AttendanceMethod::QrCode,
            &store,
            clock.clone(),
            FlowTimings::default(),
        );
        session.scan().unwrap();
        clock.advance_ms(1_000);
        session.poll().unwrap();
    }
    clock.advance_ms(10_000);
    assert!(store.read_all().unwrap().is_empty());
}

#[test]
fn second_scan_is_rejected() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    let mut session = CaptureSession::new(
        AttendanceMethod::QrCode,
        &store,
        clock.clone(),
        FlowTimings::default(),
    );

    session.scan().unwrap();
    let err = session.scan().unwrap_err();
    assert!(matches!(
        err,
        CaptureError::Flow(FlowError::UnexpectedAction {
            state: FlowState::Scanning,
            ..
        })
    ));
}

#[test]
fn record_carries_student_identity_and_custom_timings() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    let timings = FlowTimings {
        qr_scan_ms: 10,
        ..FlowTimings::default()
    };
    let mut session = CaptureSession::new(AttendanceMethod::QrCode, &store, clock.clone(), timings)
        .with_student(
            Some("ST2024001".to_string()),
            Some("Alex Johnson".to_string()),
        );

    session.scan().unwrap();
    clock.advance_ms(10);
    let record = session.poll().unwrap().unwrap();
    assert_eq!(record.student_id.as_deref(), Some("ST2024001"));
    assert_eq!(record.student_name.as_deref(), Some("Alex Johnson"));
    assert_eq!(session.record(), Some(&record));
}

#[test]
fn two_flows_on_same_day_both_append() {
    let store = memory_store();
    let clock = ManualClock::starting_at(morning());
    for method in [AttendanceMethod::QrCode, AttendanceMethod::Proximity] {
        let mut session =
            CaptureSession::new(method, &store, clock.clone(), FlowTimings::default());
        session.scan().unwrap();
        clock.advance_ms(5_000);
        session.poll().unwrap();
    }

    let records = store.read_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(
        store.find_by_date("2024-05-01").unwrap().unwrap().method,
        Some(AttendanceMethod::QrCode)
    );
}
