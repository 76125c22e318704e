#![allow(clippy::unwrap_used, clippy::expect_used)]

use toprank_core::errors::{RankError, RankErrorKind};
use toprank_core::logging_facility::test_capture::init_test_capture;
use toprank_core::{log_op_end, log_op_error, log_op_skip, log_op_start};
use toprank_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_SKIP, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, date = "2023-10-17");

    let event = capture
        .find(op_name, EVENT_START)
        .expect("start event should be captured");
    assert_eq!(event.field("date"), Some("2023-10-17"));
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END)
    });
    assert_eq!(ends, 1);
    let event = capture.find(op_name, EVENT_END).unwrap();
    assert_eq!(event.field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_skip_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_skip_unique_3";

    log_op_skip!(op_name, snapshot_id = "X5Y7N");

    let event = capture.find(op_name, EVENT_SKIP).unwrap();
    assert_eq!(event.field("snapshot_id"), Some("X5Y7N"));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_4";

    let err = RankError::new(RankErrorKind::MalformedData).with_message("line 3");
    log_op_error!(op_name, err, duration_ms = 10);

    let event = capture.find(op_name, EVENT_END_ERROR).unwrap();
    assert_eq!(event.field("err_code"), Some("ERR_MALFORMED_DATA"));
    assert!(event.field("error").unwrap().contains("line 3"));
}

#[test]
fn test_events_inside_span_record_span_name() {
    let capture = init_test_capture();
    let op_name = "test_span_unique_5";

    let span = tracing::info_span!("ingest_run", run_id = "r-1");
    span.in_scope(|| {
        log_op_start!(op_name);
    });

    let event = capture.find(op_name, EVENT_START).unwrap();
    assert_eq!(event.span.as_deref(), Some("ingest_run"));
}

#[test]
fn test_events_with_filters_by_field() {
    let capture = init_test_capture();

    log_op_start!("test_events_with_unique_6", snapshot_id = "FILTER1");
    log_op_end!("test_events_with_unique_6", duration_ms = 1, snapshot_id = "FILTER1");

    assert_eq!(capture.events_with("snapshot_id", "FILTER1").len(), 2);
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_assert_event_exists_fails_for_unknown_op() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}
