mod common;

use common::{count, date, setup_db};
use rusqlite::Connection;
use toprank_core::errors::RankErrorKind;
use toprank_core::model::{DomainId, RankingEntry, RankingSnapshot};
use toprank_engine::RetentionOrchestrator;
use toprank_store::repo::{DomainRepo, LedgerRepo, RankingRepo};

fn seed(conn: &Connection, id: &str, created_on: chrono::NaiveDate, domains: &[&str]) {
    LedgerRepo::save(conn, &RankingSnapshot::new(id, created_on)).unwrap();
    let entries: Vec<RankingEntry> = domains
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let id_for: DomainId = DomainRepo::resolve(conn, name).unwrap().id();
            RankingEntry::new(id_for, id, i as u32 + 1)
        })
        .collect();
    RankingRepo::new(100).unwrap().bulk_save(conn, &entries).unwrap();
}

#[test]
fn test_zero_retention_deletes_old_day_and_keeps_month_end() {
    let (_dir, db, conn) = setup_db();
    let today = date(2023, 10, 17);
    seed(&conn, "YESTERDAY", date(2023, 10, 16), &["a.com", "b.com"]);
    seed(&conn, "MONTHEND", date(2022, 9, 30), &["a.com"]);
    seed(&conn, "TODAY", today, &["c.com"]);

    let report = RetentionOrchestrator::new(db).prune(0, today).unwrap();

    assert_eq!(report.deleted, vec!["YESTERDAY".to_string()]);
    assert_eq!(report.retained_month_end, vec!["MONTHEND".to_string()]);
    assert_eq!(report.entries_deleted, 2);

    assert!(!LedgerRepo::exists(&conn, "YESTERDAY").unwrap());
    assert_eq!(RankingRepo::count_for_snapshot(&conn, "YESTERDAY").unwrap(), 0);
    assert!(LedgerRepo::exists(&conn, "MONTHEND").unwrap());
    assert!(LedgerRepo::exists(&conn, "TODAY").unwrap());
    // Domains are shared history and are never pruned
    assert_eq!(count(&conn, "domains"), 3);
}

#[test]
fn test_snapshots_inside_the_window_are_kept() {
    let (_dir, db, conn) = setup_db();
    let today = date(2023, 10, 17);
    seed(&conn, "RECENT", date(2023, 10, 10), &["a.com"]);
    // Exactly at the cutoff is not older than it
    seed(&conn, "EDGE", date(2023, 10, 7), &["a.com"]);
    seed(&conn, "OLD", date(2023, 10, 6), &["a.com"]);

    let report = RetentionOrchestrator::new(db).prune(10, today).unwrap();

    assert_eq!(report.cutoff, Some(date(2023, 10, 7)));
    assert_eq!(report.deleted, vec!["OLD".to_string()]);
    assert!(LedgerRepo::exists(&conn, "RECENT").unwrap());
    assert!(LedgerRepo::exists(&conn, "EDGE").unwrap());
}

#[test]
fn test_many_expired_snapshots_are_all_deleted() {
    let (_dir, db, conn) = setup_db();
    for day in 1..=20 {
        seed(&conn, &format!("S{:02}", day), date(2023, 6, day), &["a.com", "b.com"]);
    }
    seed(&conn, "JUNE_END", date(2023, 6, 30), &["a.com"]);

    let mut report = RetentionOrchestrator::new(db)
        .prune(30, date(2023, 10, 17))
        .unwrap();
    report.deleted.sort();

    assert_eq!(report.deleted.len(), 20);
    assert_eq!(report.deleted[0], "S01");
    assert_eq!(report.entries_deleted, 40);
    assert_eq!(report.retained_month_end, vec!["JUNE_END".to_string()]);
    assert_eq!(count(&conn, "ranking_lists"), 1);
    assert_eq!(count(&conn, "ranking_entries"), 1);
}

#[test]
fn test_failed_deletion_is_reported_while_others_complete() {
    let (_dir, db, conn) = setup_db();
    seed(&conn, "KEEPS_FAILING", date(2023, 6, 1), &["a.com"]);
    seed(&conn, "GOES_AWAY", date(2023, 6, 2), &["b.com"]);
    conn.execute_batch(
        "CREATE TRIGGER pin_snapshot BEFORE DELETE ON ranking_lists
         WHEN OLD.id = 'KEEPS_FAILING'
         BEGIN SELECT RAISE(ABORT, 'pinned'); END;",
    )
    .unwrap();

    let err = RetentionOrchestrator::new(db)
        .prune(30, date(2023, 10, 17))
        .unwrap_err();

    assert_eq!(err.snapshot_id(), Some("KEEPS_FAILING"));
    assert!(err.message().contains("1 of 2"));
    assert!(LedgerRepo::exists(&conn, "KEEPS_FAILING").unwrap());
    assert!(!LedgerRepo::exists(&conn, "GOES_AWAY").unwrap());
}

#[test]
fn test_negative_retention_is_invalid_input() {
    let (_dir, db, conn) = setup_db();
    seed(&conn, "UNTOUCHED", date(2020, 1, 1), &["a.com"]);

    let err = RetentionOrchestrator::new(db)
        .prune(-5, date(2023, 10, 17))
        .unwrap_err();

    assert_eq!(err.kind(), RankErrorKind::InvalidInput);
    assert!(LedgerRepo::exists(&conn, "UNTOUCHED").unwrap());
}

#[test]
fn test_retention_beyond_the_calendar_keeps_everything() {
    let (_dir, db, conn) = setup_db();
    seed(&conn, "ANCIENT", date(1970, 1, 2), &["a.com"]);
    seed(&conn, "RECENT", date(2023, 10, 16), &["b.com"]);

    let report = RetentionOrchestrator::new(db)
        .prune(i64::MAX, date(2023, 10, 17))
        .unwrap();

    assert_eq!(report.cutoff, Some(chrono::NaiveDate::MIN));
    assert!(report.deleted.is_empty());
    assert!(LedgerRepo::exists(&conn, "ANCIENT").unwrap());
    assert!(LedgerRepo::exists(&conn, "RECENT").unwrap());
}
