use chrono::NaiveDate;
use tempfile::TempDir;
use toprank_core::errors::RankErrorKind;
use toprank_core::model::{DomainId, RankingEntry, RankingSnapshot};
use toprank_store::errors::from_rusqlite;
use toprank_store::migrations::apply_migrations;
use toprank_store::{run_in_transaction, Database, DomainRepo, LedgerRepo, RankingRepo};

fn setup() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::new(dir.path().join("toprank.db"));
    apply_migrations(&mut db.connect().unwrap()).unwrap();
    (dir, db)
}

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 17).unwrap()
}

#[test]
fn test_committed_snapshot_is_visible_to_other_connections() {
    let (_dir, db) = setup();
    let mut writer = db.connect().unwrap();
    let reader = db.connect().unwrap();
    let repo = RankingRepo::new(2).unwrap();

    run_in_transaction(&mut writer, |tx| {
        LedgerRepo::save(tx, &RankingSnapshot::new("ABC12", day()))?;
        let a = DomainRepo::resolve(tx, "a.com")?.id();
        let b = DomainRepo::resolve(tx, "b.com")?.id();
        let entries = vec![
            RankingEntry::new(a, "ABC12", 1),
            RankingEntry::new(b, "ABC12", 2),
            RankingEntry::new(a, "ABC12", 3),
        ];
        repo.bulk_save(tx, &entries)
    })
    .unwrap();

    assert!(LedgerRepo::exists(&reader, "ABC12").unwrap());
    assert_eq!(RankingRepo::count_for_snapshot(&reader, "ABC12").unwrap(), 3);
    assert_eq!(DomainRepo::count(&reader).unwrap(), 2);
}

#[test]
fn test_failed_unit_leaves_no_partial_state() {
    let (_dir, db) = setup();
    let mut writer = db.connect().unwrap();
    let reader = db.connect().unwrap();
    let repo = RankingRepo::new(1).unwrap();

    let err = run_in_transaction(&mut writer, |tx| {
        LedgerRepo::save(tx, &RankingSnapshot::new("HALF", day()))?;
        let a = DomainRepo::resolve(tx, "a.com")?.id();
        // Second entry references a snapshot that does not exist
        let entries = vec![
            RankingEntry::new(a, "HALF", 1),
            RankingEntry::new(a, "MISSING", 2),
        ];
        repo.bulk_save(tx, &entries)
    })
    .unwrap_err();

    assert_eq!(err.kind(), RankErrorKind::WriteFailure);
    assert!(err.message().contains("batch 1"));
    assert!(!LedgerRepo::exists(&reader, "HALF").unwrap());
    assert_eq!(DomainRepo::count(&reader).unwrap(), 0);
    assert_eq!(RankingRepo::count_for_snapshot(&reader, "HALF").unwrap(), 0);
}

#[test]
fn test_commit_failure_is_transaction_failure_and_rolls_back() {
    let (_dir, db) = setup();
    let mut writer = db.connect().unwrap();
    let reader = db.connect().unwrap();
    let repo = RankingRepo::new(10).unwrap();

    let err = run_in_transaction(&mut writer, |tx| {
        // Foreign keys are checked at COMMIT instead of per statement
        tx.execute_batch("PRAGMA defer_foreign_keys = ON")
            .map_err(from_rusqlite)?;
        LedgerRepo::save(tx, &RankingSnapshot::new("DANGLING", day()))?;
        let entries = vec![RankingEntry::new(DomainId::new(424_242), "DANGLING", 1)];
        repo.bulk_save(tx, &entries)
    })
    .unwrap_err();

    assert_eq!(err.kind(), RankErrorKind::TransactionFailure);
    assert_eq!(err.op(), Some("commit_transaction"));
    assert!(!LedgerRepo::exists(&reader, "DANGLING").unwrap());
    assert_eq!(RankingRepo::count_for_snapshot(&reader, "DANGLING").unwrap(), 0);
    // The writer is usable again after the failed commit
    assert!(!LedgerRepo::exists(&writer, "DANGLING").unwrap());
}
