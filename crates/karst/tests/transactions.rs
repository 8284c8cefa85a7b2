mod support;

use karst::Error;
use support::{db_with, Note, Stock};

#[test]
fn begin_commit_persists() {
    let conn = db_with::<Stock>();

    conn.begin_transaction().unwrap();
    conn.insert(&mut Stock::new("AAPL")).unwrap();
    conn.commit().unwrap();

    assert!(!conn.in_transaction());
    assert_eq!(conn.query::<Stock>().count().unwrap(), 1);
}

#[test]
fn begin_while_active_is_a_caller_error() {
    let conn = db_with::<Stock>();

    conn.begin_transaction().unwrap();
    let err = conn.begin_transaction().unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
    assert!(err.to_string().contains("already in a transaction"));

    // The failed begin must not have disturbed the open transaction.
    assert!(conn.in_transaction());
    conn.commit().unwrap();
}

#[test]
fn rollback_discards_everything() {
    let conn = db_with::<Stock>();

    conn.begin_transaction().unwrap();
    conn.insert(&mut Stock::new("AAPL")).unwrap();
    conn.rollback().unwrap();

    assert!(!conn.in_transaction());
    assert_eq!(conn.query::<Stock>().count().unwrap(), 0);
}

#[test]
fn rollback_without_a_transaction_is_a_no_op() {
    let conn = db_with::<Stock>();
    conn.rollback().unwrap();
    conn.commit().unwrap();
}

#[test]
fn savepoint_names_encode_the_depth() {
    let conn = db_with::<Stock>();

    conn.begin_transaction().unwrap();
    let a = conn.savepoint().unwrap();
    let b = conn.savepoint().unwrap();

    assert!(a.starts_with('S') && a.ends_with("D1"));
    assert!(b.starts_with('S') && b.ends_with("D2"));

    conn.commit().unwrap();
}

#[test]
fn savepoint_nesting_with_partial_rollback() {
    let conn = db_with::<Stock>();

    conn.begin_transaction().unwrap();
    conn.insert(&mut Stock::new("kept")).unwrap();

    let a = conn.savepoint().unwrap();
    conn.insert(&mut Stock::new("discarded-1")).unwrap();

    let _b = conn.savepoint().unwrap();
    conn.insert(&mut Stock::new("discarded-2")).unwrap();

    // Rolling back to A undoes both savepoints' work and restores A's
    // encoded depth; the subsequent commit still succeeds.
    conn.rollback_to(&a).unwrap();
    conn.commit().unwrap();

    let rows = conn.query::<Stock>().all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "kept");
    assert!(!conn.in_transaction());
}

#[test]
fn release_makes_savepoint_work_permanent() {
    let conn = db_with::<Stock>();

    let savepoint = conn.savepoint().unwrap();
    conn.insert(&mut Stock::new("AAPL")).unwrap();
    conn.release(&savepoint).unwrap();

    assert!(!conn.in_transaction());
    assert_eq!(conn.query::<Stock>().count().unwrap(), 1);
}

#[test]
fn rollback_to_validates_the_name() {
    let conn = db_with::<Stock>();

    conn.begin_transaction().unwrap();
    let savepoint = conn.savepoint().unwrap();

    // A fabricated name and a name encoding a depth at or above the
    // current one are both rejected.
    assert!(matches!(
        conn.rollback_to("bogus"),
        Err(Error::InvalidOperation(_))
    ));
    assert!(matches!(
        conn.rollback_to("S1D7"),
        Err(Error::InvalidOperation(_))
    ));

    conn.rollback_to(&savepoint).unwrap();
    conn.commit().unwrap();
}

#[test]
fn run_in_transaction_commits_on_success() {
    let conn = db_with::<Stock>();

    let inserted = conn
        .run_in_transaction(|conn| {
            conn.insert(&mut Stock::new("AAPL"))?;
            conn.insert(&mut Stock::new("MSFT"))
        })
        .unwrap();

    assert_eq!(inserted, 1);
    assert!(!conn.in_transaction());
    assert_eq!(conn.query::<Stock>().count().unwrap(), 2);
}

#[test]
fn run_in_transaction_rolls_back_fully_on_error() {
    let conn = db_with::<Stock>();

    let err = conn
        .run_in_transaction(|conn| {
            conn.insert(&mut Stock::new("AAPL"))?;
            Err::<(), _>(Error::invalid_operation("boom"))
        })
        .unwrap_err();

    assert!(err.to_string().contains("boom"));
    assert!(!conn.in_transaction());
    assert_eq!(conn.query::<Stock>().count().unwrap(), 0);
}

#[test]
fn insert_all_is_atomic() {
    let conn = db_with::<Note>();

    let mut batch = vec![
        Note {
            id: 0,
            title: Some("first".into()),
            body: None,
        },
        Note {
            id: 0,
            // NULL into a not-null column fails the batch.
            title: None,
            body: None,
        },
    ];

    let err = conn.insert_all(&mut batch).unwrap_err();
    assert!(matches!(err, Error::NotNullViolation { .. }));
    assert_eq!(conn.query::<Note>().count().unwrap(), 0);
}

#[test]
fn insert_all_commits_the_whole_batch() {
    let conn = db_with::<Stock>();

    let mut batch = vec![Stock::new("a"), Stock::new("b"), Stock::new("c")];
    assert_eq!(conn.insert_all(&mut batch).unwrap(), 3);
    assert_eq!(conn.query::<Stock>().count().unwrap(), 3);

    // Generated keys were written back to every record.
    assert!(batch.iter().all(|stock| stock.id > 0));
}
