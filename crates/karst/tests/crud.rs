mod support;

use karst::stmt::Value;
use karst::{Error, Model};
use support::{db_with, Color, Note, Paint, Priority, Stock};

#[test]
fn insert_writes_back_the_generated_key() {
    let conn = db_with::<Stock>();

    let mut stock = Stock::new("AAPL");
    assert_eq!(conn.insert(&mut stock).unwrap(), 1);
    assert!(stock.id > 0);

    let fetched: Stock = conn.get_by_key(stock.id).unwrap();
    assert_eq!(fetched, stock);
    assert_eq!(fetched.symbol, "AAPL");
}

#[test]
fn find_by_key_returns_none_for_missing_rows() {
    let conn = db_with::<Stock>();

    assert_eq!(conn.find_by_key::<Stock>(42).unwrap(), None);

    let err = conn.get_by_key::<Stock>(42).unwrap_err();
    assert!(matches!(err, Error::InvalidOperation(_)));
}

#[test]
fn update_replaces_non_key_columns() {
    let conn = db_with::<Stock>();

    let mut stock = Stock::new("AAPL");
    conn.insert(&mut stock).unwrap();

    stock.symbol = "MSFT".to_string();
    assert_eq!(conn.update(&stock).unwrap(), 1);

    let fetched: Stock = conn.get_by_key(stock.id).unwrap();
    assert_eq!(fetched.symbol, "MSFT");
}

#[test]
fn upsert_replaces_an_existing_row() {
    let conn = db_with::<Stock>();

    let mut stock = Stock::new("AAPL");
    conn.insert(&mut stock).unwrap();

    let replacement = Stock {
        id: stock.id,
        symbol: "GOOG".to_string(),
    };
    conn.upsert(&replacement).unwrap();

    assert_eq!(conn.query::<Stock>().count().unwrap(), 1);
    let fetched: Stock = conn.get_by_key(stock.id).unwrap();
    assert_eq!(fetched.symbol, "GOOG");
}

#[test]
fn delete_by_record_and_by_key() {
    let conn = db_with::<Stock>();

    let mut a = Stock::new("a");
    let mut b = Stock::new("b");
    conn.insert(&mut a).unwrap();
    conn.insert(&mut b).unwrap();

    assert_eq!(conn.delete(&a).unwrap(), 1);
    assert_eq!(conn.delete_by_key::<Stock>(b.id).unwrap(), 1);
    assert_eq!(conn.query::<Stock>().count().unwrap(), 0);
}

#[test]
fn not_null_violation_is_classified() {
    let conn = db_with::<Note>();

    let mut note = Note {
        id: 0,
        title: None,
        body: Some("body".into()),
    };

    let err = conn.insert(&mut note).unwrap_err();
    assert!(matches!(err, Error::NotNullViolation { .. }));

    // A different constraint failure stays a generic engine error.
    let mut ok = Note {
        id: 0,
        title: Some("t".into()),
        body: None,
    };
    conn.insert(&mut ok).unwrap();
    let err = conn
        .execute(
            "insert into \"Note\" (\"Id\", \"Title\") values (?, ?)",
            [Value::I32(ok.id), Value::from("dup")],
        )
        .unwrap_err();
    assert!(matches!(err, Error::Sqlite { .. }));
}

#[test]
fn optional_columns_round_trip_null() {
    let conn = db_with::<Note>();

    let mut note = Note {
        id: 0,
        title: Some("title".into()),
        body: None,
    };
    conn.insert(&mut note).unwrap();

    let fetched: Note = conn.get_by_key(note.id).unwrap();
    assert_eq!(fetched.body, None);
    assert_eq!(fetched.title.as_deref(), Some("title"));
}

#[test]
fn enum_columns_store_per_declared_mode() {
    let conn = db_with::<Paint>();

    let mut paint = Paint {
        id: 0,
        color: Color::Blue,
        priority: Priority::High,
    };
    conn.insert(&mut paint).unwrap();

    // Color is declared text-stored, Priority ordinal-stored.
    let stored_color: String = conn
        .query_scalars("select \"Color\" from \"Paint\"", 0, [])
        .unwrap()
        .remove(0);
    assert_eq!(stored_color, "Blue");

    let stored_priority: i64 = conn
        .query_scalars("select \"Priority\" from \"Paint\"", 0, [])
        .unwrap()
        .remove(0);
    assert_eq!(stored_priority, 1);

    let fetched: Paint = conn.get_by_key(paint.id).unwrap();
    assert_eq!(fetched, paint);
}

#[test]
fn query_as_uses_the_declared_column_order() {
    let conn = db_with::<Stock>();
    conn.insert(&mut Stock::new("AAPL")).unwrap();

    let rows: Vec<Stock> = conn
        .query_as("select Id,Symbol from \"Stock\"", [])
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "AAPL");
}

#[test]
fn materialize_row_named_skips_unknown_columns() {
    let conn = db_with::<Stock>();
    conn.insert(&mut Stock::new("AAPL")).unwrap();

    let mapping = Stock::mapping();
    let names = vec!["Symbol".to_string(), "Mystery".to_string()];
    let rows = conn
        .query_rows(
            "select Symbol, 99 from \"Stock\"",
            [],
            |row| mapping.materialize_row_named(row, &names),
        )
        .unwrap();

    assert_eq!(rows[0].symbol, "AAPL");
    assert_eq!(rows[0].id, 0);
}

#[test]
fn command_text_for_mappings_is_prerendered() {
    let mapping = Stock::mapping();
    assert_eq!(mapping.insert_sql, "insert into \"Stock\"(\"Symbol\") values (?)");
    assert_eq!(
        mapping.replace_sql,
        "insert or replace into \"Stock\"(\"Id\",\"Symbol\") values (?,?)"
    );
    assert_eq!(
        mapping.update_sql,
        "update \"Stock\" set \"Symbol\" = ?  where Id = ? "
    );
    assert_eq!(mapping.delete_sql, "delete from \"Stock\" where \"Id\" = ?");
}
