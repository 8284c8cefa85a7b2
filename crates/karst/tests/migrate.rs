mod support;

use karst::schema::ColumnInfo;
use karst::stmt::{FromValue, Type};
use karst::{ConnectOptions, Connection, Model, TableMapping};
use once_cell::sync::Lazy;
use support::{db_with, Stock, Ticker};

/// A later revision of the `Stock` record; same table, one extra column.
#[derive(Debug, Default, Clone, PartialEq)]
struct StockV2 {
    id: i32,
    symbol: String,
    exchange: Option<String>,
}

impl Model for StockV2 {
    fn mapping() -> &'static TableMapping<Self> {
        static MAPPING: Lazy<TableMapping<StockV2>> = Lazy::new(|| {
            TableMapping::builder("Stock")
                .column(
                    ColumnInfo::new("Id", Type::I32).primary_key().auto_increment(),
                    |s: &StockV2| s.id.into(),
                    |s, v| {
                        s.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Symbol", Type::String),
                    |s: &StockV2| s.symbol.clone().into(),
                    |s, v| {
                        s.symbol = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Exchange", Type::String),
                    |s: &StockV2| s.exchange.clone().into(),
                    |s, v| {
                        s.exchange = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .finish()
                .expect("valid StockV2 mapping")
        });
        &MAPPING
    }
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    conn.query_scalars(&format!("pragma table_info(\"{table}\")"), 1, [])
        .unwrap()
}

#[test]
fn ensure_table_creates_once() {
    let conn = db_with::<Stock>();
    assert_eq!(table_columns(&conn, "Stock"), ["Id", "Symbol"]);

    // A second call is a no-op.
    conn.ensure_table::<Stock>().unwrap();
    assert_eq!(table_columns(&conn, "Stock"), ["Id", "Symbol"]);
}

#[test]
fn ensure_table_adds_missing_columns() {
    let conn = db_with::<Stock>();
    conn.insert(&mut Stock::new("AAPL")).unwrap();

    conn.ensure_table::<StockV2>().unwrap();
    assert_eq!(table_columns(&conn, "Stock"), ["Id", "Symbol", "Exchange"]);

    // Existing rows survive the migration and read back through the new
    // mapping with the added column at its default.
    let rows = conn.query::<StockV2>().all().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].symbol, "AAPL");
    assert_eq!(rows[0].exchange, None);

    let mut v2 = StockV2 {
        id: 0,
        symbol: "MSFT".into(),
        exchange: Some("NASDAQ".into()),
    };
    conn.insert(&mut v2).unwrap();
    let fetched: StockV2 = conn.get_by_key(v2.id).unwrap();
    assert_eq!(fetched.exchange.as_deref(), Some("NASDAQ"));
}

#[test]
fn requested_indexes_are_created() {
    let conn = db_with::<Ticker>();

    let indexes: Vec<String> = conn
        .query_scalars(
            "select name from sqlite_master where type = 'index' and name = 'Ticker_Code'",
            0,
            [],
        )
        .unwrap();
    assert_eq!(indexes, ["Ticker_Code"]);

    // The index was declared unique.
    conn.insert(&mut Ticker {
        id: 0,
        code: "AAPL".into(),
    })
    .unwrap();
    let err = conn
        .insert(&mut Ticker {
            id: 0,
            code: "AAPL".into(),
        })
        .unwrap_err();
    assert!(matches!(err, karst::Error::Sqlite { .. }));
}

#[test]
fn drop_table_removes_the_table() {
    let conn = db_with::<Stock>();
    conn.drop_table::<Stock>().unwrap();
    assert!(table_columns(&conn, "Stock").is_empty());
}

#[test]
fn new_database_files_switch_to_wal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("karst.sqlite");

    let conn = Connection::open(&path).unwrap();
    let mode: Vec<String> = conn.query_scalars("pragma journal_mode", 0, []).unwrap();
    assert_eq!(mode, ["wal"]);

    // Reopening the existing file does not reissue the pragma; the mode is
    // persistent in the file anyway.
    drop(conn);
    let conn = Connection::open(&path).unwrap();
    let mode: Vec<String> = conn.query_scalars("pragma journal_mode", 0, []).unwrap();
    assert_eq!(mode, ["wal"]);
}

#[test]
fn wal_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("karst.sqlite");

    let conn = Connection::open_with(
        &path,
        ConnectOptions {
            wal: false,
            ..ConnectOptions::default()
        },
    )
    .unwrap();

    let mode: Vec<String> = conn.query_scalars("pragma journal_mode", 0, []).unwrap();
    assert_eq!(mode, ["delete"]);
}

#[test]
fn read_only_connections_reject_writes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("karst.sqlite");

    {
        let conn = Connection::open(&path).unwrap();
        conn.ensure_table::<Stock>().unwrap();
    }

    let conn = Connection::open_with(
        &path,
        ConnectOptions {
            read_only: true,
            ..ConnectOptions::default()
        },
    )
    .unwrap();

    assert_eq!(conn.query::<Stock>().count().unwrap(), 0);
    assert!(conn.insert(&mut Stock::new("AAPL")).is_err());
}
