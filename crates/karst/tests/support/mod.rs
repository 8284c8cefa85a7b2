#![allow(dead_code)]

use karst::schema::ColumnInfo;
use karst::stmt::{FromValue, Type};
use karst::{enum_value, Connection, Model, TableMapping};
use once_cell::sync::Lazy;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Stock {
    pub id: i32,
    pub symbol: String,
}

impl Stock {
    pub fn new(symbol: &str) -> Self {
        Self {
            id: 0,
            symbol: symbol.to_string(),
        }
    }
}

impl Model for Stock {
    fn mapping() -> &'static TableMapping<Self> {
        static MAPPING: Lazy<TableMapping<Stock>> = Lazy::new(|| {
            TableMapping::builder("Stock")
                .column(
                    ColumnInfo::new("Id", Type::I32).primary_key().auto_increment(),
                    |s: &Stock| s.id.into(),
                    |s, v| {
                        s.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Symbol", Type::String),
                    |s: &Stock| s.symbol.clone().into(),
                    |s, v| {
                        s.symbol = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .finish()
                .expect("valid Stock mapping")
        });
        &MAPPING
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Valuation {
    pub id: i32,
    pub stock_id: i32,
    pub price: f64,
}

impl Valuation {
    pub fn new(stock_id: i32, price: f64) -> Self {
        Self {
            id: 0,
            stock_id,
            price,
        }
    }
}

impl Model for Valuation {
    fn mapping() -> &'static TableMapping<Self> {
        static MAPPING: Lazy<TableMapping<Valuation>> = Lazy::new(|| {
            TableMapping::builder("Valuation")
                .column(
                    ColumnInfo::new("Id", Type::I32).primary_key().auto_increment(),
                    |s: &Valuation| s.id.into(),
                    |s, v| {
                        s.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("StockId", Type::I32),
                    |s: &Valuation| s.stock_id.into(),
                    |s, v| {
                        s.stock_id = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Price", Type::F64),
                    |s: &Valuation| s.price.into(),
                    |s, v| {
                        s.price = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .finish()
                .expect("valid Valuation mapping")
        });
        &MAPPING
    }
}

/// Exercises the not-null declaration: `Title` is not-null while the field
/// itself is optional, so a `None` value reaches the engine as NULL.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Note {
    pub id: i32,
    pub title: Option<String>,
    pub body: Option<String>,
}

impl Model for Note {
    fn mapping() -> &'static TableMapping<Self> {
        static MAPPING: Lazy<TableMapping<Note>> = Lazy::new(|| {
            TableMapping::builder("Note")
                .column(
                    ColumnInfo::new("Id", Type::I32).primary_key().auto_increment(),
                    |s: &Note| s.id.into(),
                    |s, v| {
                        s.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Title", Type::String).not_null(),
                    |s: &Note| s.title.clone().into(),
                    |s, v| {
                        s.title = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Body", Type::String),
                    |s: &Note| s.body.clone().into(),
                    |s, v| {
                        s.body = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .finish()
                .expect("valid Note mapping")
        });
        &MAPPING
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Color {
    #[default]
    Red,
    Green,
    Blue,
}

enum_value!(Color { Red = 0, Green = 1, Blue = 2 });

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Priority {
    #[default]
    Low,
    High,
}

enum_value!(Priority { Low = 0, High = 1 });

/// One enum column stored as text, one as its ordinal.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Paint {
    pub id: i32,
    pub color: Color,
    pub priority: Priority,
}

impl Model for Paint {
    fn mapping() -> &'static TableMapping<Self> {
        static MAPPING: Lazy<TableMapping<Paint>> = Lazy::new(|| {
            TableMapping::builder("Paint")
                .column(
                    ColumnInfo::new("Id", Type::I32).primary_key().auto_increment(),
                    |s: &Paint| s.id.into(),
                    |s, v| {
                        s.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Color", Type::Enum).enum_as_text(),
                    |s: &Paint| s.color.into(),
                    |s, v| {
                        s.color = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Priority", Type::Enum),
                    |s: &Paint| s.priority.into(),
                    |s, v| {
                        s.priority = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .finish()
                .expect("valid Paint mapping")
        });
        &MAPPING
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Ticker {
    pub id: i32,
    pub code: String,
}

impl Model for Ticker {
    fn mapping() -> &'static TableMapping<Self> {
        static MAPPING: Lazy<TableMapping<Ticker>> = Lazy::new(|| {
            TableMapping::builder("Ticker")
                .column(
                    ColumnInfo::new("Id", Type::I32).primary_key().auto_increment(),
                    |s: &Ticker| s.id.into(),
                    |s, v| {
                        s.id = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .column(
                    ColumnInfo::new("Code", Type::String).unique_index(),
                    |s: &Ticker| s.code.clone().into(),
                    |s, v| {
                        s.code = FromValue::from_value(v)?;
                        Ok(())
                    },
                )
                .finish()
                .expect("valid Ticker mapping")
        });
        &MAPPING
    }
}

/// Fresh in-memory database with the mapped table of `T` created.
pub fn db_with<T: Model>() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.ensure_table::<T>().unwrap();
    conn
}
