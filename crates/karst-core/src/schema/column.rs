use crate::stmt::Type;

/// Metadata for one mapped column.
///
/// Built with the chainable constructors below, immutable once the owning
/// [`TableInfo`](super::TableInfo) is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    /// Column name in the table
    pub name: String,

    /// Name of the record field backing the column
    pub field: String,

    /// Host type descriptor driving the codec
    pub ty: Type,

    pub primary_key: bool,

    pub auto_increment: bool,

    pub not_null: bool,

    /// Maximum text length, rendered into the varchar declaration
    pub max_length: Option<u32>,

    pub collation: Option<String>,

    /// Index requested on this column, if any
    pub index: Option<IndexSpec>,

    /// Whether an enumerated value stores its variant name instead of its
    /// ordinal
    pub enum_as_text: bool,
}

impl ColumnInfo {
    /// A column whose record field carries the same name.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        let name = name.into();
        Self {
            field: name.clone(),
            name,
            ty,
            primary_key: false,
            auto_increment: false,
            not_null: false,
            max_length: None,
            collation: None,
            index: None,
            enum_as_text: false,
        }
    }

    /// Overrides the record-field name when it differs from the column
    /// name.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    pub fn max_length(mut self, len: u32) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn collate(mut self, collation: impl Into<String>) -> Self {
        self.collation = Some(collation.into());
        self
    }

    pub fn indexed(mut self) -> Self {
        self.index = Some(IndexSpec::default());
        self
    }

    pub fn unique_index(mut self) -> Self {
        self.index = Some(IndexSpec {
            name: None,
            unique: true,
        });
        self
    }

    pub fn index_named(mut self, name: impl Into<String>, unique: bool) -> Self {
        self.index = Some(IndexSpec {
            name: Some(name.into()),
            unique,
        });
        self
    }

    pub fn enum_as_text(mut self) -> Self {
        self.enum_as_text = true;
        self
    }
}

/// Index requested by a column declaration.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexSpec {
    /// Index name; defaults to `Table_Column` when absent
    pub name: Option<String>,

    pub unique: bool,
}

/// Virtual-table flavor for full-text search tables.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum VirtualTable {
    #[default]
    None,
    Fts3,
    Fts4,
}
