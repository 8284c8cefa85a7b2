/// An error that can occur in karst.
///
/// Every failure surfaces synchronously as one of these kinds; nothing is
/// swallowed except the two best-effort rollback attempts documented on the
/// transaction surface.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The native engine returned a result code other than OK/ROW/DONE. The
    /// extended result code and message are carried verbatim.
    #[error("sqlite error {code}: {message}")]
    Sqlite { code: i32, message: String },

    /// A constraint violation whose extended result code identifies a
    /// not-null column, kept distinct from generic constraint failures.
    #[error("not null constraint violated: {message}")]
    NotNullViolation { message: String },

    /// The value codec has no rule for the named host type.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The expression compiler met a node shape outside its translation
    /// rules.
    #[error("unsupported expression: {0}")]
    UnsupportedExpression(String),

    /// Misuse of the API contract, reported before any native call is made.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Failure to open, prepare, or allocate a native resource.
    #[error("resource error: {0}")]
    Resource(String),
}

impl Error {
    pub fn sqlite(code: i32, message: impl Into<String>) -> Self {
        Self::Sqlite {
            code,
            message: message.into(),
        }
    }

    pub fn unsupported_type(name: impl Into<String>) -> Self {
        Self::UnsupportedType(name.into())
    }

    pub fn unsupported_expression(message: impl Into<String>) -> Self {
        Self::UnsupportedExpression(message.into())
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation(message.into())
    }

    pub fn resource(message: impl Into<String>) -> Self {
        Self::Resource(message.into())
    }

    /// The primary (non-extended) native result code, if this is an engine
    /// error.
    pub fn sqlite_code(&self) -> Option<i32> {
        match self {
            Self::Sqlite { code, .. } => Some(code & 0xff),
            _ => None,
        }
    }
}
