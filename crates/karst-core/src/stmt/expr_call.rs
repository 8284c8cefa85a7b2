use super::Expr;

/// The fixed set of recognized call forms.
///
/// These are the only function-shaped nodes the compiler translates;
/// `Unchecked` is the deliberate escape hatch that passes an arbitrary
/// function name through without validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprCall {
    /// Pattern match with `like`
    Like { expr: Box<Expr>, pattern: Box<Expr> },

    /// Membership: `needle in haystack`
    In {
        needle: Box<Expr>,
        haystack: Box<Expr>,
    },

    /// Substring containment via `instr(...) > 0`
    Contains {
        expr: Box<Expr>,
        substring: Box<Expr>,
    },

    /// Prefix match; ordinal mode renders as `substr` position arithmetic,
    /// case-insensitive mode as `like` with a trailing wildcard
    StartsWith {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        comparison: Comparison,
    },

    /// Suffix match; same mode split as `StartsWith`
    EndsWith {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        comparison: Comparison,
    },

    /// Equality expressed as a call
    Equals { expr: Box<Expr>, other: Box<Expr> },

    /// Case folding to lower case
    Lower(Box<Expr>),

    /// Case folding to upper case
    Upper(Box<Expr>),

    /// String replacement
    Replace {
        expr: Box<Expr>,
        from: Box<Expr>,
        to: Box<Expr>,
    },

    /// Null-or-empty check on a text expression
    IsNullOrEmpty(Box<Expr>),

    /// Unvalidated function call, emitted with the lowercased name
    Unchecked { name: String, args: Vec<Expr> },
}

/// String comparison mode for prefix/suffix matching.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Comparison {
    /// Byte-exact comparison
    #[default]
    Ordinal,

    /// Case-insensitive comparison
    IgnoreCase,
}
