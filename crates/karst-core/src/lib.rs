#[macro_use]
mod macros;

mod error;
pub use error::Error;

pub mod schema;

pub mod stmt;

/// A Result type alias that uses karst's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
