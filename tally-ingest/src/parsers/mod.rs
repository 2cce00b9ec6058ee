//! Row-level parsers shared by every export format

pub mod amount;
pub mod columns;
pub mod dates;
