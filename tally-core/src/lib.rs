//! tally-core: Core types shared across the tally workspace

pub mod error;
pub mod finance;

pub use error::{Error, Result};
pub use finance::{CONSOLIDATED_SOURCE, Transaction, TransactionType, UNCATEGORIZED};
