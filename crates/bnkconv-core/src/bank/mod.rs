//! Instrument bank decoding.
//!
//! A bank is a fixed 20-byte header holding the instrument count and two
//! offsets, a name directory of 12-byte entries, and a table of 30-byte
//! parameter records addressed by the directory's data index. The parser
//! repacks each record's scattered fields into the twelve OPL2 register
//! bytes the firmware expects.
//!
//! Declared counts and offsets are trusted, but every read goes through
//! `BankReader`, so a file shorter than its header claims fails with
//! `BankError::Truncated` instead of yielding partial data.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::BankError;
pub use parser::{
    Bank, BankHeader, DirectoryEntry, Instrument, InstrumentParams, OperatorParams, parse_bank,
};
