//! bnkconv core library for converting instrument banks to firmware source.
//!
//! The pipeline is a single pass: the `source` module reads the bank file,
//! the `bank` decoder (layout/reader/parser) turns the bytes into
//! instruments, and `progmem` renders one C byte-array literal per
//! instrument. Decoding is byte-oriented and side-effect free; all file I/O
//! is isolated in `source`.
//!
//! Invariants:
//! - Output lines follow directory order.
//! - Every byte access is bounds checked; a short file is an error, never a
//!   partial result.
//! - Rendering only starts once the whole bank has decoded.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use bnkconv_core::convert_bank_file;
//!
//! let source = convert_bank_file(Path::new("standard.bnk"))?;
//! print!("{}", source);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use thiserror::Error;
use tracing::info;

mod bank;
pub mod progmem;
mod source;

pub use bank::{
    Bank, BankError, BankHeader, DirectoryEntry, Instrument, InstrumentParams, OperatorParams,
    parse_bank,
};
pub use source::{SourceError, read_bank_file};

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Bank(#[from] BankError),
}

/// Decode a bank held in memory and render it.
///
/// # Examples
/// ```
/// use bnkconv_core::convert_bank_bytes;
///
/// let mut data = vec![0u8; 20];
/// data[12] = 20;
/// data[16] = 20;
/// assert_eq!(convert_bank_bytes(&data).unwrap(), "");
/// ```
pub fn convert_bank_bytes(data: &[u8]) -> Result<String, BankError> {
    let bank = parse_bank(data)?;
    info!(instruments = bank.instruments.len(), "bank decoded");
    Ok(progmem::render_bank(&bank))
}

/// Read, decode and render the bank at `path`.
///
/// # Errors
/// Returns `ConvertError::Source` when the file cannot be read and
/// `ConvertError::Bank` when its contents do not decode.
pub fn convert_bank_file(path: &Path) -> Result<String, ConvertError> {
    let data = read_bank_file(path)?;
    info!(path = %path.display(), bytes = data.len(), "read bank file");
    Ok(convert_bank_bytes(&data)?)
}
