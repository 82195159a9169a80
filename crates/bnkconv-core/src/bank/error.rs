use thiserror::Error;

/// Errors returned by bank decoding.
///
/// # Examples
/// ```
/// use bnkconv_core::BankError;
///
/// let err = BankError::Truncated {
///     region: "header",
///     needed: 20,
///     actual: 4,
/// };
/// assert!(err.to_string().contains("bank truncated"));
/// ```
#[derive(Debug, Error)]
pub enum BankError {
    #[error("bank truncated reading {region}: need {needed} bytes, got {actual}")]
    Truncated {
        region: &'static str,
        needed: usize,
        actual: usize,
    },
    #[error("offset of {region} does not fit in the address space")]
    OffsetOverflow { region: &'static str },
    #[error("instrument {instrument}: {field} packs to {value:#X}, which does not fit in a byte")]
    Unrepresentable {
        instrument: usize,
        field: &'static str,
        value: u32,
    },
}
