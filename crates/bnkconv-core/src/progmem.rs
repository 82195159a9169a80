//! Rendering of decoded instruments as firmware byte-array literals.

use crate::bank::{Bank, Instrument, InstrumentParams};

/// Format a value as `0x` followed by at least two uppercase hex digits.
///
/// Wider values keep their natural width.
///
/// # Examples
/// ```
/// use bnkconv_core::progmem::format_hex_byte;
///
/// assert_eq!(format_hex_byte(0x0A), "0x0A");
/// assert_eq!(format_hex_byte(0x1FF), "0x1FF");
/// ```
pub fn format_hex_byte(value: u32) -> String {
    format!("0x{:02X}", value)
}

/// Turn an instrument name into a C identifier.
///
/// ASCII letters are uppercased, digits are kept, and every other char
/// becomes `_`.
///
/// # Examples
/// ```
/// use bnkconv_core::progmem::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Organ 1!"), "ORGAN_1_");
/// ```
pub fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}

pub fn render_instrument(instrument: &Instrument) -> String {
    let bytes = instrument
        .params
        .to_bytes()
        .iter()
        .map(|&b| format_hex_byte(u32::from(b)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "const unsigned char {}[{}]  PROGMEM = {{ {} }};",
        sanitize_identifier(&instrument.name),
        InstrumentParams::LEN,
        bytes
    )
}

/// Render every instrument, one newline-terminated line each.
pub fn render_bank(bank: &Bank) -> String {
    bank.instruments
        .iter()
        .map(|instrument| render_instrument(instrument) + "\n")
        .collect()
}
