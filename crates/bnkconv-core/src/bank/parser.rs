use tracing::debug;

use super::error::BankError;
use super::layout::{self, OperatorLayout};
use super::reader::BankReader;

const MODULATOR_FIELDS: [&str; 4] = [
    "modulator props",
    "modulator level",
    "modulator attack/decay",
    "modulator sustain/release",
];
const CARRIER_FIELDS: [&str; 4] = [
    "carrier props",
    "carrier level",
    "carrier attack/decay",
    "carrier sustain/release",
];

/// Fixed header fields. `num_used` is informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankHeader {
    pub num_used: u16,
    pub num_instruments: u16,
    pub offset_names: u32,
    pub offset_data: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub data_index: u16,
    pub name: String,
}

/// Register values of one FM operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorParams {
    /// Tremolo | vibrato | envelope type | key scale rate | multiplier.
    pub props: u8,
    /// Key scale level | output level.
    pub level: u8,
    pub attack_decay: u8,
    pub sustain_release: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentParams {
    pub percussion_channel: u8,
    pub modulator: OperatorParams,
    /// Feedback factor with the synthesis mode in bit 0 (set for FM).
    pub feedback: u8,
    pub modulator_wave_select: u8,
    pub carrier: OperatorParams,
    pub carrier_wave_select: u8,
}

impl InstrumentParams {
    pub const LEN: usize = 12;

    /// Bytes in firmware order.
    pub fn to_bytes(&self) -> [u8; Self::LEN] {
        [
            self.percussion_channel,
            self.modulator.props,
            self.modulator.level,
            self.modulator.attack_decay,
            self.modulator.sustain_release,
            self.feedback,
            self.modulator_wave_select,
            self.carrier.props,
            self.carrier.level,
            self.carrier.attack_decay,
            self.carrier.sustain_release,
            self.carrier_wave_select,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub name: String,
    pub data_index: u16,
    pub params: InstrumentParams,
}

/// A decoded bank; instruments are in directory order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub header: BankHeader,
    pub instruments: Vec<Instrument>,
}

pub fn parse_header(reader: &BankReader<'_>) -> Result<BankHeader, BankError> {
    reader.require_len(layout::HEADER_LEN)?;
    Ok(BankHeader {
        num_used: reader.read_u16_le(layout::NUM_USED_RANGE)?,
        num_instruments: reader.read_u16_le(layout::NUM_INSTRUMENTS_RANGE)?,
        offset_names: reader.read_u32_le(layout::OFFSET_NAMES_RANGE)?,
        offset_data: reader.read_u32_le(layout::OFFSET_DATA_RANGE)?,
    })
}

pub fn parse_directory(
    reader: &BankReader<'_>,
    header: &BankHeader,
) -> Result<Vec<DirectoryEntry>, BankError> {
    let base = to_offset(header.offset_names, "directory")?;
    (0..usize::from(header.num_instruments))
        .map(|i| {
            let start = i
                .checked_mul(layout::DIRECTORY_ENTRY_LEN)
                .and_then(|offset| offset.checked_add(base))
                .ok_or(BankError::OffsetOverflow {
                    region: "directory entry",
                })?;
            let entry = reader.region(start, layout::DIRECTORY_ENTRY_LEN, "directory entry")?;
            Ok(DirectoryEntry {
                data_index: entry.read_u16_le(layout::DATA_INDEX_RANGE)?,
                name: entry.read_name(layout::NAME_RANGE)?,
            })
        })
        .collect()
}

/// Decode the parameter record `data_index` for the instrument at `instrument`.
pub fn parse_instrument(
    reader: &BankReader<'_>,
    header: &BankHeader,
    instrument: usize,
    data_index: u16,
) -> Result<InstrumentParams, BankError> {
    let base = to_offset(header.offset_data, "parameter table")?;
    let start = usize::from(data_index)
        .checked_mul(layout::RECORD_LEN)
        .and_then(|offset| offset.checked_add(base))
        .ok_or(BankError::OffsetOverflow {
            region: "parameter record",
        })?;
    let record = reader.region(start, layout::RECORD_LEN, "parameter record")?;

    let feedback = record.pack_fields(&[(layout::FEEDBACK_OFFSET, layout::FEEDBACK_SHIFT)])?
        | u32::from(record.read_u8(layout::CONNECTION_OFFSET)? == 0);

    Ok(InstrumentParams {
        percussion_channel: record.read_u8(layout::PERCUSSION_CHANNEL_OFFSET)?,
        modulator: parse_operator(&record, &layout::MODULATOR, instrument, &MODULATOR_FIELDS)?,
        feedback: narrow(instrument, "modulator feedback", feedback)?,
        modulator_wave_select: record.read_u8(layout::MODULATOR_WAVE_SELECT_OFFSET)?,
        carrier: parse_operator(&record, &layout::CARRIER, instrument, &CARRIER_FIELDS)?,
        carrier_wave_select: record.read_u8(layout::CARRIER_WAVE_SELECT_OFFSET)?,
    })
}

pub fn parse_bank(data: &[u8]) -> Result<Bank, BankError> {
    let reader = BankReader::new(data);
    let header = parse_header(&reader)?;
    debug!(
        num_used = header.num_used,
        num_instruments = header.num_instruments,
        offset_names = header.offset_names,
        offset_data = header.offset_data,
        "parsed bank header"
    );

    let directory = parse_directory(&reader, &header)?;
    let instruments = directory
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let params = parse_instrument(&reader, &header, index, entry.data_index)?;
            debug!(index, data_index = entry.data_index, name = ?entry.name, "decoded instrument");
            Ok(Instrument {
                name: entry.name,
                data_index: entry.data_index,
                params,
            })
        })
        .collect::<Result<Vec<_>, BankError>>()?;

    Ok(Bank {
        header,
        instruments,
    })
}

fn parse_operator(
    record: &BankReader<'_>,
    op: &OperatorLayout,
    instrument: usize,
    fields: &[&'static str; 4],
) -> Result<OperatorParams, BankError> {
    let props = record.pack_fields(&[
        (op.multiplier, 0),
        (op.envelope_type, layout::ENVELOPE_TYPE_SHIFT),
        (op.tremolo, layout::TREMOLO_SHIFT),
        (op.vibrato, layout::VIBRATO_SHIFT),
        (op.key_scale_rate, layout::KEY_SCALE_RATE_SHIFT),
    ])?;
    let level = record.pack_fields(&[
        (op.key_scale_level, layout::KEY_SCALE_LEVEL_SHIFT),
        (op.output_level, 0),
    ])?;
    let attack_decay =
        record.pack_fields(&[(op.attack, layout::HIGH_NIBBLE_SHIFT), (op.decay, 0)])?;
    let sustain_release =
        record.pack_fields(&[(op.sustain, layout::HIGH_NIBBLE_SHIFT), (op.release, 0)])?;

    Ok(OperatorParams {
        props: narrow(instrument, fields[0], props)?,
        level: narrow(instrument, fields[1], level)?,
        attack_decay: narrow(instrument, fields[2], attack_decay)?,
        sustain_release: narrow(instrument, fields[3], sustain_release)?,
    })
}

fn narrow(instrument: usize, field: &'static str, value: u32) -> Result<u8, BankError> {
    u8::try_from(value).map_err(|_| BankError::Unrepresentable {
        instrument,
        field,
        value,
    })
}

fn to_offset(value: u32, region: &'static str) -> Result<usize, BankError> {
    usize::try_from(value).map_err(|_| BankError::OffsetOverflow { region })
}

#[cfg(test)]
mod tests {
    use super::{BankHeader, parse_bank, parse_directory, parse_header};
    use crate::bank::error::BankError;
    use crate::bank::layout;
    use crate::bank::reader::BankReader;

    fn bank_bytes(entries: &[(u16, &[u8; 8])], records: &[[u8; layout::RECORD_LEN]]) -> Vec<u8> {
        let offset_names = layout::HEADER_LEN;
        let offset_data = offset_names + entries.len() * layout::DIRECTORY_ENTRY_LEN;
        let mut data = vec![0u8; layout::HEADER_LEN];
        data[layout::NUM_USED_RANGE].copy_from_slice(&(entries.len() as u16).to_le_bytes());
        data[layout::NUM_INSTRUMENTS_RANGE]
            .copy_from_slice(&(entries.len() as u16).to_le_bytes());
        data[layout::OFFSET_NAMES_RANGE].copy_from_slice(&(offset_names as u32).to_le_bytes());
        data[layout::OFFSET_DATA_RANGE].copy_from_slice(&(offset_data as u32).to_le_bytes());
        for (data_index, name) in entries {
            let mut entry = [0u8; layout::DIRECTORY_ENTRY_LEN];
            entry[layout::DATA_INDEX_RANGE].copy_from_slice(&data_index.to_le_bytes());
            entry[2] = 1;
            entry[layout::NAME_RANGE].copy_from_slice(*name);
            data.extend_from_slice(&entry);
        }
        for record in records {
            data.extend_from_slice(record);
        }
        data
    }

    fn piano_record() -> [u8; layout::RECORD_LEN] {
        let mut record = [0u8; layout::RECORD_LEN];
        record[2] = 1;
        record[3] = 1;
        record[4] = 3;
        record[5] = 0xF;
        record[6] = 0x5;
        record[7] = 1;
        record[8] = 0x2;
        record[9] = 0x3;
        record[10] = 0x10;
        record[12] = 1;
        record[16] = 2;
        record[18] = 0xD;
        record[19] = 0x7;
        record[20] = 1;
        record[21] = 0x1;
        record[22] = 0x4;
        record[24] = 1;
        record[26] = 1;
        record[28] = 1;
        record[29] = 2;
        record
    }

    fn snare_record() -> [u8; layout::RECORD_LEN] {
        let mut record = [0u8; layout::RECORD_LEN];
        record[1] = 6;
        record[3] = 0xF;
        record[14] = 1;
        record
    }

    #[test]
    fn parse_header_fields() {
        let data = bank_bytes(&[(0, b"PIANO1\0\0")], &[piano_record()]);
        let header = parse_header(&BankReader::new(&data)).unwrap();
        assert_eq!(
            header,
            BankHeader {
                num_used: 1,
                num_instruments: 1,
                offset_names: 20,
                offset_data: 32,
            }
        );
    }

    #[test]
    fn parse_two_instruments_in_directory_order() {
        let data = bank_bytes(
            &[(1, b"PIANO1\0\0"), (0, b"SNARE   ")],
            &[snare_record(), piano_record()],
        );
        let bank = parse_bank(&data).unwrap();
        assert_eq!(bank.instruments.len(), 2);

        let piano = &bank.instruments[0];
        assert_eq!(piano.name, "PIANO1\0\0");
        assert_eq!(piano.data_index, 1);
        assert_eq!(
            piano.params.to_bytes(),
            [0x00, 0x61, 0x50, 0xF2, 0x53, 0x07, 0x01, 0xB2, 0x00, 0xD1, 0x74, 0x02]
        );

        let snare = &bank.instruments[1];
        assert_eq!(snare.name, "SNARE   ");
        assert_eq!(
            snare.params.to_bytes(),
            [0x06, 0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn feedback_low_bit_set_only_when_connection_is_zero() {
        for (connection, expected) in [(0u8, 1u8), (1, 0), (2, 0), (0xFF, 0)] {
            let mut record = [0u8; layout::RECORD_LEN];
            record[layout::FEEDBACK_OFFSET] = 5;
            record[layout::CONNECTION_OFFSET] = connection;
            let data = bank_bytes(&[(0, b"FB      ")], &[record]);
            let bank = parse_bank(&data).unwrap();
            let feedback = bank.instruments[0].params.feedback;
            assert_eq!(feedback & 1, expected, "connection {connection}");
            assert_eq!(feedback >> 1, 5);
        }
    }

    #[test]
    fn zero_instruments_yield_empty_bank() {
        let data = bank_bytes(&[], &[]);
        let bank = parse_bank(&data).unwrap();
        assert!(bank.instruments.is_empty());
    }

    #[test]
    fn directory_ignores_trailing_records() {
        let data = bank_bytes(&[(0, b"A       ")], &[piano_record(), snare_record()]);
        let reader = BankReader::new(&data);
        let header = parse_header(&reader).unwrap();
        let directory = parse_directory(&reader, &header).unwrap();
        assert_eq!(directory.len(), 1);
        assert_eq!(directory[0].data_index, 0);
    }

    #[test]
    fn short_header_is_truncated() {
        let data = [0u8; layout::HEADER_LEN - 1];
        let err = parse_bank(&data).unwrap_err();
        assert!(matches!(err, BankError::Truncated { region: "header", .. }));
        assert!(err.to_string().contains("bank truncated"));
    }

    #[test]
    fn missing_directory_is_truncated() {
        let mut data = bank_bytes(&[(0, b"A       ")], &[]);
        data.truncate(layout::HEADER_LEN + 4);
        let err = parse_bank(&data).unwrap_err();
        assert!(matches!(
            err,
            BankError::Truncated {
                region: "directory entry",
                ..
            }
        ));
    }

    #[test]
    fn short_parameter_table_is_truncated() {
        let mut data = bank_bytes(&[(0, b"A       ")], &[piano_record()]);
        data.truncate(data.len() - 1);
        let err = parse_bank(&data).unwrap_err();
        assert!(matches!(
            err,
            BankError::Truncated {
                region: "parameter record",
                needed: 62,
                actual: 61,
            }
        ));
    }

    #[test]
    fn data_index_past_table_is_truncated() {
        let data = bank_bytes(&[(7, b"A       ")], &[piano_record()]);
        let err = parse_bank(&data).unwrap_err();
        assert!(matches!(
            err,
            BankError::Truncated {
                region: "parameter record",
                ..
            }
        ));
    }

    #[test]
    fn oversized_field_is_unrepresentable() {
        let mut record = piano_record();
        record[layout::MODULATOR.key_scale_level] = 4;
        let data = bank_bytes(&[(0, b"A       ")], &[record]);
        let err = parse_bank(&data).unwrap_err();
        assert!(matches!(
            err,
            BankError::Unrepresentable {
                instrument: 0,
                field: "modulator level",
                value: 0x110,
            }
        ));
    }
}
