pub const NUM_USED_RANGE: std::ops::Range<usize> = 8..10;
pub const NUM_INSTRUMENTS_RANGE: std::ops::Range<usize> = 10..12;
pub const OFFSET_NAMES_RANGE: std::ops::Range<usize> = 12..16;
pub const OFFSET_DATA_RANGE: std::ops::Range<usize> = 16..20;
pub const HEADER_LEN: usize = 20;

pub const DIRECTORY_ENTRY_LEN: usize = 12;
pub const DATA_INDEX_RANGE: std::ops::Range<usize> = 0..2;
pub const NAME_RANGE: std::ops::Range<usize> = 3..11;

pub const RECORD_LEN: usize = 30;
pub const PERCUSSION_CHANNEL_OFFSET: usize = 1;
pub const FEEDBACK_OFFSET: usize = 4;
pub const CONNECTION_OFFSET: usize = 14;
pub const MODULATOR_WAVE_SELECT_OFFSET: usize = 28;
pub const CARRIER_WAVE_SELECT_OFFSET: usize = 29;

/// Record offsets of the fields shared by both operators of a voice.
#[derive(Debug, Clone, Copy)]
pub struct OperatorLayout {
    pub key_scale_level: usize,
    pub multiplier: usize,
    pub attack: usize,
    pub sustain: usize,
    pub envelope_type: usize,
    pub decay: usize,
    pub release: usize,
    pub output_level: usize,
    pub tremolo: usize,
    pub vibrato: usize,
    pub key_scale_rate: usize,
}

pub const MODULATOR: OperatorLayout = OperatorLayout {
    key_scale_level: 2,
    multiplier: 3,
    attack: 5,
    sustain: 6,
    envelope_type: 7,
    decay: 8,
    release: 9,
    output_level: 10,
    tremolo: 11,
    vibrato: 12,
    key_scale_rate: 13,
};

pub const CARRIER: OperatorLayout = OperatorLayout {
    key_scale_level: 15,
    multiplier: 16,
    attack: 18,
    sustain: 19,
    envelope_type: 20,
    decay: 21,
    release: 22,
    output_level: 23,
    tremolo: 24,
    vibrato: 25,
    key_scale_rate: 26,
};

// Bit positions inside the packed register values.
pub const ENVELOPE_TYPE_SHIFT: u32 = 5;
pub const TREMOLO_SHIFT: u32 = 7;
pub const VIBRATO_SHIFT: u32 = 6;
pub const KEY_SCALE_RATE_SHIFT: u32 = 4;
pub const KEY_SCALE_LEVEL_SHIFT: u32 = 6;
pub const HIGH_NIBBLE_SHIFT: u32 = 4;
pub const FEEDBACK_SHIFT: u32 = 1;
