//! Line counts, masks and the decode lookup tables.
//!
//! Every table here is generated at compile time from the reflected Gray
//! sequence, so a reading's position, and the legality of any
//! (previous, current) pair, can be checked against a single definition.

use crate::motion::Transition;

// ---------------------------------------------------------------------------
// Line geometry
// ---------------------------------------------------------------------------

/// Number of lines sampled by the absolute (Gray-code) encoder.
pub const ABSOLUTE_LINES: u8 = 4;

/// Number of lines sampled by the relative (quadrature) encoder.
pub const RELATIVE_LINES: u8 = 2;

/// Number of distinct positions on the absolute wheel.
pub const ABSOLUTE_POSITIONS: u8 = 1 << ABSOLUTE_LINES;

/// Keeps the current 4-bit reading of a packed absolute history byte.
pub const ABSOLUTE_READING_MASK: u8 = 0b0000_1111;

/// Keeps the current 2-bit reading of a packed quadrature history.
pub const RELATIVE_READING_MASK: u8 = 0b0000_0011;

/// Keeps one previous and one current 2-bit reading.
pub const RELATIVE_HISTORY_MASK: u8 = 0b0000_1111;

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Debounce window (ms) suited to the optical Gray wheel.
///
/// [`EncoderConfig::default()`](crate::EncoderConfig) uses `0` (accept every
/// edge); opt into this value with
/// [`with_debounce_ms`](crate::EncoderConfig::with_debounce_ms).
pub const DEFAULT_DEBOUNCE_MS: u32 = 5;

// ---------------------------------------------------------------------------
// Gray code
// ---------------------------------------------------------------------------

/// Unwrap a 4-bit reflected Gray code into its linear rank.
pub const fn gray_to_binary(gray: u8) -> u8 {
    let g = gray & ABSOLUTE_READING_MASK;
    g ^ (g >> 1) ^ (g >> 2) ^ (g >> 3)
}

/// Encode a linear rank `0..16` as a 4-bit reflected Gray code.
pub const fn binary_to_gray(rank: u8) -> u8 {
    let r = rank & ABSOLUTE_READING_MASK;
    r ^ (r >> 1)
}

/// Raw 4-bit reading → linear position index `0..16`.
///
/// Adjacent positions differ in exactly one bit of their raw reading.
pub const GRAY_POSITION_TABLE: [u8; 16] = build_gray_position_table();

const fn build_gray_position_table() -> [u8; 16] {
    let mut table = [0u8; 16];
    let mut raw = 0;
    while raw < 16 {
        table[raw] = gray_to_binary(raw as u8);
        raw += 1;
    }
    table
}

/// Classify a move between two position indices on the 16-position wheel.
pub const fn classify_positions(previous: u8, current: u8) -> Transition {
    match current.wrapping_sub(previous) & ABSOLUTE_READING_MASK {
        0 => Transition::Stay,
        1 => Transition::Forward,
        15 => Transition::Backward,
        _ => Transition::Invalid,
    }
}

/// Absolute transition outcome indexed by the packed history byte
/// `(previous_reading << 4) | current_reading`.
pub const ABSOLUTE_TRANSITIONS: [Transition; 256] = build_absolute_transitions();

const fn build_absolute_transitions() -> [Transition; 256] {
    let mut table = [Transition::Invalid; 256];
    let mut history = 0;
    while history < 256 {
        let previous = GRAY_POSITION_TABLE[history >> 4];
        let current = GRAY_POSITION_TABLE[history & 0x0F];
        table[history] = classify_positions(previous, current);
        history += 1;
    }
    table
}

// ---------------------------------------------------------------------------
// Quadrature
// ---------------------------------------------------------------------------

/// Quadrature step indexed by `(previous << 2) | current`.
///
/// The cycle `00 → 01 → 11 → 10 → 00` counts forward. Changing both lines
/// at once cannot happen in a single step and is reported as invalid.
pub const QUADRATURE_TRANSITIONS: [Transition; 16] = [
    Transition::Stay,     // 00 → 00
    Transition::Forward,  // 00 → 01
    Transition::Backward, // 00 → 10
    Transition::Invalid,  // 00 → 11
    Transition::Backward, // 01 → 00
    Transition::Stay,     // 01 → 01
    Transition::Invalid,  // 01 → 10
    Transition::Forward,  // 01 → 11
    Transition::Forward,  // 10 → 00
    Transition::Invalid,  // 10 → 01
    Transition::Stay,     // 10 → 10
    Transition::Backward, // 10 → 11
    Transition::Invalid,  // 11 → 00
    Transition::Backward, // 11 → 01
    Transition::Forward,  // 11 → 10
    Transition::Stay,     // 11 → 11
];
