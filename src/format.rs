//! Readouts for the frequency and the signal strength.
//!
//! The output is raw display bytes, not UTF-8: it contains custom character codes
//! `0x01..=0x07` and the ROM character `0xA5` used as the unit marker. Write it with
//! [`Lcd::write_bytes`](crate::Lcd::write_bytes).

use heapless::{String, Vec};
use portable_atomic::{AtomicI32, Ordering};

use crate::glyphs::rotated_digit;
use crate::Orientation;

/// Width of the frequency field in characters.
pub const FREQUENCY_WIDTH: usize = 9;

/// Width of the signal field in characters.
pub const SIGNAL_WIDTH: usize = 3;

/// Unit marker between whole and fractional part of the frequency.
pub const MARKER: u8 = 0xA5;

/// Digits of the frequency, right aligned.
const DIGITS: usize = 7;

/// Longest decimal text of an i32, `-2147483648`.
const DECIMAL_LEN: usize = 11;

pub type FrequencyText = Vec<u8, FREQUENCY_WIDTH>;
pub type SignalText = Vec<u8, SIGNAL_WIDTH>;

/// The value printed right aligned into 7 characters, padded with spaces.
///
/// Longer numbers keep their first 7 characters.
fn digit_field(value: i32) -> [u8; DIGITS] {
    let mut decimal: String<DECIMAL_LEN> = String::new();
    // every i32 fits
    let _ = ufmt::uwrite!(decimal, "{}", value);

    let digits = decimal.as_bytes();
    let mut field = [b' '; DIGITS];
    let pad = DIGITS.saturating_sub(digits.len());
    let shown = digits.len().min(DIGITS);
    field[pad..].copy_from_slice(&digits[..shown]);
    field
}

/// Copies a readout into its field, every layout below fits its capacity.
fn text<const N: usize>(bytes: &[u8]) -> Vec<u8, N> {
    debug_assert!(bytes.len() <= N, "readout wider than its field");
    Vec::from_slice(&bytes[..bytes.len().min(N)]).unwrap_or_default()
}

/// Character code of an ASCII digit on a display mounted upside down, anything else is
/// kept.
fn rotate_char(c: u8) -> u8 {
    if c.is_ascii_digit() {
        rotated_digit(c - b'0')
    } else {
        c
    }
}

/// Formats the frequency as `D¥DDD:DDD`.
///
/// Upside down the field is mirrored into `DD:DDD¥D`: the digits are exchanged for
/// rotated ones and their order is reversed. The last digit has no room in this layout
/// and is dropped, so a viewer reads `D¥DDD:DD`.
pub fn format_frequency(frequency: i32, orientation: Orientation) -> FrequencyText {
    let b = digit_field(frequency);
    match orientation {
        Orientation::Normal => text(&[b[0], MARKER, b[1], b[2], b[3], b':', b[4], b[5], b[6]]),
        Orientation::UpsideDown => {
            let mut br = [0u8; DIGITS];
            for (i, c) in b.iter().enumerate() {
                br[DIGITS - 1 - i] = rotate_char(*c);
            }
            // br[0] is not shown
            text(&[br[1], br[2], b':', br[3], br[4], br[5], MARKER, br[6]])
        }
    }
}

/// Formats the frequency currently held in `frequency`.
///
/// The value is read with a single atomic load, the owner may update it from an
/// interrupt handler.
pub fn format_current_frequency(frequency: &AtomicI32, orientation: Orientation) -> FrequencyText {
    format_frequency(frequency.load(Ordering::Relaxed), orientation)
}

/// Formats the signal strength as ` S9`, or `+D` from 10 on with the last digit of the
/// value.
///
/// Upside down the field becomes `9S `, and every value above 9 shows as overload: `0` +
/// rotated 1 + `+` for 10, `0` + rotated 2 + `+` for anything higher.
pub fn format_signal(signal: u8, orientation: Orientation) -> SignalText {
    match orientation {
        Orientation::Normal if signal < 10 => text(&[b' ', b'S', b'0' + signal]),
        Orientation::Normal => text(&[b'+', b'0' + signal % 10]),
        Orientation::UpsideDown if signal < 10 => text(&[rotated_digit(signal), b'S', b' ']),
        Orientation::UpsideDown if signal == 10 => text(&[b'0', rotated_digit(1), b'+']),
        Orientation::UpsideDown => text(&[b'0', rotated_digit(2), b'+']),
    }
}
