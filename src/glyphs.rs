//! Custom characters for the display controller.
//!
//! The controller has 8 slots of character generator RAM, addressed as character codes
//! `0x00..=0x07`. Slot 0 holds the signal bar and slot 6 the half bar in both
//! orientations. When mounted upside down the remaining slots hold digits drawn rotated
//! by 180 degrees, so that they read upright once the display is turned around.

use embedded_hal::delay::DelayNs;

use crate::Orientation;

/// One custom character: 8 rows of 5 pixels, the leftmost pixel in bit 4.
pub type Bitmap = [u8; 8];

/// Number of character generator RAM slots.
pub const GLYPH_SLOTS: usize = 8;

/// Slot of the full signal bar.
pub const BAR_SLOT: u8 = 0;

/// Slot of the half signal bar.
pub const HALF_BAR_SLOT: u8 = 6;

/// Pause after every step of the upload sequence.
const UPLOAD_DELAY_MS: u32 = 25;

const BAR: Bitmap = [
    0b00000, //
    0b11011, //
    0b11011, //
    0b11011, //
    0b11011, //
    0b11011, //
    0b00000, //
    0b00000,
];

const HALF_BAR: Bitmap = [
    0b00000, //
    0b11000, //
    0b11000, //
    0b11000, //
    0b11000, //
    0b11000, //
    0b00000, //
    0b00000,
];

// Rotated half bar, its filled half ends up where the viewer expects it.
const HALF_BAR_ROTATED: Bitmap = [
    0b00000, //
    0b00011, //
    0b00011, //
    0b00011, //
    0b00011, //
    0b00011, //
    0b00000, //
    0b00000,
];

const BLANK: Bitmap = [0; 8];

const ONE_ROTATED: Bitmap = [
    0b01110, //
    0b00100, //
    0b00100, //
    0b00100, //
    0b00100, //
    0b00110, //
    0b00100, //
    0b00000,
];

const TWO_ROTATED: Bitmap = [
    0b11111, //
    0b00010, //
    0b00100, //
    0b01000, //
    0b10000, //
    0b10001, //
    0b01110, //
    0b00000,
];

const THREE_ROTATED: Bitmap = [
    0b01110, //
    0b10001, //
    0b10000, //
    0b01000, //
    0b00100, //
    0b01000, //
    0b11111, //
    0b00000,
];

const FOUR_ROTATED: Bitmap = [
    0b01000, //
    0b01000, //
    0b11111, //
    0b01001, //
    0b01010, //
    0b01100, //
    0b01000, //
    0b00000,
];

const FIVE_ROTATED: Bitmap = [
    0b01110, //
    0b10001, //
    0b10000, //
    0b10000, //
    0b01111, //
    0b00001, //
    0b11111, //
    0b00000,
];

const SEVEN_ROTATED: Bitmap = [
    0b00100, //
    0b00100, //
    0b00100, //
    0b01000, //
    0b01000, //
    0b10000, //
    0b11111, //
    0b00000,
];

const NORMAL_GLYPHS: [Bitmap; GLYPH_SLOTS] =
    [BAR, BLANK, BLANK, BLANK, BLANK, BLANK, HALF_BAR, BLANK];

const UPSIDE_DOWN_GLYPHS: [Bitmap; GLYPH_SLOTS] = [
    BAR,
    ONE_ROTATED,
    TWO_ROTATED,
    THREE_ROTATED,
    FOUR_ROTATED,
    FIVE_ROTATED,
    HALF_BAR_ROTATED,
    SEVEN_ROTATED,
];

/// Character codes showing the digits 0 to 9 on a display mounted upside down.
///
/// 0 and 8 look the same when rotated, a rotated 9 reads as 6 and the other way round.
/// Every other digit uses the custom character in the slot of the same number.
const UPSIDE_DOWN_DIGITS: [u8; 10] = [b'0', 0x01, 0x02, 0x03, 0x04, 0x05, b'9', 0x07, b'8', b'6'];

/// The glyph table uploaded for `orientation`, indexed by slot.
pub fn glyph_table(orientation: Orientation) -> &'static [Bitmap; GLYPH_SLOTS] {
    match orientation {
        Orientation::Normal => &NORMAL_GLYPHS,
        Orientation::UpsideDown => &UPSIDE_DOWN_GLYPHS,
    }
}

/// Character code that shows `digit` upright on a display mounted upside down.
///
/// Values above 9 only use their last decimal digit.
pub const fn rotated_digit(digit: u8) -> u8 {
    UPSIDE_DOWN_DIGITS[(digit % 10) as usize]
}

/// Digit a viewer reads from character code `code` on a display mounted upside down.
///
/// This is the inverse of [`rotated_digit`].
pub fn digit_of_rotated(code: u8) -> Option<u8> {
    UPSIDE_DOWN_DIGITS
        .iter()
        .position(|&c| c == code)
        .map(|digit| digit as u8)
}

/// Display operations needed to load custom characters.
pub trait GlyphDisplay {
    type Error;

    /// Blank the display, its content is kept.
    fn disable_output(&mut self) -> Result<(), Self::Error>;

    /// Show the display content again.
    fn enable_output(&mut self) -> Result<(), Self::Error>;

    /// Write `bitmap` to character generator slot `slot` (0 to 7).
    fn define_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), Self::Error>;
}

/// Uploads the glyph table for `orientation` to the display.
///
/// Runs with interrupts disabled: an interrupt handler talking to the display in the
/// middle of a character definition corrupts the glyph. The display stays blank while
/// the slots are written. The first failing write aborts the sequence and leaves the
/// display blank.
///
/// Meant to be called once during startup.
pub fn initialize_display<G, D>(
    display: &mut G,
    delay: &mut D,
    orientation: Orientation,
) -> Result<(), G::Error>
where
    G: GlyphDisplay,
    D: DelayNs,
{
    critical_section::with(|_cs| {
        display.disable_output()?;
        delay.delay_ms(UPLOAD_DELAY_MS);

        for (slot, bitmap) in glyph_table(orientation).iter().enumerate() {
            #[cfg(feature = "defmt")]
            defmt::debug!("defining glyph {=usize} for {}", slot, orientation);
            display.define_glyph(slot as u8, bitmap)?;
            delay.delay_ms(UPLOAD_DELAY_MS);
        }

        display.enable_output()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Eq)]
    enum Call {
        Disable,
        Enable,
        Define(u8, Bitmap),
        Delay(u32),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
        fail_at_slot: Option<u8>,
    }

    struct RecordingDelay<'a>(&'a core::cell::RefCell<Recorder>);

    impl DelayNs for RecordingDelay<'_> {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            self.0.borrow_mut().calls.push(Call::Delay(ms));
        }
    }

    struct RecordingDisplay<'a>(&'a core::cell::RefCell<Recorder>);

    impl GlyphDisplay for RecordingDisplay<'_> {
        type Error = u8;

        fn disable_output(&mut self) -> Result<(), u8> {
            self.0.borrow_mut().calls.push(Call::Disable);
            Ok(())
        }

        fn enable_output(&mut self) -> Result<(), u8> {
            self.0.borrow_mut().calls.push(Call::Enable);
            Ok(())
        }

        fn define_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), u8> {
            let mut recorder = self.0.borrow_mut();
            if recorder.fail_at_slot == Some(slot) {
                return Err(slot);
            }
            recorder.calls.push(Call::Define(slot, *bitmap));
            Ok(())
        }
    }

    fn upload(orientation: Orientation, fail_at_slot: Option<u8>) -> (Result<(), u8>, Vec<Call>) {
        let recorder = core::cell::RefCell::new(Recorder {
            calls: Vec::new(),
            fail_at_slot,
        });
        let result = initialize_display(
            &mut RecordingDisplay(&recorder),
            &mut RecordingDelay(&recorder),
            orientation,
        );
        (result, recorder.into_inner().calls)
    }

    /// Rotates the 7 visible rows by 180 degrees, the cursor row stays at the bottom.
    fn rotate(bitmap: &Bitmap) -> Bitmap {
        let mut rotated = [0; 8];
        for row in 0..7 {
            rotated[row] = bitmap[6 - row].reverse_bits() >> 3;
        }
        rotated[7] = bitmap[7];
        rotated
    }

    #[test]
    fn upload_sequence() {
        for orientation in [Orientation::Normal, Orientation::UpsideDown] {
            let (result, calls) = upload(orientation, None);
            assert_eq!(result, Ok(()));

            let mut expected = vec![Call::Disable, Call::Delay(25)];
            for (slot, bitmap) in glyph_table(orientation).iter().enumerate() {
                expected.push(Call::Define(slot as u8, *bitmap));
                expected.push(Call::Delay(25));
            }
            expected.push(Call::Enable);
            assert_eq!(calls, expected);
        }
    }

    #[test]
    fn failed_write_leaves_display_disabled() {
        let (result, calls) = upload(Orientation::UpsideDown, Some(3));
        assert_eq!(result, Err(3));
        assert!(!calls.contains(&Call::Enable));
        let defined: Vec<u8> = calls
            .iter()
            .filter_map(|call| match call {
                Call::Define(slot, _) => Some(*slot),
                _ => None,
            })
            .collect();
        assert_eq!(defined, vec![0, 1, 2]);

        // the critical section was released, a second attempt goes through
        let (result, _) = upload(Orientation::UpsideDown, None);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn bars_per_orientation() {
        let normal = glyph_table(Orientation::Normal);
        let upside_down = glyph_table(Orientation::UpsideDown);
        let bar = BAR_SLOT as usize;
        let half = HALF_BAR_SLOT as usize;

        assert_eq!(normal[bar], upside_down[bar]);
        assert_ne!(normal[half], upside_down[half]);
        for (row, mirrored) in normal[half].iter().zip(upside_down[half].iter()) {
            assert_eq!(row.reverse_bits() >> 3, *mirrored);
        }
    }

    #[test]
    fn rows_are_five_pixels_wide() {
        for orientation in [Orientation::Normal, Orientation::UpsideDown] {
            for bitmap in glyph_table(orientation) {
                assert!(bitmap.iter().all(|row| *row < 32));
                assert_eq!(bitmap[7], 0, "cursor row must stay empty");
            }
        }
    }

    #[test]
    fn rotated_glyphs_match_rom_digits() {
        // A00 character ROM patterns of the HD44780
        let rom: [(u8, Bitmap); 5] = [
            (1, [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110, 0]),
            (2, [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111, 0]),
            (3, [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110, 0]),
            (4, [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010, 0]),
            (5, [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110, 0]),
        ];
        let table = glyph_table(Orientation::UpsideDown);
        for (digit, upright) in rom.iter() {
            let slot = rotated_digit(*digit) as usize;
            assert_eq!(rotate(&table[slot]), *upright, "digit {}", digit);
        }
    }

    #[test]
    fn firmware_bitmaps() {
        let normal = glyph_table(Orientation::Normal);
        let upside_down = glyph_table(Orientation::UpsideDown);
        let bar: Bitmap = [0b00000, 0b11011, 0b11011, 0b11011, 0b11011, 0b11011, 0b00000, 0b00000];
        let seven: Bitmap = [0b00100, 0b00100, 0b00100, 0b01000, 0b01000, 0b10000, 0b11111, 0b00000];
        let half: Bitmap = [0b00000, 0b11000, 0b11000, 0b11000, 0b11000, 0b11000, 0b00000, 0b00000];
        let half_rotated: Bitmap = [0b00000, 0b00011, 0b00011, 0b00011, 0b00011, 0b00011, 0b00000, 0b00000];

        assert_eq!(normal[BAR_SLOT as usize], bar);
        assert_eq!(upside_down[BAR_SLOT as usize], bar);
        assert_eq!(normal[HALF_BAR_SLOT as usize], half);
        assert_eq!(upside_down[HALF_BAR_SLOT as usize], half_rotated);
        assert_eq!(upside_down[7], seven);
        for slot in [1, 2, 3, 4, 5, 7] {
            assert_eq!(normal[slot], [0u8; 8], "slot {}", slot);
        }
    }

    #[test]
    fn digit_alphabet() {
        let codes: Vec<u8> = (0..10).map(rotated_digit).collect();
        assert_eq!(codes, vec![b'0', 1, 2, 3, 4, 5, b'9', 7, b'8', b'6']);
        assert_eq!(rotated_digit(12), rotated_digit(2));

        // custom slots never collide with the bars
        assert!(!codes.contains(&BAR_SLOT));
        assert!(!codes.contains(&HALF_BAR_SLOT));

        for digit in 0..10 {
            assert_eq!(digit_of_rotated(rotated_digit(digit)), Some(digit));
        }
        assert_eq!(digit_of_rotated(b' '), None);
        assert_eq!(digit_of_rotated(b'1'), None);
    }
}
