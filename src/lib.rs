#![cfg_attr(not(test), no_std)]
//! Frequency and signal readouts for LCD displays with a LM1602 connected via i2c like
//! [this one] with 16x2 characters, including a mode for displays mounted upside down.
//!
//! When the display is rotated by 180 degrees most ROM digits become unreadable. The
//! [`glyphs`] module holds custom characters for those digits, the [`format`] module
//! reorders every readout so it reads left to right for the viewer. The orientation is
//! chosen at build time with the `upside-down` feature, see [`ORIENTATION`].
//!
//! Usage:
//! ```ignore
//! const LCD_ADDRESS: u8 = 0x27; // Address depends on hardware, see link below
//!
//! let dp = arduino_hal::Peripherals::take().unwrap();
//! let pins = arduino_hal::pins!(dp);
//! let mut i2c = arduino_hal::I2c::new(
//!     dp.TWI, //
//!     pins.a4.into_pull_up_input(), // use respective pins
//!     pins.a5.into_pull_up_input(),
//!     50000,
//! );
//! let mut delay = arduino_hal::Delay::new();
//! let mut glyph_delay = arduino_hal::Delay::new();
//!
//! let mut lcd = lcd_lcm1602_telemetry::Lcd::new(&mut i2c, &mut delay)
//!     .with_address(LCD_ADDRESS)
//!     .with_rows(1) // two rows
//!     .init()?;
//! lcd_lcm1602_telemetry::initialize_display(&mut lcd, &mut glyph_delay, lcd_lcm1602_telemetry::ORIENTATION)?;
//!
//! let text = lcd_lcm1602_telemetry::format_frequency(7_074_000, lcd_lcm1602_telemetry::ORIENTATION);
//! lcd.set_cursor(0, 0)?;
//! lcd.write_bytes(&text)?;
//! ```
//!
//! This [site][lcd address] describes how to find the address of your LCD devices.
//!
//! [this one]: https://funduinoshop.com/elektronische-module/displays/lcd/16x02-i2c-lcd-modul-hintergrundbeleuchtung-blau
//! [lcd address]: https://www.ardumotive.com/i2clcden.html

pub mod format;
pub mod glyphs;
pub mod sync_lcd;

pub use format::{format_current_frequency, format_frequency, format_signal, FrequencyText, SignalText};
pub use glyphs::{initialize_display, Bitmap, GlyphDisplay};
pub use sync_lcd::Lcd;

/// How the display is physically mounted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Orientation {
    Normal,
    /// Rotated by 180 degrees.
    UpsideDown,
}

/// Orientation selected by the `upside-down` feature.
///
/// The glyph table lives in the display controller once uploaded, so the orientation
/// can't change at runtime.
pub const ORIENTATION: Orientation = if cfg!(feature = "upside-down") {
    Orientation::UpsideDown
} else {
    Orientation::Normal
};

/// Bit 2 of the PCF8574 port drives the enable line of the LCD.
const ENABLE: u8 = 0x04;

#[derive(Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayControl {
    Off = 0x00,
    CursorBlink = 0x01,
    CursorOn = 0x02,
    DisplayOn = 0x04,
}

#[derive(Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backlight {
    Off = 0x00,
    On = 0x08,
}

#[repr(u8)]
#[derive(Copy, Clone)]
enum Mode {
    Cmd = 0x00,
    Data = 0x01,
    EntrySet = 0x04,
    DisplayControl = 0x08,
    FunctionSet = 0x20,
    CGRAMAddr = 0x40,
    DDRAMAddr = 0x80,
}

enum Commands {
    Clear = 0x01,
    ReturnHome = 0x02,
}

enum BitMode {
    Bit4 = 0x0 << 4,
    Bit8 = 0x1 << 4,
}

#[repr(u8)]
#[derive(Copy, Clone)]
enum CursorMoveDir {
    Right = 0x02,
}

#[repr(u8)]
#[derive(Copy, Clone)]
enum DisplayShift {
    Off = 0x00,
}
