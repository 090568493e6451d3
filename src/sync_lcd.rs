use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

use ufmt_write::uWrite;

use crate::glyphs::{Bitmap, GlyphDisplay};
use crate::{
    Backlight, BitMode, Commands, CursorMoveDir, DisplayControl, DisplayShift, Mode, ENABLE,
};

/// API to write to the LCD.
pub struct Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    i2c: &'a mut I,
    address: u8,
    rows: u8,
    delay: &'a mut D,
    backlight_state: Backlight,
    display_on: bool,
    cursor_on: bool,
    cursor_blink: bool,
}

impl<'a, I, D> Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    /// Create new instance with only the I2C and delay instance.
    pub fn new(i2c: &'a mut I, delay: &'a mut D) -> Self {
        Self {
            i2c,
            delay,
            backlight_state: Backlight::On,
            address: 0,
            rows: 0,
            display_on: true,
            cursor_blink: false,
            cursor_on: false,
        }
    }

    /// Zero based number of rows.
    pub fn with_rows(mut self, rows: u8) -> Self {
        self.rows = rows;
        self
    }

    /// Set I2C address, see [lcd address].
    ///
    /// [lcd address]: https://badboi.dev/rust,/microcontrollers/2020/11/09/i2c-hello-world.html
    pub fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    pub fn with_cursor_on(mut self, on: bool) -> Self {
        self.cursor_on = on;
        self
    }

    pub fn with_cursor_blink(mut self, blink: bool) -> Self {
        self.cursor_blink = blink;
        self
    }

    /// Initializes the hardware.
    ///
    /// Actual procedure is a bit obscure. This one was compiled from this [blog post],
    /// corresponding [code] and the [datasheet].
    ///
    /// [datasheet]: https://www.openhacks.com/uploadsproductos/eone-1602a1.pdf
    /// [code]: https://github.com/jalhadi/i2c-hello-world/blob/main/src/main.rs
    /// [blog post]: https://badboi.dev/rust,/microcontrollers/2020/11/09/i2c-hello-world.html
    pub fn init(mut self) -> Result<Self, I::Error> {
        // Initial delay to wait for init after power on.
        self.delay.delay_ms(80);

        self.backlight(self.backlight_state)?;

        // Init with 8 bit mode
        let mode_8bit = Mode::FunctionSet as u8 | BitMode::Bit8 as u8;
        self.write4bits(mode_8bit)?;
        self.delay.delay_ms(5);
        self.write4bits(mode_8bit)?;
        self.delay.delay_ms(5);
        self.write4bits(mode_8bit)?;
        self.delay.delay_ms(5);

        // Switch to 4 bit mode
        let mode_4bit = Mode::FunctionSet as u8 | BitMode::Bit4 as u8;
        self.write4bits(mode_4bit)?;

        // Function set command, 5x8 font
        let lines = if self.rows == 0 { 0x00 } else { 0x08 };
        self.command(Mode::FunctionSet as u8 | lines)?;

        self.update_display_control()?;
        self.clear()?;

        // Entry right: shifting cursor moves to right
        self.command(
            Mode::EntrySet as u8 | CursorMoveDir::Right as u8 | DisplayShift::Off as u8,
        )?;
        self.return_home()?;
        Ok(self)
    }

    /// Latch one nibble, `data` carries it in the upper 4 bits.
    fn write4bits(&mut self, data: u8) -> Result<(), I::Error> {
        let port = data | self.backlight_state as u8;
        self.i2c.write(self.address, &[port])?;
        self.i2c.write(self.address, &[port | ENABLE])?;
        self.i2c.write(self.address, &[port])?;
        self.delay.delay_us(700);
        Ok(())
    }

    fn send(&mut self, data: u8, mode: Mode) -> Result<(), I::Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("send {=u8:x} rs={=u8}", data, mode as u8);
        let high_bits: u8 = data & 0xf0;
        let low_bits: u8 = (data << 4) & 0xf0;
        self.write4bits(high_bits | mode as u8)?;
        self.write4bits(low_bits | mode as u8)?;
        Ok(())
    }

    fn command(&mut self, data: u8) -> Result<(), I::Error> {
        self.send(data, Mode::Cmd)
    }

    pub fn backlight(&mut self, backlight: Backlight) -> Result<(), I::Error> {
        self.backlight_state = backlight;
        self.i2c.write(self.address, &[backlight as u8])
    }

    /// Write raw character codes to display.
    ///
    /// Codes `0x00..=0x07` show the custom characters, see [`Lcd::create_char`].
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<(), I::Error> {
        for b in data {
            self.send(*b, Mode::Data)?;
        }
        Ok(())
    }

    /// Write string to display.
    pub fn write_str(&mut self, data: &str) -> Result<(), I::Error> {
        self.write_bytes(data.as_bytes())
    }

    /// Clear the display
    pub fn clear(&mut self) -> Result<(), I::Error> {
        self.command(Mode::Cmd as u8 | Commands::Clear as u8)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Return cursor to upper left corner, i.e. (0,0).
    pub fn return_home(&mut self) -> Result<(), I::Error> {
        self.command(Commands::ReturnHome as u8)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    /// Set the cursor to (rows, col). Coordinates are zero-based.
    ///
    /// The controller has two lines of 64 addresses, larger coordinates wrap.
    pub fn set_cursor(&mut self, row: u8, col: u8) -> Result<(), I::Error> {
        let shift: u8 = (row & 0x01) * 0x40 + (col & 0x3f);
        self.command(Mode::DDRAMAddr as u8 | shift)
    }

    /// Turn the display output on or off, the content is kept.
    pub fn display(&mut self, on: bool) -> Result<(), I::Error> {
        self.display_on = on;
        self.update_display_control()
    }

    /// Store `bitmap` as custom character `slot` (0 to 7).
    ///
    /// Leaves the address counter in character generator RAM, call
    /// [`Lcd::set_cursor`] before writing text again.
    pub fn create_char(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), I::Error> {
        self.command(Mode::CGRAMAddr as u8 | (slot & 0x07) << 3)?;
        for row in bitmap {
            self.send(row & 0x1f, Mode::Data)?;
        }
        Ok(())
    }

    /// Recomputes display_ctrl and updates the lcd
    fn update_display_control(&mut self) -> Result<(), I::Error> {
        let mut display_ctrl = DisplayControl::Off as u8;
        if self.display_on {
            display_ctrl |= DisplayControl::DisplayOn as u8;
        }
        if self.cursor_on {
            display_ctrl |= DisplayControl::CursorOn as u8;
        }
        if self.cursor_blink {
            display_ctrl |= DisplayControl::CursorBlink as u8;
        }
        self.command(Mode::DisplayControl as u8 | display_ctrl)
    }
}

impl<'a, I, D> GlyphDisplay for Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = I::Error;

    fn disable_output(&mut self) -> Result<(), Self::Error> {
        self.display(false)
    }

    fn enable_output(&mut self) -> Result<(), Self::Error> {
        self.display(true)
    }

    fn define_glyph(&mut self, slot: u8, bitmap: &Bitmap) -> Result<(), Self::Error> {
        self.create_char(slot, bitmap)
    }
}

impl<'a, I, D> uWrite for Lcd<'a, I, D>
where
    I: I2c,
    D: DelayNs,
{
    type Error = I::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.write_str(s)
    }
}
