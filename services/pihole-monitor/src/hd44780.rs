//! HD44780 character LCD behind a PCF8574 I2C backpack
//!
//! The controller runs in 4-bit mode: every byte goes out as two nibbles on
//! the expander's upper pins, each latched by pulsing the enable line. The
//! lower pins carry register select, read/write, enable and the backlight.

use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use linux_embedded_hal::{Delay, I2cdev};

use crate::display::{DisplaySink, Glyph};
use crate::PiholeMonitorError;

// Commands
const CLEAR_DISPLAY: u8 = 0x01;
const RETURN_HOME: u8 = 0x02;
const ENTRY_MODE_SET: u8 = 0x04;
const DISPLAY_CONTROL: u8 = 0x08;
const FUNCTION_SET: u8 = 0x20;
const SET_CGRAM_ADDR: u8 = 0x40;

// Flags
const ENTRY_LEFT: u8 = 0x02;
const DISPLAY_ON: u8 = 0x04;
const TWO_LINE: u8 = 0x08;
const FIVE_BY_EIGHT_DOTS: u8 = 0x00;
const FOUR_BIT_MODE: u8 = 0x00;

// Expander pins
const BACKLIGHT: u8 = 0x08;
const ENABLE: u8 = 0b0000_0100;
const REGISTER_SELECT: u8 = 0b0000_0001;

/// DDRAM start address of each row
const ROW_ADDRESSES: [u8; 4] = [0x80, 0xC0, 0x94, 0xD4];

/// Failures of the blocking LCD driver
#[derive(Debug, thiserror::Error)]
pub enum LcdError<E: fmt::Debug> {
    #[error("I2C bus error: {0:?}")]
    Bus(E),

    #[error("no display row {0}")]
    NoSuchRow(usize),
}

/// Blocking HD44780 protocol over any `embedded-hal` I2C bus
#[derive(Debug)]
pub struct Hd44780<B, D> {
    bus: B,
    address: u8,
    delay: D,
    backlight: u8,
}

impl<B: I2c, D: DelayNs> Hd44780<B, D> {
    /// Put the controller at `address` into 4-bit, two-line mode and clear it
    pub fn init(bus: B, address: u8, delay: D) -> Result<Self, LcdError<B::Error>> {
        let mut lcd = Self {
            bus,
            address,
            delay,
            backlight: BACKLIGHT,
        };
        lcd.command(0x03)?;
        lcd.command(0x03)?;
        lcd.command(0x03)?;
        lcd.command(0x02)?;
        lcd.command(FUNCTION_SET | TWO_LINE | FIVE_BY_EIGHT_DOTS | FOUR_BIT_MODE)?;
        lcd.command(DISPLAY_CONTROL | DISPLAY_ON)?;
        lcd.command(CLEAR_DISPLAY)?;
        lcd.command(ENTRY_MODE_SET | ENTRY_LEFT)?;
        lcd.delay.delay_ms(2);
        Ok(lcd)
    }

    pub fn clear(&mut self) -> Result<(), LcdError<B::Error>> {
        self.command(CLEAR_DISPLAY)?;
        self.command(RETURN_HOME)?;
        self.delay.delay_ms(2);
        Ok(())
    }

    pub fn write_line(&mut self, text: &str, row: usize) -> Result<(), LcdError<B::Error>> {
        let address = ROW_ADDRESSES
            .get(row)
            .copied()
            .ok_or(LcdError::NoSuchRow(row))?;
        self.command(address)?;
        for c in text.chars() {
            self.data(char_code(c))?;
        }
        Ok(())
    }

    pub fn load_custom_glyphs(&mut self, glyphs: &[Glyph]) -> Result<(), LcdError<B::Error>> {
        self.command(SET_CGRAM_ADDR)?;
        for glyph in glyphs {
            for line in glyph {
                self.data(*line)?;
            }
        }
        Ok(())
    }

    pub fn set_backlight(&mut self, on: bool) -> Result<(), LcdError<B::Error>> {
        self.backlight = if on { BACKLIGHT } else { 0 };
        self.expander_write(0)
    }

    fn command(&mut self, byte: u8) -> Result<(), LcdError<B::Error>> {
        self.send(byte, 0)
    }

    fn data(&mut self, byte: u8) -> Result<(), LcdError<B::Error>> {
        self.send(byte, REGISTER_SELECT)
    }

    fn send(&mut self, byte: u8, mode: u8) -> Result<(), LcdError<B::Error>> {
        self.write_nibble(mode | (byte & 0xF0))?;
        self.write_nibble(mode | ((byte << 4) & 0xF0))
    }

    fn write_nibble(&mut self, bits: u8) -> Result<(), LcdError<B::Error>> {
        self.expander_write(bits)?;
        self.expander_write(bits | ENABLE)?;
        self.delay.delay_us(500);
        self.expander_write(bits & !ENABLE)?;
        self.delay.delay_us(100);
        Ok(())
    }

    fn expander_write(&mut self, bits: u8) -> Result<(), LcdError<B::Error>> {
        self.bus
            .write(self.address, &[bits | self.backlight])
            .map_err(LcdError::Bus)
    }
}

/// Controller character code; anything outside the 8-bit range becomes '?'
fn char_code(c: char) -> u8 {
    u8::try_from(u32::from(c)).unwrap_or(b'?')
}

/// Async [`DisplaySink`] that runs each LCD operation on the blocking pool
pub struct Hd44780Display<B, D> {
    lcd: Arc<Mutex<Hd44780<B, D>>>,
}

impl Hd44780Display<I2cdev, Delay> {
    /// Open the Linux I2C device and initialize the controller
    pub async fn open(bus: &Path, address: u8) -> crate::Result<Self> {
        let path = bus.to_path_buf();
        let lcd = tokio::task::spawn_blocking(move || {
            let i2c = I2cdev::new(&path).map_err(|e| e.to_string())?;
            Hd44780::init(i2c, address, Delay).map_err(|e| e.to_string())
        })
        .await
        .map_err(|e| PiholeMonitorError::Display(format!("LCD init task failed: {}", e)))?
        .map_err(|e| {
            PiholeMonitorError::Display(format!(
                "Opening LCD at {:?} address {:#04x}: {}",
                bus, address, e
            ))
        })?;
        tracing::debug!("LCD initialized on {:?} at {:#04x}", bus, address);
        Ok(Self::new(lcd))
    }
}

impl<B, D> Hd44780Display<B, D>
where
    B: I2c + Send + 'static,
    D: DelayNs + Send + 'static,
{
    pub fn new(lcd: Hd44780<B, D>) -> Self {
        Self {
            lcd: Arc::new(Mutex::new(lcd)),
        }
    }

    async fn run<F>(&self, op: F) -> crate::Result<()>
    where
        F: FnOnce(&mut Hd44780<B, D>) -> Result<(), LcdError<B::Error>> + Send + 'static,
    {
        let lcd = Arc::clone(&self.lcd);
        tokio::task::spawn_blocking(move || {
            let mut lcd = lcd
                .lock()
                .map_err(|_| PiholeMonitorError::Display("LCD lock poisoned".to_string()))?;
            op(&mut lcd).map_err(|e| PiholeMonitorError::Display(e.to_string()))
        })
        .await
        .map_err(|e| PiholeMonitorError::Display(format!("LCD task failed: {}", e)))?
    }
}

#[async_trait]
impl<B, D> DisplaySink for Hd44780Display<B, D>
where
    B: I2c + Send + 'static,
    D: DelayNs + Send + 'static,
{
    async fn clear(&mut self) -> crate::Result<()> {
        self.run(|lcd| lcd.clear()).await
    }

    async fn write_line(&mut self, text: &str, row: usize) -> crate::Result<()> {
        let text = text.to_string();
        self.run(move |lcd| lcd.write_line(&text, row)).await
    }

    async fn load_custom_glyphs(&mut self, glyphs: &[Glyph]) -> crate::Result<()> {
        let glyphs = glyphs.to_vec();
        self.run(move |lcd| lcd.load_custom_glyphs(&glyphs)).await
    }

    async fn set_backlight(&mut self, on: bool) -> crate::Result<()> {
        self.run(move |lcd| lcd.set_backlight(on)).await
    }
}
