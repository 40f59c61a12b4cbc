//! Display sink abstraction and the console sink

use async_trait::async_trait;

use crate::outcome::{BLOCK_GLYPH, CHECK_GLYPH};

/// One 5x8 custom character, top row first
pub type Glyph = [u8; 8];

/// Tick mark, loaded into custom slot 0
pub const CHECK_BITMAP: Glyph = [
    0b00000, 0b00001, 0b00011, 0b10110, 0b11100, 0b01000, 0b00000, 0b00000,
];

/// Crossed box, loaded into custom slot 1
pub const BLOCK_BITMAP: Glyph = [
    0b00000, 0b11111, 0b10011, 0b10101, 0b11001, 0b11111, 0b00000, 0b00000,
];

/// Glyphs in slot order
pub const CUSTOM_GLYPHS: [Glyph; 2] = [CHECK_BITMAP, BLOCK_BITMAP];

/// Write-only character display
///
/// Rows are zero-based. Implementations write `text` as given; fitting it to
/// the display width is the caller's job.
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait DisplaySink: Send + Sync {
    /// Blank every row
    async fn clear(&mut self) -> crate::Result<()>;

    /// Write `text` starting at the first column of `row`
    async fn write_line(&mut self, text: &str, row: usize) -> crate::Result<()>;

    /// Replace the custom character slots, starting at slot 0
    async fn load_custom_glyphs(&mut self, glyphs: &[Glyph]) -> crate::Result<()>;

    async fn set_backlight(&mut self, on: bool) -> crate::Result<()>;
}

/// Sink that logs rows instead of driving hardware
#[derive(Debug, Default)]
pub struct ConsoleDisplay;

impl ConsoleDisplay {
    pub fn new() -> Self {
        Self
    }
}

/// Replace custom glyph codes with printable stand-ins
pub fn printable(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            CHECK_GLYPH => '✓',
            BLOCK_GLYPH => '■',
            c if c.is_control() => '?',
            c => c,
        })
        .collect()
}

#[async_trait]
impl DisplaySink for ConsoleDisplay {
    async fn clear(&mut self) -> crate::Result<()> {
        tracing::debug!("display: clear");
        Ok(())
    }

    async fn write_line(&mut self, text: &str, row: usize) -> crate::Result<()> {
        tracing::info!("display[{}]: |{}|", row, printable(text));
        Ok(())
    }

    async fn load_custom_glyphs(&mut self, glyphs: &[Glyph]) -> crate::Result<()> {
        tracing::debug!("display: loaded {} custom glyphs", glyphs.len());
        Ok(())
    }

    async fn set_backlight(&mut self, on: bool) -> crate::Result<()> {
        tracing::debug!("display: backlight {}", if on { "on" } else { "off" });
        Ok(())
    }
}
