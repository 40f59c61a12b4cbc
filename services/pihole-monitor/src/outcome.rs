//! Cycle outcomes and the rows each one puts on the display

use std::fmt;

use crate::facts::StatusFacts;
use crate::status::{LastBlockedEntry, StatusSnapshot};

/// Number of text rows on the display
pub const ROWS: usize = 2;

/// One text line per display row, top first
pub type Rows = [String; ROWS];

/// Character code of the "check" glyph in the display's custom slots
pub const CHECK_GLYPH: char = '\u{0}';
/// Character code of the "block" glyph
pub const BLOCK_GLYPH: char = '\u{1}';

/// Result of one monitor cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    Offline,
    ApplianceUnreachable,
    ApplianceDisabled,
    Nominal(StatusSnapshot, LastBlockedEntry),
}

impl CycleOutcome {
    /// Text for both rows, before fitting to the display width
    pub fn rows(&self) -> Rows {
        match self {
            CycleOutcome::Offline => rows("No network.", "Check router."),
            CycleOutcome::ApplianceUnreachable => rows("PiHole not found", "Check LAN/Power."),
            CycleOutcome::ApplianceDisabled => rows("PiHole Off", "Please wait..."),
            CycleOutcome::Nominal(snapshot, last_blocked) => [
                summary_line(&StatusFacts::derive(snapshot)),
                last_blocked.as_str().to_string(),
            ],
        }
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self, CycleOutcome::Nominal(..))
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::Offline => write!(f, "Offline"),
            CycleOutcome::ApplianceUnreachable => write!(f, "ApplianceUnreachable"),
            CycleOutcome::ApplianceDisabled => write!(f, "ApplianceDisabled"),
            CycleOutcome::Nominal(..) => write!(f, "Nominal"),
        }
    }
}

/// Glyph-annotated query and blocked counters
pub fn summary_line(facts: &StatusFacts) -> String {
    format!(
        "{} {}  {} {}",
        CHECK_GLYPH,
        facts.query_count(),
        BLOCK_GLYPH,
        facts.blocked_count()
    )
}

/// Rows shown once the loop has been cancelled
pub fn shutdown_rows() -> Rows {
    rows("Manual cancel.", "Exiting app.")
}

/// Rows shown while the service starts
pub fn splash_rows(version: &str) -> Rows {
    rows("Loading PiHole..", &format!("V {}", version))
}

/// Truncate or right-pad `text` to exactly `width` characters
pub fn fit_to_width(text: &str, width: usize) -> String {
    let mut fitted: String = text.chars().take(width).collect();
    let len = fitted.chars().count();
    fitted.extend(std::iter::repeat_n(' ', width - len));
    fitted
}

pub fn fit_rows(rows: &Rows, width: usize) -> Rows {
    [fit_to_width(&rows[0], width), fit_to_width(&rows[1], width)]
}

fn rows(top: &str, bottom: &str) -> Rows {
    [top.to_string(), bottom.to_string()]
}
