//! Output formatting for schedules and blocks.
//!
//! Used by the CLI to render day schedules either as a human-readable
//! table or as JSON for scripting.

use std::fmt;
use std::str::FromStr;

use crate::error::Result;
use crate::ReservationBlock;

/// Output format for rendered schedules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text, one block per line.
    #[default]
    Text,
    /// A JSON array of blocks.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("invalid output format: {other} (expected text or json)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Renders a single block as one text line.
fn format_block_line(block: &ReservationBlock) -> String {
    let mut line = format!(
        "{}  {}  {}",
        block.interval(),
        block.kind(),
        block.resource_id()
    );
    if let Some(booking_ref) = block.booking_ref() {
        line.push_str(&format!("  ref={booking_ref}"));
    }
    if let Some(expires_at) = block.hold_expires_at() {
        line.push_str(&format!("  expires={}", expires_at.format("%H:%M:%S")));
    }
    if let Some(notes) = block.notes() {
        line.push_str(&format!("  ({notes})"));
    }
    line
}

/// Renders a list of blocks in the requested format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use slotlock::output::{format_blocks, OutputFormat};
///
/// let rendered = format_blocks(&[], OutputFormat::Text).unwrap();
/// assert_eq!(rendered, "(no blocks)");
/// ```
pub fn format_blocks(blocks: &[ReservationBlock], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => {
            if blocks.is_empty() {
                return Ok("(no blocks)".to_string());
            }
            Ok(blocks
                .iter()
                .map(format_block_line)
                .collect::<Vec<_>>()
                .join("\n"))
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(blocks).map_err(|e| {
                crate::Error::Validation {
                    field: "output".into(),
                    message: format!("cannot serialize blocks: {e}"),
                }
            })?;
            Ok(json)
        }
    }
}
