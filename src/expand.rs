//! History expansion inhibitor
//!
//! The store does not perform `!` expansion itself; it only answers, per
//! call site, whether the `!` at a given offset is eligible. The three
//! `not_*` modes inhibit expansion inside quoted regions, with quote state
//! computed by a plain left-to-right scan that toggles on matching quote
//! characters and does no escape processing.

use crate::config::ExpandMode;

/// Outcome of the editor's history expansion, per the readline contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpandResult {
    /// Expansion failed
    Error,

    /// No expansion took place
    Unchanged,

    /// The line was expanded
    Expanded,

    /// The expansion should be displayed but not executed
    Displayed,
}

/// Whether the `!` at `marker_pos` must NOT be expanded
pub fn expansion_inhibited(mode: ExpandMode, line: &str, marker_pos: usize) -> bool {
    match mode {
        ExpandMode::Off => true,
        ExpandMode::On => false,
        ExpandMode::NotSquoted | ExpandMode::NotDquoted | ExpandMode::NotQuoted => {
            // Quote state at the marker: the most recent unmatched quote
            // character, or 0 outside any quote.
            let mut in_quote = 0u8;
            for &c in line.as_bytes().iter().take(marker_pos) {
                if c == b'\'' || c == b'"' {
                    in_quote = if c == in_quote { 0 } else { c };
                }
            }

            match mode {
                ExpandMode::NotSquoted => in_quote == b'\'',
                ExpandMode::NotDquoted => in_quote == b'"',
                _ => in_quote != 0,
            }
        }
    }
}
