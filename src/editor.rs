//! Line-editor collaborator contract
//!
//! The store populates an external line editor's history and registers the
//! expansion-inhibitor hook with it; the editor owns recall and the actual
//! `!` substitution. This trait is the seam the host shell implements over
//! its editor library.

use std::sync::Arc;

use crate::expand::ExpandResult;

/// Predicate consulted for each `!` the editor considers expanding:
/// `(line, marker_pos)` → inhibit?
pub type InhibitExpansionFn = Arc<dyn Fn(&str, usize) -> bool + Send + Sync>;

/// History surface of the external line editor
pub trait LineEditor {
    /// Drop all lines held by the editor
    fn clear_history(&mut self);

    /// Append one line to the editor's history
    fn add_history(&mut self, line: &str);

    /// Prepare the editor's history state for expansion
    fn using_history(&mut self);

    /// Run `!` expansion over `line`; the string is the expanded form
    /// when one was produced
    fn history_expand(&mut self, line: &str) -> (ExpandResult, Option<String>);

    /// Install the expansion-inhibitor predicate
    ///
    /// Registered once per store; the editor treats the hook as
    /// process-wide state.
    fn set_inhibit_expansion(&mut self, hook: InhibitExpansionFn);
}
