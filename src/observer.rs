//! Reporting hooks for an organization run.
//!
//! [`FileOrganizer`](crate::file_organizer::FileOrganizer) never logs directly.
//! It reports every decision to an [`OrganizeObserver`], which keeps the core
//! testable without capturing process-wide output. [`TracingObserver`] is the
//! production implementation and emits one leveled log line per event.

use crate::file_organizer::OrganizeError;

/// Receives one callback per entry processed.
pub trait OrganizeObserver {
    /// A directory entry was left alone.
    fn on_skip(&mut self, name: &str);

    /// A file was moved into `category`.
    fn on_move(&mut self, name: &str, category: &str);

    /// Moving a file failed; the run continues with the next entry.
    fn on_error(&mut self, name: &str, cause: &OrganizeError);

    /// Dry run only: a file would be moved into `category`.
    fn on_plan(&mut self, _name: &str, _category: &str) {}

    /// An entry matched an exclusion rule and was left in place.
    fn on_exclude(&mut self, _name: &str) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl OrganizeObserver for TracingObserver {
    fn on_skip(&mut self, name: &str) {
        tracing::debug!("Skipped directory: {}", name);
    }

    fn on_move(&mut self, name: &str, category: &str) {
        tracing::info!("Moved: {} to {}/", name, category);
    }

    fn on_error(&mut self, name: &str, cause: &OrganizeError) {
        tracing::error!("Could not organize {}: {}", name, cause);
    }

    fn on_plan(&mut self, name: &str, category: &str) {
        tracing::info!("Would move: {} to {}/", name, category);
    }

    fn on_exclude(&mut self, name: &str) {
        tracing::debug!("Excluded: {}", name);
    }
}
