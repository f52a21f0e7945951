//! Style applicator port: receives the flat style table computed by the runtime.

use std::{cell::RefCell, rc::Rc};

use desktop_app_contract::StyleTable;

/// Host service pushing style variables to the rendering surface.
pub trait StyleApplicator {
    /// Replaces the active style variables with `styles`.
    fn apply_styles(&self, styles: &StyleTable);
}

#[derive(Debug, Clone, Copy, Default)]
/// Style applicator that discards every table.
pub struct NoopStyleApplicator;

impl StyleApplicator for NoopStyleApplicator {
    fn apply_styles(&self, _styles: &StyleTable) {}
}

#[derive(Debug, Clone, Default)]
/// Style applicator recording every applied table, for headless hosts and tests.
pub struct MemoryStyleApplicator {
    applied: Rc<RefCell<Vec<StyleTable>>>,
}

impl MemoryStyleApplicator {
    /// Returns the most recently applied table.
    pub fn current(&self) -> Option<StyleTable> {
        self.applied.borrow().last().cloned()
    }

    /// Returns how many tables have been applied.
    pub fn apply_count(&self) -> usize {
        self.applied.borrow().len()
    }
}

impl StyleApplicator for MemoryStyleApplicator {
    fn apply_styles(&self, styles: &StyleTable) {
        self.applied.borrow_mut().push(styles.clone());
    }
}
