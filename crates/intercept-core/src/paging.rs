//! Help-screen page cursor.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, Result};

/// Position within a fixed, non-empty set of pages, numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    count: usize,
    current: usize,
}

impl PageCursor {
    /// Opens a cursor on page 1.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingReference`] when there are no pages.
    pub fn new(count: usize) -> Result<Self> {
        if count == 0 {
            return Err(CoreError::MissingReference("help pages"));
        }
        Ok(Self { count, current: 1 })
    }

    /// Current page number.
    #[must_use]
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Total number of pages.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// On page 1.
    #[must_use]
    pub const fn is_first(&self) -> bool {
        self.current == 1
    }

    /// On the final page.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.current == self.count
    }

    /// Moves forward one page. Stays put on the last page.
    pub fn next_page(&mut self) -> usize {
        if self.is_last() {
            debug!(page = self.current, "already on last page");
        } else {
            self.current += 1;
        }
        self.current
    }

    /// Moves back one page. Stays put on the first page.
    pub fn previous_page(&mut self) -> usize {
        if self.is_first() {
            debug!(page = self.current, "already on first page");
        } else {
            self.current -= 1;
        }
        self.current
    }

    /// Jumps to `page`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidArgument`] unless `1 <= page <= count`.
    pub fn go_to(&mut self, page: usize) -> Result<()> {
        if !(1..=self.count).contains(&page) {
            return Err(CoreError::InvalidArgument(format!(
                "page {page} outside 1..={}",
                self.count
            )));
        }
        self.current = page;
        Ok(())
    }
}
