/*
 * history.rs
 * Copyright (C) 2026 Chris Burdess
 *
 * This file is part of Burrow, a cross-platform Gopher client.
 *
 * Burrow is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Burrow is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Burrow.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Browsing history: a linear, owned sequence of fetched directories with a
//! cursor. Pushing from anywhere but the tail discards the forward entries,
//! like every browser since Mosaic.

use log::debug;

use crate::addr::GopherAddr;
use crate::dir::Directory;
use crate::error::Result;

/// Ordered directory history. Exactly one entry is current (when non-empty);
/// navigation moves the cursor without refetching.
#[derive(Debug, Default)]
pub struct History {
    entries: Vec<Directory>,
    cursor: usize,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches `addr` and makes the result the new current entry, dropping
    /// any forward history. Connects the address first if the caller has not
    /// already done so. Works on an empty history.
    pub fn push(&mut self, mut addr: GopherAddr) -> Result<&Directory> {
        if !addr.is_connected() {
            addr.connect()?;
        }
        let dir = Directory::request(addr)?;
        Ok(self.insert(dir))
    }

    /// Appends a fetched directory after the cursor, discarding anything
    /// beyond it.
    pub(crate) fn insert(&mut self, dir: Directory) -> &Directory {
        if !self.entries.is_empty() {
            let dropped = self.entries.len() - (self.cursor + 1);
            if dropped > 0 {
                debug!("discarding {} forward history entries", dropped);
            }
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(dir);
        self.cursor = self.entries.len() - 1;
        &self.entries[self.cursor]
    }

    /// The current entry, if any.
    pub fn current(&self) -> Option<&Directory> {
        self.entries.get(self.cursor)
    }

    /// Steps back one entry and returns it; `None` (without moving) at the
    /// head.
    pub fn prev(&mut self) -> Option<&Directory> {
        if !self.has_prev() {
            return None;
        }
        self.cursor -= 1;
        self.current()
    }

    /// Steps forward one entry and returns it; `None` (without moving) at
    /// the tail.
    pub fn next(&mut self) -> Option<&Directory> {
        if !self.has_next() {
            return None;
        }
        self.cursor += 1;
        self.current()
    }

    pub fn has_prev(&self) -> bool {
        !self.entries.is_empty() && self.cursor > 0
    }

    pub fn has_next(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Zero-based cursor position, when non-empty.
    pub fn position(&self) -> Option<usize> {
        if self.entries.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    /// Drops every entry after the current one.
    pub fn truncate_forward(&mut self) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
    }

    /// Drops every entry before the current one.
    pub fn truncate_backward(&mut self) {
        if !self.entries.is_empty() {
            self.entries.drain(..self.cursor);
            self.cursor = 0;
        }
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemType;

    fn dir(selector: &str) -> Directory {
        let sel = if selector.is_empty() {
            None
        } else {
            Some(selector.to_string())
        };
        Directory::from_parts(
            GopherAddr::new("example.com", 70, sel, ItemType::Dir),
            Vec::new(),
            0,
        )
    }

    fn selector_of(d: &Directory) -> String {
        d.addr().selector().unwrap_or("").to_string()
    }

    #[test]
    fn empty_history() {
        let mut h = History::new();
        assert!(h.is_empty());
        assert!(h.current().is_none());
        assert!(h.prev().is_none());
        assert!(h.next().is_none());
        assert!(!h.has_prev());
        assert!(!h.has_next());
        assert_eq!(h.position(), None);
    }

    #[test]
    fn navigation_moves_cursor() {
        let mut h = History::new();
        h.insert(dir("/a"));
        h.insert(dir("/b"));
        assert_eq!(h.len(), 2);
        assert!(h.has_prev());
        assert!(!h.has_next());
        assert_eq!(selector_of(h.prev().unwrap()), "/a");
        assert!(h.has_next());
        assert!(!h.has_prev());
        assert_eq!(selector_of(h.next().unwrap()), "/b");
        assert_eq!(h.position(), Some(1));
    }

    #[test]
    fn prev_at_head_stays_put() {
        let mut h = History::new();
        h.insert(dir("/a"));
        assert!(h.prev().is_none());
        assert_eq!(h.position(), Some(0));
        assert!(h.next().is_none());
    }

    #[test]
    fn insert_after_prev_discards_forward_entries() {
        let mut h = History::new();
        h.insert(dir("/a"));
        h.insert(dir("/b"));
        h.prev();
        h.insert(dir("/c"));
        assert_eq!(h.len(), 2);
        assert!(!h.has_next());
        assert_eq!(selector_of(h.current().unwrap()), "/c");
        assert_eq!(selector_of(h.prev().unwrap()), "/a");
        assert_eq!(selector_of(h.next().unwrap()), "/c");
    }

    #[test]
    fn truncate_forward_from_middle() {
        let mut h = History::new();
        h.insert(dir("/a"));
        h.insert(dir("/b"));
        h.insert(dir("/c"));
        h.prev();
        h.prev();
        h.truncate_forward();
        assert_eq!(h.len(), 1);
        assert_eq!(selector_of(h.current().unwrap()), "/a");
        assert!(!h.has_next());
    }

    #[test]
    fn truncate_backward_from_middle() {
        let mut h = History::new();
        h.insert(dir("/a"));
        h.insert(dir("/b"));
        h.insert(dir("/c"));
        h.prev();
        h.truncate_backward();
        assert_eq!(h.len(), 2);
        assert_eq!(h.position(), Some(0));
        assert_eq!(selector_of(h.current().unwrap()), "/b");
        assert!(h.has_next());
        assert!(!h.has_prev());
    }

    #[test]
    fn clear_empties_everything() {
        let mut h = History::new();
        h.insert(dir("/a"));
        h.clear();
        assert!(h.is_empty());
        assert!(h.current().is_none());
        assert_eq!(h.position(), None);
    }
}
