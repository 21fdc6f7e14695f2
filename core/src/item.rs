/*
 * item.rs
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

//! Directory entries and the item-line parser. A well-formed line is
//! `<type><label>\t<selector>\t<host>\t<port>` (terminator already
//! stripped); real servers truncate and garble these, so parsing is lenient
//! where the original Gopher crowd was lenient.

use std::fmt;

use crate::addr::GopherAddr;
use crate::types::ItemType;

/// One entry of a directory listing. Always carries a target address; when
/// the source line named none, the enclosing directory substituted the
/// sentinel (see [`GopherAddr::sentinel`]).
#[derive(Debug)]
pub struct Item {
    kind: ItemType,
    label: String,
    addr: GopherAddr,
}

impl Item {
    pub(crate) fn new(kind: ItemType, label: String, addr: GopherAddr) -> Self {
        Self { kind, label, addr }
    }

    pub fn kind(&self) -> ItemType {
        self.kind
    }

    /// Display text for the entry.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The entry's target.
    pub fn addr(&self) -> &GopherAddr {
        &self.addr
    }

    /// URL of the target, typed with this entry's type code.
    pub fn to_url(&self) -> String {
        self.addr.to_url_as(self.kind)
    }

    /// True for placeholder entries standing in for lines the server sent
    /// broken.
    pub fn is_diagnostic(&self) -> bool {
        self.kind == ItemType::Internal || self.addr.is_diagnostic()
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}\t{}\t{}\t{}",
            self.kind.code(),
            self.label,
            self.addr.selector().unwrap_or(""),
            self.addr.host(),
            self.addr.port()
        )
    }
}

/// Outcome of parsing one directory line.
#[derive(Debug)]
pub(crate) enum ItemParse {
    /// All address fields present.
    Item(Item),
    /// Legacy lenient case: a label with no tab-separated fields after it.
    /// The caller substitutes the sentinel address and counts an error.
    Incomplete { kind: ItemType, label: String },
    /// Not interpretable as an entry, not even leniently.
    Malformed,
}

/// Parses one line of a directory response, without its terminator. The
/// termination line and anything starting with a stray CR are rejected; a
/// bare label is accepted as an incomplete legacy entry; a line that starts
/// fields but never names a host is malformed. An absent or unparsable port
/// becomes 0.
pub(crate) fn parse_item_line(content: &[u8]) -> ItemParse {
    if content.is_empty() || content == b"." || content[0] == b'\r' {
        return ItemParse::Malformed;
    }
    let text = String::from_utf8_lossy(content);
    let first = match text.chars().next() {
        Some(c) => c,
        None => return ItemParse::Malformed,
    };
    let kind = ItemType::from_char(first);
    let fields: Vec<&str> = text[first.len_utf8()..].split('\t').collect();
    match fields.len() {
        1 => ItemParse::Incomplete {
            kind,
            label: fields[0].to_string(),
        },
        2 => ItemParse::Malformed,
        _ => {
            let selector = if fields[1].is_empty() {
                None
            } else {
                Some(fields[1].to_string())
            };
            let port = fields
                .get(3)
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(0);
            let addr = GopherAddr::new(fields[2], port, selector, kind);
            ItemParse::Item(Item::new(kind, fields[0].to_string(), addr))
        }
    }
}
