/*
 * dir.rs
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

//! Directory requests. Sends a selector over a connected address, then
//! collects item lines until the lone-dot terminator and connection close.
//! Broken lines never abort the listing: they are repaired or replaced and
//! tallied, so a half-broken server still renders.

use log::{debug, warn};

use crate::addr::GopherAddr;
use crate::error::{GopherError, Result};
use crate::item::{parse_item_line, Item, ItemParse};
use crate::line::LineReader;
use crate::net::{self, NetStream};
use crate::types::ItemType;

/// A fetched directory listing: the address it came from, its entries in
/// source order, and a count of protocol defects tolerated while reading.
#[derive(Debug)]
pub struct Directory {
    addr: GopherAddr,
    items: Vec<Item>,
    err_count: u32,
}

impl Directory {
    /// Requests the directory behind `addr`, which must be connected. The
    /// selector line is sent, the response read to completion, and the
    /// connection closed; the returned directory owns the now-disconnected
    /// address. Only send/receive failures abort — protocol defects are
    /// tallied in `error_count` instead.
    pub fn request(mut addr: GopherAddr) -> Result<Directory> {
        let selector = addr.selector().unwrap_or("").to_string();
        let stream = match addr.stream_mut() {
            Some(s) => s,
            None => return Err(GopherError::NotConnected),
        };
        debug!("requesting selector {:?}", selector);
        net::write_line(stream, &selector)?;
        let mut reader = LineReader::new(stream);
        let (items, err_count) = collect_items(&mut reader)?;
        drop(reader);
        let _ = addr.disconnect();
        debug!(
            "directory received: {} items, {} errors",
            items.len(),
            err_count
        );
        Ok(Directory {
            addr,
            items,
            err_count,
        })
    }

    /// The address this directory was fetched from (disconnected).
    pub fn addr(&self) -> &GopherAddr {
        &self.addr
    }

    /// Entries in the order the server sent them.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_count(&self) -> usize {
        self.items.len()
    }

    /// Protocol defects tolerated while reading: blank lines, malformed or
    /// truncated entries, bare-LF terminators, a missing termination line.
    pub fn error_count(&self) -> u32 {
        self.err_count
    }

    pub fn to_url(&self) -> String {
        self.addr.to_url()
    }

    pub fn has_parent(&self) -> bool {
        self.addr.has_parent()
    }

    /// Address one level up from this directory, if any.
    pub fn parent(&self) -> Option<GopherAddr> {
        self.addr.parent()
    }

    #[cfg(test)]
    pub(crate) fn from_parts(addr: GopherAddr, items: Vec<Item>, err_count: u32) -> Self {
        Self {
            addr,
            items,
            err_count,
        }
    }
}

/// The receive loop. Reads every line until the stream closes; the lone-dot
/// line flips the terminator flag and produces nothing. Never fails on
/// content, only on I/O.
fn collect_items<S: NetStream>(reader: &mut LineReader<'_, S>) -> Result<(Vec<Item>, u32)> {
    let mut items = Vec::new();
    let mut err_count = 0u32;
    let mut terminator_seen = false;
    while let Some(line) = reader.read_line()? {
        if line.missing_terminator() {
            warn!("connection closed mid-line");
        }
        if line.was_bare_lf() {
            warn!("line terminated with bare LF");
            err_count += 1;
        }
        if line.is_terminator() {
            terminator_seen = true;
            continue;
        }
        if line.is_blank() {
            warn!("blank line in directory listing");
            err_count += 1;
            continue;
        }
        match parse_item_line(line.content()) {
            ItemParse::Item(item) => items.push(item),
            ItemParse::Incomplete { kind, label } => {
                warn!("item line without address fields: {:?}", label);
                err_count += 1;
                items.push(Item::new(kind, label, GopherAddr::sentinel(kind)));
            }
            ItemParse::Malformed => {
                let raw = line.text();
                warn!("unparsable directory line: {:?}", raw);
                err_count += 1;
                items.push(Item::new(
                    ItemType::Internal,
                    format!("PARSING FAILED: {}", raw),
                    GopherAddr::sentinel(ItemType::Internal),
                ));
            }
        }
    }
    if !terminator_seen {
        warn!("directory listing ended without terminator");
        err_count += 1;
    }
    Ok((items, err_count))
}
