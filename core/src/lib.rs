/*
 * lib.rs
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

//! Client-side Gopher protocol engine, RFC 1436 with RFC 4266 URLs.
//!
//! The crate models addresses ([`GopherAddr`]), fetches and parses menus
//! ([`Directory`]), keeps a browsing [`History`], and saves files to disk
//! ([`FileDownload`]). All I/O is blocking; one request, one connection, as
//! the protocol demands. Servers are assumed careless with RFC 1436:
//! truncated lines, bare-LF terminators and unparsable entries are repaired
//! and counted, never fatal.

pub mod addr;
pub mod dir;
pub mod download;
pub mod error;
pub mod history;
pub mod item;
mod line;
mod net;
pub mod types;

pub use addr::{GopherAddr, DEFAULT_PORT, SENTINEL_HOST, SENTINEL_SELECTOR};
pub use dir::Directory;
pub use download::FileDownload;
pub use error::{GopherError, Result};
pub use history::History;
pub use item::Item;
pub use net::ConnState;
pub use types::ItemType;

/// Library version, from the crate manifest.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
