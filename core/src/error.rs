/*
 * error.rs
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

//! Error types. Environmental failures (resolution, sockets, files) surface
//! here; protocol non-conformance from servers does not — malformed
//! directory lines are repaired in place and tallied on the Directory.

use std::io;
use thiserror::Error;

/// Error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum GopherError {
    /// URL text that cannot be interpreted as a gopherspace address.
    #[error("invalid gopher URL: {0}")]
    InvalidUrl(String),

    /// Host name resolution failed.
    #[error("cannot resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: io::Error,
    },

    /// The host resolved, but to no address family we can use.
    #[error("no compatible address for {host}")]
    NoCompatibleAddress { host: String },

    /// Operation requires a connected address.
    #[error("address is not connected")]
    NotConnected,

    /// Connect on an address that already has a live connection.
    #[error("address is already connected")]
    AlreadyConnected,

    /// An error originating from socket or file I/O.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience `Result` alias using [`GopherError`].
pub type Result<T> = std::result::Result<T, GopherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_converts() {
        fn fails() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))?;
            Ok(())
        }
        match fails() {
            Err(GopherError::Io(_)) => {}
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn display_includes_host() {
        let e = GopherError::NoCompatibleAddress {
            host: "example.com".into(),
        };
        assert!(e.to_string().contains("example.com"));
    }
}
