/*
 * net.rs
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

//! Blocking TCP connection helpers. Gopher is one request per connection,
//! plain sockets, no timeouts: connect, send a selector, read until the
//! server closes. Resolution is IPv4-only, first compatible address wins.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};

use log::{debug, error, warn};

use crate::error::{GopherError, Result};

/// Connection lifecycle of a gopherspace address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Disconnected,
    /// Resolution succeeded, TCP handshake in progress.
    Connecting,
    Connected,
}

/// Byte stream with non-destructive lookahead. `TcpStream` is the production
/// implementation; tests script their own.
pub trait NetStream: Read + Write {
    /// Reads into `buf` without consuming; blocks until at least one byte is
    /// available. Returns 0 only at end of stream.
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl NetStream for TcpStream {
    fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        TcpStream::peek(self, buf)
    }
}

/// Resolves `host` to the first IPv4 endpoint.
pub(crate) fn resolve(host: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = (host, port).to_socket_addrs().map_err(|e| {
        error!("name resolution failed for {}: {}", host, e);
        GopherError::Resolve {
            host: host.to_string(),
            source: e,
        }
    })?;
    match addrs.find(|a| a.is_ipv4()) {
        Some(a) => Ok(a),
        None => {
            error!("no compatible address for {}", host);
            Err(GopherError::NoCompatibleAddress {
                host: host.to_string(),
            })
        }
    }
}

/// Resolves and connects. Returns the live stream and the endpoint it is
/// connected to.
pub(crate) fn connect(host: &str, port: u16) -> Result<(TcpStream, SocketAddr)> {
    let endpoint = resolve(host, port)?;
    debug!("connecting to {} at {}", host, endpoint);
    let stream = TcpStream::connect(endpoint).map_err(|e| {
        error!("connect to {} failed: {}", endpoint, e);
        GopherError::Io(e)
    })?;
    Ok((stream, endpoint))
}

/// Gracefully closes a connection. A one-byte non-blocking peek probes
/// whether the peer already closed (Gopher servers hang up after sending a
/// response); if so the shutdown is skipped. Failures here are logged, never
/// escalated, since the descriptor is released either way.
pub(crate) fn disconnect(stream: &TcpStream) {
    if let Err(e) = stream.set_nonblocking(true) {
        warn!("disconnect: cannot probe peer state: {}", e);
    } else {
        let mut probe = [0u8; 1];
        if let Ok(0) = stream.peek(&mut probe) {
            debug!("peer already closed, skipping shutdown");
            return;
        }
    }
    if let Err(e) = stream.shutdown(Shutdown::Both) {
        if e.kind() != io::ErrorKind::NotConnected {
            warn!("disconnect: shutdown failed: {}", e);
        }
    }
}

/// Writes a protocol line: the text followed by CRLF, flushed.
pub(crate) fn write_line<S>(stream: &mut S, line: &str) -> io::Result<()>
where
    S: Write,
{
    stream.write_all(line.as_bytes())?;
    stream.write_all(b"\r\n")?;
    stream.flush()?;
    Ok(())
}
