/*
 * download.rs
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

//! Raw file transfer. The server's response bytes are copied to disk
//! unmodified, whatever the item type claims they are; the transfer is over
//! when the server closes the connection.

use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::addr::GopherAddr;
use crate::error::{GopherError, Result};
use crate::net::{self, NetStream};
use crate::types::ItemType;

const CHUNK_SIZE: usize = 4096;

/// A single file retrieval: one address, one destination path, one request.
pub struct FileDownload {
    addr: GopherAddr,
    kind: ItemType,
    path: PathBuf,
    bytes: u64,
    progress: Option<Box<dyn FnMut(u64) + Send>>,
}

impl FileDownload {
    /// Prepares a download of `addr` to an explicit destination path.
    pub fn setup(addr: GopherAddr, kind: ItemType, path: impl Into<PathBuf>) -> Self {
        Self {
            addr,
            kind,
            path: path.into(),
            bytes: 0,
            progress: None,
        }
    }

    /// Prepares a download into the system temporary directory, deriving the
    /// file name from the selector.
    pub fn setup_temp(addr: GopherAddr, kind: ItemType) -> Self {
        let name = basename_for(addr.selector(), kind);
        let path = std::env::temp_dir().join(name);
        Self::setup(addr, kind, path)
    }

    /// One-shot retrieval: set up (to `path`, or into the temp directory when
    /// `None`) and run the transfer, returning the completed download.
    pub fn fetch(addr: GopherAddr, kind: ItemType, path: Option<PathBuf>) -> Result<FileDownload> {
        let mut dl = match path {
            Some(p) => Self::setup(addr, kind, p),
            None => Self::setup_temp(addr, kind),
        };
        dl.download()?;
        Ok(dl)
    }

    /// Installs a progress callback, invoked with the cumulative byte count
    /// after each chunk is written.
    pub fn set_progress<F>(&mut self, callback: F)
    where
        F: FnMut(u64) + Send + 'static,
    {
        self.progress = Some(Box::new(callback));
    }

    /// Runs the transfer to completion and returns the number of bytes
    /// written. Connects first if the address is not already connected; the
    /// connection is closed afterwards either way.
    pub fn download(&mut self) -> Result<u64> {
        if !self.addr.is_connected() {
            self.addr.connect()?;
        }
        if self.kind.is_directory() {
            debug!("saving directory listing {} as raw text", self.addr);
        }
        let selector = self.addr.selector().unwrap_or("").to_string();
        info!("downloading {} to {}", self.addr, self.path.display());
        let mut file = File::create(&self.path)?;
        self.bytes = 0;
        let outcome = match self.addr.stream_mut() {
            Some(stream) => Self::transfer(
                stream,
                &selector,
                &mut file,
                &mut self.bytes,
                &mut self.progress,
            ),
            None => Err(GopherError::NotConnected),
        };
        let _ = self.addr.disconnect();
        outcome?;
        file.flush()?;
        info!("downloaded {} bytes to {}", self.bytes, self.path.display());
        Ok(self.bytes)
    }

    fn transfer<S, W>(
        stream: &mut S,
        selector: &str,
        sink: &mut W,
        bytes: &mut u64,
        progress: &mut Option<Box<dyn FnMut(u64) + Send>>,
    ) -> Result<()>
    where
        S: NetStream,
        W: Write,
    {
        net::write_line(stream, selector)?;
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = stream.read(&mut buf)?;
            if n == 0 {
                return Ok(());
            }
            sink.write_all(&buf[..n])?;
            *bytes += n as u64;
            if let Some(callback) = progress.as_mut() {
                callback(*bytes);
            }
        }
    }

    pub fn addr(&self) -> &GopherAddr {
        &self.addr
    }

    pub fn kind(&self) -> ItemType {
        self.kind
    }

    /// Destination path on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written so far (the final size once `download` returns).
    pub fn size(&self) -> u64 {
        self.bytes
    }
}

impl fmt::Debug for FileDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileDownload")
            .field("addr", &self.addr)
            .field("kind", &self.kind)
            .field("path", &self.path)
            .field("bytes", &self.bytes)
            .finish()
    }
}

/// Derives a safe local file name from the last selector segment, falling
/// back to a generic name and tacking `.txt` onto bare text items.
pub(crate) fn basename_for(selector: Option<&str>, kind: ItemType) -> String {
    let base = selector
        .map(|s| s.trim_end_matches('/'))
        .and_then(|s| s.rsplit('/').next())
        .filter(|s| !s.is_empty())
        .unwrap_or("download");
    let mut name: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if kind.is_text_like() && !name.contains('.') {
        name.push_str(".txt");
    }
    name
}
