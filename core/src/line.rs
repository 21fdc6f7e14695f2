/*
 * line.rs
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

//! Protocol line assembly. Directory responses are CRLF-delimited lines that
//! arrive fragmented however TCP pleases; some servers terminate with bare
//! LF. The reader peeks at the receive queue, consumes at most one line at a
//! time, and hands back lines normalized to CRLF.

use bytes::{Bytes, BytesMut};

use crate::error::Result;
use crate::net::NetStream;

/// How many bytes to peek at per probe of the receive queue.
pub(crate) const PEEK_WINDOW: usize = 200;

/// One received protocol line, terminator normalized to CRLF.
#[derive(Debug, Clone)]
pub struct Line {
    bytes: Bytes,
    bare_lf: bool,
    missing_terminator: bool,
}

impl Line {
    /// Raw bytes including the CRLF terminator.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Line content with the terminator stripped.
    pub fn content(&self) -> &[u8] {
        &self.bytes[..self.bytes.len() - 2]
    }

    /// Content decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.content()).to_string()
    }

    /// True if the server sent bare LF instead of CRLF.
    pub fn was_bare_lf(&self) -> bool {
        self.bare_lf
    }

    /// True if the stream closed before any terminator arrived; the CRLF on
    /// this line was supplied by the reader.
    pub fn missing_terminator(&self) -> bool {
        self.missing_terminator
    }

    /// True for the directory-ending line: a period alone.
    pub fn is_terminator(&self) -> bool {
        self.bytes() == b".\r\n"
    }

    /// True for a line with no usable content: empty, or a stray carriage
    /// return before any text.
    pub fn is_blank(&self) -> bool {
        self.content().first().map_or(true, |b| *b == b'\r')
    }
}

/// Reads protocol lines from a stream without ever consuming past a line
/// terminator. Bytes that belong to an unfinished line are moved into an
/// accumulator so a short peek window still handles lines of any length.
pub struct LineReader<'a, S: NetStream> {
    stream: &'a mut S,
    acc: BytesMut,
    eof: bool,
}

impl<'a, S: NetStream> LineReader<'a, S> {
    pub fn new(stream: &'a mut S) -> Self {
        Self {
            stream,
            acc: BytesMut::new(),
            eof: false,
        }
    }

    /// Next line, or `None` once the stream is drained. Blocks until a full
    /// line arrives or the peer closes.
    pub fn read_line(&mut self) -> Result<Option<Line>> {
        loop {
            if self.eof {
                return Ok(self.take_partial());
            }
            let mut window = [0u8; PEEK_WINDOW];
            let n = self.stream.peek(&mut window)?;
            if n == 0 {
                self.eof = true;
                return Ok(self.take_partial());
            }
            if let Some(pos) = window[..n].iter().position(|&b| b == b'\n') {
                self.consume(pos + 1)?;
                return Ok(Some(self.finish_line()));
            }
            // No terminator in sight; take what is queued and probe again.
            self.consume(n)?;
        }
    }

    /// Destructively reads exactly `n` bytes into the accumulator. The bytes
    /// were just seen by peek, so this cannot block.
    fn consume(&mut self, n: usize) -> Result<()> {
        let start = self.acc.len();
        self.acc.resize(start + n, 0);
        self.stream.read_exact(&mut self.acc[start..])?;
        Ok(())
    }

    /// The accumulator ends in LF; classify the terminator and normalize.
    fn finish_line(&mut self) -> Line {
        let mut raw = self.acc.split();
        let len = raw.len();
        let bare_lf = len < 2 || raw[len - 2] != b'\r';
        if bare_lf {
            raw.truncate(len - 1);
            raw.extend_from_slice(b"\r\n");
        }
        Line {
            bytes: raw.freeze(),
            bare_lf,
            missing_terminator: false,
        }
    }

    /// Stream closed mid-line: hand back what accumulated as a final line. A
    /// trailing CR is taken as the start of an incomplete terminator.
    fn take_partial(&mut self) -> Option<Line> {
        if self.acc.is_empty() {
            return None;
        }
        let mut raw = self.acc.split();
        if raw.last() == Some(&b'\r') {
            let len = raw.len();
            raw.truncate(len - 1);
        }
        raw.extend_from_slice(b"\r\n");
        Some(Line {
            bytes: raw.freeze(),
            bare_lf: false,
            missing_terminator: true,
        })
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use std::collections::VecDeque;
    use std::io::{self, Read, Write};

    use crate::net::NetStream;

    /// Scripted peer: data arrives in predefined bursts, like TCP segments
    /// landing in the receive queue. After the last burst the stream reports
    /// end of stream.
    pub(crate) struct FakeStream {
        arrivals: VecDeque<Vec<u8>>,
        queue: Vec<u8>,
        pub(crate) written: Vec<u8>,
    }

    impl FakeStream {
        pub(crate) fn new<I, B>(bursts: I) -> Self
        where
            I: IntoIterator<Item = B>,
            B: Into<Vec<u8>>,
        {
            FakeStream {
                arrivals: bursts.into_iter().map(Into::into).collect(),
                queue: Vec::new(),
                written: Vec::new(),
            }
        }

        fn fill(&mut self) {
            while self.queue.is_empty() {
                match self.arrivals.pop_front() {
                    Some(burst) => self.queue = burst,
                    None => break,
                }
            }
        }
    }

    impl Read for FakeStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.fill();
            if self.queue.is_empty() {
                return Ok(0);
            }
            let n = buf.len().min(self.queue.len());
            buf[..n].copy_from_slice(&self.queue[..n]);
            self.queue.drain(..n);
            Ok(n)
        }
    }

    impl Write for FakeStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl NetStream for FakeStream {
        fn peek(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.fill();
            if self.queue.is_empty() {
                return Ok(0);
            }
            let n = buf.len().min(self.queue.len());
            buf[..n].copy_from_slice(&self.queue[..n]);
            Ok(n)
        }
    }
}
