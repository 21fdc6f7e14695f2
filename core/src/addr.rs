/*
 * addr.rs
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

//! Gopherspace addresses: host, port, selector, and type hint, plus the
//! connection they own while active. URLs follow RFC 4266 with the scheme
//! prefix optional on input and mandatory on output (gopher://host:port/
//! then type character and selector).

use std::fmt;
use std::net::{SocketAddr, TcpStream};

use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{GopherError, Result};
use crate::net::{self, ConnState};
use crate::types::ItemType;

/// Port used when a URL does not carry one.
pub const DEFAULT_PORT: u16 = 70;

/// Host of the sentinel address substituted for items whose source line had
/// no address fields.
pub const SENTINEL_HOST: &str = "invalid.host";

/// Selector of the sentinel address.
pub const SENTINEL_SELECTOR: &str = "<invalid>";

/// Selector safe set for URL output: keep `/` literal so slash-rooted
/// selectors read naturally; encode space, `%`, angle brackets (the sentinel
/// selector carries them), and URL metacharacters.
const SELECTOR: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'%')
    .add(b'?')
    .add(b'#')
    .add(b'[')
    .add(b']')
    .add(b'@')
    .add(b'<')
    .add(b'>');

/// A gopherspace address. Identity is host, port, selector, and type hint;
/// a connected address additionally owns the live socket and its resolved
/// endpoint. Equality compares identity only, never connection state.
#[derive(Debug)]
pub struct GopherAddr {
    host: String,
    port: u16,
    selector: Option<String>,
    kind: ItemType,
    diagnostic: bool,
    state: ConnState,
    stream: Option<TcpStream>,
    endpoint: Option<SocketAddr>,
}

impl GopherAddr {
    /// Builds an address from its components. `None` selector means the
    /// server root.
    pub fn new(
        host: impl Into<String>,
        port: u16,
        selector: Option<String>,
        kind: ItemType,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            selector,
            kind,
            diagnostic: false,
            state: ConnState::Disconnected,
            stream: None,
            endpoint: None,
        }
    }

    /// The placeholder address carried by items whose source line was too
    /// truncated to name a target. Distinguished by an explicit flag, not by
    /// its port, so a genuine port 0 stays representable.
    pub fn sentinel(kind: ItemType) -> Self {
        let mut addr = Self::new(
            SENTINEL_HOST,
            0,
            Some(SENTINEL_SELECTOR.to_string()),
            kind,
        );
        addr.diagnostic = true;
        addr
    }

    /// Parses a gopher URL with the standard default port.
    pub fn parse(url: &str) -> Result<Self> {
        Self::parse_with_port(url, DEFAULT_PORT)
    }

    /// Parses a gopher URL. The `gopher://` prefix is optional; any other
    /// scheme is an error. Missing ports fall back to `default_port`, and a
    /// missing or empty item path means the server root. The first character
    /// of the item path is the entry type, the rest is the selector
    /// (percent-escapes decoded).
    pub fn parse_with_port(url: &str, default_port: u16) -> Result<Self> {
        // Scheme, if any.
        let rest = match url.find("://") {
            Some(idx) => {
                if !url[..idx].eq_ignore_ascii_case("gopher") {
                    return Err(GopherError::InvalidUrl(url.to_string()));
                }
                &url[idx + 3..]
            }
            None => url,
        };

        // Host runs to the first port or path delimiter.
        let host_end = rest.find([':', '/']).unwrap_or(rest.len());
        let host = &rest[..host_end];
        if host.is_empty() {
            return Err(GopherError::InvalidUrl(url.to_string()));
        }
        let mut after = &rest[host_end..];

        // Optional numeric port; anything unparsable degrades to the default.
        let mut port = default_port;
        if let Some(stripped) = after.strip_prefix(':') {
            let port_end = stripped.find('/').unwrap_or(stripped.len());
            if let Ok(p) = stripped[..port_end].parse::<u16>() {
                port = p;
            }
            after = &stripped[port_end..];
        }

        // Item path: type character followed by the selector.
        let mut kind = ItemType::Unknown('?');
        let mut selector = None;
        if let Some(item_path) = after.strip_prefix('/') {
            if let Some(c) = item_path.chars().next() {
                kind = ItemType::from_char(c);
                let sel = &item_path[c.len_utf8()..];
                if !sel.is_empty() && sel != "/" {
                    selector = Some(
                        percent_decode_str(sel).decode_utf8_lossy().into_owned(),
                    );
                }
            }
        }

        Ok(Self::new(host, port, selector, kind))
    }

    /// Renders this address as a gopher URL using its own type hint.
    pub fn to_url(&self) -> String {
        self.to_url_as(self.kind)
    }

    /// Renders this address as a gopher URL with an explicit entry type. The
    /// port is always spelled out. Without a selector the URL is just the
    /// authority and a trailing slash; with one, the type character comes
    /// first (`Unknown`/`Internal` are written as the directory type so the
    /// output is always valid RFC 4266).
    pub fn to_url_as(&self, kind: ItemType) -> String {
        let mut url = format!("gopher://{}:{}/", self.host, self.port);
        if let Some(sel) = &self.selector {
            let code = match kind {
                ItemType::Unknown(_) | ItemType::Internal => ItemType::Dir.code(),
                k => k.code(),
            };
            url.push(code);
            url.push_str(&utf8_percent_encode(sel, SELECTOR).to_string());
        }
        url
    }

    /// True if `parent` would yield an address.
    pub fn has_parent(&self) -> bool {
        match &self.selector {
            Some(sel) => !sel.trim_end_matches('/').is_empty(),
            None => false,
        }
    }

    /// The address one selector path segment up, always typed as a
    /// directory. A single-segment selector yields the server root; the root
    /// itself has no parent.
    pub fn parent(&self) -> Option<GopherAddr> {
        let sel = self.selector.as_deref()?.trim_end_matches('/');
        if sel.is_empty() {
            return None;
        }
        let parent_selector = match sel.rfind('/') {
            Some(0) | None => None,
            Some(idx) => Some(sel[..idx].to_string()),
        };
        Some(Self::new(
            self.host.clone(),
            self.port,
            parent_selector,
            ItemType::Dir,
        ))
    }

    /// An owned, disconnected copy of the identity fields.
    pub fn replicate(&self) -> GopherAddr {
        let mut copy = Self::new(
            self.host.clone(),
            self.port,
            self.selector.clone(),
            self.kind,
        );
        copy.diagnostic = self.diagnostic;
        copy
    }

    /// For HTML entries using the `URL:` selector convention, the embedded
    /// hyperlink target.
    pub fn link_url(&self) -> Option<&str> {
        if self.kind != ItemType::Html {
            return None;
        }
        self.selector.as_deref()?.strip_prefix("URL:")
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }

    pub fn kind(&self) -> ItemType {
        self.kind
    }

    /// True for sentinel addresses synthesized by the directory parser.
    pub fn is_diagnostic(&self) -> bool {
        self.diagnostic
    }

    pub fn state(&self) -> ConnState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnState::Connected
    }

    /// The resolved endpoint, present only while connected.
    pub fn endpoint(&self) -> Option<SocketAddr> {
        self.endpoint
    }

    /// Resolves the host and opens the connection. On failure the address
    /// stays disconnected and the cause is returned.
    pub fn connect(&mut self) -> Result<()> {
        if self.state == ConnState::Connected {
            return Err(GopherError::AlreadyConnected);
        }
        self.state = ConnState::Connecting;
        match net::connect(&self.host, self.port) {
            Ok((stream, endpoint)) => {
                debug!("connected to {} at {}", self.host, endpoint);
                self.stream = Some(stream);
                self.endpoint = Some(endpoint);
                self.state = ConnState::Connected;
                Ok(())
            }
            Err(e) => {
                self.state = ConnState::Disconnected;
                Err(e)
            }
        }
    }

    /// Closes the connection gracefully. Shutdown problems are logged, never
    /// returned; the socket is released regardless.
    pub fn disconnect(&mut self) -> Result<()> {
        match self.stream.take() {
            Some(stream) => {
                net::disconnect(&stream);
                self.endpoint = None;
                self.state = ConnState::Disconnected;
                Ok(())
            }
            None => Err(GopherError::NotConnected),
        }
    }

    /// Mutable access to the live socket for request/transfer loops.
    pub(crate) fn stream_mut(&mut self) -> Option<&mut TcpStream> {
        self.stream.as_mut()
    }
}

impl PartialEq for GopherAddr {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
            && self.port == other.port
            && self.selector == other.selector
            && self.kind == other.kind
            && self.diagnostic == other.diagnostic
    }
}

impl Eq for GopherAddr {}

impl fmt::Display for GopherAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Some(sel) => write!(f, "{} [{}] {}", self.host, self.port, sel),
            None => write!(f, "{} [{}]", self.host, self.port),
        }
    }
}

impl Drop for GopherAddr {
    fn drop(&mut self) {
        if self.stream.is_some() {
            let _ = self.disconnect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(url: &str) -> GopherAddr {
        GopherAddr::parse(url).unwrap()
    }

    #[test]
    fn parse_without_selector() {
        for url in [
            "gopher://g.test.com/",
            "gopher://g.test.com",
            "gopher://g.test.com:70/",
            "gopher://g.test.com:70",
            "g.test.com/",
            "g.test.com",
            "g.test.com:70/",
            "g.test.com:70",
        ] {
            let a = parsed(url);
            assert_eq!(a.host(), "g.test.com", "{}", url);
            assert_eq!(a.port(), 70, "{}", url);
            assert_eq!(a.selector(), None, "{}", url);
            assert_eq!(a.kind(), ItemType::Unknown('?'), "{}", url);
        }
    }

    #[test]
    fn parse_root_directory() {
        for url in [
            "gopher://g.test.com/1/",
            "gopher://g.test.com:70/1/",
            "gopher://g.test.com/1",
            "gopher://g.test.com:70/1",
            "g.test.com/1/",
            "g.test.com/1",
        ] {
            let a = parsed(url);
            assert_eq!(a.selector(), None, "{}", url);
            assert_eq!(a.kind(), ItemType::Dir, "{}", url);
        }
    }

    #[test]
    fn parse_slash_selector() {
        let a = parsed("gopher://g.test.com/1/testdir");
        assert_eq!(a.selector(), Some("/testdir"));
        assert_eq!(a.kind(), ItemType::Dir);
        let b = parsed("g.test.com:70/0/testdir/testfile.txt");
        assert_eq!(b.selector(), Some("/testdir/testfile.txt"));
        assert_eq!(b.kind(), ItemType::Text);
    }

    #[test]
    fn parse_legacy_selector() {
        let a = parsed("gopher://g.test.com/1testdir");
        assert_eq!(a.selector(), Some("testdir"));
        assert_eq!(a.kind(), ItemType::Dir);
        let b = parsed("g.test.com/0testdir/testfile.txt");
        assert_eq!(b.selector(), Some("testdir/testfile.txt"));
        assert_eq!(b.kind(), ItemType::Text);
    }

    #[test]
    fn parse_rejects_foreign_scheme() {
        for url in ["http://g.test.com/", "ftp://g.test.com/", "://host/"] {
            assert!(
                matches!(GopherAddr::parse(url), Err(GopherError::InvalidUrl(_))),
                "{}",
                url
            );
        }
    }

    #[test]
    fn parse_rejects_empty_host() {
        for url in ["", "gopher://", "gopher:///1/foo", ":70/"] {
            assert!(GopherAddr::parse(url).is_err(), "{}", url);
        }
    }

    #[test]
    fn parse_port_degrades_gracefully() {
        assert_eq!(parsed("g.test.com:7070/1/x").port(), 7070);
        assert_eq!(parsed("g.test.com:abc/1/x").port(), 70);
        assert_eq!(parsed("g.test.com:99999/1/x").port(), 70);
        assert_eq!(
            GopherAddr::parse_with_port("g.test.com", 7070).unwrap().port(),
            7070
        );
    }

    #[test]
    fn parse_decodes_percent_escapes() {
        let a = parsed("gopher://g.test.com/0/with%20space.txt");
        assert_eq!(a.selector(), Some("/with space.txt"));
    }

    #[test]
    fn url_generation_matches_canonical_forms() {
        let cases = [
            ("gopher://g.test.com/", "gopher://g.test.com:70/"),
            ("gopher://g.test.com:70", "gopher://g.test.com:70/"),
            ("gopher://g.test.com/1/", "gopher://g.test.com:70/"),
            ("gopher://g.test.com/1", "gopher://g.test.com:70/"),
            (
                "gopher://g.test.com/1/testdir",
                "gopher://g.test.com:70/1/testdir",
            ),
            (
                "gopher://g.test.com:70/0/testdir/testfile.txt",
                "gopher://g.test.com:70/0/testdir/testfile.txt",
            ),
            ("gopher://g.test.com/1testdir", "gopher://g.test.com:70/1testdir"),
            (
                "g.test.com/0testdir/testfile.txt",
                "gopher://g.test.com:70/0testdir/testfile.txt",
            ),
        ];
        for (input, expected) in cases {
            assert_eq!(parsed(input).to_url(), expected, "{}", input);
        }
    }

    #[test]
    fn to_url_substitutes_directory_for_unknown() {
        let a = GopherAddr::new(
            "g.test.com",
            70,
            Some("sel".to_string()),
            ItemType::Unknown('z'),
        );
        assert_eq!(a.to_url(), "gopher://g.test.com:70/1sel");
        assert_eq!(
            a.to_url_as(ItemType::Internal),
            "gopher://g.test.com:70/1sel"
        );
        assert_eq!(a.to_url_as(ItemType::Text), "gopher://g.test.com:70/0sel");
    }

    #[test]
    fn to_url_percent_encodes_selector() {
        let a = GopherAddr::new(
            "g.test.com",
            70,
            Some("/with space.txt".to_string()),
            ItemType::Text,
        );
        assert_eq!(a.to_url(), "gopher://g.test.com:70/0/with%20space.txt");
    }

    #[test]
    fn to_url_encodes_sentinel_selector() {
        let s = GopherAddr::sentinel(ItemType::Info);
        assert_eq!(s.to_url(), "gopher://invalid.host:0/i%3Cinvalid%3E");
        let back = GopherAddr::parse(&s.to_url()).unwrap();
        assert_eq!(back.selector(), Some("<invalid>"));
    }

    #[test]
    fn url_round_trip() {
        for url in [
            "gopher://g.test.com:70/",
            "gopher://g.test.com:70/1/testdir",
            "gopher://g.test.com:7070/0/testdir/testfile.txt",
            "gopher://g.test.com:70/1testdir",
            "gopher://g.test.com:70/0/with%20space.txt",
        ] {
            let a = parsed(url);
            let b = GopherAddr::parse(&a.to_url()).unwrap();
            assert_eq!(a, b, "{}", url);
        }
    }

    #[test]
    fn parent_walks_selector_segments() {
        let a = parsed("gopher://h/1/docs/rfc");
        let p = a.parent().unwrap();
        assert_eq!(p.selector(), Some("/docs"));
        assert_eq!(p.kind(), ItemType::Dir);
        let pp = p.parent().unwrap();
        assert_eq!(pp.selector(), None);
        assert!(pp.parent().is_none());
        assert!(!pp.has_parent());
    }

    #[test]
    fn parent_of_legacy_selector() {
        let a = parsed("gopher://h/1docs/rfc");
        let p = a.parent().unwrap();
        assert_eq!(p.selector(), Some("docs"));
        let root = p.parent().unwrap();
        assert_eq!(root.selector(), None);
    }

    #[test]
    fn parent_ignores_trailing_slash() {
        let a = GopherAddr::new("h", 70, Some("/a/b/".to_string()), ItemType::Dir);
        assert_eq!(a.parent().unwrap().selector(), Some("/a"));
    }

    #[test]
    fn replicate_copies_identity() {
        let a = parsed("gopher://g.test.com:7070/1/testdir");
        let b = a.replicate();
        assert_eq!(a, b);
        assert!(!b.is_connected());
    }

    #[test]
    fn sentinel_is_flagged_not_port_zero() {
        let s = GopherAddr::sentinel(ItemType::Info);
        assert!(s.is_diagnostic());
        assert_eq!(s.port(), 0);
        assert_eq!(s.host(), SENTINEL_HOST);
        // a legitimate port 0 is not diagnostic
        let a = GopherAddr::new("h", 0, None, ItemType::Dir);
        assert!(!a.is_diagnostic());
        assert_ne!(a, s);
    }

    #[test]
    fn link_url_extraction() {
        let h = GopherAddr::new(
            "h",
            70,
            Some("URL:http://example.com/".to_string()),
            ItemType::Html,
        );
        assert_eq!(h.link_url(), Some("http://example.com/"));
        let plain = GopherAddr::new("h", 70, Some("/doc".to_string()), ItemType::Html);
        assert_eq!(plain.link_url(), None);
        let text = GopherAddr::new(
            "h",
            70,
            Some("URL:http://example.com/".to_string()),
            ItemType::Text,
        );
        assert_eq!(text.link_url(), None);
    }

    #[test]
    fn display_shows_host_port_selector() {
        let a = parsed("gopher://g.test.com/1/testdir");
        assert_eq!(a.to_string(), "g.test.com [70] /testdir");
        let root = parsed("gopher://g.test.com/");
        assert_eq!(root.to_string(), "g.test.com [70]");
    }

    #[test]
    fn connect_lifecycle_on_loopback() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = std::thread::spawn(move || {
            let (sock, _) = listener.accept().unwrap();
            drop(sock);
        });
        let mut a = GopherAddr::new("127.0.0.1", port, None, ItemType::Dir);
        assert_eq!(a.state(), ConnState::Disconnected);
        a.connect().unwrap();
        assert!(a.is_connected());
        assert!(a.endpoint().is_some());
        assert!(matches!(a.connect(), Err(GopherError::AlreadyConnected)));
        handle.join().unwrap();
        a.disconnect().unwrap();
        assert!(!a.is_connected());
        assert!(a.endpoint().is_none());
        assert!(matches!(a.disconnect(), Err(GopherError::NotConnected)));
    }
}
