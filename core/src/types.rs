/*
 * types.rs
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

//! Gopher item types (RFC 1436 section 3.8 plus common extensions).
//! The type is a single character: first byte of an item line, and first
//! character of the item path in a gopher URL.

use std::fmt;

/// Item type for a gopherspace entry. `Unknown` keeps the original code so
/// nothing is lost on re-serialization; `Internal` marks entries synthesized
/// by this library (parse-failure placeholders) that never came off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    /// `0` Plain text file.
    Text,
    /// `1` Directory listing.
    Dir,
    /// `2` CSO phone book server.
    Cso,
    /// `3` Error message.
    Error,
    /// `4` BinHexed Macintosh file.
    BinHex,
    /// `5` DOS binary archive.
    Dos,
    /// `6` Unix uuencoded file.
    Unix,
    /// `7` Full-text search server.
    Search,
    /// `8` Telnet session.
    Telnet,
    /// `9` Binary file.
    Binary,
    /// `+` Redundant (mirror) server.
    Mirror,
    /// `T` tn3270 session.
    Tn3270,
    /// `g` GIF image.
    Gif,
    /// `I` Image file (format unspecified).
    Image,
    /// `:` Bitmap image (Gopher+).
    Bitmap,
    /// `;` Movie file (Gopher+).
    Movie,
    /// `<` Sound file (Gopher+).
    Audio,
    /// `d` Word-processing document.
    Doc,
    /// `h` HTML document or hyperlink (`URL:` selector).
    Html,
    /// `i` Informational message (no resource behind it).
    Info,
    /// `p` PNG image.
    Png,
    /// `r` RTF document.
    Rtf,
    /// `s` WAV sound file.
    Wav,
    /// `P` PDF document.
    Pdf,
    /// `X` XML document.
    Xml,
    /// Synthesized by this library, never present on the wire.
    Internal,
    /// Unrecognized type code, preserved for display.
    Unknown(char),
}

impl ItemType {
    /// Maps a type code character to its item type.
    pub fn from_char(c: char) -> ItemType {
        match c {
            '0' => ItemType::Text,
            '1' => ItemType::Dir,
            '2' => ItemType::Cso,
            '3' => ItemType::Error,
            '4' => ItemType::BinHex,
            '5' => ItemType::Dos,
            '6' => ItemType::Unix,
            '7' => ItemType::Search,
            '8' => ItemType::Telnet,
            '9' => ItemType::Binary,
            '+' => ItemType::Mirror,
            'T' => ItemType::Tn3270,
            'g' => ItemType::Gif,
            'I' => ItemType::Image,
            ':' => ItemType::Bitmap,
            ';' => ItemType::Movie,
            '<' => ItemType::Audio,
            'd' => ItemType::Doc,
            'h' => ItemType::Html,
            'i' => ItemType::Info,
            'p' => ItemType::Png,
            'r' => ItemType::Rtf,
            's' => ItemType::Wav,
            'P' => ItemType::Pdf,
            'X' => ItemType::Xml,
            other => ItemType::Unknown(other),
        }
    }

    /// The wire code for this type. `Internal` has no wire form and yields `?`.
    pub fn code(&self) -> char {
        match self {
            ItemType::Text => '0',
            ItemType::Dir => '1',
            ItemType::Cso => '2',
            ItemType::Error => '3',
            ItemType::BinHex => '4',
            ItemType::Dos => '5',
            ItemType::Unix => '6',
            ItemType::Search => '7',
            ItemType::Telnet => '8',
            ItemType::Binary => '9',
            ItemType::Mirror => '+',
            ItemType::Tn3270 => 'T',
            ItemType::Gif => 'g',
            ItemType::Image => 'I',
            ItemType::Bitmap => ':',
            ItemType::Movie => ';',
            ItemType::Audio => '<',
            ItemType::Doc => 'd',
            ItemType::Html => 'h',
            ItemType::Info => 'i',
            ItemType::Png => 'p',
            ItemType::Rtf => 'r',
            ItemType::Wav => 's',
            ItemType::Pdf => 'P',
            ItemType::Xml => 'X',
            ItemType::Internal => '?',
            ItemType::Unknown(other) => *other,
        }
    }

    /// True for entries that are pure display rows (info and error lines);
    /// activating one fetches nothing.
    pub fn is_inline(&self) -> bool {
        matches!(self, ItemType::Info | ItemType::Error | ItemType::Internal)
    }

    /// True for directory listings.
    pub fn is_directory(&self) -> bool {
        matches!(self, ItemType::Dir)
    }

    /// True for entries answered with another directory request (directories
    /// and search servers).
    pub fn is_browsable(&self) -> bool {
        matches!(self, ItemType::Dir | ItemType::Search)
    }

    /// True for text-rendered documents.
    pub fn is_text_like(&self) -> bool {
        matches!(self, ItemType::Text | ItemType::Xml)
    }

    /// True for image files.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            ItemType::Gif | ItemType::Image | ItemType::Bitmap | ItemType::Png
        )
    }

    /// True for archive/executable-style binaries.
    pub fn is_binary_like(&self) -> bool {
        matches!(
            self,
            ItemType::BinHex | ItemType::Unix | ItemType::Dos | ItemType::Binary
        )
    }

    /// True for entries fetched as a raw file transfer (anything with file
    /// content behind it).
    pub fn is_download(&self) -> bool {
        self.is_text_like()
            || self.is_image()
            || self.is_binary_like()
            || matches!(
                self,
                ItemType::Movie
                    | ItemType::Audio
                    | ItemType::Wav
                    | ItemType::Doc
                    | ItemType::Rtf
                    | ItemType::Pdf
            )
    }

    /// True for entries handled outside gopherspace (web hyperlinks, telnet
    /// sessions).
    pub fn is_external_link(&self) -> bool {
        matches!(self, ItemType::Html | ItemType::Telnet | ItemType::Tn3270)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_roundtrip() {
        for c in "0123456789+TgI:;<dhiprsPX".chars() {
            let t = ItemType::from_char(c);
            assert!(!matches!(t, ItemType::Unknown(_)), "code {:?}", c);
            assert_eq!(t.code(), c);
        }
    }

    #[test]
    fn unknown_code_preserved() {
        let t = ItemType::from_char('z');
        assert_eq!(t, ItemType::Unknown('z'));
        assert_eq!(t.code(), 'z');
    }

    #[test]
    fn inline_types_are_not_downloads() {
        assert!(ItemType::Info.is_inline());
        assert!(ItemType::Error.is_inline());
        assert!(!ItemType::Info.is_download());
        assert!(!ItemType::Error.is_browsable());
    }

    #[test]
    fn categories() {
        assert!(ItemType::Dir.is_directory());
        assert!(ItemType::Dir.is_browsable());
        assert!(ItemType::Search.is_browsable());
        assert!(ItemType::Text.is_text_like());
        assert!(ItemType::Png.is_image());
        assert!(ItemType::Binary.is_binary_like());
        assert!(ItemType::Pdf.is_download());
        assert!(ItemType::Html.is_external_link());
        assert!(!ItemType::Dir.is_download());
    }
}
