//-
// Copyright (c) 2020, Jason Lingle
//
// This file is part of Mimemail.
//
// Mimemail is free software: you can redistribute it and/or modify it under the
// terms of the GNU General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later
// version.
//
// Mimemail is distributed in the hope that it will be useful, but WITHOUT ANY
// WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// Mimemail. If not, see <http://www.gnu.org/licenses/>.

use std::fmt;

/// The transfer encoding named in an encoded word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransferEncoding {
    /// `B`
    Base64,
    /// `Q`
    QuotedPrintable,
}

impl TransferEncoding {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            b'B' | b'b' => Some(TransferEncoding::Base64),
            b'Q' | b'q' => Some(TransferEncoding::QuotedPrintable),
            _ => None,
        }
    }
}

/// A syntactically valid RFC 2047 encoded word, borrowed from the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedWord<'a> {
    /// The charset, without any RFC 2231 language suffix.
    pub charset: &'a str,
    pub encoding: TransferEncoding,
    pub payload: &'a [u8],
}

/// One mailbox from an address list header.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Address {
    /// The decoded display name; empty if there was none.
    pub display_name: String,
    pub mailbox: String,
}

impl Address {
    pub fn new(
        display_name: impl Into<String>,
        mailbox: impl Into<String>,
    ) -> Self {
        Address {
            display_name: display_name.into(),
            mailbox: mailbox.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "<{}>", self.mailbox)
        } else {
            write!(
                f,
                "\"{}\" <{}>",
                self.display_name.replace('\\', "\\\\").replace('"', "\\\""),
                self.mailbox
            )
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn address_display() {
        assert_eq!(
            "\"Jörg \\\"JD\\\" Doe\" <joerg@example.com>",
            Address::new("Jörg \"JD\" Doe", "joerg@example.com").to_string()
        );
        assert_eq!(
            "<lacoste-dev@theplant.jp>",
            Address::new("", "lacoste-dev@theplant.jp").to_string()
        );
    }
}
