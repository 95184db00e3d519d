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

//! Parsing of address list header fields such as `From`, `To` and `Cc`.
//!
//! This is deliberately much more lenient than the RFC 5322 grammar. The
//! value is split into units at top-level commas; each unit is either a bare
//! addr-spec or a display phrase followed by an angle-addr. Anything else a
//! unit contains is carried along rather than rejected. The only errors are
//! constructs left open at the end of the value.

use std::mem;

use log::debug;

use super::charset::CharsetTranscoder;
use super::encoded_word::decode_encoded_words_with;
use super::header_block::HeaderFields;
use super::model::Address;
use crate::support::decoder_config::DecoderConfig;
use crate::support::error::Error;

/// Parse the address list in the first field of `fields` named `key`.
pub fn address_list<T: CharsetTranscoder>(
    fields: &HeaderFields,
    key: &str,
    transcoder: T,
) -> Result<Vec<Address>, Error> {
    address_list_with(fields, key, transcoder, &DecoderConfig::default())
}

pub fn address_list_with<T: CharsetTranscoder>(
    fields: &HeaderFields,
    key: &str,
    transcoder: T,
    config: &DecoderConfig,
) -> Result<Vec<Address>, Error> {
    let value = fields
        .get(key)
        .ok_or_else(|| Error::HeaderMissing(key.to_owned()))?;
    parse_address_list(value, transcoder, config)
}

/// Parse an unfolded address list header value.
///
/// Display names have their encoded words decoded according to `config`.
/// On `Error::AddressSyntax`, `position` is the byte offset within `value`
/// of the construct left unterminated.
pub fn parse_address_list<T: CharsetTranscoder>(
    value: &[u8],
    transcoder: T,
    config: &DecoderConfig,
) -> Result<Vec<Address>, Error> {
    let mut cxt = ParserContext::default();
    let mut addresses = Vec::new();

    for (pos, &b) in value.iter().enumerate() {
        if cxt.feed(pos, b) {
            cxt.finish_unit(&mut addresses, &transcoder, config)?;
        }
    }

    let unterminated = if cxt.in_quote {
        Some((cxt.quote_start, "unterminated quoted string"))
    } else if cxt.comment_depth > 0 {
        Some((cxt.comment_start, "unterminated comment"))
    } else if cxt.in_angle {
        Some((cxt.angle_start, "unterminated angle-addr"))
    } else {
        None
    };

    if let Some((position, reason)) = unterminated {
        return Err(Error::AddressSyntax {
            position,
            reason,
            parsed: addresses,
        });
    }

    cxt.finish_unit(&mut addresses, &transcoder, config)?;
    Ok(addresses)
}

/// Scanner state for one call to `parse_address_list`.
#[derive(Debug, Default)]
struct ParserContext {
    /// The display phrase of the current unit: quotes stripped, escapes
    /// resolved, comments dropped, unquoted whitespace collapsed.
    phrase: Vec<u8>,
    /// Whether unquoted whitespace or a comment separates the phrase so far
    /// from whatever comes next.
    phrase_space: bool,
    /// The raw text of the current unit outside of comments, used as the
    /// mailbox if there is no angle-addr.
    addr_spec: Vec<u8>,
    /// The content of the angle-addr, once one has been opened.
    angle: Option<Vec<u8>>,

    in_angle: bool,
    in_quote: bool,
    escaped: bool,
    comment_depth: u32,
    in_group: bool,

    quote_start: usize,
    comment_start: usize,
    angle_start: usize,
}

impl ParserContext {
    /// Consume one byte. Returns true if it ends the current unit.
    fn feed(&mut self, pos: usize, b: u8) -> bool {
        if self.escaped {
            self.escaped = false;
            if 0 == self.comment_depth {
                self.push_quoted(b);
            }
            return false;
        }

        if self.comment_depth > 0 {
            match b {
                b'\\' => self.escaped = true,
                b'(' => self.comment_depth += 1,
                b')' => self.comment_depth -= 1,
                _ => (),
            }
            return false;
        }

        if self.in_quote {
            match b {
                b'\\' => {
                    self.escaped = true;
                    self.push_raw(b);
                },
                b'"' => {
                    self.in_quote = false;
                    self.push_raw(b);
                },
                _ => self.push_quoted(b),
            }
            return false;
        }

        match b {
            b'(' => {
                self.comment_depth = 1;
                self.comment_start = pos;
                self.separate_phrase();
            },

            b'"' => {
                self.in_quote = true;
                self.quote_start = pos;
                self.push_raw(b);
            },

            b'<' if self.angle.is_none() => {
                self.in_angle = true;
                self.angle_start = pos;
                self.angle = Some(Vec::new());
            },

            b'>' if self.in_angle => self.in_angle = false,

            b',' if !self.in_angle => return true,

            // The phrase so far was a group name
            b':' if !self.in_angle && !self.in_group => {
                self.in_group = true;
                self.phrase.clear();
                self.phrase_space = false;
                self.addr_spec.clear();
            },

            b';' if !self.in_angle && self.in_group => {
                self.in_group = false;
                return true;
            },

            b' ' | b'\t' | b'\r' | b'\n' => {
                self.push_raw(b);
                self.separate_phrase();
            },

            _ => {
                self.push_raw(b);
                self.push_phrase(b);
            },
        }

        false
    }

    /// Record a byte of the unit's raw text.
    fn push_raw(&mut self, b: u8) {
        if self.in_angle {
            if let Some(ref mut angle) = self.angle {
                angle.push(b);
            }
        } else if self.angle.is_none() {
            self.addr_spec.push(b);
        }
    }

    fn push_quoted(&mut self, b: u8) {
        self.push_raw(b);
        self.push_phrase(b);
    }

    fn push_phrase(&mut self, b: u8) {
        if self.angle.is_some() {
            return;
        }

        if self.phrase_space && !self.phrase.is_empty() {
            self.phrase.push(b' ');
        }
        self.phrase_space = false;
        self.phrase.push(b);
    }

    fn separate_phrase(&mut self) {
        if self.angle.is_none() {
            self.phrase_space = true;
        }
    }

    /// Turn the current unit into an address, if it has one, and reset for
    /// the next unit.
    fn finish_unit<T: CharsetTranscoder>(
        &mut self,
        addresses: &mut Vec<Address>,
        transcoder: &T,
        config: &DecoderConfig,
    ) -> Result<(), Error> {
        let phrase = mem::take(&mut self.phrase);
        let addr_spec = mem::take(&mut self.addr_spec);
        self.phrase_space = false;

        let (phrase, mailbox) = match self.angle.take() {
            Some(angle) => {
                let mailbox = strip_route(trim(&angle)).to_vec();
                (phrase, mailbox)
            },
            None => (Vec::new(), trim(&addr_spec).to_vec()),
        };

        if mailbox.is_empty() {
            if !phrase.is_empty() {
                debug!(
                    "Dropping address with empty mailbox: {:?}",
                    String::from_utf8_lossy(&phrase)
                );
            }
            return Ok(());
        }

        let display_name =
            decode_encoded_words_with(&phrase, transcoder, config)?;
        addresses.push(Address {
            display_name,
            mailbox: String::from_utf8_lossy(&mailbox).into_owned(),
        });
        Ok(())
    }
}

fn trim(s: &[u8]) -> &[u8] {
    let start = s
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(s.len());
    let end = s
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |ix| ix + 1);
    &s[start..end]
}

/// Strip the obsolete source route from an angle-addr, as in
/// `<@relay1,@relay2:user@example.com>`.
fn strip_route(addr: &[u8]) -> &[u8] {
    if Some(&b'@') != addr.first() {
        return addr;
    }

    match memchr::memchr(b':', addr) {
        Some(colon) => trim(&addr[colon + 1..]),
        None => addr,
    }
}
