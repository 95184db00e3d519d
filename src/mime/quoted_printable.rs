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

use std::io::{self, Read};

/// How much to pull from the underlying reader at a time.
const READ_SIZE: usize = 4096;

/// Decodes quoted-printable encoding, as described by RFC 2045, from an
/// underlying reader.
///
/// Encoded bytes and soft line endings are both handled, the latter by
/// discarding. UNIX line endings are handled as well as DOS line endings.
///
/// This never fails on its own. Invalid sequences are passed through
/// untransformed. Certain restrictions, such as not having trailing
/// whitespace on a line, are not enforced, and are passed through. 8-bit
/// characters are passed through, including invalid UTF-8.
///
/// Only as much of the underlying reader is consumed as is needed to produce
/// output; at most two bytes of an incomplete escape are held back between
/// reads.
#[derive(Debug)]
pub struct QpDecoder<R> {
    inner: R,
    mode: Mode,
    input: Vec<u8>,
    pos: usize,
    eof: bool,
}

#[derive(Clone, Copy, Debug)]
struct Mode {
    preserve_line_breaks: bool,
    underscore_is_space: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Escape {
    /// `=` followed by a line ending of the given length.
    SoftBreak(usize),
    /// `=XX`
    Byte(u8),
    /// Not a valid escape; the `=` is literal.
    Literal,
    /// Can't tell until more input arrives.
    Incomplete,
}

impl<R: Read> QpDecoder<R> {
    /// Create a decoder for body text.
    ///
    /// If `preserve_line_breaks` is false, hard line breaks are dropped from
    /// the output as well as soft ones.
    pub fn new(inner: R, preserve_line_breaks: bool) -> Self {
        Self::with_mode(
            inner,
            Mode {
                preserve_line_breaks,
                underscore_is_space: false,
            },
        )
    }

    /// Create a decoder for the RFC 2047 "Q" encoding used in headers, where
    /// `_` stands for a space.
    pub fn header(inner: R) -> Self {
        Self::with_mode(
            inner,
            Mode {
                preserve_line_breaks: false,
                underscore_is_space: true,
            },
        )
    }

    fn with_mode(inner: R, mode: Mode) -> Self {
        QpDecoder {
            inner,
            mode,
            input: Vec::new(),
            pos: 0,
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill(&mut self) -> io::Result<()> {
        let remaining = self.input.len() - self.pos;
        self.input.copy_within(self.pos.., 0);
        self.input.resize(remaining + READ_SIZE, 0);
        self.pos = 0;

        match self.inner.read(&mut self.input[remaining..]) {
            Ok(nread) => {
                self.input.truncate(remaining + nread);
                self.eof = 0 == nread;
                Ok(())
            },
            Err(e) => {
                self.input.truncate(remaining);
                Err(e)
            },
        }
    }
}

impl<R: Read> Read for QpDecoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let (consumed, written) =
                self.mode.decode(&self.input[self.pos..], self.eof, buf);
            self.pos += consumed;

            if written > 0 || (self.eof && self.pos == self.input.len()) {
                return Ok(written);
            }

            self.fill()?;
        }
    }
}

impl Mode {
    /// Decode as much of `input` into `out` as possible.
    ///
    /// Returns the number of bytes consumed from `input` and the number of
    /// bytes written to `out`. If `eof` is true, incomplete escapes at the
    /// end of `input` are treated as literal text and `input` is consumed
    /// completely provided `out` is at least as long as `input`.
    fn decode(
        &self,
        input: &[u8],
        eof: bool,
        out: &mut [u8],
    ) -> (usize, usize) {
        let mut pos = 0;
        let mut written = 0;

        while written < out.len() && pos < input.len() {
            let b = input[pos];
            match b {
                b'=' => match classify_escape(&input[pos + 1..], eof) {
                    Escape::SoftBreak(len) => pos += 1 + len,
                    Escape::Byte(decoded) => {
                        out[written] = decoded;
                        written += 1;
                        pos += 3;
                    },
                    Escape::Literal => {
                        out[written] = b'=';
                        written += 1;
                        pos += 1;
                    },
                    Escape::Incomplete => break,
                },

                b'\r' | b'\n' if !self.preserve_line_breaks => pos += 1,

                b'_' if self.underscore_is_space => {
                    out[written] = b' ';
                    written += 1;
                    pos += 1;
                },

                _ => {
                    out[written] = b;
                    written += 1;
                    pos += 1;
                },
            }
        }

        (pos, written)
    }
}

fn classify_escape(after_equals: &[u8], eof: bool) -> Escape {
    let incomplete = if eof {
        Escape::Literal
    } else {
        Escape::Incomplete
    };

    match *after_equals {
        [] | [b'\r'] => incomplete,
        [b'\n', ..] => Escape::SoftBreak(1),
        [b'\r', b'\n', ..] => Escape::SoftBreak(2),
        [hi] if hex_value(hi).is_some() => incomplete,
        [hi, lo, ..] => match (hex_value(hi), hex_value(lo)) {
            (Some(hi), Some(lo)) => Escape::Byte(hi << 4 | lo),
            _ => Escape::Literal,
        },
        _ => Escape::Literal,
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'A'..=b'F' => Some(b - b'A' + 10),
        // Not permitted by RFC 2045, but common enough in the wild
        b'a'..=b'f' => Some(b - b'a' + 10),
        _ => None,
    }
}

fn decode_all(input: &[u8], mode: Mode) -> Vec<u8> {
    // Decoding never makes the data longer
    let mut out = vec![0u8; input.len()];
    let (_, written) = mode.decode(input, true, &mut out);
    out.truncate(written);
    out
}

/// Decode a complete quoted-printable body.
pub fn decode_quoted_printable(
    input: &[u8],
    preserve_line_breaks: bool,
) -> Vec<u8> {
    decode_all(
        input,
        Mode {
            preserve_line_breaks,
            underscore_is_space: false,
        },
    )
}

/// Decode the text of an RFC 2047 "Q" encoded word.
pub fn decode_q(input: &[u8]) -> Vec<u8> {
    decode_all(
        input,
        Mode {
            preserve_line_breaks: false,
            underscore_is_space: true,
        },
    )
}
