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


//! Streaming conversion of a whole body from its declared charset to UTF-8.

use std::collections::BTreeMap;
use std::io::{self, Read};

use encoding_rs::{CoderResult, Decoder, Encoding};

use super::charset::{resolve_alias, DEFAULT_ALIAS_TABLE};
use crate::support::decoder_config::DecoderConfig;
use crate::support::error::Error;

const READ_SIZE: usize = 4096;

/// A reader which decodes the underlying stream from a fixed charset and
/// produces UTF-8.
///
/// Multi-byte sequences may be split across reads of the underlying
/// stream. A byte order mark at the start is removed. Malformed input
/// decodes to U+FFFD, including a sequence truncated by EOF.
///
/// Errors from the underlying reader are returned unchanged, and reading
/// may be resumed after them.
pub struct CharsetReader<R> {
    inner: R,
    decoder: Decoder,
    input: Vec<u8>,
    input_pos: usize,
    eof: bool,
    output: Vec<u8>,
    output_pos: usize,
    finished: bool,
}

impl<R: Read> CharsetReader<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        CharsetReader {
            inner,
            decoder: encoding.new_decoder_with_bom_removal(),
            input: Vec::new(),
            input_pos: 0,
            eof: false,
            output: Vec::new(),
            output_pos: 0,
            finished: false,
        }
    }

    /// Decode from the charset named `charset`, after applying the built-in
    /// alias table.
    ///
    /// UTF-7 is not supported here; it is only ever seen in encoded words.
    pub fn for_charset(inner: R, charset: &str) -> Result<Self, Error> {
        Self::with_aliases(inner, charset, &DEFAULT_ALIAS_TABLE)
    }

    /// Like `for_charset`, but with the aliases from `config`.
    pub fn for_charset_with(
        inner: R,
        charset: &str,
        config: &DecoderConfig,
    ) -> Result<Self, Error> {
        Self::with_aliases(inner, charset, &config.alias_table())
    }

    /// Decode ISO-8859-1.
    ///
    /// As everywhere else in mail, this is really windows-1252, which is a
    /// superset apart from the C1 controls.
    pub fn iso_8859_1(inner: R) -> Self {
        Self::new(inner, encoding_rs::WINDOWS_1252)
    }

    fn with_aliases(
        inner: R,
        charset: &str,
        aliases: &BTreeMap<String, String>,
    ) -> Result<Self, Error> {
        let charset = resolve_alias(aliases, charset);
        let encoding = Encoding::for_label_no_replacement(charset.as_bytes())
            .ok_or_else(|| Error::UnsupportedCharset(charset.into_owned()))?;
        Ok(Self::new(inner, encoding))
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.decoder.encoding()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn fill_input(&mut self) -> io::Result<()> {
        self.input.resize(READ_SIZE, 0);
        self.input_pos = 0;
        match self.inner.read(&mut self.input) {
            Ok(nread) => {
                self.input.truncate(nread);
                self.eof = 0 == nread;
                Ok(())
            },
            Err(e) => {
                self.input.clear();
                Err(e)
            },
        }
    }
}

impl<R: Read> Read for CharsetReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.output_pos < self.output.len() {
                let pending = &self.output[self.output_pos..];
                let len = pending.len().min(buf.len());
                buf[..len].copy_from_slice(&pending[..len]);
                self.output_pos += len;
                return Ok(len);
            }

            if self.finished {
                return Ok(0);
            }

            if self.input_pos == self.input.len() && !self.eof {
                self.fill_input()?;
            }

            let src_len = self.input.len() - self.input_pos;
            let capacity = self
                .decoder
                .max_utf8_buffer_length(src_len)
                .unwrap_or(4 * src_len + 16);
            self.output.clear();
            self.output.resize(capacity, 0);
            self.output_pos = 0;

            let (result, nread, nwritten, _) = self.decoder.decode_to_utf8(
                &self.input[self.input_pos..],
                &mut self.output,
                self.eof,
            );
            self.input_pos += nread;
            self.output.truncate(nwritten);

            if self.eof && CoderResult::InputEmpty == result {
                self.finished = true;
            }
        }
    }
}
