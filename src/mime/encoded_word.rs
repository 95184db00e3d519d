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

//! Streaming decoding of RFC 2047 "encoded words" embedded in header text.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::ops::Range;
use std::str;
use std::sync::Arc;

use log::{debug, warn};

use super::base64_run::Base64Run;
use super::charset::{resolve_alias, CharsetTranscoder};
use super::model::{EncodedWord, TransferEncoding};
use super::quoted_printable::decode_q;
use crate::support::decoder_config::DecoderConfig;
use crate::support::error::{Component, Error};

const READ_SIZE: usize = 4096;

/// The result of trying to parse an encoded word at the start of a buffer.
#[derive(Debug, PartialEq, Eq)]
enum Parsed<'a> {
    /// A complete encoded word of the given total length.
    Word(EncodedWord<'a>, usize),
    /// Not an encoded word. The given number of bytes (at least 2, covering
    /// the `=?`) must be passed through literally before scanning resumes.
    Malformed(usize),
    /// Can't tell without more input.
    Incomplete,
}

/// A maximal sequence of adjacent encoded words sharing a charset and
/// encoding.
///
/// Offsets are relative to the start of the first word, which is also the
/// start of the scanner's unconsumed input.
#[derive(Debug)]
struct DecodeRun {
    charset: String,
    encoding: TransferEncoding,
    payloads: Vec<Range<usize>>,
    /// The offset just after the closing `?=` of the last word.
    end: usize,
}

impl DecodeRun {
    fn continued_by(&self, word: &EncodedWord<'_>) -> bool {
        self.encoding == word.encoding
            && self.charset.eq_ignore_ascii_case(word.charset)
    }
}

/// A reader which decodes RFC 2047 encoded words in the text of the
/// underlying reader, producing UTF-8.
///
/// Text outside of encoded words is passed through byte-for-byte. Adjacent
/// encoded words with the same charset and encoding are joined before the
/// charset is decoded, and the whitespace between them is deleted, so that a
/// multi-byte character split across two words survives.
///
/// Anything that looks like the start of an encoded word but does not parse
/// as one is passed through untransformed. The only error this produces
/// itself is `Error::UnsupportedCharset` (inside an `io::Error` of kind
/// `InvalidData`), unless the configuration asks for best-effort decoding.
/// Errors from the underlying reader are returned as-is.
pub struct EncodedWordReader<R, T> {
    inner: R,
    transcoder: T,
    aliases: Arc<BTreeMap<String, String>>,
    best_effort: bool,
    max_word_len: usize,

    input: Vec<u8>,
    pos: usize,
    eof: bool,

    output: Vec<u8>,
    output_pos: usize,
}

impl<R: Read, T: CharsetTranscoder> EncodedWordReader<R, T> {
    pub fn new(inner: R, transcoder: T) -> Self {
        Self::with_config(inner, transcoder, &DecoderConfig::default())
    }

    pub fn with_config(
        inner: R,
        transcoder: T,
        config: &DecoderConfig,
    ) -> Self {
        EncodedWordReader {
            inner,
            transcoder,
            aliases: config.alias_table(),
            best_effort: config.best_effort,
            max_word_len: config.max_encoded_word_len,

            input: Vec::new(),
            pos: 0,
            eof: false,

            output: Vec::new(),
            output_pos: 0,
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

    fn pass_through(&mut self, len: usize) {
        self.output
            .extend_from_slice(&self.input[self.pos..self.pos + len]);
        self.pos += len;
    }

    /// Advance the scan by one unit: a literal span, a malformed token, a
    /// decode run, or a refill of the input buffer.
    ///
    /// Returns false at end of input.
    fn step(&mut self) -> io::Result<bool> {
        let pending = &self.input[self.pos..];
        if pending.is_empty() {
            if self.eof {
                return Ok(false);
            }
            self.fill()?;
            return Ok(true);
        }

        match memchr::memchr(b'=', pending) {
            None => {
                let len = pending.len();
                self.pass_through(len);
                return Ok(true);
            },
            Some(0) => (),
            Some(literal_len) => {
                self.pass_through(literal_len);
                return Ok(true);
            },
        }

        match pending.get(1) {
            None if !self.eof => self.fill()?,
            Some(&b'?') => {
                match parse_word(pending, self.eof, self.max_word_len) {
                    Parsed::Incomplete => self.fill()?,
                    Parsed::Malformed(len) => {
                        debug!(
                            "Passing through malformed encoded word {:?}",
                            String::from_utf8_lossy(&pending[..len])
                        );
                        self.pass_through(len);
                    },
                    Parsed::Word(word, len) => {
                        let run = DecodeRun {
                            charset: word.charset.to_owned(),
                            encoding: word.encoding,
                            payloads: vec![payload_range(pending, &word)],
                            end: len,
                        };
                        self.decode_run(run)?;
                    },
                }
            },
            _ => self.pass_through(1),
        }

        Ok(true)
    }

    /// Extend `run` with any following words that continue it, then decode
    /// it and consume it from the input.
    fn decode_run(&mut self, mut run: DecodeRun) -> io::Result<()> {
        loop {
            let following = &self.input[self.pos + run.end..];
            let ws_len = following
                .iter()
                .take_while(|&&b| is_linear_whitespace(b))
                .count();
            if ws_len > self.max_word_len {
                break;
            }

            let next = &following[ws_len..];
            let need_more = match next {
                [] | [b'='] => !self.eof,
                [b'=', b'?', ..] => {
                    match parse_word(next, self.eof, self.max_word_len) {
                        Parsed::Incomplete => true,
                        Parsed::Word(word, len) if run.continued_by(&word) => {
                            let base = run.end + ws_len;
                            let payload = payload_range(next, &word);
                            run.payloads.push(
                                base + payload.start..base + payload.end,
                            );
                            run.end = base + len;
                            continue;
                        },
                        _ => break,
                    }
                },
                _ => break,
            };

            if !need_more {
                break;
            }
            self.fill()?;
        }

        let raw = &self.input[self.pos..];
        let decoded = match run.encoding {
            TransferEncoding::Base64 => {
                let mut b64 = Base64Run::new();
                for payload in &run.payloads {
                    b64.push(&raw[payload.clone()]);
                }
                b64.finish()
            },
            TransferEncoding::QuotedPrintable => {
                let mut joined = Vec::new();
                for payload in &run.payloads {
                    joined.extend_from_slice(&raw[payload.clone()]);
                }
                decode_q(&joined)
            },
        };

        let charset = resolve_alias(&self.aliases, &run.charset);
        let charset = self.transcoder.canonical_charset(&charset);
        match self.transcoder.transcode(&charset, &decoded) {
            Ok(text) => {
                self.output.extend_from_slice(text.as_bytes());
                self.pos += run.end;
                Ok(())
            },
            Err(Error::UnsupportedCharset(name)) if self.best_effort => {
                warn!(
                    "Unsupported charset {:?} in encoded word, \
                     passing through undecoded",
                    name
                );
                self.pass_through(run.end);
                Ok(())
            },
            Err(e) => {
                // The run is consumed regardless so that the reader does not
                // keep failing at the same spot
                self.pos += run.end;
                Err(e.into_io())
            },
        }
    }
}

impl<R: Read, T: CharsetTranscoder> Read for EncodedWordReader<R, T> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            if self.output_pos < self.output.len() {
                let available = &self.output[self.output_pos..];
                let len = available.len().min(buf.len());
                buf[..len].copy_from_slice(&available[..len]);
                self.output_pos += len;
                return Ok(len);
            }

            self.output.clear();
            self.output_pos = 0;
            if !self.step()? {
                return Ok(0);
            }
        }
    }
}

fn is_linear_whitespace(b: u8) -> bool {
    b' ' == b || b'\t' == b || b'\r' == b || b'\n' == b
}

fn is_charset_char(b: u8) -> bool {
    // RFC 2047 forbids more than this, but real charset names never contain
    // `=` and `?`, and excluding them lets `=?=?` resynchronise quickly.
    b > b' ' && b < 0x7F && b'?' != b && b'=' != b
}

fn is_payload_char(b: u8) -> bool {
    b > b' ' && b < 0x7F && b'?' != b
}

/// Where `word.payload` lies within `s`, which `word` was parsed from.
fn payload_range(s: &[u8], word: &EncodedWord<'_>) -> Range<usize> {
    let start = word.payload.as_ptr() as usize - s.as_ptr() as usize;
    start..start + word.payload.len()
}

/// Parse the encoded word at the start of `s`, which must begin with `=?`.
///
/// Words longer than `max_len` are rejected as malformed.
fn parse_word(s: &[u8], eof: bool, max_len: usize) -> Parsed<'_> {
    let incomplete = if eof {
        Parsed::Malformed(s.len())
    } else {
        Parsed::Incomplete
    };

    // Charset
    let charset_start = 2;
    let mut ix = charset_start;
    loop {
        if ix > max_len {
            return Parsed::Malformed(ix);
        }

        match s.get(ix) {
            None => return incomplete,
            Some(&b'?') => break,
            Some(&b) if is_charset_char(b) => ix += 1,
            Some(_) => return Parsed::Malformed(ix),
        }
    }
    let charset = match str::from_utf8(&s[charset_start..ix]) {
        Ok(charset) => charset,
        Err(_) => return Parsed::Malformed(ix),
    };
    // RFC 2231 allows a language tag, as in `=?US-ASCII*EN?Q?...?=`
    let charset = charset.split('*').next().unwrap_or(charset);
    if charset.is_empty() {
        return Parsed::Malformed(ix);
    }
    ix += 1;

    // Encoding
    let encoding = match s.get(ix) {
        None => return incomplete,
        Some(&tag) => match TransferEncoding::from_tag(tag) {
            Some(encoding) => encoding,
            None => return Parsed::Malformed(ix),
        },
    };
    ix += 1;

    match s.get(ix) {
        None => return incomplete,
        Some(&b'?') => ix += 1,
        Some(_) => return Parsed::Malformed(ix),
    }

    // Payload
    let payload_start = ix;
    loop {
        if ix > max_len {
            return Parsed::Malformed(ix);
        }

        match s.get(ix) {
            None => return incomplete,
            Some(&b'?') => match s.get(ix + 1) {
                None => return incomplete,
                Some(&b'=') => break,
                Some(_) => return Parsed::Malformed(ix),
            },
            Some(&b) if is_payload_char(b) => ix += 1,
            Some(_) => return Parsed::Malformed(ix),
        }
    }

    Parsed::Word(
        EncodedWord {
            charset,
            encoding,
            payload: &s[payload_start..ix],
        },
        ix + 2,
    )
}

/// Decode all encoded words in `input`.
///
/// Bytes outside encoded words that are not valid UTF-8 are replaced with
/// U+FFFD.
pub fn decode_encoded_words<T: CharsetTranscoder>(
    input: &[u8],
    transcoder: T,
) -> Result<String, Error> {
    decode_encoded_words_with(input, transcoder, &DecoderConfig::default())
}

/// Like `decode_encoded_words`, with explicit configuration.
pub fn decode_encoded_words_with<T: CharsetTranscoder>(
    input: &[u8],
    transcoder: T,
    config: &DecoderConfig,
) -> Result<String, Error> {
    let mut decoded = Vec::with_capacity(input.len());
    EncodedWordReader::with_config(input, transcoder, config)
        .read_to_end(&mut decoded)
        .map_err(|e| Error::from_io(Component::EncodedWord, e))?;

    Ok(match String::from_utf8(decoded) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::mime::charset::{from_fn, EncodingTranscoder};
    use crate::mime::test_support::ChunkedReader;

    fn decode(s: &str) -> String {
        crate::init_test_log();
        decode_encoded_words(s.as_bytes(), EncodingTranscoder::default())
            .unwrap()
    }

    fn decode_chunked(
        s: &str,
        input_chunk: usize,
        output_chunk: usize,
    ) -> String {
        let mut reader = EncodedWordReader::new(
            ChunkedReader::new(s.as_bytes().to_vec(), input_chunk),
            EncodingTranscoder::default(),
        );
        let mut out = Vec::new();
        let mut buf = vec![0u8; output_chunk];
        loop {
            let n = reader.read(&mut buf).unwrap();
            if 0 == n {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_word_boundaries() {
        assert_eq!(
            Parsed::Word(
                EncodedWord {
                    charset: "utf-8",
                    encoding: TransferEncoding::QuotedPrintable,
                    payload: b"a=20b",
                },
                17
            ),
            parse_word(b"=?utf-8?q?a=20b?= tail", false, 100)
        );
        assert_eq!(Parsed::Incomplete, parse_word(b"=?utf-8?q?a", false, 100));
        assert_eq!(
            Parsed::Malformed(11),
            parse_word(b"=?utf-8?q?a", true, 100)
        );
        assert_eq!(Parsed::Malformed(2), parse_word(b"=??q?a?=", false, 100));
        assert_eq!(
            Parsed::Malformed(5),
            parse_word(b"=?*en?q?a?=", false, 100)
        );
        assert_eq!(
            Parsed::Malformed(8),
            parse_word(b"=?utf-8?x?a?=", false, 100)
        );
        assert_eq!(
            Parsed::Malformed(11),
            parse_word(b"=?utf-8?q?a b?=", false, 100)
        );
        assert_eq!(
            Parsed::Malformed(11),
            parse_word(b"=?utf-8?q?a?b?=", false, 100)
        );
        assert_eq!(
            Parsed::Malformed(10),
            parse_word(b"=?utf-8?q?abcdef?=", false, 8)
        );
        assert_matches!(
            Parsed::Word(EncodedWord { charset: "US-ASCII", .. }, _),
            parse_word(b"=?US-ASCII*EN?Q?Keith_Moore?=", false, 100)
        );
    }

    #[test]
    fn rfc2047_examples() {
        assert_eq!("Keith Moore", decode("=?US-ASCII?Q?Keith_Moore?="));
        assert_eq!(
            "Keld Jørn Simonsen",
            decode("=?ISO-8859-1?Q?Keld_J=F8rn_Simonsen?=")
        );
        assert_eq!("André", decode("=?ISO-8859-1?Q?Andr=E9?="));
        assert_eq!(
            "םולש ןב ילטפנ",
            decode("=?iso-8859-8?b?7eXs+SDv4SDp7Oj08A==?=")
        );
        assert_eq!("(a)", decode("(=?ISO-8859-1?Q?a?=)"));
        assert_eq!("(a b)", decode("(=?ISO-8859-1?Q?a?= b)"));
        assert_eq!("(ab)", decode("(=?ISO-8859-1?Q?a?= =?ISO-8859-1?Q?b?=)"));
        assert_eq!(
            "(ab)",
            decode("(=?ISO-8859-1?Q?a?=\r\n    =?ISO-8859-1?Q?b?=)")
        );
        assert_eq!("(a b)", decode("(=?ISO-8859-1?Q?a_b?=)"));
    }

    #[test]
    fn merged_utf8_base64() {
        assert_eq!(
            "Hello PDF 加点中文和日本語おはようございます",
            decode(
                "=?utf-8?B?\
                 SGVsbG8gUERGIOWKoOeCueS4reaWh+WSjOaXpeacrOiqnuOBig==?=\
                 \r\n=?utf-8?B?44Gv44KI44GG44GU44GW44GE44G+44GZ?="
            )
        );
    }

    #[test]
    fn q_encoded_display_names() {
        assert_eq!(
            "Jörg Doe <joerg@example.com>",
            decode("=?iso-8859-1?q?J=F6rg_Doe?= <joerg@example.com>")
        );
        assert_eq!(
            "André Pirard <PIRARD@vm1.ulg.ac.be>",
            decode("=?ISO-8859-1?Q?Andr=E9?= Pirard <PIRARD@vm1.ulg.ac.be>")
        );
    }

    #[test]
    fn merged_iso_2022_jp() {
        // The first word ends with ESC ( B and the second starts with ESC $ B
        let decoded = decode(
            "=?ISO-2022-JP?B?\
             RndkOiBFQxskQkwkRn4yWUlKSFYkLDJoTEw+ZTlYRn4yREc9JEskShsoQg==?= \
             =?ISO-2022-JP?B?GyRCJEMkRiQkJGs3bxsoQg==?=",
        );
        assert!(!decoded.contains('\u{FFFD}'), "Got {:?}", decoded);
        assert_eq!("Fwd: EC未入荷品番が画面上購入可能になっている件", decoded);
    }

    #[test]
    fn multibyte_character_split_between_words() {
        // "é" is C3 A9 in UTF-8; each word holds half of it
        assert_eq!("café", decode("=?utf-8?q?caf=C3?= =?UTF-8?Q?=A9?="));
        // Likewise for an escape split down the middle
        assert_eq!("café", decode("=?utf-8?q?caf=C3=A?= =?utf-8?q?9?="));
    }

    #[test]
    fn different_runs_keep_whitespace() {
        assert_eq!(
            "é é",
            decode("=?utf-8?q?=C3=A9?= =?iso-8859-1?q?=E9?=")
        );
        assert_eq!("é é", decode("=?utf-8?q?=C3=A9?= =?utf-8?b?w6k=?="));
    }

    #[test]
    fn malformed_words_pass_through() {
        assert_eq!(
            "=?utf-8?q?never closed",
            decode("=?utf-8?q?never closed")
        );
        assert_eq!("=?utf-8?q?abc", decode("=?utf-8?q?abc"));
        assert_eq!("=?utf-8?x?abc?=", decode("=?utf-8?x?abc?="));
        assert_eq!("a = b =? c", decode("a = b =? c"));
        assert_eq!("trailing =", decode("trailing ="));
        assert_eq!("=?=?", decode("=?=?"));
        assert_eq!("=?*en?q?x?= tail", decode("=?*en?q?x?= tail"));
        assert_eq!("=?*?q?x?=", decode("=?*?q?x?="));
        assert_eq!("=?x", decode("=?=?utf-8?q?x?="));
        assert_eq!(
            "=?broken ok",
            decode("=?broken =?utf-8?q?ok?=")
        );
    }

    #[test]
    fn overlong_word_is_literal() {
        let config = DecoderConfig {
            max_encoded_word_len: 16,
            ..DecoderConfig::default()
        };
        let input = "=?utf-8?q?this_is_far_too_long?= =?utf-8?q?ok?=";
        assert_eq!(
            "=?utf-8?q?this_is_far_too_long?= ok",
            decode_encoded_words_with(
                input.as_bytes(),
                EncodingTranscoder::default(),
                &config
            )
            .unwrap()
        );
    }

    #[test]
    fn unsupported_charset() {
        let input = b"x =?x-klingon?q?Qapla'?= =?x-klingon?q?!?= y";

        assert_matches!(
            Err(Error::UnsupportedCharset(_)),
            decode_encoded_words(input, EncodingTranscoder::default())
        );

        let config = DecoderConfig {
            best_effort: true,
            ..DecoderConfig::default()
        };
        assert_eq!(
            "x =?x-klingon?q?Qapla'?= =?x-klingon?q?!?= y",
            decode_encoded_words_with(
                input,
                EncodingTranscoder::default(),
                &config
            )
            .unwrap()
        );
    }

    #[test]
    fn aliases_applied_before_transcoding() {
        let strict = from_fn(|charset, raw| {
            if "gbk" == charset {
                Ok(format!("<{} bytes>", raw.len()))
            } else {
                Err(Error::UnsupportedCharset(charset.to_owned()))
            }
        });

        assert_eq!(
            "<4 bytes>",
            decode_encoded_words(b"=?GB2312?B?1tDOxA==?=", &strict).unwrap()
        );
        assert_eq!(
            "<1 bytes>",
            decode_encoded_words(b"=?GB2312?q?x?=", &strict).unwrap()
        );
        assert_eq!(
            "中文",
            decode_encoded_words(
                b"=?GB2312?B?1tDOxA==?=",
                EncodingTranscoder::default()
            )
            .unwrap()
        );
    }

    #[test]
    fn configured_aliases_reach_the_transcoder() {
        let mut config = DecoderConfig::default();
        config
            .charset_aliases
            .insert("x-foo".to_owned(), "utf-8".to_owned());

        assert_eq!(
            "hi",
            decode_encoded_words_with(
                b"=?X-Foo?q?hi?=",
                EncodingTranscoder::default(),
                &config
            )
            .unwrap()
        );

        let seen = std::cell::RefCell::new(Vec::new());
        let recorder = from_fn(|charset, raw| {
            seen.borrow_mut().push(charset.to_owned());
            Ok(String::from_utf8_lossy(raw).into_owned())
        });
        decode_encoded_words_with(
            b"=?x-foo?q?a?= =?GB2312?q?b?= =?ISO-8859-1?q?c?=",
            &recorder,
            &config,
        )
        .unwrap();
        assert_eq!(vec!["utf-8", "gbk", "iso-8859-1"], *seen.borrow());

        // Without the configuration, only the built-in table applies
        assert_matches!(
            Err(Error::UnsupportedCharset(_)),
            decode_encoded_words(
                b"=?x-foo?q?hi?=",
                EncodingTranscoder::default()
            )
        );
    }

    #[test]
    fn decoding_is_idempotent() {
        let once = decode(
            "=?ISO-8859-1?Q?Andr=E9?= Pirard <PIRARD@vm1.ulg.ac.be>",
        );
        assert_eq!(once, decode(&once));
    }

    #[test]
    fn io_errors_pass_through() {
        let mut reader = EncodedWordReader::new(
            ChunkedReader::failing(
                b"abc =?utf-8?q?".to_vec(),
                io::ErrorKind::ConnectionAborted,
            ),
            EncodingTranscoder::default(),
        );
        let mut out = Vec::new();
        let err = reader.read_to_end(&mut out).unwrap_err();
        assert_eq!(io::ErrorKind::ConnectionAborted, err.kind());
        assert_eq!(b"abc ", &out[..]);
    }

    #[test]
    fn chunked_input_and_output() {
        let input = "Re: =?utf-8?B?\
                     SGVsbG8gUERGIOWKoOeCueS4reaWh+WSjOaXpeacrOiqnuOBig==?=\
                     \r\n =?utf-8?B?44Gv44KI44GG44GU44GW44GE44G+44GZ?= and \
                     =?iso-8859-1?q?J=F6rg?= =?broken";
        let expected = decode(input);
        for input_chunk in 1..12 {
            for &output_chunk in &[1, 2, 5, 64] {
                assert_eq!(
                    expected,
                    decode_chunked(input, input_chunk, output_chunk)
                );
            }
        }
    }

    #[test]
    fn stacked_on_other_adapters() {
        use crate::mime::line_break::LineBreakRemover;
        use crate::mime::quoted_printable::QpDecoder;

        let mut out = String::new();
        EncodedWordReader::new(
            LineBreakRemover::new(QpDecoder::new(
                &b"=3D?utf-8?q?caf=3DC3?=3D=\r\n\r\n \
                   =3D?UTF-8?Q?=3DA9?=3D x"[..],
                true,
            )),
            EncodingTranscoder::default(),
        )
        .read_to_string(&mut out)
        .unwrap();
        assert_eq!("café x", out);
    }

    proptest! {
        #[test]
        fn never_panics(s in r"(=\?|\?=|[ \r\nqQbB?=_a-z0-9-]){0,40}") {
            decode_encoded_words(s.as_bytes(), EncodingTranscoder::default())
                .ok();
        }

        #[test]
        fn text_without_encoded_words_is_unchanged(s in "[^=]*") {
            prop_assert_eq!(&s, &decode(&s));
        }
    }
}
