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

/// A reader which deletes every CR and LF byte from the underlying stream.
///
/// Line breaks are removed outright rather than normalised, so DOS, UNIX and
/// old Mac line endings all disappear and the content reads as one
/// continuous run.
#[derive(Debug)]
pub struct LineBreakRemover<R> {
    inner: R,
}

impl<R: Read> LineBreakRemover<R> {
    pub fn new(inner: R) -> Self {
        LineBreakRemover { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for LineBreakRemover<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let nread = self.inner.read(buf)?;
            if 0 == nread {
                return Ok(0);
            }

            let first = match memchr::memchr2(b'\r', b'\n', &buf[..nread]) {
                None => return Ok(nread),
                Some(first) => first,
            };

            let mut kept = first;
            for ix in first..nread {
                let b = buf[ix];
                if b'\r' != b && b'\n' != b {
                    buf[kept] = b;
                    kept += 1;
                }
            }

            // A read consisting only of line breaks must not look like EOF
            if kept > 0 {
                return Ok(kept);
            }
        }
    }
}

/// Remove all line breaks from `input`.
pub fn remove_line_breaks(input: &[u8]) -> Vec<u8> {
    input
        .iter()
        .copied()
        .filter(|&b| b'\r' != b && b'\n' != b)
        .collect()
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::mime::test_support::ChunkedReader;

    fn read_all(r: impl Read) -> Vec<u8> {
        let mut r = r;
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn mixed_line_endings() {
        assert_eq!(
            b"aaaabbbbbcccddd",
            &read_all(LineBreakRemover::new(
                &b"aaaa\nbbbbb\nccc\r\nddd"[..]
            ))[..]
        );
        assert_eq!(
            b"aaaabbbbbcccddd",
            &remove_line_breaks(b"aaaa\nbbbbb\nccc\r\nddd")[..]
        );
    }

    #[test]
    fn bare_cr_is_removed() {
        assert_eq!(b"abc", &remove_line_breaks(b"a\rb\r\r\nc\r")[..]);
    }

    #[test]
    fn reads_of_only_line_breaks_are_skipped() {
        let r = LineBreakRemover::new(ChunkedReader::new(
            b"\r\n\r\n\r\nfoo\r\n\r\nbar\r\n".to_vec(),
            2,
        ));
        assert_eq!(b"foobar", &read_all(r)[..]);
    }

    #[test]
    fn errors_propagate_unchanged() {
        let mut r = LineBreakRemover::new(ChunkedReader::failing(
            b"foo\n".to_vec(),
            io::ErrorKind::ConnectionReset,
        ));
        let mut out = Vec::new();
        let err = r.read_to_end(&mut out).unwrap_err();
        assert_eq!(io::ErrorKind::ConnectionReset, err.kind());
        assert_eq!(b"foo", &out[..]);
    }

    proptest! {
        #[test]
        fn streaming_matches_whole_buffer(
            s in prop::collection::vec(
                prop_oneof![Just(b'\r'), Just(b'\n'), prop::num::u8::ANY],
                0..100
            ),
            chunk in 1usize..8,
        ) {
            let streamed = read_all(LineBreakRemover::new(
                ChunkedReader::new(s.clone(), chunk)));
            prop_assert_eq!(remove_line_breaks(&s), streamed);
        }
    }
}
