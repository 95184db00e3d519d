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

/// A reader which hands out its data a few bytes at a time, and optionally
/// fails once the data runs out.
pub struct ChunkedReader {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
    error: Option<io::ErrorKind>,
}

impl ChunkedReader {
    pub fn new(data: Vec<u8>, chunk: usize) -> Self {
        ChunkedReader {
            data,
            pos: 0,
            chunk,
            error: None,
        }
    }

    /// Returns all of `data` on the first read, then fails with `kind`
    /// forever after.
    pub fn failing(data: Vec<u8>, kind: io::ErrorKind) -> Self {
        let chunk = data.len().max(1);
        ChunkedReader {
            data,
            pos: 0,
            chunk,
            error: Some(kind),
        }
    }
}

impl Read for ChunkedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.data[self.pos..];
        if remaining.is_empty() {
            return match self.error {
                Some(kind) => Err(io::Error::new(kind, "injected failure")),
                None => Ok(0),
            };
        }

        let len = remaining.len().min(self.chunk).min(buf.len());
        buf[..len].copy_from_slice(&remaining[..len]);
        self.pos += len;
        Ok(len)
    }
}
