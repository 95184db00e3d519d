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

use std::io::BufRead;

use crate::support::error::{Component, Error};

/// The header fields of a message, in the order they appeared.
///
/// Names are compared case-insensitively. Values are the raw bytes after the
/// colon, with continuation lines unfolded but nothing decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeaderFields {
    fields: Vec<(String, Vec<u8>)>,
}

impl HeaderFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the header block from `r`, stopping after the blank line that
    /// separates it from the body, or at EOF.
    ///
    /// Continuation lines are unfolded by deleting the line ending before
    /// them; their leading whitespace is kept. Lines with no colon are
    /// ignored.
    pub fn read_from(mut r: impl BufRead) -> Result<Self, Error> {
        let mut fields = HeaderFields::new();
        let mut line = Vec::new();
        let mut pending: Option<Vec<u8>> = None;

        loop {
            line.clear();
            let nread =
                r.read_until(b'\n', &mut line).map_err(|e| Error::Io {
                    component: Component::HeaderBlock,
                    source: e,
                })?;

            if line.ends_with(b"\n") {
                line.pop();
            }
            if line.ends_with(b"\r") {
                line.pop();
            }

            if matches!(line.first(), Some(&b' ') | Some(&b'\t')) {
                // A continuation with nothing to continue is dropped
                if let Some(ref mut unfolded) = pending {
                    unfolded.extend_from_slice(&line);
                }
                continue;
            }

            if let Some(complete) = pending.take() {
                fields.push_raw(&complete);
            }

            if 0 == nread || line.is_empty() {
                break;
            }

            pending = Some(line.clone());
        }

        Ok(fields)
    }

    fn push_raw(&mut self, unfolded: &[u8]) {
        let colon = match memchr::memchr(b':', unfolded) {
            Some(colon) => colon,
            None => return,
        };

        let name = String::from_utf8_lossy(&unfolded[..colon]);
        let name = name.trim();
        if name.is_empty() {
            return;
        }

        let value = &unfolded[colon + 1..];
        let value_start = value
            .iter()
            .position(|&b| b' ' != b && b'\t' != b)
            .unwrap_or(value.len());
        self.insert(name, value[value_start..].to_vec());
    }

    /// Append a field. Existing fields with the same name are kept.
    pub fn insert(&mut self, name: impl Into<String>, value: Vec<u8>) {
        self.fields.push((name.into(), value));
    }

    /// Returns the value of the first field called `name`.
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| &v[..])
    }

    pub fn get_all<'a: 'n, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a [u8]> + 'n {
        self.fields
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| &v[..])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.fields.iter().map(|(n, v)| (&n[..], &v[..]))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
