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

use log::debug;

/// Decodes the joined payloads of a run of "B" encoded words.
///
/// Payloads are fed in one at a time and decoded a 4-character quantum at a
/// time, so a quantum split between two encoded words is still decoded
/// correctly, and padding at the end of one word does not poison the next.
#[derive(Debug, Default)]
pub struct Base64Run {
    quantum: Vec<u8>,
    decoded: Vec<u8>,
}

impl Base64Run {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, payload: &[u8]) {
        for &b in payload {
            if b.is_ascii_alphanumeric() || b'+' == b || b'/' == b || b'=' == b
            {
                self.quantum.push(b);
                if 4 == self.quantum.len() {
                    self.decode_quantum(base64::STANDARD);
                }
            }
        }
    }

    pub fn finish(mut self) -> Vec<u8> {
        // Some agents leave the padding off entirely
        while Some(&b'=') == self.quantum.last() {
            self.quantum.pop();
        }
        if !self.quantum.is_empty() {
            self.decode_quantum(base64::STANDARD_NO_PAD);
        }

        self.decoded
    }

    fn decode_quantum(&mut self, config: base64::Config) {
        // A quantum of nothing but padding carries no data
        if self.quantum.iter().all(|&b| b'=' == b) {
            self.quantum.clear();
            return;
        }

        let start = self.decoded.len();
        if let Err(e) = base64::decode_config_buf(
            &self.quantum,
            config.decode_allow_trailing_bits(true),
            &mut self.decoded,
        ) {
            debug!(
                "Dropping undecodable base64 {:?}: {}",
                String::from_utf8_lossy(&self.quantum),
                e
            );
            self.decoded.truncate(start);
        }
        self.quantum.clear();
    }
}

/// Decode a single base64 payload.
pub fn decode_b(payload: &[u8]) -> Vec<u8> {
    let mut run = Base64Run::new();
    run.push(payload);
    run.finish()
}
