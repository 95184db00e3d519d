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

//! UTF-7 (RFC 2152), which `encoding_rs` deliberately does not support but
//! which still turns up in old mail.

use std::borrow::Cow;

const SHIFT_IN: u8 = b'+';

/// Decode the given string from UTF-7.
///
/// This assumes that the string is a complete unit, which holds for the text
/// of an encoded word.
///
/// Decoding is extremely permissive. 8-bit characters and other non-direct
/// characters are passed through. Direct characters which should not be
/// encoded are still accepted in their encoded form. Unnecessary shift
/// sequences are permitted. The shift-out character is not required at the
/// end or before a non-base-64 character.
pub fn decode(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let mut transformed = String::new();
    let mut utf16 = Vec::new();
    let mut utf16_ne = Vec::new();

    // Find delimiters where base64 encoding starts.
    //
    // We can't just use split() because the base64 alphabet includes the
    // shift-in character itself.
    let mut split_points = bytes
        .iter()
        .copied()
        .enumerate()
        .scan(false, |in_encoded, (ix, ch)| {
            if *in_encoded {
                *in_encoded = is_base64_char(ch);
                Some((ix, false))
            } else if SHIFT_IN == ch {
                *in_encoded = true;
                Some((ix, true))
            } else {
                Some((ix, false))
            }
        })
        .filter(|&(_, is_start)| is_start)
        .map(|(ix, _)| ix)
        .chain(std::iter::once(s.len()));

    let mut split_start = match split_points.next() {
        Some(start) if start < s.len() => start,
        _ => return Cow::Borrowed(s),
    };
    transformed.push_str(&s[..split_start]);

    for split_end in split_points {
        let chunk = &bytes[split_start + 1..split_end];
        split_start = split_end;

        let (base64_end, unencoded_start) =
            match chunk.iter().position(|&ch| !is_base64_char(ch)) {
                None => (chunk.len(), chunk.len()),
                Some(ix) if b'-' == chunk[ix] => (ix, ix + 1),
                Some(ix) => (ix, ix),
            };

        if 0 == base64_end {
            // "+-" is the escape for a literal "+"; a lone "+" is kept too
            transformed.push(SHIFT_IN.into());
        } else {
            utf16.clear();
            if base64::decode_config_buf(
                &chunk[..base64_end],
                base64::STANDARD_NO_PAD.decode_allow_trailing_bits(true),
                &mut utf16,
            )
            .is_err()
            {
                // Just push the whole thing un-encoded
                transformed.push(SHIFT_IN.into());
                transformed.push_str(&String::from_utf8_lossy(chunk));
                continue;
            }

            utf16_ne.clear();
            utf16_ne.extend(
                utf16
                    .chunks(2)
                    // If there's a spurious trailing byte, drop it
                    .filter(|chunk| 2 == chunk.len())
                    .map(|c| u16::from_be_bytes([c[0], c[1]])),
            );

            transformed.push_str(&String::from_utf16_lossy(&utf16_ne));
        }

        transformed
            .push_str(&String::from_utf8_lossy(&chunk[unencoded_start..]));
    }

    Cow::Owned(transformed)
}

fn is_base64_char(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() || ch == b'+' || ch == b'/'
}
