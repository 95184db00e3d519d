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

//! Decoding of MIME-encoded mail text into Unicode.
//!
//! The decoders here are `Read` adapters which can be stacked on top of one
//! another and on top of any byte source:
//!
//! - `LineBreakRemover` deletes all line breaks.
//! - `QpDecoder` decodes quoted-printable body text.
//! - `EncodedWordReader` decodes RFC 2047 encoded words in header text,
//!   joining adjacent words in the same charset before decoding them.
//!
//! Each has a one-shot counterpart for data already in memory.
//! `CharsetReader` converts a whole body from its declared charset.
//! `address_list` parses address list header fields on top of the encoded
//! word decoder.
//!
//! Charsets are never interpreted directly; raw bytes are handed to a
//! `CharsetTranscoder`. `EncodingTranscoder` is the standard one.

#[cfg(test)]
macro_rules! assert_matches {
    ($expected:pat, $actual:expr) => {
        match $actual {
            $expected => (),
            unexpected => panic!(
                "Expected {} matches {}, got {:?}",
                stringify!($expected),
                stringify!($actual),
                unexpected
            ),
        }
    };
}

pub mod mime;
pub mod support;

#[cfg(test)]
mod test_data;

pub use crate::mime::charset::{
    from_fn, CharsetTranscoder, EncodingTranscoder,
};
pub use crate::mime::charset_reader::CharsetReader;
pub use crate::mime::encoded_word::{
    decode_encoded_words, decode_encoded_words_with, EncodedWordReader,
};
pub use crate::mime::header::{
    address_list, address_list_with, parse_address_list,
};
pub use crate::mime::header_block::HeaderFields;
pub use crate::mime::line_break::{remove_line_breaks, LineBreakRemover};
pub use crate::mime::model::Address;
pub use crate::mime::quoted_printable::{decode_quoted_printable, QpDecoder};
pub use crate::support::decoder_config::DecoderConfig;
pub use crate::support::error::{Component, Error};

#[cfg(test)]
static INIT_TEST_LOG: std::sync::Once = std::sync::Once::new();

#[cfg(test)]
fn init_test_log() {
    INIT_TEST_LOG.call_once(|| {
        fern::Dispatch::new()
            .format(|out, message, record| {
                out.finish(format_args!(
                    "{} [{}][{}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    record.level(),
                    record.target(),
                    message,
                ))
            })
            .level(log::LevelFilter::Debug)
            .chain(std::io::stderr())
            .apply()
            .unwrap();
    })
}
