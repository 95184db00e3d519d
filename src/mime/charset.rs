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

//! Conversion of charset-labelled bytes into Unicode text.
//!
//! The decoders in this crate never interpret charsets themselves. They
//! decide which bytes belong to which charset and hand them to a
//! `CharsetTranscoder`.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::Arc;

use encoding_rs::Encoding;
use lazy_static::lazy_static;

use super::utf7;
use crate::support::decoder_config::DecoderConfig;
use crate::support::error::Error;

/// Charset names seen in the wild that need rewriting before lookup.
///
/// Most Microsoft and legacy names are already WHATWG labels and resolve
/// without help; these are the ones that do not, plus `gb2312`, which is
/// routinely used for text that is really GBK.
pub const DEFAULT_ALIASES: &[(&str, &str)] = &[
    ("cp932", "shift_jis"),
    ("cp936", "gbk"),
    ("cp949", "euc-kr"),
    ("gb2312", "gbk"),
    ("x-gbk", "gbk"),
];

lazy_static! {
    pub(crate) static ref DEFAULT_ALIAS_TABLE: Arc<BTreeMap<String, String>> =
        Arc::new(
            DEFAULT_ALIASES
                .iter()
                .map(|&(k, v)| (k.to_owned(), v.to_owned()))
                .collect()
        );
}

/// Look `charset` up in `aliases`, whose keys are lower-case.
///
/// The result is always lower-case unless it came from the table.
pub fn resolve_alias<'a>(
    aliases: &BTreeMap<String, String>,
    charset: &'a str,
) -> Cow<'a, str> {
    let lower = charset.to_ascii_lowercase();
    match aliases.get(&lower) {
        Some(alias) => Cow::Owned(alias.clone()),
        None if lower == charset => Cow::Borrowed(charset),
        None => Cow::Owned(lower),
    }
}

/// Converts raw bytes in a named charset to text.
pub trait CharsetTranscoder {
    /// Decode `raw`, which is in `charset`.
    ///
    /// `charset` has already been passed through `canonical_charset`.
    /// Fails with `Error::UnsupportedCharset` if the charset is not known.
    fn transcode(&self, charset: &str, raw: &[u8]) -> Result<String, Error>;

    /// Map a charset name as found in a message to the name `transcode`
    /// expects.
    fn canonical_charset<'a>(&self, charset: &'a str) -> Cow<'a, str> {
        if charset.bytes().any(|b| b.is_ascii_uppercase()) {
            Cow::Owned(charset.to_ascii_lowercase())
        } else {
            Cow::Borrowed(charset)
        }
    }
}

impl<T: CharsetTranscoder + ?Sized> CharsetTranscoder for &T {
    fn transcode(&self, charset: &str, raw: &[u8]) -> Result<String, Error> {
        (**self).transcode(charset, raw)
    }

    fn canonical_charset<'a>(&self, charset: &'a str) -> Cow<'a, str> {
        (**self).canonical_charset(charset)
    }
}

/// A transcoder backed by a closure. See `from_fn`.
#[derive(Clone, Copy, Debug)]
pub struct FnTranscoder<F>(F);

/// Use `f` as a `CharsetTranscoder`.
///
/// `f` receives lower-cased charset names, after the scanner has applied
/// the alias table from its `DecoderConfig`.
pub fn from_fn<F>(f: F) -> FnTranscoder<F>
where
    F: Fn(&str, &[u8]) -> Result<String, Error>,
{
    FnTranscoder(f)
}

impl<F> CharsetTranscoder for FnTranscoder<F>
where
    F: Fn(&str, &[u8]) -> Result<String, Error>,
{
    fn transcode(&self, charset: &str, raw: &[u8]) -> Result<String, Error> {
        (self.0)(charset, raw)
    }
}

/// The standard transcoder, backed by `encoding_rs` plus UTF-7.
///
/// The alias table is fixed at construction and shared between clones.
#[derive(Clone, Debug)]
pub struct EncodingTranscoder {
    aliases: Arc<BTreeMap<String, String>>,
}

impl Default for EncodingTranscoder {
    fn default() -> Self {
        EncodingTranscoder {
            aliases: Arc::clone(&DEFAULT_ALIAS_TABLE),
        }
    }
}

impl EncodingTranscoder {
    /// Create a transcoder with exactly the given aliases.
    ///
    /// Keys are matched against lower-cased charset names.
    pub fn new(aliases: BTreeMap<String, String>) -> Self {
        EncodingTranscoder {
            aliases: Arc::new(
                aliases
                    .into_iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v))
                    .collect(),
            ),
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::new(config.aliases())
    }
}

impl CharsetTranscoder for EncodingTranscoder {
    fn transcode(&self, charset: &str, raw: &[u8]) -> Result<String, Error> {
        // encoding-rs doesn't do UTF-7...
        if "utf-7".eq_ignore_ascii_case(charset) {
            return Ok(utf7::decode(&String::from_utf8_lossy(raw)).into_owned());
        }

        // ... but it does everything else
        let encoding = Encoding::for_label_no_replacement(charset.as_bytes())
            .ok_or_else(|| Error::UnsupportedCharset(charset.to_owned()))?;
        let raw = if encoding_rs::ISO_2022_JP == encoding {
            collapse_iso_2022_jp_escapes(raw)
        } else {
            Cow::Borrowed(raw)
        };
        Ok(encoding.decode_with_bom_removal(&raw).0.into_owned())
    }

    fn canonical_charset<'a>(&self, charset: &'a str) -> Cow<'a, str> {
        resolve_alias(&self.aliases, charset)
    }
}

/// Remove ISO-2022-JP escape sequences which are immediately superseded by
/// another escape sequence.
///
/// Joining adjacent encoded words produces exactly this, typically
/// `ESC ( B` from the end of one word followed by `ESC $ B` from the start
/// of the next. The WHATWG decoder treats back-to-back escapes as an error
/// and would emit U+FFFD between them.
fn collapse_iso_2022_jp_escapes(raw: &[u8]) -> Cow<'_, [u8]> {
    let mut collapsed: Option<Vec<u8>> = None;
    let mut ix = 0;
    while ix < raw.len() {
        let rest = &raw[ix..];
        if rest.len() >= 6
            && is_iso_2022_jp_escape(&rest[..3])
            && is_iso_2022_jp_escape(&rest[3..6])
        {
            collapsed.get_or_insert_with(|| raw[..ix].to_vec());
            ix += 3;
            continue;
        }

        if let Some(ref mut collapsed) = collapsed {
            collapsed.push(rest[0]);
        }
        ix += 1;
    }

    match collapsed {
        Some(collapsed) => Cow::Owned(collapsed),
        None => Cow::Borrowed(raw),
    }
}

fn is_iso_2022_jp_escape(s: &[u8]) -> bool {
    matches!(
        s,
        [0x1B, b'(', b'B']
            | [0x1B, b'(', b'J']
            | [0x1B, b'(', b'I']
            | [0x1B, b'$', b'@']
            | [0x1B, b'$', b'B']
    )
}
