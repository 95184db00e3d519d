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

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::error::Error;
use crate::mime::charset::{DEFAULT_ALIASES, DEFAULT_ALIAS_TABLE};

/// Tunables for the decoders.
///
/// This can be loaded from TOML, for example:
///
/// ```toml
/// best_effort = true
/// max_encoded_word_len = 1024
///
/// [charset_aliases]
/// gb2312 = "gbk"
/// ks_c_5601-1987 = "euc-kr"
/// ```
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// If true, an encoded word in a charset the transcoder does not know is
    /// passed through in its encoded form instead of failing the decode.
    pub best_effort: bool,

    /// The longest encoded word, in bytes, that the scanner will buffer while
    /// looking for the closing `?=`.
    ///
    /// RFC 2047 caps encoded words at 75 characters, but plenty of agents
    /// produce longer ones, so the default is far more generous. Anything
    /// longer is treated as literal text.
    pub max_encoded_word_len: usize,

    /// Maps lower-case charset names as they appear in messages to the name
    /// that should be handed to the transcoder.
    ///
    /// The encoded word scanner applies these before calling the
    /// transcoder. Entries here are added on top of the built-in table.
    pub charset_aliases: BTreeMap<String, String>,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            best_effort: false,
            max_encoded_word_len: 4096,
            charset_aliases: BTreeMap::new(),
        }
    }
}

impl DecoderConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Error> {
        Ok(toml::from_str(s)?)
    }

    /// Returns the effective alias table: the built-in entries overridden by
    /// any configured ones, with all keys lower-cased.
    pub fn aliases(&self) -> BTreeMap<String, String> {
        let mut aliases = DEFAULT_ALIASES
            .iter()
            .map(|&(k, v)| (k.to_owned(), v.to_owned()))
            .collect::<BTreeMap<_, _>>();
        for (k, v) in &self.charset_aliases {
            aliases.insert(k.to_ascii_lowercase(), v.clone());
        }
        aliases
    }

    /// Like `aliases`, but shares the built-in table when nothing is
    /// configured.
    pub fn alias_table(&self) -> Arc<BTreeMap<String, String>> {
        if self.charset_aliases.is_empty() {
            Arc::clone(&DEFAULT_ALIAS_TABLE)
        } else {
            Arc::new(self.aliases())
        }
    }
}
