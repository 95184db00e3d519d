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

/// A message whose `Cc` field holds nine addresses in most of the forms seen
/// in the wild: comments, quoted names, bare addresses, ISO-2022-JP and UTF-8
/// encoded words split across folds, and a quoted encoded word.
///
/// The last entry is labelled GB2312 but is really GBK, which only decodes
/// with the default alias table in place.
pub static ADDRESSES_JAPANESE: &[u8] = include_bytes!("addresses_japanese.eml");

/// `QP_ORIGINAL` encoded as quoted-printable with DOS line endings, except
/// for one soft line break which uses a bare LF.
pub static QP_ENCODED: &[u8] = include_bytes!("quoted-printable.txt");

/// The decoded form of `QP_ENCODED`.
pub static QP_ORIGINAL: &[u8] = include_bytes!("original.txt");

/// A single address in ISO-8859-1 with no trailing line break.
pub static ISO_8859_1_RAW: &[u8] = include_bytes!("iso_8859_1_raw.txt");
